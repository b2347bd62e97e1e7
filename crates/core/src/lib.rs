pub mod error;
pub mod event;
pub mod model;
pub mod publish;
pub mod snapshot;

pub use error::{Result, TrayError};
pub use event::Message;
pub use model::{DisplayModel, EntryKind, MonitorSummary, TrayEntry, WorkspaceSummary};
pub use publish::StatusPublisher;
pub use snapshot::{MonitorInfo, TreeNode, WmSnapshot, WorkspaceInfo};
