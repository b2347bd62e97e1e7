pub mod tray;

pub use tray::TrayWidget;
