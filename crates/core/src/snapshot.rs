use crate::error::{Result, TrayError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Point-in-time view of the window manager, as published by the WM.
///
/// The WM guarantees workspace names are unique and non-empty; nothing here
/// re-validates that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WmSnapshot {
    /// Connected monitors, in no particular order.
    pub monitors: Vec<MonitorInfo>,
    /// Every known workspace, visible or not.
    pub workspaces: Vec<WorkspaceInfo>,
    /// Name of the workspace holding focus.
    pub focused_workspace: Option<String>,
    /// Active input mode, `None` when the WM reports no mode at all.
    pub mode: Option<String>,
}

/// A physical monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorInfo {
    /// Stable for the lifetime of the WM session.
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub primary: bool,
    /// Top-left corner in global coordinates.
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
    /// Name of the workspace currently shown on this monitor.
    pub active_workspace: String,
}

/// A workspace and the window tree it holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceInfo {
    pub name: String,
    /// Monitor the workspace is assigned to.
    pub monitor: u32,
    #[serde(default)]
    pub tree: Vec<TreeNode>,
}

/// Node of a workspace's layout tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    Window {
        id: u32,
        /// Display name of the owning process, if the WM could resolve one.
        #[serde(default)]
        app: Option<String>,
    },
    Container {
        #[serde(default)]
        children: Vec<TreeNode>,
    },
}

impl WmSnapshot {
    /// Parse a snapshot from its JSON form.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| TrayError::Snapshot(format!("JSON parse error: {e}")))
    }

    /// Read and parse a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| TrayError::Snapshot(format!("cannot read '{}': {e}", path.display())))?;
        let snapshot = Self::from_json(&raw)?;
        debug!(
            "Loaded snapshot from {}: {} monitors, {} workspaces",
            path.display(),
            snapshot.monitors.len(),
            snapshot.workspaces.len(),
        );
        Ok(snapshot)
    }

    /// Monitors in canonical order: primary first, then left-to-right,
    /// top-to-bottom. Ties fall back to the monitor id so the order is total.
    pub fn sorted_monitors(&self) -> Vec<&MonitorInfo> {
        let mut monitors: Vec<&MonitorInfo> = self.monitors.iter().collect();
        monitors.sort_by_key(|m| (!m.primary, m.x, m.y, m.id));
        monitors
    }

    pub fn workspace(&self, name: &str) -> Option<&WorkspaceInfo> {
        self.workspaces.iter().find(|w| w.name == name)
    }

    /// The focused workspace, or `None` if focus names an unknown workspace.
    pub fn focused(&self) -> Option<&WorkspaceInfo> {
        self.focused_workspace.as_deref().and_then(|name| self.workspace(name))
    }

    /// The monitor currently showing `workspace`, if any.
    pub fn showing_monitor(&self, workspace: &str) -> Option<&MonitorInfo> {
        self.monitors.iter().find(|m| m.active_workspace == workspace)
    }
}

impl WorkspaceInfo {
    /// Owning application of every window in the tree, depth first.
    pub fn window_apps(&self) -> Vec<Option<&str>> {
        let mut out = Vec::new();
        for node in &self.tree {
            node.collect_windows(&mut out);
        }
        out
    }

    /// `true` when no window in the tree counts toward occupancy.
    pub fn is_effectively_empty(&self) -> bool {
        !self.tree.iter().any(TreeNode::has_window)
    }
}

impl TreeNode {
    fn collect_windows<'a>(&'a self, out: &mut Vec<Option<&'a str>>) {
        match self {
            Self::Window { app, .. } => out.push(app.as_deref()),
            Self::Container { children } => {
                for child in children {
                    child.collect_windows(out);
                }
            }
        }
    }

    fn has_window(&self) -> bool {
        match self {
            Self::Window { .. } => true,
            Self::Container { children } => children.iter().any(Self::has_window),
        }
    }
}
