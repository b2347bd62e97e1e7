use serde::Serialize;
use std::collections::HashSet;

/// Immutable summary of window-manager state, rebuilt wholesale on every
/// refresh and consumed read-only by the renderer.
///
/// Construction goes through [`DisplayModel::new`], which enforces the
/// uniqueness invariants: `(kind, name)` among primary entries and `name`
/// among workspaces. The first occurrence of a duplicate wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayModel {
    summary_text:    String,
    primary_entries: Vec<TrayEntry>,
    workspaces:      Vec<WorkspaceSummary>,
    monitors:        Vec<MonitorSummary>,
}

/// Per-workspace row of the display model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceSummary {
    pub name: String,
    /// `" - app, app"`, `" - monitor"` or empty.
    pub occupant_label: String,
    /// Monitor showing the workspace, or the one it is assigned to.
    pub monitor_id: u32,
    pub is_focused: bool,
    pub is_effectively_empty: bool,
    pub is_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonitorSummary {
    pub monitor_id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Mode,
    Workspace,
}

/// One item of the first monitor's run in the tray.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TrayEntry {
    pub kind: EntryKind,
    pub name: String,
    pub is_active: bool,
}

impl TrayEntry {
    pub fn mode(name: impl Into<String>) -> Self {
        Self { kind: EntryKind::Mode, name: name.into(), is_active: true }
    }

    pub fn workspace(name: impl Into<String>, is_active: bool) -> Self {
        Self { kind: EntryKind::Workspace, name: name.into(), is_active }
    }

    /// Identity within one display model.
    pub fn id(&self) -> (EntryKind, &str) {
        (self.kind, &self.name)
    }
}

impl DisplayModel {
    pub fn new(
        summary_text: String,
        primary_entries: Vec<TrayEntry>,
        workspaces: Vec<WorkspaceSummary>,
        monitors: Vec<MonitorSummary>,
    ) -> Self {
        let mut seen = HashSet::new();
        let primary_entries = primary_entries
            .into_iter()
            .filter(|e| seen.insert((e.kind, e.name.clone())))
            .collect();

        let mut seen = HashSet::new();
        let workspaces = workspaces
            .into_iter()
            .filter(|w| seen.insert(w.name.clone()))
            .collect();

        Self { summary_text, primary_entries, workspaces, monitors }
    }

    pub fn summary_text(&self) -> &str {
        &self.summary_text
    }

    pub fn primary_entries(&self) -> &[TrayEntry] {
        &self.primary_entries
    }

    pub fn workspaces(&self) -> &[WorkspaceSummary] {
        &self.workspaces
    }

    pub fn monitors(&self) -> &[MonitorSummary] {
        &self.monitors
    }

    pub fn workspace(&self, name: &str) -> Option<&WorkspaceSummary> {
        self.workspaces.iter().find(|w| w.name == name)
    }

    /// The focused workspace's summary, if focus resolved to a known workspace.
    pub fn focused_workspace(&self) -> Option<&WorkspaceSummary> {
        self.workspaces.iter().find(|w| w.is_focused)
    }
}
