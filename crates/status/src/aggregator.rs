use crate::natural::natural_cmp;
use std::collections::BTreeSet;
use tracing::debug;
use tray_config::TrayConfig;
use tray_core::{
    DisplayModel, MonitorInfo, MonitorSummary, TrayEntry, WmSnapshot, WorkspaceInfo,
    WorkspaceSummary,
};

/// Separator between per-monitor segments of the summary text.
pub const MONITOR_SEPARATOR: &str = " │ ";
/// Prefix of a non-empty occupant label.
pub const OCCUPANT_DASH: &str = " - ";
/// Appended to an occupant list cut at the maximum length.
pub const TRUNCATION_MARKER: &str = "…";

/// Projects a [`WmSnapshot`] into a [`DisplayModel`].
///
/// `refresh` is a pure function of the snapshot: it must run on the same
/// thread that applies window-manager changes, and two calls with the same
/// snapshot produce equal models.
#[derive(Debug, Clone)]
pub struct StatusAggregator {
    occupant_max_len: usize,
    default_mode:     String,
}

impl StatusAggregator {
    pub fn new(config: &TrayConfig) -> Self {
        Self {
            occupant_max_len: config.tray.occupant_max_len,
            default_mode:     config.global.default_mode.clone(),
        }
    }

    pub fn refresh(&self, snapshot: &WmSnapshot) -> DisplayModel {
        let monitors = snapshot.sorted_monitors();
        let focused = snapshot.focused();
        let mode_letter = self.mode_letter(snapshot);

        let summary_text = summary_text(&monitors, focused, mode_letter.as_deref());

        let mut workspaces: Vec<WorkspaceSummary> = snapshot
            .workspaces
            .iter()
            .map(|ws| self.summarize(snapshot, ws, focused))
            .collect();
        workspaces.sort_by(|a, b| natural_cmp(&a.name, &b.name));

        let mut entries: Vec<TrayEntry> = Vec::new();
        if let Some(first) = monitors.first() {
            entries = workspaces
                .iter()
                .filter(|ws| ws.monitor_id == first.id)
                .filter(|ws| !ws.is_effectively_empty || ws.is_focused)
                .map(|ws| TrayEntry::workspace(ws.name.clone(), ws.is_focused))
                .collect();
            entries.sort_by(|a, b| natural_cmp(&a.name, &b.name));
        }
        if let Some(letter) = mode_letter {
            entries.insert(0, TrayEntry::mode(letter));
        }

        let monitors = monitors
            .iter()
            .map(|m| MonitorSummary { monitor_id: m.id, name: m.name.clone() })
            .collect();

        let model = DisplayModel::new(summary_text, entries, workspaces, monitors);
        debug!(
            entries    = model.primary_entries().len(),
            workspaces = model.workspaces().len(),
            monitors   = model.monitors().len(),
            "Display model refreshed: {}",
            model.summary_text()
        );
        model
    }

    /// Uppercased first character of the active mode, or `None` when the
    /// default mode (or no mode) is active.
    fn mode_letter(&self, snapshot: &WmSnapshot) -> Option<String> {
        let mode = snapshot.mode.as_deref().filter(|m| *m != self.default_mode)?;
        mode.chars().next().map(|c| c.to_uppercase().collect())
    }

    fn summarize(
        &self,
        snapshot: &WmSnapshot,
        ws: &WorkspaceInfo,
        focused: Option<&WorkspaceInfo>,
    ) -> WorkspaceSummary {
        let showing = snapshot.showing_monitor(&ws.name);
        let occupant_label = match occupants(ws, self.occupant_max_len) {
            Some(apps) => format!("{OCCUPANT_DASH}{apps}"),
            None => match showing {
                Some(monitor) => format!("{OCCUPANT_DASH}{}", monitor.name),
                None => String::new(),
            },
        };

        WorkspaceSummary {
            name: ws.name.clone(),
            occupant_label,
            monitor_id: showing.map_or(ws.monitor, |m| m.id),
            is_focused: focused.is_some_and(|f| f.name == ws.name),
            is_effectively_empty: ws.is_effectively_empty(),
            is_visible: showing.is_some(),
        }
    }
}

fn summary_text(
    monitors: &[&MonitorInfo],
    focused: Option<&WorkspaceInfo>,
    mode_letter: Option<&str>,
) -> String {
    let multi_monitor = monitors.len() > 1;
    let segments: Vec<String> = monitors
        .iter()
        .map(|m| {
            let is_focused = focused.is_some_and(|f| f.name == m.active_workspace);
            let marker = if multi_monitor && is_focused { "*" } else { "" };
            format!("{marker}{}", m.active_workspace)
        })
        .collect();

    let prefix = mode_letter.map(|l| format!("[{l}] ")).unwrap_or_default();
    format!("{prefix}{}", segments.join(MONITOR_SEPARATOR))
}

/// Sorted, de-duplicated owning-process names joined with `", "`, truncated
/// to `max_len` characters.  `None` when no window has a usable name.
fn occupants(ws: &WorkspaceInfo, max_len: usize) -> Option<String> {
    let apps: BTreeSet<&str> = ws
        .window_apps()
        .into_iter()
        .flatten()
        .filter(|app| !app.is_empty())
        .collect();
    if apps.is_empty() {
        return None;
    }
    let joined = apps.into_iter().collect::<Vec<_>>().join(", ");
    Some(truncate(&joined, max_len))
}

fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_len).collect();
    format!("{kept}{TRUNCATION_MARKER}")
}
