use crate::snapshot::WmSnapshot;

/// All messages (events) that can flow through the application event bus.
///
/// Sources:
/// - Snapshot watcher task → `SnapshotUpdated`
/// - Config watcher task   → `ConfigReloaded`
#[derive(Debug, Clone)]
pub enum Message {
    // ── Window manager ────────────────────────────────────────────────────────
    /// The window manager published a new state snapshot.
    SnapshotUpdated(WmSnapshot),

    // ── Config ────────────────────────────────────────────────────────────────
    /// Config file changed on disk; triggers a live reload.
    ConfigReloaded,

    // ── Internal ──────────────────────────────────────────────────────────────
    /// Nothing to do; used as a benign fallback result for tasks.
    Noop,
}
