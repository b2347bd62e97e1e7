use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Watches a single file and sends a notification whenever it is written or
/// replaced.
///
/// The parent directory is watched rather than the file itself, so writers
/// that replace the file atomically (write to a temp file, then rename) are
/// still picked up.
///
/// # Example
/// ```no_run
/// # async fn demo() {
/// let (_, mut rx) = tray_config::FileWatcher::spawn("/run/user/1000/wmtray/snapshot.json");
/// while rx.recv().await.is_some() {
///     println!("snapshot changed, refreshing");
/// }
/// # }
/// ```
pub struct FileWatcher {
    path: PathBuf,
}

impl FileWatcher {
    /// Spawn a filesystem watcher for `path`.
    /// Returns the watcher handle and a receiver that fires on every detected change.
    pub fn spawn(path: impl AsRef<Path>) -> (Self, mpsc::Receiver<()>) {
        let (tx, rx) = mpsc::channel(1);
        let path = path.as_ref().to_path_buf();
        let watcher = Self { path: path.clone() };

        tokio::spawn(watch_loop(path, tx));

        (watcher, rx)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// First and last delay between checks for a parent directory that does not
/// exist yet.
const DIR_RETRY_MIN: Duration = Duration::from_millis(100);
const DIR_RETRY_MAX: Duration = Duration::from_secs(5);

async fn watch_loop(path: PathBuf, tx: mpsc::Sender<()>) {
    use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
    use tokio::sync::mpsc as async_mpsc;

    let Some(dir) = path.parent().map(Path::to_path_buf) else {
        error!("Cannot watch '{}': path has no parent directory", path.display());
        return;
    };

    // The writer usually creates the directory itself, possibly after we
    // start.  Wait for it instead of giving up.
    if !dir.is_dir() {
        info!("Waiting for '{}' to appear", dir.display());
        let mut delay = DIR_RETRY_MIN;
        while !dir.is_dir() {
            if tx.is_closed() {
                return;
            }
            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(DIR_RETRY_MAX);
        }
        // Writes that landed before the watch was registered produce no
        // event of their own.
        if path.exists() {
            let _ = tx.try_send(());
        }
    }

    let (sync_tx, mut sync_rx) = async_mpsc::channel::<notify::Result<Event>>(16);

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = sync_tx.blocking_send(res);
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    ) {
        Ok(w) => w,
        Err(e) => {
            error!("Failed to create filesystem watcher: {e}");
            return;
        }
    };

    if let Err(e) = watcher.watch(&dir, RecursiveMode::NonRecursive) {
        error!("Failed to watch '{}': {e}", dir.display());
        return;
    }

    info!("Watching file: {}", path.display());

    while let Some(event) = sync_rx.recv().await {
        match event {
            Ok(e) => {
                use notify::EventKind::*;
                let touches_file = e.paths.iter().any(|p| p == &path);
                if touches_file && matches!(e.kind, Modify(_) | Create(_)) {
                    // A full channel already holds a pending notification.
                    if let Err(mpsc::error::TrySendError::Closed(_)) = tx.try_send(()) {
                        break; // receiver dropped
                    }
                }
            }
            Err(e) => warn!("Watcher error: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[tokio::test]
    async fn notifies_on_write() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("snapshot.json");
        let (_watcher, mut rx) = FileWatcher::spawn(&path);

        // Give the watcher time to register before writing.
        tokio::time::sleep(Duration::from_millis(200)).await;
        std::fs::write(&path, "{}").unwrap();

        let got = timeout(Duration::from_secs(5), rx.recv()).await;
        assert_eq!(got, Ok(Some(())));
    }

    #[tokio::test]
    async fn waits_for_a_missing_parent_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("wmtray");
        let path = dir.join("snapshot.json");
        let (watcher, mut rx) = FileWatcher::spawn(&path);
        assert_eq!(watcher.path(), path.as_path());

        tokio::time::sleep(Duration::from_millis(50)).await;
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, "{}").unwrap();
        std::fs::write(&path, "{\"mode\": \"main\"}").unwrap();

        let got = timeout(Duration::from_secs(5), rx.recv()).await;
        assert_eq!(got, Ok(Some(())), "a change must arrive once the directory exists");
    }

    #[tokio::test]
    async fn writes_after_the_directory_appears_are_seen() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("late");
        let path = dir.join("wmtray.toml");
        let (_watcher, mut rx) = FileWatcher::spawn(&path);

        tokio::time::sleep(Duration::from_millis(50)).await;
        std::fs::create_dir_all(&dir).unwrap();
        // Past the first retry, so the watch is registered before the write.
        tokio::time::sleep(Duration::from_millis(800)).await;
        std::fs::write(&path, "[global]").unwrap();

        let got = timeout(Duration::from_secs(5), rx.recv()).await;
        assert_eq!(got, Ok(Some(())));
    }
}
