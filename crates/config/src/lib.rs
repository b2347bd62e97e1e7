pub mod schema;
pub mod watcher;

pub use schema::{DisplayStyle, GlobalConfig, Position, ThemeConfig, TrayConfig, TrayStyleConfig};
pub use watcher::FileWatcher;

use std::path::{Path, PathBuf};
use tray_core::{Result, TrayError};

/// Load configuration from a TOML file.  Returns `TrayConfig::default()` if
/// the file doesn't exist so the tray always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<TrayConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(TrayConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| TrayError::Config(format!("cannot read '{}': {e}", path.display())))?;

    toml::from_str(&raw).map_err(|e| TrayError::Config(format!("TOML parse error: {e}")))
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("wmtray").join("wmtray.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load("/nonexistent/wmtray/wmtray.toml").unwrap();
        assert_eq!(cfg.tray.occupant_max_len, 25);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let path = std::env::temp_dir().join(format!("wmtray-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[tray\noccupant_max_len = ").unwrap();
        let err = load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, TrayError::Config(_)));
    }

    #[test]
    fn default_path_ends_in_wmtray_toml() {
        assert!(default_path().ends_with("wmtray/wmtray.toml"));
    }
}
