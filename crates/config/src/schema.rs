use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure parsed from `wmtray.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrayConfig {
    /// Surface and input settings.
    pub global: GlobalConfig,
    /// Tray presentation settings.
    pub tray: TrayStyleConfig,
    /// Theme / visual settings.
    pub theme: ThemeConfig,
}

/// Global settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Surface height in logical pixels.
    pub height: u32,
    /// Whether the tray sits at the top or the bottom.
    pub position: Position,
    /// Reserve an exclusive zone so windows don't overlap the surface.
    pub exclusive_zone: bool,
    /// Overall background opacity (0.0 – 1.0).
    pub opacity: f32,
    /// Snapshot file written by the window manager.  Empty = default location.
    pub snapshot_path: String,
    /// Mode identifier the WM uses for its default input mode.
    pub default_mode: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            height:         32,
            position:       Position::Top,
            exclusive_zone: true,
            opacity:        0.95,
            snapshot_path:  String::new(),
            default_mode:   "main".to_string(),
        }
    }
}

impl GlobalConfig {
    /// Resolved snapshot path, honouring `$XDG_RUNTIME_DIR` for the default.
    pub fn snapshot_path(&self) -> PathBuf {
        if !self.snapshot_path.is_empty() {
            return PathBuf::from(&self.snapshot_path);
        }
        let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
            .unwrap_or_else(|_| "/run/user/1000".to_string());
        PathBuf::from(runtime_dir).join("wmtray").join("snapshot.json")
    }
}

/// Surface position on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    #[default]
    Top,
    Bottom,
}

/// How the tray summary is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStyle {
    /// Icon / badge cells grouped by monitor.
    #[default]
    Icons,
    /// Summary text in a monospaced font.
    MonospacedText,
    /// Summary text in the system font.
    SystemText,
}

impl DisplayStyle {
    pub fn is_text(self) -> bool {
        !matches!(self, Self::Icons)
    }

    /// Whether text should use a monospaced face.
    pub fn is_monospaced(self) -> bool {
        !matches!(self, Self::SystemText)
    }
}

/// Tray presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrayStyleConfig {
    pub display_style: DisplayStyle,
    /// Maximum characters of the joined occupant names before truncation.
    pub occupant_max_len: usize,
    /// Opacity of a focused workspace that holds no windows.
    pub empty_focus_opacity: f32,
    /// Opacity of the bar between monitor groups.
    pub separator_opacity: f32,
    /// Edge length of a square cell in logical pixels.
    pub item_size: f32,
    /// Gap between cells.
    pub item_spacing: f32,
    /// Stroke width of outline badges and icons.
    pub item_border: f32,
    /// Horizontal padding inside multi-character badges.
    pub item_padding: f32,
    pub corner_radius: f32,
    /// Pixel density of the rasterised image (2.0 = HiDPI).
    pub raster_scale: f32,
}

impl Default for TrayStyleConfig {
    fn default() -> Self {
        Self {
            display_style:       DisplayStyle::Icons,
            occupant_max_len:    25,
            empty_focus_opacity: 0.6,
            separator_opacity:   0.6,
            item_size:           40.0,
            item_spacing:        6.0,
            item_border:         4.0,
            item_padding:        8.0,
            corner_radius:       6.0,
            raster_scale:        2.0,
        }
    }
}

/// Theme / styling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Surface background color (hex, e.g. `"#1e1e2e"`).
    pub background: String,
    /// Primary text/foreground color, also used for icon strokes.
    pub foreground: String,
    /// Accent / highlight color.
    pub accent: String,
    /// Font family name for proportional text.
    pub font: String,
    /// Font family name for monospaced text.
    pub mono_font: String,
    /// Font size in points for the text fallback.
    pub font_size: f32,
    /// Inner padding of the surface (pixels).
    pub padding: u16,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: "#1e1e2e".to_string(), // Catppuccin Mocha: base
            foreground: "#cdd6f4".to_string(), // Catppuccin Mocha: text
            accent:     "#cba6f7".to_string(), // Catppuccin Mocha: mauve
            font:       "Inter".to_string(),
            mono_font:  "JetBrains Mono".to_string(),
            font_size:  13.0,
            padding:    4,
        }
    }
}
