pub mod colors;

pub use colors::Color;

use tray_config::ThemeConfig;

/// Compiled theme derived from [`ThemeConfig`].
///
/// All colors are pre-parsed from hex strings into normalised `[0, 1]` RGBA.
/// Calling [`Theme::from_config`] is infallible; invalid color strings fall
/// back to safe defaults.
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    pub accent:     Color,
    /// Proportional font family.
    pub font:       String,
    /// Monospaced font family.
    pub mono_font:  String,
    pub font_size:  f32,
    pub padding:    u16,
}

impl Theme {
    /// Build a [`Theme`] from the config file's `[theme]` section.
    pub fn from_config(cfg: &ThemeConfig) -> Self {
        Self {
            background: Color::from_hex(&cfg.background).unwrap_or(Color::DARK),
            foreground: Color::from_hex(&cfg.foreground).unwrap_or(Color::WHITE),
            accent:     Color::from_hex(&cfg.accent).unwrap_or(Color::PURPLE),
            font:       cfg.font.clone(),
            mono_font:  cfg.mono_font.clone(),
            font_size:  cfg.font_size,
            padding:    cfg.padding,
        }
    }

    /// Font family for text in the given face.
    pub fn font_family(&self, monospaced: bool) -> &str {
        if monospaced { &self.mono_font } else { &self.font }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}
