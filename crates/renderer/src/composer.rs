use crate::backend::{Raster, RenderBackend};
use tracing::debug;
use tray_config::{DisplayStyle, TrayConfig};
use tray_core::{DisplayModel, EntryKind, TrayEntry, WorkspaceSummary};
use tray_icons::{EmojiDetector, IconId, UnicodeEmoji};
use tray_status::natural_cmp;

/// Drawn between monitor groups.
pub const SEPARATOR_GLYPH: &str = "|";
/// Drawn after the mode cell.
pub const MODE_SUFFIX: &str = ":";

/// What a single cell shows.
#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    /// Literal text at native size, no background (emoji names, separators).
    Glyph(String),
    /// Catalog icon at the fixed square size.
    Icon(IconId),
    /// Name inside a rounded badge; `filled` for the active entry.
    Badge { text: String, filled: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub content: CellContent,
    pub opacity: f32,
}

impl Cell {
    fn opaque(content: CellContent) -> Self {
        Self { content, opacity: 1.0 }
    }
}

/// Layout decided from a display model, before any drawing.
#[derive(Debug, Clone, PartialEq)]
pub enum Composition {
    /// Plain styled text, no cell grid.
    Text(String),
    /// Horizontal run of cells, first monitor first.
    Cells(Vec<Cell>),
}

/// Final result handed to the toolkit.
#[derive(Debug, Clone, PartialEq)]
pub enum VisualOutput {
    Image(Raster),
    Text(String),
}

impl VisualOutput {
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

/// Turns a [`DisplayModel`] into cells and, through a backend, into an image
/// or text.
#[derive(Debug, Clone)]
pub struct Composer<E = UnicodeEmoji> {
    display_style:       DisplayStyle,
    empty_focus_opacity: f32,
    separator_opacity:   f32,
    emoji:               E,
}

impl Composer<UnicodeEmoji> {
    pub fn new(config: &TrayConfig) -> Self {
        Self::with_detector(config, UnicodeEmoji)
    }
}

impl<E: EmojiDetector> Composer<E> {
    pub fn with_detector(config: &TrayConfig, emoji: E) -> Self {
        Self {
            display_style:       config.tray.display_style,
            empty_focus_opacity: config.tray.empty_focus_opacity,
            separator_opacity:   config.tray.separator_opacity,
            emoji,
        }
    }

    pub fn compose(&self, model: &DisplayModel) -> Composition {
        if self.display_style.is_text() || model.primary_entries().is_empty() {
            return Composition::Text(model.summary_text().to_string());
        }

        let mut cells = Vec::new();

        // ── First monitor: mode + primary entries ─────────────────────────────
        for entry in model.primary_entries() {
            let empty_focus = entry.kind == EntryKind::Workspace
                && entry.is_active
                && model.workspace(&entry.name).is_some_and(|w| w.is_effectively_empty);
            cells.push(self.cell(entry, empty_focus));
            if entry.kind == EntryKind::Mode {
                cells.push(Cell::opaque(CellContent::Glyph(MODE_SUFFIX.to_string())));
            }
        }

        // ── Remaining monitors, each behind a separator ───────────────────────
        for monitor in model.monitors().iter().skip(1) {
            let mut shown: Vec<&WorkspaceSummary> = model
                .workspaces()
                .iter()
                .filter(|w| w.monitor_id == monitor.monitor_id)
                .filter(|w| !w.is_effectively_empty || w.is_focused)
                .collect();
            if shown.is_empty() {
                continue;
            }
            shown.sort_by(|a, b| natural_cmp(&a.name, &b.name));

            cells.push(Cell {
                content: CellContent::Glyph(SEPARATOR_GLYPH.to_string()),
                opacity: self.separator_opacity,
            });
            for ws in shown {
                let entry = TrayEntry::workspace(ws.name.clone(), ws.is_focused);
                cells.push(self.cell(&entry, ws.is_focused && ws.is_effectively_empty));
            }
        }

        Composition::Cells(cells)
    }

    /// Compose and draw.  Any failure to produce a non-blank image degrades
    /// silently to the summary text.
    pub fn render(&self, model: &DisplayModel, backend: &dyn RenderBackend) -> VisualOutput {
        let cells = match self.compose(model) {
            Composition::Text(text) => return VisualOutput::Text(text),
            Composition::Cells(cells) => cells,
        };
        let fallback = || VisualOutput::Text(model.summary_text().to_string());

        let Some(rasterizer) = backend.rasterizer() else {
            return fallback();
        };
        match rasterizer.rasterize(&cells) {
            Ok(raster) if !raster.is_blank() => VisualOutput::Image(raster),
            Ok(_) => {
                debug!("Rasterized tray image is blank; using text");
                fallback()
            }
            Err(e) => {
                debug!("Rasterization failed ({e}); using text");
                fallback()
            }
        }
    }

    fn cell(&self, entry: &TrayEntry, empty_focus: bool) -> Cell {
        let content = if self.emoji.contains_emoji(&entry.name) {
            CellContent::Glyph(entry.name.clone())
        } else if let Some(icon) = tray_icons::resolve(entry.kind, &entry.name, entry.is_active) {
            CellContent::Icon(icon)
        } else {
            CellContent::Badge { text: entry.name.clone(), filled: entry.is_active }
        };
        let opacity = if empty_focus { self.empty_focus_opacity } else { 1.0 };
        Cell { content, opacity }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Rasterizer, TextBackend};
    use pretty_assertions::assert_eq;
    use tray_core::{MonitorSummary, Result, TrayError};
    use tray_icons::IconShape;

    fn ws(name: &str, monitor_id: u32, focused: bool, empty: bool) -> WorkspaceSummary {
        WorkspaceSummary {
            name: name.into(),
            occupant_label: String::new(),
            monitor_id,
            is_focused: focused,
            is_effectively_empty: empty,
            is_visible: false,
        }
    }

    fn monitors(ids: &[u32]) -> Vec<MonitorSummary> {
        ids.iter()
            .map(|&id| MonitorSummary { monitor_id: id, name: format!("DP-{id}") })
            .collect()
    }

    fn icon(key: &str, shape: IconShape) -> CellContent {
        CellContent::Icon(IconId { key: key.into(), shape })
    }

    fn contents(composition: &Composition) -> Vec<(CellContent, f32)> {
        match composition {
            Composition::Cells(cells) => cells.iter().map(|c| (c.content.clone(), c.opacity)).collect(),
            Composition::Text(t) => panic!("expected cells, got text {t:?}"),
        }
    }

    fn composer() -> Composer {
        Composer::new(&TrayConfig::default())
    }

    struct Fixed(Result<Raster>);

    impl Rasterizer for Fixed {
        fn rasterize(&self, _cells: &[Cell]) -> Result<Raster> {
            match &self.0 {
                Ok(r) => Ok(r.clone()),
                Err(e) => Err(TrayError::Render(e.to_string())),
            }
        }
    }

    impl RenderBackend for Fixed {
        fn rasterizer(&self) -> Option<&dyn Rasterizer> {
            Some(self)
        }
    }

    fn raster(alpha: u8) -> Raster {
        Raster { width: 1, height: 1, scale: 1.0, pixels: vec![255, 255, 255, alpha] }
    }

    fn single_entry_model() -> DisplayModel {
        DisplayModel::new(
            "1".into(),
            vec![TrayEntry::workspace("1", true)],
            vec![ws("1", 1, true, false)],
            monitors(&[1]),
        )
    }

    #[test]
    fn no_entries_renders_summary_text() {
        let model = DisplayModel::new("[S] ".into(), vec![], vec![], vec![]);
        assert_eq!(composer().compose(&model), Composition::Text("[S] ".into()));
    }

    #[test]
    fn text_display_style_skips_cells() {
        let mut config = TrayConfig::default();
        config.tray.display_style = DisplayStyle::MonospacedText;
        let composition = Composer::new(&config).compose(&single_entry_model());
        assert_eq!(composition, Composition::Text("1".into()));
    }

    #[test]
    fn cell_kinds_follow_name_shape() {
        let model = DisplayModel::new(
            String::new(),
            vec![
                TrayEntry::workspace("1", true),
                TrayEntry::workspace("web", false),
                TrayEntry::workspace("mail", true),
                TrayEntry::workspace("🦀", false),
            ],
            vec![
                ws("1", 1, true, false),
                ws("web", 1, false, false),
                ws("mail", 1, false, false),
                ws("🦀", 1, false, false),
            ],
            monitors(&[1]),
        );
        assert_eq!(
            contents(&composer().compose(&model)),
            vec![
                (icon("1", IconShape::SquareFill), 1.0),
                (CellContent::Badge { text: "web".into(), filled: false }, 1.0),
                (CellContent::Badge { text: "mail".into(), filled: true }, 1.0),
                (CellContent::Glyph("🦀".into()), 1.0),
            ]
        );
    }

    #[test]
    fn mode_cell_is_followed_by_colon() {
        let model = DisplayModel::new(
            "[R] 1".into(),
            vec![TrayEntry::mode("R"), TrayEntry::workspace("1", true)],
            vec![ws("1", 1, true, false)],
            monitors(&[1]),
        );
        assert_eq!(
            contents(&composer().compose(&model)),
            vec![
                (icon("r", IconShape::Circle), 1.0),
                (CellContent::Glyph(":".into()), 1.0),
                (icon("1", IconShape::SquareFill), 1.0),
            ]
        );
    }

    #[test]
    fn focused_empty_workspace_is_dimmed() {
        let model = DisplayModel::new(
            "3".into(),
            vec![TrayEntry::workspace("1", false), TrayEntry::workspace("3", true)],
            vec![ws("1", 1, false, false), ws("3", 1, true, true)],
            monitors(&[1]),
        );
        let opacities: Vec<f32> = contents(&composer().compose(&model)).into_iter().map(|(_, o)| o).collect();
        assert_eq!(opacities, vec![1.0, 0.6]);
    }

    #[test]
    fn mode_never_dims_even_if_workspace_shares_its_name() {
        let model = DisplayModel::new(
            String::new(),
            vec![TrayEntry::mode("S")],
            vec![ws("S", 1, true, true)],
            monitors(&[1]),
        );
        assert_eq!(contents(&composer().compose(&model))[0].1, 1.0);
    }

    #[test]
    fn other_monitors_follow_separators() {
        let model = DisplayModel::new(
            "*1 │ B │ X".into(),
            vec![TrayEntry::workspace("1", true)],
            vec![
                ws("1", 1, true, false),
                ws("c", 2, false, false),
                ws("B", 2, false, false),
                ws("D", 2, false, true),
                ws("X", 3, false, true),
            ],
            monitors(&[1, 2, 3]),
        );
        assert_eq!(
            contents(&composer().compose(&model)),
            vec![
                (icon("1", IconShape::SquareFill), 1.0),
                (CellContent::Glyph("|".into()), 0.6),
                (icon("b", IconShape::Square), 1.0),
                (icon("c", IconShape::Square), 1.0),
            ]
        );
    }

    #[test]
    fn focused_empty_workspace_on_second_monitor_is_shown_dimmed() {
        let model = DisplayModel::new(
            "1 │ *9".into(),
            vec![TrayEntry::workspace("1", false)],
            vec![ws("1", 1, false, false), ws("9", 2, true, true)],
            monitors(&[1, 2]),
        );
        let cells = contents(&composer().compose(&model));
        assert_eq!(
            cells[1..].to_vec(),
            vec![
                (CellContent::Glyph("|".into()), 0.6),
                (icon("9", IconShape::SquareFill), 0.6),
            ]
        );
    }

    #[test]
    fn text_backend_falls_back_to_summary() {
        let out = composer().render(&single_entry_model(), &TextBackend);
        assert!(out.is_text());
        assert_eq!(out, VisualOutput::Text("1".into()));
    }

    #[test]
    fn blank_raster_falls_back_to_summary() {
        let out = composer().render(&single_entry_model(), &Fixed(Ok(raster(0))));
        assert_eq!(out, VisualOutput::Text("1".into()));
    }

    #[test]
    fn raster_error_falls_back_to_summary() {
        let backend = Fixed(Err(TrayError::Render("no display".into())));
        let out = composer().render(&single_entry_model(), &backend);
        assert_eq!(out, VisualOutput::Text("1".into()));
    }

    #[test]
    fn non_blank_raster_is_used() {
        let out = composer().render(&single_entry_model(), &Fixed(Ok(raster(255))));
        assert_eq!(out, VisualOutput::Image(raster(255)));
    }
}
