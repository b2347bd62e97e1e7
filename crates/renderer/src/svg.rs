use crate::backend::{Raster, Rasterizer};
use crate::composer::{Cell, CellContent};
use resvg::{tiny_skia, usvg};
use std::fmt::Write as _;
use tracing::debug;
use tray_config::TrayConfig;
use tray_core::{Result, TrayError};
use tray_icons::{IconId, IconShape};
use tray_theme::Theme;

/// Label size relative to the cell edge.
const LABEL_SCALE: f32 = 0.62;
/// Rough advance of one glyph relative to the font size.
const ADVANCE: f32 = 0.62;
/// Advance of a wide (pictographic) glyph relative to the font size.
const WIDE_ADVANCE: f32 = 1.25;

/// Geometry and paint shared by every cell.
#[derive(Debug, Clone)]
struct CellStyle {
    size:        f32,
    spacing:     f32,
    border:      f32,
    padding:     f32,
    radius:      f32,
    scale:       f32,
    foreground:  String,
    /// Paint for filled (active) boxes.
    accent:      String,
    font_family: String,
}

/// Lays cells out as an SVG document and rasterises it with `resvg`.
pub struct SvgRasterizer {
    style:   CellStyle,
    options: usvg::Options<'static>,
}

impl SvgRasterizer {
    /// Rasteriser with the host's installed fonts loaded.
    pub fn with_system_fonts(config: &TrayConfig, theme: &Theme) -> Self {
        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();
        Self::with_options(config, theme, options)
    }

    pub fn with_options(config: &TrayConfig, theme: &Theme, options: usvg::Options<'static>) -> Self {
        let tray = &config.tray;
        Self {
            style: CellStyle {
                size:        tray.item_size,
                spacing:     tray.item_spacing,
                border:      tray.item_border,
                padding:     tray.item_padding,
                radius:      tray.corner_radius,
                scale:       tray.raster_scale.max(0.1),
                foreground:  theme.foreground.to_svg_hex(),
                accent:      theme.accent.to_svg_hex(),
                font_family: theme.font_family(tray.display_style.is_monospaced()).to_string(),
            },
            options,
        }
    }

    pub fn font_count(&self) -> usize {
        self.options.fontdb.len()
    }

    /// SVG document for `cells`, in logical pixels.
    pub fn to_svg(&self, cells: &[Cell]) -> String {
        let s = &self.style;
        let widths: Vec<f32> = cells.iter().map(|c| self.cell_width(&c.content)).collect();
        let gaps = s.spacing * cells.len().saturating_sub(1) as f32;
        let total = widths.iter().sum::<f32>() + gaps;

        let mut body = String::new();
        let mut x = 0.0;
        for (i, (cell, width)) in cells.iter().zip(&widths).enumerate() {
            let mut group = String::new();
            self.draw_cell(&mut group, i, &cell.content, x, *width);
            if cell.opacity < 1.0 {
                let _ = write!(body, r#"<g opacity="{:.2}">{group}</g>"#, cell.opacity.clamp(0.0, 1.0));
            } else {
                body.push_str(&group);
            }
            x += width + s.spacing;
        }

        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{total:.1}" height="{size:.1}" viewBox="0 0 {total:.1} {size:.1}" font-family="{font}" font-weight="bold">{body}</svg>"#,
            size = s.size,
            font = escape(&s.font_family),
        )
    }

    fn cell_width(&self, content: &CellContent) -> f32 {
        let s = &self.style;
        let font_size = s.size * LABEL_SCALE;
        match content {
            CellContent::Icon(_) => s.size,
            CellContent::Glyph(text) => text_advance(text, font_size).max(font_size * 0.5),
            CellContent::Badge { text, .. } => {
                (text_advance(text, font_size) + 2.0 * s.padding).max(s.size)
            }
        }
    }

    fn draw_cell(&self, out: &mut String, index: usize, content: &CellContent, x: f32, width: f32) {
        let s = &self.style;
        let font_size = s.size * LABEL_SCALE;
        match content {
            CellContent::Glyph(text) => {
                self.label(out, text, x + width / 2.0, font_size, &s.foreground);
            }
            CellContent::Icon(IconId { key, shape: IconShape::Circle }) => {
                let r = (s.size - s.border) / 2.0;
                let _ = write!(
                    out,
                    r#"<circle cx="{cx:.1}" cy="{cy:.1}" r="{r:.1}" fill="none" stroke="{fg}" stroke-width="{bw:.1}"/>"#,
                    cx = x + s.size / 2.0,
                    cy = s.size / 2.0,
                    fg = s.foreground,
                    bw = s.border,
                );
                self.label(out, key, x + s.size / 2.0, font_size * 0.8, &s.foreground);
            }
            CellContent::Icon(IconId { key, shape }) => {
                let filled = *shape == IconShape::SquareFill;
                self.badge(out, index, key, x, s.size, filled, font_size * 0.8);
            }
            CellContent::Badge { text, filled } => {
                self.badge(out, index, text, x, width, *filled, font_size);
            }
        }
    }

    /// Rounded box with a centred label.  The filled variant cuts the label
    /// out of the box so the background shows through.
    #[allow(clippy::too_many_arguments)]
    fn badge(&self, out: &mut String, index: usize, text: &str, x: f32, width: f32, filled: bool, font_size: f32) {
        let s = &self.style;
        let cx = x + width / 2.0;
        if filled {
            let _ = write!(out, r#"<mask id="knockout{index}">"#);
            self.rect(out, x, width, 0.0, "white", false);
            self.label(out, text, cx, font_size, "black");
            let _ = write!(out, "</mask>");
            let _ = write!(
                out,
                r#"<rect x="{x:.1}" y="0" width="{width:.1}" height="{h:.1}" rx="{r:.1}" fill="{fill}" mask="url(#knockout{index})"/>"#,
                h = s.size,
                r = s.radius,
                fill = s.accent,
            );
        } else {
            let inset = s.border / 2.0;
            self.rect(out, x, width, inset, &s.foreground, true);
            self.label(out, text, cx, font_size, &s.foreground);
        }
    }

    fn rect(&self, out: &mut String, x: f32, width: f32, inset: f32, paint: &str, stroked: bool) {
        let s = &self.style;
        let geometry = format!(
            r#"x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" rx="{:.1}""#,
            x + inset,
            inset,
            (width - 2.0 * inset).max(0.0),
            (s.size - 2.0 * inset).max(0.0),
            s.radius,
        );
        let _ = if stroked {
            write!(
                out,
                r#"<rect {geometry} fill="none" stroke="{paint}" stroke-width="{:.1}"/>"#,
                s.border
            )
        } else {
            write!(out, r#"<rect {geometry} fill="{paint}"/>"#)
        };
    }

    fn label(&self, out: &mut String, text: &str, cx: f32, font_size: f32, paint: &str) {
        let _ = write!(
            out,
            r#"<text x="{cx:.1}" y="{cy:.1}" font-size="{font_size:.1}" text-anchor="middle" dominant-baseline="central" fill="{paint}">{}</text>"#,
            escape(text),
            cy = self.style.size / 2.0,
        );
    }
}

impl Rasterizer for SvgRasterizer {
    fn rasterize(&self, cells: &[Cell]) -> Result<Raster> {
        let svg = self.to_svg(cells);
        let tree = usvg::Tree::from_str(&svg, &self.options)
            .map_err(|e| TrayError::Render(format!("SVG parse error: {e}")))?;

        let scale = self.style.scale;
        let size = tree.size().to_int_size();
        let width = (size.width() as f32 * scale).ceil() as u32;
        let height = (size.height() as f32 * scale).ceil() as u32;
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| TrayError::Render(format!("cannot allocate {width}x{height} pixmap")))?;

        resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pixmap.as_mut());

        let pixels = pixmap
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        debug!("Rasterized {} cells into {width}x{height}", cells.len());
        Ok(Raster { width, height, scale, pixels })
    }
}

fn text_advance(text: &str, font_size: f32) -> f32 {
    text.chars()
        .map(|c| if (c as u32) >= 0x1F000 { WIDE_ADVANCE } else { ADVANCE })
        .sum::<f32>()
        * font_size
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&'  => out.push_str("&amp;"),
            '<'  => out.push_str("&lt;"),
            '>'  => out.push_str("&gt;"),
            '"'  => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _    => out.push(c),
        }
    }
    out
}
