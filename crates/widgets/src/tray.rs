use iced::{
    widget::{image, text, tooltip},
    Element, Font, Length,
};
use tray_core::{event::Message, DisplayModel};
use tray_renderer::VisualOutput;
use tray_theme::Theme;

/// Gap between workspaces in the occupancy tooltip.
const DETAIL_SEPARATOR: &str = "   ";

/// Shows the tray summary: the rasterised cell image when one was produced,
/// otherwise the summary text.
///
/// The image is rendered at `raster_scale` and drawn at its logical size,
/// shrunk proportionally when taller than `max_height`.  Hovering shows each
/// workspace with its occupants beside the tray.
#[derive(Debug)]
pub struct TrayWidget {
    family:     String,
    font:       Font,
    max_height: f32,
    content:    Content,
    details:    String,
}

/// Output converted once per refresh, so redraws reuse the uploaded image.
#[derive(Debug)]
enum Content {
    Image {
        handle: image::Handle,
        width:  f32,
        height: f32,
    },
    Text(String),
}

impl TrayWidget {
    /// `font_family` is the face used for the text output.
    pub fn new(font_family: &str, max_height: f32) -> Self {
        Self {
            family: font_family.to_string(),
            font: named_font(font_family),
            max_height,
            content: Content::Text(String::new()),
            details: String::new(),
        }
    }

    /// Replace what the widget shows.
    pub fn set_output(&mut self, output: VisualOutput) {
        self.content = match output {
            VisualOutput::Image(raster) => {
                let (width, height) = raster.logical_size();
                let fit = if height > self.max_height && height > 0.0 {
                    self.max_height / height
                } else {
                    1.0
                };
                Content::Image {
                    handle: image::Handle::from_rgba(raster.width, raster.height, raster.pixels),
                    width:  width * fit,
                    height: height * fit,
                }
            }
            VisualOutput::Text(summary) => Content::Text(summary),
        };
    }

    /// Refresh the hover details from the published model.
    pub fn set_model(&mut self, model: &DisplayModel) {
        self.details = occupancy_line(model);
    }

    pub fn set_style(&mut self, font_family: &str, max_height: f32) {
        if self.family != font_family {
            self.family = font_family.to_string();
            self.font = named_font(font_family);
        }
        self.max_height = max_height;
    }

    pub fn view<'a>(&'a self, theme: &'a Theme) -> Element<'a, Message> {
        let content: Element<'a, Message> = match &self.content {
            Content::Image { handle, width, height } => image(handle.clone())
                .width(Length::Fixed(*width))
                .height(Length::Fixed(*height))
                .into(),
            Content::Text(summary) => text(summary.as_str())
                .size(theme.font_size)
                .font(self.font)
                .color(theme.foreground.to_iced())
                .into(),
        };

        if self.details.is_empty() {
            return content;
        }

        // Beside the tray rather than below it: the surface is one bar high.
        let details = text(self.details.as_str())
            .size(theme.font_size)
            .font(self.font)
            .color(theme.foreground.to_iced());
        tooltip(content, details, tooltip::Position::Right)
            .gap(f32::from(theme.padding))
            .into()
    }
}

/// `"1 - kitty   2 - HDMI-1"`: every workspace that has an occupant label,
/// in model order.
fn occupancy_line(model: &DisplayModel) -> String {
    model
        .workspaces()
        .iter()
        .filter(|ws| !ws.occupant_label.is_empty())
        .map(|ws| format!("{}{}", ws.name, ws.occupant_label))
        .collect::<Vec<_>>()
        .join(DETAIL_SEPARATOR)
}

/// iced resolves fonts by a `'static` family name.  Only called when the
/// configured family changes, so the leak is bounded by config reloads.
fn named_font(family: &str) -> Font {
    Font::with_name(Box::leak(family.to_string().into_boxed_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tray_core::{MonitorSummary, WorkspaceSummary};
    use tray_renderer::Raster;

    fn raster(width: u32, height: u32, scale: f32) -> VisualOutput {
        VisualOutput::Image(Raster {
            width,
            height,
            scale,
            pixels: vec![255; (width * height * 4) as usize],
        })
    }

    fn image_size(widget: &TrayWidget) -> Option<(f32, f32)> {
        match widget.content {
            Content::Image { width, height, .. } => Some((width, height)),
            Content::Text(_) => None,
        }
    }

    fn summary(name: &str, occupant_label: &str) -> WorkspaceSummary {
        WorkspaceSummary {
            name: name.into(),
            occupant_label: occupant_label.into(),
            monitor_id: 1,
            is_focused: false,
            is_effectively_empty: occupant_label.is_empty(),
            is_visible: false,
        }
    }

    #[test]
    fn image_is_drawn_at_logical_size() {
        let mut widget = TrayWidget::new("Inter", 40.0);
        widget.set_output(raster(80, 40, 2.0));
        assert_eq!(image_size(&widget), Some((40.0, 20.0)));
    }

    #[test]
    fn tall_images_shrink_to_fit() {
        let mut widget = TrayWidget::new("Inter", 20.0);
        widget.set_output(raster(160, 80, 2.0));
        assert_eq!(image_size(&widget), Some((40.0, 20.0)));
    }

    #[test]
    fn text_output_replaces_image() {
        let mut widget = TrayWidget::new("JetBrains Mono", 20.0);
        widget.set_output(raster(2, 2, 1.0));
        widget.set_output(VisualOutput::Text("1 │ 2".into()));
        assert!(matches!(&widget.content, Content::Text(s) if s == "1 │ 2"));
    }

    #[test]
    fn text_uses_the_configured_family() {
        let mut widget = TrayWidget::new("JetBrains Mono", 20.0);
        assert_eq!(widget.font, Font::with_name("JetBrains Mono"));

        widget.set_style("Inter", 20.0);
        assert_eq!(widget.font, Font::with_name("Inter"));
        assert_ne!(widget.font, Font::MONOSPACE);
    }

    #[test]
    fn details_list_occupied_and_visible_workspaces() {
        let model = DisplayModel::new(
            "1".into(),
            vec![],
            vec![
                summary("1", " - firefox, kitty"),
                summary("2", ""),
                summary("3", " - HDMI-1"),
            ],
            vec![MonitorSummary { monitor_id: 1, name: "HDMI-1".into() }],
        );
        let mut widget = TrayWidget::new("Inter", 20.0);
        widget.set_model(&model);
        assert_eq!(widget.details, "1 - firefox, kitty   3 - HDMI-1");
    }

    #[test]
    fn no_details_without_occupants() {
        let model = DisplayModel::new("1".into(), vec![], vec![summary("1", "")], vec![]);
        let mut widget = TrayWidget::new("Inter", 20.0);
        widget.set_model(&model);
        assert!(widget.details.is_empty());
    }
}
