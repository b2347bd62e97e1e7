use crate::composer::Cell;
use crate::svg::SvgRasterizer;
use tracing::info;
use tray_config::TrayConfig;
use tray_core::Result;
use tray_theme::Theme;

/// RGBA8 image with straight alpha, `width * height * 4` bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub width:  u32,
    pub height: u32,
    /// Physical pixels per logical pixel.
    pub scale:  f32,
    pub pixels: Vec<u8>,
}

impl Raster {
    /// `true` when nothing visible was drawn.
    pub fn is_blank(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Size in logical pixels.
    pub fn logical_size(&self) -> (f32, f32) {
        (self.width as f32 / self.scale, self.height as f32 / self.scale)
    }
}

/// Draws a run of cells into an image.
pub trait Rasterizer {
    fn rasterize(&self, cells: &[Cell]) -> Result<Raster>;
}

/// A render target.  Text output is always available; image output is an
/// optional capability discovered at runtime.
pub trait RenderBackend {
    /// The image capability, or `None` when this host cannot produce images.
    fn rasterizer(&self) -> Option<&dyn Rasterizer>;
}

/// Backend without image support.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextBackend;

impl RenderBackend for TextBackend {
    fn rasterizer(&self) -> Option<&dyn Rasterizer> {
        None
    }
}

/// Backend that rasterises through SVG when fonts are available.
#[derive(Default)]
pub struct SvgBackend {
    rasterizer: Option<SvgRasterizer>,
}

impl SvgBackend {
    /// Probe the host for image support.  Without any system font face the
    /// tray would draw shapes with missing labels, so the capability is
    /// reported as absent instead.
    pub fn probe(config: &TrayConfig, theme: &Theme) -> Self {
        let rasterizer = SvgRasterizer::with_system_fonts(config, theme);
        if rasterizer.font_count() == 0 {
            info!("No system fonts found; tray will render as text");
            return Self { rasterizer: None };
        }
        info!("Tray image rendering enabled ({} font faces)", rasterizer.font_count());
        Self { rasterizer: Some(rasterizer) }
    }

    pub fn has_image_support(&self) -> bool {
        self.rasterizer.is_some()
    }
}

impl RenderBackend for SvgBackend {
    fn rasterizer(&self) -> Option<&dyn Rasterizer> {
        self.rasterizer.as_ref().map(|r| r as &dyn Rasterizer)
    }
}
