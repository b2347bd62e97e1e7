//! Wayland layer-shell surface for `wmtray`.
//!
//! Owns the Iced application loop and wires together all background tasks:
//! - Snapshot file watcher (window-manager state published by the WM)
//! - Config file watcher (live reload on change)
//!
//! Snapshots are aggregated on the UI thread inside `update`, the same place
//! they are applied, so the display model is never built from a snapshot that
//! is being modified.

use futures::channel::mpsc::Sender;
use iced::{futures::SinkExt, widget::container, Element, Length, Subscription, Task};
use iced_layershell::{
    build_pattern::application,
    reexport::{Anchor, Layer},
    settings::{LayerShellSettings, Settings},
    to_layer_message,
};
use std::{path::PathBuf, time::Duration};
use tracing::{debug, info, warn};
use tray_config::{default_path, load as load_config, FileWatcher, Position, TrayConfig};
use tray_core::{event::Message as AppMessage, StatusPublisher, TrayError, WmSnapshot};
use tray_renderer::{Composer, SvgBackend};
use tray_status::StatusAggregator;
use tray_theme::Theme;
use tray_widgets::TrayWidget;

// ── Entry point ───────────────────────────────────────────────────────────────

/// Start the tray surface.  Never returns under normal operation.
pub fn run() -> iced_layershell::Result {
    let config = load_config(default_path()).unwrap_or_default();
    let height = config.global.height;
    let anchor = position_to_anchor(config.global.position);
    let exclusive_zone = if config.global.exclusive_zone {
        height as i32
    } else {
        0
    };

    application(Tray::new, Tray::namespace, Tray::update, Tray::view)
        .subscription(Tray::subscription)
        .style(Tray::style)
        .settings(Settings {
            layer_settings: LayerShellSettings {
                size: Some((0, height)), // width=0 + L|R anchor = full-width stretch
                exclusive_zone,
                anchor,
                layer: Layer::Top,
                ..Default::default()
            },
            ..Default::default()
        })
        .run()
}

// ── Message ───────────────────────────────────────────────────────────────────

/// Top-level application messages.
///
/// `#[to_layer_message]` injects layer-shell control variants (AnchorChange,
/// SizeChange, etc.).  Those are handled by the backend and never reach
/// `update()`.
#[to_layer_message]
#[derive(Debug, Clone)]
pub enum Message {
    /// Propagate a core event-bus message.
    App(AppMessage),
}

// ── State ─────────────────────────────────────────────────────────────────────

struct Tray {
    config:     TrayConfig,
    theme:      Theme,
    aggregator: StatusAggregator,
    composer:   Composer,
    backend:    SvgBackend,
    publisher:  StatusPublisher,
    /// Last snapshot received, kept so a config reload can re-render.
    snapshot:   Option<WmSnapshot>,
    widget:     TrayWidget,
}

impl Tray {
    fn new() -> (Self, Task<Message>) {
        let config = load_config(default_path()).unwrap_or_default();
        let theme  = Theme::from_config(&config.theme);

        let tray = Self {
            aggregator: StatusAggregator::new(&config),
            composer:   Composer::new(&config),
            backend:    SvgBackend::probe(&config, &theme),
            publisher:  StatusPublisher::new(),
            snapshot:   None,
            widget:     TrayWidget::new(text_family(&config, &theme), content_height(&config, &theme)),
            config,
            theme,
        };
        log_strategy(&tray.backend);

        // Load whatever snapshot is already on disk so the tray isn't blank
        // until the WM writes the next one.
        let path = tray.config.global.snapshot_path();
        let init_task = Task::perform(
            read_snapshot(path),
            |result| match result {
                Ok(snapshot) => Message::App(AppMessage::SnapshotUpdated(snapshot)),
                Err(e) => {
                    warn!("Initial snapshot load failed: {e}");
                    Message::App(AppMessage::Noop)
                }
            },
        );

        (tray, init_task)
    }

    fn namespace() -> String {
        String::from("wmtray")
    }

    // ── Update ────────────────────────────────────────────────────────────────

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::App(msg) => self.handle_app(msg),
            // Layer-shell injected variants handled by the backend.
            _ => Task::none(),
        }
    }

    fn handle_app(&mut self, msg: AppMessage) -> Task<Message> {
        match msg {
            AppMessage::SnapshotUpdated(snapshot) => {
                self.snapshot = Some(snapshot);
                self.refresh(false);
            }
            AppMessage::ConfigReloaded => {
                match load_config(default_path()) {
                    Ok(cfg) => {
                        info!("Config reloaded");
                        self.apply_config(cfg);
                        self.refresh(true);
                    }
                    Err(e) => warn!("Config reload failed: {e}"),
                }
            }
            AppMessage::Noop => {}
        }
        Task::none()
    }

    /// Rebuild the display model from the last snapshot, publish it, and
    /// re-render.  Rendering is skipped when the model is unchanged unless
    /// `force` is set (presentation settings changed).
    fn refresh(&mut self, force: bool) {
        let Some(snapshot) = &self.snapshot else {
            return;
        };
        let changed = self.publisher.publish(self.aggregator.refresh(snapshot));
        if !changed && !force {
            return;
        }
        let model = self.publisher.current();
        let output = self.composer.render(&model, &self.backend);
        debug!("Tray refreshed as {}", if output.is_text() { "text" } else { "image" });
        self.widget.set_model(&model);
        self.widget.set_output(output);
    }

    fn apply_config(&mut self, config: TrayConfig) {
        self.theme      = Theme::from_config(&config.theme);
        self.aggregator = StatusAggregator::new(&config);
        self.composer   = Composer::new(&config);
        self.backend    = SvgBackend::probe(&config, &self.theme);
        self.widget.set_style(
            text_family(&config, &self.theme),
            content_height(&config, &self.theme),
        );
        self.config     = config;
        log_strategy(&self.backend);
    }

    // ── View ──────────────────────────────────────────────────────────────────

    fn view(&self) -> Element<'_, Message> {
        let tray = self.widget.view(&self.theme).map(Message::App);

        container(tray)
            .padding(self.theme.padding)
            .width(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    // ── Subscriptions ─────────────────────────────────────────────────────────

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            Subscription::run(snapshot_stream),
            Subscription::run(config_stream),
        ])
    }

    // ── Style ─────────────────────────────────────────────────────────────────

    fn style(&self, _theme: &iced::Theme) -> iced::theme::Style {
        let bg = self.theme.background.with_alpha(self.config.global.opacity);
        iced::theme::Style {
            background_color: bg.to_iced(),
            text_color: self.theme.foreground.to_iced(),
        }
    }
}

// ── Subscription streams ──────────────────────────────────────────────────────
//
// Each free function acts as both the stream builder AND the unique identity
// key for `Subscription::run(fn_ptr)`.

/// Watches the snapshot file and forwards every successfully parsed snapshot.
/// A snapshot caught mid-write fails to parse and is skipped; the next write
/// event delivers the complete one.
fn snapshot_stream() -> impl iced::futures::Stream<Item = Message> {
    iced::stream::channel(4, |mut sender: Sender<Message>| async move {
        let path = load_config(default_path()).unwrap_or_default().global.snapshot_path();
        let (watcher, mut rx) = FileWatcher::spawn(&path);

        while rx.recv().await.is_some() {
            match WmSnapshot::load(watcher.path()) {
                Ok(snapshot) => {
                    let msg = Message::App(AppMessage::SnapshotUpdated(snapshot));
                    if sender.send(msg).await.is_err() {
                        break;
                    }
                }
                Err(e) => warn!("Skipping unreadable snapshot: {e}"),
            }
        }

        loop {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    })
}

/// Watches `~/.config/wmtray/wmtray.toml` for writes and sends `ConfigReloaded`.
fn config_stream() -> impl iced::futures::Stream<Item = Message> {
    iced::stream::channel(1, |mut sender: Sender<Message>| async move {
        let (_watcher, mut rx) = FileWatcher::spawn(default_path());

        while rx.recv().await.is_some() {
            let _ = sender.try_send(Message::App(AppMessage::ConfigReloaded));
        }

        loop {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
    })
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn position_to_anchor(pos: Position) -> Anchor {
    match pos {
        Position::Top    => Anchor::Top    | Anchor::Left | Anchor::Right,
        Position::Bottom => Anchor::Bottom | Anchor::Left | Anchor::Right,
    }
}

/// Read and parse the snapshot without blocking the runtime.
async fn read_snapshot(path: PathBuf) -> tray_core::Result<WmSnapshot> {
    match tokio::fs::read_to_string(&path).await {
        Ok(raw) => WmSnapshot::from_json(&raw),
        Err(e) => Err(TrayError::Snapshot(format!("cannot read '{}': {e}", path.display()))),
    }
}

fn log_strategy(backend: &SvgBackend) {
    if backend.has_image_support() {
        info!("Render strategy: image");
    } else {
        info!("Render strategy: text");
    }
}

/// Face for the text output, as selected by the display style.
fn text_family<'a>(config: &TrayConfig, theme: &'a Theme) -> &'a str {
    theme.font_family(config.tray.display_style.is_monospaced())
}

/// Height available to the tray inside the surface padding.
fn content_height(config: &TrayConfig, theme: &Theme) -> f32 {
    (config.global.height as f32 - 2.0 * f32::from(theme.padding)).max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tray_config::DisplayStyle;

    #[tokio::test]
    async fn reads_snapshot_from_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("snapshot.json");
        std::fs::write(&path, r#"{"focused_workspace": "2", "mode": "main"}"#).unwrap();

        let snapshot = read_snapshot(path).await.unwrap();
        assert_eq!(snapshot.focused_workspace.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn missing_snapshot_is_a_snapshot_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = read_snapshot(tmp.path().join("absent.json")).await.unwrap_err();
        assert!(matches!(err, TrayError::Snapshot(_)));
    }

    #[test]
    fn text_face_follows_display_style() {
        let mut config = TrayConfig::default();
        let theme = Theme::from_config(&config.theme);

        config.tray.display_style = DisplayStyle::MonospacedText;
        assert_eq!(text_family(&config, &theme), "JetBrains Mono");

        config.tray.display_style = DisplayStyle::SystemText;
        assert_eq!(text_family(&config, &theme), "Inter");
    }

    #[test]
    fn content_fits_inside_padding() {
        let config = TrayConfig::default();
        let theme = Theme::from_config(&config.theme);
        assert_eq!(content_height(&config, &theme), 24.0);
    }
}
