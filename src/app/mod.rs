// SPDX-License-Identifier: MPL-2.0

//! Main application module for Rotissomat
//!
//! This module contains the application state, message handling, UI rendering,
//! and the preview subscription.
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, ContextPage)
//! - `update`: Message dispatch
//! - `handlers`: Message handlers grouped by domain
//! - `view`: Main view rendering and the Info drawer
//! - `mask_widget`: Circular preview mask

mod handlers;
mod mask_widget;
mod state;
mod update;
mod view;

use crate::backends::camera::pipewire::PipeWirePipeline;
use crate::backends::camera::{self, authorization};
use crate::config::Config;
use crate::constants::{pipeline, timing};
use crate::fl;
use crate::screen::{CameraScreen, Hardware};
use cosmic::app::context_drawer;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
pub use state::{AppModel, ContextPage, Message};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const REPOSITORY: &str = "https://github.com/cosmic-utils/rotissomat";
const APP_ICON: &[u8] =
    include_bytes!("../../resources/icons/hicolor/scalable/apps/io.github.cosmic_utils.Rotissomat.svg");

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.cosmic_utils.Rotissomat";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_svg_bytes(APP_ICON))
            .version(env!("GIT_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        // Load configuration
        let (config_handler, config) =
            match cosmic_config::Config::new(Self::APP_ID, Config::VERSION) {
                Ok(handler) => {
                    let config = match Config::get_entry(&handler) {
                        Ok(config) => config,
                        Err((errors, config)) => {
                            error!(?errors, "Errors loading config");
                            config
                        }
                    };
                    (Some(handler), config)
                }
                Err(err) => {
                    error!(%err, "Failed to create config handler");
                    (None, Config::default())
                }
            };

        // GStreamer must be initialized before the first pipeline is built
        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        let screen = CameraScreen::new(&config, Hardware::detect());
        info!(facing = %screen.facing(), has_torch = screen.has_torch(), "Camera screen ready");

        let app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            config_handler,
            screen,
            backend: camera::get_backend(),
            available_cameras: Vec::new(),
            preview: None,
            ghost_image: None,
        };

        let authorization_task = Task::perform(authorization::authorization_status(), |status| {
            cosmic::Action::App(Message::AuthorizationChecked(status))
        });

        (app, authorization_task)
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        self.header_buttons()
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
            ContextPage::Info => self.info_view(),
        })
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        Subscription::batch([config_sub, self.preview_subscription()])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}

impl AppModel {
    /// Preview pipeline of the running session.
    ///
    /// The subscription is keyed by the session token, so rebuilding the
    /// session drops the old pipeline and starts a new one. Every frame is
    /// tagged with the token it was produced for.
    fn preview_subscription(&self) -> Subscription<Message> {
        use cosmic::iced::futures::{SinkExt, StreamExt};

        let Some(session) = self.screen.session().filter(|s| s.is_running()) else {
            return Subscription::none();
        };
        let Some(input) = session.input().cloned() else {
            return Subscription::none();
        };
        let token = session.token();

        Subscription::run_with_id(
            ("camera-session", token.value()),
            cosmic::iced::stream::channel(
                pipeline::MESSAGE_CHANNEL_CAPACITY,
                move |mut output| async move {
                    info!(%token, device = %input.device.name, "Preview subscription started");

                    let (sender, mut receiver) =
                        cosmic::iced::futures::channel::mpsc::channel(pipeline::FRAME_CHANNEL_CAPACITY);

                    let pipeline = match PipeWirePipeline::new(&input, sender) {
                        Ok(pipeline) => pipeline,
                        Err(e) => {
                            error!(%token, error = %e, "Failed to initialize preview pipeline");
                            let _ = output.send(Message::PreviewFailed(token, e.to_string())).await;
                            return;
                        }
                    };

                    let mut frame_count = 0u64;
                    loop {
                        if output.is_closed() {
                            info!(%token, "Output channel closed - preview subscription cancelled");
                            break;
                        }

                        // Poll with a timeout so a cancelled subscription is noticed promptly
                        match tokio::time::timeout(
                            tokio::time::Duration::from_millis(timing::FRAME_POLL_MS),
                            receiver.next(),
                        )
                        .await
                        {
                            Ok(Some(frame)) => {
                                frame_count += 1;
                                if frame_count % timing::FRAME_LOG_INTERVAL == 0 {
                                    debug!(
                                        %token,
                                        frame = frame_count,
                                        width = frame.width,
                                        height = frame.height,
                                        latency_ms = frame.captured_at.elapsed().as_secs_f64() * 1000.0,
                                        "Received frame from pipeline"
                                    );
                                }

                                // Dropping frames is fine for live preview
                                if let Err(e) = output.try_send(Message::CameraFrame(token, Arc::new(frame))) {
                                    if e.is_disconnected() {
                                        info!(%token, "Output channel disconnected");
                                        break;
                                    }
                                    debug!(%token, frame = frame_count, "Frame dropped (UI busy)");
                                }
                            }
                            Ok(None) => {
                                warn!(%token, "Preview frame stream ended");
                                let _ = output
                                    .send(Message::PreviewFailed(token, "frame stream ended".to_string()))
                                    .await;
                                break;
                            }
                            Err(_) => continue,
                        }
                    }

                    info!(%token, frames = frame_count, "Cleaning up preview pipeline");
                    drop(pipeline);
                },
            ),
        )
    }
}
