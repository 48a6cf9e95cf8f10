// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! The preview fills the window above a row of three controls. The preview
//! stacks, bottom to top: the live frame, the ghost still, the circular mask,
//! the frosted transition overlay and the timer label. The whole preview is
//! the press-and-hold region.

use crate::app::mask_widget::MaskWidget;
use crate::app::state::{AppModel, ContextPage, Message};
use crate::constants::ui;
use crate::fl;
use crate::screen::Control;
use cosmic::Element;
use cosmic::app::context_drawer;
use cosmic::iced::{Alignment, Background, Border, Color, ContentFit, Length};
use cosmic::widget::{self, icon};

const GHOST_ON_ICON: &[u8] = include_bytes!("../../resources/button_icons/ghost-on.svg");
const GHOST_OFF_ICON: &[u8] = include_bytes!("../../resources/button_icons/ghost-off.svg");
const FLASH_ON_ICON: &[u8] = include_bytes!("../../resources/button_icons/flash-on.svg");
const FLASH_OFF_ICON: &[u8] = include_bytes!("../../resources/button_icons/flash-off.svg");
const SELFIE_ICON: &[u8] = include_bytes!("../../resources/button_icons/selfie.svg");
const REAR_ICON: &[u8] = include_bytes!("../../resources/button_icons/rear.svg");

/// Bundled SVG for a control icon name
fn control_icon(name: &str) -> icon::Handle {
    let bytes = match name {
        "ghost-on" => GHOST_ON_ICON,
        "ghost-off" => GHOST_OFF_ICON,
        "flash-on" => FLASH_ON_ICON,
        "flash-off" => FLASH_OFF_ICON,
        "selfie" => SELFIE_ICON,
        _ => REAR_ICON,
    };
    icon::from_svg_bytes(bytes).symbolic(true)
}

fn fill_layer<'a>(color: Color) -> Element<'a, Message> {
    widget::container(widget::Space::new(Length::Fill, Length::Fill))
        .width(Length::Fill)
        .height(Length::Fill)
        .style(move |_theme| widget::container::Style {
            background: Some(Background::Color(color)),
            ..Default::default()
        })
        .into()
}

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        widget::column()
            .push(self.build_preview())
            .push(self.build_controls())
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn build_preview(&self) -> Element<'_, Message> {
        let frame: Element<'_, Message> = match &self.preview {
            Some(handle) => widget::image(handle.clone())
                .content_fit(ContentFit::Cover)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            // Blank until a session delivers (or forever if access was refused)
            None => fill_layer(Color::BLACK),
        };

        let mut layers = cosmic::iced::widget::stack![frame];

        if let Some(ghost) = &self.ghost_image {
            layers = layers.push(
                widget::image(ghost.clone())
                    .content_fit(ContentFit::Cover)
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .opacity(self.screen.ghost().opacity()),
            );
        }

        layers = layers.push(MaskWidget::new(
            self.screen.mask_radius_ratio(),
            self.screen.overlay_alpha(),
        ));

        if self.screen.transition_visible() {
            layers = layers.push(fill_layer(Color::from_rgba(
                0.0,
                0.0,
                0.0,
                ui::TRANSITION_OVERLAY_ALPHA,
            )));
        }

        layers = layers.push(self.build_timer_label());

        widget::mouse_area(layers.width(Length::Fill).height(Length::Fill))
            .on_press(Message::HoldPressed)
            .on_release(Message::HoldReleased)
            .on_exit(Message::HoldReleased)
            .into()
    }

    fn build_timer_label(&self) -> Element<'_, Message> {
        let timer = self.screen.timer();
        let [r, g, b] = timer.color().rgb();

        let label = widget::container(
            widget::text(timer.label().to_string()).size(ui::TIMER_LABEL_TEXT_SIZE),
        )
        .padding([4, 12])
        .style(move |_theme| widget::container::Style {
            text_color: Some(Color::from_rgb(r, g, b)),
            background: Some(Background::Color(Color::from_rgba(
                0.0,
                0.0,
                0.0,
                ui::TIMER_BACKING_ALPHA,
            ))),
            border: Border {
                radius: ui::TIMER_LABEL_RADIUS.into(),
                ..Default::default()
            },
            ..Default::default()
        });

        widget::container(label)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(cosmic::theme::spacing().space_m)
            .align_x(cosmic::iced::alignment::Horizontal::Center)
            .align_y(cosmic::iced::alignment::Vertical::Top)
            .into()
    }

    fn build_control(&self, control: Control, message: Message) -> Element<'_, Message> {
        let name = match control {
            Control::Ghost => self.screen.ghost().state().icon_name(),
            Control::Flash => self.screen.flash().icon_name(),
            Control::Mode => self.screen.mode_icon_name(),
        };
        let size = (f32::from(ui::CONTROL_ICON_SIZE) * self.screen.scale(control)).round() as u16;
        // Reserve the scaled-up size so the row does not shift while animating
        let slot = (f32::from(ui::CONTROL_ICON_SIZE) * ui::PRESS_SCALE).ceil();

        widget::container(
            widget::button::custom(widget::icon(control_icon(name)).size(size))
                .on_press(message)
                .class(cosmic::theme::Button::Icon),
        )
        .width(Length::Fixed(slot))
        .height(Length::Fixed(slot))
        .align_x(cosmic::iced::alignment::Horizontal::Center)
        .align_y(cosmic::iced::alignment::Vertical::Center)
        .into()
    }

    fn build_controls(&self) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        widget::container(
            widget::row()
                .push(self.build_control(Control::Ghost, Message::GhostPressed))
                .push(self.build_control(Control::Flash, Message::FlashPressed))
                .push(self.build_control(Control::Mode, Message::ModePressed))
                .spacing(ui::CONTROL_SPACING)
                .align_y(Alignment::Center),
        )
        .width(Length::Fill)
        .padding(spacing.space_s)
        .align_x(cosmic::iced::alignment::Horizontal::Center)
        .into()
    }

    /// Info drawer: the screen's current state
    pub fn info_view(&self) -> context_drawer::ContextDrawer<'_, Message> {
        let spacing = cosmic::theme::spacing();
        let unknown = || fl!("info-none");

        let device = self
            .screen
            .current_device()
            .map(|device| device.name.clone())
            .unwrap_or_else(unknown);
        let session = self
            .screen
            .session()
            .map(|session| format!("{} ({:?})", session.token(), session.state()))
            .unwrap_or_else(unknown);
        let authorization = self
            .screen
            .authorization()
            .map(|status| status.to_string())
            .unwrap_or_else(unknown);
        let torch = if self.screen.has_torch() {
            fl!("info-yes")
        } else {
            fl!("info-no")
        };

        let rows = [
            (fl!("info-facing"), self.screen.facing().to_string()),
            (fl!("info-device"), device),
            (fl!("info-cameras"), self.available_cameras.len().to_string()),
            (fl!("info-session"), session),
            (fl!("info-authorization"), authorization),
            (fl!("info-torch"), torch),
            (
                fl!("info-flash-mechanism"),
                format!("{:?}", self.screen.flash_mechanism()),
            ),
            (fl!("info-elapsed"), self.screen.timer().label().to_string()),
        ];

        let mut column = widget::column();
        for (title, value) in rows {
            column = column
                .push(widget::text(title).size(16).font(cosmic::font::bold()))
                .push(widget::vertical_space().height(spacing.space_xxs))
                .push(widget::text(value))
                .push(widget::vertical_space().height(spacing.space_s));
        }

        context_drawer::context_drawer(column, Message::ToggleContextPage(ContextPage::Info))
            .title(fl!("info"))
    }

    /// Header buttons opening the Info and About drawers
    pub fn header_buttons(&self) -> Vec<Element<'_, Message>> {
        vec![
            widget::button::icon(icon::from_name("dialog-information-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::Info))
                .into(),
            widget::button::icon(icon::from_name("help-about-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::About))
                .into(),
        ]
    }
}
