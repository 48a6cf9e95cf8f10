// SPDX-License-Identifier: MPL-2.0

//! Circular preview mask
//!
//! Draws a white surround (at the screen's overlay alpha) with a centred
//! circular hole, plus a thin guide ring at the hole's edge. The surround is a
//! single rounded quad whose border is wide enough to reach every corner of
//! the bounds; its inner edge is the hole.

use crate::screen::MaskGeometry;
use cosmic::iced::advanced::widget::Tree;
use cosmic::iced::advanced::{Layout, Widget, layout, mouse, renderer};
use cosmic::iced::{Border, Color, Element, Length, Rectangle, Size};
use cosmic::{Renderer, Theme};

const GUIDE_WIDTH: f32 = 2.0;
const GUIDE_ALPHA: f32 = 0.5;

pub struct MaskWidget {
    radius_ratio: f32,
    surround_alpha: f32,
}

impl MaskWidget {
    pub fn new(radius_ratio: f32, surround_alpha: f32) -> Self {
        Self {
            radius_ratio,
            surround_alpha,
        }
    }
}

/// Quad of a circle of `radius` at the mask centre, with a border of `width`
/// drawn outwards from the circle
fn ring_bounds(mask: &MaskGeometry, radius: f32, width: f32) -> Rectangle {
    let outer = radius + width;
    Rectangle {
        x: mask.center_x - outer,
        y: mask.center_y - outer,
        width: outer * 2.0,
        height: outer * 2.0,
    }
}

impl<Message> Widget<Message, Theme, Renderer> for MaskWidget {
    fn size(&self) -> Size<Length> {
        Size::new(Length::Fill, Length::Fill)
    }

    fn layout(
        &self,
        _tree: &mut Tree,
        _renderer: &Renderer,
        limits: &layout::Limits,
    ) -> layout::Node {
        layout::Node::new(limits.max())
    }

    fn draw(
        &self,
        _tree: &Tree,
        renderer: &mut Renderer,
        _theme: &Theme,
        _style: &renderer::Style,
        layout: Layout<'_>,
        _cursor: mouse::Cursor,
        _viewport: &Rectangle,
    ) {
        use cosmic::iced::advanced::Renderer as _;

        let bounds = layout.bounds();
        let mask = MaskGeometry::for_bounds(
            bounds.x,
            bounds.y,
            bounds.width,
            bounds.height,
            self.radius_ratio,
        );

        renderer.with_layer(bounds, |renderer| {
            if self.surround_alpha > 0.0 {
                let reach = bounds.width + bounds.height;
                renderer.fill_quad(
                    renderer::Quad {
                        bounds: ring_bounds(&mask, mask.radius, reach),
                        border: Border {
                            color: Color::from_rgba(1.0, 1.0, 1.0, self.surround_alpha),
                            width: reach,
                            radius: (mask.radius + reach).into(),
                        },
                        shadow: Default::default(),
                    },
                    Color::TRANSPARENT,
                );
            }

            renderer.fill_quad(
                renderer::Quad {
                    bounds: ring_bounds(&mask, mask.radius, GUIDE_WIDTH),
                    border: Border {
                        color: Color::from_rgba(1.0, 1.0, 1.0, GUIDE_ALPHA),
                        width: GUIDE_WIDTH,
                        radius: (mask.radius + GUIDE_WIDTH).into(),
                    },
                    shadow: Default::default(),
                },
                Color::TRANSPARENT,
            );
        });
    }
}

impl<'a, Message: 'a> From<MaskWidget> for Element<'a, Message, Theme, Renderer> {
    fn from(widget: MaskWidget) -> Self {
        Element::new(widget)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_grows_outwards_from_the_hole() {
        let mask = MaskGeometry::for_bounds(0.0, 0.0, 200.0, 400.0, 0.45);
        let ring = ring_bounds(&mask, mask.radius, 10.0);
        assert_eq!(ring.x, 100.0 - 100.0);
        assert_eq!(ring.y, 200.0 - 100.0);
        assert_eq!(ring.width, 200.0);
    }
}
