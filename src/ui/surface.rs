//! The gallery drawing surface.
//!
//! A single canvas renders the whole widget: the scattered pile, the photo
//! overlay, and the navigation hotspot arrows. Mouse events are hit-tested
//! here and surfaced as application messages; the surface itself holds no
//! mutable state.

use iced::mouse::{self, Cursor};
use iced::widget::canvas::{self, Frame, Path};
use iced::{Color, Point, Radians, Rectangle, Renderer, Theme};

use crate::config::Config;
use crate::navigator::{self, Direction};
use crate::pile::Pile;
use crate::viewer::geometry::{self, Placement};
use crate::viewer::{Phase, Viewer};
use crate::Message;

/// Placeholder fill drawn where pixels have not arrived yet.
const PLACEHOLDER: Color = Color {
    r: 0.35,
    g: 0.35,
    b: 0.38,
    a: 1.0,
};
/// Edge length of the navigation arrows (px).
const ARROW_SIZE: f32 = 28.0;

pub struct Surface<'a> {
    pub pile: &'a Pile,
    pub viewer: &'a Viewer,
    pub config: &'a Config,
}

impl<'a> Surface<'a> {
    fn thumb_under(&self, bounds: Rectangle, position: Point) -> Option<usize> {
        let slots = self.pile.layout(bounds.size());
        self.pile.hit_test(&slots, position)
    }
}

impl<'a> canvas::Program<Message> for Surface<'a> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        match event {
            // The pointer left the window: nothing can be hovered anymore.
            canvas::Event::Mouse(mouse::Event::CursorLeft) => {
                if self.pile.hovered().is_some() {
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::ThumbnailHovered(None)),
                    );
                }
            }

            // Cursor moved | Track which thumbnail would be raised.
            // The pile only reacts to hover while the viewer is down.
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                let hovered = cursor
                    .position_in(bounds)
                    .filter(|_| self.viewer.phase() == Phase::Closed)
                    .and_then(|position| self.thumb_under(bounds, position));
                if hovered != self.pile.hovered() {
                    return (
                        canvas::event::Status::Captured,
                        Some(Message::ThumbnailHovered(hovered)),
                    );
                }
            }

            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                let Some(position) = cursor.position_in(bounds) else {
                    return (canvas::event::Status::Ignored, None);
                };

                let phase = self.viewer.phase();
                match phase {
                    Phase::Closed => {
                        if let Some(index) = self.thumb_under(bounds, position) {
                            return (
                                canvas::event::Status::Captured,
                                Some(Message::ThumbnailPressed(index)),
                            );
                        }
                        // Outside click with nothing open: no-op.
                    }
                    Phase::Open | Phase::Opening | Phase::Closing => {
                        if let Some(overlay) = self.viewer.overlay() {
                            let outer = overlay.placement.outer();
                            if phase == Phase::Open {
                                if navigator::next_hotspot(outer).contains(position) {
                                    return (
                                        canvas::event::Status::Captured,
                                        Some(Message::Navigate(Direction::Next)),
                                    );
                                }
                                if navigator::prev_hotspot(outer).contains(position) {
                                    return (
                                        canvas::event::Status::Captured,
                                        Some(Message::Navigate(Direction::Prev)),
                                    );
                                }
                            }
                            if outer.contains(position) {
                                return (canvas::event::Status::Captured, None);
                            }
                            // A click on another thumbnail queues its pickup;
                            // any other outside click puts the photo down.
                            if let Some(index) = self.thumb_under(bounds, position) {
                                return (
                                    canvas::event::Status::Captured,
                                    Some(Message::ThumbnailPressed(index)),
                                );
                            }
                            if phase == Phase::Open {
                                return (
                                    canvas::event::Status::Captured,
                                    Some(Message::BackdropPressed),
                                );
                            }
                        }
                    }
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(
            Point::ORIGIN,
            bounds.size(),
            self.config.backdrop_color.color(),
        );

        // The pile, back to front.
        let slots = self.pile.layout(bounds.size());
        for index in self.pile.draw_order() {
            let alpha = self.viewer.thumb_alpha(index);
            if alpha <= 0.0 {
                continue;
            }
            let border = if self.pile.hovered() == Some(index) {
                self.config.thumb_border_hover.color()
            } else {
                self.config.thumb_border_color.color()
            };
            let handle = self.pile.thumbs()[index]
                .image
                .as_ref()
                .map(|img| img.handle.clone());
            draw_placement(&mut frame, &slots[index], border, handle, alpha);
        }

        // The photo overlay, above every layer.
        if let Some(overlay) = self.viewer.overlay() {
            draw_placement(
                &mut frame,
                &overlay.placement,
                self.config.photo_border_color.color(),
                overlay.photo.clone(),
                overlay.opacity,
            );

            // Navigation arrows appear when hovering the edge hotspots.
            if self.viewer.phase() == Phase::Open {
                if let Some(position) = cursor.position_in(bounds) {
                    let outer = overlay.placement.outer();
                    let next = navigator::next_hotspot(outer);
                    if next.contains(position) {
                        draw_arrow(&mut frame, next, Direction::Next);
                    }
                    let prev = navigator::prev_hotspot(outer);
                    if prev.contains(position) {
                        draw_arrow(&mut frame, prev, Direction::Prev);
                    }
                }
            }
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> mouse::Interaction {
        let Some(position) = cursor.position_in(bounds) else {
            return mouse::Interaction::default();
        };

        let clickable = match self.viewer.phase() {
            Phase::Closed => self.thumb_under(bounds, position).is_some(),
            Phase::Open => self
                .viewer
                .overlay()
                .map(|overlay| {
                    let outer = overlay.placement.outer();
                    navigator::next_hotspot(outer).contains(position)
                        || navigator::prev_hotspot(outer).contains(position)
                })
                .unwrap_or(false),
            _ => false,
        };

        if clickable {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}

/// Draw one bordered, rotated image: the border as a filled polygon under
/// the pixels, a flat placeholder where the image has not loaded yet.
fn draw_placement(
    frame: &mut Frame,
    placement: &Placement,
    border_color: Color,
    handle: Option<iced::widget::image::Handle>,
    alpha: f32,
) {
    let corners = geometry::rotated_corners(placement.outer(), placement.rotation);
    let border = Path::new(|builder| {
        builder.move_to(corners[0]);
        builder.line_to(corners[1]);
        builder.line_to(corners[2]);
        builder.line_to(corners[3]);
        builder.close();
    });
    frame.fill(&border, with_alpha(border_color, alpha));

    match handle {
        Some(handle) => {
            frame.draw_image(
                placement.rect,
                canvas::Image::new(handle)
                    .rotation(Radians(placement.rotation.to_radians()))
                    .opacity(alpha),
            );
        }
        None => {
            let inner = geometry::rotated_corners(placement.rect, placement.rotation);
            let fill = Path::new(|builder| {
                builder.move_to(inner[0]);
                builder.line_to(inner[1]);
                builder.line_to(inner[2]);
                builder.line_to(inner[3]);
                builder.close();
            });
            frame.fill(&fill, with_alpha(PLACEHOLDER, alpha));
        }
    }
}

fn draw_arrow(frame: &mut Frame, hotspot: Rectangle, direction: Direction) {
    let center = Point::new(hotspot.center_x(), hotspot.center_y());
    let half = ARROW_SIZE / 2.0;
    let tip = match direction {
        Direction::Next => half,
        Direction::Prev => -half,
    };

    let arrow = Path::new(|builder| {
        builder.move_to(Point::new(center.x + tip, center.y));
        builder.line_to(Point::new(center.x - tip, center.y - half));
        builder.line_to(Point::new(center.x - tip, center.y + half));
        builder.close();
    });
    frame.fill(&arrow, Color::from_rgba(1.0, 1.0, 1.0, 0.8));
}

fn with_alpha(color: Color, alpha: f32) -> Color {
    Color {
        a: color.a * alpha,
        ..color
    }
}
