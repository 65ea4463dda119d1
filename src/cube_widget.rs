//! Canvas widget that draws the cube and turns mouse input into messages.
//!
//! Left-clicking a sticker turns its face clockwise, or counter-clockwise
//! while Shift is held. Dragging with the right button orbits the camera and
//! the wheel zooms.

use iced::widget::canvas::{self, Frame, Geometry, Path, Stroke, event};
use iced::{Color, Point, Rectangle, Renderer, Theme, keyboard, mouse};
use nalgebra::Vector4;

use crate::Message;
use crate::camera::{Camera, Projection, view_projection};
use crate::cube::ColorTable;
use crate::layer::LayerPose;
use crate::math::visible_quads;
use crate::moves::{Direction, Move};
use crate::ray_casting::{calculate_mouse_ray, find_intersected_sticker};

const OUTLINE_WIDTH: f32 = 1.5;

/// Internal state managed by the canvas
#[derive(Debug, Default)]
pub(crate) struct CubeCanvasState {
    orbiting: bool,
    last_mouse_pos: Option<Point>,
    modifiers: keyboard::Modifiers,
}

/// Draws one frame of the cube: the current colors in the current pose.
pub(crate) struct CubeCanvas<'a> {
    colors: &'a ColorTable,
    pose: &'a LayerPose,
    camera: Camera,
}

impl<'a> CubeCanvas<'a> {
    pub(crate) fn new(colors: &'a ColorTable, pose: &'a LayerPose, camera: Camera) -> Self {
        Self {
            colors,
            pose,
            camera,
        }
    }
}

fn to_iced_color(color: Vector4<f32>) -> Color {
    Color::from_rgba(color.x, color.y, color.z, color.w)
}

impl canvas::Program<Message> for CubeCanvas<'_> {
    type State = CubeCanvasState;

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (event::Status, Option<Message>) {
        match event {
            canvas::Event::Mouse(mouse_event) => {
                self.handle_mouse_event(state, mouse_event, bounds, cursor)
            }
            canvas::Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
                state.modifiers = modifiers;
                (event::Status::Ignored, None)
            }
            _ => (event::Status::Ignored, None),
        }
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let projection = Projection::new(bounds.width, bounds.height);
        let view_proj = view_projection(&self.camera, &projection);

        let quads = visible_quads(
            self.pose,
            self.colors,
            &self.camera.eye,
            &view_proj,
            bounds.size(),
        );
        for quad in quads {
            let path = Path::new(|builder| {
                builder.move_to(quad.corners[0]);
                for &corner in &quad.corners[1..] {
                    builder.line_to(corner);
                }
                builder.close();
            });
            frame.fill(&path, to_iced_color(quad.color));
            frame.stroke(
                &path,
                Stroke::default()
                    .with_width(OUTLINE_WIDTH)
                    .with_color(Color::BLACK),
            );
        }

        vec![frame.into_geometry()]
    }

    fn mouse_interaction(
        &self,
        state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if state.orbiting {
            mouse::Interaction::Grabbing
        } else if cursor.is_over(bounds) {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}

impl CubeCanvas<'_> {
    /// Handle mouse events for sticker picking and camera navigation
    fn handle_mouse_event(
        &self,
        state: &mut CubeCanvasState,
        mouse_event: mouse::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (event::Status, Option<Message>) {
        match mouse_event {
            mouse::Event::CursorMoved { .. } => {
                let Some(position) = cursor.position_in(bounds) else {
                    return (event::Status::Ignored, None);
                };
                let last = state.last_mouse_pos.replace(position);
                if let (true, Some(last)) = (state.orbiting, last) {
                    let message = Message::Orbit {
                        delta_x: position.x - last.x,
                        delta_y: position.y - last.y,
                    };
                    return (event::Status::Captured, Some(message));
                }
            }
            mouse::Event::ButtonPressed(mouse::Button::Left) => {
                let Some(position) = cursor.position_in(bounds) else {
                    return (event::Status::Ignored, None);
                };
                let message = self.pick(position, bounds, state.modifiers);
                return (event::Status::Captured, message);
            }
            mouse::Event::ButtonPressed(mouse::Button::Right) => {
                if let Some(position) = cursor.position_in(bounds) {
                    state.orbiting = true;
                    state.last_mouse_pos = Some(position);
                    return (event::Status::Captured, None);
                }
            }
            mouse::Event::ButtonReleased(mouse::Button::Right) => {
                if state.orbiting {
                    state.orbiting = false;
                    return (event::Status::Captured, None);
                }
            }
            mouse::Event::WheelScrolled { delta } => {
                if cursor.position_in(bounds).is_some() {
                    let scroll_delta = match delta {
                        mouse::ScrollDelta::Lines { y, .. } => y,
                        mouse::ScrollDelta::Pixels { y, .. } => y * 0.01,
                    };
                    return (event::Status::Captured, Some(Message::Zoom(scroll_delta)));
                }
            }
            _ => {}
        }

        (event::Status::Ignored, None)
    }

    /// Turn message for the sticker under the cursor, if any.
    fn pick(&self, position: Point, bounds: Rectangle, modifiers: keyboard::Modifiers) -> Option<Message> {
        let projection = Projection::new(bounds.width, bounds.height);
        let view_proj = view_projection(&self.camera, &projection);
        let ray = calculate_mouse_ray(position, bounds.size(), &view_proj)?;
        let (cubie, face) = find_intersected_sticker(&ray, self.pose)?;

        let direction = if modifiers.shift() {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        };
        log::debug!("Picked {face} sticker of cubie {cubie:?}");
        Some(Message::Turn(Move::quarter(face, direction)))
    }
}
