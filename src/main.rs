//! Interactive 3x3x3 Rubik's cube with iced UI.
//!
//! Keeps the 54-sticker state of a cube, animates face turns one layer at a
//! time and draws the result on a canvas. Turns come from the move buttons,
//! the keyboard, clicks on stickers or a typed move sequence.

use std::time::Instant;

use iced::widget::{Canvas, Column, Row, Slider, button, container, text, text_input};
use iced::{Element, Length, Settings, Subscription, Task, keyboard, window};
use nalgebra::Point3;

mod animation;
mod camera;
mod cube;
mod cube_widget;
mod error;
mod facelets;
mod geometry;
mod layer;
mod math;
mod moves;
mod ray_casting;

use animation::{AnimationStepper, DEFAULT_STEP_DEGREES, Tick};
use camera::{BACK_EYE, CameraController, FRONT_EYE};
use cube::RubiksCube;
use cube_widget::CubeCanvas;
use facelets::Face;
use moves::{Direction, Move, parse_sequence};

const SLIDER_MIN_STEP: f32 = 1.0;
const SLIDER_MAX_STEP: f32 = 30.0;

/// Which side of the cube the camera starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViewSide {
    Front,
    Back,
}

impl ViewSide {
    fn eye(self) -> Point3<f32> {
        match self {
            ViewSide::Front => FRONT_EYE,
            ViewSide::Back => BACK_EYE,
        }
    }

    fn flipped(self) -> Self {
        match self {
            ViewSide::Front => ViewSide::Back,
            ViewSide::Back => ViewSide::Front,
        }
    }
}

/// Main application state
#[derive(Debug)]
pub(crate) struct CubeApp {
    cube: RubiksCube,
    stepper: AnimationStepper<Move>,
    camera: CameraController,
    view_side: ViewSide,
    /// Turns requested so far, most recent last
    history: Vec<Move>,
    facelet_input: String,
    sequence_input: String,
    /// Last input error shown under the controls
    error: Option<String>,
}

/// Messages that the application can receive
#[derive(Debug, Clone)]
pub(crate) enum Message {
    /// Animate a turn, then apply it
    Turn(Move),
    FaceletsChanged(String),
    LoadFacelets,
    SequenceChanged(String),
    RunSequence,
    Undo,
    Reset,
    FlipView,
    StepChanged(f32),
    Orbit { delta_x: f32, delta_y: f32 },
    Zoom(f32),
    Frame(Instant),
}

impl CubeApp {
    /// Create a solved cube seen from the front
    pub(crate) fn new() -> Self {
        let cube = RubiksCube::new();
        let view_side = ViewSide::Front;
        Self {
            facelet_input: cube.facelets().to_string(),
            cube,
            stepper: AnimationStepper::new(DEFAULT_STEP_DEGREES),
            camera: CameraController::looking_from(view_side.eye()),
            view_side,
            history: Vec::new(),
            sequence_input: String::new(),
            error: None,
        }
    }

    /// Get the title of the application
    pub(crate) fn title(&self) -> &'static str {
        "Rubik's Cube"
    }

    /// Update the application state
    pub(crate) fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Turn(mv) => {
                self.queue_move(mv);
                self.history.push(mv);
            }
            Message::FaceletsChanged(value) => {
                self.facelet_input = value;
            }
            Message::LoadFacelets => {
                // Pending turns were meant for the old state
                self.stepper.cancel_all();
                self.history.clear();
                self.error = match self.cube.load_facelets(&self.facelet_input) {
                    Ok(()) if !self.cube.facelets().is_permutation_of_solved() => {
                        log::warn!("Loaded state does not hold nine stickers of each face");
                        None
                    }
                    Ok(()) => None,
                    Err(e) if e.is_invalid_facelet_string() => {
                        Some(format!("{e}; showing a blank cube"))
                    }
                    Err(e) => Some(e.to_string()),
                };
            }
            Message::SequenceChanged(value) => {
                self.sequence_input = value;
            }
            Message::RunSequence => {
                let moves = parse_sequence(&self.sequence_input);
                log::info!("Running {} move(s)", moves.len());
                for mv in moves {
                    self.queue_move(mv);
                    self.history.push(mv);
                }
            }
            Message::Undo => {
                if let Some(mv) = self.history.pop() {
                    self.queue_move(mv.inverse());
                }
            }
            Message::Reset => {
                self.stepper.cancel_all();
                self.cube.reset();
                self.history.clear();
                self.facelet_input = self.cube.facelets().to_string();
                self.error = None;
            }
            Message::FlipView => {
                self.view_side = self.view_side.flipped();
                self.camera = CameraController::looking_from(self.view_side.eye());
            }
            Message::StepChanged(step) => {
                self.stepper.set_step(step);
            }
            Message::Orbit { delta_x, delta_y } => {
                self.camera.process_mouse_motion(delta_x, delta_y);
            }
            Message::Zoom(delta) => {
                self.camera.process_scroll(delta);
            }
            Message::Frame(_) => {
                if let Tick::Finished { completed, .. } = self.stepper.tick() {
                    self.cube.apply_move(completed);
                }
            }
        }

        Task::none()
    }

    fn queue_move(&mut self, mv: Move) {
        let (axis, layer, degrees) = mv.animation();
        if let Err(e) = self.stepper.start(axis, layer, degrees, mv) {
            log::error!("Cannot animate {mv}: {e}");
        }
    }

    /// Frames only while something is turning, plus keyboard shortcuts
    pub(crate) fn subscription(&self) -> Subscription<Message> {
        let keys = keyboard::on_key_press(key_to_message);
        if self.stepper.is_animating() {
            Subscription::batch([keys, window::frames().map(Message::Frame)])
        } else {
            keys
        }
    }

    /// Create the view for the application
    pub(crate) fn view(&self) -> Element<'_, Message> {
        let moves: Vec<Move> = Move::all().collect();
        let mut move_buttons = Column::new().spacing(5);
        // one row per face
        for face_moves in moves.chunks(3) {
            let row = face_moves.iter().fold(Row::new().spacing(5), |row, &mv| {
                row.push(
                    button(text(mv.to_string()))
                        .width(60)
                        .on_press(Message::Turn(mv)),
                )
            });
            move_buttons = move_buttons.push(row);
        }

        let sequence = Row::new()
            .spacing(5)
            .push(
                text_input("R U R' U'", &self.sequence_input)
                    .on_input(Message::SequenceChanged)
                    .on_submit(Message::RunSequence)
                    .width(190),
            )
            .push(button("Run").on_press(Message::RunSequence));

        let facelets = Row::new()
            .spacing(5)
            .push(
                text_input("54 facelets, ULFRBD order", &self.facelet_input)
                    .on_input(Message::FaceletsChanged)
                    .on_submit(Message::LoadFacelets)
                    .width(190),
            )
            .push(button("Load").on_press(Message::LoadFacelets));

        let status = if self.cube.facelets().is_solved() {
            "Solved".to_string()
        } else {
            format!("State: {}", self.cube.facelets())
        };

        let mut controls = Column::new()
            .spacing(20)
            .width(260)
            .push(
                Column::new()
                    .spacing(5)
                    .push(text("Moves"))
                    .push(move_buttons),
            )
            .push(
                Column::new()
                    .spacing(5)
                    .push(text("Sequence"))
                    .push(sequence),
            )
            .push(
                Column::new()
                    .spacing(5)
                    .push(text("Facelets"))
                    .push(facelets),
            )
            .push(
                Column::new()
                    .spacing(5)
                    .push(text(format!("Speed: {:.1}° per frame", self.stepper.step())))
                    .push(
                        Slider::new(
                            SLIDER_MIN_STEP..=SLIDER_MAX_STEP,
                            self.stepper.step(),
                            Message::StepChanged,
                        )
                        .step(0.5)
                        .width(250),
                    ),
            )
            .push(
                Row::new()
                    .spacing(5)
                    .push(button("Undo").on_press_maybe(
                        (!self.history.is_empty()).then_some(Message::Undo),
                    ))
                    .push(button("Reset").on_press(Message::Reset))
                    .push(button("Flip view").on_press(Message::FlipView)),
            )
            .push(text(status).size(12));

        if self.stepper.queued() > 0 {
            controls = controls.push(text(format!("{} turn(s) queued", self.stepper.queued())).size(12));
        }
        if let Some(error) = &self.error {
            controls = controls.push(text(error.as_str()).size(12));
        }

        let viewport = Canvas::new(CubeCanvas::new(
            self.cube.colors(),
            self.stepper.pose(),
            self.camera.camera(),
        ))
        .width(Length::Fill)
        .height(Length::Fill);

        // Main layout: left controls + right viewport
        Row::new()
            .spacing(10)
            .padding(10)
            .push(
                container(controls)
                    .width(Length::Shrink)
                    .height(Length::Fill),
            )
            .push(viewport)
            .into()
    }
}

/// Face letters turn clockwise, or counter-clockwise with Shift held
fn key_to_message(key: keyboard::Key, modifiers: keyboard::Modifiers) -> Option<Message> {
    let keyboard::Key::Character(letter) = key.as_ref() else {
        return None;
    };
    let mut chars = letter.chars();
    let (Some(symbol), None) = (chars.next(), chars.next()) else {
        return None;
    };
    let face = Face::from_symbol(symbol.to_ascii_uppercase()).ok()?;
    let direction = if modifiers.shift() {
        Direction::CounterClockwise
    } else {
        Direction::Clockwise
    };
    Some(Message::Turn(Move::quarter(face, direction)))
}

/// Entry point for the cube application
fn main() -> iced::Result {
    env_logger::builder().format_timestamp(None).init();

    if let Err(e) = geometry::validate_facelet_map() {
        log::error!("Cubie geometry is inconsistent: {e}");
    }

    let app = CubeApp::new();
    iced::application(app.title(), CubeApp::update, CubeApp::view)
        .subscription(CubeApp::subscription)
        .settings(Settings {
            antialiasing: true,
            ..Settings::default()
        })
        .run_with(move || (app, Task::none()))
}
