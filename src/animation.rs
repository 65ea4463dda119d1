//! Frame-driven layer rotation.
//!
//! The stepper is either idle or animating exactly one layer. Requests made
//! while a rotation is in flight are queued and started, in order, on the
//! frame that finishes the previous one; nothing is ever overridden.

use std::collections::VecDeque;

use crate::error::CubeError;
use crate::geometry::CubiePosition;
use crate::layer::LayerPose;

/// Angle advanced per frame unless configured otherwise
pub(crate) const DEFAULT_STEP_DEGREES: f32 = 5.0;
/// Smallest accepted per-frame step
const MIN_STEP_DEGREES: f32 = 0.1;

/// A rotation waiting for its turn.
#[derive(Debug)]
struct Request<T> {
    axis: usize,
    layer: i32,
    target: f32,
    on_complete: T,
}

/// The rotation currently being animated.
#[derive(Debug)]
struct Animation<T> {
    axis: usize,
    cubies: Vec<CubiePosition>,
    current: f32,
    target: f32,
    on_complete: T,
}

/// Result of advancing the stepper by one frame.
#[derive(Debug, PartialEq)]
pub(crate) enum Tick<T> {
    /// Nothing is animating.
    Idle,
    /// The layer turned by `degrees` and is still moving.
    Stepped { degrees: f32 },
    /// The layer turned by the final `degrees` and reached its target.
    ///
    /// The completion is handed out exactly once, here.
    Finished { degrees: f32, completed: T },
}

/// Drives one layer rotation at a time, a fixed angle per frame.
///
/// `T` is the completion notification carried by each rotation.
#[derive(Debug)]
pub(crate) struct AnimationStepper<T> {
    step: f32,
    pose: LayerPose,
    current: Option<Animation<T>>,
    queue: VecDeque<Request<T>>,
}

impl<T> Default for AnimationStepper<T> {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_DEGREES)
    }
}

impl<T> AnimationStepper<T> {
    pub(crate) fn new(step: f32) -> Self {
        Self {
            step: step.max(MIN_STEP_DEGREES),
            pose: LayerPose::default(),
            current: None,
            queue: VecDeque::new(),
        }
    }

    pub(crate) fn step(&self) -> f32 {
        self.step
    }

    /// Changes the per-frame step; takes effect on the next tick.
    pub(crate) fn set_step(&mut self, step: f32) {
        self.step = step.max(MIN_STEP_DEGREES);
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.current.is_some()
    }

    /// Number of rotations waiting behind the current one.
    pub(crate) fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Visual pose of every cubie for the current frame.
    pub(crate) fn pose(&self) -> &LayerPose {
        &self.pose
    }

    /// Starts rotating a layer, or queues the rotation if one is running.
    ///
    /// `target` is in degrees, right-handed about the positive axis.
    pub(crate) fn start(
        &mut self,
        axis: usize,
        layer: i32,
        target: f32,
        on_complete: T,
    ) -> Result<(), CubeError> {
        // Validate now so that a bad request never sits in the queue.
        let cubies = self.pose.cubies_in_layer(axis, layer)?;
        let request = Request {
            axis,
            layer,
            target,
            on_complete,
        };

        if self.is_animating() {
            log::debug!("Queueing rotation of layer {layer} on axis {axis}");
            self.queue.push_back(request);
        } else {
            self.begin(request, cubies);
        }
        Ok(())
    }

    fn begin(&mut self, request: Request<T>, cubies: Vec<CubiePosition>) {
        log::debug!(
            "Rotating layer {} on axis {} by {} degrees",
            request.layer,
            request.axis,
            request.target,
        );
        self.current = Some(Animation {
            axis: request.axis,
            cubies,
            current: 0.0,
            target: request.target,
            on_complete: request.on_complete,
        });
    }

    fn begin_next(&mut self) {
        while let Some(request) = self.queue.pop_front() {
            match self.pose.cubies_in_layer(request.axis, request.layer) {
                Ok(cubies) => return self.begin(request, cubies),
                Err(e) => log::error!("Dropping queued rotation: {e}"),
            }
        }
    }

    /// Advances the current rotation by one frame.
    pub(crate) fn tick(&mut self) -> Tick<T> {
        let Some(animation) = self.current.as_mut() else {
            return Tick::Idle;
        };

        let remaining = animation.target - animation.current;
        if remaining.abs() > self.step {
            let degrees = self.step.copysign(remaining);
            self.pose.rotate(&animation.cubies, animation.axis, degrees);
            animation.current += degrees;
            return Tick::Stepped { degrees };
        }

        // The final increment lands exactly on the target. The pose goes
        // back to rest because the caller applies the logical move now.
        let Some(finished) = self.current.take() else {
            return Tick::Idle;
        };
        self.pose.reset();
        self.begin_next();
        Tick::Finished {
            degrees: remaining,
            completed: finished.on_complete,
        }
    }

    /// Drops the current rotation and everything queued, without
    /// completing any of them.
    pub(crate) fn cancel_all(&mut self) {
        let dropped = usize::from(self.current.take().is_some()) + self.queue.len();
        if dropped > 0 {
            log::debug!("Cancelling {dropped} rotation(s)");
        }
        self.queue.clear();
        self.pose.reset();
    }
}
