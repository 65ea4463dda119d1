use nalgebra::{Matrix4, Point3, Vector3};

const MOUSE_SENSITIVITY: f32 = 0.5;
const ZOOM_SENSITIVITY: f32 = 1.0;
const MIN_DISTANCE: f32 = 6.0;
const MAX_DISTANCE: f32 = 50.0;
/// Vertical field of view in degrees
const FOVY_DEGREES: f32 = 45.0;

/// Where the camera starts looking from the front
pub(crate) const FRONT_EYE: Point3<f32> = Point3::new(5.0, 5.0, 14.0);
/// Where the camera looks from when the view is flipped
pub(crate) const BACK_EYE: Point3<f32> = Point3::new(-5.0, -5.0, -14.0);

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Camera {
    pub(crate) eye: Point3<f32>,
    pub(crate) target: Point3<f32>,
    pub(crate) up: Vector3<f32>,
}

impl Camera {
    pub(crate) fn build_view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye, &self.target, &self.up)
    }
}

/// Orbits the camera around the cube's center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct CameraController {
    pub(crate) distance: f32,
    pub(crate) yaw: f32,
    pub(crate) pitch: f32,
}

impl CameraController {
    /// Controller that places the camera at `eye`, looking at the origin.
    pub(crate) fn looking_from(eye: Point3<f32>) -> Self {
        let distance = eye.coords.norm();
        Self {
            distance,
            yaw: eye.x.atan2(eye.z).to_degrees(),
            pitch: (eye.y / distance).asin().to_degrees(),
        }
    }

    pub(crate) fn camera(&self) -> Camera {
        let yaw_rad = self.yaw.to_radians();
        let pitch_rad = self.pitch.to_radians();

        let x = self.distance * pitch_rad.cos() * yaw_rad.sin();
        let y = self.distance * pitch_rad.sin();
        let z = self.distance * pitch_rad.cos() * yaw_rad.cos();

        Camera {
            eye: Point3::new(x, y, z),
            target: Point3::origin(),
            up: Vector3::y(),
        }
    }

    pub(crate) fn process_mouse_motion(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw -= delta_x * MOUSE_SENSITIVITY;
        self.pitch += delta_y * MOUSE_SENSITIVITY;

        self.pitch = self.pitch.clamp(-89.0, 89.0);
    }

    pub(crate) fn process_scroll(&mut self, delta: f32) {
        self.distance -= delta * ZOOM_SENSITIVITY;
        self.distance = self.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Projection {
    pub(crate) aspect: f32,
    pub(crate) fovy: f32,
    pub(crate) znear: f32,
    pub(crate) zfar: f32,
}

impl Projection {
    pub(crate) fn new(width: f32, height: f32) -> Self {
        Self {
            aspect: if height > 0.0 { width / height } else { 1.0 },
            fovy: FOVY_DEGREES.to_radians(),
            znear: 0.1,
            zfar: 100.0,
        }
    }

    pub(crate) fn build_projection_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_perspective(self.aspect, self.fovy, self.znear, self.zfar)
    }
}

/// Combined view-projection matrix.
pub(crate) fn view_projection(camera: &Camera, projection: &Projection) -> Matrix4<f32> {
    projection.build_projection_matrix() * camera.build_view_matrix()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_reproduces_eye() {
        for eye in [FRONT_EYE, BACK_EYE] {
            let camera = CameraController::looking_from(eye).camera();
            assert!((camera.eye - eye).norm() < 1e-4, "{} vs {eye}", camera.eye);
        }
    }

    #[test]
    fn test_pitch_and_zoom_are_clamped() {
        let mut controller = CameraController::looking_from(FRONT_EYE);
        controller.process_mouse_motion(0.0, 1000.0);
        assert_eq!(controller.pitch, 89.0);
        controller.process_scroll(1000.0);
        assert_eq!(controller.distance, MIN_DISTANCE);
        controller.process_scroll(-1000.0);
        assert_eq!(controller.distance, MAX_DISTANCE);
    }
}
