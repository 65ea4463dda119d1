//! Layer selection and the visual pose of rotating layers.
//!
//! This is purely visual: spinning a layer here never changes the facelet
//! state. The logical move is applied once the spin has finished.

use nalgebra::{Point3, UnitQuaternion, Vector3};

use crate::error::CubeError;
use crate::geometry::{CUBIE_COUNT, CUBIE_PITCH, CubiePosition};

/// Converts a spatial coordinate back to a layer coordinate in {-1, 0, 1}.
pub(crate) fn layer_coordinate(position: f32) -> i32 {
    (position / CUBIE_PITCH).round() as i32
}

fn check_axis_layer(axis: usize, layer: i32) -> Result<(), CubeError> {
    if axis > 2 {
        return Err(CubeError::InvalidAxis(axis));
    }
    if !(-1..=1).contains(&layer) {
        return Err(CubeError::InvalidLayer(layer));
    }
    Ok(())
}

/// Cubies whose resting position lies in the given layer.
pub(crate) fn cubies_in_layer(axis: usize, layer: i32) -> Result<Vec<CubiePosition>, CubeError> {
    LayerPose::default().cubies_in_layer(axis, layer)
}

/// Extra rotation of each cubie about the cube's center.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct LayerPose {
    rotations: [UnitQuaternion<f32>; CUBIE_COUNT],
}

impl Default for LayerPose {
    fn default() -> Self {
        Self {
            rotations: [UnitQuaternion::identity(); CUBIE_COUNT],
        }
    }
}

impl LayerPose {
    pub(crate) fn rotation(&self, cubie: CubiePosition) -> &UnitQuaternion<f32> {
        &self.rotations[cubie.index()]
    }

    /// Current center of a cubie in world space.
    pub(crate) fn position(&self, cubie: CubiePosition) -> Point3<f32> {
        self.rotation(cubie) * cubie.home_position()
    }

    /// Cubies currently sitting in the given layer.
    pub(crate) fn cubies_in_layer(
        &self,
        axis: usize,
        layer: i32,
    ) -> Result<Vec<CubiePosition>, CubeError> {
        check_axis_layer(axis, layer)?;
        Ok(CubiePosition::ALL
            .into_iter()
            .filter(|&cubie| layer_coordinate(self.position(cubie)[axis]) == layer)
            .collect())
    }

    /// Rotates the given cubies about an axis through the cube's center.
    pub(crate) fn rotate(&mut self, cubies: &[CubiePosition], axis: usize, degrees: f32) {
        let step = UnitQuaternion::from_axis_angle(&Vector3::ith_axis(axis), degrees.to_radians());
        for cubie in cubies {
            let rotation = &mut self.rotations[cubie.index()];
            *rotation = step * *rotation;
        }
    }

    /// Puts every cubie back at rest.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    #[cfg(test)]
    pub(crate) fn is_at_rest(&self) -> bool {
        self.rotations
            .iter()
            .all(|rotation| rotation.angle().abs() < 1e-6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facelets::Face;

    #[test]
    fn test_layer_sizes() {
        for axis in 0..3 {
            for layer in -1..=1 {
                let cubies = cubies_in_layer(axis, layer).unwrap();
                assert_eq!(cubies.len(), 9);
                assert!(cubies.iter().all(|c| c.coord(axis) == layer));
            }
        }
    }

    #[test]
    fn test_face_layer_holds_the_face_stickers() {
        for face in Face::ALL {
            let cubies = cubies_in_layer(face.axis(), face.layer()).unwrap();
            assert!(cubies.iter().all(|c| c.is_face_visible(face)));
        }
    }

    #[test]
    fn test_invalid_selection() {
        assert_eq!(cubies_in_layer(3, 0), Err(CubeError::InvalidAxis(3)));
        assert_eq!(cubies_in_layer(0, 2), Err(CubeError::InvalidLayer(2)));
    }

    #[test]
    fn test_rounding() {
        assert_eq!(layer_coordinate(0.97), 1);
        assert_eq!(layer_coordinate(-1.02), -1);
        assert_eq!(layer_coordinate(0.3), 0);
    }

    #[test]
    fn test_rotating_a_layer_keeps_it_a_layer() {
        let mut pose = LayerPose::default();
        let top = cubies_in_layer(1, 1).unwrap();
        pose.rotate(&top, 1, 90.0);
        assert!(!pose.is_at_rest());

        // a quarter turn of the top layer maps it onto itself
        let mut after = pose.cubies_in_layer(1, 1).unwrap();
        after.sort_by_key(|c| c.index());
        assert_eq!(after, top);

        // UFR corner swings to the back (right-handed about +Y)
        let ufr = CubiePosition::new(1, 1, 1);
        let moved = pose.position(ufr);
        assert!((moved - Point3::new(1.0, 1.0, -1.0)).norm() < 1e-5, "{moved}");

        pose.reset();
        assert!(pose.is_at_rest());
        assert_eq!(pose.position(ufr), ufr.home_position());
    }
}
