//! Projection of cubie faces onto the canvas.
//!
//! Faces are painted back to front: every cubie face that points toward the
//! eye is projected and sorted by the distance of its center from the eye.

use iced::{Point, Size};
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::cube::ColorTable;
use crate::facelets::Face;
use crate::geometry::{CubiePosition, CubieRole, face_corners};
use crate::layer::LayerPose;

/// Color of cubie faces on the inside of the cube
pub(crate) const HIDDEN_FACE_COLOR: Vector4<f32> = Vector4::new(0.2, 0.2, 0.2, 1.0);

/// A cubie face ready to be painted.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ScreenQuad {
    pub(crate) cubie: CubiePosition,
    pub(crate) face: Face,
    pub(crate) corners: [Point; 4],
    /// Distance from the eye to the face center
    pub(crate) depth: f32,
    pub(crate) color: Vector4<f32>,
}

/// World-space corners of a cubie face in its current pose.
pub(crate) fn world_face_corners(
    pose: &LayerPose,
    cubie: CubiePosition,
    face: Face,
) -> [Point3<f32>; 4] {
    let rotation = pose.rotation(cubie);
    let center = cubie.home_position();
    face_corners(face).map(|offset| rotation * (center + offset))
}

/// Maps a world point to canvas coordinates, or `None` behind the eye.
pub(crate) fn project_point(view_proj: &Matrix4<f32>, point: &Point3<f32>, size: Size) -> Option<Point> {
    let clip = view_proj * point.to_homogeneous();
    if clip.w <= f32::EPSILON {
        return None;
    }
    let ndc = clip.xyz() / clip.w;
    Some(Point::new(
        (ndc.x + 1.0) * 0.5 * size.width,
        (1.0 - ndc.y) * 0.5 * size.height,
    ))
}

fn project_quad(view_proj: &Matrix4<f32>, corners: &[Point3<f32>; 4], size: Size) -> Option<[Point; 4]> {
    let mut projected = [Point::ORIGIN; 4];
    for (slot, corner) in projected.iter_mut().zip(corners) {
        *slot = project_point(view_proj, corner, size)?;
    }
    Some(projected)
}

/// Every cubie face pointing toward `eye`, farthest first.
pub(crate) fn visible_quads(
    pose: &LayerPose,
    colors: &ColorTable,
    eye: &Point3<f32>,
    view_proj: &Matrix4<f32>,
    size: Size,
) -> Vec<ScreenQuad> {
    let mut quads = Vec::new();

    for cubie in CubiePosition::ALL {
        if cubie.role() == CubieRole::Core {
            continue;
        }
        let rotation = pose.rotation(cubie);

        for face in Face::ALL {
            let corners = world_face_corners(pose, cubie, face);
            let center = Point3::from(corners.iter().map(|c| c.coords).sum::<Vector3<f32>>() / 4.0);
            let to_eye = eye - center;
            // back-face culling
            if (rotation * face.normal()).dot(&to_eye) <= 0.0 {
                continue;
            }
            let Some(projected) = project_quad(view_proj, &corners, size) else {
                continue;
            };
            quads.push(ScreenQuad {
                cubie,
                face,
                corners: projected,
                depth: to_eye.norm(),
                color: colors.get(cubie, face).unwrap_or(HIDDEN_FACE_COLOR),
            });
        }
    }

    quads.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    quads
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{CameraController, FRONT_EYE, Projection, view_projection};
    use crate::cube::RubiksCube;

    fn front_view(size: Size) -> (Point3<f32>, Matrix4<f32>) {
        let camera = CameraController::looking_from(FRONT_EYE).camera();
        let projection = Projection::new(size.width, size.height);
        (camera.eye, view_projection(&camera, &projection))
    }

    #[test]
    fn test_origin_projects_to_center() {
        let size = Size::new(800.0, 600.0);
        let (_, view_proj) = front_view(size);
        let center = project_point(&view_proj, &Point3::origin(), size).unwrap();
        assert!((center.x - 400.0).abs() < 1e-3, "{center:?}");
        assert!((center.y - 300.0).abs() < 1e-3, "{center:?}");
    }

    #[test]
    fn test_up_is_up_on_screen() {
        let size = Size::new(800.0, 600.0);
        let (_, view_proj) = front_view(size);
        let top = project_point(&view_proj, &Point3::new(0.0, 1.0, 0.0), size).unwrap();
        assert!(top.y < 300.0);
    }

    #[test]
    fn test_front_view_quads() {
        let size = Size::new(800.0, 600.0);
        let (eye, view_proj) = front_view(size);
        let cube = RubiksCube::new();
        let quads = visible_quads(&LayerPose::default(), cube.colors(), &eye, &view_proj, size);

        // the eye sees the U, F and R side of every outer cubie
        assert_eq!(quads.len(), 26 * 3);
        assert!(quads.iter().all(|q| matches!(q.face, Face::U | Face::F | Face::R)));
        assert!(quads.windows(2).all(|w| w[0].depth >= w[1].depth));

        // the nearest faces belong to the UFR corner and carry sticker colors
        let nearest = &quads[quads.len() - 3..];
        for quad in nearest {
            assert_eq!(quad.cubie, CubiePosition::new(1, 1, 1));
            assert_ne!(quad.color, HIDDEN_FACE_COLOR);
        }
        let hidden = quads.iter().filter(|q| q.color == HIDDEN_FACE_COLOR).count();
        assert_eq!(hidden, 26 * 3 - 27);
    }

    #[test]
    fn test_world_corners_follow_pose() {
        let mut pose = LayerPose::default();
        let ufr = CubiePosition::new(1, 1, 1);
        let at_rest = world_face_corners(&pose, ufr, Face::U);
        assert!(at_rest.iter().all(|c| (c.y - 1.45).abs() < 1e-5));

        pose.rotate(&[ufr], 0, 90.0);
        // a quarter turn about +X tips the top face toward the front
        let turned = world_face_corners(&pose, ufr, Face::U);
        let center = turned.iter().map(|c| c.coords).sum::<Vector3<f32>>() / 4.0;
        assert!((center - Vector3::new(1.0, -1.0, 1.45)).norm() < 1e-4, "{center}");
    }
}
