//! Ray casting for mouse-based sticker selection.
//!
//! A click is turned into a ray through the scene and tested against the
//! exterior stickers of every cubie in its current pose.

use iced::{Point, Size};
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::facelets::Face;
use crate::geometry::{CUBIE_HALF_SIZE, CubiePosition};
use crate::layer::LayerPose;
use crate::math::world_face_corners;

/// 3D ray for intersection testing
#[derive(Debug, Clone)]
pub(crate) struct Ray {
    pub(crate) origin: Point3<f32>,
    /// Normalized
    pub(crate) direction: Vector3<f32>,
}

/// Axis-aligned bounding box in 3D space
#[derive(Debug, Clone)]
pub(crate) struct Aabb {
    pub(crate) min: Point3<f32>,
    pub(crate) max: Point3<f32>,
}

impl Aabb {
    /// Create a box centered at a point with the given edge length
    pub(crate) fn from_center_size(center: Point3<f32>, size: f32) -> Self {
        let half = Vector3::repeat(size * 0.5);
        Self {
            min: center - half,
            max: center + half,
        }
    }
}

/// Calculate the ray from the eye through a point on the canvas.
///
/// Returns `None` if the view-projection matrix cannot be inverted.
pub(crate) fn calculate_mouse_ray(
    mouse_pos: Point,
    size: Size,
    view_proj: &Matrix4<f32>,
) -> Option<Ray> {
    // Normalized device coordinates (-1 to 1)
    let ndc_x = (2.0 * mouse_pos.x / size.width) - 1.0;
    let ndc_y = 1.0 - (2.0 * mouse_pos.y / size.height);

    let inv_view_proj = view_proj.try_inverse()?;

    let unproject = |ndc_z: f32| {
        let world = inv_view_proj * Vector4::new(ndc_x, ndc_y, ndc_z, 1.0);
        Point3::from(world.xyz() / world.w)
    };
    let ray_start = unproject(-1.0);
    let ray_end = unproject(1.0);

    Some(Ray {
        origin: ray_start,
        direction: (ray_end - ray_start).normalize(),
    })
}

/// Test ray intersection with an axis-aligned box using the slab method
///
/// Returns the distance to the entry point, or to the exit point if the
/// ray starts inside the box.
pub(crate) fn ray_aabb_intersection(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;

    for axis in 0..3 {
        let inv_dir = 1.0 / ray.direction[axis];
        let t1 = (aabb.min[axis] - ray.origin[axis]) * inv_dir;
        let t2 = (aabb.max[axis] - ray.origin[axis]) * inv_dir;
        tmin = tmin.max(t1.min(t2));
        tmax = tmax.min(t1.max(t2));
    }

    if tmax < 0.0 || tmin > tmax {
        None
    } else if tmin >= 0.0 {
        Some(tmin)
    } else {
        Some(tmax)
    }
}

/// Test ray intersection with a triangle using the Möller-Trumbore algorithm
fn ray_triangle_intersection(
    ray: &Ray,
    v0: Point3<f32>,
    v1: Point3<f32>,
    v2: Point3<f32>,
) -> Option<f32> {
    const EPSILON: f32 = 1e-8;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(&edge2);
    let a = edge1.dot(&h);

    // Parallel to the triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;

    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = f * ray.direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(&q);
    (t > EPSILON).then_some(t)
}

fn ray_quad_intersection(ray: &Ray, corners: &[Point3<f32>; 4]) -> Option<f32> {
    let [a, b, c, d] = *corners;
    match (
        ray_triangle_intersection(ray, a, b, c),
        ray_triangle_intersection(ray, a, c, d),
    ) {
        (Some(t1), Some(t2)) => Some(t1.min(t2)),
        (hit, None) | (None, hit) => hit,
    }
}

/// Find the exterior sticker the ray hits first.
///
/// Only stickers facing the ray's origin count, so a ray passing through
/// the gap between cubies never selects a sticker on the far side.
pub(crate) fn find_intersected_sticker(
    ray: &Ray,
    pose: &LayerPose,
) -> Option<(CubiePosition, Face)> {
    // Encloses a cubie in any orientation
    let bound = 2.0 * CUBIE_HALF_SIZE * 3f32.sqrt();

    let mut closest_distance = f32::INFINITY;
    let mut closest_sticker = None;

    for cubie in CubiePosition::ALL {
        // Fast rejection
        let aabb = Aabb::from_center_size(pose.position(cubie), bound);
        if ray_aabb_intersection(ray, &aabb).is_none() {
            continue;
        }

        let rotation = pose.rotation(cubie);
        for face in cubie.visible_faces() {
            if (rotation * face.normal()).dot(&ray.direction) >= 0.0 {
                continue;
            }
            let corners = world_face_corners(pose, cubie, face);
            if let Some(distance) = ray_quad_intersection(ray, &corners) {
                if distance < closest_distance {
                    closest_distance = distance;
                    closest_sticker = Some((cubie, face));
                }
            }
        }
    }

    closest_sticker
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::camera::{CameraController, FRONT_EYE, Projection, view_projection};
    use crate::layer::cubies_in_layer;

    fn ray(origin: [f32; 3], direction: [f32; 3]) -> Ray {
        Ray {
            origin: Point3::from(origin),
            direction: Vector3::from(direction).normalize(),
        }
    }

    #[test]
    fn test_straight_rays_hit_the_facing_sticker() {
        let pose = LayerPose::default();
        assert_eq!(
            find_intersected_sticker(&ray([0.0, 0.0, 10.0], [0.0, 0.0, -1.0]), &pose),
            Some((CubiePosition::new(0, 0, 1), Face::F))
        );
        assert_eq!(
            find_intersected_sticker(&ray([10.0, 1.0, 1.0], [-1.0, 0.0, 0.0]), &pose),
            Some((CubiePosition::new(1, 1, 1), Face::R))
        );
        assert_eq!(
            find_intersected_sticker(&ray([-1.0, -10.0, -1.0], [0.0, 1.0, 0.0]), &pose),
            Some((CubiePosition::new(-1, -1, -1), Face::D))
        );
    }

    #[test]
    fn test_misses() {
        let pose = LayerPose::default();
        // outside the cube
        assert_eq!(find_intersected_sticker(&ray([5.0, 0.0, 10.0], [0.0, 0.0, -1.0]), &pose), None);
        // through the gap between two columns of cubies
        assert_eq!(find_intersected_sticker(&ray([0.5, 0.0, 10.0], [0.0, 0.0, -1.0]), &pose), None);
        // pointing away
        assert_eq!(find_intersected_sticker(&ray([0.0, 0.0, 10.0], [0.0, 0.0, 1.0]), &pose), None);
    }

    #[test]
    fn test_picking_follows_a_turning_layer() {
        let mut pose = LayerPose::default();
        let top = cubies_in_layer(1, 1).unwrap();
        pose.rotate(&top, 1, 90.0);
        // after a quarter turn about +Y the left side of the top layer faces front
        assert_eq!(
            find_intersected_sticker(&ray([0.0, 1.0, 10.0], [0.0, 0.0, -1.0]), &pose),
            Some((CubiePosition::new(-1, 1, 0), Face::L))
        );
    }

    #[test]
    fn test_mouse_ray_through_canvas_center() {
        let size = Size::new(800.0, 600.0);
        let camera = CameraController::looking_from(FRONT_EYE).camera();
        let view_proj = view_projection(&camera, &Projection::new(size.width, size.height));
        let ray = calculate_mouse_ray(Point::new(400.0, 300.0), size, &view_proj).unwrap();

        let to_target = (Point3::origin() - ray.origin).normalize();
        assert!((ray.direction - to_target).norm() < 1e-3, "{:?}", ray.direction);
        assert!(ray.direction.dot(&(camera.eye - Point3::origin())) < 0.0);
    }

    #[test]
    fn test_aabb_intersection() {
        let aabb = Aabb::from_center_size(Point3::origin(), 2.0);
        let hit = ray_aabb_intersection(&ray([0.0, 0.0, 5.0], [0.0, 0.0, -1.0]), &aabb).unwrap();
        assert!((hit - 4.0).abs() < 1e-5);
        let inside = ray_aabb_intersection(&ray([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]), &aabb).unwrap();
        assert!((inside - 1.0).abs() < 1e-5);
        assert_eq!(ray_aabb_intersection(&ray([0.0, 3.0, 5.0], [0.0, 0.0, -1.0]), &aabb), None);
    }
}
