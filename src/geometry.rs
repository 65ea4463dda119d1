//! Static geometry of the 3x3x3 cube.
//!
//! Maps each of the 27 spatial cubie slots to the facelet indices of its
//! visible stickers. The table is a literal so that it can be checked by
//! eye against the net layout documented in [`crate::facelets`], and
//! [`validate_facelet_map`] verifies it covers every facelet exactly once.

use nalgebra::{Point3, Vector3};

use crate::error::CubeError;
use crate::facelets::{CENTER_OFFSET, FACELET_COUNT, Face};

/// Number of cubie slots
pub(crate) const CUBIE_COUNT: usize = 27;
/// Distance between the centers of neighboring cubies
pub(crate) const CUBIE_PITCH: f32 = 1.0;
/// Half the edge length of a rendered cubie
pub(crate) const CUBIE_HALF_SIZE: f32 = 0.45;

/// A spatial slot in the 3x3x3 arrangement, each coordinate in {-1, 0, 1}.
///
/// X points right (R), Y up (U) and Z toward the viewer (F).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct CubiePosition {
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) z: i32,
}

/// What kind of piece sits in a slot, by number of visible faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CubieRole {
    /// The hidden piece in the middle
    Core,
    Center,
    Edge,
    Corner,
}

impl CubiePosition {
    /// All 27 slots, ordered by [`CubiePosition::index`]
    pub(crate) const ALL: [CubiePosition; CUBIE_COUNT] = {
        let mut all = [CubiePosition { x: 0, y: 0, z: 0 }; CUBIE_COUNT];
        let mut i = 0;
        while i < CUBIE_COUNT {
            all[i] = CubiePosition::from_index(i);
            i += 1;
        }
        all
    };

    pub(crate) const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    const fn from_index(index: usize) -> Self {
        Self {
            x: (index / 9) as i32 - 1,
            y: (index / 3 % 3) as i32 - 1,
            z: (index % 3) as i32 - 1,
        }
    }

    /// Position of the slot in [`CubiePosition::ALL`]; X varies slowest.
    pub(crate) const fn index(self) -> usize {
        ((self.x + 1) * 9 + (self.y + 1) * 3 + (self.z + 1)) as usize
    }

    /// Coordinate along an axis (0=X, 1=Y, 2=Z).
    pub(crate) const fn coord(self, axis: usize) -> i32 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Whether `face` is on the exterior of the cube at this slot.
    pub(crate) const fn is_face_visible(self, face: Face) -> bool {
        self.coord(face.axis()) == face.layer()
    }

    /// Visibility of each face, indexed by [`Face::index`].
    pub(crate) fn face_visibility(self) -> [bool; 6] {
        Face::ALL.map(|face| self.is_face_visible(face))
    }

    pub(crate) fn visible_faces(self) -> impl Iterator<Item = Face> {
        Face::ALL
            .into_iter()
            .filter(move |&face| self.is_face_visible(face))
    }

    pub(crate) fn role(self) -> CubieRole {
        match self.visible_faces().count() {
            0 => CubieRole::Core,
            1 => CubieRole::Center,
            2 => CubieRole::Edge,
            _ => CubieRole::Corner,
        }
    }

    /// Center of the cubie in world space when nothing is rotating.
    pub(crate) fn home_position(self) -> Point3<f32> {
        Point3::new(self.x as f32, self.y as f32, self.z as f32) * CUBIE_PITCH
    }

    /// Facelet index of the sticker on `face`, if that face is visible.
    pub(crate) fn facelet_index(self, face: Face) -> Option<usize> {
        FACELET_INDEX_MAP[self.index()][face.index()]
    }
}

/// Facelet index of each visible sticker, indexed by cubie then by face.
#[rustfmt::skip]
const FACELET_INDEX_MAP: [[Option<usize>; 6]; CUBIE_COUNT] = [
    //  U         L         F         R         B         D
    [None,     Some(15), None,     None,     Some(44), Some(51)], // (-1,-1,-1)
    [None,     Some(16), None,     None,     None,     Some(48)], // (-1,-1, 0)
    [None,     Some(17), Some(24), None,     None,     Some(45)], // (-1,-1, 1)
    [None,     Some(12), None,     None,     Some(41), None    ], // (-1, 0,-1)
    [None,     Some(13), None,     None,     None,     None    ], // (-1, 0, 0)
    [None,     Some(14), Some(21), None,     None,     None    ], // (-1, 0, 1)
    [Some(0),  Some(9),  None,     None,     Some(38), None    ], // (-1, 1,-1)
    [Some(3),  Some(10), None,     None,     None,     None    ], // (-1, 1, 0)
    [Some(6),  Some(11), Some(18), None,     None,     None    ], // (-1, 1, 1)
    [None,     None,     None,     None,     Some(43), Some(52)], // ( 0,-1,-1)
    [None,     None,     None,     None,     None,     Some(49)], // ( 0,-1, 0)
    [None,     None,     Some(25), None,     None,     Some(46)], // ( 0,-1, 1)
    [None,     None,     None,     None,     Some(40), None    ], // ( 0, 0,-1)
    [None,     None,     None,     None,     None,     None    ], // ( 0, 0, 0)
    [None,     None,     Some(22), None,     None,     None    ], // ( 0, 0, 1)
    [Some(1),  None,     None,     None,     Some(37), None    ], // ( 0, 1,-1)
    [Some(4),  None,     None,     None,     None,     None    ], // ( 0, 1, 0)
    [Some(7),  None,     Some(19), None,     None,     None    ], // ( 0, 1, 1)
    [None,     None,     None,     Some(35), Some(42), Some(53)], // ( 1,-1,-1)
    [None,     None,     None,     Some(34), None,     Some(50)], // ( 1,-1, 0)
    [None,     None,     Some(26), Some(33), None,     Some(47)], // ( 1,-1, 1)
    [None,     None,     None,     Some(32), Some(39), None    ], // ( 1, 0,-1)
    [None,     None,     None,     Some(31), None,     None    ], // ( 1, 0, 0)
    [None,     None,     Some(23), Some(30), None,     None    ], // ( 1, 0, 1)
    [Some(2),  None,     None,     Some(29), Some(36), None    ], // ( 1, 1,-1)
    [Some(5),  None,     None,     Some(28), None,     None    ], // ( 1, 1, 0)
    [Some(8),  None,     Some(20), Some(27), None,     None    ], // ( 1, 1, 1)
];

/// Checks that the facelet map agrees with face visibility and that the
/// visible stickers cover every facelet index exactly once.
pub(crate) fn validate_facelet_map() -> Result<(), CubeError> {
    let mut owner: [Option<(CubiePosition, Face)>; FACELET_COUNT] = [None; FACELET_COUNT];

    for cubie in CubiePosition::ALL {
        for face in Face::ALL {
            let mapped = cubie.facelet_index(face);
            let index = match (cubie.is_face_visible(face), mapped) {
                (true, Some(index)) => index,
                (false, None) => continue,
                (visible, _) => {
                    return Err(CubeError::InconsistentGeometry(format!(
                        "{cubie:?} face {face}: visible={visible} but mapped to {mapped:?}"
                    )));
                }
            };
            if cubie.role() == CubieRole::Center && index != face.base() + CENTER_OFFSET {
                return Err(CubeError::InconsistentGeometry(format!(
                    "center of {face} mapped to facelet {index}"
                )));
            }
            let slot = owner
                .get_mut(index)
                .ok_or(CubeError::OutOfRange { index })?;
            if let Some((other, other_face)) = slot {
                return Err(CubeError::InconsistentGeometry(format!(
                    "facelet {index} claimed by both {other:?} {other_face} and {cubie:?} {face}"
                )));
            }
            *slot = Some((cubie, face));
        }
    }

    match owner.iter().position(Option::is_none) {
        Some(index) => Err(CubeError::InconsistentGeometry(format!(
            "facelet {index} is not mapped to any cubie"
        ))),
        None => Ok(()),
    }
}

/// Corners of a cubie's face quad relative to the cubie center,
/// counter-clockwise as seen from outside the face.
pub(crate) fn face_corners(face: Face) -> [Vector3<f32>; 4] {
    let axis = face.axis();
    let sign = face.layer() as f32;
    let normal = face.normal() * CUBIE_HALF_SIZE;

    let mut u = Vector3::zeros();
    u[(axis + 1) % 3] = sign * CUBIE_HALF_SIZE;
    let mut v = Vector3::zeros();
    v[(axis + 2) % 3] = CUBIE_HALF_SIZE;

    [
        normal - u - v,
        normal + u - v,
        normal + u + v,
        normal - u + v,
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::facelets::STICKERS_PER_FACE;

    #[test]
    fn test_facelet_map_is_bijective() {
        assert_eq!(validate_facelet_map(), Ok(()));

        let indices: Vec<usize> = CubiePosition::ALL
            .into_iter()
            .flat_map(|cubie| cubie.visible_faces().filter_map(move |f| cubie.facelet_index(f)))
            .collect();
        assert_eq!(indices.len(), FACELET_COUNT);
        let unique: HashSet<usize> = indices.iter().copied().collect();
        assert_eq!(unique, (0..FACELET_COUNT).collect::<HashSet<_>>());
    }

    #[test]
    fn test_facelets_land_in_their_face_block() {
        for cubie in CubiePosition::ALL {
            for face in cubie.visible_faces() {
                let index = cubie.facelet_index(face).unwrap();
                assert!(
                    (face.base()..face.base() + STICKERS_PER_FACE).contains(&index),
                    "{cubie:?} {face} -> {index}",
                );
            }
        }
    }

    #[test]
    fn test_centers_map_to_block_centers() {
        for face in Face::ALL {
            let mut coords = [0; 3];
            coords[face.axis()] = face.layer();
            let center = CubiePosition::new(coords[0], coords[1], coords[2]);
            assert_eq!(center.role(), CubieRole::Center);
            assert_eq!(center.facelet_index(face), Some(face.base() + 4));
        }
    }

    #[test]
    fn test_roles() {
        let count = |role| {
            CubiePosition::ALL
                .into_iter()
                .filter(|c| c.role() == role)
                .count()
        };
        assert_eq!(count(CubieRole::Core), 1);
        assert_eq!(count(CubieRole::Center), 6);
        assert_eq!(count(CubieRole::Edge), 12);
        assert_eq!(count(CubieRole::Corner), 8);
    }

    #[test]
    fn test_index_roundtrip() {
        for (i, cubie) in CubiePosition::ALL.into_iter().enumerate() {
            assert_eq!(cubie.index(), i);
        }
        assert_eq!(CubiePosition::new(-1, -1, -1).index(), 0);
        assert_eq!(CubiePosition::new(1, 1, 1).index(), 26);
    }

    #[test]
    fn test_net_neighbors() {
        // UFR corner: U9, F3, R1 on the standard net
        let ufr = CubiePosition::new(1, 1, 1);
        assert_eq!(ufr.facelet_index(Face::U), Some(Face::U.base() + 8));
        assert_eq!(ufr.facelet_index(Face::F), Some(Face::F.base() + 2));
        assert_eq!(ufr.facelet_index(Face::R), Some(Face::R.base()));
        // DBL corner: D7, B9, L7
        let dbl = CubiePosition::new(-1, -1, -1);
        assert_eq!(dbl.facelet_index(Face::D), Some(Face::D.base() + 6));
        assert_eq!(dbl.facelet_index(Face::B), Some(Face::B.base() + 8));
        assert_eq!(dbl.facelet_index(Face::L), Some(Face::L.base() + 6));
    }

    #[test]
    fn test_face_corners_wind_outward() {
        for face in Face::ALL {
            let [a, b, c, _] = face_corners(face);
            let normal = (b - a).cross(&(c - a)).normalize();
            assert!((normal - face.normal()).norm() < 1e-6, "{face}");
        }
    }
}
