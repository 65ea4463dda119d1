//! Facelet representation of the cube.
//!
//! The cube's state is a sequence of 54 face symbols, 9 per face, stored in
//! blocks in the order U, L, F, R, B, D. Inside a block the stickers are
//! numbered row-major as the face is seen from outside the cube on the
//! usual cross-shaped net (U with B above it, D with F above it, the four
//! side faces with U above them):
//!
//! ```text
//! 0 1 2
//! 3 4 5
//! 6 7 8
//! ```

use std::fmt;

use nalgebra::Vector3;

use crate::error::CubeError;
use crate::moves::Direction;

/// Number of stickers on a face
pub(crate) const STICKERS_PER_FACE: usize = 9;
/// Number of stickers on the whole cube
pub(crate) const FACELET_COUNT: usize = 6 * STICKERS_PER_FACE;
/// Position of the center sticker within a face block
pub(crate) const CENTER_OFFSET: usize = 4;

/// One of the six faces of the cube.
///
/// Each face also doubles as a sticker symbol: a solved cube has every
/// sticker of a face showing that face's own symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum Face {
    U,
    L,
    F,
    R,
    B,
    D,
}

impl Face {
    /// All faces, in block order
    pub(crate) const ALL: [Face; 6] = [Face::U, Face::L, Face::F, Face::R, Face::B, Face::D];

    /// Offset of the face's 9-sticker block within the facelet string.
    pub(crate) const fn base(self) -> usize {
        match self {
            Face::U => 0,
            Face::L => 9,
            Face::F => 18,
            Face::R => 27,
            Face::B => 36,
            Face::D => 45,
        }
    }

    /// Position of the face in [`Face::ALL`].
    pub(crate) const fn index(self) -> usize {
        self.base() / STICKERS_PER_FACE
    }

    pub(crate) const fn symbol(self) -> char {
        match self {
            Face::U => 'U',
            Face::L => 'L',
            Face::F => 'F',
            Face::R => 'R',
            Face::B => 'B',
            Face::D => 'D',
        }
    }

    /// Parses an upper-case face letter.
    pub(crate) fn from_symbol(symbol: char) -> Result<Self, CubeError> {
        match symbol {
            'U' => Ok(Face::U),
            'L' => Ok(Face::L),
            'F' => Ok(Face::F),
            'R' => Ok(Face::R),
            'B' => Ok(Face::B),
            'D' => Ok(Face::D),
            _ => Err(CubeError::UnknownSymbol(symbol)),
        }
    }

    /// Rotation axis perpendicular to the face (0=X, 1=Y, 2=Z).
    pub(crate) const fn axis(self) -> usize {
        match self {
            Face::L | Face::R => 0,
            Face::U | Face::D => 1,
            Face::F | Face::B => 2,
        }
    }

    /// Coordinate of the face's outer layer along [`Face::axis`].
    pub(crate) const fn layer(self) -> i32 {
        match self {
            Face::U | Face::R | Face::F => 1,
            Face::D | Face::L | Face::B => -1,
        }
    }

    /// Outward unit normal of the face.
    pub(crate) fn normal(self) -> Vector3<f32> {
        let mut normal = Vector3::zeros();
        normal[self.axis()] = self.layer() as f32;
        normal
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The 54 sticker symbols of the cube.
///
/// Every mutation is a permutation, so a state that starts solved always
/// holds exactly 9 of each symbol.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct FaceletState([Face; FACELET_COUNT]);

impl FaceletState {
    /// Creates a solved cube.
    pub(crate) fn solved() -> Self {
        let mut state = Self([Face::U; FACELET_COUNT]);
        state.reset();
        state
    }

    /// Parses a 54-character facelet string.
    ///
    /// Lower-case letters are accepted and treated as upper-case.
    pub(crate) fn parse(s: &str) -> Result<Self, CubeError> {
        let len = s.chars().count();
        if len != FACELET_COUNT {
            return Err(CubeError::InvalidFaceletLength { len });
        }

        let mut stickers = [Face::U; FACELET_COUNT];
        for (index, (slot, symbol)) in stickers.iter_mut().zip(s.chars()).enumerate() {
            *slot = Face::from_symbol(symbol.to_ascii_uppercase())
                .map_err(|_| CubeError::InvalidFaceletSymbol { index, symbol })?;
        }
        Ok(Self(stickers))
    }

    /// Fills every block with its own face symbol.
    pub(crate) fn reset(&mut self) {
        for face in Face::ALL {
            let base = face.base();
            self.0[base..base + STICKERS_PER_FACE].fill(face);
        }
    }

    /// Returns the symbol at a facelet index.
    pub(crate) fn get(&self, index: usize) -> Result<Face, CubeError> {
        self.0
            .get(index)
            .copied()
            .ok_or(CubeError::OutOfRange { index })
    }

    /// Rotates the symbols along each cycle by one step.
    ///
    /// Clockwise moves the symbol at `cycle[i]` to `cycle[i + 1]` (wrapping
    /// around); counter-clockwise is the inverse. Cycles must be disjoint.
    /// Every index is checked before anything is mutated.
    pub(crate) fn apply_permutation(
        &mut self,
        cycles: &[&[usize]],
        direction: Direction,
    ) -> Result<(), CubeError> {
        if let Some(&index) = cycles
            .iter()
            .flat_map(|cycle| cycle.iter())
            .find(|&&index| index >= FACELET_COUNT)
        {
            return Err(CubeError::OutOfRange { index });
        }

        for cycle in cycles.iter().filter(|cycle| cycle.len() > 1) {
            let mut symbols: Vec<Face> = cycle.iter().map(|&i| self.0[i]).collect();
            match direction {
                Direction::Clockwise => symbols.rotate_right(1),
                Direction::CounterClockwise => symbols.rotate_left(1),
            }
            for (&i, symbol) in cycle.iter().zip(symbols) {
                self.0[i] = symbol;
            }
        }
        Ok(())
    }

    /// Number of stickers showing `face`.
    pub(crate) fn count(&self, face: Face) -> usize {
        self.0.iter().filter(|&&symbol| symbol == face).count()
    }

    pub(crate) fn is_solved(&self) -> bool {
        *self == Self::solved()
    }

    /// Whether the state holds exactly 9 stickers of every symbol.
    pub(crate) fn is_permutation_of_solved(&self) -> bool {
        Face::ALL
            .into_iter()
            .all(|face| self.count(face) == STICKERS_PER_FACE)
    }
}

impl Default for FaceletState {
    fn default() -> Self {
        Self::solved()
    }
}

impl fmt::Display for FaceletState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in self.0 {
            write!(f, "{symbol}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for FaceletState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FaceletState({self})")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SOLVED: &str = "UUUUUUUUULLLLLLLLLFFFFFFFFFRRRRRRRRRBBBBBBBBBDDDDDDDDD";

    #[test]
    fn test_solved_layout() {
        let state = FaceletState::solved();
        assert_eq!(state.to_string(), SOLVED);
        assert!(state.is_solved());
        for face in Face::ALL {
            assert_eq!(state.get(face.base() + CENTER_OFFSET), Ok(face));
            assert_eq!(state.count(face), 9);
        }
    }

    #[test]
    fn test_get_out_of_range() {
        let state = FaceletState::solved();
        assert_eq!(state.get(53), Ok(Face::D));
        assert_eq!(state.get(54), Err(CubeError::OutOfRange { index: 54 }));
    }

    #[test]
    fn test_parse_accepts_any_valid_string() {
        let s = "UUUUUUUUURRRRRRRRRFFFFFFFFFDDDDDDDDDLLLLLLLLLBBBBBBBBB";
        let state = FaceletState::parse(s).unwrap();
        assert_eq!(state.to_string(), s);
        assert!(state.is_permutation_of_solved());
        assert!(!state.is_solved());

        let lower = FaceletState::parse(&SOLVED.to_lowercase()).unwrap();
        assert!(lower.is_solved());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(
            FaceletState::parse(&SOLVED[..53]),
            Err(CubeError::InvalidFaceletLength { len: 53 }),
        );
        assert_eq!(
            FaceletState::parse(""),
            Err(CubeError::InvalidFaceletLength { len: 0 }),
        );

        let mut with_x = SOLVED.to_string();
        with_x.replace_range(10..11, "X");
        assert_eq!(
            FaceletState::parse(&with_x),
            Err(CubeError::InvalidFaceletSymbol {
                index: 10,
                symbol: 'X',
            }),
        );
    }

    #[test]
    fn test_apply_permutation_directions() {
        let mut state = FaceletState::solved();
        // clockwise: U moves from 0 to 9, L from 9 to 18 and F wraps around to 0
        state
            .apply_permutation(&[&[0, 9, 18]], Direction::Clockwise)
            .unwrap();
        assert_eq!(state.get(0), Ok(Face::F));
        assert_eq!(state.get(9), Ok(Face::U));
        assert_eq!(state.get(18), Ok(Face::L));

        state
            .apply_permutation(&[&[0, 9, 18]], Direction::CounterClockwise)
            .unwrap();
        assert!(state.is_solved());
    }

    #[test]
    fn test_apply_permutation_checks_before_mutating() {
        let mut state = FaceletState::solved();
        let result = state.apply_permutation(&[&[0, 9], &[18, 99]], Direction::Clockwise);
        assert_eq!(result, Err(CubeError::OutOfRange { index: 99 }));
        assert!(state.is_solved());
    }

    #[test]
    fn test_face_symbol_roundtrip() {
        for face in Face::ALL {
            assert_eq!(Face::from_symbol(face.symbol()), Ok(face));
            assert_eq!(Face::ALL[face.index()], face);
        }
        assert_eq!(Face::from_symbol('X'), Err(CubeError::UnknownSymbol('X')));
    }
}
