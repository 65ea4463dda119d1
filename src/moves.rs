//! Face-turn notation and the permutations it applies to the facelet state.

use std::fmt;
use std::str::FromStr;

use crate::error::CubeError;
use crate::facelets::{Face, FaceletState};

/// Turning direction, as seen looking at the turning face from outside.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub(crate) fn inverse(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// A single face turn such as `R`, `U'` or `F2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Move {
    face: Face,
    direction: Direction,
    repeat: u8,
}

impl Move {
    /// Creates a move; `repeat` must be 1 (quarter turn) or 2 (half turn).
    pub(crate) fn new(face: Face, direction: Direction, repeat: u8) -> Result<Self, CubeError> {
        match repeat {
            1 | 2 => Ok(Self {
                face,
                direction,
                repeat,
            }),
            _ => Err(CubeError::InvalidRepeatCount(repeat)),
        }
    }

    pub(crate) fn quarter(face: Face, direction: Direction) -> Self {
        Self {
            face,
            direction,
            repeat: 1,
        }
    }

    pub(crate) fn half(face: Face) -> Self {
        Self {
            face,
            direction: Direction::Clockwise,
            repeat: 2,
        }
    }

    /// All 18 face turns: for each face, clockwise, counter-clockwise and half.
    pub(crate) fn all() -> impl Iterator<Item = Move> {
        Face::ALL.into_iter().flat_map(|face| {
            [
                Move::quarter(face, Direction::Clockwise),
                Move::quarter(face, Direction::CounterClockwise),
                Move::half(face),
            ]
        })
    }

    /// The move that undoes this one.
    pub(crate) fn inverse(self) -> Self {
        Self {
            direction: self.direction.inverse(),
            ..self
        }
    }

    /// Parses one token of standard notation.
    ///
    /// Surrounding whitespace is ignored and an empty token is `Ok(None)`.
    /// Accepted forms are a face letter optionally followed by `2`, `'`,
    /// `2'` or `'2`.
    pub(crate) fn parse_token(token: &str) -> Result<Option<Self>, CubeError> {
        let token = token.trim();
        let unrecognized = || CubeError::UnrecognizedMoveToken(token.to_string());

        let mut chars = token.chars();
        let Some(first) = chars.next() else {
            return Ok(None);
        };
        let face = Face::from_symbol(first).map_err(|_| unrecognized())?;
        let (direction, repeat) = match chars.as_str() {
            "" => (Direction::Clockwise, 1),
            "'" => (Direction::CounterClockwise, 1),
            "2" => (Direction::Clockwise, 2),
            "2'" | "'2" => (Direction::CounterClockwise, 2),
            _ => return Err(unrecognized()),
        };
        Self::new(face, direction, repeat).map(Some)
    }

    /// Visual rotation for this move: `(axis, layer, degrees)`.
    ///
    /// Angles are right-handed about the positive axis, so a clockwise turn
    /// of R, U or F is negative and a clockwise turn of L, D or B positive.
    pub(crate) fn animation(self) -> (usize, i32, f32) {
        let clockwise = -90.0 * self.face.layer() as f32;
        let quarter = match self.direction {
            Direction::Clockwise => clockwise,
            Direction::CounterClockwise => -clockwise,
        };
        (
            self.face.axis(),
            self.face.layer(),
            quarter * f32::from(self.repeat),
        )
    }

    /// Applies the move to a facelet state.
    pub(crate) fn apply_to(self, state: &mut FaceletState) -> Result<(), CubeError> {
        apply_move(state, self.face, self.direction, self.repeat)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.face)?;
        if self.repeat == 2 {
            write!(f, "2")?;
        }
        if self.direction == Direction::CounterClockwise {
            write!(f, "'")?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::parse_token(s)?.ok_or_else(|| CubeError::UnrecognizedMoveToken(s.to_string()))
    }
}

/// Parses a whitespace-separated move sequence.
///
/// Tokens that are not valid moves are logged and skipped.
pub(crate) fn parse_sequence(sequence: &str) -> Vec<Move> {
    sequence
        .split_whitespace()
        .filter_map(|token| match Move::parse_token(token) {
            Ok(mv) => mv,
            Err(e) => {
                log::warn!("Skipping move: {e}");
                None
            }
        })
        .collect()
}

/// Stickers moved by a clockwise quarter turn of one face.
struct FaceTurn {
    /// The 8 non-center stickers of the face, clockwise from the top-left
    /// corner. A quarter turn advances each by two places.
    perimeter: [usize; 8],
    /// The 3-sticker strips on the four neighboring faces, in clockwise
    /// order. A quarter turn moves strip `k` onto strip `k + 1`.
    ring: [[usize; 3]; 4],
}

/// Per-face turn data, indexed by [`Face::index`].
#[rustfmt::skip]
const FACE_TURNS: [FaceTurn; 6] = [
    // U
    FaceTurn {
        perimeter: [0, 1, 2, 5, 8, 7, 6, 3],
        ring: [[9, 10, 11], [36, 37, 38], [27, 28, 29], [18, 19, 20]],
    },
    // L
    FaceTurn {
        perimeter: [9, 10, 11, 14, 17, 16, 15, 12],
        ring: [[0, 3, 6], [18, 21, 24], [45, 48, 51], [44, 41, 38]],
    },
    // F
    FaceTurn {
        perimeter: [18, 19, 20, 23, 26, 25, 24, 21],
        ring: [[6, 7, 8], [27, 30, 33], [47, 46, 45], [17, 14, 11]],
    },
    // R
    FaceTurn {
        perimeter: [27, 28, 29, 32, 35, 34, 33, 30],
        ring: [[2, 5, 8], [42, 39, 36], [47, 50, 53], [20, 23, 26]],
    },
    // B
    FaceTurn {
        perimeter: [36, 37, 38, 41, 44, 43, 42, 39],
        ring: [[0, 1, 2], [15, 12, 9], [53, 52, 51], [29, 32, 35]],
    },
    // D
    FaceTurn {
        perimeter: [45, 46, 47, 50, 53, 52, 51, 48],
        ring: [[15, 16, 17], [24, 25, 26], [33, 34, 35], [42, 43, 44]],
    },
];

impl FaceTurn {
    /// The quarter turn as disjoint 4-cycles: corners and edges of the face
    /// itself, then one cycle per position along the neighboring strips.
    fn cycles(&self) -> [[usize; 4]; 5] {
        let p = &self.perimeter;
        let r = &self.ring;
        let strip = |j: usize| [r[0][j], r[1][j], r[2][j], r[3][j]];
        [
            [p[0], p[2], p[4], p[6]],
            [p[1], p[3], p[5], p[7]],
            strip(0),
            strip(1),
            strip(2),
        ]
    }
}

/// Turns `face` by `repeat` quarter turns in `direction`.
pub(crate) fn apply_move(
    state: &mut FaceletState,
    face: Face,
    direction: Direction,
    repeat: u8,
) -> Result<(), CubeError> {
    let cycles = FACE_TURNS[face.index()].cycles();
    let cycles: Vec<&[usize]> = cycles.iter().map(|cycle| cycle.as_slice()).collect();
    for _ in 0..repeat {
        state.apply_permutation(&cycles, direction)?;
    }
    Ok(())
}
