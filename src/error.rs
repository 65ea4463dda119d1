//! Errors produced by the cube-state engine.

use thiserror::Error;

use crate::facelets::FACELET_COUNT;

/// Everything that can go wrong while manipulating cube state.
///
/// Only [`CubeError::OutOfRange`] indicates a bug (a broken lookup table);
/// the rest come from user input and are recovered from by falling back to
/// a safe default.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CubeError {
    /// Facelet index outside `0..54`
    #[error("facelet index {index} is out of range (expected < {FACELET_COUNT})")]
    OutOfRange { index: usize },
    /// Facelet string with the wrong number of characters
    #[error("facelet string must be exactly {FACELET_COUNT} characters, got {len}")]
    InvalidFaceletLength { len: usize },
    /// Facelet string containing something other than U, D, F, B, L or R
    #[error("invalid facelet symbol {symbol:?} at position {index}")]
    InvalidFaceletSymbol { index: usize, symbol: char },
    /// Move repeated other than once or twice
    #[error("a move turns 1 or 2 quarter turns, not {0}")]
    InvalidRepeatCount(u8),
    /// Move token that is not standard face-turn notation
    #[error("unrecognized move {0:?}")]
    UnrecognizedMoveToken(String),
    /// Color lookup for a character that is not a face symbol
    #[error("unknown face symbol {0:?}")]
    UnknownSymbol(char),
    /// Rotation axis other than 0, 1 or 2
    #[error("invalid rotation axis {0}")]
    InvalidAxis(usize),
    /// Layer coordinate other than -1, 0 or 1
    #[error("invalid layer coordinate {0}")]
    InvalidLayer(i32),
    /// The static cubie geometry table disagrees with itself
    #[error("inconsistent cubie geometry: {0}")]
    InconsistentGeometry(String),
}

impl CubeError {
    /// Whether the error came from malformed facelet string input.
    pub(crate) fn is_invalid_facelet_string(&self) -> bool {
        matches!(
            self,
            CubeError::InvalidFaceletLength { .. } | CubeError::InvalidFaceletSymbol { .. }
        )
    }
}
