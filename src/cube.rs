//! The Rubik's cube as seen by the viewer.
//!
//! This module ties the facelet state to the colors the renderer shows:
//! every state change recomputes one color per visible cubie face through
//! the static cubie geometry.

use nalgebra::Vector4;

use crate::error::CubeError;
use crate::facelets::{Face, FaceletState};
use crate::geometry::{CUBIE_COUNT, CubiePosition};
use crate::moves::Move;

/// Sticker colors of a standard cube.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Color {
    White,
    Yellow,
    Green,
    Blue,
    Orange,
    Red,
}

impl From<Color> for Vector4<f32> {
    /// Converts a color enum to RGBA color values.
    fn from(color: Color) -> Self {
        match color {
            Color::White => Vector4::new(1.0, 1.0, 1.0, 1.0),
            Color::Yellow => Vector4::new(1.0, 1.0, 0.0, 1.0),
            Color::Green => Vector4::new(0.0, 1.0, 0.0, 1.0),
            Color::Blue => Vector4::new(0.0, 0.0, 1.0, 1.0),
            Color::Orange => Vector4::new(1.0, 0.5, 0.0, 1.0),
            Color::Red => Vector4::new(1.0, 0.0, 0.0, 1.0),
        }
    }
}

/// Which color each face symbol is painted with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ColorScheme {
    /// Indexed by [`Face::index`]
    colors: [Color; 6],
}

impl Default for ColorScheme {
    /// White on top, green in front.
    fn default() -> Self {
        let mut colors = [Color::White; 6];
        colors[Face::U.index()] = Color::White;
        colors[Face::D.index()] = Color::Yellow;
        colors[Face::F.index()] = Color::Green;
        colors[Face::B.index()] = Color::Blue;
        colors[Face::L.index()] = Color::Orange;
        colors[Face::R.index()] = Color::Red;
        Self { colors }
    }
}

impl ColorScheme {
    /// Color used when a symbol has no entry in the scheme
    pub(crate) const FALLBACK: Color = Color::White;

    pub(crate) fn color(&self, face: Face) -> Color {
        self.colors[face.index()]
    }

    /// RGBA color of a face symbol character.
    pub(crate) fn to_color(&self, symbol: char) -> Result<Vector4<f32>, CubeError> {
        Ok(self.color(Face::from_symbol(symbol)?).into())
    }

    /// Like [`ColorScheme::to_color`], substituting white for unknown symbols.
    pub(crate) fn to_color_or_default(&self, symbol: char) -> Vector4<f32> {
        self.to_color(symbol).unwrap_or_else(|e| {
            log::debug!("{e}, using {:?}", Self::FALLBACK);
            Self::FALLBACK.into()
        })
    }
}

/// RGBA color of every visible cubie face.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ColorTable {
    /// Indexed by cubie index then [`Face::index`]; `None` for hidden faces
    faces: [[Option<Vector4<f32>>; 6]; CUBIE_COUNT],
}

impl ColorTable {
    /// Colors every visible face from the facelet state.
    pub(crate) fn from_state(state: &FaceletState, scheme: &ColorScheme) -> Self {
        Self::build(|cubie, face| {
            let index = cubie.facelet_index(face)?;
            match state.get(index) {
                Ok(symbol) => Some(scheme.to_color_or_default(symbol.symbol())),
                Err(e) => {
                    log::error!("Cubie {cubie:?} face {face}: {e}");
                    Some(ColorScheme::FALLBACK.into())
                }
            }
        })
    }

    /// Paints every visible face the same color.
    pub(crate) fn uniform(color: Color) -> Self {
        Self::build(|_, _| Some(color.into()))
    }

    fn build(mut color_of: impl FnMut(CubiePosition, Face) -> Option<Vector4<f32>>) -> Self {
        let mut faces = [[None; 6]; CUBIE_COUNT];
        for cubie in CubiePosition::ALL {
            let visibility = cubie.face_visibility();
            for face in Face::ALL {
                if visibility[face.index()] {
                    faces[cubie.index()][face.index()] = color_of(cubie, face);
                }
            }
        }
        Self { faces }
    }

    /// Color of a cubie face, or `None` if the face is on the inside.
    pub(crate) fn get(&self, cubie: CubiePosition, face: Face) -> Option<Vector4<f32>> {
        self.faces[cubie.index()][face.index()]
    }
}

/// Cube state plus the colors derived from it.
#[derive(Clone, Debug)]
pub(crate) struct RubiksCube {
    state: FaceletState,
    scheme: ColorScheme,
    colors: ColorTable,
}

impl RubiksCube {
    /// Creates a solved cube with the default color scheme.
    pub(crate) fn new() -> Self {
        let state = FaceletState::solved();
        let scheme = ColorScheme::default();
        let colors = ColorTable::from_state(&state, &scheme);
        Self {
            state,
            scheme,
            colors,
        }
    }

    pub(crate) fn facelets(&self) -> &FaceletState {
        &self.state
    }

    pub(crate) fn colors(&self) -> &ColorTable {
        &self.colors
    }

    pub(crate) fn reset(&mut self) {
        self.state.reset();
        self.refresh_colors();
    }

    pub(crate) fn apply_move(&mut self, mv: Move) {
        match mv.apply_to(&mut self.state) {
            Ok(()) => log::debug!("Applied {mv}: {}", self.state),
            Err(e) => log::error!("Failed to apply {mv}: {e}"),
        }
        self.refresh_colors();
    }

    /// Replaces the state with a facelet string.
    ///
    /// An invalid string resets the state to solved and paints the whole
    /// cube white until the next valid state change.
    pub(crate) fn load_facelets(&mut self, facelets: &str) -> Result<(), CubeError> {
        match FaceletState::parse(facelets) {
            Ok(state) => {
                self.state = state;
                self.refresh_colors();
                Ok(())
            }
            Err(e) => {
                log::warn!("Rejected facelet string: {e}");
                self.state.reset();
                self.colors = ColorTable::uniform(Color::White);
                Err(e)
            }
        }
    }

    fn refresh_colors(&mut self) {
        self.colors = ColorTable::from_state(&self.state, &self.scheme);
    }
}
