//! The aiming line the predictions are drawn with.

use crate::settings::LineColour;
use crate::types::Point;

/// Receives predicted paths. Drawing is up to the implementor.
pub trait PathRenderer {
    /// Replace the displayed path. An empty slice draws nothing.
    fn set_path(&mut self, path: &[Point]);

    /// Stop displaying any path.
    fn clear(&mut self);

    fn set_colour(&mut self, colour: LineColour);
}

/// Renderer that keeps the last path and colour in memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathBuffer {
    pub positions: Vec<Point>,
    pub colour: Option<LineColour>,
}

impl PathBuffer {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl PathRenderer for PathBuffer {
    fn set_path(&mut self, path: &[Point]) {
        self.positions.clear();
        self.positions.extend_from_slice(path);
    }

    fn clear(&mut self) {
        self.positions.clear();
    }

    fn set_colour(&mut self, colour: LineColour) {
        self.colour = Some(colour);
    }
}

impl<R: PathRenderer + ?Sized> PathRenderer for &mut R {
    fn set_path(&mut self, path: &[Point]) {
        (**self).set_path(path);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn set_colour(&mut self, colour: LineColour) {
        (**self).set_colour(colour);
    }
}
