//! Bounding rectangle value object

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Position;

/// An axis-aligned box spanned by two opposite corners
///
/// The corners may be given in any order; [`Rectangle::bounds`] always
/// reports them normalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    first: Position,
    second: Position,
}

impl Rectangle {
    /// Create a rectangle from two opposite corners
    #[must_use]
    pub const fn new(first: Position, second: Position) -> Self {
        Self { first, second }
    }

    /// The corners as given at construction
    #[must_use]
    pub const fn corners(&self) -> (Position, Position) {
        (self.first, self.second)
    }

    /// Bounds as `(left, bottom, right, top)`, i.e. `(min lon, min lat, max lon, max lat)`
    #[must_use]
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let (a, b) = (self.first, self.second);
        (
            a.longitude().min(b.longitude()),
            a.latitude().min(b.latitude()),
            a.longitude().max(b.longitude()),
            a.latitude().max(b.latitude()),
        )
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] - [{}]", self.first, self.second)
    }
}
