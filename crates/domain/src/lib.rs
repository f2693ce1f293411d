//! Domain layer for the geocoding client
//!
//! Value objects shared by the Nominatim integration and its front ends:
//! positions, rectangles and postal addresses, plus the domain errors raised
//! when they are constructed from bad input.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::*;
