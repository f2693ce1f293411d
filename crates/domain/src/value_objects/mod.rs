//! Value Objects - Immutable, identity-less domain primitives

mod position;
mod postal_address;
mod rectangle;

pub use position::Position;
pub use postal_address::PostalAddress;
pub use rectangle::Rectangle;
