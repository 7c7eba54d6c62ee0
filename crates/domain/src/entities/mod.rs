//! Domain entities - Objects with identity and lifecycle

mod location;
mod observation;

pub use location::Location;
pub use observation::{HourlySeries, Observation};
