//! Value Objects - Immutable, identity-less domain primitives

mod geo_location;
mod hour_of_day;
mod location_id;
mod location_name;
mod weather_metric;

pub use geo_location::{GeoLocation, InvalidCoordinates};
pub use hour_of_day::{HourOfDay, InvalidHour};
pub use location_id::LocationId;
pub use location_name::LocationName;
pub use weather_metric::WeatherMetric;
