//! Weather state shown on the face
//!
//! - `store`: last-known snapshot, merged from companion updates
//! - `condition`: condition code → icon bucket table

pub mod condition;
pub mod store;

pub use condition::WeatherIcon;
pub use store::{WeatherSnapshot, WeatherStore};
