//! HTTP API handlers for survey-sink

pub mod health;
pub mod responses;
pub mod submit;
pub mod summary;

pub use health::health_routes;
pub use responses::get_responses;
pub use submit::submit;
pub use summary::get_summary;
