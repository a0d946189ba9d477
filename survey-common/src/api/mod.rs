//! Wire types shared by the wizard and the sink
//!
//! Pure data: no HTTP framework dependencies. The sink wraps these in axum
//! handlers and the wizard sends them with reqwest.

pub mod types;

pub use types::{Ack, AckStatus, Responses, Submission};
