//! # Survey Common Library
//!
//! Shared code for the survey sink and the survey wizard:
//! - Wire types exchanged between wizard and sink
//! - Field keys and the column schema used to lay out stored rows
//! - Configuration loading
//! - Timestamp helpers

pub mod api;
pub mod config;
pub mod error;
pub mod schema;
pub mod time;

pub use api::types::{Ack, AckStatus, Responses, Submission};
pub use error::{Error, Result};
pub use schema::{Column, ColumnKey, ColumnSchema, FieldKey};
