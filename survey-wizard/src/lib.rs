//! survey-wizard library - multi-step survey form logic
//!
//! The wizard is a small explicit state machine. Every transition is a pure
//! function of ([`WizardState`], [`Survey`], [`FormState`]); drawing the
//! current step is a separate projection ([`View`]) that front-ends render.
//!
//! - [`survey`]: static definition (sections, fields, visibility rules)
//! - [`form`]: current inputs
//! - [`visibility`]: conditional field visibility
//! - [`validation`]: per-section presence checks
//! - [`navigation`]: advance / retreat / submit
//! - [`serializer`]: inputs → submission payload
//! - [`view`]: render projection
//! - [`draft`]: local draft snapshots
//! - [`client`]: delivery to the sink

pub mod client;
pub mod draft;
pub mod error;
pub mod form;
pub mod navigation;
pub mod serializer;
pub mod survey;
pub mod validation;
pub mod view;
pub mod visibility;

pub use client::{Delivery, SinkClient};
pub use draft::DraftStore;
pub use error::{Result, WizardError};
pub use form::{FormState, Input};
pub use navigation::{SubmitError, WizardState};
pub use survey::{FieldKind, FieldSpec, SectionSpec, Survey};
pub use validation::{validate, FieldError, ValidationReport};
pub use view::View;
pub use visibility::VisibilityRule;
