//! Application layer managing state and business workflows.
//!
//! This module coordinates between the domain layer and presentation layer,
//! driving the wizard's steps, field edits, and the submission lifecycle.

pub mod state;

pub use state::*;