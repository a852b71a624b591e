//! Infrastructure layer providing external service integrations.
//!
//! This module contains the submission transport: the HTTP channel the
//! completed form is delivered through, and the background worker that
//! keeps the delivery off the UI thread.

pub mod transport;

pub use transport::*;
