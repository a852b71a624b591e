//! TFORMS - Terminal Form Wizard Library
//!
//! A terminal-based multi-step recruitment form, built in Rust. Collects
//! applicant fields one step at a time, validates each step, and posts the
//! completed record to a remote endpoint.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
