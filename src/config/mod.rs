//! Declared configuration: workload identity and the typed option schema.
//!
//! The platform hands the controller a flat string map of options. This module
//! is the boundary where that map becomes a statically validated [`Options`]
//! value — unknown keys, mistyped values, and conflicting settings are
//! rejected here, before any remote call happens.
//!
//! ## Contents
//! - [`Identity`] ambient naming context (application and model names)
//! - [`Options`] the fixed option schema with typed fields
//! - [`LogLevel`] accepted workload log levels

mod identity;
mod options;

pub use identity::Identity;
pub use options::{LogLevel, Options};
