//! Configuration loading and validation.
//!
//! The route configuration is read once at startup and never reloaded.
//! Submodules provide the data model, validation logic, and the
//! file-based sources for each supported format.

pub mod model;
pub mod sources;
pub mod validation;
