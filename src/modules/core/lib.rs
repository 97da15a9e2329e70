//! Core domain logic for confgen
//!
//! This crate contains the unified configuration model (raw, typed and
//! validated forms), platform defaults, the component registry, and the
//! error type shared by the parser, validator and generators.

pub mod domain;
pub mod error;
pub mod registry;

pub use domain::*;
pub use error::{ConfgenError, Result};
pub use registry::{ComponentSpec, ParameterSpec, Registry};
