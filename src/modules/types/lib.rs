//! Type definitions for confgen
//!
//! This crate contains the small value types shared across the confgen
//! workspace: target platforms, configuration sections and component roles,
//! parameter kinds used by the component registry, and downstream backends.

pub mod backend;
pub mod component;
pub mod param;
pub mod platform;

pub use backend::Backend;
pub use component::{Role, Section};
pub use param::ParamKind;
pub use platform::Platform;
