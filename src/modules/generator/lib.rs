//! Backend configuration generators for confgen
//!
//! This crate turns a validated unified configuration into the native
//! configuration of each downstream telemetry backend: Fluent Bit for logs,
//! and collectd or the OpenTelemetry collector for metrics depending on the
//! platform. Every generator is a pure function of the validated model and
//! the caller's platform defaults.

pub mod collectd;
pub mod fluentbit;
pub mod otel;
pub mod platform;
pub mod set;
pub mod traits;

pub use collectd::{generate_collectd_config, CollectdGenerator};
pub use fluentbit::{generate_fluent_bit_configs, FluentBitGenerator};
pub use otel::{generate_otel_config, OtelGenerator};
pub use platform::{capabilities, is_active, metrics_backend};
pub use set::GeneratorSet;
pub use traits::{ConfigGenerator, GeneratedFile};
