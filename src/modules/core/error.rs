//! Error types for confgen

use confgen_types::{Backend, Platform, Role, Section};
use thiserror::Error;

/// Main error type for confgen operations.
///
/// The rendered message of every variant is compared verbatim by consumers,
/// so wording and field order must not change once released.
#[derive(Error, Debug)]
pub enum ConfgenError {
    /// The document is not well-formed or a field could not be decoded
    #[error("failed to parse configuration: {0}")]
    Parse(String),

    /// A component ID or pipeline name is not usable
    #[error("{section} {kind} id {id:?} {reason}")]
    InvalidIdentifier {
        section: Section,
        kind: &'static str,
        id: String,
        reason: String,
    },

    /// No registry entry for the component's type
    #[error(
        "{section} {role} {id:?} with type {type_name:?} is not supported. Supported {section} {role} types: [{supported}]."
    )]
    UnsupportedType {
        section: Section,
        role: Role,
        id: String,
        type_name: String,
        supported: String,
    },

    /// The component's type exists but is not legal on the target platform
    #[error(
        "{section} {role} {id:?} with type {type_name:?} is not supported on {platform}. Supported {section} {role} types on {platform}: [{supported}]."
    )]
    UnsupportedOnPlatform {
        section: Section,
        role: Role,
        id: String,
        type_name: String,
        platform: Platform,
        supported: String,
    },

    /// A parameter is missing, unknown or has the wrong type
    #[error("{section} {role} {id:?} has invalid parameter {param:?}: {reason}")]
    InvalidParameter {
        section: Section,
        role: Role,
        id: String,
        param: String,
        reason: String,
    },

    /// A pipeline references a component that is not declared
    #[error("{section} pipeline {pipeline:?} references undefined {role} {id:?}")]
    UndefinedReference {
        section: Section,
        pipeline: String,
        role: Role,
        id: String,
    },

    /// A pipeline is structurally invalid or combines incompatible components
    #[error("{section} pipeline {pipeline:?} {reason}")]
    InvalidPipeline {
        section: Section,
        pipeline: String,
        reason: String,
    },

    /// A validated model cannot be lowered to a backend
    #[error("{backend} generation failed: {reason}")]
    Generation { backend: Backend, reason: String },

    /// Invocation-level configuration error (files, flags)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfgenError {
    /// Build an `UnsupportedType` error from the list of known types
    pub fn unsupported_type(
        section: Section,
        role: Role,
        id: impl Into<String>,
        type_name: impl Into<String>,
        supported: &[&str],
    ) -> Self {
        ConfgenError::UnsupportedType {
            section,
            role,
            id: id.into(),
            type_name: type_name.into(),
            supported: supported.join(", "),
        }
    }

    /// Build an `UnsupportedOnPlatform` error from the types legal on `platform`
    pub fn unsupported_on_platform(
        section: Section,
        role: Role,
        id: impl Into<String>,
        type_name: impl Into<String>,
        platform: Platform,
        supported: &[&str],
    ) -> Self {
        ConfgenError::UnsupportedOnPlatform {
            section,
            role,
            id: id.into(),
            type_name: type_name.into(),
            platform,
            supported: supported.join(", "),
        }
    }

    /// Build an `InvalidParameter` error
    pub fn invalid_parameter(
        section: Section,
        role: Role,
        id: impl Into<String>,
        param: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConfgenError::InvalidParameter {
            section,
            role,
            id: id.into(),
            param: param.into(),
            reason: reason.into(),
        }
    }

    /// Build an `InvalidPipeline` error
    pub fn invalid_pipeline(
        section: Section,
        pipeline: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConfgenError::InvalidPipeline {
            section,
            pipeline: pipeline.into(),
            reason: reason.into(),
        }
    }

    /// Build a `Generation` error
    pub fn generation(backend: Backend, reason: impl Into<String>) -> Self {
        ConfgenError::Generation {
            backend,
            reason: reason.into(),
        }
    }

    /// Stable name of the error class
    pub fn kind(&self) -> &'static str {
        match self {
            ConfgenError::Parse(_) => "ParseError",
            ConfgenError::InvalidIdentifier { .. } => "InvalidIdentifierError",
            ConfgenError::UnsupportedType { .. } => "UnsupportedTypeError",
            ConfgenError::UnsupportedOnPlatform { .. } => "UnsupportedOnPlatformError",
            ConfgenError::InvalidParameter { .. } => "InvalidParameterError",
            ConfgenError::UndefinedReference { .. } => "UndefinedReferenceError",
            ConfgenError::InvalidPipeline { .. } => "InvalidPipelineError",
            ConfgenError::Generation { .. } => "GenerationError",
            ConfgenError::Config(_) => "ConfigError",
            ConfgenError::Io(_) => "IoError",
            ConfgenError::Json(_) => "JsonError",
        }
    }

    /// Returns true if this error was raised by the semantic validator
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ConfgenError::InvalidIdentifier { .. }
                | ConfgenError::UnsupportedType { .. }
                | ConfgenError::UnsupportedOnPlatform { .. }
                | ConfgenError::InvalidParameter { .. }
                | ConfgenError::UndefinedReference { .. }
                | ConfgenError::InvalidPipeline { .. }
        )
    }

    /// Process exit code the CLI reports for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfgenError::Parse(_) => 2,
            e if e.is_validation_error() => 3,
            ConfgenError::Generation { .. } => 4,
            _ => 1,
        }
    }
}

/// Result type alias using ConfgenError
pub type Result<T> = std::result::Result<T, ConfgenError>;
