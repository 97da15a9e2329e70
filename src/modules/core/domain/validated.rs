//! Validated, typed view of a unified configuration

use confgen_types::{Platform, Role, Section};
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::fmt;

use super::{LoggingProcessor, LoggingReceiver, MetricsProcessor, MetricsReceiver, Pipeline};

/// A closed set of component kinds for one role within one section.
///
/// Implemented by the tagged variant enums; the validator lowers raw
/// components into these once their parameters passed the registry checks.
pub trait TypedComponent: Sized + Clone + fmt::Debug + Send + Sync {
    /// Section the kinds belong to
    const SECTION: Section;

    /// Role the kinds play
    const ROLE: Role;

    /// Decode parameters for `type_name`.
    ///
    /// Returns `None` when the type has no variant.
    fn from_params(type_name: &str, params: Mapping) -> Option<Result<Self, serde_yaml::Error>>;

    /// The `type` discriminator this value was decoded from
    fn type_name(&self) -> &'static str;
}

/// Decode a parameter mapping into a typed parameter struct
pub(crate) fn decode<T: DeserializeOwned>(params: Mapping) -> Result<T, serde_yaml::Error> {
    serde_yaml::from_value(Value::Mapping(params))
}

/// One validated section.
///
/// Every pipeline reference resolves to a declared component; the accessors
/// below rely on that.
#[derive(Debug, Clone)]
pub struct ValidatedSection<R, P> {
    receivers: Vec<(String, R)>,
    processors: Vec<(String, P)>,
    pipelines: Vec<Pipeline>,
}

impl<R, P> Default for ValidatedSection<R, P> {
    fn default() -> Self {
        Self {
            receivers: Vec::new(),
            processors: Vec::new(),
            pipelines: Vec::new(),
        }
    }
}

impl<R: TypedComponent, P: TypedComponent> ValidatedSection<R, P> {
    /// Assemble a section from already validated parts
    pub fn new(
        receivers: Vec<(String, R)>,
        processors: Vec<(String, P)>,
        pipelines: Vec<Pipeline>,
    ) -> Self {
        Self {
            receivers,
            processors,
            pipelines,
        }
    }

    /// All declared receivers in declaration order
    pub fn receivers(&self) -> impl Iterator<Item = (&str, &R)> {
        self.receivers.iter().map(|(id, r)| (id.as_str(), r))
    }

    /// All declared processors in declaration order
    pub fn processors(&self) -> impl Iterator<Item = (&str, &P)> {
        self.processors.iter().map(|(id, p)| (id.as_str(), p))
    }

    /// Find a receiver by ID
    pub fn receiver(&self, id: &str) -> Option<&R> {
        self.receivers.iter().find(|(rid, _)| rid == id).map(|(_, r)| r)
    }

    /// Find a processor by ID
    pub fn processor(&self, id: &str) -> Option<&P> {
        self.processors.iter().find(|(pid, _)| pid == id).map(|(_, p)| p)
    }

    /// Pipelines in declaration order
    pub fn pipelines(&self) -> &[Pipeline] {
        &self.pipelines
    }

    /// Receivers of `pipeline` in reference order
    pub fn pipeline_receivers<'a>(
        &'a self,
        pipeline: &'a Pipeline,
    ) -> impl Iterator<Item = (&'a str, &'a R)> + 'a {
        pipeline
            .receivers
            .iter()
            .filter_map(move |id| self.receiver(id).map(|r| (id.as_str(), r)))
    }

    /// Processors of `pipeline` in reference order
    pub fn pipeline_processors<'a>(
        &'a self,
        pipeline: &'a Pipeline,
    ) -> impl Iterator<Item = (&'a str, &'a P)> + 'a {
        pipeline
            .processors
            .iter()
            .filter_map(move |id| self.processor(id).map(|p| (id.as_str(), p)))
    }

    /// Receivers referenced by any pipeline, first reference first, without repeats
    pub fn referenced_receivers(&self) -> Vec<(&str, &R)> {
        let mut seen: Vec<&str> = Vec::new();
        let mut out = Vec::new();
        for pipeline in &self.pipelines {
            for (id, receiver) in self.pipeline_receivers(pipeline) {
                if !seen.contains(&id) {
                    seen.push(id);
                    out.push((id, receiver));
                }
            }
        }
        out
    }

    /// Processors referenced by any pipeline, first reference first, without repeats
    pub fn referenced_processors(&self) -> Vec<(&str, &P)> {
        let mut seen: Vec<&str> = Vec::new();
        let mut out = Vec::new();
        for pipeline in &self.pipelines {
            for (id, processor) in self.pipeline_processors(pipeline) {
                if !seen.contains(&id) {
                    seen.push(id);
                    out.push((id, processor));
                }
            }
        }
        out
    }

    /// Returns true if the section has no pipelines
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

/// Read-only configuration that passed semantic validation for one platform.
///
/// Produced by the validator and consumed by every generator. It is immutable
/// and `Send + Sync`, so generators can run against it from separate threads.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    platform: Platform,
    logging: ValidatedSection<LoggingReceiver, LoggingProcessor>,
    metrics: ValidatedSection<MetricsReceiver, MetricsProcessor>,
}

impl ValidatedConfig {
    /// Assemble a validated configuration.
    ///
    /// Callers are expected to have run the semantic checks; the validator is
    /// the only producer in this workspace.
    pub fn new(
        platform: Platform,
        logging: ValidatedSection<LoggingReceiver, LoggingProcessor>,
        metrics: ValidatedSection<MetricsReceiver, MetricsProcessor>,
    ) -> Self {
        Self {
            platform,
            logging,
            metrics,
        }
    }

    /// Platform the configuration was validated for
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Validated logging section
    pub fn logging(&self) -> &ValidatedSection<LoggingReceiver, LoggingProcessor> {
        &self.logging
    }

    /// Validated metrics section
    pub fn metrics(&self) -> &ValidatedSection<MetricsReceiver, MetricsProcessor> {
        &self.metrics
    }
}
