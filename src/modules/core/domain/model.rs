//! Root unified configuration model

use confgen_types::Role;

use super::{Component, Pipeline};

/// Root configuration model parsed from a unified configuration document.
///
/// Both sections share the same shape. All collections keep the order in
/// which they were declared, which the generators rely on for stable output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnifiedConfig {
    /// Log collection section
    pub logging: SectionConfig,

    /// Metrics collection section
    pub metrics: SectionConfig,
}

/// One telemetry section: declared components plus the service block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionConfig {
    /// Receivers in declaration order
    pub receivers: Vec<Component>,

    /// Processors in declaration order
    pub processors: Vec<Component>,

    /// Service block
    pub service: Service,
}

/// Service block holding the section's pipelines
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Service {
    /// Pipelines in declaration order
    pub pipelines: Vec<Pipeline>,
}

impl UnifiedConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if neither section declares anything
    pub fn is_empty(&self) -> bool {
        self.logging.is_empty() && self.metrics.is_empty()
    }
}

impl SectionConfig {
    /// Add a receiver
    pub fn with_receiver(mut self, component: Component) -> Self {
        self.receivers.push(component);
        self
    }

    /// Add a processor
    pub fn with_processor(mut self, component: Component) -> Self {
        self.processors.push(component);
        self
    }

    /// Add a pipeline
    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.service.pipelines.push(pipeline);
        self
    }

    /// Components declared for a role
    pub fn components(&self, role: Role) -> &[Component] {
        match role {
            Role::Receiver => &self.receivers,
            Role::Processor => &self.processors,
        }
    }

    /// Find a component by role and ID
    pub fn find_component(&self, role: Role, id: &str) -> Option<&Component> {
        self.components(role).iter().find(|c| c.id == id)
    }

    /// Pipelines in declaration order
    pub fn pipelines(&self) -> &[Pipeline] {
        &self.service.pipelines
    }

    /// Returns true if the section declares nothing
    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty() && self.processors.is_empty() && self.service.pipelines.is_empty()
    }
}
