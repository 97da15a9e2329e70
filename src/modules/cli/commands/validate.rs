//! Validate command implementation

use clap::Args;
use confgen_core::{ConfgenError, Registry, TypedComponent, ValidatedConfig, ValidatedSection};
use confgen_generator::capabilities;
use confgen_parser::{parse_file, validate};
use confgen_types::{Backend, Platform};
use serde::Serialize;
use tracing::info;

use super::TargetArgs;

/// Validate command arguments
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Print a JSON summary instead of human-readable output
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub target: TargetArgs,
}

/// What a configuration declares once validated
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ValidationSummary {
    pub platform: Platform,
    pub logging: SectionSummary,
    pub metrics: SectionSummary,
    pub backends: Vec<Backend>,
}

/// Declared components and pipelines of one section
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SectionSummary {
    pub receivers: Vec<ComponentSummary>,
    pub processors: Vec<ComponentSummary>,
    pub pipelines: Vec<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ComponentSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl ValidationSummary {
    /// Summarize a validated configuration
    pub fn from_config(config: &ValidatedConfig) -> Self {
        Self {
            platform: config.platform(),
            logging: SectionSummary::from_section(config.logging()),
            metrics: SectionSummary::from_section(config.metrics()),
            backends: capabilities(config.platform()).to_vec(),
        }
    }
}

impl SectionSummary {
    fn from_section<R: TypedComponent, P: TypedComponent>(section: &ValidatedSection<R, P>) -> Self {
        Self {
            receivers: section
                .receivers()
                .map(|(id, r)| ComponentSummary::new(id, r.type_name()))
                .collect(),
            processors: section
                .processors()
                .map(|(id, p)| ComponentSummary::new(id, p.type_name()))
                .collect(),
            pipelines: section.pipelines().iter().map(|p| p.name.clone()).collect(),
        }
    }

    fn describe(&self, name: &str) -> String {
        format!(
            "  {}: {} receiver(s), {} processor(s), {} pipeline(s)",
            name,
            self.receivers.len(),
            self.processors.len(),
            self.pipelines.len()
        )
    }
}

impl ComponentSummary {
    fn new(id: &str, type_name: &str) -> Self {
        Self {
            id: id.to_string(),
            type_name: type_name.to_string(),
        }
    }
}

impl ValidateCommand {
    /// Execute the validate command
    pub fn execute(&self, config_path: &str) -> Result<ValidationSummary, ConfgenError> {
        info!(
            platform = %self.target.platform,
            "Validating configuration: {}", config_path
        );

        let config = parse_file(config_path)?;
        let validated = validate(&config, &Registry::builtin(), self.target.platform)?;
        let summary = ValidationSummary::from_config(&validated);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!("Configuration is valid for {}", summary.platform);
            println!("{}", summary.logging.describe("logging"));
            println!("{}", summary.metrics.describe("metrics"));
            let backends: Vec<String> = summary.backends.iter().map(|b| b.to_string()).collect();
            println!("  backends: {}", backends.join(", "));
        }

        Ok(summary)
    }
}
