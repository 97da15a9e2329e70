//! Cross-component rules
//!
//! Checks that only make sense once every component in a section has been
//! typed: combinations of receivers and processors that the generators
//! cannot express.

use confgen_core::{
    ConfgenError, LoggingProcessor, LoggingReceiver, MetricsProcessor, MetricsReceiver, Result,
    TypedComponent, ValidatedSection,
};
use confgen_types::param::METRIC_PREFIX;
use confgen_types::Section;

/// Parse processors cannot run on records read from the Windows event log
pub fn check_logging(section: &ValidatedSection<LoggingReceiver, LoggingProcessor>) -> Result<()> {
    for pipeline in section.pipelines() {
        let event_log = section
            .pipeline_receivers(pipeline)
            .find(|(_, r)| matches!(r, LoggingReceiver::WindowsEventLog(_)));

        if let (Some((receiver_id, receiver)), Some((processor_id, _))) =
            (event_log, section.pipeline_processors(pipeline).next())
        {
            return Err(ConfgenError::invalid_pipeline(
                Section::Logging,
                &pipeline.name,
                format!(
                    "cannot apply processor {:?} to {} receiver {:?}",
                    processor_id,
                    receiver.type_name(),
                    receiver_id
                ),
            ));
        }
    }
    Ok(())
}

/// Every exclusion pattern must select metrics some receiver of the same
/// pipeline produces
pub fn check_metrics(section: &ValidatedSection<MetricsReceiver, MetricsProcessor>) -> Result<()> {
    for pipeline in section.pipelines() {
        let families: Vec<&str> = section
            .pipeline_receivers(pipeline)
            .flat_map(|(_, r)| r.metric_families().iter().copied())
            .collect();

        for (processor_id, processor) in section.pipeline_processors(pipeline) {
            let MetricsProcessor::ExcludeMetrics(exclude) = processor;
            for pattern in &exclude.metrics_pattern {
                if !families.iter().any(|family| selects_family(pattern, family)) {
                    return Err(ConfgenError::invalid_pipeline(
                        Section::Metrics,
                        &pipeline.name,
                        format!(
                            "processor {:?} pattern {:?} matches no metrics produced by the pipeline's receivers",
                            processor_id, pattern
                        ),
                    ));
                }
            }
        }
    }
    Ok(())
}

/// Returns true if `pattern` can match a metric in `family`.
///
/// The family is the first path segment after the agent prefix; a trailing
/// `*` in that segment matches any family sharing the prefix.
pub fn selects_family(pattern: &str, family: &str) -> bool {
    let Some(rest) = pattern.strip_prefix(METRIC_PREFIX) else {
        return false;
    };
    let segment = rest.split('/').next().unwrap_or_default();
    match segment.strip_suffix('*') {
        Some(prefix) => family.starts_with(prefix),
        None => segment == family,
    }
}
