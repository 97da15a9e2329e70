//! collectd configuration generator
//!
//! collectd runs a single global collection loop, so every metrics pipeline
//! folds into one configuration: the host plugins driven by the one
//! `hostmetrics` receiver, exclusions as a `PreCache` chain, and the
//! `write_gcm` exporter.

use confgen_core::{
    ConfgenError, MetricsProcessor, MetricsReceiver, PlatformDefaults, Result, TypedComponent,
    ValidatedConfig,
};
use confgen_types::param::METRIC_PREFIX;
use confgen_types::Backend;
use tracing::debug;

use crate::platform::ensure_active;
use crate::traits::{ConfigGenerator, GeneratedFile};

/// Configuration file name
pub const CONFIG_FILE: &str = "collectd.conf";

const HEADER: &str = "# Generated from the unified agent configuration. Do not edit.";

/// Plugins loaded for the `hostmetrics` receiver, with their settings
const HOST_PLUGINS: &[(&str, &[(&str, &str)])] = &[
    (
        "cpu",
        &[
            ("ValuesPercentage", "true"),
            ("ReportByCpu", "false"),
            ("ReportByState", "true"),
        ],
    ),
    (
        "df",
        &[("FSType", "\"overlay\""), ("IgnoreSelected", "true"), ("ValuesPercentage", "true")],
    ),
    ("disk", &[]),
    ("interface", &[("Interface", "\"/^lo\\d*$/\""), ("IgnoreSelected", "true")]),
    ("load", &[]),
    ("memory", &[("ValuesPercentage", "true")]),
    ("processes", &[("ProcessMatch", "\"all\" \".*\""), ("Detail", "\"ps_cputime\"")]),
    ("swap", &[("ReportBytes", "true"), ("ValuesPercentage", "true")]),
];

/// Generate the collectd configuration.
///
/// Returns an empty configuration when no metrics pipeline is declared.
pub fn generate_collectd_config(config: &ValidatedConfig, logs_dir: &str) -> Result<String> {
    let platform = config.platform();
    ensure_active(Backend::Collectd, platform)?;

    let metrics = config.metrics();
    if metrics.is_empty() {
        return Ok(String::new());
    }

    let mut interval = None;
    for (id, receiver) in metrics.referenced_receivers() {
        match receiver {
            MetricsReceiver::Hostmetrics(_) => {
                if let Some((first, _)) = interval {
                    return Err(ConfgenError::generation(
                        Backend::Collectd,
                        format!(
                            "at most one hostmetrics receiver may be used, found {:?} and {:?}",
                            first, id
                        ),
                    ));
                }
                let secs = receiver.collection_interval_secs().ok_or_else(|| {
                    ConfgenError::generation(
                        Backend::Collectd,
                        format!(
                            "metrics receiver {:?} has invalid collection_interval {:?}",
                            id,
                            receiver.collection_interval()
                        ),
                    )
                })?;
                interval = Some((id, secs));
            }
            other => {
                return Err(ConfgenError::generation(
                    Backend::Collectd,
                    format!(
                        "metrics receiver {:?} with type {:?} has no collectd mapping",
                        id,
                        other.type_name()
                    ),
                ))
            }
        }
    }

    let log_file = platform.join_path(logs_dir, "metrics-module.log");
    let mut out = format!(
        r#"{header}

LoadPlugin logfile
<Plugin "logfile">
  LogLevel "info"
  File "{log_file}"
  Timestamp true
</Plugin>

"#,
        header = HEADER,
        log_file = log_file
    );

    if let Some((_, secs)) = interval {
        out.push_str(&format!("Interval {}\n\n", secs));
        out.extend(HOST_PLUGINS.iter().map(|(plugin, settings)| plugin_block(plugin, settings)));
        out.push('\n');
    }

    let processors = metrics.referenced_processors();
    if !processors.is_empty() {
        let rules: String = processors
            .into_iter()
            .flat_map(|(id, MetricsProcessor::ExcludeMetrics(exclude))| {
                exclude
                    .metrics_pattern
                    .iter()
                    .enumerate()
                    .map(move |(index, pattern)| exclusion_rule(id, index, pattern))
            })
            .collect();
        out.push_str(&format!(
            "LoadPlugin match_regex\n<Chain \"PreCache\">\n{}</Chain>\n\n",
            rules
        ));
    }

    out.push_str(
        r#"LoadPlugin write_gcm
<Plugin "write_gcm">
  PrettyPrintJSON false
</Plugin>
"#,
    );

    debug!(
        pipelines = metrics.pipelines().len(),
        bytes = out.len(),
        "generated collectd configuration"
    );
    Ok(out)
}

/// `LoadPlugin` line plus the plugin's settings block, if it has settings
fn plugin_block(plugin: &str, settings: &[(&str, &str)]) -> String {
    if settings.is_empty() {
        return format!("LoadPlugin {}\n", plugin);
    }
    let lines: String = settings
        .iter()
        .map(|(key, value)| format!("  {} {}\n", key, value))
        .collect();
    format!(
        "LoadPlugin {plugin}\n<Plugin \"{plugin}\">\n{lines}</Plugin>\n",
        plugin = plugin,
        lines = lines
    )
}

/// `PreCache` rule dropping the metrics one pattern selects
fn exclusion_rule(id: &str, index: usize, pattern: &str) -> String {
    let matchers: String = pattern_matchers(pattern)
        .into_iter()
        .map(|(field, regex)| format!("      {} \"{}\"\n", field, regex))
        .collect();
    format!(
        r#"  <Rule "{id}_{index}">
    <Match "regex">
{matchers}    </Match>
    Target "stop"
  </Rule>
"#,
        id = id,
        index = index,
        matchers = matchers
    )
}

/// Translate a metric pattern into `match_regex` fields.
///
/// The family segment selects the plugin and the next segment, when given,
/// the type. A trailing `*` leaves the last regex open-ended.
fn pattern_matchers(pattern: &str) -> Vec<(&'static str, String)> {
    let rest = pattern.strip_prefix(METRIC_PREFIX).unwrap_or(pattern);
    ["Plugin", "Type"]
        .into_iter()
        .zip(rest.splitn(2, '/'))
        .filter(|(_, segment)| !segment.is_empty())
        .map(|(field, segment)| {
            let regex = match segment.strip_suffix('*') {
                Some(prefix) => format!("^{}", regex::escape(prefix)),
                None => format!("^{}$", regex::escape(segment)),
            };
            (field, regex)
        })
        .collect()
}

/// collectd generator
pub struct CollectdGenerator;

impl ConfigGenerator for CollectdGenerator {
    fn backend(&self) -> Backend {
        Backend::Collectd
    }

    fn generate(
        &self,
        config: &ValidatedConfig,
        defaults: &PlatformDefaults,
    ) -> Result<Vec<GeneratedFile>> {
        crate::platform::ensure_applicable(Backend::Collectd, config, &defaults.host)?;
        let text = generate_collectd_config(config, &defaults.logs_dir)?;
        Ok(vec![GeneratedFile::new(CONFIG_FILE, text)])
    }
}
