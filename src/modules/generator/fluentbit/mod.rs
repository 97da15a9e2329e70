//! Fluent Bit configuration generator
//!
//! Produces the main configuration (`[SERVICE]`, `[INPUT]`, `[FILTER]` and
//! `[OUTPUT]` stanzas) and the parser configuration (`[PARSER]` stanzas) for
//! the logging section. Pipelines are emitted in declaration order; within a
//! pipeline every receiver gets one input tagged `<pipeline>.<receiver>`,
//! every processor one filter matching `<pipeline>.*`, and one output closes
//! the pipeline.

mod inputs;
mod parsers;
mod stanza;

pub use parsers::DEFAULT_MESSAGE_PARSER;

use confgen_core::{HostInfo, LoggingReceiver, PlatformDefaults, Result, ValidatedConfig};
use confgen_types::Backend;
use tracing::debug;

use crate::platform::{capabilities, ensure_applicable};
use crate::traits::{ConfigGenerator, GeneratedFile};
use inputs::InputContext;
use parsers::ParserConf;
use stanza::{render_all, Stanza};

/// Main configuration file name
pub const MAIN_CONFIG_FILE: &str = "fluent_bit_main.conf";

/// Parser configuration file name
pub const PARSER_CONFIG_FILE: &str = "fluent_bit_parser.conf";

const SERVICE_DOCS: &str =
    "https://docs.fluentbit.io/manual/administration/configuring-fluent-bit/classic-mode/configuration-file#config_section";

/// Generate the main and parser configurations
pub fn generate_fluent_bit_configs(
    config: &ValidatedConfig,
    logs_dir: &str,
    state_dir: &str,
    host: &HostInfo,
) -> Result<(String, String)> {
    ensure_applicable(Backend::FluentBit, config, host)?;

    let platform = config.platform();
    let logging = config.logging();
    let ctx = InputContext { platform, logs_dir };
    let mut parsers = ParserConf::new();

    let header = vec![
        format!("@SET buffers_dir={}", platform.join_path(state_dir, "buffers")),
        format!("@SET logs_dir={}", logs_dir),
    ];
    let mut stanzas = vec![service()];

    for pipeline in logging.pipelines() {
        for (id, receiver) in logging.pipeline_receivers(pipeline) {
            let stanza = match receiver {
                LoggingReceiver::Files(files) => {
                    if let Some(parser) = &files.parser {
                        parsers.require(logging, id, parser)?;
                    }
                    inputs::files_input(&ctx, &pipeline.name, id, files)
                }
                LoggingReceiver::Syslog(syslog) => {
                    let parser = syslog.parser.as_deref().unwrap_or(DEFAULT_MESSAGE_PARSER);
                    parsers.require(logging, id, parser)?;
                    inputs::syslog_input(&pipeline.name, id, syslog, parser)
                }
                LoggingReceiver::WindowsEventLog(winlog) => {
                    inputs::winlog_input(&ctx, &pipeline.name, id, winlog)
                }
            };
            stanzas.push(stanza);
        }

        for (id, processor) in logging.pipeline_processors(pipeline) {
            parsers.add_processor(id, processor);
            stanzas.push(inputs::parser_filter(&pipeline.name, id, processor));
        }

        stanzas.push(inputs::pipeline_output(&pipeline.name, host));
    }

    let self_logs: Vec<(&str, &str)> = capabilities(platform)
        .iter()
        .filter_map(|b| b.self_log_file().map(|file| (b.self_log_tag(), file)))
        .collect();
    for (tag, file) in &self_logs {
        stanzas.push(inputs::self_log_input(&ctx, tag, file));
    }
    if !self_logs.is_empty() {
        let tags: Vec<&str> = self_logs.iter().map(|(tag, _)| *tag).collect();
        stanzas.push(inputs::self_log_output(&tags, host));
    }

    debug!(
        pipelines = logging.pipelines().len(),
        stanzas = stanzas.len(),
        "generated fluent-bit configuration"
    );
    Ok((render_all(&header, &stanzas), parsers.render()))
}

fn service() -> Stanza {
    Stanza::new("SERVICE")
        .comment(SERVICE_DOCS)
        .entry("Daemon", "off")
        .entry("Flush", 1)
        .entry("Log_Level", "info")
        .entry("storage.path", "${buffers_dir}")
        .entry("storage.sync", "normal")
        .entry("storage.checksum", "off")
        .entry("storage.backlog.mem_limit", "50M")
        .entry("storage.max_chunks_up", 128)
}

/// Fluent Bit generator
pub struct FluentBitGenerator;

impl ConfigGenerator for FluentBitGenerator {
    fn backend(&self) -> Backend {
        Backend::FluentBit
    }

    fn generate(
        &self,
        config: &ValidatedConfig,
        defaults: &PlatformDefaults,
    ) -> Result<Vec<GeneratedFile>> {
        let (main, parser) = generate_fluent_bit_configs(
            config,
            &defaults.logs_dir,
            &defaults.state_dir,
            &defaults.host,
        )?;
        Ok(vec![
            GeneratedFile::new(MAIN_CONFIG_FILE, main),
            GeneratedFile::new(PARSER_CONFIG_FILE, parser),
        ])
    }
}
