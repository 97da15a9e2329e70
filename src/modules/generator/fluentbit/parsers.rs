//! Parser configuration
//!
//! Parsers are keyed by name and shared by every stanza that references
//! them. Names under the reserved `lib:` prefix are built in; all others are
//! the IDs of logging processors.

use confgen_core::{ConfgenError, LoggingProcessor, LoggingReceiver, Result, ValidatedSection};
use confgen_types::Backend;

use super::stanza::{render_all, Stanza};

/// Parser bound to syslog receivers that do not name one
pub const DEFAULT_MESSAGE_PARSER: &str = "lib:default_message_parser";

/// Built-in parser definitions: name, regex
const BUILTIN_PARSERS: &[(&str, &str)] = &[(DEFAULT_MESSAGE_PARSER, r"^(?<message>.*)$")];

/// Parser definitions collected while the main configuration is rendered
#[derive(Debug, Default)]
pub struct ParserConf {
    parsers: Vec<(String, Stanza)>,
}

impl ParserConf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a parser named `name` was already added
    pub fn contains(&self, name: &str) -> bool {
        self.parsers.iter().any(|(n, _)| n == name)
    }

    /// Resolve the parser a receiver binds by name and add its definition
    pub fn require(
        &mut self,
        logging: &ValidatedSection<LoggingReceiver, LoggingProcessor>,
        receiver: &str,
        name: &str,
    ) -> Result<()> {
        if self.contains(name) {
            return Ok(());
        }

        let stanza = builtin_parser(name)
            .or_else(|| logging.processor(name).map(|p| parser_stanza(name, p)))
            .ok_or_else(|| {
                ConfgenError::generation(
                    Backend::FluentBit,
                    format!(
                        "logging receiver {:?} references undefined parser {:?}",
                        receiver, name
                    ),
                )
            })?;
        self.parsers.push((name.to_string(), stanza));
        Ok(())
    }

    /// Add the definition of a processor used as a filter
    pub fn add_processor(&mut self, id: &str, processor: &LoggingProcessor) {
        if !self.contains(id) {
            self.parsers.push((id.to_string(), parser_stanza(id, processor)));
        }
    }

    /// Render the parser configuration file
    pub fn render(&self) -> String {
        render_all(&[], self.parsers.iter().map(|(_, s)| s))
    }
}

fn builtin_parser(name: &str) -> Option<Stanza> {
    BUILTIN_PARSERS
        .iter()
        .find(|(builtin, _)| *builtin == name)
        .map(|(builtin, regex)| {
            Stanza::new("PARSER")
                .entry("Name", builtin)
                .entry("Format", "regex")
                .entry("Regex", regex)
        })
}

fn parser_stanza(name: &str, processor: &LoggingProcessor) -> Stanza {
    let stanza = Stanza::new("PARSER").entry("Name", name);
    let stanza = match processor {
        LoggingProcessor::ParseJson(_) => stanza.entry("Format", "json"),
        LoggingProcessor::ParseRegex(p) => stanza.entry("Format", "regex").entry("Regex", &p.regex),
    };
    stanza
        .entry_opt("Time_Key", processor.time_key())
        .entry_opt("Time_Format", processor.time_format())
}
