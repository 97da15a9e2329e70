//! Typed logging components

use confgen_types::{Role, Section};
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;
use std::fmt;

use super::validated::{decode, TypedComponent};

/// Tails files matching glob patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilesReceiver {
    pub include_paths: Vec<String>,

    #[serde(default)]
    pub exclude_paths: Vec<String>,

    /// Parser applied when the record is read
    #[serde(default)]
    pub parser: Option<String>,
}

/// Transport the syslog listener binds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportProtocol {
    Tcp,
    Udp,
}

impl fmt::Display for TransportProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportProtocol::Tcp => write!(f, "tcp"),
            TransportProtocol::Udp => write!(f, "udp"),
        }
    }
}

/// Listens for syslog messages on a socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyslogReceiver {
    pub transport_protocol: TransportProtocol,
    pub listen_host: String,
    pub listen_port: u16,

    /// Parser applied to each message; the default message parser otherwise
    #[serde(default)]
    pub parser: Option<String>,
}

/// Reads Windows event log channels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowsEventLogReceiver {
    pub channels: Vec<String>,
}

/// Logging receiver kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingReceiver {
    Files(FilesReceiver),
    Syslog(SyslogReceiver),
    WindowsEventLog(WindowsEventLogReceiver),
}

impl LoggingReceiver {
    /// Name of the parser this receiver binds by name, if any
    pub fn parser(&self) -> Option<&str> {
        match self {
            LoggingReceiver::Files(r) => r.parser.as_deref(),
            LoggingReceiver::Syslog(r) => r.parser.as_deref(),
            LoggingReceiver::WindowsEventLog(_) => None,
        }
    }
}

impl TypedComponent for LoggingReceiver {
    const SECTION: Section = Section::Logging;
    const ROLE: Role = Role::Receiver;

    fn from_params(type_name: &str, params: Mapping) -> Option<Result<Self, serde_yaml::Error>> {
        let decoded = match type_name {
            "files" => decode(params).map(LoggingReceiver::Files),
            "syslog" => decode(params).map(LoggingReceiver::Syslog),
            "windows_event_log" => decode(params).map(LoggingReceiver::WindowsEventLog),
            _ => return None,
        };
        Some(decoded)
    }

    fn type_name(&self) -> &'static str {
        match self {
            LoggingReceiver::Files(_) => "files",
            LoggingReceiver::Syslog(_) => "syslog",
            LoggingReceiver::WindowsEventLog(_) => "windows_event_log",
        }
    }
}

/// Parses a field as JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParseJsonProcessor {
    pub field: String,

    #[serde(default)]
    pub time_key: Option<String>,

    #[serde(default)]
    pub time_format: Option<String>,
}

/// Parses a field with a regular expression with named captures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParseRegexProcessor {
    pub regex: String,
    pub field: String,

    #[serde(default)]
    pub time_key: Option<String>,

    #[serde(default)]
    pub time_format: Option<String>,
}

/// Logging processor kinds.
///
/// Both kinds are parser components: besides filtering records in a pipeline
/// they can be bound by name from a receiver's `parser` parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingProcessor {
    ParseJson(ParseJsonProcessor),
    ParseRegex(ParseRegexProcessor),
}

impl LoggingProcessor {
    /// Record field the parser reads
    pub fn field(&self) -> &str {
        match self {
            LoggingProcessor::ParseJson(p) => &p.field,
            LoggingProcessor::ParseRegex(p) => &p.field,
        }
    }

    /// Field holding the record timestamp
    pub fn time_key(&self) -> Option<&str> {
        match self {
            LoggingProcessor::ParseJson(p) => p.time_key.as_deref(),
            LoggingProcessor::ParseRegex(p) => p.time_key.as_deref(),
        }
    }

    /// strptime format of the timestamp field
    pub fn time_format(&self) -> Option<&str> {
        match self {
            LoggingProcessor::ParseJson(p) => p.time_format.as_deref(),
            LoggingProcessor::ParseRegex(p) => p.time_format.as_deref(),
        }
    }
}

impl TypedComponent for LoggingProcessor {
    const SECTION: Section = Section::Logging;
    const ROLE: Role = Role::Processor;

    fn from_params(type_name: &str, params: Mapping) -> Option<Result<Self, serde_yaml::Error>> {
        let decoded = match type_name {
            "parse_json" => decode(params).map(LoggingProcessor::ParseJson),
            "parse_regex" => decode(params).map(LoggingProcessor::ParseRegex),
            _ => return None,
        };
        Some(decoded)
    }

    fn type_name(&self) -> &'static str {
        match self {
            LoggingProcessor::ParseJson(_) => "parse_json",
            LoggingProcessor::ParseRegex(_) => "parse_regex",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    fn params(src: &str) -> Mapping {
        serde_yaml::from_str(src).unwrap()
    }

    #[test]
    fn test_decode_syslog() {
        let receiver = LoggingReceiver::from_params(
            "syslog",
            params("{transport_protocol: udp, listen_host: 0.0.0.0, listen_port: 514}"),
        )
        .unwrap()
        .unwrap();

        match &receiver {
            LoggingReceiver::Syslog(r) => {
                assert_eq!(r.transport_protocol, TransportProtocol::Udp);
                assert_eq!(r.listen_port, 514);
                assert!(r.parser.is_none());
            }
            other => panic!("unexpected receiver {:?}", other),
        }
        assert_eq!(receiver.type_name(), "syslog");
    }

    #[test]
    fn test_decode_unknown_type() {
        assert!(LoggingReceiver::from_params("journald", Mapping::new()).is_none());
        assert!(LoggingProcessor::from_params("lua", Mapping::new()).is_none());
    }

    #[test]
    fn test_decode_rejects_unknown_field() {
        let mut p = params("{include_paths: [/a.log]}");
        p.insert(Value::from("bogus"), Value::from(true));
        assert!(LoggingReceiver::from_params("files", p).unwrap().is_err());
    }

    #[test]
    fn test_processor_accessors() {
        let processor = LoggingProcessor::from_params(
            "parse_regex",
            params("{regex: '^(?<msg>.*)$', field: log, time_key: ts}"),
        )
        .unwrap()
        .unwrap();

        assert_eq!(processor.field(), "log");
        assert_eq!(processor.time_key(), Some("ts"));
        assert_eq!(processor.time_format(), None);
        assert_eq!(processor.type_name(), "parse_regex");
    }
}
