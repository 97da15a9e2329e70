//! Parameter kinds for component schemas

use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::Value;
use std::fmt;

/// Prefix every metric name produced by the agent carries
pub const METRIC_PREFIX: &str = "agent.googleapis.com/";

/// Durations: a positive integer followed by a unit (`s`, `m` or `h`)
static DURATION_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]+)(s|m|h)$").unwrap());

/// Declared type of a component parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// String with at least one character
    NonEmptyString,
    /// Sequence of strings, possibly empty
    StringList,
    /// Sequence of strings with at least one element
    NonEmptyStringList,
    /// TCP/UDP port number
    Port,
    /// Duration string such as `60s`, with a lower bound in seconds
    Duration { min_secs: u64 },
    /// One of a fixed set of strings
    Enum(&'static [&'static str]),
    /// Non-empty list of metric name patterns
    MetricPatternList,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::NonEmptyString => write!(f, "non-empty string"),
            ParamKind::StringList => write!(f, "list of strings"),
            ParamKind::NonEmptyStringList => write!(f, "non-empty list of strings"),
            ParamKind::Port => write!(f, "port"),
            ParamKind::Duration { .. } => write!(f, "duration"),
            ParamKind::Enum(values) => write!(f, "one of [{}]", values.join(", ")),
            ParamKind::MetricPatternList => write!(f, "list of metric patterns"),
        }
    }
}

impl ParamKind {
    /// Check a YAML value against this kind.
    ///
    /// Returns the reason the value was rejected; the reason is part of the
    /// user-visible error text.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        match self {
            ParamKind::NonEmptyString => match value.as_str() {
                Some(s) if !s.is_empty() => single_line(s),
                _ => Err("expected a non-empty string".to_string()),
            },
            ParamKind::StringList => string_list(value).map(|_| ()),
            ParamKind::NonEmptyStringList => {
                let items = string_list(value)?;
                if items.is_empty() {
                    return Err("expected at least one entry".to_string());
                }
                Ok(())
            }
            ParamKind::Port => match value.as_u64() {
                Some(port) if (1..=65535).contains(&port) => Ok(()),
                _ => Err("expected a port number between 1 and 65535".to_string()),
            },
            ParamKind::Duration { min_secs } => {
                let raw = value
                    .as_str()
                    .ok_or_else(|| "expected a duration such as \"60s\"".to_string())?;
                let secs = parse_duration_secs(raw)
                    .ok_or_else(|| format!("invalid duration {:?}, expected a value such as \"60s\"", raw))?;
                if secs < *min_secs {
                    return Err(format!(
                        "duration {} is below the minimum of {}s",
                        raw, min_secs
                    ));
                }
                Ok(())
            }
            ParamKind::Enum(allowed) => match value.as_str() {
                Some(s) if allowed.contains(&s) => Ok(()),
                _ => Err(format!("expected one of [{}]", allowed.join(", "))),
            },
            ParamKind::MetricPatternList => {
                let patterns = string_list(value)?;
                if patterns.is_empty() {
                    return Err("expected at least one entry".to_string());
                }
                for pattern in patterns {
                    check_metric_pattern(pattern)?;
                }
                Ok(())
            }
        }
    }
}

fn string_list(value: &Value) -> Result<Vec<&str>, String> {
    let seq = value
        .as_sequence()
        .ok_or_else(|| "expected a list of strings".to_string())?;
    seq.iter()
        .map(|item| {
            let s = item
                .as_str()
                .ok_or_else(|| "expected a list of strings".to_string())?;
            single_line(s)?;
            Ok(s)
        })
        .collect()
}

/// Values are written verbatim into line-oriented backend files
fn single_line(s: &str) -> Result<(), String> {
    if s.chars().any(char::is_control) {
        return Err("must not contain line breaks or other control characters".to_string());
    }
    Ok(())
}

fn check_metric_pattern(pattern: &str) -> Result<(), String> {
    if !pattern.starts_with(METRIC_PREFIX) {
        return Err(format!(
            "pattern {:?} must start with {:?}",
            pattern, METRIC_PREFIX
        ));
    }
    let wildcards = pattern.matches('*').count();
    if wildcards > 1 || (wildcards == 1 && !pattern.ends_with('*')) {
        return Err(format!(
            "pattern {:?} may only contain a single trailing '*'",
            pattern
        ));
    }
    Ok(())
}

/// Parse a duration string such as `60s`, `5m` or `1h` into seconds
pub fn parse_duration_secs(raw: &str) -> Option<u64> {
    let caps = DURATION_PATTERN.captures(raw)?;
    let amount: u64 = caps.get(1)?.as_str().parse().ok()?;
    let scale = match caps.get(2)?.as_str() {
        "s" => 1,
        "m" => 60,
        "h" => 3600,
        _ => return None,
    };
    amount.checked_mul(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(src: &str) -> Value {
        serde_yaml::from_str(src).unwrap()
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration_secs("60s"), Some(60));
        assert_eq!(parse_duration_secs("2m"), Some(120));
        assert_eq!(parse_duration_secs("1h"), Some(3600));
        assert_eq!(parse_duration_secs("1.5m"), None);
        assert_eq!(parse_duration_secs("60"), None);
    }

    #[test]
    fn test_check_strings() {
        assert!(ParamKind::NonEmptyString.check(&yaml("\"\"")).is_err());
        assert!(ParamKind::NonEmptyString.check(&yaml("42")).is_err());
        assert!(ParamKind::StringList.check(&yaml("[]")).is_ok());
        assert!(ParamKind::NonEmptyStringList.check(&yaml("[]")).is_err());
        assert!(ParamKind::StringList.check(&yaml("[a, 1]")).is_err());
        assert!(ParamKind::StringList.check(&yaml("/var/log/a.log")).is_err());
    }

    #[test]
    fn test_check_rejects_control_characters() {
        let reason = "must not contain line breaks or other control characters";
        assert_eq!(
            ParamKind::NonEmptyString
                .check(&yaml("\"^(?<message>.*)\\n[OUTPUT]$\""))
                .unwrap_err(),
            reason
        );
        assert_eq!(
            ParamKind::NonEmptyStringList
                .check(&yaml("[\"/a.log\\n[OUTPUT]\\n    Name null\"]"))
                .unwrap_err(),
            reason
        );
        assert!(ParamKind::StringList.check(&yaml("[\"a\\tb\"]")).is_err());
        assert!(ParamKind::NonEmptyString.check(&yaml("\"C:\\\\logs\\\\a.log\"")).is_ok());
    }

    #[test]
    fn test_check_port() {
        assert!(ParamKind::Port.check(&yaml("5140")).is_ok());
        assert!(ParamKind::Port.check(&yaml("0")).is_err());
        assert!(ParamKind::Port.check(&yaml("70000")).is_err());
        assert!(ParamKind::Port.check(&yaml("\"5140\"")).is_err());
    }

    #[test]
    fn test_check_duration() {
        let kind = ParamKind::Duration { min_secs: 10 };
        assert!(kind.check(&yaml("\"60s\"")).is_ok());
        assert_eq!(
            kind.check(&yaml("\"5s\"")).unwrap_err(),
            "duration 5s is below the minimum of 10s"
        );
        assert!(kind.check(&yaml("60")).is_err());
    }

    #[test]
    fn test_check_enum() {
        let kind = ParamKind::Enum(&["tcp", "udp"]);
        assert!(kind.check(&yaml("tcp")).is_ok());
        assert_eq!(kind.check(&yaml("http")).unwrap_err(), "expected one of [tcp, udp]");
    }

    #[test]
    fn test_check_metric_patterns() {
        let kind = ParamKind::MetricPatternList;
        assert!(kind
            .check(&yaml("[agent.googleapis.com/cpu/*, agent.googleapis.com/memory/bytes_used]"))
            .is_ok());
        assert!(kind.check(&yaml("[custom.googleapis.com/x]")).is_err());
        assert!(kind.check(&yaml("[agent.googleapis.com/*/utilization]")).is_err());
        assert!(kind.check(&yaml("[]")).is_err());
    }
}
