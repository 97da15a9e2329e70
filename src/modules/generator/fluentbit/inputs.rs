//! INPUT, FILTER and OUTPUT stanzas for logging components

use confgen_core::{
    FilesReceiver, HostInfo, LoggingProcessor, SyslogReceiver, WindowsEventLogReceiver,
};
use confgen_types::Platform;

use super::stanza::Stanza;

/// Product name in the user agent the output plugin reports
pub const USER_AGENT_PRODUCT: &str = "ops-agent-logging";

const TAIL_DOCS: &str = "https://docs.fluentbit.io/manual/pipeline/inputs/tail#config";
const SYSLOG_DOCS: &str = "https://docs.fluentbit.io/manual/pipeline/inputs/syslog#configuration-parameters";
const WINLOG_DOCS: &str = "https://docs.fluentbit.io/manual/pipeline/inputs/windows-event-log#configuration-parameters";
const PARSER_DOCS: &str = "https://docs.fluentbit.io/manual/pipeline/filters/parser#configuration-parameters";
const STACKDRIVER_DOCS: &str = "https://docs.fluentbit.io/manual/pipeline/outputs/stackdriver#configuration-parameters";

/// Paths and naming shared by every stanza of one main configuration
pub struct InputContext<'a> {
    pub platform: Platform,
    pub logs_dir: &'a str,
}

impl InputContext<'_> {
    /// Checkpoint database for a tag-like name
    fn db(&self, name: &str) -> String {
        self.platform.join_path("${buffers_dir}", name)
    }

    /// Resolve a user path against the log directory unless it is absolute
    fn resolve(&self, path: &str) -> String {
        if self.platform.is_absolute_path(path) {
            path.to_string()
        } else {
            self.platform.join_path(self.logs_dir, path)
        }
    }

    fn resolve_all(&self, paths: &[String]) -> String {
        paths
            .iter()
            .map(|p| self.resolve(p))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Routing tag of one receiver within a pipeline.
///
/// Identifiers never contain `.`, so the tag is unique per input and also
/// names its checkpoint database.
pub fn routing_tag(pipeline: &str, receiver: &str) -> String {
    format!("{}.{}", pipeline, receiver)
}

/// Tail input with buffering settings shared by user and self-log inputs
fn tail(tag: &str, path: String, exclude: Option<String>, db: String) -> Stanza {
    Stanza::new("INPUT")
        .comment(TAIL_DOCS)
        .entry("Name", "tail")
        .entry("Tag", tag)
        .entry("Path", path)
        .entry_opt("Exclude_Path", exclude)
        .entry("DB", db)
        .entry("Read_from_Head", "True")
        .entry("Buffer_Chunk_Size", "512k")
        .entry("Buffer_Max_Size", "5M")
        .entry("Rotate_Wait", 30)
        .entry("Skip_Long_Lines", "On")
        .entry("Key", "message")
        .entry("Mem_Buf_Limit", "10M")
        .entry("storage.type", "filesystem")
}

/// `files` receiver
pub fn files_input(
    ctx: &InputContext<'_>,
    pipeline: &str,
    receiver: &str,
    files: &FilesReceiver,
) -> Stanza {
    let exclude = if files.exclude_paths.is_empty() {
        None
    } else {
        Some(ctx.resolve_all(&files.exclude_paths))
    };

    let tag = routing_tag(pipeline, receiver);
    tail(
        &tag,
        ctx.resolve_all(&files.include_paths),
        exclude,
        ctx.db(&tag),
    )
    .entry_opt("Parser", files.parser.as_deref())
}

/// `syslog` receiver bound to `parser`
pub fn syslog_input(pipeline: &str, receiver: &str, syslog: &SyslogReceiver, parser: &str) -> Stanza {
    Stanza::new("INPUT")
        .comment(SYSLOG_DOCS)
        .entry("Name", "syslog")
        .entry("Tag", routing_tag(pipeline, receiver))
        .entry("Mode", syslog.transport_protocol)
        .entry("Listen", &syslog.listen_host)
        .entry("Port", syslog.listen_port)
        .entry("Parser", parser)
        .entry("Mem_Buf_Limit", "10M")
        .entry("storage.type", "filesystem")
}

/// `windows_event_log` receiver
pub fn winlog_input(
    ctx: &InputContext<'_>,
    pipeline: &str,
    receiver: &str,
    winlog: &WindowsEventLogReceiver,
) -> Stanza {
    let tag = routing_tag(pipeline, receiver);
    Stanza::new("INPUT")
        .comment(WINLOG_DOCS)
        .entry("Name", "winlog")
        .entry("Tag", &tag)
        .entry("Channels", winlog.channels.join(","))
        .entry("Interval_Sec", 1)
        .entry("DB", ctx.db(&tag))
}

/// Tail input for a backend's own log file
pub fn self_log_input(ctx: &InputContext<'_>, tag: &str, file: &str) -> Stanza {
    tail(
        tag,
        ctx.platform.join_path("${logs_dir}", file),
        None,
        ctx.db(tag),
    )
}

/// Parse processor applied to every record of a pipeline
pub fn parser_filter(pipeline: &str, id: &str, processor: &LoggingProcessor) -> Stanza {
    Stanza::new("FILTER")
        .comment(PARSER_DOCS)
        .entry("Name", "parser")
        .entry("Match", format!("{}.*", pipeline))
        .entry("Key_Name", processor.field())
        .entry("Parser", id)
        .entry("Reserve_Data", "True")
}

fn stackdriver() -> Stanza {
    Stanza::new("OUTPUT")
        .comment(STACKDRIVER_DOCS)
        .entry("Name", "stackdriver")
}

fn stackdriver_settings(stanza: Stanza, host: &HostInfo) -> Stanza {
    stanza
        .entry("resource", "gce_instance")
        .entry("stackdriver_agent", host.user_agent(USER_AGENT_PRODUCT))
        .entry("workers", 8)
        .entry("Retry_Limit", 3)
        .entry("tls", "On")
        .entry("tls.verify", "Off")
}

/// Output closing a user pipeline
pub fn pipeline_output(pipeline: &str, host: &HostInfo) -> Stanza {
    stackdriver_settings(
        stackdriver().entry("Match", format!("{}.*", pipeline)),
        host,
    )
}

/// Output shared by every self-log input
pub fn self_log_output(tags: &[&str], host: &HostInfo) -> Stanza {
    stackdriver_settings(
        stackdriver().entry("Match_Regex", format!("^({})$", tags.join("|"))),
        host,
    )
}
