//! Component registry
//!
//! A constant table describing every component kind the validator accepts:
//! its parameters (type, required flag, default) and the platforms on which
//! it is legal. Build it once with [`Registry::builtin`] and pass it to the
//! validator; tests substitute smaller tables through [`Registry::new`].

use confgen_types::{ParamKind, Platform, Role, Section};

/// Minimum collection interval accepted for metrics receivers
const MIN_COLLECTION_INTERVAL_SECS: u64 = 10;

const LINUX_AND_WINDOWS: &[Platform] = &[Platform::Linux, Platform::Windows];
const WINDOWS_ONLY: &[Platform] = &[Platform::Windows];

/// One parameter of a component kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,

    /// Value substituted when the parameter is absent
    pub default: Option<&'static str>,

    /// Another parameter that must be present when this one is
    pub requires: Option<&'static str>,
}

impl ParameterSpec {
    /// A required parameter
    pub const fn required(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            required: true,
            default: None,
            requires: None,
        }
    }

    /// An optional parameter without default
    pub const fn optional(name: &'static str, kind: ParamKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: None,
            requires: None,
        }
    }

    /// An optional parameter with a default
    pub const fn defaulted(name: &'static str, kind: ParamKind, default: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: Some(default),
            requires: None,
        }
    }

    /// Require `other` whenever this parameter is set
    pub const fn requiring(mut self, other: &'static str) -> Self {
        self.requires = Some(other);
        self
    }
}

/// Schema of one component kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpec {
    pub section: Section,
    pub role: Role,
    pub type_name: &'static str,
    pub platforms: &'static [Platform],
    pub params: Vec<ParameterSpec>,
}

impl ComponentSpec {
    /// Returns true if the kind is legal on `platform`
    pub fn supports(&self, platform: Platform) -> bool {
        self.platforms.contains(&platform)
    }

    /// Find a parameter by name
    pub fn param(&self, name: &str) -> Option<&ParameterSpec> {
        self.params.iter().find(|p| p.name == name)
    }
}

/// Immutable table of component kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    specs: Vec<ComponentSpec>,
}

impl Registry {
    /// Create a registry from explicit entries
    pub fn new(specs: Vec<ComponentSpec>) -> Self {
        Self { specs }
    }

    /// The registry of every kind the generators implement
    pub fn builtin() -> Self {
        let interval = || {
            ParameterSpec::defaulted(
                "collection_interval",
                ParamKind::Duration {
                    min_secs: MIN_COLLECTION_INTERVAL_SECS,
                },
                "60s",
            )
        };
        let parser_params = |mut params: Vec<ParameterSpec>| {
            params.push(ParameterSpec::defaulted("field", ParamKind::NonEmptyString, "message"));
            params.push(ParameterSpec::optional("time_key", ParamKind::NonEmptyString));
            params.push(
                ParameterSpec::optional("time_format", ParamKind::NonEmptyString)
                    .requiring("time_key"),
            );
            params
        };

        Self::new(vec![
            ComponentSpec {
                section: Section::Logging,
                role: Role::Receiver,
                type_name: "files",
                platforms: LINUX_AND_WINDOWS,
                params: vec![
                    ParameterSpec::required("include_paths", ParamKind::NonEmptyStringList),
                    ParameterSpec::optional("exclude_paths", ParamKind::StringList),
                    ParameterSpec::optional("parser", ParamKind::NonEmptyString),
                ],
            },
            ComponentSpec {
                section: Section::Logging,
                role: Role::Receiver,
                type_name: "syslog",
                platforms: LINUX_AND_WINDOWS,
                params: vec![
                    ParameterSpec::required("transport_protocol", ParamKind::Enum(&["tcp", "udp"])),
                    ParameterSpec::required("listen_host", ParamKind::NonEmptyString),
                    ParameterSpec::required("listen_port", ParamKind::Port),
                    ParameterSpec::optional("parser", ParamKind::NonEmptyString),
                ],
            },
            ComponentSpec {
                section: Section::Logging,
                role: Role::Receiver,
                type_name: "windows_event_log",
                platforms: WINDOWS_ONLY,
                params: vec![ParameterSpec::required(
                    "channels",
                    ParamKind::NonEmptyStringList,
                )],
            },
            ComponentSpec {
                section: Section::Logging,
                role: Role::Processor,
                type_name: "parse_json",
                platforms: LINUX_AND_WINDOWS,
                params: parser_params(Vec::new()),
            },
            ComponentSpec {
                section: Section::Logging,
                role: Role::Processor,
                type_name: "parse_regex",
                platforms: LINUX_AND_WINDOWS,
                params: parser_params(vec![ParameterSpec::required(
                    "regex",
                    ParamKind::NonEmptyString,
                )]),
            },
            ComponentSpec {
                section: Section::Metrics,
                role: Role::Receiver,
                type_name: "hostmetrics",
                platforms: LINUX_AND_WINDOWS,
                params: vec![interval()],
            },
            ComponentSpec {
                section: Section::Metrics,
                role: Role::Receiver,
                type_name: "iis",
                platforms: WINDOWS_ONLY,
                params: vec![interval()],
            },
            ComponentSpec {
                section: Section::Metrics,
                role: Role::Receiver,
                type_name: "mssql",
                platforms: WINDOWS_ONLY,
                params: vec![interval()],
            },
            ComponentSpec {
                section: Section::Metrics,
                role: Role::Processor,
                type_name: "exclude_metrics",
                platforms: LINUX_AND_WINDOWS,
                params: vec![ParameterSpec::required(
                    "metrics_pattern",
                    ParamKind::MetricPatternList,
                )],
            },
        ])
    }

    /// Find a kind regardless of platform
    pub fn find(&self, section: Section, role: Role, type_name: &str) -> Option<&ComponentSpec> {
        self.specs
            .iter()
            .find(|s| s.section == section && s.role == role && s.type_name == type_name)
    }

    /// Find a kind that is legal on `platform`
    pub fn lookup(
        &self,
        section: Section,
        role: Role,
        type_name: &str,
        platform: Platform,
    ) -> Option<&ComponentSpec> {
        self.find(section, role, type_name)
            .filter(|spec| spec.supports(platform))
    }

    /// Sorted type names known for a role
    pub fn type_names(&self, section: Section, role: Role) -> Vec<&'static str> {
        self.collect_names(section, role, None)
    }

    /// Sorted type names legal for a role on `platform`
    pub fn type_names_on(&self, section: Section, role: Role, platform: Platform) -> Vec<&'static str> {
        self.collect_names(section, role, Some(platform))
    }

    fn collect_names(
        &self,
        section: Section,
        role: Role,
        platform: Option<Platform>,
    ) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self
            .specs
            .iter()
            .filter(|s| s.section == section && s.role == role)
            .filter(|s| platform.map_or(true, |p| s.supports(p)))
            .map(|s| s.type_name)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
