//! Domain models for unified configurations

mod component;
mod defaults;
mod logging;
mod metrics;
mod model;
mod pipeline;
mod validated;

pub use component::Component;
pub use defaults::{HostInfo, PlatformDefaults};
pub use logging::{
    FilesReceiver, LoggingProcessor, LoggingReceiver, ParseJsonProcessor, ParseRegexProcessor,
    SyslogReceiver, TransportProtocol, WindowsEventLogReceiver,
};
pub use metrics::{
    ExcludeMetricsProcessor, HostmetricsReceiver, IisReceiver, MetricsProcessor, MetricsReceiver,
    MssqlReceiver,
};
pub use model::{SectionConfig, Service, UnifiedConfig};
pub use pipeline::Pipeline;
pub use validated::{TypedComponent, ValidatedConfig, ValidatedSection};
