//! Shared data model and configuration for viewstat.
//!
//! The reporting pipeline (`viewstat-pipeline`) produces the types defined
//! here; the fetch layer and CLI consume them.

pub mod app_config;
pub mod channels;
pub mod config;
pub mod observation;
pub mod table;

mod error;

pub use app_config::{AppConfig, GroupBy};
pub use channels::{load_channel_list, ChannelEntry, ChannelList};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use observation::{
    ChartData, ChartPoint, ChartSeries, DailyStat, Observation, Summary, SummaryRow,
    SummaryRowKind, GRAND_AVERAGE_LABEL,
};
pub use table::{NormalizedRow, NormalizedTable, RawTable, TimeColumn};
