pub mod config;
pub mod error;
pub mod fault;
pub mod metric;
pub mod parse;
pub mod pipeline;
pub mod server;
pub mod system;

pub use error::{CollectError, ParseError, PipelineError};
pub use metric::Metric;
pub use system::collector::Collector;
pub use system::snapshot::Snapshot;
