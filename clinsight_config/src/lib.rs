mod schema;

pub use schema::{Config, IngestConfig, LoggingConfig, OutputConfig};
