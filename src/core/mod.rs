//! Domain types, configuration and the helpers shared by every layer.

pub mod bounds;
pub mod color;
pub mod config;
pub mod constants;
pub mod entry;
pub mod error;
pub mod messages;
pub mod rng;

// re-export frequently-used items for convenience
pub use color::{AnsiCode, ColorError, colorize};
pub use config::{AppConfig, AppConfigBuilder};
pub use entry::{MoodEntry, Score};
pub use error::{
    ConfigError, ExportError, MoodError, ParseCsvError, StatsError, StoreError, ValidationError,
};
pub use messages::Messages;
