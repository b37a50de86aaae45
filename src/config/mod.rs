pub mod loader;
pub mod options;
pub mod settings;

pub use options::ClientOptions;
pub use settings::{AgentConfig, LogFormat, LoggingConfig, SettingsConfig};
