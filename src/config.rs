use crate::error::ConfigError;
use std::path::PathBuf;
use std::str::FromStr;

/// How collected key tags are printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One query command per line
    #[default]
    Text,
    /// A JSON array of zone reports
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidOutputFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Tracing filter directive
    pub log_filter: String,

    /// Command prefix for each printed signal query
    pub query_command: String,

    /// Resolver configuration files to scan for trust anchors
    pub resolver_configs: Vec<PathBuf>,

    pub output: OutputFormat,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            log_filter: "warn".to_string(),
            query_command: "dig -t null -c in".to_string(),
            resolver_configs: vec![],
            output: OutputFormat::Text,
        }
    }
}

impl MonitorConfig {
    /// Create a MonitorConfig from environment variables
    /// Returns Err if a variable is present but invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(log_filter) = std::env::var("ANCHORWATCH_LOG") {
            config.log_filter = log_filter;
        }

        if let Ok(query_command) = std::env::var("ANCHORWATCH_QUERY_COMMAND") {
            config.query_command = query_command;
        }

        if let Ok(resolver_configs) = std::env::var("ANCHORWATCH_RESOLVER_CONFIGS") {
            config.resolver_configs = resolver_configs
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .collect();
        }

        if let Ok(output) = std::env::var("ANCHORWATCH_OUTPUT") {
            config.output = output.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.query_command.trim().is_empty() {
            return Err(ConfigError::InvalidQueryCommand(
                "Query command must not be empty".to_string(),
            ));
        }
        if self.query_command.contains(['\n', '\r']) {
            return Err(ConfigError::InvalidQueryCommand(
                "Query command must be a single line".to_string(),
            ));
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::InvalidLogFilter(
                "Log filter must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
