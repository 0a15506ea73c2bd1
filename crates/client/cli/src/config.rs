//! CLI demo configuration structures and loaders.
use std::env;

use message_log::MessageLogConfig;

/// Configuration for the interactive message log demo.
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub message_log: MessageLogConfig,
    /// Seed for the notice generator; random when unset.
    pub demo_seed: Option<u64>,
    pub session_id: Option<String>,
}

impl CliConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DEMO_SEED` - Seed for the combat notice generator (default: random)
    /// - `DEMO_SESSION_ID` - Log directory name for this run (default: timestamp)
    /// - every variable read by [`MessageLogConfig::from_env`]
    pub fn from_env() -> Self {
        Self {
            message_log: MessageLogConfig::from_env(),
            demo_seed: read_env::<u64>("DEMO_SEED"),
            session_id: env::var("DEMO_SESSION_ID").ok(),
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
