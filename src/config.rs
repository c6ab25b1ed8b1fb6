//! Command-line / environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_HOST: &str = "http://dronesim.facets-labs.com";

#[derive(Clone, Debug, Parser)]
#[command(name = "drone_console", about = "Drone fleet console with an arcade minigame")]
pub struct Config {
    /// Base URL of the drone simulation API.
    #[arg(long, env = "DRONE_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// User-Agent sent with every request.
    #[arg(long, env = "DRONE_USER_AGENT", default_value = "drone-console")]
    pub user_agent: String,

    /// Seconds before an API request is abandoned.
    #[arg(long, env = "DRONE_TIMEOUT_SECS", default_value_t = 15)]
    pub timeout_secs: u64,

    /// Rows per fleet page.
    #[arg(long, default_value_t = crate::fleet::PAGE_LIMIT)]
    pub page_size: usize,

    /// Directory for history files and the log.
    #[arg(long, env = "DRONE_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("drone-console.log")
    }
}
