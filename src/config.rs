// Tracker configuration: where holidays come from and which years are kept in memory

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://date.nager.at/api/v3";
pub const DEFAULT_COUNTRY_CODE: &str = "TR";
pub const DEFAULT_YEARS: [i32; 3] = [2023, 2024, 2025];

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Root of the holiday API, without a trailing slash.
    pub base_url: String,
    /// ISO 3166-1 alpha-2 code of the country to load.
    pub country_code: String,
    /// Years loaded eagerly at start-up.
    pub years: Vec<i32>,
    pub timeout_ms: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            years: DEFAULT_YEARS.to_vec(),
            timeout_ms: 10_000,
        }
    }
}

impl TrackerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
