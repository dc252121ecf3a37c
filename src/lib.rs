// Public holiday tracker: fetches one country's holidays for a set of years and queries them in memory

pub mod config;
pub mod fetcher;
pub mod holiday;
pub mod menu;
pub mod repository;

// Re-export key types for convenience
pub use config::TrackerConfig;
pub use fetcher::{FetchError, HolidayFetcher, HttpFetcher};
pub use holiday::{decode_holidays, HolidayRecord};
pub use menu::Menu;
pub use repository::{
    AllHolidays, DayMonth, HolidayMatch, HolidayRepository, LoadReport, UsageError, YearOutcome,
};
