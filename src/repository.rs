// Holiday repository: owns the per-year cache of fetched holidays and answers queries over it

use std::collections::BTreeMap;
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::TrackerConfig;
use crate::fetcher::{validate_request, FetchError, HolidayFetcher};
use crate::holiday::HolidayRecord;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsageError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

fn invalid(message: impl Into<String>) -> UsageError {
    UsageError::InvalidInput(message.into())
}

/// A day of a month with no year attached. 29-02 is accepted as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayMonth {
    pub day: u32,
    pub month: u32,
}

impl DayMonth {
    pub fn new(day: u32, month: u32) -> Result<Self, UsageError> {
        if !(1..=31).contains(&day) {
            return Err(invalid(format!("day must be between 1 and 31, got {day}")));
        }
        if !(1..=12).contains(&month) {
            return Err(invalid(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        Ok(Self { day, month })
    }
}

// Parses "dd-mm", e.g. "23-04"
impl FromStr for DayMonth {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (day, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| invalid(format!("expected dd-mm, got '{}'", s.trim())))?;

        fn component(part: &str, what: &str) -> Result<u32, UsageError> {
            if part.is_empty() || part.len() > 2 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid(format!("{what} must be one or two digits, got '{part}'")));
            }
            part.parse()
                .map_err(|_| invalid(format!("{what} is not a number: '{part}'")))
        }

        Self::new(component(day, "day")?, component(month, "month")?)
    }
}

/// A query hit together with the year whose cache entry it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HolidayMatch<'a> {
    pub year: i32,
    pub record: &'a HolidayRecord,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YearOutcome {
    /// Fetched now, with this many records.
    Loaded(usize),
    /// Fetch failed; the year is cached as empty.
    Failed(FetchError),
    /// Already in the cache, nothing was fetched.
    Cached,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub outcomes: Vec<(i32, YearOutcome)>,
}

impl LoadReport {
    pub fn failures(&self) -> impl Iterator<Item = (i32, &FetchError)> + '_ {
        self.outcomes.iter().filter_map(|(year, outcome)| match outcome {
            YearOutcome::Failed(e) => Some((*year, e)),
            _ => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryStats {
    pub fetches_issued: usize,
    pub years_loaded: usize,
    pub years_failed: usize,
    pub records_cached: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearSection<'a> {
    pub year: i32,
    /// Empty when the year has no data.
    pub records: &'a [HolidayRecord],
}

impl YearSection<'_> {
    pub fn has_data(&self) -> bool {
        !self.records.is_empty()
    }
}

/// Every supported year in ascending order, including years without data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllHolidays<'a> {
    pub sections: Vec<YearSection<'a>>,
}

impl<'a> AllHolidays<'a> {
    pub fn records(&self) -> impl Iterator<Item = HolidayMatch<'a>> + '_ {
        self.sections.iter().flat_map(|section| {
            section.records.iter().map(move |record| HolidayMatch {
                year: section.year,
                record,
            })
        })
    }

    pub fn years_without_data(&self) -> Vec<i32> {
        self.sections
            .iter()
            .filter(|section| !section.has_data())
            .map(|section| section.year)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sections.iter().map(|section| section.records.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory holiday store for one country.
///
/// Each year is fetched at most once. A failed fetch is cached as an empty
/// list, so queries report "no data" for that year instead of an error and
/// the year is never retried during the repository's lifetime. Queries
/// never fetch.
pub struct HolidayRepository<F> {
    fetcher: F,
    country_code: String,
    // sorted, no duplicates
    years: Vec<i32>,
    cache: BTreeMap<i32, Vec<HolidayRecord>>,
    stats: RepositoryStats,
}

impl<F: HolidayFetcher> HolidayRepository<F> {
    pub fn new(fetcher: F, config: &TrackerConfig) -> Self {
        let mut years = config.years.clone();
        years.sort_unstable();
        years.dedup();

        Self {
            fetcher,
            country_code: config.country_code.clone(),
            years,
            cache: BTreeMap::new(),
            stats: RepositoryStats::default(),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn stats(&self) -> RepositoryStats {
        self.stats.clone()
    }

    pub fn is_loaded(&self, year: i32) -> bool {
        self.cache.contains_key(&year)
    }

    /// Fetches `year` unless it is already cached. A year outside the
    /// configured set joins the supported set once loaded. A request the
    /// fetcher would reject leaves the repository untouched.
    pub async fn ensure_loaded(&mut self, year: i32) -> YearOutcome {
        if self.cache.contains_key(&year) {
            return YearOutcome::Cached;
        }

        if let Err(e) = validate_request(year, &self.country_code) {
            warn!(year, country = %self.country_code, error = %e, "rejected holiday load");
            return YearOutcome::Failed(e);
        }

        if let Err(pos) = self.years.binary_search(&year) {
            self.years.insert(pos, year);
        }

        self.stats.fetches_issued += 1;
        match self.fetcher.fetch(year, &self.country_code).await {
            Ok(records) => {
                info!(
                    year,
                    country = %self.country_code,
                    records = records.len(),
                    "loaded public holidays"
                );
                let count = records.len();
                self.stats.years_loaded += 1;
                self.stats.records_cached += count;
                self.cache.insert(year, records);
                YearOutcome::Loaded(count)
            }
            Err(e) => {
                warn!(
                    year,
                    country = %self.country_code,
                    error = %e,
                    "failed to load public holidays, year will report no data"
                );
                self.stats.years_failed += 1;
                self.cache.insert(year, Vec::new());
                YearOutcome::Failed(e)
            }
        }
    }

    /// Loads every supported year, one fetch after the other.
    pub async fn load_all(&mut self) -> LoadReport {
        let mut report = LoadReport::default();
        for year in self.years.clone() {
            let outcome = self.ensure_loaded(year).await;
            report.outcomes.push((year, outcome));
        }
        report
    }

    /// `None` when the year is unsupported, not loaded, or has no records.
    pub fn query_by_year(&self, year: i32) -> Option<&[HolidayRecord]> {
        if self.years.binary_search(&year).is_err() {
            return None;
        }
        self.cache
            .get(&year)
            .filter(|records| !records.is_empty())
            .map(Vec::as_slice)
    }

    pub fn query_by_day_month(
        &self,
        day: u32,
        month: u32,
    ) -> Result<Vec<HolidayMatch<'_>>, UsageError> {
        Ok(self.find_on(DayMonth::new(day, month)?))
    }

    pub fn find_on(&self, when: DayMonth) -> Vec<HolidayMatch<'_>> {
        self.matching(|record| record.falls_on(when.day, when.month))
    }

    /// Case-insensitive substring search over the local and English names.
    pub fn query_by_name(&self, text: &str) -> Result<Vec<HolidayMatch<'_>>, UsageError> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Err(invalid("search text must not be empty"));
        }
        Ok(self.matching(|record| record.name_contains(&needle)))
    }

    pub fn all_records(&self) -> AllHolidays<'_> {
        let sections = self
            .years
            .iter()
            .map(|&year| YearSection {
                year,
                records: self.cache.get(&year).map(Vec::as_slice).unwrap_or(&[]),
            })
            .collect();

        AllHolidays { sections }
    }

    // Year-ascending (BTreeMap order), then source order
    fn matching<P>(&self, predicate: P) -> Vec<HolidayMatch<'_>>
    where
        P: Fn(&HolidayRecord) -> bool,
    {
        let predicate = &predicate;
        self.cache
            .iter()
            .flat_map(|(&year, records)| {
                records
                    .iter()
                    .filter(move |&record| predicate(record))
                    .map(move |record| HolidayMatch { year, record })
            })
            .collect()
    }
}
