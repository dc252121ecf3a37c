// Holiday records and decoding of the upstream JSON payload

use chrono::{Datelike, NaiveDate};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::warn;

/// A single public holiday occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayRecord {
    pub date: NaiveDate,
    /// Name in the country's own language, possibly empty.
    pub local_name: String,
    /// Name in English.
    pub name: String,
    pub country_code: String,
    pub is_fixed: bool,
    pub is_global: bool,
}

impl HolidayRecord {
    pub fn new(
        date: NaiveDate,
        local_name: &str,
        name: &str,
        country_code: &str,
        is_fixed: bool,
        is_global: bool,
    ) -> Self {
        Self {
            date,
            local_name: local_name.to_string(),
            name: name.to_string(),
            country_code: country_code.to_string(),
            is_fixed,
            is_global,
        }
    }

    pub fn falls_on(&self, day: u32, month: u32) -> bool {
        self.date.day() == day && self.date.month() == month
    }

    /// `needle` must already be lowercase.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.local_name.to_lowercase().contains(needle) || self.name.to_lowercase().contains(needle)
    }
}

// Wire shape. Keys are lowercased before this is deserialized, so field
// matching is case-insensitive; every field falls back to its default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHoliday {
    #[serde(deserialize_with = "lenient")]
    date: String,
    #[serde(rename = "localname", deserialize_with = "lenient")]
    local_name: String,
    #[serde(deserialize_with = "lenient")]
    name: String,
    #[serde(rename = "countrycode", deserialize_with = "lenient")]
    country_code: String,
    #[serde(rename = "fixed", deserialize_with = "lenient")]
    is_fixed: bool,
    #[serde(rename = "global", deserialize_with = "lenient")]
    is_global: bool,
}

// A mistyped or null field becomes the default instead of failing the record
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DecodedHolidays {
    /// Records in payload order.
    pub records: Vec<HolidayRecord>,
    /// Elements skipped because they were not objects or had no valid date.
    pub dropped: usize,
}

/// Decodes a JSON array of holiday objects.
///
/// Fails only when the body is not a JSON array. Individual elements that
/// cannot produce a record with a valid calendar date are dropped and
/// counted, never defaulted to a sentinel date.
pub fn decode_holidays(body: &[u8]) -> Result<DecodedHolidays, serde_json::Error> {
    let items: Vec<Value> = serde_json::from_slice(body)?;
    let mut decoded = DecodedHolidays::default();

    for item in items {
        let object = match item {
            Value::Object(object) => object,
            other => {
                warn!(element = %other, "skipping non-object holiday element");
                decoded.dropped += 1;
                continue;
            }
        };

        let lowered: Map<String, Value> = object
            .into_iter()
            .map(|(key, value)| (key.to_lowercase(), value))
            .collect();

        let raw = match serde_json::from_value::<RawHoliday>(Value::Object(lowered)) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "skipping undecodable holiday element");
                decoded.dropped += 1;
                continue;
            }
        };

        let Some(date) = parse_date(&raw.date) else {
            warn!(date = %raw.date, name = %raw.name, "dropping holiday with unparseable date");
            decoded.dropped += 1;
            continue;
        };

        decoded.records.push(HolidayRecord {
            date,
            local_name: raw.local_name,
            name: raw.name,
            country_code: raw.country_code,
            is_fixed: raw.is_fixed,
            is_global: raw.is_global,
        });
    }

    Ok(decoded)
}

// Accepts "YYYY-MM-DD" and the date part of "YYYY-MM-DDTHH:MM:SS..."
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().or_else(|| {
        let (date, time) = raw.split_once('T')?;
        if time.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    })
}
