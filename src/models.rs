use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

pub const MOOD_MIN: u8 = 1;
pub const MOOD_MAX: u8 = 10;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// One recorded check-in. Records reaching the analyzer are assumed to have
/// passed boundary validation: every score lies in `MOOD_MIN..=MOOD_MAX`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckIn {
    #[serde(
        alias = "date",
        serialize_with = "serialize_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub timestamp: NaiveDateTime,
    pub mood: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub activities: BTreeSet<String>,
}

impl CheckIn {
    pub fn new(timestamp: NaiveDateTime, mood: u8) -> Self {
        Self {
            timestamp,
            mood,
            energy: None,
            stress: None,
            sleep: None,
            note: None,
            activities: BTreeSet::new(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserRecord {
    #[serde(default)]
    pub mood_history: Vec<CheckIn>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub users: BTreeMap<String, UserRecord>,
}

impl AppData {
    pub fn history(&self, user: &str) -> Vec<CheckIn> {
        self.users
            .get(user)
            .map(|record| record.mood_history.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    pub mood: i64,
    #[serde(default)]
    pub energy: Option<i64>,
    #[serde(default)]
    pub stress: Option<i64>,
    #[serde(default)]
    pub sleep: Option<i64>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastQuery {
    pub days: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InsightsResponse {
    pub insights: Vec<String>,
}

/// Accepts a bare date or a date with time of day. Bare dates land at midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn serialize_timestamp<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.format(TIMESTAMP_FORMAT).to_string())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp '{raw}'")))
}
