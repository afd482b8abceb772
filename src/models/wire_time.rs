//! Lenient timestamp encoding.
//!
//! The chat backend writes naive ISO-8601 (`2024-05-01T10:00:00.123456`), the
//! dataset catalog may write RFC 3339 or unix seconds. All of them decode to a
//! UTC `NaiveDateTime`; encoding always uses the naive ISO form.

use chrono::{DateTime, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serializer};

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&value.format(ISO_FORMAT))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Seconds(i64),
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Text(text) => {
            parse(&text).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {text}")))
        }
        RawTimestamp::Seconds(secs) => DateTime::from_timestamp(secs, 0)
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {secs}"))),
    }
}

pub(crate) fn parse(text: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(text, ISO_FORMAT).ok())
        .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f").ok())
}
