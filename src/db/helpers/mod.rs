use std::convert::TryFrom;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::models::FilterOrigin;

pub fn to_i64(value: u32) -> i64 {
    i64::from(value)
}

pub fn to_u32(value: i64, field: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| anyhow!("{field} contains out-of-range value {value}"))
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

pub fn to_json<T: Serialize>(value: &T, field: &str) -> Result<String> {
    serde_json::to_string(value).with_context(|| format!("failed to serialize {field}"))
}

pub fn from_json<T: DeserializeOwned>(raw: &str, field: &str) -> Result<T> {
    serde_json::from_str(raw).with_context(|| format!("failed to parse {field}"))
}

pub fn parse_origin(value: &str) -> Result<FilterOrigin> {
    match value {
        "mode" => Ok(FilterOrigin::ModeOnly),
        "region" => Ok(FilterOrigin::RegionAnalyzed),
        "learned" => Ok(FilterOrigin::Learned),
        other => Err(anyhow!("unknown filter origin {other}")),
    }
}
