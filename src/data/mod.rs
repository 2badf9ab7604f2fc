//! Core data models for the profile fetcher
//!
//! This module contains the normalized profile shape that is cached and
//! rendered, together with the rules that turn a loosely structured provider
//! payload into it.

pub mod proxycurl;

pub use proxycurl::{ProviderError, ProxycurlClient, RawDate, RawExperience, RawProfile};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder used for every field the provider did not return
pub const PLACEHOLDER: &str = "N/A";

/// Rendered in place of an end date when a position is still held
pub const ONGOING: &str = "Atualmente";

/// One employment record
///
/// Serialized field names are the cache file and JSON output contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    /// Employer name
    #[serde(rename = "empresa")]
    pub company: String,
    /// Job title
    #[serde(rename = "cargo")]
    pub title: String,
    /// Where the position was held
    #[serde(rename = "local")]
    pub location: String,
    /// Display period, e.g. "1/2020 - Atualmente"
    #[serde(rename = "periodo")]
    pub period: String,
}

/// Normalized subject record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Full name
    #[serde(rename = "nome")]
    pub name: String,
    /// Current occupation
    #[serde(rename = "cargo_atual")]
    pub occupation: String,
    /// Profile headline
    pub headline: String,
    /// Free-text summary
    #[serde(rename = "resumo")]
    pub summary: String,
    /// "{city}, {state}, {country}" with each part defaulting to the placeholder
    #[serde(rename = "localizacao")]
    pub location: String,
    /// Employment history in provider order
    #[serde(rename = "experiencias")]
    pub experiences: Vec<ExperienceEntry>,
}

impl Profile {
    /// Builds a normalized profile from a raw provider payload.
    ///
    /// Never fails: absent, `null` and blank fields become [`PLACEHOLDER`].
    pub fn from_raw(raw: RawProfile) -> Self {
        let location = format!(
            "{}, {}, {}",
            text_or_placeholder(raw.city),
            text_or_placeholder(raw.state),
            text_or_placeholder(raw.country_full_name)
        );

        let experiences = raw
            .experiences
            .unwrap_or_default()
            .into_iter()
            .map(ExperienceEntry::from_raw)
            .collect();

        Self {
            name: text_or_placeholder(raw.full_name),
            occupation: text_or_placeholder(raw.occupation),
            headline: text_or_placeholder(raw.headline),
            summary: text_or_placeholder(raw.summary),
            location,
            experiences,
        }
    }
}

impl ExperienceEntry {
    /// Builds an experience entry from a raw provider record
    pub fn from_raw(raw: RawExperience) -> Self {
        let start = raw.starts_at.unwrap_or_default();
        let end = raw.ends_at.unwrap_or_default();

        Self {
            company: text_or_placeholder(raw.company),
            title: text_or_placeholder(raw.title),
            location: text_or_placeholder(raw.location),
            period: format_period(&start, &end),
        }
    }
}

/// Formats an employment period as `"{start} - {end}"`.
///
/// Start month and year fall back to the placeholder independently. The end
/// side is only rendered as `"{month}/{year}"` when both parts are present;
/// anything less means the position is ongoing.
///
/// # Examples
/// ```
/// use profile_fetch::data::{format_period, RawDate};
/// use serde_json::json;
///
/// let start = RawDate { month: Some(json!(1)), year: Some(json!(2020)) };
/// assert_eq!(format_period(&start, &RawDate::default()), "1/2020 - Atualmente");
/// ```
pub fn format_period(start: &RawDate, end: &RawDate) -> String {
    let start_month = date_part(&start.month).unwrap_or_else(|| PLACEHOLDER.to_string());
    let start_year = date_part(&start.year).unwrap_or_else(|| PLACEHOLDER.to_string());

    let end_str = match (end_part(&end.month), end_part(&end.year)) {
        (Some(month), Some(year)) => format!("{}/{}", month, year),
        _ => ONGOING.to_string(),
    };

    format!("{}/{} - {}", start_month, start_year, end_str)
}

/// Returns the text of a provider field, or the placeholder when it is
/// missing, `null` or blank
///
/// Non-string values are rendered as JSON rather than rejected.
fn text_or_placeholder(value: Option<Value>) -> String {
    let text = match value {
        Some(Value::String(text)) => text,
        Some(Value::Null) | None => return PLACEHOLDER.to_string(),
        Some(other) => other.to_string(),
    };

    if text.trim().is_empty() {
        PLACEHOLDER.to_string()
    } else {
        text
    }
}

/// Renders a month or year value as given by the provider.
///
/// Numbers and strings pass through untouched; `null` counts as missing.
fn date_part(value: &Option<Value>) -> Option<String> {
    match value.as_ref()? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Like [`date_part`], but zero and empty values also count as missing
fn end_part(value: &Option<Value>) -> Option<String> {
    match value.as_ref()? {
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Bool(false) => None,
        _ => date_part(value),
    }
}
