//! # Domain Model: Wishes
//!
//! A [`Wish`] is one entry on the list: free text, a category label and two
//! independent flags (`completed`, `priority`). Identity fields (`id`,
//! `created_at`, `text`, `category`) never change after creation; only the
//! flags do, either through a toggle or through a [`WishPatch`].
//!
//! ## Invariants
//!
//! - `text` is trimmed and never empty.
//! - `category` is trimmed and never empty; blank input collapses to
//!   [`DEFAULT_CATEGORY`].
//! - `id` is unique within one list snapshot.
//!
//! ## Persisted Shape
//!
//! Lists persist as a JSON array of
//! `{id, text, category, completed, priority, createdAt}`. The same shape is used
//! for the local cache and inside remote documents.
//!
//! Older data written by earlier clients is accepted on read:
//! - numeric ids (millisecond timestamps) become their decimal string,
//! - `createdAt` may be epoch milliseconds or a plain date (`MM/DD/YYYY`,
//!   `YYYY-MM-DD`),
//! - a missing `category` or flag takes its default,
//! - a missing or unrecognized `createdAt` (say a locale-formatted date) becomes
//!   the time of reading, with a warning.
//!
//! An entry with blank text makes the whole payload malformed.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::warn;
use uuid::Uuid;

use crate::error::{Result, WishError};

pub const DEFAULT_CATEGORY: &str = "General";

const LEGACY_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WishId(String);

impl WishId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WishId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WishId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for WishId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Float(f64),
}

impl<'de> Deserialize<'de> for WishId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let id = match RawId::deserialize(deserializer)? {
            RawId::Text(s) => s,
            RawId::Int(n) => n.to_string(),
            RawId::Float(f) if f.fract() == 0.0 => format!("{}", f as i64),
            RawId::Float(f) => f.to_string(),
        };
        if id.trim().is_empty() {
            return Err(serde::de::Error::custom("wish id is empty"));
        }
        Ok(WishId(id))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wish {
    pub id: WishId,
    pub text: String,
    pub category: String,
    pub completed: bool,
    pub priority: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WishHelper {
    id: WishId,
    text: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    priority: bool,
    #[serde(default)]
    created_at: Option<RawTimestamp>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Text(String),
}

impl RawTimestamp {
    fn parse(&self) -> Option<DateTime<Utc>> {
        match self {
            RawTimestamp::Millis(ms) => DateTime::from_timestamp_millis(*ms),
            RawTimestamp::Text(s) => {
                let s = s.trim();
                DateTime::parse_from_rfc3339(s)
                    .map(|dt| dt.with_timezone(&Utc))
                    .ok()
                    .or_else(|| {
                        LEGACY_DATE_FORMATS
                            .iter()
                            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                            .and_then(|date| date.and_hms_opt(0, 0, 0))
                            .map(|naive| naive.and_utc())
                    })
            }
        }
    }
}

impl<'de> Deserialize<'de> for Wish {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let helper = WishHelper::deserialize(deserializer)?;

        let text = normalize_text(&helper.text)
            .ok_or_else(|| serde::de::Error::custom("wish text is empty"))?;
        let created_at = match &helper.created_at {
            Some(raw) => raw.parse().unwrap_or_else(|| {
                warn!(id = %helper.id, value = ?raw, "unrecognized createdAt; using now");
                Utc::now()
            }),
            None => Utc::now(),
        };

        Ok(Wish {
            id: helper.id,
            text,
            category: normalize_category(helper.category.as_deref()),
            completed: helper.completed,
            priority: helper.priority,
            created_at,
        })
    }
}

impl Wish {
    /// Builds a new wish with a fresh id and the current time.
    ///
    /// Fails with [`WishError::EmptyText`] when `text` is blank after trimming.
    pub fn new(text: &str, category: Option<&str>) -> Result<Self> {
        let text = normalize_text(text).ok_or(WishError::EmptyText)?;
        Ok(Self {
            id: WishId::generate(),
            text,
            category: normalize_category(category),
            completed: false,
            priority: false,
            created_at: Utc::now(),
        })
    }

    pub fn apply(&mut self, patch: WishPatch) {
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
    }
}

/// Trimmed text, or `None` if nothing is left.
pub fn normalize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_category(category: Option<&str>) -> String {
    match category.map(str::trim) {
        Some(c) if !c.is_empty() => c.to_string(),
        _ => DEFAULT_CATEGORY.to_string(),
    }
}

/// A partial update of the two mutable flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WishPatch {
    pub completed: Option<bool>,
    pub priority: Option<bool>,
}

impl WishPatch {
    pub fn completed(value: bool) -> Self {
        Self {
            completed: Some(value),
            priority: None,
        }
    }

    pub fn priority(value: bool) -> Self {
        Self {
            completed: None,
            priority: Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_none() && self.priority.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WishFilter {
    #[default]
    All,
    Pending,
    Completed,
    Priority,
}

impl WishFilter {
    pub fn matches(self, wish: &Wish) -> bool {
        match self {
            WishFilter::All => true,
            WishFilter::Pending => !wish.completed,
            WishFilter::Completed => wish.completed,
            WishFilter::Priority => wish.priority,
        }
    }

    /// Lazily projects `wishes` through the filter, preserving order.
    pub fn apply(self, wishes: &[Wish]) -> impl Iterator<Item = &Wish> {
        wishes.iter().filter(move |w| self.matches(w))
    }
}

/// Number of wishes visible under each filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    pub all: usize,
    pub pending: usize,
    pub completed: usize,
    pub priority: usize,
}

impl FilterCounts {
    pub fn of(wishes: &[Wish]) -> Self {
        wishes.iter().fold(Self::default(), |mut acc, w| {
            acc.all += 1;
            if w.completed {
                acc.completed += 1;
            } else {
                acc.pending += 1;
            }
            if w.priority {
                acc.priority += 1;
            }
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone};

    #[test]
    fn new_wish_trims_text_and_category() {
        let wish = Wish::new("  Buy milk  ", Some(" Errands ")).unwrap();
        assert_eq!(wish.text, "Buy milk");
        assert_eq!(wish.category, "Errands");
        assert!(!wish.completed);
        assert!(!wish.priority);
    }

    #[test]
    fn new_wish_defaults_category() {
        assert_eq!(Wish::new("Learn piano", None).unwrap().category, "General");
        assert_eq!(
            Wish::new("Learn piano", Some("   ")).unwrap().category,
            "General"
        );
    }

    #[test]
    fn new_wish_rejects_blank_text() {
        assert!(matches!(Wish::new("", None), Err(WishError::EmptyText)));
        assert!(matches!(
            Wish::new("  \n\t ", Some("Travel")),
            Err(WishError::EmptyText)
        ));
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = Wish::new("a", None).unwrap();
        let b = Wish::new("b", None).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn list_round_trips_through_json() {
        let mut first = Wish::new("See the aurora", Some("Travel")).unwrap();
        first.priority = true;
        let mut second = Wish::new("Run a marathon", None).unwrap();
        second.completed = true;
        let list = vec![first, second];

        let json = serde_json::to_string(&list).unwrap();
        let back: Vec<Wish> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn serializes_camel_case_fields() {
        let wish = Wish::new("Visit Kyoto", None).unwrap();
        let value = serde_json::to_value(&wish).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("created_at").is_none());
        assert!(value["id"].is_string());
    }

    #[test]
    fn reads_legacy_numeric_ids_and_locale_dates() {
        let json = r#"[{"id": 1718000000000, "text": " Skydive ", "completed": true, "createdAt": "6/10/2024"}]"#;
        let wishes: Vec<Wish> = serde_json::from_str(json).unwrap();
        let wish = &wishes[0];
        assert_eq!(wish.id.as_str(), "1718000000000");
        assert_eq!(wish.text, "Skydive");
        assert_eq!(wish.category, "General");
        assert!(wish.completed);
        assert!(!wish.priority);
        assert_eq!(
            (
                wish.created_at.year(),
                wish.created_at.month(),
                wish.created_at.day()
            ),
            (2024, 6, 10)
        );
    }

    #[test]
    fn reads_epoch_millis_timestamps() {
        let json = r#"{"id": "x", "text": "t", "category": "c", "createdAt": 0}"#;
        let wish: Wish = serde_json::from_str(json).unwrap();
        assert_eq!(wish.created_at, Utc.timestamp_opt(0, 0).unwrap());
    }

    #[test]
    fn rejects_blank_text_on_read() {
        let json = r#"{"id": "x", "text": "   ", "createdAt": "2024-01-01"}"#;
        assert!(serde_json::from_str::<Wish>(json).is_err());
    }

    #[test]
    fn unknown_date_format_keeps_the_wish() {
        let before = Utc::now();
        let json = r#"[
            {"id": "a", "text": "Old wish", "createdAt": "19.10.2024"},
            {"id": "b", "text": "Undated"},
            {"id": "c", "text": "Dated", "createdAt": "2024-10-19"}
        ]"#;
        let wishes: Vec<Wish> = serde_json::from_str(json).unwrap();

        assert_eq!(wishes.len(), 3);
        assert_eq!(wishes[0].text, "Old wish");
        assert!(wishes[0].created_at >= before);
        assert!(wishes[1].created_at >= before);
        assert_eq!(
            wishes[2].created_at,
            Utc.with_ymd_and_hms(2024, 10, 19, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn patch_only_touches_given_flags() {
        let mut wish = Wish::new("Learn to sail", None).unwrap();
        wish.apply(WishPatch::priority(true));
        assert!(wish.priority);
        assert!(!wish.completed);

        wish.apply(WishPatch::default());
        assert!(wish.priority);
    }

    #[test]
    fn filters_partition_the_list() {
        let mut done = Wish::new("done", None).unwrap();
        done.completed = true;
        let mut starred = Wish::new("starred", None).unwrap();
        starred.priority = true;
        let plain = Wish::new("plain", None).unwrap();
        let list = vec![done, starred, plain];

        let pending: Vec<_> = WishFilter::Pending.apply(&list).collect();
        let completed: Vec<_> = WishFilter::Completed.apply(&list).collect();
        let priority: Vec<_> = WishFilter::Priority.apply(&list).collect();

        assert_eq!(pending.len() + completed.len(), list.len());
        assert!(pending.iter().all(|w| !w.completed));
        assert!(completed.iter().all(|w| w.completed));
        assert_eq!(priority.len(), 1);
        assert_eq!(priority[0].text, "starred");
        assert_eq!(WishFilter::All.apply(&list).count(), 3);
    }

    #[test]
    fn counts_match_filters() {
        let mut a = Wish::new("a", None).unwrap();
        a.completed = true;
        a.priority = true;
        let b = Wish::new("b", None).unwrap();
        let counts = FilterCounts::of(&[a, b]);
        assert_eq!(
            counts,
            FilterCounts {
                all: 2,
                pending: 1,
                completed: 1,
                priority: 1
            }
        );
    }
}
