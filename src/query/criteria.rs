//! Filter Criteria
//!
//! The user-facing search request: optional text filters plus the selected
//! labels for each categorical attribute. Text filters combine with AND;
//! labels within one attribute combine with OR.
//!
//! Criteria deserialize from JSON using either the field names below or the
//! names the course search form uses (`course_number`, `standard_years`,
//! `class_formats`).
//!
//! ```rust
//! use course_filter::query::FilterCriteria;
//!
//! let criteria = FilterCriteria::new()
//!     .id_prefix("cs1")
//!     .years(["1", "2"])
//!     .periods(["Mon1"]);
//!
//! assert_eq!(criteria.id_prefix.as_deref(), Some("cs1"));
//! assert!(!criteria.is_empty());
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::Attribute;

/// A multi-criteria search request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Case-insensitive identifier prefix
    #[serde(alias = "course_number")]
    pub id_prefix: Option<String>,

    /// Case-insensitive title substring
    #[serde(alias = "title")]
    pub title_substring: Option<String>,

    /// Selected year labels
    #[serde(alias = "standard_years", deserialize_with = "null_as_empty")]
    pub years: Vec<String>,

    /// Selected term labels
    #[serde(deserialize_with = "null_as_empty")]
    pub terms: Vec<String>,

    /// Selected period labels
    #[serde(deserialize_with = "null_as_empty")]
    pub periods: Vec<String>,

    /// Selected format labels
    #[serde(alias = "class_formats", deserialize_with = "null_as_empty")]
    pub formats: Vec<String>,
}

impl FilterCriteria {
    /// Criteria that match every record
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifier prefix
    #[must_use]
    pub fn id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = Some(prefix.into());
        self
    }

    /// Set the title substring
    #[must_use]
    pub fn title(mut self, substring: impl Into<String>) -> Self {
        self.title_substring = Some(substring.into());
        self
    }

    /// Select year labels
    #[must_use]
    pub fn years<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.years = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Select term labels
    #[must_use]
    pub fn terms<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terms = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Select period labels
    #[must_use]
    pub fn periods<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.periods = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Select format labels
    #[must_use]
    pub fn formats<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formats = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Selected labels for an attribute
    pub fn selected(&self, attribute: Attribute) -> &[String] {
        match attribute {
            Attribute::Year => &self.years,
            Attribute::Term => &self.terms,
            Attribute::Period => &self.periods,
            Attribute::Format => &self.formats,
        }
    }

    /// True if no text filter is set and no label is selected
    ///
    /// Empty text filters count as unset.
    pub fn is_empty(&self) -> bool {
        self.id_prefix.as_deref().map_or(true, str::is_empty)
            && self.title_substring.as_deref().map_or(true, str::is_empty)
            && Attribute::ALL.iter().all(|a| self.selected(*a).is_empty())
    }
}

/// A null selection list means nothing selected
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
