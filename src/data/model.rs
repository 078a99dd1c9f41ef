use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Module – one entry reported by the page agent
// ---------------------------------------------------------------------------

/// A named unit on the course page that can be hidden or shown.
///
/// Identity is `id`; `name` is free text and may carry a `YYYY - Y#.S# - `
/// term prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub name: String,
}

impl Module {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// HiddenSet – ids currently marked hidden
// ---------------------------------------------------------------------------

/// Set of hidden module ids.
///
/// Persisted as a JSON array; duplicates in stored data collapse on load.
/// Every mutation returns a new set so callers can hold on to the previous
/// one until the new one is acknowledged by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HiddenSet(BTreeSet<String>);

impl HiddenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Remove `id` if present, add it otherwise.
    pub fn toggled(&self, id: &str) -> Self {
        let mut next = self.0.clone();
        if !next.remove(id) {
            next.insert(id.to_string());
        }
        Self(next)
    }

    /// Set union with `ids`.
    pub fn with_all<I, S>(&self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = self.0.clone();
        next.extend(ids.into_iter().map(Into::into));
        Self(next)
    }

    /// Set difference with `ids`.
    pub fn without_all<I, S>(&self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut next = self.0.clone();
        for id in ids {
            next.remove(id.as_ref());
        }
        Self(next)
    }
}

impl<S: Into<String>> FromIterator<S> for HiddenSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// ViewConfig – filter / sort / search selected in the control surface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Visible,
    Hidden,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [Self::All, Self::Visible, Self::Hidden];

    /// Whether a module with the given hidden flag passes this filter.
    pub fn admits(self, hidden: bool) -> bool {
        match self {
            Self::All => true,
            Self::Visible => !hidden,
            Self::Hidden => hidden,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Visible => write!(f, "Visible"),
            Self::Hidden => write!(f, "Hidden"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    None,
    Ascending,
    Descending,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [Self::None, Self::Ascending, Self::Descending];
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "Page order"),
            Self::Ascending => write!(f, "A → Z"),
            Self::Descending => write!(f, "Z → A"),
        }
    }
}

/// Active filter/sort/search parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewConfig {
    pub filter: StatusFilter,
    pub sort: SortOrder,
    pub search: String,
}

// ---------------------------------------------------------------------------
// Processed output
// ---------------------------------------------------------------------------

/// A module annotated with its hidden flag, named by its display name
/// (the term prefix stripped when it was grouped).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedModule {
    pub id: String,
    pub name: String,
    /// Name as reported by the page, prefix included.
    pub full_name: String,
    pub hidden: bool,
}

/// A bucket of modules sharing a term label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub label: String,
    pub members: Vec<ProcessedModule>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let set = HiddenSet::new();
        let once = set.toggled("a");
        assert!(once.contains("a"));
        assert_eq!(once.toggled("a"), set);
    }

    #[test]
    fn test_union_and_difference() {
        let set: HiddenSet = ["a", "b"].into_iter().collect();
        let grown = set.with_all(["b", "c", "c"]);
        assert_eq!(grown.len(), 3);

        let shrunk = grown.without_all(["a", "z"]);
        assert_eq!(shrunk.iter().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_hidden_set_json_collapses_duplicates() {
        let set: HiddenSet = serde_json::from_str(r#"["7", "3", "7"]"#).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(serde_json::to_string(&set).unwrap(), r#"["3","7"]"#);
    }

    #[test]
    fn test_status_filter_admits() {
        assert!(StatusFilter::All.admits(true));
        assert!(StatusFilter::All.admits(false));
        assert!(StatusFilter::Visible.admits(false));
        assert!(!StatusFilter::Visible.admits(true));
        assert!(StatusFilter::Hidden.admits(true));
        assert!(!StatusFilter::Hidden.admits(false));
    }

    #[test]
    fn test_default_view_config() {
        let config = ViewConfig::default();
        assert_eq!(config.filter, StatusFilter::All);
        assert_eq!(config.sort, SortOrder::None);
        assert!(config.search.is_empty());
    }
}
