use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::OnceLock;

use icu::collator::options::{CollatorOptions, Strength};
use icu::collator::{Collator, CollatorBorrowed};
use icu::locale::locale;

use super::model::{Group, HiddenSet, Module, ProcessedModule, SortOrder, ViewConfig};

/// Label of the bucket for modules whose name carries no term prefix.
pub const UNGROUPED_LABEL: &str = "Other";

// ---------------------------------------------------------------------------
// Name classification: "2023 - Y2.S1 - Software Engineering"
// ---------------------------------------------------------------------------

/// Outcome of parsing a module name for a term prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    /// `label` is the `YYYY - Y#.S#` prefix, `display_name` the remainder.
    Grouped {
        label: &'a str,
        display_name: &'a str,
    },
    Ungrouped { display_name: &'a str },
}

impl<'a> Classification<'a> {
    pub fn label(&self) -> &'a str {
        match self {
            Self::Grouped { label, .. } => label,
            Self::Ungrouped { .. } => UNGROUPED_LABEL,
        }
    }

    pub fn display_name(&self) -> &'a str {
        match self {
            Self::Grouped { display_name, .. } | Self::Ungrouped { display_name } => display_name,
        }
    }
}

const SEPARATOR: &[u8] = b" - ";
/// `YYYY - Y#.S#`
const LABEL_LEN: usize = 12;

/// Split a module name into term label and display name.
///
/// Accepted shape: four ASCII digits, `" - "`, `Y<digit>.S<digit>`, `" - "`,
/// then a non-empty single-line remainder. Anything else is ungrouped.
pub fn classify(name: &str) -> Classification<'_> {
    let ungrouped = Classification::Ungrouped { display_name: name };
    let bytes = name.as_bytes();
    let rest_at = LABEL_LEN + SEPARATOR.len();
    if bytes.len() <= rest_at {
        return ungrouped;
    }

    let year = &bytes[0..4];
    let term = &bytes[7..12];
    let shape_ok = year.iter().all(u8::is_ascii_digit)
        && &bytes[4..7] == SEPARATOR
        && term[0] == b'Y'
        && term[1].is_ascii_digit()
        && term[2] == b'.'
        && term[3] == b'S'
        && term[4].is_ascii_digit()
        && &bytes[LABEL_LEN..rest_at] == SEPARATOR;
    if !shape_ok {
        return ungrouped;
    }

    // The first 15 bytes are ASCII, so both slices fall on char boundaries.
    let remainder = &name[rest_at..];
    if remainder.contains(['\n', '\r', '\u{2028}', '\u{2029}']) {
        return ungrouped;
    }
    Classification::Grouped {
        label: &name[..LABEL_LEN],
        display_name: remainder,
    }
}

// ---------------------------------------------------------------------------
// Comparator
// ---------------------------------------------------------------------------

fn root_collator() -> Option<&'static CollatorBorrowed<'static>> {
    static COLLATOR: OnceLock<Option<CollatorBorrowed<'static>>> = OnceLock::new();
    COLLATOR
        .get_or_init(|| {
            let mut options = CollatorOptions::default();
            options.strength = Some(Strength::Tertiary);
            match Collator::try_new(locale!("und").into(), options) {
                Ok(collator) => Some(collator),
                Err(e) => {
                    log::warn!("Root collator unavailable, using case-folded order: {e}");
                    None
                }
            }
        })
        .as_ref()
}

/// Locale string ordering (root collation, tertiary strength): base letters
/// first, then accents, then case with lowercase first.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    match root_collator() {
        Some(collator) => collator.compare(a, b),
        None => {
            let folded_a = a.chars().flat_map(char::to_lowercase);
            let folded_b = b.chars().flat_map(char::to_lowercase);
            folded_a.cmp(folded_b).then_with(|| b.cmp(a))
        }
    }
}

// ---------------------------------------------------------------------------
// List processing
// ---------------------------------------------------------------------------

/// Derive the grouped, filtered and sorted view of `catalog`.
///
/// * Hidden-state filter, then case-insensitive substring search on the full
///   name.
/// * Stable sort by name when requested; catalog order otherwise.
/// * Groups ordered by descending label, members keep the order above.
///
/// Empty input, or everything filtered out, yields no groups.
pub fn process(catalog: &[Module], hidden: &HiddenSet, config: &ViewConfig) -> Vec<Group> {
    let needle = config.search.to_lowercase();

    let mut rows: Vec<ProcessedModule> = catalog
        .iter()
        .map(|m| ProcessedModule {
            id: m.id.clone(),
            name: m.name.clone(),
            full_name: m.name.clone(),
            hidden: hidden.contains(&m.id),
        })
        .filter(|m| config.filter.admits(m.hidden))
        .filter(|m| needle.is_empty() || m.name.to_lowercase().contains(&needle))
        .collect();

    match config.sort {
        SortOrder::None => {}
        SortOrder::Ascending => rows.sort_by(|a, b| locale_cmp(&a.name, &b.name)),
        SortOrder::Descending => rows.sort_by(|a, b| locale_cmp(&b.name, &a.name)),
    }

    let mut groups: Vec<Group> = Vec::new();
    let mut slot_of: HashMap<String, usize> = HashMap::new();
    for mut row in rows {
        let class = classify(&row.full_name);
        let label = class.label().to_string();
        row.name = class.display_name().to_string();

        let slot = *slot_of.entry(label.clone()).or_insert_with(|| {
            groups.push(Group {
                label,
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].members.push(row);
    }

    groups.sort_by(|a, b| locale_cmp(&b.label, &a.label));
    groups
}
