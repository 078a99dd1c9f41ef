/// Data layer: core types, catalog loading, and list processing.
///
/// Architecture:
/// ```text
///  page agent / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse catalog → Vec<Module>
///   └──────────┘
///        │            HiddenSet + ViewConfig
///        ▼                  │
///   ┌──────────┐            │
///   │  filter   │ ◀─────────┘  annotate, filter, search, sort, group
///   └──────────┘
///        │
///        ▼
///    Vec<Group>   ordered term groups for the control surface
/// ```

pub mod filter;
pub mod loader;
pub mod model;
