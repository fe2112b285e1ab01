/// Data layer: table model, loading, selection, partitioning, validation and
/// merging.
///
/// Architecture:
/// ```text
///   turnstile .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse text → Dataset (trimmed names, DATE+TIME → TIME)
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌───────────┐
///   │  filter  │──▶│ partition │  one Dataset per (C/A, UNIT, SCP)
///   └──────────┘   └───────────┘
///                       │
///              ┌────────┴────────┐
///              ▼                 ▼
///        ┌──────────┐      ┌──────────┐
///        │ validate │      │  merge   │  sum counters over shared TIME
///        └──────────┘      └──────────┘
/// ```

pub mod filter;
pub mod loader;
pub mod merge;
pub mod model;
pub mod partition;
pub mod validate;
