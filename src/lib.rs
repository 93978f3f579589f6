//! desksweep - organize cluttered directories into category subfolders.
//!
//! Files directly inside a target directory are moved into
//! subdirectories named after their extension's category (Images,
//! Documents, and so on), with unmatched files collected under `Misc`
//! and destination name collisions resolved by numeric suffixes.
//! Subdirectories are never touched. The category table and filter
//! rules can be overridden through a TOML configuration file.

pub mod category;
pub mod cli;
pub mod config;
pub mod organizer;
pub mod output;

pub use category::{Category, CategoryMap, MISC_DIR, extension_of};
pub use cli::{Cli, Target};
pub use config::{CompiledFilters, ConfigError, FilterRules, OrganizerConfig};
pub use organizer::{
    Operation, OrganizeError, OrganizeResult, PlannedMove, SortEvent, SortReport,
    ensure_category_folders, move_entry, plan_entries, resolve_conflict, sort_entries,
};
