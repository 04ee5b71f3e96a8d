#![cfg(any(unix, target_os = "redox"))]
#![warn(rust_2018_idioms, redundant_semicolons, rust_2024_compatibility)]

//! Discovery and triage for a desktop control center.
//!
//! Settings applications are found through their `.desktop` files, control
//! center modules through descriptors of the same format. Both are loaded
//! into [`Entry`] values, filtered against the running session and sorted
//! into canonical categories. Preferences live in a sparse `settings.conf`
//! located with the XDG base directory rules.

pub mod categories;
pub mod control_center;
pub mod desktop_entry;
pub mod desktop_environment;
pub mod entry;
pub mod error;
pub mod locations;
pub mod scanner;
pub mod settings;
pub mod triage;

pub use crate::categories::{CategoryTable, Taxonomy};
pub use crate::control_center::ControlCenter;
pub use crate::desktop_entry::DesktopEntry;
pub use crate::entry::{Entry, EntryKind, Source};
pub use crate::error::{Error, Result};
pub use crate::locations::SettingsLocations;
pub use crate::settings::{Settings, SettingsError, UiSettings};
pub use crate::triage::Triage;
