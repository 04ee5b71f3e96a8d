use std::fmt;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::desktop_entry::{self, DesktopEntry};

/// Which of the two descriptor shapes a file is loaded as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Source {
    Application,
    Module,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Application => write!(f, "application"),
            Source::Module => write!(f, "module"),
        }
    }
}

/// Fields that only make sense for one kind of entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntryKind {
    Application {
        /// Program that must exist for the application to be offered.
        try_exec: Option<String>,
        /// `Exec` line; `None` means the application cannot be launched.
        execute_command: Option<String>,
    },
    Module {
        /// Toolkit the module's widgets are written for; `None` is toolkit-agnostic.
        toolkit: Option<String>,
        /// File names of the application entries this module supersedes.
        replaces: Vec<String>,
        /// Module code to load, relative to the descriptor's directory.
        entry_point: Option<String>,
    },
}

/// One discoverable item, either a `.desktop` application or a control
/// center module.
///
/// Entries start out active. Only [`deactivate`](Entry::deactivate) changes
/// that, so once an entry has been turned off nothing in the discovery
/// pipeline turns it back on.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Entry {
    pub kind: EntryKind,
    /// Base name of the descriptor, e.g. `lxappearance.desktop`.
    pub filename: String,
    pub path: PathBuf,
    pub name: String,
    pub icon: Option<String>,
    /// Raw `Categories` keywords in declaration order.
    pub category_tags: Vec<String>,
    /// Canonical category, `None` until categorized or when no tag matched.
    pub category: Option<String>,
    pub only_show_in: Vec<String>,
    pub not_show_in: Vec<String>,
    active: bool,
}

impl Entry {
    /// Parses the descriptor at `path` as an entry of the given `source`.
    ///
    /// Applications must have a `Categories` key.
    pub fn load(path: impl AsRef<Path>, source: Source) -> Result<Entry, desktop_entry::Error> {
        let path = path.as_ref();
        let desktop_entry = DesktopEntry::from_file(path)?;
        Entry::from_desktop_entry(desktop_entry, path, source)
    }

    /// Loads the application at `path` if one of its categories is in
    /// `keywords`, and `Ok(None)` otherwise. Irrelevant descriptors are not
    /// validated beyond their `Categories`.
    pub fn load_relevant_application(
        path: impl AsRef<Path>,
        keywords: &[String],
    ) -> Result<Option<Entry>, desktop_entry::Error> {
        let path = path.as_ref();
        let filter = |categories: &[String]| matches_any(categories, keywords);
        match DesktopEntry::from_file_filtered(path, filter)? {
            Some(desktop_entry) => {
                Entry::from_desktop_entry(desktop_entry, path, Source::Application).map(Some)
            }
            None => Ok(None),
        }
    }

    pub fn from_desktop_entry(
        desktop_entry: DesktopEntry,
        path: impl Into<PathBuf>,
        source: Source,
    ) -> Result<Entry, desktop_entry::Error> {
        let DesktopEntry {
            filename,
            name,
            icon,
            only_show_in,
            not_show_in,
            try_exec,
            exec,
            categories,
            toolkit,
            replaces,
        } = desktop_entry;

        let kind = match source {
            Source::Application => {
                if categories.is_none() {
                    return Err(desktop_entry::Error::MissingKey("Categories"));
                }
                EntryKind::Application {
                    try_exec,
                    execute_command: exec,
                }
            }
            Source::Module => EntryKind::Module {
                toolkit,
                replaces: replaces.unwrap_or_default(),
                entry_point: exec,
            },
        };

        Ok(Entry {
            kind,
            filename,
            path: path.into(),
            name,
            icon,
            category_tags: categories.unwrap_or_default(),
            category: None,
            only_show_in: only_show_in.unwrap_or_default(),
            not_show_in: not_show_in.unwrap_or_default(),
            active: true,
        })
    }

    pub fn source(&self) -> Source {
        match self.kind {
            EntryKind::Application { .. } => Source::Application,
            EntryKind::Module { .. } => Source::Module,
        }
    }

    pub fn is_application(&self) -> bool {
        self.source() == Source::Application
    }

    pub fn is_module(&self) -> bool {
        self.source() == Source::Module
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Whether any declared category is one of `keywords`.
    pub fn is_settings_relevant(&self, keywords: &[String]) -> bool {
        matches_any(&self.category_tags, keywords)
    }

    /// Application file names this entry supersedes; always empty for applications.
    pub fn replaces(&self) -> &[String] {
        match &self.kind {
            EntryKind::Module { replaces, .. } => replaces,
            EntryKind::Application { .. } => &[],
        }
    }
}

fn matches_any(tags: &[String], keywords: &[String]) -> bool {
    tags.iter().any(|tag| keywords.contains(tag))
}
