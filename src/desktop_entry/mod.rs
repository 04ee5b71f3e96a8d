//! # desktop_entry
//! Reader for the subset of the [XDG Desktop Entry Specification][xdg-desktop-entry]
//! that the control center consumes, plus the `X-LX-Control-Center-*` keys
//! carried by module descriptors.
//!
//! [xdg-desktop-entry]: https://specifications.freedesktop.org/desktop-entry-spec/latest/
//!

pub use self::error::Error;
use ini::{Ini, ParseOption, Properties};

use std::ffi::OsStr;
use std::path::Path;

mod error;


pub(crate) type Strings = Vec<String>;

pub(crate) const DEFAULT_GROUP: &str = "Desktop Entry";

/// Custom key naming the toolkit a module has to be hosted in.
pub const TOOLKIT_KEY: &str = "X-LX-Control-Center-Toolkit";
/// Custom key listing the application file names a module supersedes.
pub const REPLACE_KEY: &str = "X-LX-Control-Center-Replace";

type Result<T> = std::result::Result<T, Error>;

/// The `[Desktop Entry]` group of one descriptor file.
///
/// Only the keys the control center acts on are kept. `Name` is the
/// unlocalized value; translated `Name[xx]` keys are ignored.
///
/// # Examples
///
/// ```
/// use lx_control_center::desktop_entry::DesktopEntry;
/// use std::str::FromStr;
///
/// let desktop_entry = "
/// [Desktop Entry]
/// Type=Application
/// Name=Foo
/// Exec=Bar
/// Categories=Settings;DesktopSettings;
/// ";
///
/// let entry = DesktopEntry::from_str(desktop_entry).unwrap();
/// assert_eq!(entry.name, "Foo");
/// assert_eq!(entry.categories.unwrap(), vec!["Settings", "DesktopSettings"]);
/// ```
#[derive(Clone, Debug)]
pub struct DesktopEntry {
    pub filename: String,
    pub name: String, // Required
    pub icon: Option<String>,
    pub only_show_in: Option<Strings>,
    pub not_show_in: Option<Strings>,
    pub try_exec: Option<String>,
    pub exec: Option<String>,
    pub categories: Option<Strings>,
    pub toolkit: Option<String>,
    pub replaces: Option<Strings>,
}

impl DesktopEntry {
    /// Load the descriptor at `filename`.
    pub fn from_file(filename: impl AsRef<Path>) -> Result<Self> {
        let (ini, name) = read_file(filename.as_ref())?;
        Self::from_ini(&ini, name)
    }

    /// Load the descriptor at `filename` only if `filter` accepts its
    /// `Categories`, which are empty when the key is missing. Returns
    /// `Ok(None)` for rejected descriptors without checking their other keys.
    pub fn from_file_filtered<F>(filename: impl AsRef<Path>, filter: F) -> Result<Option<Self>>
    where
        F: FnOnce(&[String]) -> bool,
    {
        let (ini, name) = read_file(filename.as_ref())?;
        let group = ini.section(Some(DEFAULT_GROUP)).ok_or(Error::MissingGroup)?;
        let categories: Strings = group.get("Categories").parse().unwrap_or_default();
        if !filter(&categories) {
            return Ok(None);
        }
        Self::from_group(group, name).map(Some)
    }

    fn from_ini(ini: &Ini, filename: &str) -> Result<Self> {
        let group = ini.section(Some(DEFAULT_GROUP)).ok_or(Error::MissingGroup)?;
        Self::from_group(group, filename)
    }

    fn from_group(group: &Properties, filename: &str) -> Result<Self> {
        let name = group
            .get("Name")
            .map(str::to_string)
            .ok_or(Error::MissingKey("Name"))?;
        // String type
        let icon = group.get("Icon").map(str::to_string);
        let try_exec = group.get("TryExec").map(str::to_string);
        let exec = group.get("Exec").map(str::to_string);
        let toolkit = group.get(TOOLKIT_KEY).map(str::to_string);
        // Strings type
        let only_show_in = group.get("OnlyShowIn").parse();
        let not_show_in = group.get("NotShowIn").parse();
        let categories = group.get("Categories").parse();
        let replaces = group.get(REPLACE_KEY).parse();

        Ok(DesktopEntry {
            filename: filename.to_string(),
            name,
            icon,
            only_show_in,
            not_show_in,
            try_exec,
            exec,
            categories,
            toolkit,
            replaces,
        })
    }
}

/// Quotes and backslashes are part of `Exec` lines, so both are kept verbatim.
pub(crate) fn parse_option() -> ParseOption {
    ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    }
}

fn read_file(path: &Path) -> Result<(Ini, &str)> {
    let ini = Ini::load_from_file_opt(path, parse_option()).map_err(|source| Error::Load {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .and_then(OsStr::to_str)
        .ok_or_else(|| Error::InvalidFilename(path.to_path_buf()))?;
    Ok((ini, name))
}

pub trait Parse<T> {
    fn parse(&self) -> Option<T>;
}

/// A present but empty list is the empty set.
impl Parse<Strings> for Option<&str> {
    fn parse(&self) -> Option<Strings> {
        self.map(parse_strings)
    }
}

/// Splits a `;`-separated value, dropping empty items.
pub(crate) fn parse_strings(value: &str) -> Strings {
    value
        .split(';')
        .map(str::trim)
        .filter(|x| !x.is_empty())
        .map(str::to_string)
        .collect()
}

/// Loads a desktop entry from a string.
///
/// # Example
///
/// ```
/// use lx_control_center::desktop_entry::DesktopEntry;
/// use std::str::FromStr;
///
/// let desktop_entry = "
/// [Desktop Entry]
/// Name=Foo
/// X-LX-Control-Center-Toolkit=GTK
/// X-LX-Control-Center-Replace=foo.desktop;
/// ";
/// let loaded_entry = DesktopEntry::from_str(desktop_entry).unwrap();
/// assert_eq!(loaded_entry.toolkit.as_deref(), Some("GTK"));
/// assert_eq!(loaded_entry.filename, "str.desktop");
/// ```
impl std::str::FromStr for DesktopEntry {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let ini = Ini::load_from_str_opt(s, parse_option())?;
        Self::from_ini(&ini, "str.desktop")
    }
}
