use thiserror::Error;

use crate::desktop_entry;
use crate::settings::SettingsError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    DesktopEntry(#[from] desktop_entry::Error),

    #[error("$HOME must be set to save settings")]
    HomeMissing,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;
    use crate::entry::{Entry, Source};

    fn load(path: &str) -> Result<Entry> {
        Ok(Entry::load(path, Source::Application)?)
    }

    #[test]
    fn test_desktop_entry_errors_convert() {
        let err = load("test_files/applications/broken.desktop").unwrap_err();
        assert!(matches!(err, Error::DesktopEntry(desktop_entry::Error::MissingGroup)));
        assert_eq!(err.to_string(), "group [Desktop Entry] is missing");
        assert!(load("test_files/applications/gparted.desktop").is_ok());
    }
}
