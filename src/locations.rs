use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

const SETTINGS_FILE: &str = "lx-control-center/settings.conf";
const BUNDLED_SETTINGS_FILE: &str = "data/settings.conf";

/// Where `settings.conf` is read from and written to, following the
/// [X Desktop Group Base Directory specification][xdg-basedir].
///
/// [xdg-basedir]: http://standards.freedesktop.org/basedir-spec/basedir-spec-latest.html
///
/// The following environment variables are examined:
///
///   * `HOME`; if not set: use the same fallback as `std::env::home_dir()`;
///   * `XDG_CONFIG_HOME`; if not set: assumed to be `$HOME/.config`.
///   * `XDG_CONFIG_DIRS`; if not set: assumed to be `/etc/xdg`.
///
/// As per specification, if an environment variable contains a relative path,
/// the behavior is the same as if it was not set.
#[derive(Debug, Clone)]
pub struct SettingsLocations {
    /// Is guaranteed to not be `None` unless no HOME could be found.
    pub config_home: Option<PathBuf>,
    pub config_dirs: Vec<PathBuf>,
    /// Used when no configuration directory holds a `settings.conf`.
    pub bundled: PathBuf,
}

impl SettingsLocations {
    pub fn new() -> SettingsLocations {
        SettingsLocations::with_env(&|name| env::var_os(name))
    }

    pub(crate) fn with_env<T: ?Sized>(env_var: &T) -> SettingsLocations
    where
        T: Fn(&str) -> Option<OsString>,
    {
        fn abspath(path: OsString) -> Option<PathBuf> {
            let path = PathBuf::from(path);
            if path.is_absolute() {
                Some(path)
            } else {
                None
            }
        }

        fn abspaths(paths: OsString) -> Option<Vec<PathBuf>> {
            let paths = env::split_paths(&paths)
                .filter(|path| path.is_absolute())
                .collect::<Vec<_>>();
            if paths.is_empty() {
                None
            } else {
                Some(paths)
            }
        }

        let home = env_var("HOME").and_then(abspath).or_else(home_dir);
        let config_home = env_var("XDG_CONFIG_HOME")
            .and_then(abspath)
            .or_else(|| home.as_ref().map(|home| home.join(".config")));
        let config_dirs = env_var("XDG_CONFIG_DIRS")
            .and_then(abspaths)
            .unwrap_or(vec![PathBuf::from("/etc/xdg")]);
        let bundled = env::current_dir()
            .map(|cwd| cwd.join(BUNDLED_SETTINGS_FILE))
            .unwrap_or_else(|_| PathBuf::from(BUNDLED_SETTINGS_FILE));

        SettingsLocations {
            config_home,
            config_dirs,
            bundled,
        }
    }

    /// The first existing `settings.conf`, searching `XDG_CONFIG_HOME` and
    /// then `XDG_CONFIG_DIRS`, or the bundled file if there is none.
    pub fn find_settings_file(&self) -> PathBuf {
        let found = self
            .config_home
            .iter()
            .chain(self.config_dirs.iter())
            .map(|dir| dir.join(SETTINGS_FILE))
            .find(|path| path_exists(path))
            .unwrap_or_else(|| self.bundled.clone());
        debug!("find_settings_file: {}", found.display());
        found
    }

    /// The per-user `settings.conf` that saving always writes to, whichever
    /// file the settings were loaded from. Does not create any directories.
    pub fn get_settings_target(&self) -> Option<PathBuf> {
        self.config_home.as_ref().map(|home| home.join(SETTINGS_FILE))
    }
}

impl Default for SettingsLocations {
    fn default() -> Self {
        Self::new()
    }
}

// Only reached when `HOME` is unset or relative.
#[allow(deprecated)]
fn home_dir() -> Option<PathBuf> {
    env::home_dir()
}

fn path_exists(path: &Path) -> bool {
    path.is_file()
}
