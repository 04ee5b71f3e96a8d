//! The `settings.conf` store.
//!
//! Every setting has a built-in default. Loading overlays whatever the file
//! declares; saving is sparse, so a key whose value equals its default is
//! removed from the file instead of written, and the file is only rewritten
//! when something actually changed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ini::{EscapePolicy, Ini};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::categories::Taxonomy;
use crate::desktop_entry::{parse_option, parse_strings};
use crate::desktop_environment::AUTO;

pub const CONFIGURATION: &str = "Configuration";
pub const CATEGORIES: &str = "Categories";
pub const PATH: &str = "Path";
pub const UI: &str = "UI";

const DESKTOP_CATEGORIES: &[&str] = &[
    "Settings",
    "System",
    "DesktopSettings",
    "X-LXDE-Settings",
    "X-GNOME-Settings-Panel",
    "X-GNOME-PersonalSettings",
    "X-XFCE-SettingsDialog",
    "X-XFCE-HardwareSetting",
];
const APPLICATIONS_PATH: &[&str] = &["/usr/share/applications"];
const MODULES_PATH: &[&str] = &["/usr/lib/lx-control-center", "/usr/share/lx-control-center"];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not load settings from {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("[{section}] {key}={value} is not a valid {expected}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("could not write settings to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

type Result<T> = std::result::Result<T, SettingsError>;

/// Window and icon view preferences handed to the GUI.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UiSettings {
    pub window_size_w: i32,
    pub window_size_h: i32,
    pub window_icon: String,
    pub window_title: String,
    pub icon_view_columns: i32,
    pub icon_view_icons_size: i32,
    pub icon_not_theme_allow: bool,
    pub icon_force_size: bool,
    pub icon_fallback: String,
    pub view_mode: String,
    pub view_visual_effects: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        UiSettings {
            window_size_w: 800,
            window_size_h: 600,
            window_icon: "preferences-system".to_string(),
            window_title: "LX-Control-Center".to_string(),
            icon_view_columns: 5,
            icon_view_icons_size: 32,
            icon_not_theme_allow: false,
            icon_force_size: true,
            icon_fallback: "gtk-stop".to_string(),
            view_mode: "icons-all".to_string(),
            view_visual_effects: false,
        }
    }
}

/// All settings of the control center.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    /// `Categories` keywords that make an application a settings tool.
    pub desktop_categories: Vec<String>,
    /// `["Auto"]` or an explicit list of desktop environment names.
    pub desktop_environments: Vec<String>,
    pub version_config: f64,
    pub modules_support: bool,
    pub applications_support: bool,
    /// Ignore the `[Categories]` section and keep the built-in taxonomy.
    pub categories_fixed: bool,
    pub categories: Taxonomy,
    pub applications_path: Vec<String>,
    pub modules_path: Vec<String>,
    pub ui: UiSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            desktop_categories: strings(DESKTOP_CATEGORIES),
            desktop_environments: vec![AUTO.to_string()],
            version_config: 0.1,
            modules_support: true,
            applications_support: true,
            categories_fixed: false,
            categories: Taxonomy::default(),
            applications_path: strings(APPLICATIONS_PATH),
            modules_path: strings(MODULES_PATH),
            ui: UiSettings::default(),
        }
    }
}

impl Settings {
    /// Reads `path` over the defaults. A missing file yields the defaults; a
    /// value of the wrong type is an error.
    pub fn load(path: &Path) -> Result<Settings> {
        if !path.exists() {
            info!("{} doesn't exist, using default settings", path.display());
            return Ok(Settings::default());
        }
        debug!("load_settings: loading {}", path.display());
        let keyfile = read_keyfile(path)?;
        Settings::from_keyfile(&keyfile)
    }

    fn from_keyfile(keyfile: &Ini) -> Result<Settings> {
        let default = Settings::default();
        let ui = default.ui;

        let categories_fixed = get(keyfile, CONFIGURATION, "categories_fixed", default.categories_fixed)?;
        let categories = match keyfile.section(Some(CATEGORIES)) {
            Some(section) if !categories_fixed && section.iter().next().is_some() => {
                let mut taxonomy = Taxonomy::new();
                for (category, keywords) in section.iter() {
                    debug!("load_settings: category {} = {}", category, keywords);
                    taxonomy.insert(category, parse_strings(keywords));
                }
                taxonomy
            }
            _ => default.categories,
        };

        Ok(Settings {
            desktop_categories: get(keyfile, CONFIGURATION, "desktop_categories", default.desktop_categories)?,
            desktop_environments: get(keyfile, CONFIGURATION, "desktop_environments", default.desktop_environments)?,
            version_config: get(keyfile, CONFIGURATION, "version_config", default.version_config)?,
            modules_support: get(keyfile, CONFIGURATION, "modules_support", default.modules_support)?,
            applications_support: get(keyfile, CONFIGURATION, "applications_support", default.applications_support)?,
            categories_fixed,
            categories,
            applications_path: get(keyfile, PATH, "applications_path", default.applications_path)?,
            modules_path: get(keyfile, PATH, "modules_path", default.modules_path)?,
            ui: UiSettings {
                window_size_w: get(keyfile, UI, "window_size_w", ui.window_size_w)?,
                window_size_h: get(keyfile, UI, "window_size_h", ui.window_size_h)?,
                window_icon: get(keyfile, UI, "window_icon", ui.window_icon)?,
                window_title: get(keyfile, UI, "window_title", ui.window_title)?,
                icon_view_columns: get(keyfile, UI, "icon_view_columns", ui.icon_view_columns)?,
                icon_view_icons_size: get(keyfile, UI, "icon_view_icons_size", ui.icon_view_icons_size)?,
                icon_not_theme_allow: get(keyfile, UI, "icon_not_theme_allow", ui.icon_not_theme_allow)?,
                icon_force_size: get(keyfile, UI, "icon_force_size", ui.icon_force_size)?,
                icon_fallback: get(keyfile, UI, "icon_fallback", ui.icon_fallback)?,
                view_mode: get(keyfile, UI, "view_mode", ui.view_mode)?,
                view_visual_effects: get(keyfile, UI, "view_visual_effects", ui.view_visual_effects)?,
            },
        })
    }

    /// Changes one of the settings the GUI toggles at runtime. Returns
    /// `false` for keys that cannot be set this way.
    pub fn set_setting(&mut self, section: &str, key: &str, value: bool) -> bool {
        match (section, key) {
            (CONFIGURATION, "modules_support") => self.modules_support = value,
            (CONFIGURATION, "applications_support") => self.applications_support = value,
            _ => {
                debug!("set_setting: {} - {} not implemented", section, key);
                return false;
            }
        }
        true
    }

    /// Merges these settings into the file they were loaded from and writes
    /// the result to `target`. Nothing is written when the merged file would
    /// be identical; the return value tells whether a write happened.
    pub fn save(&self, loaded_from: &Path, target: &Path) -> Result<bool> {
        let keyfile = if loaded_from.exists() {
            read_keyfile(loaded_from)?
        } else {
            Ini::new()
        };
        debug!("save_settings: loading {} as a keyfile", loaded_from.display());

        let mut keyfile = KeyFile::new(keyfile);
        let default = Settings::default();
        let ui = &self.ui;
        let ui_default = &default.ui;

        keyfile.put(CONFIGURATION, "desktop_categories", &self.desktop_categories, &default.desktop_categories);
        keyfile.put(CONFIGURATION, "desktop_environments", &self.desktop_environments, &default.desktop_environments);
        keyfile.put(CONFIGURATION, "version_config", &self.version_config, &default.version_config);
        keyfile.put(CONFIGURATION, "modules_support", &self.modules_support, &default.modules_support);
        keyfile.put(CONFIGURATION, "applications_support", &self.applications_support, &default.applications_support);
        keyfile.put(CONFIGURATION, "categories_fixed", &self.categories_fixed, &default.categories_fixed);

        if !self.categories_fixed {
            keyfile.put_categories(&self.categories, &default.categories);
        }

        keyfile.put(PATH, "applications_path", &self.applications_path, &default.applications_path);
        keyfile.put(PATH, "modules_path", &self.modules_path, &default.modules_path);

        keyfile.put(UI, "window_size_w", &ui.window_size_w, &ui_default.window_size_w);
        keyfile.put(UI, "window_size_h", &ui.window_size_h, &ui_default.window_size_h);
        keyfile.put(UI, "window_icon", &ui.window_icon, &ui_default.window_icon);
        keyfile.put(UI, "window_title", &ui.window_title, &ui_default.window_title);
        keyfile.put(UI, "icon_view_columns", &ui.icon_view_columns, &ui_default.icon_view_columns);
        keyfile.put(UI, "icon_view_icons_size", &ui.icon_view_icons_size, &ui_default.icon_view_icons_size);
        keyfile.put(UI, "icon_not_theme_allow", &ui.icon_not_theme_allow, &ui_default.icon_not_theme_allow);
        keyfile.put(UI, "icon_force_size", &ui.icon_force_size, &ui_default.icon_force_size);
        keyfile.put(UI, "icon_fallback", &ui.icon_fallback, &ui_default.icon_fallback);
        keyfile.put(UI, "view_mode", &ui.view_mode, &ui_default.view_mode);
        keyfile.put(UI, "view_visual_effects", &ui.view_visual_effects, &ui_default.view_visual_effects);

        if !keyfile.dirty {
            debug!("save_settings: nothing changed");
            return Ok(false);
        }
        keyfile.write(target)?;
        Ok(true)
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn read_keyfile(path: &Path) -> Result<Ini> {
    Ini::load_from_file_opt(path, parse_option()).map_err(|source| SettingsError::Load {
        path: path.to_path_buf(),
        source,
    })
}

fn get<T: Value>(keyfile: &Ini, section: &str, key: &str, default: T) -> Result<T> {
    match keyfile.get_from(Some(section), key) {
        None => Ok(default),
        Some(raw) => T::read(raw).ok_or_else(|| SettingsError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: raw.to_string(),
            expected: T::EXPECTED,
        }),
    }
}

/// How a setting type is stored in the file.
trait Value: Sized + PartialEq {
    const EXPECTED: &'static str;
    fn read(raw: &str) -> Option<Self>;
    fn write(&self) -> String;
}

impl Value for i32 {
    const EXPECTED: &'static str = "int";
    fn read(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
    fn write(&self) -> String {
        self.to_string()
    }
}

impl Value for f64 {
    const EXPECTED: &'static str = "float";
    fn read(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
    fn write(&self) -> String {
        self.to_string()
    }
}

impl Value for bool {
    const EXPECTED: &'static str = "boolean";
    fn read(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "yes" | "true" | "on" => Some(true),
            "0" | "no" | "false" | "off" => Some(false),
            _ => None,
        }
    }
    fn write(&self) -> String {
        self.to_string()
    }
}

impl Value for String {
    const EXPECTED: &'static str = "string";
    fn read(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
    fn write(&self) -> String {
        self.clone()
    }
}

impl Value for Vec<String> {
    const EXPECTED: &'static str = "list";
    fn read(raw: &str) -> Option<Self> {
        Some(parse_strings(raw))
    }
    fn write(&self) -> String {
        format!("{};", self.join(";"))
    }
}

/// An INI document being brought in line with the in-memory settings.
struct KeyFile {
    ini: Ini,
    dirty: bool,
}

impl KeyFile {
    fn new(ini: Ini) -> KeyFile {
        KeyFile { ini, dirty: false }
    }

    fn put<T: Value>(&mut self, section: &str, key: &str, value: &T, default: &T) {
        if value == default {
            if self.ini.delete_from(Some(section), key).is_some() {
                debug!("save_setting: {} {} back to default, removing", section, key);
                self.dirty = true;
            }
            self.drop_if_empty(section);
            return;
        }
        self.set(section, key, value);
    }

    fn set<T: Value>(&mut self, section: &str, key: &str, value: &T) {
        let current = self.ini.get_from(Some(section), key).and_then(T::read);
        if current.as_ref() != Some(value) {
            debug!("save_setting: {} {} = {}", section, key, value.write());
            self.ini.with_section(Some(section)).set(key, value.write());
            self.dirty = true;
        }
    }

    fn put_categories(&mut self, categories: &Taxonomy, default: &Taxonomy) {
        if categories == default {
            if self.ini.delete(Some(CATEGORIES)).is_some() {
                self.dirty = true;
            }
            return;
        }
        let stale: Vec<String> = match self.ini.section(Some(CATEGORIES)) {
            Some(section) => section
                .iter()
                .map(|(key, _)| key.to_string())
                .filter(|key| !categories.iter().any(|(name, _)| name == key.as_str()))
                .collect(),
            None => Vec::new(),
        };
        for key in stale {
            self.ini.delete_from(Some(CATEGORIES), &key);
            self.dirty = true;
        }
        for (category, keywords) in categories.iter() {
            self.set(CATEGORIES, category, &keywords.to_vec());
        }
    }

    fn drop_if_empty(&mut self, section: &str) {
        let empty = self
            .ini
            .section(Some(section))
            .map_or(false, |properties| properties.iter().next().is_none());
        if empty {
            self.ini.delete(Some(section));
        }
    }

    fn write(&self, target: &Path) -> Result<()> {
        let write_error = |source| SettingsError::Write {
            path: target.to_path_buf(),
            source,
        };
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        debug!("save_file: Save file on {}", target.display());
        self.ini
            .write_to_file_policy(target, EscapePolicy::Nothing)
            .map_err(write_error)
    }
}
