//! Ties the pieces together: settings, discovery and triage.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::categories::CategoryTable;
use crate::desktop_environment;
use crate::entry::{Entry, Source};
use crate::error::{Error, Result};
use crate::locations::SettingsLocations;
use crate::scanner;
use crate::settings::Settings;
use crate::triage::Triage;

/// The state behind one control center window.
///
/// # Examples
///
/// ```no_run
/// use lx_control_center::{ControlCenter, SettingsLocations};
///
/// let mut control_center = ControlCenter::new(SettingsLocations::new())?;
/// control_center.discover(Some("GTK"));
/// for entry in control_center.active_entries() {
///     println!("{} ({})", entry.name, entry.filename);
/// }
/// # Ok::<(), lx_control_center::Error>(())
/// ```
#[derive(Debug)]
pub struct ControlCenter {
    locations: SettingsLocations,
    settings_path: PathBuf,
    settings: Settings,
    desktop_environments: Vec<String>,
    categories: CategoryTable,
    entries: Vec<Entry>,
}

impl ControlCenter {
    /// Loads settings from the first `settings.conf` found in `locations`.
    /// No entries are loaded until [`discover`](Self::discover) is called.
    pub fn new(locations: SettingsLocations) -> Result<ControlCenter> {
        let settings_path = locations.find_settings_file();
        let settings = Settings::load(&settings_path)?;
        Ok(ControlCenter::with_settings(locations, settings_path, settings))
    }

    fn with_settings(locations: SettingsLocations, settings_path: PathBuf, settings: Settings) -> ControlCenter {
        ControlCenter {
            locations,
            settings_path,
            settings,
            desktop_environments: Vec::new(),
            categories: CategoryTable::default(),
            entries: Vec::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The file the settings were loaded from, or last saved to.
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Desktop environments resolved by the last [`discover`](Self::discover).
    pub fn desktop_environments(&self) -> &[String] {
        &self.desktop_environments
    }

    /// Every loaded entry, in load order: applications first, then modules.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn active_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|entry| entry.is_active())
    }

    /// Active entries grouped by category, in taxonomy order. Entries without
    /// a category come last under `None`. Empty groups are left out.
    pub fn entries_by_category(&self) -> Vec<(Option<&str>, Vec<&Entry>)> {
        let mut groups = Vec::new();
        for (category, _) in self.settings.categories.iter() {
            let members = self
                .active_entries()
                .filter(|entry| entry.category.as_deref() == Some(category))
                .collect::<Vec<_>>();
            if !members.is_empty() {
                groups.push((Some(category), members));
            }
        }
        let others = self
            .active_entries()
            .filter(|entry| entry.category.is_none())
            .collect::<Vec<_>>();
        if !others.is_empty() {
            groups.push((None, others));
        }
        groups
    }

    /// Reloads every descriptor and decides which entries are offered.
    /// `toolkit` names the GUI toolkit hosting modules, if any.
    ///
    /// Calling it again after a settings change rebuilds the collection from
    /// scratch, since triage never turns an entry back on.
    pub fn discover(&mut self, toolkit: Option<&str>) {
        self.entries.clear();
        self.load_all_applications();
        self.load_all_modules();

        self.desktop_environments = desktop_environment::resolve(&self.settings.desktop_environments);
        debug!("desktop environments: {:?}", self.desktop_environments);
        self.categories = CategoryTable::build(&self.settings.categories);

        let triage = Triage {
            modules_support: self.settings.modules_support,
            applications_support: self.settings.applications_support,
            desktop_environments: &self.desktop_environments,
            toolkit,
            categories: &self.categories,
        };
        triage.run(&mut self.entries);
    }

    fn load_all_applications(&mut self) {
        for path in scanner::list_applications(&self.settings.applications_path) {
            self.load_application(&path);
        }
    }

    fn load_all_modules(&mut self) {
        for path in scanner::list_modules(&self.settings.modules_path) {
            self.load_module(&path);
        }
    }

    /// Adds the application descriptor at `path` if it carries one of the
    /// settings keywords. Returns whether an entry was added.
    pub fn load_application(&mut self, path: &Path) -> bool {
        match Entry::load_relevant_application(path, &self.settings.desktop_categories) {
            Ok(Some(entry)) => {
                self.entries.push(entry);
                true
            }
            Ok(None) => {
                debug!("{}: not a settings application", path.display());
                false
            }
            Err(err) => {
                warn!("skipping {}: {}", path.display(), err);
                false
            }
        }
    }

    /// Adds the module descriptor at `path`. Entries loaded so far that the
    /// module lists as replaced are turned off; later ones are not.
    pub fn load_module(&mut self, path: &Path) -> bool {
        let module = match Entry::load(path, Source::Module) {
            Ok(module) => module,
            Err(err) => {
                warn!("skipping {}: {}", path.display(), err);
                return false;
            }
        };
        let replaced = self
            .entries
            .iter_mut()
            .filter(|entry| module.replaces().contains(&entry.filename));
        for entry in replaced {
            debug!("{}: replaced by {}", entry.filename, module.filename);
            entry.deactivate();
        }
        self.entries.push(module);
        true
    }

    /// See [`Settings::set_setting`].
    pub fn set_setting(&mut self, section: &str, key: &str, value: bool) -> bool {
        self.settings.set_setting(section, key, value)
    }

    /// Saves the settings to the per-user `settings.conf`, which is then the
    /// file later saves merge into. Returns whether anything was written.
    pub fn save_settings(&mut self) -> Result<bool> {
        let target = self.locations.get_settings_target().ok_or(Error::HomeMissing)?;
        let written = self.settings.save(&self.settings_path, &target)?;
        if written {
            info!("settings saved to {}", target.display());
            self.settings_path = target;
        }
        Ok(written)
    }

    /// Dumps the loaded settings and entries at debug level.
    pub fn log_summary(&self) {
        debug!("settings file: {}", self.settings_path.display());
        debug!("{:#?}", self.settings);
        debug!("desktop environments: {:?}", self.desktop_environments);
        for entry in &self.entries {
            debug!(
                "{} [{}] {}: active={} category={:?}",
                entry.filename,
                entry.source(),
                entry.name,
                entry.is_active(),
                entry.category
            );
        }
        info!(
            "{} entries loaded, {} active",
            self.entries.len(),
            self.active_entries().count()
        );
    }
}
