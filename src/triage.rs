//! Decides which discovered entries are offered and under which category.
//!
//! The passes run in a fixed order and only ever turn entries off, so the
//! final `active` flag is the conjunction of every pass. Categorization runs
//! last and covers inactive entries too.

use std::path::Path;

use tracing::debug;

use crate::categories::CategoryTable;
use crate::entry::{Entry, EntryKind, Source};

/// Everything the passes need to know about the running session.
#[derive(Clone, Copy, Debug)]
pub struct Triage<'a> {
    pub modules_support: bool,
    pub applications_support: bool,
    pub desktop_environments: &'a [String],
    /// Toolkit of the GUI hosting modules, `None` when no GUI toolkit is active.
    pub toolkit: Option<&'a str>,
    pub categories: &'a CategoryTable,
}

impl Triage<'_> {
    pub fn run(&self, entries: &mut [Entry]) {
        self.apply_support(entries);
        self.apply_desktop_environments(entries);
        apply_try_exec(entries);
        apply_no_exec(entries);
        self.apply_toolkit(entries);
        self.apply_categories(entries);
    }

    /// Turns off every module or every application when support for that
    /// kind is disabled.
    pub fn apply_support(&self, entries: &mut [Entry]) {
        for entry in entries.iter_mut() {
            let supported = match entry.source() {
                Source::Module => self.modules_support,
                Source::Application => self.applications_support,
            };
            if !supported {
                deactivate(entry, "support disabled");
            }
        }
    }

    /// `NotShowIn` is checked first; `OnlyShowIn` only matters when it is
    /// non-empty.
    pub fn apply_desktop_environments(&self, entries: &mut [Entry]) {
        let current = self.desktop_environments;
        for entry in entries.iter_mut().filter(|entry| entry.is_active()) {
            if entry.not_show_in.iter().any(|desktop| current.contains(desktop)) {
                deactivate(entry, "NotShowIn");
            } else if !entry.only_show_in.is_empty()
                && !entry.only_show_in.iter().any(|desktop| current.contains(desktop))
            {
                deactivate(entry, "OnlyShowIn");
            }
        }
    }

    pub fn apply_toolkit(&self, entries: &mut [Entry]) {
        for entry in entries.iter_mut() {
            let mismatch = match &entry.kind {
                EntryKind::Module {
                    toolkit: Some(required),
                    ..
                } => Some(required.as_str()) != self.toolkit,
                _ => false,
            };
            if mismatch {
                deactivate(entry, "toolkit mismatch");
            }
        }
    }

    pub fn apply_categories(&self, entries: &mut [Entry]) {
        for entry in entries.iter_mut() {
            entry.category = self.categories.resolve(entry);
        }
    }
}

/// Turns off applications whose `TryExec` program is missing.
pub fn apply_try_exec(entries: &mut [Entry]) {
    for entry in entries.iter_mut() {
        let missing = match &entry.kind {
            EntryKind::Application {
                try_exec: Some(program),
                ..
            } => !program_exists(program),
            _ => false,
        };
        if missing {
            deactivate(entry, "TryExec not found");
        }
    }
}

/// Turns off applications without an `Exec` line.
pub fn apply_no_exec(entries: &mut [Entry]) {
    for entry in entries.iter_mut() {
        if let EntryKind::Application {
            execute_command: None,
            ..
        } = entry.kind
        {
            deactivate(entry, "no Exec");
        }
    }
}

/// A bare program name is looked up in `$PATH`, anything else is a path.
fn program_exists(program: &str) -> bool {
    if program.contains('/') {
        Path::new(program).exists()
    } else {
        which::which(program).is_ok()
    }
}

fn deactivate(entry: &mut Entry, reason: &str) {
    if entry.is_active() {
        debug!("{}: deactivated ({})", entry.filename, reason);
    }
    entry.deactivate();
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::categories::Taxonomy;
    use crate::desktop_entry::DesktopEntry;
    use std::str::FromStr;

    fn entry(contents: &str, source: Source) -> Entry {
        let contents = format!("[Desktop Entry]\nName=Foo\n{}", contents);
        let desktop_entry = DesktopEntry::from_str(&contents).unwrap();
        Entry::from_desktop_entry(desktop_entry, "/tmp/str.desktop", source).unwrap()
    }

    fn application(contents: &str) -> Entry {
        entry(
            &format!("Categories=Settings;\nExec=foo\n{}", contents),
            Source::Application,
        )
    }

    fn module(contents: &str) -> Entry {
        entry(contents, Source::Module)
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    struct Session {
        desktops: Vec<String>,
        table: CategoryTable,
    }

    impl Session {
        fn new(desktops: &[&str]) -> Session {
            Session {
                desktops: strings(desktops),
                table: CategoryTable::build(&Taxonomy::default()),
            }
        }

        fn triage(&self, toolkit: Option<&'static str>) -> Triage<'_> {
            Triage {
                modules_support: true,
                applications_support: true,
                desktop_environments: &self.desktops,
                toolkit,
                categories: &self.table,
            }
        }
    }

    #[test]
    fn test_support_gate() {
        let session = Session::new(&["LXDE"]);
        let mut entries = vec![application(""), module("")];

        let triage = Triage {
            modules_support: false,
            ..session.triage(None)
        };
        triage.apply_support(&mut entries);
        assert!(entries[0].is_active());
        assert!(!entries[1].is_active());

        let triage = Triage {
            applications_support: false,
            ..session.triage(None)
        };
        triage.apply_support(&mut entries);
        assert!(!entries[0].is_active());
        // Enabled support does not bring the module back.
        assert!(!entries[1].is_active());
    }

    #[test]
    fn test_not_show_in_wins() {
        let session = Session::new(&["GNOME"]);
        let mut entries = vec![application("OnlyShowIn=GNOME;\nNotShowIn=GNOME;\n")];
        session.triage(None).apply_desktop_environments(&mut entries);
        assert!(!entries[0].is_active());
    }

    #[test]
    fn test_only_show_in() {
        let session = Session::new(&["LXDE"]);
        let mut entries = vec![
            application("OnlyShowIn=GNOME;KDE;\n"),
            application("OnlyShowIn=XFCE;LXDE;\n"),
            application("NotShowIn=GNOME;\n"),
            application(""),
        ];
        session.triage(None).apply_desktop_environments(&mut entries);
        let active = entries.iter().map(Entry::is_active).collect::<Vec<_>>();
        assert_eq!(active, [false, true, true, true]);
    }

    #[test]
    fn test_unknown_desktop() {
        let session = Session::new(&[]);
        let mut entries = vec![application("OnlyShowIn=GNOME;\n"), application("NotShowIn=GNOME;\n")];
        session.triage(None).apply_desktop_environments(&mut entries);
        assert!(!entries[0].is_active());
        assert!(entries[1].is_active());
    }

    #[test]
    fn test_try_exec() {
        let tmp = tempfile::tempdir().unwrap();
        let program = tmp.path().join("present");
        std::fs::write(&program, "").unwrap();

        let mut entries = vec![
            application(&format!("TryExec={}\n", program.display())),
            application(&format!("TryExec={}\n", tmp.path().join("absent").display())),
            application(""),
            module(&format!("TryExec={}\n", tmp.path().join("absent").display())),
        ];
        apply_try_exec(&mut entries);
        let active = entries.iter().map(Entry::is_active).collect::<Vec<_>>();
        assert_eq!(active, [true, false, true, true]);
    }

    #[test]
    fn test_try_exec_program_name() {
        let mut entries = vec![application(
            "TryExec=lx-control-center-no-such-program-on-path\n",
        )];
        apply_try_exec(&mut entries);
        assert!(!entries[0].is_active());
    }

    #[test]
    fn test_no_exec() {
        let mut entries = vec![
            entry("Categories=Settings;\n", Source::Application),
            application(""),
            module(""),
        ];
        apply_no_exec(&mut entries);
        let active = entries.iter().map(Entry::is_active).collect::<Vec<_>>();
        assert_eq!(active, [false, true, true]);
    }

    #[test]
    fn test_toolkit() {
        let session = Session::new(&["LXDE"]);
        let mut entries = vec![
            module("X-LX-Control-Center-Toolkit=GTK\n"),
            module("X-LX-Control-Center-Toolkit=QT\n"),
            module(""),
            application(""),
        ];
        session.triage(Some("QT")).apply_toolkit(&mut entries);
        let active = entries.iter().map(Entry::is_active).collect::<Vec<_>>();
        assert_eq!(active, [false, true, true, true]);
    }

    #[test]
    fn test_toolkit_without_gui() {
        let session = Session::new(&["LXDE"]);
        let mut entries = vec![module("X-LX-Control-Center-Toolkit=GTK\n"), module("")];
        session.triage(None).apply_toolkit(&mut entries);
        assert!(!entries[0].is_active());
        assert!(entries[1].is_active());
    }

    #[test]
    fn test_inactive_entries_are_categorized() {
        let session = Session::new(&["LXDE"]);
        let mut entries = vec![
            entry("Categories=Settings;Security;\n", Source::Application),
            application(""),
        ];
        session.triage(None).run(&mut entries);
        assert!(!entries[0].is_active());
        assert_eq!(entries[0].category.as_deref(), Some("Security"));
        assert!(entries[1].is_active());
        assert_eq!(entries[1].category, None);
    }

    #[test]
    fn test_active_is_conjunction_of_passes() {
        let session = Session::new(&["LXDE"]);
        let mut entries = vec![
            module("X-LX-Control-Center-Toolkit=GTK\nOnlyShowIn=LXDE;\nCategories=Monitor;\n"),
            module("X-LX-Control-Center-Toolkit=GTK\nNotShowIn=LXDE;\n"),
            application("TryExec=/nonexistent/lx-control-center/tool\n"),
            application("OnlyShowIn=LXDE;\n"),
        ];
        session.triage(Some("GTK")).run(&mut entries);
        let active = entries.iter().map(Entry::is_active).collect::<Vec<_>>();
        assert_eq!(active, [true, false, false, true]);
        assert_eq!(entries[0].category.as_deref(), Some("Monitor"));

        // A second run changes nothing.
        let before = entries.clone();
        session.triage(Some("GTK")).run(&mut entries);
        assert_eq!(entries, before);
    }
}
