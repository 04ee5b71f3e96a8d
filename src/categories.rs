use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::entry::Entry;

/// Canonical categories shown by the control center and the `Categories`
/// keywords that fall into each of them, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Taxonomy {
    categories: Vec<(String, Vec<String>)>,
}

const DEFAULT_TAXONOMY: &[(&str, &[&str])] = &[
    ("DesktopSettings", &["DesktopSettings"]),
    ("HardwareSettings", &["HardwareSettings"]),
    ("Printing", &["Printing"]),
    ("System", &["PackageManager", "TerminalEmulator"]),
    ("FileManager", &["FileManager", "FileTools", "Filesystem"]),
    ("Monitor", &["Monitor"]),
    ("Security", &["Security"]),
    ("Accessibility", &["Accessibility"]),
];

impl Taxonomy {
    pub fn new() -> Taxonomy {
        Taxonomy {
            categories: Vec::new(),
        }
    }

    /// Sets the keywords of `category`. A category that is already declared
    /// keeps its position.
    pub fn insert<S, I>(&mut self, category: S, keywords: I)
    where
        S: Into<String>,
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let category = category.into();
        let keywords = keywords.into_iter().map(Into::into).collect::<Vec<_>>();
        match self.categories.iter_mut().find(|(name, _)| *name == category) {
            Some((_, existing)) => *existing = keywords,
            None => self.categories.push((category, keywords)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.categories
            .iter()
            .map(|(name, keywords)| (name.as_str(), keywords.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        let mut taxonomy = Taxonomy::new();
        for (category, keywords) in DEFAULT_TAXONOMY {
            taxonomy.insert(*category, keywords.iter().copied());
        }
        taxonomy
    }
}

/// Keyword to canonical category lookup built from a [`Taxonomy`].
///
/// When two categories claim the same keyword the one declared last wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryTable {
    keywords: HashMap<String, String>,
}

impl CategoryTable {
    pub fn build(taxonomy: &Taxonomy) -> CategoryTable {
        let mut keywords = HashMap::new();
        for (category, category_keywords) in taxonomy.iter() {
            for keyword in category_keywords {
                keywords.insert(keyword.clone(), category.to_string());
            }
        }
        CategoryTable { keywords }
    }

    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.keywords.get(keyword).map(String::as_str)
    }

    /// Canonical category of the first of `entry`'s tags that is known,
    /// `None` if none of them is.
    pub fn resolve(&self, entry: &Entry) -> Option<String> {
        entry
            .category_tags
            .iter()
            .find_map(|tag| self.get(tag))
            .map(str::to_string)
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::desktop_entry::DesktopEntry;
    use crate::entry::Source;
    use std::str::FromStr;

    fn entry_with_categories(categories: &str) -> Entry {
        let contents = format!("[Desktop Entry]\nName=Foo\nCategories={}\n", categories);
        let desktop_entry = DesktopEntry::from_str(&contents).unwrap();
        Entry::from_desktop_entry(desktop_entry, "/tmp/foo.desktop", Source::Application).unwrap()
    }

    #[test]
    fn test_default_table() {
        let table = CategoryTable::build(&Taxonomy::default());
        assert_eq!(table.len(), 11);
        assert_eq!(table.get("TerminalEmulator"), Some("System"));
        assert_eq!(table.get("Filesystem"), Some("FileManager"));
        assert_eq!(table.get("Settings"), None);
    }

    #[test]
    fn test_last_declaration_wins() {
        let mut taxonomy = Taxonomy::new();
        taxonomy.insert("A", ["K", "X"]);
        taxonomy.insert("B", ["K"]);
        let table = CategoryTable::build(&taxonomy);
        assert_eq!(table.get("K"), Some("B"));
        assert_eq!(table.get("X"), Some("A"));
    }

    #[test]
    fn test_insert_keeps_position() {
        let mut taxonomy = Taxonomy::new();
        taxonomy.insert("A", ["K"]);
        taxonomy.insert("B", ["K"]);
        taxonomy.insert("A", ["K", "Y"]);
        let names = taxonomy.iter().map(|(name, _)| name).collect::<Vec<_>>();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(CategoryTable::build(&taxonomy).get("K"), Some("B"));
    }

    #[test]
    fn test_first_declared_tag_wins() {
        let table = CategoryTable::build(&Taxonomy::default());
        // Monitor and Security both match; Security is declared first.
        let entry = entry_with_categories("Settings;Security;Monitor;");
        assert_eq!(table.resolve(&entry).as_deref(), Some("Security"));
        let entry = entry_with_categories("Monitor;Security;");
        assert_eq!(table.resolve(&entry).as_deref(), Some("Monitor"));
    }

    #[test]
    fn test_uncategorized() {
        let table = CategoryTable::build(&Taxonomy::default());
        let entry = entry_with_categories("Settings;X-LXDE-Settings;");
        assert_eq!(table.resolve(&entry), None);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let table = CategoryTable::build(&Taxonomy::default());
        let mut entry = entry_with_categories("GTK;System;Filesystem;");
        entry.category = table.resolve(&entry);
        let first = entry.category.clone();
        entry.category = table.resolve(&entry);
        assert_eq!(entry.category, first);
        assert_eq!(first.as_deref(), Some("FileManager"));
    }
}
