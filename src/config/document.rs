use serde::Serialize;

use crate::core::types::{DEFAULT_SECTION, REFVERSION_KEY};

/// One named section of the configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: String,
    /// Options in insertion order; keys are unique
    pub options: Vec<(String, String)>,
}

impl Section {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Vec::new(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn set(&mut self, key: &str, value: &str) {
        match self.options.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.options.push((key.to_string(), value.to_string())),
        }
    }
}

/// In-memory configuration: a `DEFAULT` section plus one section per build.
///
/// Option names are case-insensitive and stored lowercased. Lookups in a
/// build section fall back to `DEFAULT`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigDocument {
    defaults: Section,
    sections: Vec<Section>,
    #[serde(skip)]
    modified: bool,
}

impl ConfigDocument {
    #[must_use]
    pub fn new() -> Self {
        Self {
            defaults: Section::new(DEFAULT_SECTION),
            sections: Vec::new(),
            modified: false,
        }
    }

    /// Set an option, creating the section if needed. Rebinding a key overwrites it.
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        let key = normalize_key(key);
        self.section_mut(section).set(&key, value);
        self.modified = true;
    }

    /// Value of an option, falling back to `DEFAULT` for build sections
    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        let key = normalize_key(key);
        if section == DEFAULT_SECTION {
            return self.defaults.get(&key);
        }
        self.section(section)
            .and_then(|s| s.get(&key))
            .or_else(|| self.defaults.get(&key))
    }

    /// Whether a section other than `DEFAULT` exists
    #[must_use]
    pub fn has_section(&self, section: &str) -> bool {
        section != DEFAULT_SECTION && self.sections.iter().any(|s| s.name == section)
    }

    /// Whether an option is set, counting `DEFAULT` fallback
    #[must_use]
    pub fn has_option(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        if name == DEFAULT_SECTION {
            return Some(&self.defaults);
        }
        self.sections.iter().find(|s| s.name == name)
    }

    /// Names of all build sections, in file order
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    /// Own options of a section, without `DEFAULT` fallback
    #[must_use]
    pub fn options(&self, section: &str) -> &[(String, String)] {
        self.section(section)
            .map(|s| s.options.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn defaults(&self) -> &Section {
        &self.defaults
    }

    /// `DEFAULT` followed by every build section
    pub fn all_sections(&self) -> impl Iterator<Item = &Section> {
        std::iter::once(&self.defaults).chain(self.sections.iter())
    }

    pub(crate) fn all_sections_mut(&mut self) -> impl Iterator<Item = &mut Section> {
        std::iter::once(&mut self.defaults).chain(self.sections.iter_mut())
    }

    /// Active build recorded in `DEFAULT`
    #[must_use]
    pub fn refversion(&self) -> Option<&str> {
        self.defaults.get(REFVERSION_KEY)
    }

    pub fn set_refversion(&mut self, build: &str) {
        self.set(DEFAULT_SECTION, REFVERSION_KEY, build);
    }

    /// Whether anything was set since load
    #[must_use]
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub(crate) fn mark_clean(&mut self) {
        self.modified = false;
    }

    /// Total number of options across all sections
    #[must_use]
    pub fn option_count(&self) -> usize {
        self.all_sections().map(|s| s.options.len()).sum()
    }

    fn section_mut(&mut self, name: &str) -> &mut Section {
        if name == DEFAULT_SECTION {
            return &mut self.defaults;
        }
        let index = match self.sections.iter().position(|s| s.name == name) {
            Some(index) => index,
            None => {
                self.sections.push(Section::new(name));
                self.sections.len() - 1
            }
        };
        &mut self.sections[index]
    }
}

impl Default for ConfigDocument {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}
