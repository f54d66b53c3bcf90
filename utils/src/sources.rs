use anyhow::Context;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::lookup::build_lookup_url;
use crate::protocol::PLACEHOLDER;
use crate::APP_DIR_NAME;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub template: String,
}

impl Source {
    pub fn url_for(&self, word: &str) -> String {
        build_lookup_url(&self.template, word)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceError {
    /// Every candidate row was dropped by validation.
    NoValidSource,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::NoValidSource => f.write_str("At least one valid source must exist."),
        }
    }
}

impl std::error::Error for SourceError {}

/// Ordered, non-empty set of lookup sources keyed by name.
///
/// Order is insertion order; it drives the menu and decides which source is
/// active by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSet {
    entries: Vec<Source>,
}

fn is_valid(name: &str, template: &str) -> bool {
    !name.is_empty() && template.matches(PLACEHOLDER).count() == 1
}

impl SourceSet {
    /// Build a set from raw `(name, template)` rows.
    ///
    /// Rows are trimmed; rows with an empty name, empty template or no
    /// placeholder are dropped. A repeated name keeps its first position and
    /// takes the last template.
    pub fn from_entries<I, N, T>(rows: I) -> Result<Self, SourceError>
    where
        I: IntoIterator<Item = (N, T)>,
        N: AsRef<str>,
        T: AsRef<str>,
    {
        let mut entries: Vec<Source> = Vec::new();
        for (name, template) in rows {
            let name = name.as_ref().trim();
            let template = template.as_ref().trim();
            if !is_valid(name, template) {
                log::debug!("sources: dropping invalid row name={name:?} template={template:?}");
                continue;
            }
            match entries.iter_mut().find(|s| s.name == name) {
                Some(existing) => existing.template = template.to_string(),
                None => entries.push(Source {
                    name: name.to_string(),
                    template: template.to_string(),
                }),
            }
        }
        if entries.is_empty() {
            return Err(SourceError::NoValidSource);
        }
        Ok(Self { entries })
    }

    pub fn defaults() -> Self {
        Self {
            entries: [
                ("StarDict", "https://192.168.1.4:8443/dict.html?q={word}"),
                ("Youdao", "https://www.youdao.com/w/eng/{word}/"),
                ("Wiktionary", "https://en.wiktionary.org/wiki/{word}"),
                ("Google Define", "https://www.google.com/search?q=define+{word}"),
            ]
            .into_iter()
            .map(|(name, template)| Source {
                name: name.to_string(),
                template: template.to_string(),
            })
            .collect(),
        }
    }

    pub fn first(&self) -> &Source {
        // Non-empty by construction.
        &self.entries[0]
    }

    pub fn get(&self, name: &str) -> Option<&Source> {
        self.entries.iter().find(|s| s.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Source> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Serialize for SourceSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for s in &self.entries {
            map.serialize_entry(&s.name, &s.template)?;
        }
        map.end()
    }
}

struct SourceSetVisitor;

impl<'de> Visitor<'de> for SourceSetVisitor {
    type Value = SourceSet;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object mapping source names to URL templates")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SourceSet, A::Error> {
        let mut rows: Vec<(String, String)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, template)) = access.next_entry::<String, String>()? {
            rows.push((name, template));
        }
        SourceSet::from_entries(rows).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for SourceSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SourceSetVisitor)
    }
}

pub fn sources_path() -> PathBuf {
    // macOS: ~/Library/Application Support, Linux: $XDG_DATA_HOME or ~/.local/share.
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from(".local/share"));
    base.join(APP_DIR_NAME).join("sources.json")
}

pub fn read_sources(path: &Path) -> anyhow::Result<SourceSet> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let set = serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(set)
}

/// Load the persisted set, or the built-in defaults if it can't be used.
///
/// A missing file is seeded with the defaults; a broken one is left on disk
/// untouched.
pub fn load_sources(path: &Path) -> SourceSet {
    if !path.exists() {
        let defaults = SourceSet::defaults();
        if let Err(e) = save_sources(path, &defaults) {
            log::warn!("sources: could not seed defaults: {e:#}");
        }
        return defaults;
    }
    match read_sources(path) {
        Ok(set) => set,
        Err(e) => {
            log::warn!("sources: using defaults: {e:#}");
            SourceSet::defaults()
        }
    }
}

pub fn save_sources(path: &Path, sources: &SourceSet) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("mkdir sources dir")?;
    }
    let mut s = serde_json::to_string_pretty(sources).context("serialize sources")?;
    s.push('\n');
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
