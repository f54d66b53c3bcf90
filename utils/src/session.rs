//! State behind the lookup window.
//!
//! Owned by the UI and mutated only from its main loop.

use crate::sources::{SourceError, SourceSet};

pub const ZOOM_MIN: f64 = 0.25;
pub const ZOOM_MAX: f64 = 3.0;
pub const ZOOM_STEP: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct Session {
    sources: SourceSet,
    active: String,
    query: String,
    zoom: f64,
    default_zoom: f64,
}

impl Session {
    pub fn new(sources: SourceSet) -> Self {
        Self::with_zoom(sources, 1.0)
    }

    pub fn with_zoom(sources: SourceSet, default_zoom: f64) -> Self {
        let default_zoom = clamp_zoom(default_zoom);
        let active = sources.first().name.clone();
        Self {
            sources,
            active,
            query: String::new(),
            zoom: default_zoom,
            default_zoom,
        }
    }

    pub fn sources(&self) -> &SourceSet {
        &self.sources
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, text: &str) {
        self.query = text.trim().to_string();
    }

    /// URL for the current query in the active source, if there is a query.
    pub fn lookup_url(&self) -> Option<String> {
        if self.query.is_empty() {
            return None;
        }
        let source = self.sources.get(&self.active)?;
        Some(source.url_for(&self.query))
    }

    /// A word delivered over the coordination channel.
    pub fn receive_word(&mut self, word: &str) -> Option<String> {
        self.set_query(word);
        self.lookup_url()
    }

    pub fn select_source(&mut self, name: &str) -> bool {
        if !self.sources.contains(name) {
            return false;
        }
        self.active = name.to_string();
        true
    }

    /// Replace the source set with edited rows.
    ///
    /// On error nothing changes. The active source survives the edit if its
    /// name is still present, otherwise the first entry becomes active.
    pub fn apply_edit<I, N, T>(&mut self, rows: I) -> Result<(), SourceError>
    where
        I: IntoIterator<Item = (N, T)>,
        N: AsRef<str>,
        T: AsRef<str>,
    {
        let sources = SourceSet::from_entries(rows)?;
        if !sources.contains(&self.active) {
            self.active = sources.first().name.clone();
        }
        self.sources = sources;
        Ok(())
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn zoom_in(&mut self) -> f64 {
        self.zoom = clamp_zoom(self.zoom + ZOOM_STEP);
        self.zoom
    }

    pub fn zoom_out(&mut self) -> f64 {
        self.zoom = clamp_zoom(self.zoom - ZOOM_STEP);
        self.zoom
    }

    pub fn zoom_reset(&mut self) -> f64 {
        self.zoom = self.default_zoom;
        self.zoom
    }
}

fn clamp_zoom(z: f64) -> f64 {
    if !z.is_finite() {
        return 1.0;
    }
    // Round to one decimal so repeated steps don't drift.
    ((z * 10.0).round() / 10.0).clamp(ZOOM_MIN, ZOOM_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(
            SourceSet::from_entries([
                ("Wiktionary", "https://en.wiktionary.org/wiki/{word}"),
                ("Google Define", "https://www.google.com/search?q=define+{word}"),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn first_source_is_active_by_default() {
        assert_eq!(session().active(), "Wiktionary");
    }

    #[test]
    fn received_word_is_trimmed_and_looked_up() {
        let mut s = session();
        let url = s.receive_word("  data race\n");
        assert_eq!(s.query(), "data race");
        assert_eq!(url.as_deref(), Some("https://en.wiktionary.org/wiki/data%20race"));
    }

    #[test]
    fn blank_query_does_not_navigate() {
        let mut s = session();
        assert_eq!(s.receive_word("   "), None);
        assert_eq!(s.lookup_url(), None);
    }

    #[test]
    fn select_source_switches_lookup() {
        let mut s = session();
        s.set_query("a&b");
        assert!(s.select_source("Google Define"));
        assert_eq!(
            s.lookup_url().as_deref(),
            Some("https://www.google.com/search?q=define+a%26b")
        );
        assert!(!s.select_source("Missing"));
        assert_eq!(s.active(), "Google Define");
    }

    #[test]
    fn invalid_edit_keeps_previous_set() {
        let mut s = session();
        s.select_source("Google Define");
        let before = s.sources().clone();
        let err = s
            .apply_edit([("Broken", "https://no-placeholder/"), ("", "https://x/{word}")])
            .unwrap_err();
        assert_eq!(err, SourceError::NoValidSource);
        assert_eq!(s.sources(), &before);
        assert_eq!(s.active(), "Google Define");
    }

    #[test]
    fn edit_keeps_surviving_active_source() {
        let mut s = session();
        s.select_source("Google Define");
        s.apply_edit([
            ("Youdao", "https://www.youdao.com/w/eng/{word}/"),
            ("Google Define", "https://www.google.com/search?q=define+{word}"),
        ])
        .unwrap();
        assert_eq!(s.active(), "Google Define");
    }

    #[test]
    fn deleting_active_source_falls_back_to_first() {
        let mut s = session();
        s.select_source("Google Define");
        s.apply_edit([("Youdao", "https://www.youdao.com/w/eng/{word}/")]).unwrap();
        assert_eq!(s.active(), "Youdao");
    }

    #[test]
    fn zoom_is_clamped() {
        let mut s = session();
        for _ in 0..40 {
            s.zoom_in();
        }
        assert_eq!(s.zoom(), ZOOM_MAX);
        for _ in 0..40 {
            s.zoom_out();
        }
        assert_eq!(s.zoom(), ZOOM_MIN);
        assert_eq!(s.zoom_reset(), 1.0);
        assert_eq!(s.zoom_in(), 1.1);
    }

    #[test]
    fn default_zoom_is_sanitised() {
        let s = Session::with_zoom(SourceSet::defaults(), 9.0);
        assert_eq!(s.zoom(), ZOOM_MAX);
        let s = Session::with_zoom(SourceSet::defaults(), f64::NAN);
        assert_eq!(s.zoom(), 1.0);
    }
}
