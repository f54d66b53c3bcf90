use gtk4::gio;
use gtk4::prelude::*;
use webkit6::prelude::*;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use utils::sources::save_sources;
use utils::Session;

use super::constants::{ACTION_MANAGE_SOURCES, ACTION_SOURCE};

/// Handles to the window widgets plus the session they render.
///
/// Cheap to clone; every clone refers to the same window. Main thread only.
#[derive(Clone)]
pub struct LookupView {
    pub window: gtk4::ApplicationWindow,
    pub entry: gtk4::Entry,
    pub web: webkit6::WebView,
    pub session: Rc<RefCell<Session>>,
    pub sources_menu: gio::Menu,
    pub sources_file: Rc<PathBuf>,
}

impl LookupView {
    /// Navigate to the entry's text in the active source.
    pub fn lookup(&self) {
        let text = self.entry.text();
        let url = {
            let mut session = self.session.borrow_mut();
            session.set_query(&text);
            session.lookup_url()
        };
        if let Some(url) = url {
            log::debug!("lookup: {}", url);
            self.web.load_uri(&url);
        }
    }

    /// Put `word` in the search field and look it up.
    pub fn show_word(&self, word: &str) {
        let url = self.session.borrow_mut().receive_word(word);
        let query = self.session.borrow().query().to_string();
        self.entry.set_text(&query);
        if let Some(url) = url {
            log::debug!("lookup: {}", url);
            self.web.load_uri(&url);
        }
    }

    /// A word from another invocation: show it and come to the front.
    pub fn receive_word(&self, word: &str) {
        self.show_word(word);
        self.window.unminimize();
        self.window.present();
    }

    pub fn select_source(&self, name: &str) {
        if self.session.borrow_mut().select_source(name) {
            self.lookup();
        } else {
            log::warn!("unknown source {:?}", name);
        }
    }

    pub fn apply_zoom(&self) {
        self.web.set_zoom_level(self.session.borrow().zoom());
    }

    pub fn rebuild_sources_menu(&self) {
        let session = self.session.borrow();

        self.sources_menu.remove_all();
        let list = gio::Menu::new();
        for name in session.sources().names() {
            let item = gio::MenuItem::new(Some(name), None);
            item.set_action_and_target_value(
                Some(&format!("win.{ACTION_SOURCE}")),
                Some(&name.to_variant()),
            );
            list.append_item(&item);
        }
        self.sources_menu.append_section(None, &list);

        let manage = gio::Menu::new();
        manage.append(Some("Manage Sources…"), Some(&format!("win.{ACTION_MANAGE_SOURCES}")));
        self.sources_menu.append_section(None, &manage);

        // Keep the radio mark on the active source.
        if let Some(action) = self
            .window
            .lookup_action(ACTION_SOURCE)
            .and_then(|a| a.downcast::<gio::SimpleAction>().ok())
        {
            action.set_state(&session.active().to_variant());
        }
    }

    pub fn persist_sources(&self) {
        let session = self.session.borrow();
        match save_sources(&self.sources_file, session.sources()) {
            Ok(()) => log::info!("sources saved to {}", self.sources_file.display()),
            Err(e) => log::error!("sources not saved, changes last until exit: {e:#}"),
        }
    }
}
