use glib::clone;
use gtk4::gio;
use gtk4::prelude::*;

use std::cell::RefCell;
use std::rc::Rc;

use utils::sources::{load_sources, sources_path};
use utils::{Config, Session};

mod actions;
mod constants;
mod coordination;
mod sources_dialog;
mod view;

use self::actions::install_actions;
use self::constants::{
    ACTION_DEVTOOLS, ACTION_ZOOM_IN, ACTION_ZOOM_OUT, ACTION_ZOOM_RESET, DEFAULT_HEIGHT,
    DEFAULT_WIDTH, WINDOW_TITLE,
};
use self::coordination::start_coordination;
use self::view::LookupView;

/// What `main` knows before the window exists.
pub struct Startup {
    pub cfg: Config,
    pub word: Option<String>,
}

pub fn install_accels(app: &gtk4::Application) {
    app.set_accels_for_action(&format!("win.{ACTION_ZOOM_IN}"), &["<Ctrl>equal", "<Ctrl>plus"]);
    app.set_accels_for_action(&format!("win.{ACTION_ZOOM_OUT}"), &["<Ctrl>minus"]);
    app.set_accels_for_action(&format!("win.{ACTION_ZOOM_RESET}"), &["<Ctrl>0"]);
    app.set_accels_for_action(&format!("win.{ACTION_DEVTOOLS}"), &["<Ctrl><Shift>i"]);
}

/// A quarter of the monitor's width, nearly its full height.
fn side_panel_size(monitor_width: i32, monitor_height: i32) -> (i32, i32) {
    if monitor_width <= 0 || monitor_height <= 0 {
        return (DEFAULT_WIDTH, DEFAULT_HEIGHT);
    }
    (monitor_width / 4, monitor_height * 95 / 100)
}

fn initial_window_size() -> (i32, i32) {
    // The window isn't mapped yet, so take the first monitor.
    let geometry = gtk4::gdk::Display::default()
        .and_then(|d| d.monitors().item(0))
        .and_then(|o| o.downcast::<gtk4::gdk::Monitor>().ok())
        .map(|m| m.geometry());
    match geometry {
        Some(g) => side_panel_size(g.width(), g.height()),
        None => (DEFAULT_WIDTH, DEFAULT_HEIGHT),
    }
}

pub fn build_ui(app: &gtk4::Application, startup: &Startup) {
    // `activate` can fire more than once; never build a second window.
    if let Some(win) = app.active_window().or_else(|| app.windows().into_iter().next()) {
        win.present();
        return;
    }

    let sources_file = sources_path();
    let sources = load_sources(&sources_file);
    let session = Rc::new(RefCell::new(Session::with_zoom(sources, startup.cfg.default_zoom)));

    let (width, height) = initial_window_size();
    let window = gtk4::ApplicationWindow::builder()
        .application(app)
        .title(WINDOW_TITLE)
        .default_width(width)
        .default_height(height)
        .build();

    let header = gtk4::HeaderBar::new();

    let sources_menu = gio::Menu::new();
    let sources_btn = gtk4::MenuButton::builder()
        .label("Sources")
        .menu_model(&sources_menu)
        .build();
    header.pack_start(&sources_btn);

    let view_menu = gio::Menu::new();
    let zoom_section = gio::Menu::new();
    zoom_section.append(Some("Zoom In"), Some(&format!("win.{ACTION_ZOOM_IN}")));
    zoom_section.append(Some("Zoom Out"), Some(&format!("win.{ACTION_ZOOM_OUT}")));
    zoom_section.append(Some("Reset Zoom"), Some(&format!("win.{ACTION_ZOOM_RESET}")));
    view_menu.append_section(None, &zoom_section);
    let dev_section = gio::Menu::new();
    dev_section.append(Some("Toggle DevTools"), Some(&format!("win.{ACTION_DEVTOOLS}")));
    view_menu.append_section(None, &dev_section);
    let view_btn = gtk4::MenuButton::builder()
        .label("View")
        .menu_model(&view_menu)
        .build();
    header.pack_start(&view_btn);

    window.set_titlebar(Some(&header));

    let entry = gtk4::Entry::builder()
        .placeholder_text("Look up a word")
        .hexpand(true)
        .build();

    let web = webkit6::WebView::new();
    web.set_vexpand(true);
    web.set_hexpand(true);

    let root = gtk4::Box::new(gtk4::Orientation::Vertical, 6);
    root.set_margin_top(6);
    root.set_margin_start(6);
    root.set_margin_end(6);
    root.append(&entry);
    root.append(&web);
    window.set_child(Some(&root));

    let view = LookupView {
        window: window.clone(),
        entry: entry.clone(),
        web,
        session,
        sources_menu,
        sources_file: Rc::new(sources_file),
    };

    install_actions(&view);
    view.rebuild_sources_menu();
    view.apply_zoom();

    entry.connect_activate(clone!(@strong view => move |_| {
        view.lookup();
    }));

    start_coordination(startup.cfg.endpoint(), &view);

    if let Some(word) = startup.word.as_deref() {
        view.show_word(word);
    }

    window.present();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_panel_is_a_quarter_wide_and_nearly_full_height() {
        assert_eq!(side_panel_size(1920, 1080), (480, 1026));
        assert_eq!(side_panel_size(2560, 1440), (640, 1368));
    }

    #[test]
    fn side_panel_without_geometry_uses_defaults() {
        assert_eq!(side_panel_size(0, 0), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
    }
}
