use glib::clone;
use gtk4::gio;
use gtk4::prelude::*;
use webkit6::prelude::*;

use std::cell::Cell;
use std::rc::Rc;

use super::constants::{
    ACTION_DEVTOOLS, ACTION_MANAGE_SOURCES, ACTION_SOURCE, ACTION_ZOOM_IN, ACTION_ZOOM_OUT,
    ACTION_ZOOM_RESET,
};
use super::sources_dialog::open_sources_dialog;
use super::view::LookupView;

pub fn install_actions(view: &LookupView) {
    let active = view.session.borrow().active().to_string();
    let source = gio::SimpleAction::new_stateful(
        ACTION_SOURCE,
        Some(glib::VariantTy::STRING),
        &active.to_variant(),
    );
    source.connect_activate(clone!(@strong view => move |action, param| {
        let Some(name) = param.and_then(|p| p.get::<String>()) else { return; };
        view.select_source(&name);
        action.set_state(&view.session.borrow().active().to_variant());
    }));
    view.window.add_action(&source);

    let manage = gio::SimpleAction::new(ACTION_MANAGE_SOURCES, None);
    manage.connect_activate(clone!(@strong view => move |_, _| {
        open_sources_dialog(&view);
    }));
    view.window.add_action(&manage);

    let zoom_in = gio::SimpleAction::new(ACTION_ZOOM_IN, None);
    zoom_in.connect_activate(clone!(@strong view => move |_, _| {
        view.session.borrow_mut().zoom_in();
        view.apply_zoom();
    }));
    view.window.add_action(&zoom_in);

    let zoom_out = gio::SimpleAction::new(ACTION_ZOOM_OUT, None);
    zoom_out.connect_activate(clone!(@strong view => move |_, _| {
        view.session.borrow_mut().zoom_out();
        view.apply_zoom();
    }));
    view.window.add_action(&zoom_out);

    let zoom_reset = gio::SimpleAction::new(ACTION_ZOOM_RESET, None);
    zoom_reset.connect_activate(clone!(@strong view => move |_, _| {
        view.session.borrow_mut().zoom_reset();
        view.apply_zoom();
    }));
    view.window.add_action(&zoom_reset);

    install_devtools_action(view);
}

fn install_devtools_action(view: &LookupView) {
    if let Some(settings) = WebViewExt::settings(&view.web) {
        settings.set_enable_developer_extras(true);
    }

    // The inspector can also be closed from its own window; track that too.
    let open = Rc::new(Cell::new(false));
    if let Some(inspector) = view.web.inspector() {
        inspector.connect_closed(clone!(@strong open => move |_| {
            open.set(false);
        }));
    }

    let devtools = gio::SimpleAction::new(ACTION_DEVTOOLS, None);
    devtools.connect_activate(clone!(@strong view, @strong open => move |_, _| {
        let Some(inspector) = view.web.inspector() else {
            log::warn!("web inspector unavailable");
            return;
        };
        if open.get() {
            inspector.close();
            open.set(false);
        } else {
            inspector.show();
            open.set(true);
        }
    }));
    view.window.add_action(&devtools);
}
