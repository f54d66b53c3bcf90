use glib::clone;
use gtk4::prelude::*;

use std::cell::RefCell;
use std::rc::Rc;

use super::constants::{NEW_SOURCE_NAME, NEW_SOURCE_TEMPLATE};
use super::view::LookupView;

#[derive(Clone)]
struct SourceRow {
    row: gtk4::ListBoxRow,
    name: gtk4::Entry,
    template: gtk4::Entry,
}

type Rows = Rc<RefCell<Vec<SourceRow>>>;

fn append_row(list: &gtk4::ListBox, rows: &Rows, name: &str, template: &str) {
    let name_entry = gtk4::Entry::builder().text(name).width_chars(14).build();
    let template_entry = gtk4::Entry::builder().text(template).hexpand(true).build();

    let line = gtk4::Box::new(gtk4::Orientation::Horizontal, 6);
    line.set_margin_top(3);
    line.set_margin_bottom(3);
    line.append(&name_entry);
    line.append(&template_entry);

    let row = gtk4::ListBoxRow::new();
    row.set_child(Some(&line));
    list.append(&row);

    rows.borrow_mut().push(SourceRow {
        row,
        name: name_entry,
        template: template_entry,
    });
}

fn warn(parent: &gtk4::Window, text: &str) {
    let dlg = gtk4::MessageDialog::builder()
        .transient_for(parent)
        .modal(true)
        .message_type(gtk4::MessageType::Warning)
        .buttons(gtk4::ButtonsType::Ok)
        .text("Warning")
        .secondary_text(text)
        .build();
    dlg.connect_response(|d, _| d.close());
    dlg.present();
}

/// Modal editor for the source list.
///
/// "Save" validates the rows; a rejected edit keeps the dialog open and the
/// session untouched.
pub fn open_sources_dialog(view: &LookupView) {
    let dialog = gtk4::Window::builder()
        .title("Manage Sources")
        .transient_for(&view.window)
        .modal(true)
        .default_width(640)
        .default_height(360)
        .build();

    let list = gtk4::ListBox::new();
    list.set_selection_mode(gtk4::SelectionMode::Single);
    let rows: Rows = Rc::new(RefCell::new(Vec::new()));
    for s in view.session.borrow().sources().iter() {
        append_row(&list, &rows, &s.name, &s.template);
    }

    let scroll = gtk4::ScrolledWindow::builder()
        .vexpand(true)
        .hexpand(true)
        .child(&list)
        .build();

    let header = gtk4::Box::new(gtk4::Orientation::Horizontal, 6);
    let lbl_name = gtk4::Label::builder().label("Name").xalign(0.0).width_chars(14).build();
    let lbl_url = gtk4::Label::builder().label("URL Template").xalign(0.0).hexpand(true).build();
    header.append(&lbl_name);
    header.append(&lbl_url);

    let add_btn = gtk4::Button::with_label("Add");
    let delete_btn = gtk4::Button::with_label("Delete Selected");
    let save_btn = gtk4::Button::with_label("Save");
    let buttons = gtk4::Box::new(gtk4::Orientation::Horizontal, 8);
    buttons.set_halign(gtk4::Align::End);
    buttons.append(&add_btn);
    buttons.append(&delete_btn);
    buttons.append(&save_btn);

    let root = gtk4::Box::new(gtk4::Orientation::Vertical, 8);
    root.set_margin_top(12);
    root.set_margin_bottom(12);
    root.set_margin_start(12);
    root.set_margin_end(12);
    root.append(&header);
    root.append(&scroll);
    root.append(&buttons);
    dialog.set_child(Some(&root));

    add_btn.connect_clicked(clone!(@weak list, @strong rows => move |_| {
        append_row(&list, &rows, NEW_SOURCE_NAME, NEW_SOURCE_TEMPLATE);
    }));

    delete_btn.connect_clicked(clone!(@weak list, @strong rows => move |_| {
        let Some(selected) = list.selected_row() else { return; };
        rows.borrow_mut().retain(|r| r.row != selected);
        list.remove(&selected);
    }));

    save_btn.connect_clicked(clone!(@weak dialog, @strong rows, @strong view => move |_| {
        let edited: Vec<(String, String)> = rows
            .borrow()
            .iter()
            .map(|r| (r.name.text().to_string(), r.template.text().to_string()))
            .collect();

        let result = view.session.borrow_mut().apply_edit(edited);
        if let Err(e) = result {
            warn(&dialog, &e.to_string());
            return;
        }

        view.rebuild_sources_menu();
        view.persist_sources();
        view.lookup();
        dialog.close();
    }));

    dialog.present();
}
