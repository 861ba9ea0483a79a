pub mod admin_page;
pub mod connect;
pub mod main_window;
pub mod messages_page;
pub mod queue_list;
pub mod service;

use gtk4 as gtk;
use gtk4::prelude::*;

use crate::controller::{ResultState, Status};

/// Drive a controller action on the GTK main loop.
pub fn spawn_local<F>(fut: F)
where
    F: std::future::Future<Output = ()> + 'static,
{
    glib::MainContext::default().spawn_local(fut);
}

/// Paint a result region. Error and success use distinct styles; pending is dimmed.
pub fn render_result(label: &gtk::Label, state: &ResultState) {
    for class in ["error", "success", "dim-label"] {
        label.remove_css_class(class);
    }
    match state.status {
        Status::Idle => {}
        Status::Pending => label.add_css_class("dim-label"),
        Status::Success => label.add_css_class("success"),
        Status::Failed => label.add_css_class("error"),
    }
    label.set_label(&state.message);
}

pub fn result_label() -> gtk::Label {
    let label = gtk::Label::new(None);
    label.set_halign(gtk::Align::Start);
    label.set_wrap(true);
    label.set_selectable(true);
    label
}

pub fn section_title(text: &str) -> gtk::Label {
    let title = gtk::Label::new(Some(text));
    title.add_css_class("heading");
    title.set_halign(gtk::Align::Start);
    title
}
