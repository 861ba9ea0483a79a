use std::rc::Rc;

use adw::prelude::*;
use adw::Application;
use gtk4 as gtk;
use log::{info, warn};

use crate::api::client::ApiClient;
use crate::app::AppState;
use crate::ui::spawn_local;
use crate::utils::run_on_runtime;

/// Ask for the backend's address, check it answers a queue listing and
/// persist it before opening the main window.
pub fn show_connect_window(app: &Application) {
    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("Connect to Queue Backend")
        .default_width(420)
        .default_height(220)
        .resizable(false)
        .build();

    let toast_overlay = adw::ToastOverlay::new();

    let root = gtk::Box::new(gtk::Orientation::Vertical, 12);
    root.set_margin_top(24);
    root.set_margin_bottom(24);
    root.set_margin_start(24);
    root.set_margin_end(24);

    let title = gtk::Label::new(Some("Connect to the queue backend"));
    title.add_css_class("title-2");
    title.set_halign(gtk::Align::Start);
    root.append(&title);

    let server_entry = gtk::Entry::new();
    server_entry.set_placeholder_text(Some("Server URL (e.g. http://localhost:8080)"));
    server_entry.set_hexpand(true);
    let previous = AppState::load();
    server_entry.set_text(&previous.base_url);
    root.append(&server_entry);

    let status = gtk::Label::new(None);
    status.add_css_class("dim-label");
    status.set_halign(gtk::Align::Start);
    root.append(&status);

    let connect_btn = gtk::Button::with_label("Connect");
    connect_btn.add_css_class("suggested-action");
    connect_btn.set_halign(gtk::Align::End);
    root.append(&connect_btn);

    toast_overlay.set_child(Some(&root));
    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    header.set_title_widget(Some(&gtk::Label::new(Some("SQS Console"))));
    container.append(&header);
    container.append(&toast_overlay);
    window.set_content(Some(&container));

    let on_connect = {
        let app = app.clone();
        let window = window.clone();
        let overlay = toast_overlay.clone();
        let server_entry = server_entry.clone();
        move || {
            let input = server_entry.text();
            if input.trim().is_empty() {
                overlay.add_toast(adw::Toast::new("Please enter the server URL."));
                return;
            }
            let mut state = previous.clone();
            state.base_url = crate::utils::normalize_url(&input);
            let client = match ApiClient::from_state(&state) {
                Ok(client) => client,
                Err(e) => {
                    overlay.add_toast(adw::Toast::new(&e.to_string()));
                    return;
                }
            };

            status.set_label("Connecting…");
            let (app, window, overlay, status) = (app.clone(), window.clone(), overlay.clone(), status.clone());
            spawn_local(async move {
                let checked = run_on_runtime(async move { client.list_queues().await }).await;
                match checked {
                    Ok(Ok(queues)) => {
                        info!("connected to {} ({} queues)", state.base_url, queues.len());
                        if let Err(e) = state.save() {
                            overlay.add_toast(adw::Toast::new(&format!("Failed to save settings: {}", e)));
                        }
                        crate::ui::main_window::show_main_window(&app, state);
                        window.close();
                    }
                    Ok(Err(e)) => {
                        warn!("connection check failed: {e}");
                        status.set_label("Connection failed");
                        overlay.add_toast(adw::Toast::new(&e.message_or("Could not reach the queue backend.")));
                    }
                    Err(e) => {
                        warn!("connection check aborted: {e}");
                        status.set_label("Connection failed");
                    }
                }
            });
        }
    };

    let on_connect: Rc<dyn Fn()> = Rc::new(on_connect);
    {
        let on_connect = on_connect.clone();
        connect_btn.connect_clicked(move |_| (on_connect)());
    }
    {
        let on_connect = on_connect.clone();
        server_entry.connect_activate(move |_| (on_connect)());
    }

    window.present();
}
