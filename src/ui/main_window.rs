use std::rc::Rc;

use adw::prelude::*;
use adw::Application;
use gtk4 as gtk;

use crate::api::client::ApiClient;
use crate::app::AppState;
use crate::controller::message_flow::MessageFlow;
use crate::controller::queue_admin::QueueAdmin;
use crate::ui::admin_page::AdminPage;
use crate::ui::messages_page::MessagesPage;
use crate::ui::service::RuntimeService;
use crate::ui::spawn_local;

pub fn show_main_window(app: &Application, state: AppState) {
    let client = match ApiClient::from_state(&state) {
        Ok(client) => client,
        Err(e) => {
            log::warn!("stored server url is unusable: {e}");
            crate::ui::connect::show_connect_window(app);
            return;
        }
    };

    let window = adw::ApplicationWindow::builder()
        .application(app)
        .title("SQS Console")
        .default_width(960)
        .default_height(720)
        .build();

    let overlay = adw::ToastOverlay::new();
    let notebook = gtk::Notebook::new();
    overlay.set_child(Some(&notebook));

    let service = RuntimeService::new(client);
    let admin = Rc::new(QueueAdmin::new(service.clone()));
    let flow = Rc::new(MessageFlow::new(service));

    let admin_page = AdminPage::new();
    admin_page.bind(admin.clone());
    notebook.append_page(&admin_page.widget(), Some(&gtk::Label::new(Some("Queues"))));

    let messages_page = MessagesPage::new(&overlay);
    messages_page.bind(flow.clone());
    notebook.append_page(&messages_page.widget(), Some(&gtk::Label::new(Some("Messages"))));

    let container = gtk::Box::new(gtk::Orientation::Vertical, 0);
    let header = adw::HeaderBar::new();
    let title = gtk::Label::new(Some(&format!("SQS Console · {}", state.base_url)));
    header.set_title_widget(Some(&title));

    let server_btn = gtk::Button::with_label("Change Server");
    header.pack_end(&server_btn);
    {
        let (app, window) = (app.clone(), window.clone());
        server_btn.connect_clicked(move |_| {
            crate::ui::connect::show_connect_window(&app);
            window.close();
        });
    }

    container.append(&header);
    container.append(&overlay);
    window.set_content(Some(&container));
    window.present();

    let mut admin_view = admin_page.clone();
    spawn_local(async move { admin.init(&mut admin_view).await });
    let mut flow_view = messages_page.clone();
    spawn_local(async move { flow.init(&mut flow_view).await });
}
