use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;

use crate::api::QueueService;
use crate::api::models::QueueRef;
use crate::controller::queue_admin::{AdminSlot, AdminView, QueueAdmin};
use crate::controller::{ListRegion, ResultState};
use crate::ui::queue_list::QueueList;
use crate::ui::{render_result, result_label, section_title, spawn_local};

/// One form row: entry, action button and the result region below them.
#[derive(Clone)]
struct FormRow {
    entry: gtk::Entry,
    button: gtk::Button,
    result: gtk::Label,
}

impl FormRow {
    fn new(root: &gtk::Box, title: &str, placeholder: &str, action: &str) -> Self {
        root.append(&section_title(title));
        let row = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        let entry = gtk::Entry::new();
        entry.set_hexpand(true);
        entry.set_placeholder_text(Some(placeholder));
        let button = gtk::Button::with_label(action);
        row.append(&entry);
        row.append(&button);
        root.append(&row);
        let result = result_label();
        root.append(&result);
        Self { entry, button, result }
    }

    fn text(&self) -> String {
        self.entry.text().to_string()
    }
}

/// Queue administration page: create, list, look up and delete queues.
#[derive(Clone)]
pub struct AdminPage {
    root: gtk::Box,
    create: FormRow,
    lookup: FormRow,
    delete: FormRow,
    refresh: gtk::Button,
    list_result: gtk::Label,
    queues: QueueList,
}

impl AdminPage {
    pub fn new() -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 8);
        root.set_margin_top(12);
        root.set_margin_bottom(12);
        root.set_margin_start(12);
        root.set_margin_end(12);

        let create = FormRow::new(&root, "Create Queue", "Queue name", "Create");
        create.button.add_css_class("suggested-action");
        let lookup = FormRow::new(&root, "Get Queue URL", "Queue name", "Get URL");
        let delete = FormRow::new(&root, "Delete Queue", "Queue URL", "Delete");
        delete.button.add_css_class("destructive-action");

        let header = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        let refresh = gtk::Button::with_label("Refresh");
        refresh.set_halign(gtk::Align::End);
        refresh.set_hexpand(true);
        header.append(&section_title("Queues"));
        header.append(&refresh);
        root.append(&header);
        let list_result = result_label();
        root.append(&list_result);
        let queues = QueueList::new("");
        root.append(&queues.widget());

        Self { root, create, lookup, delete, refresh, list_result, queues }
    }

    pub fn widget(&self) -> gtk::Widget {
        let scroller = gtk::ScrolledWindow::builder().vexpand(true).hexpand(true).build();
        scroller.set_child(Some(&self.root));
        scroller.upcast()
    }

    /// Wire every control of this page to `admin`.
    pub fn bind<S: QueueService + 'static>(&self, admin: Rc<QueueAdmin<S>>) {
        {
            let (page, admin) = (self.clone(), admin.clone());
            let on_create: Rc<dyn Fn()> = Rc::new(move || {
                let (mut page, admin) = (page.clone(), admin.clone());
                let name = page.create.text();
                spawn_local(async move { admin.create(&mut page, &name).await });
            });
            let cb = on_create.clone();
            self.create.button.connect_clicked(move |_| (cb)());
            self.create.entry.connect_activate(move |_| (on_create)());
        }
        {
            let (page, admin) = (self.clone(), admin.clone());
            self.lookup.button.connect_clicked(move |_| {
                let (mut page, admin) = (page.clone(), admin.clone());
                let name = page.lookup.text();
                spawn_local(async move { admin.lookup(&mut page, &name).await });
            });
        }
        {
            let (page, admin) = (self.clone(), admin.clone());
            self.delete.button.connect_clicked(move |_| {
                let (mut page, admin) = (page.clone(), admin.clone());
                let url = page.delete.text();
                spawn_local(async move { admin.delete(&mut page, &url).await });
            });
        }
        {
            let (page, admin) = (self.clone(), admin.clone());
            self.refresh.connect_clicked(move |_| {
                let (mut page, admin) = (page.clone(), admin.clone());
                spawn_local(async move { admin.list(&mut page).await });
            });
        }
        // Clicking a listed queue prepares it for deletion.
        let delete_entry = self.delete.entry.clone();
        self.queues.connect_selected(move |queue| delete_entry.set_text(queue.as_str()));
    }

    fn row(&self, slot: AdminSlot) -> Option<&FormRow> {
        match slot {
            AdminSlot::Create => Some(&self.create),
            AdminSlot::Lookup => Some(&self.lookup),
            AdminSlot::Delete => Some(&self.delete),
            AdminSlot::List => None,
        }
    }
}

impl AdminView for AdminPage {
    fn show_result(&mut self, slot: AdminSlot, state: &ResultState) {
        match self.row(slot) {
            Some(row) => render_result(&row.result, state),
            None => render_result(&self.list_result, state),
        }
    }

    fn show_queues(&mut self, queues: &ListRegion<QueueRef>) {
        self.queues.set_region(queues);
    }

    fn reset_form(&mut self, slot: AdminSlot) {
        if let Some(row) = self.row(slot) {
            row.entry.set_text("");
        }
    }

    async fn confirm(&mut self, prompt: &str) -> bool {
        let dialog = gtk::MessageDialog::builder()
            .modal(true)
            .message_type(gtk::MessageType::Question)
            .buttons(gtk::ButtonsType::YesNo)
            .text(prompt)
            .build();
        if let Some(window) = self.root.root().and_downcast::<gtk::Window>() {
            dialog.set_transient_for(Some(&window));
        }
        let response = dialog.run_future().await;
        dialog.close();
        response == gtk::ResponseType::Yes
    }
}
