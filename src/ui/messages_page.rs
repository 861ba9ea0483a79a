use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;

use crate::api::QueueService;
use crate::api::models::{QueueRef, ReceiptHandle, ReceivedMessage};
use crate::controller::message_flow::{FlowView, GiftCardForm, MessageFlow, Selection};
use crate::controller::{ListRegion, ResultState};
use crate::ui::queue_list::QueueList;
use crate::ui::{render_result, result_label, section_title, spawn_local};

type DeleteHandler = Rc<RefCell<Option<Rc<dyn Fn(Selection, ReceiptHandle)>>>>;

/// Producer/consumer page for gift card messages.
#[derive(Clone)]
pub struct MessagesPage {
    root: gtk::Box,
    overlay: adw::ToastOverlay,
    queues: QueueList,
    selected: gtk::Label,
    user_name: gtk::Entry,
    card_type: gtk::Entry,
    amount: gtk::Entry,
    date: gtk::Entry,
    send: gtk::Button,
    producer_result: gtk::Label,
    poll: gtk::Button,
    consumer_result: gtk::Label,
    messages: gtk::Box,
    on_delete: DeleteHandler,
}

fn labeled_entry(form: &gtk::Grid, row: i32, label: &str, placeholder: &str) -> gtk::Entry {
    let lbl = gtk::Label::new(Some(label));
    lbl.set_halign(gtk::Align::Start);
    let entry = gtk::Entry::new();
    entry.set_hexpand(true);
    entry.set_placeholder_text(Some(placeholder));
    form.attach(&lbl, 0, row, 1, 1);
    form.attach(&entry, 1, row, 1, 1);
    entry
}

impl MessagesPage {
    pub fn new(overlay: &adw::ToastOverlay) -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 8);
        root.set_margin_top(12);
        root.set_margin_bottom(12);
        root.set_margin_start(12);
        root.set_margin_end(12);

        let queues = QueueList::new("Select Queue");
        root.append(&queues.widget());
        let selected = gtk::Label::new(Some("No queue selected"));
        selected.add_css_class("dim-label");
        selected.set_halign(gtk::Align::Start);
        selected.set_wrap(true);
        root.append(&selected);

        // Producer
        root.append(&section_title("Send Gift Card"));
        let form = gtk::Grid::new();
        form.set_row_spacing(6);
        form.set_column_spacing(12);
        let user_name = labeled_entry(&form, 0, "User", "User name");
        let card_type = labeled_entry(&form, 1, "Gift card", "Gift card type");
        let amount = labeled_entry(&form, 2, "Amount", "0.00");
        amount.set_input_purpose(gtk::InputPurpose::Number);
        let date = labeled_entry(&form, 3, "Date", "YYYY-MM-DD");
        root.append(&form);
        let send = gtk::Button::with_label("Send Message");
        send.add_css_class("suggested-action");
        send.set_halign(gtk::Align::End);
        root.append(&send);
        let producer_result = result_label();
        root.append(&producer_result);

        // Consumer
        let header = gtk::Box::new(gtk::Orientation::Horizontal, 6);
        header.append(&section_title("Receive Messages"));
        let poll = gtk::Button::with_label("Poll Messages");
        poll.set_halign(gtk::Align::End);
        poll.set_hexpand(true);
        header.append(&poll);
        root.append(&header);
        let consumer_result = result_label();
        root.append(&consumer_result);
        let messages = gtk::Box::new(gtk::Orientation::Vertical, 6);
        root.append(&messages);

        Self {
            root,
            overlay: overlay.clone(),
            queues,
            selected,
            user_name,
            card_type,
            amount,
            date,
            send,
            producer_result,
            poll,
            consumer_result,
            messages,
            on_delete: Rc::default(),
        }
    }

    pub fn widget(&self) -> gtk::Widget {
        let scroller = gtk::ScrolledWindow::builder().vexpand(true).hexpand(true).build();
        scroller.set_child(Some(&self.root));
        scroller.upcast()
    }

    fn form(&self) -> GiftCardForm {
        GiftCardForm {
            user_name: self.user_name.text().to_string(),
            gift_card_type: self.card_type.text().to_string(),
            amount: self.amount.text().to_string(),
            date: self.date.text().to_string(),
        }
    }

    /// Wire every control of this page to `flow`. The selection lives here,
    /// owned by the binding, and is snapshotted for each action. Deletes use
    /// the selection bound into the clicked card instead.
    pub fn bind<S: QueueService + 'static>(&self, flow: Rc<MessageFlow<S>>) {
        let selection: Rc<RefCell<Selection>> = Rc::default();
        {
            let (page, flow, selection) = (self.clone(), flow.clone(), selection.clone());
            self.queues.connect_selected(move |queue| {
                let mut page = page.clone();
                flow.select(&mut selection.borrow_mut(), queue, &mut page);
            });
        }
        {
            let (page, flow, selection) = (self.clone(), flow.clone(), selection.clone());
            self.send.connect_clicked(move |_| {
                let (mut page, flow) = (page.clone(), flow.clone());
                let (snapshot, form) = (selection.borrow().clone(), page.form());
                spawn_local(async move { flow.send(&snapshot, &form, &mut page).await });
            });
        }
        {
            let (page, flow, selection) = (self.clone(), flow.clone(), selection.clone());
            self.poll.connect_clicked(move |_| {
                let (mut page, flow) = (page.clone(), flow.clone());
                let snapshot = selection.borrow().clone();
                spawn_local(async move { flow.poll(&snapshot, &mut page).await });
            });
        }
        let page = self.clone();
        let handler: Rc<dyn Fn(Selection, ReceiptHandle)> = Rc::new(move |polled, receipt| {
            let (mut page, flow) = (page.clone(), flow.clone());
            spawn_local(async move { flow.delete_message(&polled, &receipt, &mut page).await });
        });
        *self.on_delete.borrow_mut() = Some(handler);
    }

    fn message_card(&self, polled: &Selection, msg: &ReceivedMessage) -> gtk::Widget {
        let card = gtk::Box::new(gtk::Orientation::Vertical, 4);
        card.add_css_class("card");
        card.set_margin_top(4);
        card.set_margin_bottom(4);
        let gc = &msg.gift_card;
        let amount = gc.amount.map(|a| format!("${a}")).unwrap_or_else(|| "-".into());
        for (key, value) in [
            ("User", gc.user_name.as_str()),
            ("Gift Card", gc.gift_card_type.as_str()),
            ("Amount", amount.as_str()),
            ("Date", gc.date.as_str()),
            ("Message ID", msg.message_id.as_str()),
        ] {
            let lbl = gtk::Label::new(None);
            lbl.set_markup(&format!("<b>{}:</b> {}", key, glib::markup_escape_text(value)));
            lbl.set_halign(gtk::Align::Start);
            lbl.set_margin_start(8);
            card.append(&lbl);
        }
        let delete = gtk::Button::with_label("Delete Message");
        delete.add_css_class("destructive-action");
        delete.set_halign(gtk::Align::End);
        delete.set_margin_end(8);
        delete.set_margin_bottom(8);
        let (polled, receipt, handler) = (polled.clone(), msg.receipt_handle.clone(), self.on_delete.clone());
        delete.connect_clicked(move |_| {
            let current = handler.borrow().clone();
            if let Some(f) = current {
                (f)(polled.clone(), receipt.clone());
            }
        });
        card.append(&delete);
        card.upcast()
    }
}

impl FlowView for MessagesPage {
    fn show_queue_choices(&mut self, queues: &ListRegion<QueueRef>) {
        self.queues.set_region(queues);
    }

    fn show_selection(&mut self, selected: Option<&QueueRef>) {
        match selected {
            Some(queue) => self.selected.set_label(&format!("Selected: {queue}")),
            None => self.selected.set_label("No queue selected"),
        }
    }

    fn show_producer_result(&mut self, state: &ResultState) {
        render_result(&self.producer_result, state);
    }

    fn show_consumer_result(&mut self, state: &ResultState) {
        render_result(&self.consumer_result, state);
    }

    fn show_messages(&mut self, polled: &Selection, messages: &ListRegion<ReceivedMessage>) {
        while let Some(child) = self.messages.first_child() {
            self.messages.remove(&child);
        }
        match messages {
            ListRegion::Items(items) => {
                for msg in items {
                    self.messages.append(&self.message_card(polled, msg));
                }
            }
            ListRegion::Loading(marker) | ListRegion::Empty(marker) => {
                let lbl = gtk::Label::new(Some(*marker));
                lbl.add_css_class("dim-label");
                self.messages.append(&lbl);
            }
            ListRegion::Failed(message) => {
                let lbl = gtk::Label::new(Some(message.as_str()));
                lbl.add_css_class("error");
                self.messages.append(&lbl);
            }
            ListRegion::Blank => {}
        }
    }

    fn reset_producer_form(&mut self) {
        for entry in [&self.user_name, &self.card_type, &self.amount, &self.date] {
            entry.set_text("");
        }
    }

    fn set_date(&mut self, date: &str) {
        self.date.set_text(date);
    }

    fn notify(&mut self, text: &str) {
        self.overlay.add_toast(adw::Toast::new(text));
    }
}
