use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;

use crate::api::models::QueueRef;
use crate::controller::ListRegion;

/// List of queue URLs, optionally clickable.
#[derive(Clone)]
pub struct QueueList {
    root: gtk::Box,
    list: gtk::ListBox,
    items: Rc<RefCell<Vec<QueueRef>>>,
}

impl QueueList {
    pub fn new(title: &str) -> Self {
        let root = gtk::Box::new(gtk::Orientation::Vertical, 6);
        if !title.is_empty() {
            root.append(&crate::ui::section_title(title));
        }

        let list = gtk::ListBox::new();
        list.add_css_class("boxed-list");
        list.set_selection_mode(gtk::SelectionMode::Single);
        root.append(&list);

        Self { root, list, items: Rc::default() }
    }

    pub fn widget(&self) -> gtk::Widget {
        self.root.clone().upcast()
    }

    /// Call `f` with the queue behind a clicked row. Marker rows are ignored.
    pub fn connect_selected<F: Fn(QueueRef) + 'static>(&self, f: F) {
        let items = self.items.clone();
        self.list.connect_row_activated(move |_, row| {
            let picked = usize::try_from(row.index())
                .ok()
                .and_then(|idx| items.borrow().get(idx).cloned());
            if let Some(queue) = picked {
                f(queue);
            }
        });
    }

    pub fn set_region(&self, region: &ListRegion<QueueRef>) {
        while let Some(child) = self.list.first_child() {
            self.list.remove(&child);
        }
        *self.items.borrow_mut() = region.items().to_vec();
        match region {
            ListRegion::Blank => {}
            ListRegion::Loading(marker) | ListRegion::Empty(marker) => self.append_marker(marker, "dim-label"),
            ListRegion::Failed(message) => self.append_marker(message, "error"),
            ListRegion::Items(queues) => {
                for queue in queues {
                    let label = gtk::Label::new(Some(queue.as_str()));
                    label.set_margin_top(8);
                    label.set_margin_bottom(8);
                    label.set_margin_start(8);
                    label.set_margin_end(8);
                    label.set_halign(gtk::Align::Start);
                    let row = gtk::ListBoxRow::new();
                    row.set_child(Some(&label));
                    self.list.append(&row);
                }
            }
        }
    }

    fn append_marker(&self, text: &str, class: &str) {
        let label = gtk::Label::new(Some(text));
        label.add_css_class(class);
        label.set_margin_top(8);
        label.set_margin_bottom(8);
        let row = gtk::ListBoxRow::new();
        row.set_activatable(false);
        row.set_selectable(false);
        row.set_child(Some(&label));
        self.list.append(&row);
    }
}
