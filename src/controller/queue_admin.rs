use log::info;

use crate::api::QueueService;
use crate::api::models::QueueRef;
use crate::controller::{ListRegion, ResultState};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this queue?";
pub const NO_QUEUES_MARKER: &str = "No queues found";
pub const LOADING_MARKER: &str = "Please wait...";

/// The admin page's result regions, one per operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminSlot {
    Create,
    List,
    Lookup,
    Delete,
}

/// Rendering surface of the queue admin page.
#[allow(async_fn_in_trait)]
pub trait AdminView {
    fn show_result(&mut self, slot: AdminSlot, state: &ResultState);
    fn show_queues(&mut self, queues: &ListRegion<QueueRef>);
    /// Clear the input form belonging to `slot`.
    fn reset_form(&mut self, slot: AdminSlot);
    /// Ask the user to confirm a destructive action.
    async fn confirm(&mut self, prompt: &str) -> bool;
}

pub struct QueueAdmin<S> {
    service: S,
}

impl<S: QueueService> QueueAdmin<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Runs once when the page is shown.
    pub async fn init<V: AdminView>(&self, view: &mut V) {
        self.list(view).await;
    }

    pub async fn create<V: AdminView>(&self, view: &mut V, name: &str) {
        view.show_result(AdminSlot::Create, &ResultState::pending("Creating queue..."));
        match self.service.create_queue(name).await {
            Ok(resp) => {
                info!("created queue {name}");
                let text = format!(
                    "{} '{}' - Please wait a few seconds for the queue to appear in the list.",
                    resp.message, name
                );
                view.show_result(AdminSlot::Create, &ResultState::success(text));
                view.reset_form(AdminSlot::Create);
                self.list(view).await;
            }
            Err(e) => {
                view.show_result(AdminSlot::Create, &ResultState::failed(e.message_or("Failed to create queue")));
            }
        }
    }

    pub async fn list<V: AdminView>(&self, view: &mut V) {
        view.show_result(AdminSlot::List, &ResultState::pending("Loading queues..."));
        view.show_queues(&ListRegion::Loading(LOADING_MARKER));
        match self.service.list_queues().await {
            Ok(queues) => {
                let state = if queues.is_empty() {
                    ResultState::success("No queues available")
                } else {
                    ResultState::success(format!("Found {} queue(s)", queues.len()))
                };
                view.show_result(AdminSlot::List, &state);
                view.show_queues(&ListRegion::from_items(queues, NO_QUEUES_MARKER));
            }
            Err(e) => {
                view.show_result(AdminSlot::List, &ResultState::failed(e.message_or("Failed to list queues")));
                view.show_queues(&ListRegion::Blank);
            }
        }
    }

    pub async fn lookup<V: AdminView>(&self, view: &mut V, name: &str) {
        view.show_result(AdminSlot::Lookup, &ResultState::pending("Looking up queue..."));
        match self.service.queue_url(name).await {
            Ok(url) => view.show_result(AdminSlot::Lookup, &ResultState::success(format!("Queue URL: {url}"))),
            Err(e) => view.show_result(AdminSlot::Lookup, &ResultState::failed(e.message_or("Queue not found"))),
        }
    }

    pub async fn delete<V: AdminView>(&self, view: &mut V, queue_url: &str) {
        if !view.confirm(DELETE_PROMPT).await {
            return;
        }
        view.show_result(AdminSlot::Delete, &ResultState::pending("Deleting queue..."));
        let queue = QueueRef::from(queue_url);
        match self.service.delete_queue(&queue).await {
            Ok(text) => {
                info!("deleted queue {queue}");
                let text = format!("{text} - Please wait up to 60 seconds for the queue to disappear from the list.");
                view.show_result(AdminSlot::Delete, &ResultState::success(text));
                view.reset_form(AdminSlot::Delete);
                self.list(view).await;
            }
            Err(e) => {
                view.show_result(AdminSlot::Delete, &ResultState::failed(e.message_or("Failed to delete queue")));
            }
        }
    }
}
