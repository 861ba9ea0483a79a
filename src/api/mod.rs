pub mod client;
pub mod error;
pub mod models;

use crate::api::error::RequestError;
use crate::api::models::{
    CreateQueueResponse, GiftCard, QueueRef, ReceiptHandle, ReceivedMessage, SendMessageResponse,
};

/// The backend capabilities the page controllers rely on.
///
/// Implemented by [`client::ApiClient`]; the GTK shell wraps it to run calls
/// on the tokio runtime, and tests substitute a scripted fake.
#[allow(async_fn_in_trait)]
pub trait QueueService {
    async fn create_queue(&self, name: &str) -> Result<CreateQueueResponse, RequestError>;
    async fn list_queues(&self) -> Result<Vec<QueueRef>, RequestError>;
    async fn queue_url(&self, name: &str) -> Result<QueueRef, RequestError>;
    async fn delete_queue(&self, queue: &QueueRef) -> Result<String, RequestError>;
    async fn send_message(&self, queue: &QueueRef, card: &GiftCard) -> Result<SendMessageResponse, RequestError>;
    async fn receive_messages(&self, queue: &QueueRef, max_messages: u32) -> Result<Vec<ReceivedMessage>, RequestError>;
    async fn delete_message(&self, queue: &QueueRef, receipt: &ReceiptHandle) -> Result<String, RequestError>;
}
