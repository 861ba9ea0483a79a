use crate::api::QueueService;
use crate::api::client::ApiClient;
use crate::api::error::RequestError;
use crate::api::models::{
    CreateQueueResponse, GiftCard, QueueRef, ReceiptHandle, ReceivedMessage, SendMessageResponse,
};
use crate::utils::run_on_runtime;

/// [`ApiClient`] whose calls run on the shared tokio runtime, so controller
/// futures can be polled by the GLib main context.
#[derive(Clone)]
pub struct RuntimeService {
    client: ApiClient,
}

impl RuntimeService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

async fn hop<T, Fut>(fut: Fut) -> Result<T, RequestError>
where
    T: Send + 'static,
    Fut: std::future::Future<Output = Result<T, RequestError>> + Send + 'static,
{
    match run_on_runtime(fut).await {
        Ok(res) => res,
        Err(e) => Err(RequestError::Transport(e)),
    }
}

impl QueueService for RuntimeService {
    async fn create_queue(&self, name: &str) -> Result<CreateQueueResponse, RequestError> {
        let (client, name) = (self.client.clone(), name.to_string());
        hop(async move { client.create_queue(&name).await }).await
    }

    async fn list_queues(&self) -> Result<Vec<QueueRef>, RequestError> {
        let client = self.client.clone();
        hop(async move { client.list_queues().await }).await
    }

    async fn queue_url(&self, name: &str) -> Result<QueueRef, RequestError> {
        let (client, name) = (self.client.clone(), name.to_string());
        hop(async move { client.queue_url(&name).await }).await
    }

    async fn delete_queue(&self, queue: &QueueRef) -> Result<String, RequestError> {
        let (client, queue) = (self.client.clone(), queue.clone());
        hop(async move { client.delete_queue(&queue).await }).await
    }

    async fn send_message(&self, queue: &QueueRef, card: &GiftCard) -> Result<SendMessageResponse, RequestError> {
        let (client, queue, card) = (self.client.clone(), queue.clone(), card.clone());
        hop(async move { client.send_message(&queue, &card).await }).await
    }

    async fn receive_messages(&self, queue: &QueueRef, max_messages: u32) -> Result<Vec<ReceivedMessage>, RequestError> {
        let (client, queue) = (self.client.clone(), queue.clone());
        hop(async move { client.receive_messages(&queue, max_messages).await }).await
    }

    async fn delete_message(&self, queue: &QueueRef, receipt: &ReceiptHandle) -> Result<String, RequestError> {
        let (client, queue, receipt) = (self.client.clone(), queue.clone(), receipt.clone());
        hop(async move { client.delete_message(&queue, &receipt).await }).await
    }
}
