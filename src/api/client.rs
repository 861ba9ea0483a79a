use std::time::Duration;

use log::{debug, warn};
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::QueueService;
use crate::api::error::RequestError;
use crate::api::models::{
    CreateQueueResponse, GiftCard, QueueRef, QueueUrlResponse, ReceiptHandle, ReceivedMessage,
    SendMessageRequest, SendMessageResponse,
};
use crate::app::AppState;

const API_PREFIX: &str = "api/sqs/";

/// HTTP client for the queue backend's `/api/sqs` surface.
///
/// One request per call, no caching, no retries. Cloning is cheap and shares
/// the connection pool.
#[derive(Clone, Debug)]
pub struct ApiClient {
    pub http: HttpClient,
    base: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, RequestError> {
        Self::with_http(base_url, HttpClient::new())
    }

    /// Build a client from persisted settings, honouring the optional timeout.
    pub fn from_state(state: &AppState) -> Result<Self, RequestError> {
        let mut builder = HttpClient::builder();
        if let Some(secs) = state.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build()?;
        Self::with_http(&state.base_url, http)
    }

    pub fn with_http(base_url: &str, http: HttpClient) -> Result<Self, RequestError> {
        let base = Self::base_api(base_url)?;
        Ok(Self { http, base })
    }

    /// Resolve `<origin>/api/sqs/`, tolerating a base url that already
    /// carries the prefix.
    fn base_api(base_url: &str) -> Result<Url, RequestError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let root = if trimmed.ends_with("/api/sqs") {
            format!("{}/", trimmed)
        } else {
            format!("{}/{}", trimmed, API_PREFIX)
        };
        Ok(Url::parse(&root)?)
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Endpoint URL with percent-encoded query parameters.
    pub fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, RequestError> {
        let mut url = self.base.join(path)?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    async fn send(req: RequestBuilder) -> Result<Response, RequestError> {
        let resp = req.send().await.map_err(|e| {
            warn!("request failed before a response arrived: {e}");
            RequestError::from(e)
        })?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("backend answered HTTP {status}");
            return Err(RequestError::status(status, body));
        }
        Ok(resp)
    }

    async fn json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, RequestError> {
        let resp = Self::send(req).await?;
        resp.json::<T>().await.map_err(|e| RequestError::Decode(e.to_string()))
    }

    async fn text(req: RequestBuilder) -> Result<String, RequestError> {
        let resp = Self::send(req).await?;
        Ok(resp.text().await?)
    }

    pub async fn create_queue(&self, name: &str) -> Result<CreateQueueResponse, RequestError> {
        let url = self.endpoint("create-queue", &[("queueName", name)])?;
        debug!("POST {url}");
        Self::json(self.http.post(url)).await
    }

    /// Queue URLs in the order the backend returned them.
    pub async fn list_queues(&self) -> Result<Vec<QueueRef>, RequestError> {
        let url = self.endpoint("list-queues", &[])?;
        debug!("GET {url}");
        Self::json(self.http.get(url)).await
    }

    pub async fn queue_url(&self, name: &str) -> Result<QueueRef, RequestError> {
        let url = self.endpoint("queue-url", &[("queueName", name)])?;
        debug!("GET {url}");
        let resp: QueueUrlResponse = Self::json(self.http.get(url)).await?;
        Ok(resp.queue_url)
    }

    pub async fn delete_queue(&self, queue: &QueueRef) -> Result<String, RequestError> {
        let url = self.endpoint("delete-queue", &[("queueUrl", queue.as_str())])?;
        debug!("DELETE {url}");
        Self::text(self.http.delete(url)).await
    }

    pub async fn send_message(&self, queue: &QueueRef, card: &GiftCard) -> Result<SendMessageResponse, RequestError> {
        let url = self.endpoint("send-message", &[])?;
        debug!("POST {url}");
        let body = SendMessageRequest { queue_url: queue, gift_card: card };
        Self::json(self.http.post(url).json(&body)).await
    }

    pub async fn receive_messages(&self, queue: &QueueRef, max_messages: u32) -> Result<Vec<ReceivedMessage>, RequestError> {
        let max = max_messages.to_string();
        let url = self.endpoint("receive-messages", &[("queueUrl", queue.as_str()), ("maxMessages", &max)])?;
        debug!("GET {url}");
        Self::json(self.http.get(url)).await
    }

    pub async fn delete_message(&self, queue: &QueueRef, receipt: &ReceiptHandle) -> Result<String, RequestError> {
        let url = self.endpoint(
            "delete-message",
            &[("queueUrl", queue.as_str()), ("receiptHandle", receipt.as_str())],
        )?;
        debug!("DELETE {url}");
        Self::text(self.http.delete(url)).await
    }
}

impl QueueService for ApiClient {
    async fn create_queue(&self, name: &str) -> Result<CreateQueueResponse, RequestError> {
        ApiClient::create_queue(self, name).await
    }

    async fn list_queues(&self) -> Result<Vec<QueueRef>, RequestError> {
        ApiClient::list_queues(self).await
    }

    async fn queue_url(&self, name: &str) -> Result<QueueRef, RequestError> {
        ApiClient::queue_url(self, name).await
    }

    async fn delete_queue(&self, queue: &QueueRef) -> Result<String, RequestError> {
        ApiClient::delete_queue(self, queue).await
    }

    async fn send_message(&self, queue: &QueueRef, card: &GiftCard) -> Result<SendMessageResponse, RequestError> {
        ApiClient::send_message(self, queue, card).await
    }

    async fn receive_messages(&self, queue: &QueueRef, max_messages: u32) -> Result<Vec<ReceivedMessage>, RequestError> {
        ApiClient::receive_messages(self, queue, max_messages).await
    }

    async fn delete_message(&self, queue: &QueueRef, receipt: &ReceiptHandle) -> Result<String, RequestError> {
        ApiClient::delete_message(self, queue, receipt).await
    }
}
