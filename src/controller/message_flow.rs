use chrono::NaiveDate;
use log::{info, warn};

use crate::api::QueueService;
use crate::api::models::{GiftCard, QueueRef, ReceiptHandle, ReceivedMessage};
use crate::controller::{ListRegion, ResultState};
use crate::utils;

/// Messages requested per poll.
pub const POLL_BATCH_SIZE: u32 = 10;

pub const SELECT_QUEUE_FIRST: &str = "Please select a queue URL first";
pub const NO_QUEUES_MARKER: &str = "No queues available";
pub const EMPTY_QUEUE_MARKER: &str = "Queue is empty";

/// The queue currently picked on the messages page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    queue: Option<QueueRef>,
}

impl Selection {
    pub fn queue(&self) -> Option<&QueueRef> {
        self.queue.as_ref()
    }
}

/// Raw producer form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GiftCardForm {
    pub user_name: String,
    pub gift_card_type: String,
    pub amount: String,
    pub date: String,
}

impl GiftCardForm {
    pub fn to_payload(&self) -> GiftCard {
        GiftCard {
            user_name: self.user_name.clone(),
            gift_card_type: self.gift_card_type.clone(),
            amount: parse_amount(&self.amount),
            date: self.date.clone(),
        }
    }
}

/// Lenient decimal parsing: the longest leading prefix that reads as a
/// number wins, anything else is `None`. `"12.5 USD"` gives `12.5`.
pub fn parse_amount(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let end = numeric_prefix_len(s.as_bytes());
    if end == 0 {
        return None;
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Length of the longest prefix of the form `[+-]digits[.digits][e[+-]digits]`,
/// with at least one mantissa digit. Zero when there is none.
fn numeric_prefix_len(b: &[u8]) -> usize {
    let digits_from = |i: usize| b[i.min(b.len())..].iter().take_while(|c| c.is_ascii_digit()).count();

    let mut i = usize::from(matches!(b.first(), Some(b'+' | b'-')));
    let int_digits = digits_from(i);
    i += int_digits;
    let mut mantissa_digits = int_digits;
    if b.get(i) == Some(&b'.') {
        let frac_digits = digits_from(i + 1);
        if int_digits + frac_digits > 0 {
            i += 1 + frac_digits;
            mantissa_digits += frac_digits;
        }
    }
    if mantissa_digits == 0 {
        return 0;
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(b.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits = digits_from(j);
        if exp_digits > 0 {
            i = j + exp_digits;
        }
    }
    i
}

/// Rendering surface of the messages page.
pub trait FlowView {
    fn show_queue_choices(&mut self, queues: &ListRegion<QueueRef>);
    fn show_selection(&mut self, selected: Option<&QueueRef>);
    fn show_producer_result(&mut self, state: &ResultState);
    fn show_consumer_result(&mut self, state: &ResultState);
    /// Each rendered message offers a delete action bound to its own
    /// receipt handle and to `polled`, the selection it was polled under.
    /// Deletes go back through `polled`, never the live selection.
    fn show_messages(&mut self, polled: &Selection, messages: &ListRegion<ReceivedMessage>);
    fn reset_producer_form(&mut self);
    fn set_date(&mut self, date: &str);
    /// One-off notice outside the result regions.
    fn notify(&mut self, text: &str);
}

pub struct MessageFlow<S> {
    service: S,
    today: fn() -> NaiveDate,
}

impl<S: QueueService> MessageFlow<S> {
    pub fn new(service: S) -> Self {
        Self { service, today: utils::today }
    }

    /// Use a fixed clock for the date field.
    pub fn with_clock(service: S, today: fn() -> NaiveDate) -> Self {
        Self { service, today }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    fn today(&self) -> String {
        utils::iso_date((self.today)())
    }

    /// Runs once when the page is shown.
    pub async fn init<V: FlowView>(&self, view: &mut V) {
        view.set_date(&self.today());
        self.load_queues(view).await;
    }

    pub async fn load_queues<V: FlowView>(&self, view: &mut V) {
        match self.service.list_queues().await {
            Ok(queues) => view.show_queue_choices(&ListRegion::from_items(queues, NO_QUEUES_MARKER)),
            Err(e) => {
                warn!("failed to load queues: {e}");
                view.show_queue_choices(&ListRegion::Failed("Failed to load queues".into()));
            }
        }
    }

    pub fn select<V: FlowView>(&self, selection: &mut Selection, queue: QueueRef, view: &mut V) {
        selection.queue = Some(queue);
        view.show_selection(selection.queue());
    }

    pub async fn send<V: FlowView>(&self, selection: &Selection, form: &GiftCardForm, view: &mut V) {
        let Some(queue) = selection.queue() else {
            view.show_producer_result(&ResultState::failed(SELECT_QUEUE_FIRST));
            return;
        };
        view.show_producer_result(&ResultState::pending("Sending message..."));
        let card = form.to_payload();
        match self.service.send_message(queue, &card).await {
            Ok(resp) => {
                info!("sent message {} to {queue}", resp.message_id);
                view.show_producer_result(&ResultState::success(format!("{} (ID: {})", resp.message, resp.message_id)));
                view.reset_producer_form();
                view.set_date(&self.today());
            }
            Err(e) => view.show_producer_result(&ResultState::failed(e.message_or("Failed to send message"))),
        }
    }

    pub async fn poll<V: FlowView>(&self, selection: &Selection, view: &mut V) {
        let Some(queue) = selection.queue() else {
            view.show_consumer_result(&ResultState::failed(SELECT_QUEUE_FIRST));
            return;
        };
        view.show_consumer_result(&ResultState::pending("Polling messages..."));
        match self.service.receive_messages(queue, POLL_BATCH_SIZE).await {
            Ok(messages) => {
                let state = if messages.is_empty() {
                    ResultState::success("No messages available in queue")
                } else {
                    ResultState::success(format!("Received {} message(s)", messages.len()))
                };
                view.show_consumer_result(&state);
                view.show_messages(selection, &ListRegion::from_items(messages, EMPTY_QUEUE_MARKER));
            }
            Err(e) => view.show_consumer_result(&ResultState::failed(e.message_or("Failed to poll messages"))),
        }
    }

    /// Acknowledge the message carrying `receipt` on the queue it was polled
    /// from, then re-poll that queue so the list reflects the backend rather
    /// than a local splice. `polled` is the selection handed to
    /// [`FlowView::show_messages`] with the message, not the live one.
    pub async fn delete_message<V: FlowView>(&self, polled: &Selection, receipt: &ReceiptHandle, view: &mut V) {
        let Some(queue) = polled.queue() else {
            view.notify(SELECT_QUEUE_FIRST);
            return;
        };
        match self.service.delete_message(queue, receipt).await {
            Ok(_) => {
                info!("deleted message from {queue}");
                view.notify("Message deleted successfully");
                self.poll(polled, view).await;
            }
            Err(e) => {
                let detail = e.detail().map(str::to_string).unwrap_or_else(|| e.to_string());
                view.notify(&format!("Failed to delete message: {detail}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::RequestError;
    use crate::controller::Status;
    use crate::controller::testing::{Call, FakeService};
    use reqwest::StatusCode;

    #[derive(Debug, Default)]
    struct RecordingView {
        choices: Option<ListRegion<QueueRef>>,
        selected: Option<QueueRef>,
        producer: Vec<ResultState>,
        consumer: Vec<ResultState>,
        messages: Option<ListRegion<ReceivedMessage>>,
        polled: Option<Selection>,
        resets: usize,
        date: Option<String>,
        notices: Vec<String>,
    }

    impl FlowView for RecordingView {
        fn show_queue_choices(&mut self, queues: &ListRegion<QueueRef>) {
            self.choices = Some(queues.clone());
        }

        fn show_selection(&mut self, selected: Option<&QueueRef>) {
            self.selected = selected.cloned();
        }

        fn show_producer_result(&mut self, state: &ResultState) {
            self.producer.push(state.clone());
        }

        fn show_consumer_result(&mut self, state: &ResultState) {
            self.consumer.push(state.clone());
        }

        fn show_messages(&mut self, polled: &Selection, messages: &ListRegion<ReceivedMessage>) {
            self.polled = Some(polled.clone());
            self.messages = Some(messages.clone());
        }

        fn reset_producer_form(&mut self) {
            self.resets += 1;
            self.date = None;
        }

        fn set_date(&mut self, date: &str) {
            self.date = Some(date.to_string());
        }

        fn notify(&mut self, text: &str) {
            self.notices.push(text.to_string());
        }
    }

    fn fixed_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn flow(fake: FakeService) -> MessageFlow<FakeService> {
        MessageFlow::with_clock(fake, fixed_day)
    }

    fn form(amount: &str) -> GiftCardForm {
        GiftCardForm {
            user_name: "ana".into(),
            gift_card_type: "Amazon".into(),
            amount: amount.into(),
            date: "2026-10-01".into(),
        }
    }

    fn selected(url: &str) -> Selection {
        Selection { queue: Some(QueueRef::from(url)) }
    }

    #[test]
    fn amount_parsing_is_lenient() {
        assert_eq!(parse_amount("25"), Some(25.0));
        assert_eq!(parse_amount(" 12.5 USD"), Some(12.5));
        assert_eq!(parse_amount("1e3"), Some(1000.0));
        assert_eq!(parse_amount("-4."), Some(-4.0));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("1e"), Some(1.0));
        assert_eq!(parse_amount("+.5x"), Some(0.5));
        assert_eq!(parse_amount("2.5e-1kg"), Some(0.25));
        assert_eq!(parse_amount("-."), None);
        assert_eq!(parse_amount("1e999"), None);
    }

    #[test]
    fn huge_amount_paste_is_parsed_in_one_pass() {
        let pasted = format!("{}42{}", "0".repeat(200_000), "-".repeat(200_000));
        assert_eq!(parse_amount(&pasted), Some(42.0));
        assert_eq!(numeric_prefix_len(pasted.as_bytes()), 200_002);
    }

    #[tokio::test]
    async fn init_defaults_date_and_loads_queues() {
        let flow = flow(FakeService::with_queues(&["q1", "q2"]));
        let mut view = RecordingView::default();
        flow.init(&mut view).await;
        assert_eq!(view.date.as_deref(), Some("2026-10-19"));
        assert_eq!(view.choices.unwrap().items().len(), 2);
    }

    #[tokio::test]
    async fn queue_choices_cover_empty_and_failure() {
        let flow = flow(FakeService::default());
        let mut view = RecordingView::default();
        flow.load_queues(&mut view).await;
        assert_eq!(view.choices, Some(ListRegion::Empty(NO_QUEUES_MARKER)));

        flow.service().fail_next(RequestError::Transport("down".into()));
        flow.load_queues(&mut view).await;
        assert_eq!(view.choices, Some(ListRegion::Failed("Failed to load queues".into())));
    }

    #[tokio::test]
    async fn selecting_overwrites_previous_choice() {
        let flow = flow(FakeService::default());
        let mut view = RecordingView::default();
        let mut selection = Selection::default();
        flow.select(&mut selection, QueueRef::from("q1"), &mut view);
        flow.select(&mut selection, QueueRef::from("q2"), &mut view);
        assert_eq!(selection.queue(), Some(&QueueRef::from("q2")));
        assert_eq!(view.selected, Some(QueueRef::from("q2")));
    }

    #[tokio::test]
    async fn send_without_selection_never_hits_network() {
        let flow = flow(FakeService::with_queues(&["q1"]));
        let mut view = RecordingView::default();
        flow.send(&Selection::default(), &form("10"), &mut view).await;
        assert_eq!(flow.service().call_count(), 0);
        assert_eq!(view.producer, vec![ResultState::failed(SELECT_QUEUE_FIRST)]);
        assert_eq!(view.resets, 0);
    }

    #[tokio::test]
    async fn successful_send_resets_form_and_redefaults_date() {
        let flow = flow(FakeService::default());
        let mut view = RecordingView::default();
        flow.send(&selected("q1"), &form("25.50"), &mut view).await;

        assert_eq!(view.producer.last().unwrap(), &ResultState::success("Message sent successfully (ID: m-1)"));
        assert_eq!(view.resets, 1);
        assert_eq!(view.date.as_deref(), Some("2026-10-19"));
        let calls = flow.service().calls.borrow();
        let Call::SendMessage(queue, card) = &calls[0] else { panic!("expected send, got {:?}", calls[0]) };
        assert_eq!(queue.as_str(), "q1");
        assert_eq!(card.amount, Some(25.5));
    }

    #[tokio::test]
    async fn invalid_amount_is_sent_unsanitized() {
        let flow = flow(FakeService::default());
        let mut view = RecordingView::default();
        flow.send(&selected("q1"), &form("lots"), &mut view).await;
        let calls = flow.service().calls.borrow();
        assert!(matches!(&calls[0], Call::SendMessage(_, card) if card.amount.is_none()));
    }

    #[tokio::test]
    async fn failed_send_preserves_form() {
        let fake = FakeService::default();
        fake.fail_next_with(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send message: queue does not exist");
        let flow = flow(fake);
        let mut view = RecordingView::default();
        flow.send(&selected("q1"), &form("5"), &mut view).await;
        let last = view.producer.last().unwrap();
        assert_eq!(last.status, Status::Failed);
        assert_eq!(last.message, "Failed to send message: queue does not exist");
        assert_eq!(view.resets, 0);
        assert_eq!(view.date, None);
    }

    #[tokio::test]
    async fn poll_without_selection_fails_locally() {
        let flow = flow(FakeService::default());
        let mut view = RecordingView::default();
        flow.poll(&Selection::default(), &mut view).await;
        assert_eq!(flow.service().call_count(), 0);
        assert_eq!(view.consumer, vec![ResultState::failed(SELECT_QUEUE_FIRST)]);
    }

    #[tokio::test]
    async fn poll_of_empty_queue_is_not_an_error() {
        let flow = flow(FakeService::default());
        let mut view = RecordingView::default();
        flow.poll(&selected("q1"), &mut view).await;
        assert_eq!(view.consumer.last().unwrap(), &ResultState::success("No messages available in queue"));
        assert_eq!(view.messages, Some(ListRegion::Empty(EMPTY_QUEUE_MARKER)));
        assert_eq!(*flow.service().calls.borrow(), vec![Call::ReceiveMessages(QueueRef::from("q1"), POLL_BATCH_SIZE)]);
    }

    #[tokio::test]
    async fn sent_card_comes_back_unchanged() {
        let flow = flow(FakeService::default());
        let mut view = RecordingView::default();
        let selection = selected("q1");
        let input = form("19.99");
        flow.send(&selection, &input, &mut view).await;
        flow.poll(&selection, &mut view).await;

        assert_eq!(view.consumer.last().unwrap().message, "Received 1 message(s)");
        let shown = view.messages.as_ref().unwrap().items();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].gift_card, input.to_payload());
    }

    #[tokio::test]
    async fn failed_poll_leaves_message_list_alone() {
        let fake = FakeService::default();
        let flow = flow(fake);
        let mut view = RecordingView::default();
        let selection = selected("q1");
        flow.send(&selection, &form("1"), &mut view).await;
        flow.poll(&selection, &mut view).await;
        let before = view.messages.clone();

        flow.service().fail_next(RequestError::Transport("timed out".into()));
        flow.poll(&selection, &mut view).await;
        assert_eq!(view.consumer.last().unwrap(), &ResultState::failed("Failed to poll messages"));
        assert_eq!(view.messages, before);
    }

    #[tokio::test]
    async fn deleted_receipt_handle_is_not_returned_again() {
        let flow = flow(FakeService::default());
        let mut view = RecordingView::default();
        let selection = selected("q1");
        flow.send(&selection, &form("1"), &mut view).await;
        flow.send(&selection, &form("2"), &mut view).await;
        flow.poll(&selection, &mut view).await;

        let target = view.messages.as_ref().unwrap().items()[0].receipt_handle.clone();
        let polled = view.polled.clone().unwrap();
        flow.delete_message(&polled, &target, &mut view).await;

        assert_eq!(view.notices, vec!["Message deleted successfully".to_string()]);
        let remaining = view.messages.as_ref().unwrap().items();
        assert_eq!(remaining.len(), 1);
        assert!(remaining.iter().all(|m| m.receipt_handle != target));
        let calls = flow.service().calls.borrow();
        assert_eq!(calls[calls.len() - 2], Call::DeleteMessage(QueueRef::from("q1"), target));
        assert!(matches!(calls.last(), Some(Call::ReceiveMessages(_, _))));
    }

    #[tokio::test]
    async fn failed_delete_notifies_with_detail() {
        let fake = FakeService::default();
        fake.fail_next_with(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete message: receipt expired");
        let flow = flow(fake);
        let mut view = RecordingView::default();
        flow.delete_message(&selected("q1"), &ReceiptHandle::from("rh-9"), &mut view).await;
        assert_eq!(view.notices, vec!["Failed to delete message: Failed to delete message: receipt expired".to_string()]);
        assert_eq!(flow.service().call_count(), 1);

        flow.service().fail_next(RequestError::Transport("connection reset".into()));
        flow.delete_message(&selected("q1"), &ReceiptHandle::from("rh-9"), &mut view).await;
        assert_eq!(view.notices[1], "Failed to delete message: transport error: connection reset");
    }

    #[tokio::test]
    async fn delete_targets_queue_message_was_polled_from() {
        let flow = flow(FakeService::with_queues(&["queue-A", "queue-B"]));
        let mut view = RecordingView::default();
        let mut selection = Selection::default();
        flow.select(&mut selection, QueueRef::from("queue-A"), &mut view);
        flow.send(&selection, &form("3"), &mut view).await;
        flow.poll(&selection, &mut view).await;
        let shown = view.messages.as_ref().unwrap().items()[0].receipt_handle.clone();
        let polled = view.polled.clone().unwrap();

        flow.select(&mut selection, QueueRef::from("queue-B"), &mut view);
        flow.service().calls.borrow_mut().clear();
        flow.delete_message(&polled, &shown, &mut view).await;

        let queue_a = QueueRef::from("queue-A");
        assert_eq!(
            *flow.service().calls.borrow(),
            vec![Call::DeleteMessage(queue_a.clone(), shown), Call::ReceiveMessages(queue_a.clone(), POLL_BATCH_SIZE)]
        );
        assert_eq!(view.polled.as_ref().and_then(Selection::queue), Some(&queue_a));
        assert_eq!(view.messages, Some(ListRegion::Empty(EMPTY_QUEUE_MARKER)));
        assert!(flow.service().messages.borrow()[&queue_a].is_empty());
        assert_eq!(selection.queue(), Some(&QueueRef::from("queue-B")));
    }

    #[tokio::test]
    async fn delete_without_queue_makes_no_request() {
        let flow = flow(FakeService::with_queues(&["q1"]));
        let mut view = RecordingView::default();
        flow.delete_message(&Selection::default(), &ReceiptHandle::from("rh-1"), &mut view).await;
        assert_eq!(flow.service().call_count(), 0);
        assert_eq!(view.notices, vec![SELECT_QUEUE_FIRST.to_string()]);
        assert_eq!(view.messages, None);
    }
}
