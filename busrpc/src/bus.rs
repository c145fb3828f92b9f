//! The bus interface consumed by the typed dispatch layer, plus the
//! in-process implementation.
//!
//! The core never reorders or buffers beyond what the bus provides: one
//! subscriber observes the messages of one topic in delivery order, and a
//! round-trip request is answered through its correlation token.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};
use uuid::Uuid;

use crate::codec::{Body, DeliveryOptions};
use crate::{Error, Result};

/// Correlation token identifying one pending round-trip request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplyToken(Uuid);

/// One raw inbound message delivered to a subscriber.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub body: Body,
    /// Present on round-trip requests; the reply travels back through it.
    pub reply_token: Option<ReplyToken>,
}

/// The publish/subscribe transport the dispatch layer runs on.
///
/// Implementations own delivery, ordering and timeout policy. The in-process
/// [`LocalBus`] is the reference implementation; a cross-process transport
/// would honor `DeliveryOptions::local_only` and carry `Body::Encoded`
/// payloads only.
#[async_trait]
pub trait MessageBus: Send + Sync + 'static {
    /// One-way delivery to every current subscriber of `topic`. Absent
    /// subscribers are not an error.
    async fn publish(&self, topic: &str, body: Body, options: DeliveryOptions) -> Result<()>;

    /// Point-to-point delivery to one subscriber of `topic`; suspends until
    /// the reply arrives or `options.timeout` fires.
    async fn request(&self, topic: &str, body: Body, options: DeliveryOptions) -> Result<Body>;

    /// Registers a subscriber and returns its unbounded, FIFO inbound
    /// sequence. The sequence never terminates on its own; dropping the
    /// receiver is the way to unsubscribe.
    fn subscribe(&self, topic: &str) -> mpsc::UnboundedReceiver<InboundMessage>;

    /// Resolves the pending request identified by `token`. A token that is
    /// unknown or already answered is a no-op.
    async fn reply(&self, token: ReplyToken, body: Body, options: DeliveryOptions) -> Result<()>;
}

#[derive(Default)]
struct TopicSubscribers {
    senders: Vec<mpsc::UnboundedSender<InboundMessage>>,
    next: AtomicUsize,
}

/// In-process message bus over tokio channels.
///
/// Requests round-robin across the subscribers of a topic; publishes reach
/// every subscriber. Closed subscribers are pruned on delivery.
#[derive(Default)]
pub struct LocalBus {
    topics: DashMap<String, TopicSubscribers>,
    pending: DashMap<Uuid, oneshot::Sender<Body>>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers to one live subscriber, starting at the round-robin cursor.
    fn deliver_to_one(&self, topic: &str, mut message: InboundMessage) -> bool {
        let Some(mut subscribers) = self.topics.get_mut(topic) else {
            return false;
        };
        subscribers.senders.retain(|sender| !sender.is_closed());
        let count = subscribers.senders.len();
        if count == 0 {
            return false;
        }

        let start = subscribers.next.fetch_add(1, Ordering::Relaxed);
        for offset in 0..count {
            let index = (start + offset) % count;
            match subscribers.senders[index].send(message) {
                Ok(()) => return true,
                // Lost the race against a dropping receiver; try the next one.
                Err(mpsc::error::SendError(returned)) => message = returned,
            }
        }
        false
    }
}

#[async_trait]
impl MessageBus for LocalBus {
    async fn publish(&self, topic: &str, body: Body, _options: DeliveryOptions) -> Result<()> {
        if let Some(mut subscribers) = self.topics.get_mut(topic) {
            subscribers.senders.retain(|sender| !sender.is_closed());
            tracing::trace!(
                topic,
                subscribers = subscribers.senders.len(),
                "publishing message"
            );
            for sender in &subscribers.senders {
                let _ = sender.send(InboundMessage {
                    body: body.clone(),
                    reply_token: None,
                });
            }
        }
        Ok(())
    }

    async fn request(&self, topic: &str, body: Body, options: DeliveryOptions) -> Result<Body> {
        let correlation = Uuid::new_v4();
        let (reply_sender, reply_receiver) = oneshot::channel();
        self.pending.insert(correlation, reply_sender);

        let message = InboundMessage {
            body,
            reply_token: Some(ReplyToken(correlation)),
        };
        if !self.deliver_to_one(topic, message) {
            self.pending.remove(&correlation);
            return Err(Error::no_handlers(topic));
        }
        tracing::trace!(topic, %correlation, "request delivered, awaiting reply");

        match tokio::time::timeout(options.timeout, reply_receiver).await {
            Ok(Ok(reply)) => Ok(reply),
            Ok(Err(_)) => Err(Error::connection_msg("reply channel closed")),
            Err(_) => {
                self.pending.remove(&correlation);
                Err(Error::timeout(topic, options.timeout))
            }
        }
    }

    fn subscribe(&self, topic: &str) -> mpsc::UnboundedReceiver<InboundMessage> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.topics
            .entry(topic.to_string())
            .or_default()
            .senders
            .push(sender);
        tracing::debug!(topic, "subscriber registered");
        receiver
    }

    async fn reply(&self, token: ReplyToken, body: Body, _options: DeliveryOptions) -> Result<()> {
        match self.pending.remove(&token.0) {
            Some((_, sender)) => {
                if sender.send(body).is_err() {
                    tracing::debug!(correlation = %token.0, "requester went away before the reply");
                }
                Ok(())
            }
            None => {
                // Double or late reply; first one won.
                tracing::warn!(
                    correlation = %token.0,
                    "ignoring reply for an unknown or already-answered request"
                );
                Ok(())
            }
        }
    }
}
