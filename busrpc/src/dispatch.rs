//! Typed dispatch helpers: the bodies of generated caller stubs and the
//! handler-side streams their accessors return.

use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::bus::{InboundMessage, MessageBus};
use crate::request::ServiceRequest;
use crate::{codec, Result};

/// Round-trip caller stub body: encodes the payload, issues a request on
/// `topic` and suspends until the typed reply arrives.
pub async fn call<T, R>(bus: &Arc<dyn MessageBus>, topic: &str, payload: T) -> Result<R>
where
    T: Serialize + Send + Sync + 'static,
    R: DeserializeOwned + Clone + Send + Sync + 'static,
{
    let config = codec::current()?;
    let body = config.encode(payload)?;
    let reply = bus.request(topic, body, config.options().clone()).await?;
    // Re-read: the configuration may have been replaced while we waited.
    codec::current()?.decode(&reply)
}

/// One-way caller stub body: encodes the payload and fires it on `topic`
/// with no awaited result.
pub async fn notify<T>(bus: &Arc<dyn MessageBus>, topic: &str, payload: T) -> Result<()>
where
    T: Serialize + Send + Sync + 'static,
{
    let config = codec::current()?;
    let body = config.encode(payload)?;
    bus.publish(topic, body, config.options().clone()).await
}

/// Subscribes to `topic` and yields one [`ServiceRequest`] per inbound
/// round-trip message. Every call registers a fresh subscription.
pub fn requests<T, R>(bus: &Arc<dyn MessageBus>, topic: &str) -> RequestStream<T, R> {
    RequestStream {
        bus: bus.clone(),
        topic: topic.to_string(),
        inbound: bus.subscribe(topic),
        _types: PhantomData,
    }
}

/// Subscribes to `topic` and yields the bare decoded payload of each one-way
/// message. Every call registers a fresh subscription.
pub fn messages<T>(bus: &Arc<dyn MessageBus>, topic: &str) -> MessageStream<T> {
    MessageStream {
        topic: topic.to_string(),
        inbound: bus.subscribe(topic),
        _payload: PhantomData,
    }
}

/// Lazy, unbounded sequence of inbound round-trip requests in arrival order.
///
/// The sequence never terminates on its own; dropping it is the only way to
/// stop consuming. Messages that cannot be decoded (or that carry no reply
/// token) are dropped with a warning.
pub struct RequestStream<T, R> {
    bus: Arc<dyn MessageBus>,
    topic: String,
    inbound: mpsc::UnboundedReceiver<InboundMessage>,
    _types: PhantomData<fn(T, R)>,
}

impl<T, R> Stream for RequestStream<T, R>
where
    T: DeserializeOwned + Clone + 'static,
{
    type Item = ServiceRequest<T, R>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            let message = match this.inbound.poll_recv(cx) {
                Poll::Ready(Some(message)) => message,
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            };

            let config = match codec::current() {
                Ok(config) => config,
                Err(error) => {
                    tracing::warn!(topic = %this.topic, %error, "dropping inbound request");
                    continue;
                }
            };
            let Some(token) = message.reply_token else {
                tracing::warn!(topic = %this.topic, "dropping message without a reply token");
                continue;
            };
            match config.decode::<T>(&message.body) {
                Ok(body) => {
                    return Poll::Ready(Some(ServiceRequest::new(body, this.bus.clone(), token)))
                }
                Err(error) => {
                    tracing::warn!(topic = %this.topic, %error, "dropping undecodable request");
                }
            }
        }
    }
}

/// Lazy, unbounded sequence of one-way payloads in arrival order.
///
/// No reply capability exists for these messages.
pub struct MessageStream<T> {
    topic: String,
    inbound: mpsc::UnboundedReceiver<InboundMessage>,
    _payload: PhantomData<fn(T)>,
}

impl<T> Stream for MessageStream<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            let message = match this.inbound.poll_recv(cx) {
                Poll::Ready(Some(message)) => message,
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            };

            let config = match codec::current() {
                Ok(config) => config,
                Err(error) => {
                    tracing::warn!(topic = %this.topic, %error, "dropping inbound message");
                    continue;
                }
            };
            match config.decode::<T>(&message.body) {
                Ok(payload) => return Poll::Ready(Some(payload)),
                Err(error) => {
                    tracing::warn!(topic = %this.topic, %error, "dropping undecodable message");
                }
            }
        }
    }
}
