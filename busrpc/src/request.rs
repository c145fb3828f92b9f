//! The runtime request/reply adapter.
//!
//! A [`ServiceRequest`] wraps exactly one inbound round-trip message. It is
//! constructed by the handler streams in [`crate::dispatch`], never by user
//! code, and it is consumed by replying: a second reply on the same request
//! does not compile.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;

use crate::bus::{MessageBus, ReplyToken};
use crate::{codec, Result};

/// The reply capability of one request, detached from the body.
///
/// Sending consumes the capability, so at most one reply can leave it.
pub struct Reply<R> {
    bus: Arc<dyn MessageBus>,
    token: ReplyToken,
    _response: PhantomData<fn(R)>,
}

impl<R> Reply<R>
where
    R: Serialize + Send + Sync + 'static,
{
    /// Encodes `response` with the codec configuration current *now* — the
    /// configuration is read at call time, not captured at subscription
    /// time — and resolves the caller's pending request.
    pub async fn send(self, response: R) -> Result<()> {
        let config = codec::current()?;
        let body = config.encode(response)?;
        self.bus
            .reply(self.token, body, config.options().clone())
            .await
    }
}

/// One inbound round-trip request: the decoded body plus a single-use reply
/// capability.
pub struct ServiceRequest<T, R> {
    body: T,
    replier: Reply<R>,
}

impl<T, R> ServiceRequest<T, R> {
    pub(crate) fn new(body: T, bus: Arc<dyn MessageBus>, token: ReplyToken) -> Self {
        Self {
            body,
            replier: Reply {
                bus,
                token,
                _response: PhantomData,
            },
        }
    }

    /// The decoded request payload.
    pub fn body(&self) -> &T {
        &self.body
    }

    /// Splits the request into its body and reply capability.
    pub fn into_parts(self) -> (T, Reply<R>) {
        (self.body, self.replier)
    }
}

impl<T, R> ServiceRequest<T, R>
where
    R: Serialize + Send + Sync + 'static,
{
    /// Replies to the requester. Consumes the request: each request is
    /// answered at most once.
    pub async fn reply(self, response: R) -> Result<()> {
        self.replier.send(response).await
    }
}
