//! # busrpc - typed service stubs over an in-process message bus
//!
//! A typed request/response layer on top of a publish/subscribe bus. A
//! service is declared once (see `busrpc-codegen`); per operation the
//! generated module provides a caller-side stub that publishes a request and
//! awaits a typed reply, and a handler-side accessor exposing inbound
//! requests as a lazy asynchronous stream paired with a single-use reply
//! capability.
//!
//! ## Quick Start
//!
//! Generate a service module in `build.rs` with `busrpc-codegen`, then:
//!
//! ```rust,ignore
//! use busrpc::{codec, LocalBus, MessageBus};
//! use futures::StreamExt;
//! use std::sync::Arc;
//!
//! include!(concat!(env!("OUT_DIR"), "/division.rs"));
//!
//! #[tokio::main]
//! async fn main() -> busrpc::Result<()> {
//!     // Exactly once, at startup.
//!     codec::initialize();
//!
//!     let bus: Arc<dyn MessageBus> = Arc::new(LocalBus::new());
//!
//!     // Handler side: a stream of typed requests, each replied to once.
//!     let mut requests = bus.divide_requests();
//!     tokio::spawn(async move {
//!         while let Some(request) = requests.next().await {
//!             let DivideParameters { dividend, divisor } = request.body().clone();
//!             let _ = request.reply(divide(dividend, divisor)).await;
//!         }
//!     });
//!
//!     // Caller side: a typed stub over the same topic.
//!     let client = DivisionClient::new(bus.clone());
//!     let result = client.divide(5.0, 2.0).await?;
//!     println!("{result:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Delivery model
//!
//! Operations with a result are round trips: the stub suspends until the
//! handler replies. Operations without a result are one-way: the stub fires
//! and the handler stream yields bare payloads with no reply capability.
//! Caller and handler derive their topic from the same generated constant,
//! so they cannot disagree.
//!
//! ## Codec configuration
//!
//! The codec and delivery options are process-wide state with an explicit
//! lifecycle: [`codec::initialize`] registers the pass-through codec (no
//! serialization, valid in-process only), [`codec::initialize_custom`]
//! registers a custom [`MessageCodec`] for delivery that crosses process
//! boundaries. Using any stub before initialization fails fast with
//! [`Error::UninitializedCodec`].

pub mod bus;
pub mod codec;
pub mod dispatch;
pub mod error;
pub mod request;


// Re-exports
pub use bus::{InboundMessage, LocalBus, MessageBus, ReplyToken};
pub use codec::{Body, CodecConfig, DeliveryOptions, MessageCodec};
pub use dispatch::{call, messages, notify, requests, MessageStream, RequestStream};
pub use error::{Error, Result};
pub use request::{Reply, ServiceRequest};

// Re-export commonly used dependencies so generated code and downstream
// crates can name them without a direct dependency.
pub use bincode;
pub use serde;
pub use serde::{Deserialize, Serialize};
