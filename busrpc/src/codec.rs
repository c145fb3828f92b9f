//! Codec and delivery configuration.
//!
//! The configuration is process-wide and explicitly initialized: call
//! [`initialize`] (pass-through codec, local-only delivery) or
//! [`initialize_custom`] once during startup, before any stub or handler
//! accessor is used. Reading it earlier is a hard error — there is no
//! implicit default.
//!
//! Re-initializing replaces the configuration for all subsequent stub and
//! reply calls; it is global by design (one transport, one active codec).
//! Concurrent readers are safe, concurrent un-coordinated writers are the
//! caller's usage error and are not guarded here.

use std::any::Any;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{Error, Result};

/// Name of the built-in pass-through codec.
pub const PASS_THROUGH_CODEC_NAME: &str = "busrpc";

/// Default send timeout for round-trip requests.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// A message payload as it travels on the bus.
#[derive(Clone)]
pub enum Body {
    /// Pass-through delivery: the value itself, shared by reference. Valid
    /// only while caller and handler share one process.
    Local(Arc<dyn Any + Send + Sync>),
    /// The wire form produced by a registered custom codec.
    Encoded(Vec<u8>),
}

impl std::fmt::Debug for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Body::Local(_) => f.write_str("Body::Local(..)"),
            Body::Encoded(bytes) => write!(f, "Body::Encoded({} bytes)", bytes.len()),
        }
    }
}

/// A custom message codec.
///
/// Codecs transform the canonical serialized form of a value (its bincode
/// bytes) to and from the wire representation, so a sum-type result is one
/// wire type, never per-variant. Required whenever requests may cross
/// process boundaries.
pub trait MessageCodec: Send + Sync + 'static {
    /// Unique codec name, stamped into the delivery options.
    fn name(&self) -> &str;

    fn encode(&self, bytes: Vec<u8>) -> Result<Vec<u8>>;

    fn decode(&self, bytes: Vec<u8>) -> Result<Vec<u8>>;
}

/// Delivery options attached to every outbound message.
#[derive(Debug, Clone)]
pub struct DeliveryOptions {
    /// When true, messages must not leave the local process.
    pub local_only: bool,
    /// Name of the codec that produced the payload.
    pub codec_name: String,
    /// How long a round-trip request waits for its reply.
    pub timeout: Duration,
}

impl Default for DeliveryOptions {
    fn default() -> Self {
        Self {
            local_only: true,
            codec_name: PASS_THROUGH_CODEC_NAME.to_string(),
            timeout: DEFAULT_SEND_TIMEOUT,
        }
    }
}

impl DeliveryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn local_only(mut self, local_only: bool) -> Self {
        self.local_only = local_only;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

enum ActiveCodec {
    PassThrough,
    Custom(Arc<dyn MessageCodec>),
}

/// An active codec paired with its delivery options.
///
/// Constructible directly for tests and embedded use; the process-wide cell
/// managed by [`initialize`]/[`initialize_custom`]/[`current`] is what stubs
/// and replies read.
pub struct CodecConfig {
    codec: ActiveCodec,
    options: DeliveryOptions,
}

impl CodecConfig {
    /// The default configuration: no serialization, local-only delivery.
    pub fn pass_through() -> Self {
        Self {
            codec: ActiveCodec::PassThrough,
            options: DeliveryOptions::default(),
        }
    }

    /// A custom codec with the supplied delivery options. The codec's name
    /// replaces whatever `options.codec_name` held.
    pub fn custom(codec: impl MessageCodec, mut options: DeliveryOptions) -> Self {
        options.codec_name = codec.name().to_string();
        Self {
            codec: ActiveCodec::Custom(Arc::new(codec)),
            options,
        }
    }

    pub fn options(&self) -> &DeliveryOptions {
        &self.options
    }

    pub fn codec_name(&self) -> &str {
        &self.options.codec_name
    }

    /// Encodes a value for the bus under this configuration.
    pub fn encode<T>(&self, value: T) -> Result<Body>
    where
        T: Serialize + Send + Sync + 'static,
    {
        match &self.codec {
            ActiveCodec::PassThrough => Ok(Body::Local(Arc::new(value))),
            ActiveCodec::Custom(codec) => {
                let canonical = bincode::serialize(&value)?;
                Ok(Body::Encoded(codec.encode(canonical)?))
            }
        }
    }

    /// Decodes an inbound payload under this configuration.
    pub fn decode<T>(&self, body: &Body) -> Result<T>
    where
        T: DeserializeOwned + Clone + 'static,
    {
        match (body, &self.codec) {
            (Body::Local(value), _) => value
                .downcast_ref::<T>()
                .cloned()
                .ok_or_else(|| {
                    Error::codec_msg(format!(
                        "pass-through payload is not a {}",
                        std::any::type_name::<T>()
                    ))
                }),
            (Body::Encoded(bytes), ActiveCodec::Custom(codec)) => {
                let canonical = codec.decode(bytes.clone())?;
                Ok(bincode::deserialize(&canonical)?)
            }
            (Body::Encoded(_), ActiveCodec::PassThrough) => Err(Error::codec_msg(
                "received an encoded payload but the pass-through codec is active",
            )),
        }
    }
}

static ACTIVE_CONFIG: Lazy<RwLock<Option<Arc<CodecConfig>>>> = Lazy::new(|| RwLock::new(None));

/// Initializes the process-wide configuration with the pass-through codec
/// and local-only delivery options.
pub fn initialize() {
    replace(CodecConfig::pass_through());
}

/// Initializes the process-wide configuration with a custom codec. Required
/// whenever requests may cross process boundaries.
pub fn initialize_custom(codec: impl MessageCodec, options: DeliveryOptions) {
    replace(CodecConfig::custom(codec, options));
}

fn replace(config: CodecConfig) {
    tracing::debug!(codec = config.codec_name(), "registered message codec");
    let mut guard = ACTIVE_CONFIG.write().unwrap_or_else(|e| e.into_inner());
    *guard = Some(Arc::new(config));
}

/// The configuration current at this moment. Stubs and replies call this at
/// every use — the configuration is read, never captured.
pub fn current() -> Result<Arc<CodecConfig>> {
    ACTIVE_CONFIG
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
        .ok_or(Error::UninitializedCodec)
}
