//! Error types for the busrpc runtime.

use thiserror::Error;

/// Main error type for busrpc operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The process-wide codec configuration was read before initialization.
    #[error(
        "codec configuration is not initialized; call codec::initialize() or \
         codec::initialize_custom() during startup"
    )]
    UninitializedCodec,

    /// Codec errors: payload transformation or type mismatches.
    #[error("codec error: {message}")]
    Codec {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization and deserialization errors.
    #[error("serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No subscriber is listening on the requested topic.
    #[error("no handlers registered for topic '{topic}'")]
    NoHandlers { topic: String },

    /// The reply did not arrive within the configured send timeout.
    #[error("request on topic '{topic}' timed out after {duration_ms}ms")]
    Timeout { topic: String, duration_ms: u64 },

    /// Channel and delivery failures.
    #[error("connection error: {message}")]
    Connection { message: String },
}

impl Error {
    /// Create a codec error with source
    pub fn codec<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Codec {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a codec error without source
    pub fn codec_msg(message: impl Into<String>) -> Self {
        Self::Codec {
            message: message.into(),
            source: None,
        }
    }

    /// Create a serialization error with source
    pub fn serialization<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Serialization {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a no-handlers error
    pub fn no_handlers(topic: impl Into<String>) -> Self {
        Self::NoHandlers {
            topic: topic.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(topic: impl Into<String>, duration: std::time::Duration) -> Self {
        Self::Timeout {
            topic: topic.into(),
            duration_ms: duration.as_millis() as u64,
        }
    }

    /// Create a connection error
    pub fn connection_msg(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::serialization("bincode serialization failed", err)
    }
}

/// Result type for busrpc operations.
pub type Result<T> = std::result::Result<T, Error>;
