//! Division service demo: one handler task replying to typed requests, one
//! caller stub awaiting typed results.
//!
//! Run with `cargo run --example division`.

use std::sync::Arc;

use busrpc::{codec, LocalBus, MessageBus};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

include!(concat!(env!("OUT_DIR"), "/division.rs"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Division {
    Success { quotient: f64 },
    Error { message: String },
}

#[tokio::main]
async fn main() -> busrpc::Result<()> {
    tracing_subscriber::fmt::init();
    codec::initialize();

    let bus: Arc<dyn MessageBus> = Arc::new(LocalBus::new());

    let mut requests = bus.divide_requests();
    tokio::spawn(async move {
        while let Some(request) = requests.next().await {
            let DivideParameters { dividend, divisor } = request.body().clone();
            let result = if divisor == 0.0 {
                Division::Error {
                    message: "Can't divide by zero".to_string(),
                }
            } else {
                Division::Success {
                    quotient: dividend / divisor,
                }
            };
            let _ = request.reply(result).await;
        }
    });

    let client = DivisionClient::new(bus.clone());
    for divisor in [0.0, 2.0] {
        match client.divide(5.0, divisor).await? {
            Division::Success { quotient } => println!("Yay! 5.0 / {divisor} = {quotient}"),
            Division::Error { message } => eprintln!("{message}"),
        }
    }

    Ok(())
}
