//! Typed round-trip fidelity through a custom codec with clustered delivery
//! options, over the generated Weather service.
//!
//! The codec configuration is process-wide, so this binary initializes it
//! once with the custom codec and never switches back.

use std::sync::{Arc, Once};

use busrpc::{codec, DeliveryOptions, LocalBus, MessageBus, MessageCodec};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

include!(concat!(env!("OUT_DIR"), "/weather.rs"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum WeatherReport {
    Success { description: String },
    Failure { message: String },
}

/// Reverses the serialized bytes on the way out and back in.
struct ReversingCodec;

impl MessageCodec for ReversingCodec {
    fn name(&self) -> &str {
        "reversing"
    }

    fn encode(&self, mut bytes: Vec<u8>) -> busrpc::Result<Vec<u8>> {
        bytes.reverse();
        Ok(bytes)
    }

    fn decode(&self, mut bytes: Vec<u8>) -> busrpc::Result<Vec<u8>> {
        bytes.reverse();
        Ok(bytes)
    }
}

fn init() {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        codec::initialize_custom(ReversingCodec, DeliveryOptions::new().local_only(false));
    });
}

fn spawn_weather_handler(bus: &Arc<dyn MessageBus>) {
    let mut requests = bus.get_weather_requests();
    tokio::spawn(async move {
        while let Some(request) = requests.next().await {
            let city = request.body().clone();
            let report = if city == "Frankfurt am Main" {
                WeatherReport::Success {
                    description: "Sunny".to_string(),
                }
            } else {
                WeatherReport::Failure {
                    message: format!("Unknown city '{city}'"),
                }
            };
            let _ = request.reply(report).await;
        }
    });
}

#[tokio::test]
async fn round_trip_values_survive_the_custom_codec() {
    init();
    let bus: Arc<dyn MessageBus> = Arc::new(LocalBus::new());
    spawn_weather_handler(&bus);

    let client = WeatherClient::new(bus.clone());
    assert_eq!(
        client.get_weather("Frankfurt am Main".to_string()).await.unwrap(),
        WeatherReport::Success {
            description: "Sunny".to_string()
        }
    );
    assert_eq!(
        client.get_weather("Berlin".to_string()).await.unwrap(),
        WeatherReport::Failure {
            message: "Unknown city 'Berlin'".to_string()
        }
    );
}

#[tokio::test]
async fn custom_codec_is_stamped_into_the_delivery_options() {
    init();
    let config = codec::current().unwrap();
    assert_eq!(config.codec_name(), "reversing");
    assert!(!config.options().local_only);
}
