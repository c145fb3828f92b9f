//! Round-trip and one-way scenarios over the generated Division and
//! Telemetry services, under the default pass-through configuration.

use std::sync::{Arc, Once};
use std::time::Duration;

use busrpc::{codec, LocalBus, MessageBus};
use futures::StreamExt;
use serde::{Deserialize, Serialize};

include!(concat!(env!("OUT_DIR"), "/division.rs"));
include!(concat!(env!("OUT_DIR"), "/telemetry.rs"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Division {
    Success { quotient: f64 },
    Error { message: String },
}

fn init() {
    static ONCE: Once = Once::new();
    ONCE.call_once(codec::initialize);
}

fn new_bus() -> Arc<dyn MessageBus> {
    Arc::new(LocalBus::new())
}

fn spawn_division_handler(bus: &Arc<dyn MessageBus>) {
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
}

#[test]
fn topics_are_shared_between_stub_and_handler() {
    assert_eq!(DIVIDE_TOPIC, "co.selim.sample.division.divide");
    assert_eq!(RECORD_TOPIC, "co.selim.sample.telemetry.record");
    assert_eq!(FLUSH_TOPIC, "co.selim.sample.telemetry.flush");
    assert_eq!(SNAPSHOT_TOPIC, "co.selim.sample.telemetry.snapshot");
}

#[tokio::test]
async fn dividing_by_zero_replies_with_the_error_variant() {
    init();
    let bus = new_bus();
    spawn_division_handler(&bus);

    let client = DivisionClient::new(bus.clone());
    let result = client.divide(5.0, 0.0).await.unwrap();
    assert_eq!(
        result,
        Division::Error {
            message: "Can't divide by zero".to_string()
        }
    );
}

#[tokio::test]
async fn division_replies_with_the_quotient() {
    init();
    let bus = new_bus();
    spawn_division_handler(&bus);

    let client = DivisionClient::new(bus.clone());
    let result = client.divide(5.0, 2.0).await.unwrap();
    assert_eq!(result, Division::Success { quotient: 2.5 });
}

#[tokio::test]
async fn unit_request_round_trip() {
    init();
    let bus = new_bus();

    let mut requests = bus.snapshot_requests();
    tokio::spawn(async move {
        while let Some(request) = requests.next().await {
            let _ = request.reply("Hello World".to_string()).await;
        }
    });

    let client = TelemetryClient::new(bus.clone());
    assert_eq!(client.snapshot().await.unwrap(), "Hello World");
}

#[tokio::test]
async fn one_way_payload_arrives_exactly_once() {
    init();
    let bus = new_bus();

    let mut records = bus.record_requests();
    let client = TelemetryClient::new(bus.clone());
    client.record(vec![1, 2, 3]).await.unwrap();

    let payload = tokio::time::timeout(Duration::from_secs(1), records.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payload, vec![1, 2, 3]);

    let nothing = tokio::time::timeout(Duration::from_millis(100), records.next()).await;
    assert!(nothing.is_err(), "a single send must yield a single payload");
}

#[tokio::test]
async fn one_way_unit_payloads_are_delivered() {
    init();
    let bus = new_bus();

    let mut flushes = bus.flush_requests();
    let client = TelemetryClient::new(bus.clone());
    client.flush().await.unwrap();

    tokio::time::timeout(Duration::from_secs(1), flushes.next())
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn each_accessor_call_is_a_fresh_subscription() {
    init();
    let bus = new_bus();

    // A subscription created and dropped does not affect a later one.
    drop(bus.record_requests());

    let mut records = bus.record_requests();
    let client = TelemetryClient::new(bus.clone());
    client.record(vec![7]).await.unwrap();

    let payload = tokio::time::timeout(Duration::from_secs(1), records.next())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payload, vec![7]);
}
