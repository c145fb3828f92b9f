//! Using the runtime before codec initialization must fail fast.
//!
//! Single test on purpose: it relies on the process-wide configuration never
//! being initialized in this binary.

use std::sync::Arc;

use busrpc::{Error, LocalBus, MessageBus};

#[tokio::test]
async fn stub_calls_fail_before_initialization() {
    let bus: Arc<dyn MessageBus> = Arc::new(LocalBus::new());

    let error = busrpc::call::<u32, u32>(&bus, "co.selim.sample.division.divide", 7)
        .await
        .unwrap_err();
    assert!(matches!(error, Error::UninitializedCodec));

    let error = busrpc::notify(&bus, "co.selim.sample.telemetry.record", 7u32)
        .await
        .unwrap_err();
    assert!(matches!(error, Error::UninitializedCodec));

    assert!(busrpc::codec::current().is_err());
}
