//! Client against a live server
//!
//! Binds the real routes on an ephemeral port and talks to them through
//! `DeviceClient`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pendant::server::routes;
use pendant::telemetry::TelemetryProfile;
use pendant::{AlertSink, ClientError, DeviceClient, DeviceContext, PendantError, SosEvent};

fn spawn_server(ctx: Arc<DeviceContext>) -> SocketAddr {
    let (addr, server) = warp::serve(routes(ctx)).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

/// An address nothing is listening on.
fn dead_address() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

struct RejectingSink;

#[async_trait]
impl AlertSink for RejectingSink {
    async fn dispatch(&self, _event: &SosEvent) -> Result<(), PendantError> {
        Err(PendantError::AlertDispatch("no contacts configured".to_string()))
    }
}

#[tokio::test]
async fn test_client_reads_status_history_and_sends_sos() {
    let ctx = Arc::new(DeviceContext::seeded(TelemetryProfile::default(), 8));
    let addr = spawn_server(Arc::clone(&ctx));
    let client = DeviceClient::new(format!("http://{}", addr)).unwrap();

    let reading = client.fetch_status().await.unwrap();
    assert_eq!(reading, ctx.current_reading());

    let history = client.fetch_history().await.unwrap();
    assert_eq!(history.len(), 25);

    let ack = client.send_sos().await.unwrap();
    assert!(ack.sent);
    assert_eq!(ctx.sos_events().len(), 1);
}

#[tokio::test]
async fn test_unreachable_device_is_reported() {
    let client = DeviceClient::with_timeout(
        format!("http://{}", dead_address()),
        Duration::from_secs(2),
    )
    .unwrap();

    let err = client.fetch_status().await.unwrap_err();
    assert!(matches!(err, ClientError::Unreachable { .. }), "{:?}", err);

    let err = client.fetch_history().await.unwrap_err();
    assert!(matches!(err, ClientError::Unreachable { .. }), "{:?}", err);
}

#[tokio::test]
async fn test_sos_to_unreachable_device_fails_with_guidance() {
    let client = DeviceClient::with_timeout(
        format!("http://{}", dead_address()),
        Duration::from_secs(2),
    )
    .unwrap();

    let err = client.send_sos().await.unwrap_err();
    assert!(matches!(err, ClientError::SosFailed { .. }));
    assert!(err.to_string().contains("call emergency services directly"));
}

#[tokio::test]
async fn test_failed_dispatch_surfaces_as_sos_failure() {
    let ctx = Arc::new(
        DeviceContext::seeded(TelemetryProfile::default(), 9).with_alert_sink(RejectingSink),
    );
    let addr = spawn_server(Arc::clone(&ctx));
    let client = DeviceClient::new(format!("http://{}", addr)).unwrap();

    let err = client.send_sos().await.unwrap_err();

    assert!(matches!(err, ClientError::SosFailed { .. }));
    assert_eq!(ctx.sos_events().len(), 1);
}
