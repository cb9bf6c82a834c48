use async_stream::stream;
use axum::extract::ws::{Message, WebSocket};
use futures_util::{
    future::{self, Either},
    pin_mut, StreamExt, TryStreamExt,
};
use tracing::{info, warn};

use crate::broker::Subscription;

pub async fn accept_and_log(stream: WebSocket, mut subscription: Subscription) {
    let id = subscription.id();
    info!(%id, "listener connected");
    match forward_events(stream, &mut subscription).await {
        Ok(()) => info!(%id, "listener disconnected"),
        Err(e) => warn!(%id, "error on listener connection: {e}"),
    }
    subscription.unsubscribe();
}

/// Writes every event of `subscription` to the socket as a JSON text frame
/// until either side goes away. Incoming frames are ignored.
async fn forward_events(
    stream: WebSocket,
    subscription: &mut Subscription,
) -> Result<(), axum::Error> {
    let (write, read) = stream.split();

    let receive = read.try_for_each(|_| future::ok(()));

    let send = stream! {
        while let Some(event) = subscription.recv().await {
            yield event;
        }
    }
    .map(|event| -> Result<Message, axum::Error> {
        let text = serde_json::to_string(&*event).map_err(axum::Error::new)?;
        Ok(Message::Text(text))
    })
    .forward(write);

    pin_mut!(receive, send);
    match future::select(receive, send).await {
        Either::Left((result, _)) | Either::Right((result, _)) => result,
    }
}

#[cfg(test)]
mod tests {
    use std::{net::TcpListener, time::Duration};

    use futures_util::StreamExt;
    use serde_json::{json, Value};
    use tokio::time::{sleep, timeout};
    use tokio_tungstenite::{connect_async, tungstenite};
    use tower::make::Shared;

    use crate::{handlers, leak, routes::router, state::AppState};

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[tokio::test]
    async fn listener_gets_json_frames_until_it_closes() {
        let state = leak(AppState::new(16));
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(axum_server::from_tcp(listener).serve(Shared::new(router(state))));

        let (mut ws, _) = connect_async(format!("ws://{addr}/events")).await.unwrap();
        // registered before the upgrade response went out
        assert_eq!(state.broker.subscriber_count().await, 1);

        handlers::handle_attendance(state, "dev-1", "true").unwrap();
        handlers::handle_location(state, "dev-2", "37.7749", "-122.4194").unwrap();

        for expected in [
            json!({ "type": "update", "message": "Device dev-1 set to true" }),
            json!({ "type": "gps", "message": "GPS updated for dev-2: 37.774900, -122.419400" }),
        ] {
            let msg = timeout(TIMEOUT, ws.next())
                .await
                .expect("timeout waiting for event")
                .expect("stream closed")
                .unwrap();
            let text = match msg {
                tungstenite::Message::Text(text) => text,
                other => panic!("expected a text frame, got {other:?}"),
            };
            let event: Value = serde_json::from_str(&text).unwrap();
            assert_eq!(event, expected);
        }

        ws.close(None).await.unwrap();
        timeout(TIMEOUT, async {
            while state.broker.subscriber_count().await != 0 {
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("listener still registered after close");
    }
}
