//! DraftWorks streaming service.
//!
//! Exposes the pipeline over a WebSocket endpoint: a client connects to
//! `/ws/generate-blog`, sends one JSON message naming the topic, and
//! receives an ordered sequence of progress notifications while the five
//! stages run, ending with a completion notice (carrying the final result)
//! or an error notice. The server closes the connection after the sequence.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Transport details only: the run itself is
//! [`agents::BlogPipeline`], and the notification shapes live in
//! [`pipeline::progress`].
//!
//! ## Concurrency
//!
//! Per connection: the pipeline runs as one task, a keep-alive timer task
//! pushes a ping frame every 30 seconds, and the connection writer drains
//! the shared channel until the terminal event. Both tasks are aborted
//! unconditionally when the sequence ends, whichever way it ends.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tokio::sync::mpsc;

use agents::BlogPipeline;
use pipeline::ProgressEvent;

/// Interval between idle keep-alive frames.
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);

/// Channel capacity between the pipeline task and the connection writer.
const EVENT_BUFFER: usize = 16;

/// The single inbound message a client sends after connecting.
#[derive(Debug, Clone, Deserialize)]
pub struct BlogRequest {
    /// Topic to generate a blog post about.
    pub topic: String,
    /// Accepted for wire compatibility; currently unused.
    #[serde(default)]
    pub additional_info: Option<serde_json::Value>,
}

/// Builds the service router around a shared pipeline.
pub fn router(blog: Arc<BlogPipeline>) -> Router {
    Router::new()
        .route("/ws/generate-blog", get(ws_handler))
        .with_state(blog)
}

/// Binds `addr` and serves the router until the process exits.
pub async fn serve(addr: SocketAddr, blog: Arc<BlogPipeline>) -> anyhow::Result<()> {
    let tcp = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind listener on {addr}"))?;
    tracing::info!(%addr, "listening for blog-generation clients");
    axum::serve(tcp, router(blog))
        .await
        .context("websocket server error")?;
    Ok(())
}

async fn ws_handler(
    State(blog): State<Arc<BlogPipeline>>,
    upgrade: WebSocketUpgrade,
) -> impl IntoResponse {
    upgrade.on_upgrade(move |socket| handle_connection(socket, blog))
}

async fn handle_connection(mut socket: WebSocket, blog: Arc<BlogPipeline>) {
    let request = match read_request(&mut socket).await {
        Ok(request) => request,
        Err(message) => {
            tracing::warn!(%message, "rejecting connection");
            let _ = send_event(&mut socket, &ProgressEvent::failed(message)).await;
            let _ = socket.send(Message::Close(None)).await;
            return;
        }
    };

    tracing::info!(topic = %request.topic, "starting streamed pipeline run");

    let (events_tx, mut events_rx) = mpsc::channel(EVENT_BUFFER);

    let heartbeat = tokio::spawn(heartbeat_loop(events_tx.clone()));
    let runner = {
        let blog = blog.clone();
        let topic = request.topic.clone();
        tokio::spawn(async move {
            let _ = blog.run(&topic, events_tx).await;
        })
    };

    while let Some(event) = events_rx.recv().await {
        if send_event(&mut socket, &event).await.is_err() {
            tracing::debug!("client went away mid-run");
            break;
        }
        if event.is_terminal() {
            break;
        }
    }

    // The keep-alive is cancelled unconditionally once the sequence ends;
    // aborting a finished runner is a no-op.
    heartbeat.abort();
    runner.abort();

    let _ = socket.send(Message::Close(None)).await;
}

/// Reads and decodes the single expected inbound request.
async fn read_request(socket: &mut WebSocket) -> Result<BlogRequest, String> {
    match socket.recv().await {
        Some(Ok(Message::Text(text))) => serde_json::from_str(&text)
            .map_err(|err| format!("invalid blog request: {err}")),
        Some(Ok(_)) => Err("expected a text frame carrying the blog request".to_string()),
        Some(Err(err)) => Err(format!("failed to receive blog request: {err}")),
        None => Err("connection closed before a request was received".to_string()),
    }
}

async fn send_event(socket: &mut WebSocket, event: &ProgressEvent) -> Result<(), axum::Error> {
    let payload = serde_json::to_string(event)
        .unwrap_or_else(|_| r#"{"status":"error","message":"event serialisation failed"}"#.into());
    socket.send(Message::Text(payload)).await
}

async fn heartbeat_loop(events: mpsc::Sender<ProgressEvent>) {
    let mut interval = tokio::time::interval(KEEPALIVE_INTERVAL);
    // The first tick completes immediately; skip it so pings start one
    // interval after the connection opens.
    interval.tick().await;
    loop {
        interval.tick().await;
        if events.send(ProgressEvent::ping()).await.is_err() {
            break;
        }
    }
}
