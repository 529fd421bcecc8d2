//! Test relay client.
//!
//! A WebSocket client that can register, send envelopes, and assert on the
//! frames the relay forwards to it.

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use sigrelay_proto::encode_registration;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// Time the relay gets to process a registration before the test moves on.
const SETTLE: Duration = Duration::from_millis(150);

/// A test relay client.
pub struct TestClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    /// Connect to a test server.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let (ws, _response) = connect_async(url).await?;
        Ok(Self { ws })
    }

    /// Send a raw text frame.
    pub async fn send_raw(&mut self, text: &str) -> anyhow::Result<()> {
        self.ws.send(Message::Text(text.to_owned())).await?;
        Ok(())
    }

    /// Send a JSON value as a text frame.
    pub async fn send_json(&mut self, value: &Value) -> anyhow::Result<()> {
        self.send_raw(&value.to_string()).await
    }

    /// Claim `id` and give the relay time to record it.
    pub async fn register(&mut self, id: &str) -> anyhow::Result<()> {
        self.send_raw(&encode_registration(id)).await?;
        tokio::time::sleep(SETTLE).await;
        Ok(())
    }

    /// Receive a single JSON frame from the server.
    pub async fn recv_json(&mut self) -> anyhow::Result<Value> {
        self.recv_json_timeout(Duration::from_secs(5)).await
    }

    /// Receive a JSON frame with a timeout, skipping control frames.
    pub async fn recv_json_timeout(&mut self, dur: Duration) -> anyhow::Result<Value> {
        loop {
            let msg = timeout(dur, self.ws.next())
                .await?
                .ok_or_else(|| anyhow::anyhow!("connection closed"))??;
            match msg {
                Message::Text(text) => return Ok(serde_json::from_str(&text)?),
                Message::Binary(bytes) => return Ok(serde_json::from_slice(&bytes)?),
                Message::Close(frame) => anyhow::bail!("connection closed: {frame:?}"),
                _ => continue,
            }
        }
    }

    /// Assert that nothing arrives within `dur`.
    pub async fn expect_silence(&mut self, dur: Duration) {
        if let Ok(frame) = self.recv_json_timeout(dur).await {
            panic!("expected no frame, got {frame}");
        }
    }

    /// Drop the TCP connection without a Close frame.
    pub async fn disconnect_abruptly(mut self) -> anyhow::Result<()> {
        use tokio::io::AsyncWriteExt;
        if let MaybeTlsStream::Plain(tcp) = self.ws.get_mut() {
            tcp.shutdown().await?;
        }
        drop(self.ws);
        Ok(())
    }

    /// Close the connection cleanly.
    pub async fn close(mut self) -> anyhow::Result<()> {
        self.ws.close(None).await?;
        // Drain until the server acknowledges.
        while let Some(Ok(_)) = self.ws.next().await {}
        Ok(())
    }
}
