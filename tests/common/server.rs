//! Test server management.
//!
//! Spawns and manages sigrelayd instances for integration testing.

use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::sleep;

/// A test server instance.
pub struct TestServer {
    child: Child,
    port: u16,
    _data_dir: TempDir,
}

impl TestServer {
    /// Spawn a server on a free loopback port with the default test config.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with("").await
    }

    /// Spawn a server whose config file ends with `extra` (extra TOML
    /// sections such as `[listen]` keys are appended after the defaults).
    pub async fn spawn_with(extra: &str) -> anyhow::Result<Self> {
        let port = free_port()?;
        let data_dir = tempfile::tempdir()?;
        let config_path = data_dir.path().join("config.toml");

        let config_content = format!(
            r#"
[server]
name = "test.relay"
metrics_port = 0

[log]
filter = "sigrelayd=debug"

[listen]
address = "127.0.0.1:{port}"
{extra}
"#
        );
        std::fs::write(&config_path, config_content)?;

        let child = spawn_binary(&config_path)?;
        let server = Self {
            child,
            port,
            _data_dir: data_dir,
        };

        // Wait for server to start listening
        server.wait_until_ready().await?;

        Ok(server)
    }

    /// Wait until the server is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 5 seconds")
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// WebSocket URL of the relay.
    pub fn ws_url(&self) -> String {
        format!("ws://{}/", self.address())
    }

    /// Plain HTTP URL of the relay (health check).
    pub fn http_url(&self) -> String {
        format!("http://{}/", self.address())
    }

    /// Create a new test client connected to this server.
    pub async fn connect(&self) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.ws_url()).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Kill the server process
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn spawn_binary(config_path: &Path) -> anyhow::Result<Child> {
    let child = Command::new(env!("CARGO_BIN_EXE_sigrelayd"))
        .arg(config_path)
        .env_remove("PORT")
        .env_remove("BIND_ADDRESS")
        .stdin(Stdio::null())
        .spawn()?;
    Ok(child)
}

/// Ask the OS for an unused port.
fn free_port() -> anyhow::Result<u16> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}
