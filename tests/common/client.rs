//! Test console client.
//!
//! Raw TCP client that frames exchanges on the console prompt, since the
//! prompt is not line-terminated.

use anyhow::{Context as _, bail};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

const PROMPT: &str = "> ";
const READ_TIMEOUT: Duration = Duration::from_secs(5);

pub struct TestClient {
    stream: TcpStream,
    buf: Vec<u8>,
}

impl TestClient {
    #[allow(dead_code)]
    pub async fn connect(addr: SocketAddr) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self {
            stream,
            buf: Vec::new(),
        })
    }

    /// Connect and consume the initial prompt.
    #[allow(dead_code)]
    pub async fn connect_ready(addr: SocketAddr) -> anyhow::Result<Self> {
        let mut client = Self::connect(addr).await?;
        client.read_until(PROMPT).await?;
        Ok(client)
    }

    #[allow(dead_code)]
    pub async fn send_raw(&mut self, data: &str) -> anyhow::Result<()> {
        self.stream.write_all(data.as_bytes()).await?;
        Ok(())
    }

    /// Send one command line and collect everything up to the next prompt.
    #[allow(dead_code)]
    pub async fn command(&mut self, line: &str) -> anyhow::Result<String> {
        self.send_raw(&format!("{line}\n")).await?;
        self.read_until(PROMPT).await
    }

    /// Read until `needle` appears; returns everything up to and including it.
    #[allow(dead_code)]
    pub async fn read_until(&mut self, needle: &str) -> anyhow::Result<String> {
        loop {
            if let Some(pos) = find(&self.buf, needle.as_bytes()) {
                let consumed: Vec<u8> = self.buf.drain(..pos + needle.len()).collect();
                return Ok(String::from_utf8_lossy(&consumed).into_owned());
            }
            let mut chunk = [0u8; 1024];
            let n = timeout(READ_TIMEOUT, self.stream.read(&mut chunk))
                .await
                .context("timed out waiting for console output")??;
            if n == 0 {
                bail!("connection closed while waiting for {needle:?}");
            }
            self.buf.extend_from_slice(&chunk[..n]);
        }
    }

    /// Expect the server to close the connection.
    #[allow(dead_code)]
    pub async fn expect_eof(&mut self) -> anyhow::Result<()> {
        loop {
            let mut chunk = [0u8; 1024];
            let n = timeout(READ_TIMEOUT, self.stream.read(&mut chunk))
                .await
                .context("timed out waiting for the server to close")??;
            if n == 0 {
                return Ok(());
            }
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}
