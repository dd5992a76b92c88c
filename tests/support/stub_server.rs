// ABOUTME: Tiny HTTP/1.1 server for tests.
// ABOUTME: Answers with queued status codes and records every request it sees.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Debug)]
struct Script {
    queued: VecDeque<u16>,
    fallback: u16,
    requests: Vec<RecordedRequest>,
}

/// A running stub server. Stops when dropped.
pub struct StubServer {
    addr: SocketAddr,
    script: Arc<Mutex<Script>>,
    task: JoinHandle<()>,
}

impl StubServer {
    /// Always answer `status`.
    pub async fn always(status: u16) -> Self {
        Self::sequence(Vec::new(), status).await
    }

    /// Answer with `statuses` in order, then `fallback` forever.
    pub async fn sequence(statuses: Vec<u16>, fallback: u16) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        Self::serve(listener, statuses, fallback)
    }

    /// Serve on a specific port on all interfaces.
    pub async fn on_port(port: u16, status: u16) -> std::io::Result<Self> {
        let listener = TcpListener::bind(("0.0.0.0", port)).await?;
        Ok(Self::serve(listener, Vec::new(), status))
    }

    fn serve(listener: TcpListener, statuses: Vec<u16>, fallback: u16) -> Self {
        let addr = listener.local_addr().unwrap();
        let script = Arc::new(Mutex::new(Script {
            queued: statuses.into(),
            fallback,
            requests: Vec::new(),
        }));

        let accept_script = script.clone();
        let task = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let script = accept_script.clone();
                tokio::spawn(async move {
                    let _ = handle(stream, script).await;
                });
            }
        });

        Self { addr, script, task }
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.addr.port())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.script.lock().requests.clone()
    }

    pub fn hits(&self) -> usize {
        self.script.lock().requests.len()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn handle(mut stream: TcpStream, script: Arc<Mutex<Script>>) -> std::io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_header_end(&buf) {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    let mut content_type = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.parse().unwrap_or(0),
                "content-type" => content_type = Some(value.to_string()),
                _ => {}
            }
        }
    }

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    let status = {
        let mut script = script.lock();
        script.requests.push(RecordedRequest {
            method,
            path,
            content_type,
            body: String::from_utf8_lossy(&body).into_owned(),
        });
        let fallback = script.fallback;
        script.queued.pop_front().unwrap_or(fallback)
    };

    let response = format!(
        "HTTP/1.1 {status} Stub\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
