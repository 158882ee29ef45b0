//! Loopback HTTP fake for driving the real REST clients in tests.
//!
//! Each accepted connection gets the next canned response and is closed, so
//! the client opens one connection per request. The recorded requests come
//! back from `finish` once every canned response has been served.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::config::BackendConfig;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// e.g. `GET /projects/p/databases/(default)/documents/orders/a HTTP/1.1`
    pub request_line: String,
    /// Header names lowercased.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(key, _)| key == name).map(|(_, value)| value.as_str())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

pub struct FakeServer {
    pub base_url: String,
    handle: JoinHandle<Vec<RecordedRequest>>,
}

impl FakeServer {
    /// Serve `responses` in order, one per connection.
    pub async fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let mut recorded = Vec::new();
            for (status, body) in responses {
                let (mut stream, _) = listener.accept().await.unwrap();
                recorded.push(read_request(&mut stream).await);
                let reply = format!(
                    "HTTP/1.1 {status} FAKE\r\n\
                     content-type: application/json\r\n\
                     content-length: {}\r\n\
                     connection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(reply.as_bytes()).await.unwrap();
                stream.shutdown().await.ok();
            }
            recorded
        });
        Self { base_url, handle }
    }

    /// Config whose auth and document-store endpoints both point at this server.
    pub fn config(&self) -> BackendConfig {
        let base_url = self.base_url.clone();
        BackendConfig::from_lookup(move |key| match key {
            "REPAIRDESK_API_KEY" => Some("test-key".into()),
            "REPAIRDESK_PROJECT_ID" => Some("p".into()),
            "REPAIRDESK_AUTH_BASE_URL" | "REPAIRDESK_FIRESTORE_BASE_URL" => Some(base_url.clone()),
            _ => None,
        })
        .unwrap()
    }

    /// Wait until every canned response was served and return the requests.
    pub async fn finish(self) -> Vec<RecordedRequest> {
        self.handle.await.unwrap()
    }
}

async fn read_request(stream: &mut TcpStream) -> RecordedRequest {
    let mut raw = Vec::new();
    let mut chunk = [0_u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending headers");
        raw.extend_from_slice(&chunk[..n]);
        if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&raw[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next().unwrap_or_default().to_owned();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_ascii_lowercase(), value.trim().to_owned()))
        .collect();
    let content_length = headers
        .iter()
        .find(|(key, _)| key == "content-length")
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = raw[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await.unwrap();
        assert!(n > 0, "client closed before sending the body");
        body.extend_from_slice(&chunk[..n]);
    }

    RecordedRequest { request_line, headers, body: String::from_utf8_lossy(&body).into_owned() }
}
