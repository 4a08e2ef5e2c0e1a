//! Minimal HTTP/1.1 server speaking the two backend endpoints for integration tests.
//!
//! `/api/search-resolutions` answers from a fixed catalogue; `/api/download`
//! streams `body` in two writes with Content-Length and Content-Disposition.
//! A download URL containing `latin1` gets a filename with a raw 0xE9 byte.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    /// Lowercased header block.
    pub headers: String,
    pub body: serde_json::Value,
}

pub struct ApiServer {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ApiServer {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts the server in a background thread; it runs until the process exits.
pub fn start(body: Vec<u8>) -> ApiServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let recorded = Arc::clone(&recorded);
            thread::spawn(move || handle(stream, &body, &recorded));
        }
    });
    ApiServer { base_url: format!("http://127.0.0.1:{}/", port), requests }
}

fn read_request(stream: &mut TcpStream) -> Option<(String, String, Vec<u8>)> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&data[..header_end]).to_string();
    let mut lines = head.lines();
    let path = lines.next()?.split_whitespace().nth(1)?.to_string();
    let headers = lines.collect::<Vec<_>>().join("\n").to_ascii_lowercase();
    let content_length = headers
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = data[header_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buf[..n]);
    }
    Some((path, headers, body))
}

fn json_response(stream: &mut TcpStream, status: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

fn handle(mut stream: TcpStream, file: &[u8], recorded: &Mutex<Vec<RecordedRequest>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let Some((path, headers, body)) = read_request(&mut stream) else {
        return;
    };
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    recorded.lock().unwrap().push(RecordedRequest { path: path.clone(), headers, body: json.clone() });

    let url = json.get("url").and_then(|v| v.as_str()).unwrap_or("").trim().to_string();
    match path.as_str() {
        "/api/search-resolutions" => {
            if url.is_empty() {
                json_response(&mut stream, "400 Bad Request", r#"{"error":"URL is required"}"#);
            } else if url.contains("missing") {
                json_response(
                    &mut stream,
                    "400 Bad Request",
                    r#"{"error":"Failed to fetch video info: Video unavailable"}"#,
                );
            } else if url.contains("crash") {
                let _ = stream.write_all(
                    b"HTTP/1.1 500 Internal Server Error\r\nContent-Type: text/html\r\nContent-Length: 5\r\nConnection: close\r\n\r\noops!",
                );
            } else {
                json_response(
                    &mut stream,
                    "200 OK",
                    r#"{"resolutions":["1080p","720p","360p"],"title":"Test Clip","duration":3723.5,"thumbnail":"https://i.ytimg.com/vi/x/hq.jpg","count":3}"#,
                );
            }
        }
        "/api/download" => {
            let kind = json.get("type").and_then(|v| v.as_str()).unwrap_or("Video");
            let resolution = json.get("resolution").and_then(|v| v.as_str()).unwrap_or("");
            if kind == "Video" && !resolution.ends_with('p') {
                json_response(&mut stream, "400 Bad Request", r#"{"error":"Resolution required for video"}"#);
                return;
            }
            let ext = if kind == "Audio" { "mp3" } else { "mp4" };
            let mut head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nContent-Disposition: attachment; filename=\"",
                file.len()
            )
            .into_bytes();
            // Titles go out as raw latin-1 bytes, unencoded.
            if url.contains("latin1") {
                head.extend_from_slice(b"Caf\xE9");
            } else {
                head.extend_from_slice(b"Test Clip");
            }
            head.extend_from_slice(format!("_{}.{}\"\r\nConnection: close\r\n\r\n", resolution, ext).as_bytes());
            let _ = stream.write_all(&head);
            let mid = file.len() / 2;
            let _ = stream.write_all(&file[..mid]);
            let _ = stream.flush();
            let _ = stream.write_all(&file[mid..]);
        }
        _ => json_response(&mut stream, "404 Not Found", r#"{"error":"Page not found"}"#),
    }
}
