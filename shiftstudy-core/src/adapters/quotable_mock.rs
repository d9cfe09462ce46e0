//! Mock Quotable server for testing
//!
//! Serves canned responses on a random local port so the quote client and
//! QuoteService can be tested without network access:
//! - GET /random returns { _id, content, author, tags }

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// What the mock server answers with
#[derive(Debug, Clone, Copy)]
pub enum MockMode {
    /// A valid quote
    Quote,
    /// HTTP 500
    ServerError,
    /// 200 with a body that is not a quote
    Malformed,
    /// A valid quote after the given delay in milliseconds
    Slow(u64),
}

/// Mock quote server for testing
pub struct MockQuoteServer {
    port: u16,
    running: Arc<AtomicBool>,
    last_path: Arc<Mutex<Option<String>>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl MockQuoteServer {
    /// Start a new mock server on a random available port
    pub fn start(mode: MockMode) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let last_path = Arc::new(Mutex::new(None));

        // Non-blocking so the accept loop can notice shutdown
        listener.set_nonblocking(true)?;

        let running_clone = running.clone();
        let last_path_clone = last_path.clone();
        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let last_path = last_path_clone.clone();
                        thread::spawn(move || handle_connection(stream, mode, &last_path));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            last_path,
            thread_handle: Some(thread_handle),
        })
    }

    /// Get the base URL for this mock server
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Request path (with query string) of the most recent request
    pub fn last_path(&self) -> Option<String> {
        self.last_path.lock().ok().and_then(|p| p.clone())
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockQuoteServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_connection(mut stream: TcpStream, mode: MockMode, last_path: &Mutex<Option<String>>) {
    // Accepted sockets may inherit non-blocking mode on some platforms
    let _ = stream.set_nonblocking(false);

    let mut buffer = [0; 4096];
    let Ok(n) = stream.read(&mut buffer) else {
        return;
    };
    let request = String::from_utf8_lossy(&buffer[..n]);

    let first_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 2 {
        send_response(&mut stream, 400, "Bad Request", r#"{"error": "Invalid request"}"#);
        return;
    }

    let path = parts[1];
    if let Ok(mut last) = last_path.lock() {
        *last = Some(path.to_string());
    }

    let path_without_query = path.split('?').next().unwrap_or(path);
    if parts[0] != "GET" || path_without_query != "/random" {
        send_response(&mut stream, 404, "Not Found", r#"{"error": "Not found"}"#);
        return;
    }

    let quote = r#"{"_id":"mock1","content":"Study hard, rest well.","author":"Mock Author","tags":["education"]}"#;
    match mode {
        MockMode::Quote => send_response(&mut stream, 200, "OK", quote),
        MockMode::ServerError => send_response(
            &mut stream,
            500,
            "Internal Server Error",
            r#"{"error": "boom"}"#,
        ),
        MockMode::Malformed => send_response(&mut stream, 200, "OK", r#"{"unexpected": true}"#),
        MockMode::Slow(delay_ms) => {
            thread::sleep(Duration::from_millis(delay_ms));
            send_response(&mut stream, 200, "OK", quote);
        }
    }
}

fn send_response(stream: &mut TcpStream, status: u16, status_text: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
