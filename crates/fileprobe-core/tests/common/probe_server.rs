//! Minimal HTTP/1.1 server for probe integration tests.
//!
//! Serves a fixed route table keyed by request path. Unknown paths get a 404
//! with a small HTML body. Optionally delays every response, and records
//! every request path. [`start_silent`] accepts connections and never answers.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

const NOT_FOUND_BODY: &[u8] = b"<html><body><h1>404 Not Found</h1></body></html>";

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub reason: &'static str,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Advertise this `Content-Length`, send `body`, then hold the connection.
    pub stall: Option<(usize, Duration)>,
}

impl Route {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            reason: "OK",
            headers: Vec::new(),
            body: body.into(),
            stall: None,
        }
    }

    pub fn status(status: u16, reason: &'static str) -> Self {
        Self {
            status,
            reason,
            headers: Vec::new(),
            body: Vec::new(),
            stall: None,
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// A 200 that promises `declared` bytes, sends `body` and then goes quiet
    /// for `hold`.
    pub fn stalled(body: impl Into<Vec<u8>>, declared: usize, hold: Duration) -> Self {
        Self {
            stall: Some((declared, hold)),
            ..Self::ok(body)
        }
    }
}

#[derive(Debug, Default)]
pub struct ServerStats {
    requests: AtomicUsize,
    paths: Mutex<Vec<String>>,
}

impl ServerStats {
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Request paths in arrival order.
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

pub struct ProbeServer {
    /// e.g. "http://127.0.0.1:12345/"
    pub base: String,
    pub stats: Arc<ServerStats>,
}

/// Starts a server in a background thread serving `routes`. The server runs
/// until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> ProbeServer {
    start_with_delay(routes, Duration::ZERO)
}

/// Like `start` but sleeps `delay` before answering each request.
pub fn start_with_delay(routes: Vec<(&str, Route)>, delay: Duration) -> ProbeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, route)| (path.to_string(), route))
            .collect(),
    );
    let stats = Arc::new(ServerStats::default());
    let server_stats = Arc::clone(&stats);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let stats = Arc::clone(&server_stats);
            thread::spawn(move || handle(stream, &routes, &stats, delay));
        }
    });
    ProbeServer {
        base: format!("http://127.0.0.1:{}/", port),
        stats,
    }
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, stats: &ServerStats, delay: Duration) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    stats.requests.fetch_add(1, Ordering::SeqCst);
    stats.paths.lock().unwrap().push(path.clone());

    if !delay.is_zero() {
        thread::sleep(delay);
    }

    let not_found = Route {
        status: 404,
        reason: "Not Found",
        headers: vec![("Content-Type".into(), "text/html".into())],
        body: NOT_FOUND_BODY.to_vec(),
        stall: None,
    };
    let route = routes.get(&path).unwrap_or(&not_found);

    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        route.status,
        route.reason,
        route.stall.map_or(route.body.len(), |(declared, _)| declared)
    );
    for (name, value) in &route.headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&route.body);
    let _ = stream.flush();
    if let Some((_, hold)) = route.stall {
        thread::sleep(hold);
    }
}

pub struct SilentServer {
    pub port: u16,
    pub stats: Arc<ServerStats>,
}

/// Accepts TCP connections, counts them and never writes a byte. Each
/// connection is held for `hold`.
pub fn start_silent(hold: Duration) -> SilentServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let stats = Arc::new(ServerStats::default());
    let server_stats = Arc::clone(&stats);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            server_stats.requests.fetch_add(1, Ordering::SeqCst);
            thread::spawn(move || {
                let _held = stream;
                thread::sleep(hold);
            });
        }
    });
    SilentServer { port, stats }
}
