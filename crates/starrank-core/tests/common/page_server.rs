//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves fixed pages, error statuses and redirects by request path. Every
//! response closes the connection; unknown paths get 404.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
enum Route {
    Page { status: u16, body: Vec<u8> },
    Redirect { location: String },
    /// Redirect to the same port on another host name.
    RedirectToHost { host: String, path: String },
}

#[derive(Debug, Default)]
pub struct PageServer {
    routes: HashMap<String, Route>,
}

impl PageServer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, path: &str, body: impl Into<Vec<u8>>) -> Self {
        self.status(path, 200, body)
    }

    pub fn status(mut self, path: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(
            path.to_string(),
            Route::Page {
                status,
                body: body.into(),
            },
        );
        self
    }

    pub fn redirect(mut self, path: &str, location: &str) -> Self {
        self.routes.insert(
            path.to_string(),
            Route::Redirect {
                location: location.to_string(),
            },
        );
        self
    }

    pub fn redirect_to_host(mut self, path: &str, host: &str, target_path: &str) -> Self {
        self.routes.insert(
            path.to_string(),
            Route::RedirectToHost {
                host: host.to_string(),
                path: target_path.to_string(),
            },
        );
        self
    }

    /// Starts serving in a background thread. Returns the base URL without a
    /// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
    pub fn start(self) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let routes = Arc::new(self.routes);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let routes = Arc::clone(&routes);
                thread::spawn(move || handle(stream, &routes, port));
            }
        });
        format!("http://127.0.0.1:{}", port)
    }
}

/// Repository page markup with the star counter the way GitHub renders it.
pub fn star_page(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>repo</title></head><body>
<a href="stargazers" class="Link--secondary">
  <svg class="octicon octicon-star"></svg>
  <span id="repo-stars-counter-star" title="{title}" data-view-component="true" class="Counter">1.2k</span>
</a></body></html>"#
    )
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, port: u16) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, path) = parse_request_line(request);
    if !method.eq_ignore_ascii_case("GET") {
        let _ = write_response(&mut stream, 405, &[], b"");
        return;
    }

    let _ = match routes.get(path) {
        Some(Route::Page { status, body }) => write_response(&mut stream, *status, &[], body),
        Some(Route::Redirect { location }) => {
            write_response(&mut stream, 302, &[("Location", location.as_str())], b"")
        }
        Some(Route::RedirectToHost { host, path }) => {
            let location = format!("http://{}:{}{}", host, port, path);
            write_response(&mut stream, 302, &[("Location", location.as_str())], b"")
        }
        None => write_response(&mut stream, 404, &[], b"not found"),
    };
}

fn write_response(
    stream: &mut TcpStream,
    status: u16,
    headers: &[(&str, &str)],
    body: &[u8],
) -> std::io::Result<()> {
    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n",
        status,
        reason(status),
        body.len()
    );
    for (name, value) in headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str("\r\n");
    stream.write_all(head.as_bytes())?;
    stream.write_all(body)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        404 => "Not Found",
        405 => "Method Not Allowed",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Returns (method, path) from the request line.
fn parse_request_line(request: &str) -> (&str, &str) {
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("/");
    (method, path)
}
