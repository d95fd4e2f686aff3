use std::fs;
use std::io::{Read, Write};
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tempfile::TempDir;

use super::*;
use crate::config::test_config_at;

const TIMEOUT: Duration = Duration::from_secs(5);

fn site(temp: &TempDir) -> SiteConfig {
    let config = test_config_at(temp.path());
    let post = config.build.output.join("2024/01/02/hello");
    fs::create_dir_all(&post).unwrap();
    fs::write(
        config.build.output.join("index.html"),
        "<html><body>home</body></html>",
    )
    .unwrap();
    fs::write(post.join("index.html"), "<html><body>post</body></html>").unwrap();
    fs::write(config.build.output.join("style.css"), "body{}").unwrap();
    config
}

fn bind_local() -> (Server, SocketAddr) {
    lifecycle::bind_with_retry(IpAddr::V4(Ipv4Addr::LOCALHOST), 0).unwrap()
}

/// Serve exactly one request with `handle_request`.
fn serve_one(config: SiteConfig) -> (SocketAddr, JoinHandle<()>) {
    let (server, addr) = bind_local();
    let handle = thread::spawn(move || {
        let request = server.recv().unwrap();
        handle_request(request, &config).unwrap();
    });
    (addr, handle)
}

fn connect(addr: SocketAddr) -> TcpStream {
    let stream = TcpStream::connect(addr).unwrap();
    stream.set_read_timeout(Some(TIMEOUT)).unwrap();
    stream
}

fn fetch(addr: SocketAddr, method: &str, path: &str) -> String {
    let mut stream = connect(addr);
    write!(
        stream,
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"
    )
    .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).unwrap();
    response
}

fn read_until(stream: &mut TcpStream, needle: &str, buf: &mut String) {
    let mut chunk = [0u8; 512];
    while !buf.contains(needle) {
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "stream closed before {needle:?}; got {buf:?}");
        buf.push_str(&String::from_utf8_lossy(&chunk[..n]));
    }
}

#[test]
fn test_directory_serves_index_with_reload_client() {
    let temp = TempDir::new().unwrap();
    let (addr, handle) = serve_one(site(&temp));

    let response = fetch(addr, "GET", "/2024/01/02/hello/");
    handle.join().unwrap();

    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains("text/html"));
    assert!(response.contains("post"));
    assert!(response.contains(EVENTS_PATH));
}

#[test]
fn test_no_reload_client_without_watch() {
    let temp = TempDir::new().unwrap();
    let mut config = site(&temp);
    config.serve.watch = false;
    let (addr, handle) = serve_one(config);

    let response = fetch(addr, "GET", "/");
    handle.join().unwrap();

    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("home"));
    assert!(!response.contains(EVENTS_PATH));
}

#[test]
fn test_static_file_mime() {
    let temp = TempDir::new().unwrap();
    let (addr, handle) = serve_one(site(&temp));

    let response = fetch(addr, "GET", "/style.css?v=2");
    handle.join().unwrap();

    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("text/css"));
    assert!(response.ends_with("body{}"));
}

#[test]
fn test_missing_is_plain_404() {
    let temp = TempDir::new().unwrap();
    let (addr, handle) = serve_one(site(&temp));

    let response = fetch(addr, "GET", "/nope/");
    handle.join().unwrap();

    assert!(response.starts_with("HTTP/1.1 404"));
    assert!(response.contains("text/plain"));
    assert!(response.ends_with("404 Not Found"));
}

#[test]
fn test_head_has_no_body() {
    let temp = TempDir::new().unwrap();
    let (addr, handle) = serve_one(site(&temp));

    let response = fetch(addr, "HEAD", "/");
    handle.join().unwrap();

    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(!response.contains("home"));
}

#[test]
fn test_post_not_allowed() {
    let temp = TempDir::new().unwrap();
    let (addr, handle) = serve_one(site(&temp));

    let response = fetch(addr, "POST", "/");
    handle.join().unwrap();

    assert!(response.starts_with("HTTP/1.1 405"));
    assert!(response.contains("GET, HEAD"));
}

#[test]
fn test_event_stream_delivers_reload() {
    let (server, addr) = bind_local();
    let hub = Arc::new(ReloadHub::new(4));

    let server_hub = Arc::clone(&hub);
    let accept = thread::spawn(move || {
        let request = server.recv().unwrap();
        assert!(is_events_request(&request));
        events::spawn_event_stream(request, &server_hub, Duration::from_secs(30));
        // Keep the listener alive for the rest of the test
        server
    });

    let mut stream = connect(addr);
    write!(
        stream,
        "GET {EVENTS_PATH} HTTP/1.1\r\nHost: localhost\r\nAccept: text/event-stream\r\n\r\n"
    )
    .unwrap();
    let _server = accept.join().unwrap();

    let mut received = String::new();
    read_until(&mut stream, "data: connected\n\n", &mut received);
    assert!(received.starts_with("HTTP/1.1 200"));
    assert!(received.contains("Content-Type: text/event-stream"));
    assert!(!received.contains("data: reload"));
    assert_eq!(hub.client_count(), 1);

    hub.publish();
    read_until(&mut stream, "data: reload\n\n", &mut received);
    assert_eq!(received.matches("data: reload").count(), 1);

    hub.close();
}

#[test]
fn test_closed_client_is_released_at_keepalive() {
    let (server, addr) = bind_local();
    let hub = Arc::new(ReloadHub::new(4));

    let server_hub = Arc::clone(&hub);
    let accept = thread::spawn(move || {
        let request = server.recv().unwrap();
        events::spawn_event_stream(request, &server_hub, Duration::from_millis(50));
        server
    });

    let mut stream = connect(addr);
    write!(stream, "GET {EVENTS_PATH} HTTP/1.1\r\nHost: localhost\r\n\r\n").unwrap();
    let _server = accept.join().unwrap();

    let mut received = String::new();
    read_until(&mut stream, "data: connected\n\n", &mut received);
    assert_eq!(hub.client_count(), 1);
    drop(stream);

    let deadline = std::time::Instant::now() + TIMEOUT;
    while hub.client_count() > 0 {
        assert!(std::time::Instant::now() < deadline, "closed client never released");
        thread::sleep(Duration::from_millis(20));
    }
}

#[test]
fn test_bind_retries_next_port() {
    let (_first, taken) = bind_local();
    let (_second, addr) =
        lifecycle::bind_with_retry(taken.ip(), taken.port()).unwrap();
    assert_ne!(addr.port(), taken.port());
}
