use near_rpc_tables::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// What the stub server saw for one request
#[derive(Debug, Clone)]
struct Captured {
    content_type: Option<String>,
    body: Value,
}

/// Single-threaded HTTP server answering each connection with the next canned
/// response, then closing it
struct StubServer {
    url: String,
    seen: Arc<Mutex<Vec<Captured>>>,
    handle: Option<JoinHandle<()>>,
}

impl StubServer {
    fn start(responses: Vec<(u16, String)>) -> Self {
        Self::start_with_deadline(responses, ACCEPT_DEADLINE)
    }

    /// Like `start`, but stops waiting for connections after `wait`
    fn start_with_deadline(responses: Vec<(u16, String)>, wait: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind stub server");
        let url = format!("http://{}", listener.local_addr().unwrap());
        let seen = Arc::new(Mutex::new(Vec::new()));

        listener
            .set_nonblocking(true)
            .expect("Failed to make stub listener nonblocking");

        let log = Arc::clone(&seen);
        let handle = thread::spawn(move || {
            let deadline = Instant::now() + wait;
            for (status, body) in responses {
                let stream = match accept_before(&listener, deadline) {
                    Some(stream) => stream,
                    // fewer requests than canned responses; let the caller see the count
                    None => return,
                };
                if let Some(captured) = serve(stream, status, &body) {
                    log.lock().unwrap().push(captured);
                }
            }
        });

        Self {
            url,
            seen,
            handle: Some(handle),
        }
    }

    /// Requests served so far; waits until the accept deadline for the rest
    fn hits(&mut self) -> Vec<Captured> {
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap();
        }
        self.seen.lock().unwrap().clone()
    }
}

/// Upper bound on how long the stub waits for each test's requests
const ACCEPT_DEADLINE: Duration = Duration::from_secs(10);

fn accept_before(listener: &TcpListener, deadline: Instant) -> Option<TcpStream> {
    loop {
        match listener.accept() {
            Ok((stream, _)) => {
                stream.set_nonblocking(false).ok()?;
                stream.set_read_timeout(Some(ACCEPT_DEADLINE)).ok()?;
                return Some(stream);
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock && Instant::now() < deadline => {
                thread::sleep(Duration::from_millis(5));
            }
            Err(_) => return None,
        }
    }
}

fn serve(stream: TcpStream, status: u16, body: &str) -> Option<Captured> {
    let mut reader = BufReader::new(stream.try_clone().ok()?);
    let mut content_length = 0;
    let mut content_type = None;

    let mut line = String::new();
    reader.read_line(&mut line).ok()?;
    loop {
        line.clear();
        reader.read_line(&mut line).ok()?;
        let header = line.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            match name.trim().to_ascii_lowercase().as_str() {
                "content-length" => content_length = value.trim().parse().unwrap_or(0),
                "content-type" => content_type = Some(value.trim().to_string()),
                _ => {}
            }
        }
    }

    let mut request_body = vec![0u8; content_length];
    reader.read_exact(&mut request_body).ok()?;

    let mut stream = stream;
    let response = format!(
        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).ok()?;
    stream.flush().ok()?;

    Some(Captured {
        content_type,
        body: serde_json::from_slice(&request_body).unwrap_or(Value::Null),
    })
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(5),
    }
}

fn client_for(url: &str) -> NearClient {
    let config = ClientConfig::new(Endpoint::parse(url).unwrap())
        .with_timeout(Duration::from_secs(5))
        .with_retry(fast_retry());
    NearClient::from_config(config).unwrap()
}

fn ok_body(result: Value) -> String {
    json!({"jsonrpc": "2.0", "id": "near-rpc-tables", "result": result}).to_string()
}

fn error_body() -> String {
    json!({
        "jsonrpc": "2.0",
        "id": "near-rpc-tables",
        "error": {
            "name": "HANDLER_ERROR",
            "cause": {"name": "UNKNOWN_ACCOUNT", "info": {"requested_account_id": "ghost.near"}},
            "code": -32000,
            "message": "Server error",
            "data": "account ghost.near does not exist while viewing"
        }
    })
    .to_string()
}

fn status_result() -> Value {
    json!({
        "chain_id": "testnet",
        "protocol_version": 63,
        "version": {"version": "1.36.0", "build": "abc123"},
        "sync_info": {
            "latest_block_height": 150000000,
            "latest_block_hash": "9Mjpcnw4UEvbiAiqnq2b3ZnETPAS2zVUWgCPUgYMAXUN",
            "latest_block_time": "2023-11-02T10:11:12.123456789Z",
            "syncing": false
        },
        "validators": [{"account_id": "a.poolv1.near"}]
    })
}

#[test]
fn test_successful_call_sends_json_rpc_envelope() {
    let mut server = StubServer::start(vec![(200, ok_body(status_result()))]);
    let client = client_for(&server.url);

    let table = client.status().expect("status failed");
    assert_eq!(table.get(0, "chain_id").unwrap().as_text(), Some("testnet"));
    assert_eq!(table.get(0, "validator_count").unwrap().as_i64(), Some(1));

    let hits = server.hits();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(hits[0].body["jsonrpc"], json!("2.0"));
    assert_eq!(hits[0].body["id"], json!("near-rpc-tables"));
    assert_eq!(hits[0].body["method"], json!("status"));
    assert_eq!(hits[0].body["params"], json!({}));
}

#[test]
fn test_server_errors_are_retried_until_exhausted() {
    let mut server = StubServer::start(vec![
        (500, "oops".to_string()),
        (502, "bad gateway".to_string()),
        (503, "unavailable".to_string()),
    ]);
    let client = client_for(&server.url);

    let err = client.status().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("after 3 attempts"));
    assert_eq!(server.hits().len(), 3);
}

#[test]
fn test_retry_recovers_after_transient_failure() {
    let mut server = StubServer::start(vec![
        (500, "oops".to_string()),
        (200, ok_body(status_result())),
    ]);
    let client = client_for(&server.url);

    let table = client.status().expect("second attempt should succeed");
    assert_eq!(
        table.get(0, "latest_block_height").unwrap().as_i64(),
        Some(150000000)
    );
    assert_eq!(server.hits().len(), 2);
}

#[test]
fn test_error_envelope_is_not_retried() {
    let mut server = StubServer::start(vec![(200, error_body())]);
    let client = client_for(&server.url);

    let err = client.view_account("ghost.near", None, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(err.method(), Some("query"));
    match err {
        NearError::Protocol { code, cause, .. } => {
            assert_eq!(code, Some(-32000));
            assert_eq!(cause.as_deref(), Some("UNKNOWN_ACCOUNT"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(server.hits().len(), 1);
}

#[test]
fn test_error_envelope_on_server_status_is_final() {
    let mut server = StubServer::start(vec![(500, error_body())]);
    let client = client_for(&server.url);

    let err = client.view_account("ghost.near", None, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(server.hits().len(), 1);
}

#[test]
fn test_client_errors_are_not_retried() {
    let mut server = StubServer::start(vec![(404, "not found".to_string())]);
    let client = client_for(&server.url);

    let err = client.status().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(!err.is_retryable());
    match err {
        NearError::Transport { status, message, .. } => {
            assert_eq!(status, Some(404));
            assert!(message.contains("not found"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(server.hits().len(), 1);
}

#[test]
fn test_send_tx_is_attempted_once() {
    let mut server = StubServer::start(vec![(503, "unavailable".to_string())]);
    let client = client_for(&server.url);

    let err = client.send_tx("AAAA", Some("NONE")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);

    let hits = server.hits();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].body["method"], json!("send_tx"));
    assert_eq!(hits[0].body["params"]["wait_until"], json!("NONE"));
}

#[test]
fn test_non_json_body_is_a_format_error() {
    let mut server = StubServer::start(vec![(200, "<html>maintenance</html>".to_string())]);
    let client = client_for(&server.url);

    let err = client.status().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert!(err.to_string().contains("maintenance"));
    assert_eq!(server.hits().len(), 1);
}

#[test]
fn test_refused_connection_is_a_transport_error() {
    let url = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };
    let client = client_for(&url);

    let err = client.status().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.method(), Some("status"));
}

#[test]
fn test_unused_responses_do_not_block_the_count() {
    let started = Instant::now();
    let mut server = StubServer::start_with_deadline(
        vec![(200, ok_body(status_result())), (200, ok_body(status_result()))],
        Duration::from_millis(300),
    );
    let client = client_for(&server.url);

    client.status().expect("status failed");
    assert_eq!(server.hits().len(), 1);
    assert!(started.elapsed() < ACCEPT_DEADLINE);
}
