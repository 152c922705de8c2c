use kanban_core::{BoardSource, HttpBoardSource, JsonFileBoardSource, Priority, SourceError};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

/// Serves exactly one HTTP response on a loopback port and returns its URL.
fn serve_once(status_line: &'static str, body: String) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
        }
        let response = format!(
            "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
    });
    format!("http://{addr}/v1/board")
}

fn endpoint_payload() -> serde_json::Value {
    serde_json::json!({
        "tickets": [
            {
                "id": "CAM-1",
                "title": "Update User Profile Page UI",
                "tag": ["Feature request"],
                "userId": "usr-1",
                "status": "Todo",
                "priority": 4
            },
            {
                "id": "CAM-2",
                "title": "Add Multi-Language Support",
                "tag": ["Feature Request"],
                "userId": "usr-2",
                "status": "In progress",
                "priority": 3
            }
        ],
        "users": [
            { "id": "usr-1", "name": "Anoop Sharma", "available": false },
            { "id": "usr-2", "name": "Yogesh", "available": true }
        ]
    })
}

#[test]
fn file_source_decodes_endpoint_shape() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", endpoint_payload()).unwrap();

    let snapshot = JsonFileBoardSource::new(file.path())
        .fetch_snapshot()
        .unwrap();

    assert_eq!(snapshot.items.len(), 2);
    assert_eq!(snapshot.items[0].user_id, "usr-1");
    assert_eq!(snapshot.items[0].priority, Priority::Urgent);
    assert_eq!(snapshot.items[0].tags, vec!["Feature request".to_string()]);
    assert_eq!(snapshot.actors[0].name, "Anoop Sharma");
    assert!(!snapshot.actors[0].available);
}

#[test]
fn missing_file_is_reported_as_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");

    let err = JsonFileBoardSource::new(&path).fetch_snapshot().unwrap_err();
    assert!(matches!(err, SourceError::Io { .. }));
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn malformed_file_is_reported_as_decode_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{\"tickets\": 3}}").unwrap();

    let err = JsonFileBoardSource::new(file.path())
        .fetch_snapshot()
        .unwrap_err();
    assert!(matches!(err, SourceError::Decode(_)));
}

#[test]
fn http_source_decodes_served_payload() {
    let url = serve_once("HTTP/1.1 200 OK", endpoint_payload().to_string());
    let source = HttpBoardSource::new(url.clone()).unwrap();
    assert_eq!(source.url(), url);

    let snapshot = source.fetch_snapshot().unwrap();
    assert_eq!(snapshot.items.len(), 2);
    assert_eq!(snapshot.items[1].id, "CAM-2");
    assert_eq!(snapshot.items[1].priority, Priority::High);
    assert_eq!(snapshot.actors[1].name, "Yogesh");
}

#[test]
fn http_source_maps_non_success_status() {
    let url = serve_once("HTTP/1.1 503 Service Unavailable", String::new());

    let err = HttpBoardSource::new(url)
        .unwrap()
        .fetch_snapshot()
        .unwrap_err();
    assert!(matches!(err, SourceError::Status(503)), "unexpected error: {err}");
}

#[test]
fn http_source_maps_refused_connection_to_transport() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = HttpBoardSource::new(format!("http://{addr}/v1/board"))
        .unwrap()
        .fetch_snapshot()
        .unwrap_err();
    assert!(matches!(err, SourceError::Transport(_)), "unexpected error: {err}");
}

#[test]
fn http_source_rejects_out_of_range_priority_in_body() {
    let body = serde_json::json!({
        "tickets": [
            {"id": "CAM-9", "title": "x", "userId": "usr-1", "status": "Todo", "priority": 9}
        ],
        "users": [{"id": "usr-1", "name": "Alice"}]
    });
    let url = serve_once("HTTP/1.1 200 OK", body.to_string());

    let err = HttpBoardSource::new(url)
        .unwrap()
        .fetch_snapshot()
        .unwrap_err();
    assert!(matches!(
        err,
        SourceError::InvalidPriority { ref item_id, value: 9 } if item_id == "CAM-9"
    ));
}
