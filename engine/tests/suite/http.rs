use pretty_assertions::assert_eq;
use std::net::TcpListener;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;
use strata_engine::EngineConfig;
use strata_engine::EngineError;
use strata_engine::HttpSearchEngine;
use strata_engine::SearchEngine;
use strata_protocol::EngineRequest;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

const SOLR_REPLY: &str = r#"{
    "response": {"numFound": 2, "start": 0, "docs": [{"uuid": "a"}, {"uuid": "b"}]},
    "facet_counts": {"facet_fields": {"item_type": ["subjects", 2]}}
}"#;

struct Captured {
    url: String,
    body: String,
}

/// Serve a single request, then report what the client sent.
fn serve_once(status: u16, reply: &'static str, delay: Duration) -> (String, JoinHandle<Captured>) {
    let server = Server::http("127.0.0.1:0").expect("bind test server");
    let addr = server
        .server_addr()
        .to_ip()
        .expect("test server has an ip address");
    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("receive request");
        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("read request body");
        let url = request.url().to_string();
        thread::sleep(delay);
        let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
            .expect("valid header");
        let response = Response::from_string(reply)
            .with_status_code(status)
            .with_header(header);
        let _ = request.respond(response);
        Captured { url, body }
    });
    (format!("http://{addr}/solr/strata"), handle)
}

fn engine(base_url: String, timeout_ms: u64) -> HttpSearchEngine {
    HttpSearchEngine::new(&EngineConfig {
        base_url,
        timeout_ms,
    })
    .expect("engine")
}

fn request() -> EngineRequest {
    let mut request = EngineRequest {
        rows: 5,
        ..EngineRequest::default()
    };
    request.filter_clauses.push("root___context_id:turkey".to_string());
    request.facet_fields.insert("item_type".to_string());
    request
}

#[test]
fn posts_form_parameters_to_select() {
    let (base_url, server) = serve_once(200, SOLR_REPLY, Duration::ZERO);
    let response = engine(base_url, 5_000).execute(&request()).expect("response");
    assert_eq!(response.num_found, 2);
    assert_eq!(response.docs.len(), 2);
    assert_eq!(response.facet("item_type").map(<[_]>::len), Some(1));

    let captured = server.join().expect("server thread");
    assert_eq!(captured.url, "/solr/strata/select");
    assert!(captured.body.contains("fq=root___context_id%3Aturkey"));
    assert!(captured.body.contains("facet.field=item_type"));
    assert!(captured.body.contains("rows=5"));
    assert!(captured.body.contains("wt=json"));
}

#[test]
fn non_success_status_is_reported() {
    let (base_url, server) = serve_once(500, "index exploded", Duration::ZERO);
    let err = engine(base_url, 5_000).execute(&request()).expect_err("status");
    match err {
        EngineError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "index exploded");
        }
        other => panic!("unexpected error: {other}"),
    }
    server.join().expect("server thread");
}

#[test]
fn unreadable_body_is_a_decode_error() {
    let (base_url, server) = serve_once(200, "<html>not solr</html>", Duration::ZERO);
    let err = engine(base_url, 5_000).execute(&request()).expect_err("decode");
    assert!(matches!(err, EngineError::Decode(_)));
    server.join().expect("server thread");
}

#[test]
fn slow_index_times_out() {
    let (base_url, server) = serve_once(200, SOLR_REPLY, Duration::from_millis(1_500));
    let err = engine(base_url, 200).execute(&request()).expect_err("timeout");
    assert!(matches!(err, EngineError::Timeout { timeout_ms: 200 }));
    server.join().expect("server thread");
}

#[test]
fn closed_port_is_a_connection_error() {
    let port = TcpListener::bind("127.0.0.1:0")
        .expect("bind")
        .local_addr()
        .expect("addr")
        .port();
    let err = engine(format!("http://127.0.0.1:{port}/solr/strata"), 1_000)
        .execute(&request())
        .expect_err("connection");
    assert!(matches!(err, EngineError::Connection(_)));
}
