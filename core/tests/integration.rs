//! Every verb against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `Client` with the
//! `ureq` transfer over real HTTP. Checks that configuration reaches the wire
//! and that the reassembled raw response parses back into what the server
//! sent.

use std::net::SocketAddr;

use courier_core::error::{CODE_COULDNT_CONNECT, CODE_OPERATION_TIMEDOUT, CODE_RECV_ERROR};
use courier_core::{Client, ClientConfig, UreqTransfer};
use mock_server::Echo;

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });
    addr
}

fn client(config: ClientConfig) -> Client<UreqTransfer> {
    Client::new(config, UreqTransfer::new())
}

fn echo(body: &str) -> Echo {
    serde_json::from_str(body).unwrap()
}

#[test]
fn verbs_round_trip() {
    let addr = start_server();
    let base = format!("http://{addr}");
    let mut c = client(ClientConfig::default().with_user_agent("integration/1.0"));

    // GET with a form query appended to an existing one.
    let resp = c.get(&format!("{base}/echo?z=1"), [("k", "a b")]).unwrap();
    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.header("x-echo"), Some("1"));
    let seen = echo(&resp.body);
    assert_eq!(seen.method, "GET");
    assert_eq!(seen.query.as_deref(), Some("z=1&k=a%20b"));
    assert_eq!(seen.headers.get("user-agent").map(String::as_str), Some("integration/1.0"));

    // POST with a form body.
    let resp = c.post(&format!("{base}/echo"), [("title", "milk & eggs")]).unwrap();
    let seen = echo(&resp.body);
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.body, "title=milk%20%26%20eggs");
    assert!(seen.query.is_none());

    // PUT with a pre-encoded body.
    let resp = c.put(&format!("{base}/echo"), "done=1").unwrap();
    let seen = echo(&resp.body);
    assert_eq!(seen.method, "PUT");
    assert_eq!(seen.body, "done=1");

    // DELETE without a body.
    let resp = c.delete(&format!("{base}/echo"), ()).unwrap();
    let seen = echo(&resp.body);
    assert_eq!(seen.method, "DELETE");
    assert_eq!(seen.body, "");

    // HEAD: query in the URL, no body either way.
    let resp = c.head(&format!("{base}/echo"), [("k", "v")]).unwrap();
    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.header("x-echo"), Some("1"));
    assert_eq!(resp.body, "");
}

#[test]
fn delete_with_body_carries_configured_headers() {
    let addr = start_server();
    let config = ClientConfig::default()
        .with_user_agent("integration/1.0")
        .with_referer("http://referrer.test/")
        .with_header("X-Token", "secret");
    let mut c = client(config);

    let resp = c.delete(&format!("http://{addr}/echo"), [("id", "7")]).unwrap();
    let seen = echo(&resp.body);
    assert_eq!(seen.method, "DELETE");
    assert_eq!(seen.body, "id=7");
    assert_eq!(seen.headers.get("user-agent").map(String::as_str), Some("integration/1.0"));
    assert_eq!(seen.headers.get("referer").map(String::as_str), Some("http://referrer.test/"));
    assert_eq!(seen.headers.get("x-token").map(String::as_str), Some("secret"));
}

#[test]
fn bodyless_custom_method_is_not_chunked() {
    let addr = start_server();
    let mut config = ClientConfig::default();
    config.set_option("customrequest", "PATCH").unwrap();
    let mut c = client(config);

    let resp = c.get(&format!("http://{addr}/echo"), ()).unwrap();
    let seen = echo(&resp.body);
    assert_eq!(seen.method, "PATCH");
    assert_eq!(seen.body, "");
    assert!(!seen.headers.contains_key("transfer-encoding"), "{:?}", seen.headers);
    assert!(matches!(seen.headers.get("content-length").map(String::as_str), None | Some("0")));
}

#[test]
fn configured_headers_and_referer_reach_the_server() {
    let addr = start_server();
    let config = ClientConfig::default()
        .with_referer("http://referrer.test/")
        .with_header("X-Token", "secret");
    let mut c = client(config);

    let resp = c.get(&format!("http://{addr}/echo"), ()).unwrap();
    let seen = echo(&resp.body);
    assert_eq!(seen.headers.get("referer").map(String::as_str), Some("http://referrer.test/"));
    assert_eq!(seen.headers.get("x-token").map(String::as_str), Some("secret"));
}

#[test]
fn custom_user_agent_option_wins() {
    let addr = start_server();
    let mut config = ClientConfig::default().with_user_agent("configured/1.0");
    config.set_option("CURLOPT_USERAGENT", "override/2.0").unwrap();
    let mut c = client(config);

    let resp = c.get(&format!("http://{addr}/echo"), ()).unwrap();
    let seen = echo(&resp.body);
    assert_eq!(seen.headers.get("user-agent").map(String::as_str), Some("override/2.0"));
}

#[test]
fn redirects_follow_by_default() {
    let addr = start_server();
    let mut c = client(ClientConfig::default());

    let resp = c.get(&format!("http://{addr}/redirect/2"), ()).unwrap();
    assert_eq!(resp.status_code, 200);
    assert_eq!(echo(&resp.body).method, "GET");
}

#[test]
fn redirects_not_followed_when_disabled() {
    let addr = start_server();
    let mut c = client(ClientConfig::default().with_follow_redirects(false));

    let resp = c.get(&format!("http://{addr}/redirect"), ()).unwrap();
    assert_eq!(resp.status_code, 303);
    assert_eq!(resp.header("location"), Some("/echo"));
    assert_eq!(resp.body, "");
}

#[test]
fn repeated_set_cookie_keeps_the_last() {
    let addr = start_server();
    let mut c = client(ClientConfig::default());

    let resp = c.get(&format!("http://{addr}/cookies/set"), ()).unwrap();
    assert_eq!(resp.status_code, 204);
    let cookie = resp.header("set-cookie").unwrap();
    assert!(cookie.starts_with("session="), "got {cookie}");
    assert_eq!(resp.body, "");
}

#[test]
fn error_statuses_are_responses_not_failures() {
    let addr = start_server();
    let mut c = client(ClientConfig::default());

    let resp = c.get(&format!("http://{addr}/status/503"), ()).unwrap();
    assert_eq!(resp.status_code, 503);
    assert_eq!(resp.reason, "Service Unavailable");
    assert!(!resp.is_success());
}

#[test]
fn header_passthrough_off_returns_body_only() {
    let addr = start_server();
    let mut config = ClientConfig::default();
    config.set_option("header", false).unwrap();
    let mut c = client(config);

    let resp = c.post(&format!("http://{addr}/echo"), "a=1").unwrap();
    assert_eq!(resp.status_code, 0);
    assert!(resp.headers.is_empty());
    assert_eq!(echo(&resp.body).body, "a=1");
}

#[test]
fn connection_refused_is_a_transport_error() {
    // Bind then drop to get a port with nothing listening.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut config = ClientConfig::default();
    config.set_option("connecttimeout", 2).unwrap();
    let mut c = client(config);

    let err = c.get(&format!("http://127.0.0.1:{port}/"), ()).unwrap_err();
    assert!(
        [CODE_COULDNT_CONNECT, CODE_OPERATION_TIMEDOUT, CODE_RECV_ERROR].contains(&err.code),
        "unexpected code {}",
        err.code
    );
    assert!(!err.message.is_empty());
}
