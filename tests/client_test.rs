use std::{
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};

use spotetl::{
    cli::collect_tables,
    config::{Config, Credentials},
    error::EtlError,
    pipeline::Tables,
    spotify::{CatalogApi, SpotifyClient, auth::request_token},
    types::{ArtistRef, Token},
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

const LAUV_SEARCH: &str =
    r#"{"artists":{"items":[{"id":"A1","name":"Lauv"}],"next":null,"total":1}}"#;

/// Local HTTP server answering every request with the next canned response.
///
/// Once the list is used up the last response is repeated.
struct StubServer {
    url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    async fn start(responses: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let recorded = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let request = read_request(&mut stream).await;
                let hit = {
                    let mut recorded = recorded.lock().unwrap();
                    recorded.push(request);
                    recorded.len() - 1
                };
                let response = &responses[hit.min(responses.len() - 1)];
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        Self { url, requests }
    }

    fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> String {
        self.requests.lock().unwrap()[index].clone()
    }
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(end) = text.find("\r\n\r\n") {
            let body_len = header(&text[..end], "content-length")
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Case-insensitive header lookup in a raw request.
fn header(request: &str, name: &str) -> Option<String> {
    request.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim().to_string())
    })
}

fn response(status: u16, extra_headers: &[(&str, &str)], body: &str) -> String {
    let mut head = format!(
        "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n",
        body.len()
    );
    for (name, value) in extra_headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    format!("{head}\r\n{body}")
}

fn token(obtained_at: u64) -> Token {
    Token {
        access_token: "test-token".to_string(),
        token_type: "Bearer".to_string(),
        expires_in: 3600,
        obtained_at,
    }
}

fn fresh_token() -> Token {
    token(SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs())
}

fn client(server: &StubServer, max_retries: u32) -> SpotifyClient {
    let config = Config {
        api_url: server.url.clone(),
        max_retries,
        ..Config::default()
    };
    SpotifyClient::new(&config, fresh_token())
}

#[tokio::test]
async fn test_search_sends_bearer_token_and_returns_top_match() {
    let server = StubServer::start(vec![response(200, &[], LAUV_SEARCH)]).await;

    let artist = client(&server, 0).resolve_artist("Lauv").await.unwrap();

    assert_eq!(
        artist,
        Some(ArtistRef {
            id: "A1".to_string(),
            name: Some("Lauv".to_string()),
        })
    );
    let request = server.request(0);
    assert!(request.starts_with("GET /search?q=Lauv&type=artist&limit=1 "));
    assert_eq!(
        header(&request, "authorization").as_deref(),
        Some("Bearer test-token")
    );
}

#[tokio::test]
async fn test_rate_limited_request_is_retried_after_delay() {
    let server = StubServer::start(vec![
        response(429, &[("retry-after", "1")], ""),
        response(200, &[], LAUV_SEARCH),
    ])
    .await;

    let artist = client(&server, 3).resolve_artist("Lauv").await.unwrap();

    assert_eq!(artist.map(|a| a.id), Some("A1".to_string()));
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn test_rate_limit_retries_stop_at_max_retries() {
    let server = StubServer::start(vec![response(429, &[("retry-after", "0")], "")]).await;

    let err = client(&server, 2).resolve_artist("Lauv").await.unwrap_err();

    match err {
        EtlError::RemoteFetch {
            endpoint, status, ..
        } => {
            assert_eq!(endpoint, "/search");
            assert_eq!(status, Some(429));
        }
        other => panic!("expected RemoteFetch, got {other:?}"),
    }
    assert_eq!(server.hits(), 3);
}

#[tokio::test]
async fn test_excessive_retry_after_is_not_waited_out() {
    let server = StubServer::start(vec![response(429, &[("retry-after", "600")], "")]).await;

    let err = client(&server, 3).resolve_artist("Lauv").await.unwrap_err();

    assert!(matches!(
        err,
        EtlError::RemoteFetch {
            status: Some(429),
            ..
        }
    ));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_bad_gateway_is_retried() {
    let server = StubServer::start(vec![
        response(502, &[], ""),
        response(200, &[], LAUV_SEARCH),
    ])
    .await;

    let artist = client(&server, 1).resolve_artist("Lauv").await.unwrap();

    assert_eq!(artist.map(|a| a.id), Some("A1".to_string()));
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn test_bad_gateway_without_retries_fails() {
    let server = StubServer::start(vec![response(502, &[], "")]).await;

    let err = client(&server, 0).resolve_artist("Lauv").await.unwrap_err();

    assert!(matches!(
        err,
        EtlError::RemoteFetch {
            status: Some(502),
            ..
        }
    ));
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_client_error_becomes_remote_fetch_with_endpoint_and_status() {
    let server = StubServer::start(vec![response(
        404,
        &[],
        r#"{"error":{"status":404,"message":"not found"}}"#,
    )])
    .await;

    let err = client(&server, 3)
        .fetch_albums(&["AL1".to_string()])
        .await
        .unwrap_err();

    match err {
        EtlError::RemoteFetch {
            endpoint,
            status,
            message,
        } => {
            assert_eq!(endpoint, "/albums");
            assert_eq!(status, Some(404));
            assert!(message.contains("not found"), "{message}");
        }
        other => panic!("expected RemoteFetch, got {other:?}"),
    }
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_unauthorized_with_expired_token_mentions_expiry() {
    let server = StubServer::start(vec![response(401, &[], "")]).await;
    let config = Config {
        api_url: server.url.clone(),
        ..Config::default()
    };
    let client = SpotifyClient::new(&config, token(0));

    let err = client
        .fetch_albums(&["AL1".to_string()])
        .await
        .unwrap_err();

    match err {
        EtlError::RemoteFetch {
            endpoint,
            status,
            message,
        } => {
            assert_eq!(endpoint, "/albums");
            assert_eq!(status, Some(401));
            assert!(message.ends_with("(access token has expired, rerun to fetch a new one)"));
        }
        other => panic!("expected RemoteFetch, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unauthorized_with_fresh_token_has_no_expiry_note() {
    let server = StubServer::start(vec![response(401, &[], "")]).await;

    let err = client(&server, 3)
        .fetch_albums(&["AL1".to_string()])
        .await
        .unwrap_err();

    assert!(!err.to_string().contains("expired"), "{err}");
}

#[tokio::test]
async fn test_token_request_uses_basic_auth_and_client_credentials_grant() {
    let server = StubServer::start(vec![response(
        200,
        &[],
        r#"{"access_token":"abc","token_type":"Bearer","expires_in":3600}"#,
    )])
    .await;

    let token = request_token(
        &Credentials::new("id", "sec"),
        &format!("{}/api/token", server.url),
    )
    .await
    .unwrap();

    assert_eq!(token.access_token, "abc");
    assert_eq!(token.expires_in, 3600);
    assert!(!token.is_expired());

    let request = server.request(0);
    assert!(request.starts_with("POST /api/token "));
    assert_eq!(
        header(&request, "authorization").as_deref(),
        Some("Basic aWQ6c2Vj")
    );
    assert!(request.ends_with("grant_type=client_credentials"), "{request}");
}

#[tokio::test]
async fn test_rejected_token_request_is_auth_error() {
    let server = StubServer::start(vec![response(
        400,
        &[],
        r#"{"error":"invalid_client"}"#,
    )])
    .await;

    let err = request_token(
        &Credentials::new("id", "wrong"),
        &format!("{}/api/token", server.url),
    )
    .await
    .unwrap_err();

    match err {
        EtlError::Auth(message) => {
            assert!(message.contains("400"), "{message}");
            assert!(message.contains("invalid_client"), "{message}");
        }
        other => panic!("expected Auth, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_artist_list_skips_token_exchange() {
    let server = StubServer::start(vec![response(400, &[], "")]).await;
    let config = Config {
        token_url: format!("{}/api/token", server.url),
        api_url: server.url.clone(),
        ..Config::default()
    }
    .with_artists(Vec::<String>::new());

    let mut stages = Vec::new();
    let tables = collect_tables(&config, |stage| stages.push(stage))
        .await
        .unwrap();

    assert_eq!(tables, Tables::default());
    assert!(stages.is_empty());
    assert_eq!(server.hits(), 0);
}

#[tokio::test]
async fn test_collect_tables_reports_failed_token_exchange() {
    let server = StubServer::start(vec![response(401, &[], "")]).await;
    let config = Config {
        credentials: Credentials::new("id", "sec"),
        token_url: format!("{}/api/token", server.url),
        api_url: server.url.clone(),
        ..Config::default()
    }
    .with_artists(["Lauv"]);

    let err = collect_tables(&config, |_| {}).await.unwrap_err();

    assert!(matches!(err, EtlError::Auth(_)));
    assert_eq!(server.hits(), 1);
}
