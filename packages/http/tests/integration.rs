use std::io::{Cursor, Read};
use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mediafs_core::{Accessor, Error};
use mediafs_http::HttpAccessor;

fn read_all(accessor: &mut HttpAccessor, name: &str) -> Result<Vec<u8>, Error> {
    let mut data = Vec::new();
    accessor.open_address(name)?.read_to_end(&mut data)?;
    Ok(data)
}

#[tokio::test]
async fn test_reads_file_under_base() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/xs/repodata/repomd.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<repomd/>"))
        .mount(&server)
        .await;

    let base = format!("{}/xs/", server.uri());

    let result = tokio::task::spawn_blocking(move || {
        let mut http = HttpAccessor::new(&base, true).unwrap();
        http.start().unwrap();
        let data = read_all(&mut http, "repodata/repomd.xml").unwrap();
        http.finish().unwrap();
        data
    })
    .await
    .unwrap();

    assert_eq!(result, b"<repomd/>");
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let server = MockServer::start().await;
    let base = format!("{}/xs/", server.uri());

    let result = tokio::task::spawn_blocking(move || {
        let mut http = HttpAccessor::new(&base, true).unwrap();
        read_all(&mut http, "Packages.gz")
    })
    .await
    .unwrap();

    match result {
        Err(Error::NotFound { name }) => assert_eq!(name, "Packages.gz"),
        other => panic!("expected NotFound, got {:?}", other.map(|d| d.len())),
    }
}

#[tokio::test]
async fn test_server_error_is_protocol_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/xs/.treeinfo"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let base = format!("{}/xs/", server.uri());

    let result = tokio::task::spawn_blocking(move || {
        let mut http = HttpAccessor::new(&base, true).unwrap();
        read_all(&mut http, ".treeinfo")
    })
    .await
    .unwrap();

    assert!(matches!(result, Err(Error::Protocol { .. })));
}

#[tokio::test]
async fn test_credentials_sent_as_basic_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/xs/.treeinfo"))
        .and(header("Authorization", "Basic dXNlcjpwdw=="))
        .respond_with(ResponseTemplate::new(200).set_body_string("[general]"))
        .mount(&server)
        .await;

    let plain = format!("{}/xs/", server.uri());
    let base = plain.replacen("http://", "http://user:pw@", 1);

    let (data, base_address) = tokio::task::spawn_blocking(move || {
        let mut http = HttpAccessor::new(&base, true).unwrap();
        let data = read_all(&mut http, ".treeinfo").unwrap();
        (data, http.base_address().to_string())
    })
    .await
    .unwrap();

    assert_eq!(data, b"[general]");
    assert_eq!(base_address, plain);
}

#[tokio::test]
async fn test_names_cannot_reach_another_host() {
    let mirror = MockServer::start().await;
    let other = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/steal"))
        .respond_with(ResponseTemplate::new(200).set_body_string("leaked"))
        .mount(&other)
        .await;

    let base = format!("{}/xs/", mirror.uri()).replacen("http://", "http://user:pw@", 1);
    let name = format!("//{}/steal", other.address());

    let result = tokio::task::spawn_blocking(move || {
        let mut http = HttpAccessor::new(&base, true).unwrap();
        read_all(&mut http, &name)
    })
    .await
    .unwrap();

    assert!(matches!(result, Err(Error::NotFound { .. })));
    assert!(other.received_requests().await.unwrap().is_empty());

    let requests = mirror.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.path().starts_with("/xs/"));
}

#[tokio::test]
async fn test_no_credentials_no_auth_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/xs/.treeinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[general]"))
        .mount(&server)
        .await;

    let base = format!("{}/xs/", server.uri());

    tokio::task::spawn_blocking(move || {
        let mut http = HttpAccessor::new(&base, true).unwrap();
        read_all(&mut http, ".treeinfo").unwrap();
    })
    .await
    .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_access_reports_existence() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/xs/.treeinfo"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[general]"))
        .mount(&server)
        .await;

    let base = format!("{}/xs/", server.uri());

    let (present, missing) = tokio::task::spawn_blocking(move || {
        let mut http = HttpAccessor::new(&base, true).unwrap();
        (http.access(".treeinfo"), http.access("Packages"))
    })
    .await
    .unwrap();

    assert!(present);
    assert!(!missing);
}

#[tokio::test]
async fn test_request_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/xs/.treeinfo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("[general]")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let base = format!("{}/xs/", server.uri());

    let result = tokio::task::spawn_blocking(move || {
        let mut http =
            HttpAccessor::with_timeout(&base, true, Some(Duration::from_millis(200))).unwrap();
        read_all(&mut http, ".treeinfo")
    })
    .await
    .unwrap();

    assert!(matches!(result, Err(Error::Protocol { .. })));
}

#[test]
fn test_writes_are_rejected() {
    let mut http = HttpAccessor::new("http://mirror.invalid/xs/", true).unwrap();
    assert!(http.read_only());

    let err = http
        .write_file(&mut Cursor::new(b"log".to_vec()), "install.log")
        .unwrap_err();
    assert!(matches!(err, Error::PreconditionViolation { .. }));
}

#[test]
fn test_read_write_construction_fails() {
    let result = HttpAccessor::new("http://mirror.invalid/xs/", false);
    assert!(matches!(result, Err(Error::PreconditionViolation { .. })));
}

#[test]
fn test_display() {
    let http = HttpAccessor::new("http://user:pw@mirror.invalid:8080/xs/", true).unwrap();
    assert_eq!(http.to_string(), "<HTTPAccessor: http://mirror.invalid:8080/xs/>");
}
