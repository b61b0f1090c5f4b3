use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use hyper::body::Bytes;
use hyper::{Request, Response, Uri};

use xcap_client::report::ErrorReporter;
use xcap_client::transport::HttpTransport;
use xcap_client::{BaseHttpXCapClient, ClientError, HttpXCapClient, XCapResource, XCapResourceId};

mod common;
use common::*;

const DOCUMENT: &str = "resource-lists/users/sip:alice@example.com/index";
const LISTS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<resource-lists xmlns="urn:ietf:params:xml:ns:resource-lists"><list name="friends"/></resource-lists>"#;

async fn connected(server: &MockServer) -> Result<BaseHttpXCapClient> {
    let mut client = BaseHttpXCapClient::new();
    client
        .connect(&server.root, USER, USERNAME, PASSWORD)
        .await
        .context("connect to the mock server")?;
    Ok(client)
}

#[tokio::test]
async fn get_with_etag() -> Result<()> {
    let server = MockServer::start(|_| {
        reply(200, Some("application/resource-lists+xml"), Some("\"abc123\""), LISTS)
    })
    .await?;
    let mut client = connected(&server).await?;
    assert!(client.is_connected());

    let res = client.get(&XCapResourceId::new(DOCUMENT)?).await?;
    assert_eq!(res.http_code(), 200);
    assert_eq!(res.etag(), Some("\"abc123\""));
    assert_eq!(res.content_type(), Some("application/resource-lists+xml"));
    assert_eq!(res.content(), Some(LISTS.as_bytes()));

    let reqs = server.requests();
    assert_eq!(reqs.len(), 1);
    let req = &reqs[0];
    assert_eq!(req.method, hyper::Method::GET);
    assert_eq!(req.path, server.path(DOCUMENT));
    assert_eq!(req.header("authorization"), Some("Basic YWxpY2U6c2VjcmV0"));
    assert_eq!(req.header("connection"), Some("close"));
    assert!(req.header("host").context("host header")?.starts_with("127.0.0.1:"));
    Ok(())
}

#[tokio::test]
async fn not_found_has_no_content() -> Result<()> {
    let server = MockServer::start(|_| not_found()).await?;
    let mut client = connected(&server).await?;

    let res = client.get(&XCapResourceId::new(DOCUMENT)?).await?;
    assert_eq!(res.http_code(), 404);
    assert_eq!(res.content_type(), None);
    assert_eq!(res.content(), None);
    assert_eq!(res.etag(), None);
    assert_eq!(client.get_xcap_error_message(&res), None);
    Ok(())
}

#[tokio::test]
async fn conflicting_put() -> Result<()> {
    let server =
        MockServer::start(|_| reply(409, Some("application/xcap-error+xml"), None, CONFLICT)).await?;
    let mut client = connected(&server).await?;

    let id = XCapResourceId::with_node(DOCUMENT, "resource-lists/list%5b@name=%22friends%22%5d")?;
    let resource = XCapResource::new(
        id,
        r#"<list xmlns="urn:ietf:params:xml:ns:resource-lists" name="friends"/>"#,
        "application/xcap-el+xml",
    )
    .with_if_match("\"abc123\"");
    let res = client.put(&resource).await?;

    assert_eq!(res.http_code(), 409);
    assert_eq!(
        client.get_xcap_error_message(&res).as_deref(),
        Some("Entry already exists")
    );

    let reqs = server.requests();
    let req = &reqs[0];
    assert_eq!(req.method, hyper::Method::PUT);
    assert_eq!(
        req.path,
        server.path("resource-lists/users/sip:alice@example.com/index/~~/resource-lists/list%5b@name=%22friends%22%5d")
    );
    assert_eq!(req.header("content-type"), Some("application/xcap-el+xml"));
    assert_eq!(req.header("if-match"), Some("\"abc123\""));
    assert_eq!(req.body, Bytes::from(resource.content().to_string()));
    Ok(())
}

#[tokio::test]
async fn get_absolute_uri() -> Result<()> {
    let server = MockServer::start(|_| reply(200, Some("image/png"), None, "PNG")).await?;
    let mut client = connected(&server).await?;

    let uri: Uri = server.root.replace("/xcap-root", "/avatars/alice.png").parse()?;
    let res = client.get_uri(&uri).await?;
    assert_eq!(res.content(), Some(&b"PNG"[..]));
    assert_eq!(server.requests()[0].path, "/avatars/alice.png");
    Ok(())
}

#[tokio::test]
async fn credentials_stay_on_the_xcap_root() -> Result<()> {
    let xcap = MockServer::start(|_| not_found()).await?;
    let cdn = MockServer::start(|_| reply(200, Some("image/png"), None, "PNG")).await?;
    let mut client = connected(&xcap).await?;

    let uri: Uri = cdn.root.replace("/xcap-root", "/avatars/alice.png").parse()?;
    assert_eq!(client.get_uri(&uri).await?.http_code(), 200);
    let reqs = cdn.requests();
    assert_eq!(reqs[0].header("authorization"), None);
    assert!(reqs[0].header("host").is_some());

    let uri: Uri = xcap.root.replace("/xcap-root", "/avatars/alice.png").parse()?;
    assert_eq!(client.get_uri(&uri).await?.http_code(), 404);
    assert_eq!(
        xcap.requests()[0].header("authorization"),
        Some("Basic YWxpY2U6c2VjcmV0")
    );
    Ok(())
}

#[tokio::test]
async fn created_put() -> Result<()> {
    let server = MockServer::start(|_| {
        reply(201, Some("application/resource-lists+xml"), Some("\"v1\""), LISTS)
    })
    .await?;
    let mut client = connected(&server).await?;

    let resource = XCapResource::new(
        XCapResourceId::new(DOCUMENT)?,
        LISTS,
        "application/resource-lists+xml",
    );
    let res = client.put(&resource).await?;
    assert_eq!(res.http_code(), 201);
    assert_eq!(res.etag(), Some("\"v1\""));
    assert_eq!(res.content_type(), Some("application/resource-lists+xml"));
    assert_eq!(res.content(), Some(LISTS.as_bytes()));
    Ok(())
}

#[tokio::test]
async fn requests_need_a_connection() -> Result<()> {
    let server = MockServer::start(|_| not_found()).await?;
    let mut client = BaseHttpXCapClient::new();
    let id = XCapResourceId::new(DOCUMENT)?;
    let resource = XCapResource::new(id.clone(), LISTS, "application/resource-lists+xml");
    let uri: Uri = server.root.parse()?;

    assert!(matches!(client.delete(&id).await, Err(ClientError::NotConnected)));
    assert!(matches!(client.get(&id).await, Err(ClientError::NotConnected)));
    assert!(matches!(client.get_uri(&uri).await, Err(ClientError::NotConnected)));
    assert!(matches!(client.put(&resource).await, Err(ClientError::NotConnected)));

    client.connect(&server.root, USER, USERNAME, PASSWORD).await?;
    assert_eq!(client.delete(&id).await?.http_code(), 404);
    client.disconnect();
    assert!(matches!(client.delete(&id).await, Err(ClientError::NotConnected)));

    assert_eq!(server.requests().len(), 1);
    Ok(())
}

#[tokio::test]
async fn silent_server_times_out() -> Result<()> {
    let tcp = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let root = format!("http://{}/xcap-root", tcp.local_addr()?);
    tokio::spawn(async move {
        let mut sockets = Vec::new();
        while let Ok((socket, _)) = tcp.accept().await {
            sockets.push(socket);
        }
    });

    let mut client = BaseHttpXCapClient::new();
    client.set_timeout(Duration::from_millis(200));
    client.connect(&root, USER, USERNAME, PASSWORD).await?;

    match client.get(&XCapResourceId::new(DOCUMENT)?).await {
        Err(ClientError::Io { source, .. }) => {
            assert_eq!(source.kind(), std::io::ErrorKind::TimedOut)
        }
        other => panic!("expected a timeout, got {:?}", other),
    }
    // a timeout is not a reason to disconnect
    assert!(client.is_connected());
    Ok(())
}

/// A transport for a world without DNS
struct NoSuchHost;

#[async_trait]
impl HttpTransport for NoSuchHost {
    async fn execute(
        &self,
        request: Request<Bytes>,
        _timeout: Duration,
    ) -> Result<Response<Bytes>, ClientError> {
        Err(ClientError::UnknownHost {
            host: request.uri().host().unwrap_or_default().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such host"),
        })
    }
}

#[derive(Default)]
struct CountingReporter(AtomicUsize);

impl ErrorReporter for CountingReporter {
    fn report(&self, err: &ClientError) {
        assert!(matches!(err, ClientError::UnknownHost { host, .. } if host == "xcap.invalid"));
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn unknown_host_disconnects() -> Result<()> {
    let reporter = Arc::new(CountingReporter::default());
    let mut client = BaseHttpXCapClient::with_collaborators(Arc::new(NoSuchHost), reporter.clone());
    let id = XCapResourceId::new(DOCUMENT)?;
    let resource = XCapResource::new(id.clone(), LISTS, "application/resource-lists+xml");

    client.connect("http://xcap.invalid/root", USER, USERNAME, PASSWORD).await?;
    assert!(matches!(client.get(&id).await, Err(ClientError::UnknownHost { .. })));
    assert!(!client.is_connected());

    client.connect("http://xcap.invalid/root", USER, USERNAME, PASSWORD).await?;
    assert!(matches!(client.put(&resource).await, Err(ClientError::UnknownHost { .. })));
    assert!(!client.is_connected());

    client.connect("http://xcap.invalid/root", USER, USERNAME, PASSWORD).await?;
    assert!(matches!(client.delete(&id).await, Err(ClientError::UnknownHost { .. })));
    assert!(!client.is_connected());

    // once disconnected, nothing reaches the transport nor the reporter
    assert!(matches!(client.get(&id).await, Err(ClientError::NotConnected)));
    assert_eq!(reporter.0.load(Ordering::SeqCst), 3);
    Ok(())
}
