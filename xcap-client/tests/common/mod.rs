#![allow(dead_code)]

use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1 as http;
use hyper::service::service_fn;
use hyper::rt::{Read, Write};
use hyper::{HeaderMap, Method, Request, Response};
use hyper_util::rt::TokioIo;
use rustls_pemfile::{certs, private_key};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio_rustls::TlsAcceptor;

pub const USER: &str = "sip:alice@example.com";
pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "secret";

/// A request as seen by the mock server
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

pub type Reply = Response<Full<Bytes>>;

type Handler = dyn Fn(&Recorded) -> Reply + Send + Sync;

/// An XCAP server answering on 127.0.0.1 with a fixed handler,
/// its root is `http://127.0.0.1:<port>/xcap-root`
pub struct MockServer {
    pub root: String,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

trait Stream: Read + Write + Send + Unpin {}
impl<T: Unpin + AsyncRead + AsyncWrite + Send> Stream for TokioIo<T> {}

/// Root of the test certificate authority, it signed the server certificate
pub const TEST_CA: &str = include_str!("../tls/ca.pem");
const SERVER_CERT: &str = include_str!("../tls/server.pem");
const SERVER_KEY: &str = include_str!("../tls/server.key");

pub fn test_ca() -> Result<rustls::pki_types::CertificateDer<'static>> {
    certs(&mut TEST_CA.as_bytes())
        .next()
        .context("a certificate in the test CA file")?
        .context("parse the test CA")
}

fn acceptor() -> Result<TlsAcceptor> {
    let loaded_certs = certs(&mut SERVER_CERT.as_bytes()).collect::<Result<Vec<_>, _>>()?;
    let loaded_key = private_key(&mut SERVER_KEY.as_bytes())?.context("a server key")?;

    let tls_config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(loaded_certs, loaded_key)?;
    Ok(TlsAcceptor::from(Arc::new(tls_config)))
}

impl MockServer {
    pub async fn start(
        handler: impl Fn(&Recorded) -> Reply + Send + Sync + 'static,
    ) -> Result<Self> {
        Self::serve(None, handler).await
    }

    /// Same as `start` behind TLS, its root is `https://127.0.0.1:<port>/xcap-root`
    pub async fn start_tls(
        handler: impl Fn(&Recorded) -> Reply + Send + Sync + 'static,
    ) -> Result<Self> {
        Self::serve(Some(acceptor()?), handler).await
    }

    async fn serve(
        tls: Option<TlsAcceptor>,
        handler: impl Fn(&Recorded) -> Reply + Send + Sync + 'static,
    ) -> Result<Self> {
        let tcp = TcpListener::bind("127.0.0.1:0").await?;
        let addr = tcp.local_addr()?;
        let scheme = if tls.is_some() { "https" } else { "http" };
        let handler: Arc<Handler> = Arc::new(handler);
        let recorded = Arc::new(Mutex::new(Vec::new()));

        let log = recorded.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = tcp.accept().await {
                let (handler, log, tls) = (handler.clone(), log.clone(), tls.clone());
                tokio::spawn(async move {
                    let stream = match build_stream(tls, socket).await {
                        Ok(v) => v,
                        Err(e) => {
                            eprintln!("mock TLS acceptor failed: {:?}", e);
                            return;
                        }
                    };
                    let service = service_fn(move |req: Request<Incoming>| {
                        let (handler, log) = (handler.clone(), log.clone());
                        async move {
                            let (parts, body) = req.into_parts();
                            let body = body
                                .collect()
                                .await
                                .map(|c| c.to_bytes())
                                .unwrap_or_default();
                            let rec = Recorded {
                                method: parts.method,
                                path: parts.uri.to_string(),
                                headers: parts.headers,
                                body,
                            };
                            let response = handler(&rec);
                            log.lock().unwrap().push(rec);
                            Ok::<_, Infallible>(response)
                        }
                    });
                    if let Err(e) = http::Builder::new()
                        .serve_connection(stream, service)
                        .await
                    {
                        eprintln!("mock connection failed: {:?}", e);
                    }
                });
            }
        });

        Ok(Self {
            root: format!("{}://{}/xcap-root", scheme, addr),
            recorded,
        })
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }

    /// Path of a document under the XCAP root, as received by the server
    pub fn path(&self, document: &str) -> String {
        format!("/xcap-root/{}", document)
    }
}

async fn build_stream(tls: Option<TlsAcceptor>, socket: TcpStream) -> Result<Box<dyn Stream>> {
    match tls {
        Some(acceptor) => Ok(Box::new(TokioIo::new(acceptor.accept(socket).await?))),
        None => Ok(Box::new(TokioIo::new(socket))),
    }
}

pub fn reply(
    status: u16,
    content_type: Option<&str>,
    etag: Option<&str>,
    body: &str,
) -> Reply {
    let mut builder = Response::builder().status(status);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    if let Some(etag) = etag {
        builder = builder.header("etag", etag);
    }
    builder
        .body(Full::new(Bytes::copy_from_slice(body.as_bytes())))
        .unwrap()
}

pub fn not_found() -> Reply {
    reply(404, Some("text/plain"), None, "not found")
}

pub const CAPS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xcap-caps xmlns="urn:ietf:params:xml:ns:xcap-caps">
  <auids>
    <auid>xcap-caps</auid>
    <auid>resource-lists</auid>
    <auid>pres-rules</auid>
  </auids>
  <namespaces>
    <namespace>urn:ietf:params:xml:ns:xcap-caps</namespace>
    <namespace>urn:ietf:params:xml:ns:resource-lists</namespace>
    <namespace>urn:ietf:params:xml:ns:pres-rules</namespace>
  </namespaces>
</xcap-caps>"#;

pub const CONFLICT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xcap-error xmlns="urn:ietf:params:xml:ns:xcap-error">
  <uniqueness-failure phrase="Entry already exists">
    <exists field="rl:list/rl:entry/@uri"/>
  </uniqueness-failure>
</xcap-error>"#;
