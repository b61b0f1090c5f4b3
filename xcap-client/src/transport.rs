use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::client::conn::http1;
use hyper::rt::{Read, Write};
use hyper::{Request, Response, Uri};
use hyper_util::rt::TokioIo;
use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

use crate::error::ClientError;
use crate::tls::{CertificateVerifier, NativeRootsVerifier};

/// Sends one request and buffers the whole answer
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(
        &self,
        request: Request<Bytes>,
        timeout: Duration,
    ) -> Result<Response<Bytes>, ClientError>;
}

/// HTTP/1.1 over TCP, or over rustls for https.
/// A connection is opened for each request and closed after it.
pub struct HyperTransport {
    verifier: Arc<dyn CertificateVerifier>,
}

impl HyperTransport {
    pub fn new(verifier: Arc<dyn CertificateVerifier>) -> Self {
        Self { verifier }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new(Arc::new(NativeRootsVerifier::default()))
    }
}

trait Stream: Read + Write + Send + Unpin {}
impl<T: Unpin + AsyncRead + AsyncWrite + Send> Stream for TokioIo<T> {}

#[async_trait]
impl HttpTransport for HyperTransport {
    async fn execute(
        &self,
        request: Request<Bytes>,
        timeout: Duration,
    ) -> Result<Response<Bytes>, ClientError> {
        match tokio::time::timeout(timeout, self.round_trip(request)).await {
            Ok(res) => res,
            Err(_) => Err(ClientError::io(
                format!("no answer from the XCAP server after {} ms", timeout.as_millis()),
                std::io::Error::new(std::io::ErrorKind::TimedOut, "request timed out"),
            )),
        }
    }
}

impl HyperTransport {
    async fn round_trip(&self, request: Request<Bytes>) -> Result<Response<Bytes>, ClientError> {
        let target = Target::from_uri(request.uri())?;
        let stream = self.build_stream(&target).await?;

        let (mut sender, conn) = http1::handshake(stream)
            .await
            .map_err(|e| ClientError::http(format!("HTTP handshake with {} failed", target), e))?;
        tokio::spawn(async move {
            match conn.await {
                Err(e) => tracing::warn!(err=?e, "connection failed"),
                Ok(()) => tracing::trace!("connection terminated with success"),
            }
        });

        // hyper expects the origin-form on an HTTP/1 connection, Host is already set
        let (mut parts, body) = request.into_parts();
        parts.uri = origin_form(&parts.uri)?;
        let response = sender
            .send_request(Request::from_parts(parts, Full::new(body)))
            .await
            .map_err(|e| ClientError::http(format!("request to {} failed", target), e))?;

        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| ClientError::http(format!("unable to read the answer of {}", target), e))?
            .to_bytes();
        Ok(Response::from_parts(parts, body))
    }

    async fn build_stream(&self, target: &Target) -> Result<Box<dyn Stream>, ClientError> {
        let addrs: Vec<SocketAddr> = tokio::net::lookup_host((target.host.as_str(), target.port))
            .await
            .map_err(|source| ClientError::UnknownHost {
                host: target.host.clone(),
                source,
            })?
            .collect();
        if addrs.is_empty() {
            return Err(ClientError::UnknownHost {
                host: target.host.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no address found"),
            });
        }

        let socket = TcpStream::connect(&addrs[..])
            .await
            .map_err(|e| ClientError::io(format!("unable to connect to {}", target), e))?;
        tracing::trace!(remote=%target, "connected");

        if !target.tls {
            return Ok(Box::new(TokioIo::new(socket)));
        }

        let config = self.verifier.client_config(&target.host)?;
        let name = ServerName::try_from(target.host.as_str())
            .map(|n| n.to_owned())
            .map_err(|e| ClientError::InvalidArgument(format!("{}: {}", target.host, e)))?;
        let stream = TlsConnector::from(config)
            .connect(name, socket)
            .await
            .map_err(|e| ClientError::io(format!("TLS handshake with {} failed", target), e))?;
        Ok(Box::new(TokioIo::new(stream)))
    }
}

struct Target {
    host: String,
    port: u16,
    tls: bool,
}

impl Target {
    fn from_uri(uri: &Uri) -> Result<Self, ClientError> {
        let tls = match uri.scheme_str() {
            Some("https") => true,
            Some("http") => false,
            _ => {
                return Err(ClientError::InvalidArgument(format!(
                    "{} is not an http(s) URI",
                    uri
                )))
            }
        };
        let host = uri
            .host()
            .ok_or_else(|| ClientError::InvalidArgument(format!("{} has no host", uri)))?
            .trim_start_matches('[')
            .trim_end_matches(']')
            .to_string();
        let port = uri.port_u16().unwrap_or(if tls { 443 } else { 80 });

        Ok(Self { host, port, tls })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

fn origin_form(uri: &Uri) -> Result<Uri, ClientError> {
    uri.path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/")
        .parse::<Uri>()
        .map_err(|e| ClientError::InvalidArgument(format!("{}: {}", uri, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets() {
        let t = Target::from_uri(&"https://xcap.example.com/xcap-root".parse().unwrap()).unwrap();
        assert_eq!((t.host.as_str(), t.port, t.tls), ("xcap.example.com", 443, true));

        let t = Target::from_uri(&"http://[::1]:8080/".parse().unwrap()).unwrap();
        assert_eq!((t.host.as_str(), t.port, t.tls), ("::1", 8080, false));

        assert!(Target::from_uri(&"ftp://example.com/".parse().unwrap()).is_err());
        assert!(Target::from_uri(&"/relative".parse().unwrap()).is_err());
    }

    #[test]
    fn origin() {
        let uri: Uri = "http://xcap.example.com/root/resource-lists/users/sip:a@example.com/index?x=1"
            .parse()
            .unwrap();
        assert_eq!(
            origin_form(&uri).unwrap().to_string(),
            "/root/resource-lists/users/sip:a@example.com/index?x=1"
        );
        assert_eq!(origin_form(&"http://h".parse().unwrap()).unwrap().to_string(), "/");
    }
}
