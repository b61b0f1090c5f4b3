use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use hyper::body::Bytes;
use hyper::header::{AUTHORIZATION, CONNECTION, CONTENT_TYPE, HOST, IF_MATCH};
use hyper::{Method, Request, Uri};

use crate::error::ClientError;
use crate::report::{ErrorReporter, LogReporter};
use crate::resource::{XCapResource, XCapResourceId};
use crate::response::{xcap_error_message, XCapHttpResponse};
use crate::transport::{HttpTransport, HyperTransport};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Raw access to the resources of an XCAP server.
///
/// Requests to the XCAP root are authenticated with HTTP Basic. They can only be
/// sent while connected. A server whose name can't be resolved makes the
/// client disconnect.
#[async_trait]
pub trait HttpXCapClient: Send {
    /// Install a session. Nothing is sent by the base client.
    /// `user_address` is the SIP URI of the user, it names its documents.
    async fn connect(
        &mut self,
        server_uri: &str,
        user_address: &str,
        username: &str,
        password: &str,
    ) -> Result<(), ClientError>;

    fn disconnect(&mut self);

    fn is_connected(&self) -> bool;

    fn user_address(&self) -> Option<&str>;

    async fn get(&mut self, id: &XCapResourceId) -> Result<XCapHttpResponse, ClientError>;

    /// GET of an absolute URI, eg. found in a document, outside of the XCAP root
    async fn get_uri(&mut self, uri: &Uri) -> Result<XCapHttpResponse, ClientError>;

    async fn put(&mut self, resource: &XCapResource) -> Result<XCapHttpResponse, ClientError>;

    async fn delete(&mut self, id: &XCapResourceId) -> Result<XCapHttpResponse, ClientError>;

    /// The phrase of the xcap-error document of a 409 response, if any
    fn get_xcap_error_message(&self, response: &XCapHttpResponse) -> Option<String> {
        xcap_error_message(response)
    }

    /// Bounds both the connection and the read of the response
    fn set_timeout(&mut self, timeout: Duration);
}

struct Session {
    root: String,
    origin: (String, String),
    user_address: String,
    username: String,
    password: String,
}

impl Session {
    fn basic_auth(&self) -> String {
        let creds = format!("{}:{}", self.username, self.password);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(creds)
        )
    }

    /// Credentials are only sent to the scheme and authority of the XCAP root
    fn is_same_origin(&self, uri: &Uri) -> bool {
        match origin(uri) {
            Some((scheme, authority)) => {
                scheme == self.origin.0 && authority.eq_ignore_ascii_case(&self.origin.1)
            }
            None => false,
        }
    }
}

fn origin(uri: &Uri) -> Option<(String, String)> {
    Some((
        uri.scheme_str()?.to_ascii_lowercase(),
        uri.authority()?.as_str().to_string(),
    ))
}

pub struct BaseHttpXCapClient {
    transport: Arc<dyn HttpTransport>,
    reporter: Arc<dyn ErrorReporter>,
    timeout: Duration,
    session: Option<Session>,
}

impl Default for BaseHttpXCapClient {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseHttpXCapClient {
    /// A client over hyper, trusting the native roots and logging its errors
    pub fn new() -> Self {
        Self::with_collaborators(
            Arc::new(HyperTransport::default()),
            Arc::new(LogReporter),
        )
    }

    pub fn with_collaborators(
        transport: Arc<dyn HttpTransport>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            transport,
            reporter,
            timeout: DEFAULT_TIMEOUT,
            session: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `server_uri + "/" + id`
    pub fn resource_uri(&self, id: &XCapResourceId) -> Result<Uri, ClientError> {
        let session = self.session.as_ref().ok_or(ClientError::NotConnected)?;
        let uri = format!("{}/{}", session.root, id);
        uri.parse::<Uri>()
            .map_err(|e| ClientError::InvalidArgument(format!("{} is not a valid URI: {}", uri, e)))
    }

    fn request(&self, method: Method, uri: &Uri) -> Result<http::request::Builder, ClientError> {
        let session = self.session.as_ref().ok_or(ClientError::NotConnected)?;
        let host = uri
            .authority()
            .ok_or_else(|| ClientError::InvalidArgument(format!("{} is not an absolute URI", uri)))?;

        let builder = Request::builder()
            .method(method)
            .uri(uri.clone())
            .header(HOST, host.as_str())
            .header(CONNECTION, "close");
        if !session.is_same_origin(uri) {
            tracing::debug!(uri=%uri, "outside of the XCAP root, no credentials sent");
            return Ok(builder);
        }
        Ok(builder.header(AUTHORIZATION, session.basic_auth()))
    }

    async fn execute(&mut self, request: Request<Bytes>) -> Result<XCapHttpResponse, ClientError> {
        let (method, uri) = (request.method().clone(), request.uri().clone());
        tracing::debug!(method=%method, uri=%uri, "XCAP request");

        match self.transport.execute(request, self.timeout).await {
            Ok(response) => {
                let response = XCapHttpResponse::from_http(response);
                tracing::debug!(method=%method, uri=%uri, code=response.http_code(), "XCAP response");
                Ok(response)
            }
            Err(err @ ClientError::UnknownHost { .. }) => {
                self.disconnect();
                self.reporter.report(&err);
                Err(err)
            }
            Err(err) => {
                tracing::debug!(method=%method, uri=%uri, err=%err, "XCAP request failed");
                Err(err)
            }
        }
    }
}

fn check_user_address(user_address: &str) -> Result<(), ClientError> {
    let rest = user_address
        .strip_prefix("sip:")
        .or_else(|| user_address.strip_prefix("sips:"));
    match rest {
        Some(rest) if !rest.is_empty() => Ok(()),
        _ => Err(ClientError::InvalidArgument(format!(
            "{} is not a SIP address",
            user_address
        ))),
    }
}

fn check_server_uri(server_uri: &str) -> Result<Uri, ClientError> {
    let uri = server_uri.parse::<Uri>().map_err(|e| {
        ClientError::InvalidArgument(format!("{} is not a valid URI: {}", server_uri, e))
    })?;
    match (uri.scheme_str(), uri.host()) {
        (Some("http") | Some("https"), Some(_)) => Ok(uri),
        _ => Err(ClientError::InvalidArgument(format!(
            "{} is not an absolute http(s) URI",
            server_uri
        ))),
    }
}

fn body_error(e: http::Error) -> ClientError {
    ClientError::InvalidArgument(format!("unable to build the request: {}", e))
}

#[async_trait]
impl HttpXCapClient for BaseHttpXCapClient {
    async fn connect(
        &mut self,
        server_uri: &str,
        user_address: &str,
        username: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        check_user_address(user_address)?;
        let root = check_server_uri(server_uri)?;
        let origin = origin(&root).ok_or_else(|| {
            ClientError::InvalidArgument(format!("{} is not an absolute URI", server_uri))
        })?;

        self.session = Some(Session {
            root: server_uri.to_string(),
            origin,
            user_address: user_address.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        });
        tracing::info!(server=%server_uri, user=%user_address, "XCAP client connected");
        Ok(())
    }

    fn disconnect(&mut self) {
        if self.session.take().is_some() {
            tracing::info!("XCAP client disconnected");
        }
    }

    fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    fn user_address(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user_address.as_str())
    }

    async fn get(&mut self, id: &XCapResourceId) -> Result<XCapHttpResponse, ClientError> {
        let uri = self.resource_uri(id)?;
        self.get_uri(&uri).await
    }

    async fn get_uri(&mut self, uri: &Uri) -> Result<XCapHttpResponse, ClientError> {
        let request = self
            .request(Method::GET, uri)?
            .body(Bytes::new())
            .map_err(body_error)?;
        self.execute(request).await
    }

    async fn put(&mut self, resource: &XCapResource) -> Result<XCapHttpResponse, ClientError> {
        let uri = self.resource_uri(resource.id())?;
        let mut builder = self
            .request(Method::PUT, &uri)?
            .header(CONTENT_TYPE, resource.content_type());
        if let Some(etag) = resource.if_match() {
            builder = builder.header(IF_MATCH, etag);
        }
        let request = builder
            .body(Bytes::copy_from_slice(resource.content().as_bytes()))
            .map_err(body_error)?;
        self.execute(request).await
    }

    async fn delete(&mut self, id: &XCapResourceId) -> Result<XCapHttpResponse, ClientError> {
        let uri = self.resource_uri(id)?;
        let request = self
            .request(Method::DELETE, &uri)?
            .body(Bytes::new())
            .map_err(body_error)?;
        self.execute(request).await
    }

    fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }
}
