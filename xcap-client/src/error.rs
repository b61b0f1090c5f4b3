use xcap_xml::error::ParsingError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("the XCAP client is not connected")]
    NotConnected,

    #[error("unknown host {host}")]
    UnknownHost {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse the {what} document")]
    Document {
        what: &'static str,
        #[source]
        source: ParsingError,
    },

    #[error("unable to serialize the {what} document")]
    Serialize {
        what: &'static str,
        #[source]
        source: quick_xml::Error,
    },

    #[error("the XCAP server answered {status}: {}", .message.as_deref().unwrap_or("no details"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },
}

impl ClientError {
    pub(crate) fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    pub(crate) fn http(message: impl Into<String>, source: hyper::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: std::io::Error::new(std::io::ErrorKind::Other, source),
        }
    }
}
