use crate::error::ClientError;

/// Told about the errors the user should hear of even when the caller
/// handles the returned error, eg. an XCAP server that can't be resolved.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, err: &ClientError);
}

/// Report through the tracing subscriber
#[derive(Default)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, err: &ClientError) {
        tracing::error!(err=%err, "XCAP server unreachable, the client has been disconnected");
    }
}
