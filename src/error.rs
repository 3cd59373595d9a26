//! Error types for the deal client.

use derive_more::{Display, Error};
use tracing::{debug, instrument};

/// What went wrong while talking to the game server or the operator.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DealErrorKind {
    /// A required relation is absent from a resource.
    #[display("no link with relation '{rel}' in resource at {url}")]
    LinkNotFound {
        /// Relation that was looked up.
        rel: String,
        /// Resource that was searched.
        url: String,
    },

    /// The request never produced a response (connect failure, timeout, ...).
    #[display("{method} {url} failed: {reason}")]
    Transport {
        /// HTTP method of the failed request.
        method: String,
        /// Target URL.
        url: String,
        /// Underlying transport failure.
        reason: String,
    },

    /// The server answered with a non-2xx status.
    #[display("{method} {url} returned HTTP {status}: {body}")]
    HttpStatus {
        /// HTTP method of the rejected request.
        method: String,
        /// Target URL.
        url: String,
        /// Response status code.
        status: u16,
        /// Response body, as sent by the server.
        body: String,
    },

    /// A payload did not have the shape of the expected resource.
    #[display("could not decode resource at {url}: {reason}")]
    Decode {
        /// URL the payload came from.
        url: String,
        /// Decoder message.
        reason: String,
    },

    /// Game creation succeeded but no `Location` header came back.
    #[display("POST {url} did not return a Location header")]
    MissingLocationHeader {
        /// Game root the POST was sent to.
        url: String,
    },

    /// Operator picked a door index outside the loaded collection.
    #[display("door {index} does not exist (valid doors: 0..{count})")]
    InvalidSelection {
        /// Index the operator asked for.
        index: usize,
        /// Number of doors currently loaded.
        count: usize,
    },

    /// A door URL that is not part of the current door index.
    #[display("door {url} is not part of the current game")]
    UnknownDoor {
        /// URL that was rejected.
        url: String,
    },

    /// Operator quit (or input ended) before the game was finished.
    #[display("operator aborted during the {turn} turn")]
    Aborted {
        /// Turn that was in progress.
        turn: String,
    },

    /// Configuration could not be loaded or is invalid.
    #[display("configuration error: {message}")]
    Config {
        /// What was wrong.
        message: String,
    },

    /// Reading from or writing to the operator console failed.
    #[display("console error: {message}")]
    Console {
        /// Underlying I/O failure.
        message: String,
    },
}

/// Deal client error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("{} at {}:{}", kind, file, line)]
pub struct DealError {
    /// Error category and context.
    pub kind: DealErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DealError {
    /// Creates a new error with caller location tracking.
    #[track_caller]
    #[instrument(skip(kind))]
    pub fn new(kind: DealErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        debug!(error = %kind, "Deal error created");
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// True for network failures, timeouts and non-2xx responses.
    pub fn is_transport(&self) -> bool {
        matches!(
            self.kind,
            DealErrorKind::Transport { .. } | DealErrorKind::HttpStatus { .. }
        )
    }

    /// HTTP status of a rejected request, if this is one.
    pub fn http_status(&self) -> Option<u16> {
        match self.kind {
            DealErrorKind::HttpStatus { status, .. } => Some(status),
            _ => None,
        }
    }
}

impl From<DealErrorKind> for DealError {
    #[track_caller]
    fn from(kind: DealErrorKind) -> Self {
        Self::new(kind)
    }
}
