//! Error types for route compilation and dispatch.

use thiserror::Error;

/// Errors raised while building or driving a router.
#[derive(Debug, Error)]
pub enum RouterError {
    /// The builder was finished without a route table ever being declared
    #[error("router '{router}' declares no route table")]
    MissingRoutes {
        /// Display name of the offending router
        router: String,
    },

    /// A route referenced a handler name with no registered handler
    #[error("router '{router}' has no handler named '{handler}'")]
    UnknownHandler {
        /// Display name of the router
        router: String,
        /// The unresolved handler name
        handler: String,
    },

    /// Parameter extraction was called with a path the route does not match
    #[error("path '{path}' does not match route '{route}'")]
    UnmatchedPath {
        /// The offending path
        path: String,
        /// The compiled pattern it was tested against
        route: String,
    },

    /// A captured parameter carried malformed percent-encoding
    #[error("invalid percent-encoding in captured value '{value}'")]
    Decode {
        /// The raw captured value
        value: String,
        /// Underlying UTF-8 decode failure
        #[source]
        source: std::string::FromUtf8Error,
    },

    /// Path compilation produced a pattern the regex engine rejected
    #[error("route path '{path}' produced an invalid pattern")]
    Pattern {
        /// The source route path
        path: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },
}
