//! Error types for the PayPal payment provider.
//!
//! All errors implement [`std::error::Error`] via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Configuration** ([`ProviderError::InvalidOptions`]): the provider cannot start
//! - **Precondition** ([`ProviderError::NoAuthorization`], [`ProviderError::UncapturedPayment`],
//!   ...): the stored order lacks the data the operation structurally needs
//! - **Session data** ([`ProviderError::InvalidSessionData`]): the framework handed back a blob
//!   this provider did not write
//! - **Remote** ([`ProviderError::Remote`]): PayPal or the network failed
//!
//! Use [`ProviderError::kind`] to branch on the category instead of matching messages.
//!
//! # Examples
//!
//! ```
//! use paypal_provider::error::{ErrorKind, ProviderError};
//!
//! let err = ProviderError::UncapturedPayment;
//! assert_eq!(err.kind(), ErrorKind::Precondition);
//! assert_eq!(err.to_string(), "cannot refund an uncaptured payment");
//! ```

use thiserror::Error;

use crate::operation::Operation;

/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Coarse classification of a [`ProviderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Options missing or invalid; fatal at startup.
    Configuration,
    /// The stored order cannot support the requested operation.
    Precondition,
    /// The session blob is missing or was not written by this provider.
    SessionData,
    /// Transport or API failure talking to PayPal.
    Remote,
}

/// Errors returned by the payment provider.
///
/// # Error Recovery
///
/// - **Configuration**: fix the provider options and restart
/// - **Precondition**: do not retry; the order must change first (for example, be captured)
/// - **Remote**: the remote order is the source of truth, so re-fetch it and decide whether to
///   retry. The provider itself never retries.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider options are missing or invalid.
    ///
    /// Raised by option validation and construction. The three required options are
    /// `client_id`, `client_secret`, and `environment` (`sandbox` or `production`).
    #[error("invalid PayPal provider options: {0}")]
    InvalidOptions(String),

    /// The session payload is absent or not a PayPal order payload.
    #[error("invalid session data in {operation}: {reason}")]
    InvalidSessionData {
        /// Operation that read the payload.
        operation: Operation,
        /// What was wrong with it.
        reason: String,
    },

    /// The order has no purchase unit.
    #[error("{operation} failed: order has no purchase unit")]
    MissingPurchaseUnit {
        /// Operation that inspected the order.
        operation: Operation,
    },

    /// The order has more than one purchase unit.
    ///
    /// Only single-purchase-unit orders are supported.
    #[error("{operation} failed: order has {count} purchase units, only one is supported")]
    MultiplePurchaseUnits {
        /// Operation that inspected the order.
        operation: Operation,
        /// Number of purchase units found.
        count: usize,
    },

    /// The purchase unit carries no payments collection.
    #[error("{operation} failed: purchase unit has no payments")]
    MissingPayments {
        /// Operation that inspected the order.
        operation: Operation,
    },

    /// There is no authorization to capture or void.
    #[error("{operation} failed: order has no authorization")]
    NoAuthorization {
        /// Operation that inspected the order.
        operation: Operation,
    },

    /// A refund was requested before anything was captured.
    #[error("cannot refund an uncaptured payment")]
    UncapturedPayment,

    /// The amount cannot be sent to PayPal.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The currency code is not an ISO 4217 alphabetic code.
    #[error("invalid currency code: {0}")]
    InvalidCurrency(String),

    /// A remote call failed.
    ///
    /// The message only names the operation; the underlying [`ApiError`] is kept as the
    /// error source for logging.
    #[error("payment operation failed in {operation}")]
    Remote {
        /// Operation that issued the call.
        operation: Operation,
        /// Underlying client error.
        #[source]
        source: ApiError,
    },
}

impl ProviderError {
    /// Returns the error category.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidOptions(_) => ErrorKind::Configuration,
            Self::InvalidSessionData { .. } => ErrorKind::SessionData,
            Self::MissingPurchaseUnit { .. }
            | Self::MultiplePurchaseUnits { .. }
            | Self::MissingPayments { .. }
            | Self::NoAuthorization { .. }
            | Self::UncapturedPayment
            | Self::InvalidAmount(_)
            | Self::InvalidCurrency(_) => ErrorKind::Precondition,
            Self::Remote { .. } => ErrorKind::Remote,
        }
    }

    /// Wraps a client error as a remote failure of `operation`.
    pub fn remote(operation: Operation, source: ApiError) -> Self {
        Self::Remote { operation, source }
    }
}

/// Errors produced by the PayPal REST client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or protocol failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// PayPal answered with a non-success status.
    #[error("PayPal returned status {status}{}", debug_suffix(.debug_id.as_deref()))]
    Status {
        /// HTTP status code.
        status: u16,
        /// `PayPal-Debug-Id` header, when present.
        debug_id: Option<String>,
        /// Response headers.
        headers: Vec<(String, String)>,
        /// Raw response body.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("cannot decode PayPal response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The order in the response has no identifier.
    #[error("PayPal response is missing the order id")]
    MissingOrderId,

    /// The token endpoint answered 2xx with a body that is not a token.
    ///
    /// A non-2xx answer from the token endpoint is reported as [`ApiError::Status`].
    #[error("PayPal authentication failed: {0}")]
    Authentication(String),

    /// A resource identifier cannot be used as a URL path segment.
    #[error("invalid resource id: {0:?}")]
    InvalidPath(String),
}

fn debug_suffix(debug_id: Option<&str>) -> String {
    debug_id.map(|id| format!(" (debug id {id})")).unwrap_or_default()
}

impl ApiError {
    /// Returns the HTTP status code, if the service produced one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
