//! Payment lifecycle operations.
//!
//! Used as context in errors and log fields so a failure can always be traced
//! back to the lifecycle method that produced it.

use std::fmt;

/// Lifecycle operation exposed to the payment framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create a remote order for a new payment session.
    InitiatePayment,
    /// Confirm the buyer-approved authorization.
    AuthorizePayment,
    /// Capture the reserved funds.
    CapturePayment,
    /// Void the authorization or refund the capture.
    CancelPayment,
    /// Refund part or all of a capture.
    RefundPayment,
    /// Re-fetch the remote order.
    RetrievePayment,
    /// Replace the order amount.
    UpdatePayment,
    /// Map the remote status to a framework status.
    GetPaymentStatus,
    /// Drop the session (no remote call).
    DeletePayment,
}

impl Operation {
    /// Returns the framework-facing method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InitiatePayment => "initiatePayment",
            Self::AuthorizePayment => "authorizePayment",
            Self::CapturePayment => "capturePayment",
            Self::CancelPayment => "cancelPayment",
            Self::RefundPayment => "refundPayment",
            Self::RetrievePayment => "retrievePayment",
            Self::UpdatePayment => "updatePayment",
            Self::GetPaymentStatus => "getPaymentStatus",
            Self::DeletePayment => "deletePayment",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
