//! Remote order status to framework payment status mapping.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::OrderStatus;

/// Payment session status as the framework understands it.
///
/// [`Captured`](Self::Captured) and [`Error`](Self::Error) belong to the framework
/// vocabulary; [`map_order_status`] never returns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentSessionStatus {
    /// Nothing reserved yet.
    Pending,
    /// The buyer still has to act.
    RequiresMore,
    /// Funds are reserved or settled.
    Authorized,
    /// Funds are settled.
    Captured,
    /// The payment was voided.
    Canceled,
    /// The payment failed.
    Error,
}

impl PaymentSessionStatus {
    /// Returns the framework value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::RequiresMore => "requires_more",
            Self::Authorized => "authorized",
            Self::Captured => "captured",
            Self::Canceled => "canceled",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for PaymentSessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a remote order status to the framework status.
///
/// | Remote | Framework |
/// |---|---|
/// | `CREATED` | `pending` |
/// | `SAVED`, `APPROVED`, `PAYER_ACTION_REQUIRED` | `requires_more` |
/// | `VOIDED` | `canceled` |
/// | `COMPLETED` | `authorized` |
/// | anything else | `pending` |
#[must_use]
pub fn map_order_status(status: &OrderStatus) -> PaymentSessionStatus {
    match status {
        OrderStatus::Saved | OrderStatus::Approved | OrderStatus::PayerActionRequired => {
            PaymentSessionStatus::RequiresMore
        }
        OrderStatus::Voided => PaymentSessionStatus::Canceled,
        OrderStatus::Completed => PaymentSessionStatus::Authorized,
        OrderStatus::Created | OrderStatus::Unknown(_) => PaymentSessionStatus::Pending,
    }
}
