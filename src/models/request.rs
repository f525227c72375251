//! Request bodies sent to the Orders and Payments APIs.

use serde::Serialize;
use serde_json::Value;

use super::order::{Money, OrderIntent};

/// Reference id PayPal assigns to a purchase unit created without one.
pub const DEFAULT_REFERENCE_ID: &str = "default";

/// `POST /v2/checkout/orders` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderRequest {
    /// Order intent.
    pub intent: OrderIntent,
    /// Purchase units (exactly one).
    pub purchase_units: Vec<PurchaseUnitRequest>,
}

impl CreateOrderRequest {
    /// Builds an authorize-intent order with a single purchase unit.
    #[must_use]
    pub fn authorize(amount: Money) -> Self {
        Self {
            intent: OrderIntent::Authorize,
            purchase_units: vec![PurchaseUnitRequest {
                reference_id: None,
                amount,
                invoice_id: None,
            }],
        }
    }
}

/// Purchase unit in a create-order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseUnitRequest {
    /// Merchant reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    /// Purchase amount.
    pub amount: Money,
    /// Merchant invoice number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
}

/// JSON Patch operation kind. Only amount replacement is ever sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    /// Replace an existing value.
    Replace,
}

/// One entry of a `PATCH /v2/checkout/orders/{id}` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatchOperation {
    /// Operation kind.
    pub op: PatchOp,
    /// JSON Pointer-like target path.
    pub path: String,
    /// New value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOperation {
    /// Replaces the amount of the `default` purchase unit.
    #[must_use]
    pub fn replace_amount(amount: &Money) -> Self {
        Self {
            op: PatchOp::Replace,
            path: format!("/purchase_units/@reference_id=='{DEFAULT_REFERENCE_ID}'/amount"),
            value: Some(serde_json::json!({
                "currency_code": amount.currency_code,
                "value": amount.value,
            })),
        }
    }
}

/// `POST /v2/payments/authorizations/{id}/capture` body.
///
/// Always empty: the full authorized amount is captured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CaptureRequest {}

/// `POST /v2/payments/captures/{id}/refund` body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefundRequest {
    /// Amount to refund; the full capture when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
}

impl RefundRequest {
    /// Refunds the whole capture.
    #[must_use]
    pub fn full() -> Self {
        Self::default()
    }

    /// Refunds `amount`.
    #[must_use]
    pub fn partial(amount: Money) -> Self {
        Self { amount: Some(amount) }
    }
}
