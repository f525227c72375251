//! PayPal order resource.
//!
//! Only the fields the provider reads are typed. Everything else lands in the
//! flattened `extra` maps so the full order body survives a decode/encode cycle
//! and reaches the framework unchanged.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Remote order status.
///
/// Statuses PayPal may add in the future decode as [`OrderStatus::Unknown`] instead of
/// failing the whole order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    /// Order created, buyer has not approved yet.
    Created,
    /// Order saved for later completion.
    Saved,
    /// Buyer approved the payment.
    Approved,
    /// All authorizations voided.
    Voided,
    /// Payment authorized or captured.
    Completed,
    /// Buyer must complete an action (for example 3-D Secure).
    PayerActionRequired,
    /// Any status not listed above.
    Unknown(String),
}

impl OrderStatus {
    /// Returns the wire value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Created => "CREATED",
            Self::Saved => "SAVED",
            Self::Approved => "APPROVED",
            Self::Voided => "VOIDED",
            Self::Completed => "COMPLETED",
            Self::PayerActionRequired => "PAYER_ACTION_REQUIRED",
            Self::Unknown(other) => other,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "CREATED" => Self::Created,
            "SAVED" => Self::Saved,
            "APPROVED" => Self::Approved,
            "VOIDED" => Self::Voided,
            "COMPLETED" => Self::Completed,
            "PAYER_ACTION_REQUIRED" => Self::PayerActionRequired,
            _ => Self::Unknown(value),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Unknown(other) => other,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderIntent {
    /// Capture immediately after approval.
    Capture,
    /// Authorize after approval, capture later.
    Authorize,
}

/// Currency amount as PayPal encodes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// ISO 4217 code.
    pub currency_code: String,
    /// Decimal string in major units.
    pub value: String,
    /// Fields such as `breakdown`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Money {
    /// Creates an amount without extra fields.
    #[must_use]
    pub fn new(currency_code: impl Into<String>, value: impl Into<String>) -> Self {
        Self { currency_code: currency_code.into(), value: value.into(), extra: Map::new() }
    }
}

/// HATEOAS link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Target URL.
    pub href: String,
    /// Relation (`self`, `approve`, `payer-action`, ...).
    pub rel: String,
    /// HTTP method for the link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Fields such as `encType`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Authorization against a purchase unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authorization {
    /// Authorization id.
    pub id: String,
    /// Authorization status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Authorized amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Capture against a purchase unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    /// Capture id.
    pub id: String,
    /// Capture status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Captured amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Refund of a capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Refund {
    /// Refund id.
    pub id: String,
    /// Refund status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Refunded amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payments recorded on a purchase unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payments {
    /// Authorizations, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authorizations: Vec<Authorization>,
    /// Captures, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub captures: Vec<Capture>,
    /// Refunds, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub refunds: Vec<Refund>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Purchase unit of an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseUnit {
    /// Merchant reference (`default` when not set at creation).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    /// Purchase amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    /// Merchant invoice number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
    /// Authorizations and captures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payments: Option<Payments>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Remote order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Order id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Order status.
    pub status: OrderStatus,
    /// Order intent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<OrderIntent>,
    /// Purchase units. Only single-unit orders are supported.
    ///
    /// Absent and empty are kept apart so the body is re-encoded as received; read
    /// through [`Order::units`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_units: Option<Vec<PurchaseUnit>>,
    /// Creation timestamp, verbatim. See [`Order::created_at`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    /// Last update timestamp, verbatim. See [`Order::updated_at`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    /// HATEOAS links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<Link>>,
    /// Remaining fields (`payer`, `payment_source`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Order {
    /// Returns the purchase units, empty when the order carries none.
    #[must_use]
    pub fn units(&self) -> &[PurchaseUnit] {
        self.purchase_units.as_deref().unwrap_or_default()
    }

    /// Parses `create_time`. `None` if absent or not RFC 3339.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.create_time.as_deref()?)
    }

    /// Parses `update_time`. `None` if absent or not RFC 3339.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.update_time.as_deref()?)
    }

    /// Returns the link the buyer follows to approve the order, if any.
    #[must_use]
    pub fn approve_link(&self) -> Option<&str> {
        self.links
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|link| link.rel == "approve" || link.rel == "payer-action")
            .map(|link| link.href.as_str())
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw).ok().map(|t| t.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER_JSON: &str = r#"{
        "id": "5O190127TN364715T",
        "status": "COMPLETED",
        "intent": "AUTHORIZE",
        "create_time": "2024-03-01T10:00:00Z",
        "payer": { "email_address": "buyer@example.com" },
        "purchase_units": [{
            "reference_id": "default",
            "amount": { "currency_code": "USD", "value": "10.00" },
            "payments": {
                "authorizations": [{ "id": "A1", "status": "CREATED",
                    "amount": { "currency_code": "USD", "value": "10.00" },
                    "expiration_time": "2024-03-30T10:00:00Z" }]
            }
        }],
        "links": [{ "href": "https://api-m.paypal.com/v2/checkout/orders/5O190127TN364715T",
                    "rel": "self", "method": "GET" }]
    }"#;

    #[test]
    fn test_order_decodes_typed_fields() {
        let order: Order = serde_json::from_str(ORDER_JSON).unwrap();
        assert_eq!(order.id.as_deref(), Some("5O190127TN364715T"));
        assert_eq!(order.status, OrderStatus::Completed);
        assert_eq!(order.intent, Some(OrderIntent::Authorize));
        let payments = order.units()[0].payments.as_ref().unwrap();
        assert_eq!(payments.authorizations[0].id, "A1");
        assert!(payments.captures.is_empty());
        assert_eq!(order.created_at().unwrap().to_rfc3339(), "2024-03-01T10:00:00+00:00");
    }

    #[test]
    fn test_loose_timestamp_does_not_fail_decode() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": "O1",
            "status": "CREATED",
            "create_time": "2024-03-01 10:00",
            "update_time": "2024-03-01T10:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(order.created_at(), None);
        assert!(order.updated_at().is_some());
        let encoded = serde_json::to_value(&order).unwrap();
        assert_eq!(encoded["create_time"], "2024-03-01 10:00");
        assert_eq!(encoded["update_time"], "2024-03-01T10:00:00.000Z");
    }

    #[test]
    fn test_absent_and_empty_lists_are_kept_apart() {
        let bare: Order = serde_json::from_str(r#"{"id":"O1","status":"CREATED"}"#).unwrap();
        assert!(bare.units().is_empty());
        let encoded = serde_json::to_value(&bare).unwrap();
        assert!(encoded.get("purchase_units").is_none());
        assert!(encoded.get("links").is_none());

        let empty: Order =
            serde_json::from_str(r#"{"id":"O1","status":"CREATED","links":[]}"#).unwrap();
        assert_eq!(serde_json::to_value(&empty).unwrap()["links"], serde_json::json!([]));
    }

    #[test]
    fn test_order_preserves_unknown_fields() {
        let order: Order = serde_json::from_str(ORDER_JSON).unwrap();
        let encoded = serde_json::to_value(&order).unwrap();
        assert_eq!(encoded["payer"]["email_address"], "buyer@example.com");
        assert_eq!(
            encoded["purchase_units"][0]["payments"]["authorizations"][0]["expiration_time"],
            "2024-03-30T10:00:00Z"
        );
    }

    #[test]
    fn test_unknown_status_is_kept_verbatim() {
        let order: Order = serde_json::from_str(r#"{"id":"O9","status":"ON_HOLD"}"#).unwrap();
        assert_eq!(order.status, OrderStatus::Unknown("ON_HOLD".to_owned()));
        assert_eq!(serde_json::to_value(&order).unwrap()["status"], "ON_HOLD");
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            OrderStatus::from("PAYER_ACTION_REQUIRED".to_owned()),
            OrderStatus::PayerActionRequired
        );
        assert_eq!(OrderStatus::Voided.to_string(), "VOIDED");
    }

    #[test]
    fn test_approve_link() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "id": "O1",
            "status": "CREATED",
            "links": [
                { "href": "https://api.example.com/self", "rel": "self" },
                { "href": "https://www.paypal.com/checkoutnow?token=O1", "rel": "approve" }
            ]
        }))
        .unwrap();
        assert_eq!(order.approve_link(), Some("https://www.paypal.com/checkoutnow?token=O1"));
    }
}
