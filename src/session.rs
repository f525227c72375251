//! Session payload stored by the framework.
//!
//! The framework persists whatever the provider returns as `data` without
//! interpreting it. This module owns that blob: a tagged record holding the
//! order id and the full remote order.
//!
//! ```json
//! { "type": "paypal_order", "paypalOrderId": "O1", "order": { "id": "O1", ... } }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{ProviderError, Result},
    models::Order,
    operation::Operation,
};

/// Session payload owned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "paypal_order", rename_all = "camelCase")]
pub struct SessionData {
    /// Denormalized order id.
    pub paypal_order_id: String,
    /// Last known remote order.
    pub order: Order,
}

impl SessionData {
    /// Wraps an order fetched from PayPal.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidSessionData`] if the order has no id.
    pub fn from_order(order: Order, operation: Operation) -> Result<Self> {
        let paypal_order_id = order
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| invalid(operation, "order has no id"))?;
        Ok(Self { paypal_order_id, order })
    }

    /// Decodes the blob handed back by the framework.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidSessionData`] if the blob is absent, was not written
    /// by this provider, or carries an order whose id disagrees with `paypalOrderId`.
    pub fn from_value(data: &Value, operation: Operation) -> Result<Self> {
        if data.is_null() {
            return Err(invalid(operation, "payload is empty"));
        }
        let session = Self::deserialize(data).map_err(|e| invalid(operation, e.to_string()))?;
        if session.order.id.as_deref() != Some(session.paypal_order_id.as_str()) {
            return Err(invalid(operation, "paypalOrderId does not match the embedded order"));
        }
        Ok(session)
    }

    /// Encodes the payload for the framework.
    #[must_use]
    pub fn to_value(&self) -> Value {
        // Every field is plain data with string keys, serialization cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn invalid(operation: Operation, reason: impl Into<String>) -> ProviderError {
    ProviderError::InvalidSessionData { operation, reason: reason.into() }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{error::ErrorKind, models::OrderStatus};

    fn order(id: &str) -> Order {
        serde_json::from_value(json!({ "id": id, "status": "CREATED" })).unwrap()
    }

    #[test]
    fn test_encodes_tagged_record() {
        let session = SessionData::from_order(order("O1"), Operation::InitiatePayment).unwrap();
        let value = session.to_value();
        assert_eq!(value["type"], "paypal_order");
        assert_eq!(value["paypalOrderId"], "O1");
        assert_eq!(value["order"]["status"], "CREATED");
    }

    #[test]
    fn test_decodes_own_payload() {
        let value = json!({
            "type": "paypal_order",
            "paypalOrderId": "O1",
            "order": { "id": "O1", "status": "APPROVED" }
        });
        let session = SessionData::from_value(&value, Operation::RetrievePayment).unwrap();
        assert_eq!(session.paypal_order_id, "O1");
        assert_eq!(session.order.status, OrderStatus::Approved);
    }

    #[test]
    fn test_rejects_foreign_payload() {
        let value = json!({ "id": "pi_123", "client_secret": "x" });
        let err = SessionData::from_value(&value, Operation::CapturePayment).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SessionData);
    }

    #[test]
    fn test_rejects_null_payload() {
        let err = SessionData::from_value(&Value::Null, Operation::CancelPayment).unwrap_err();
        assert!(err.to_string().contains("payload is empty"));
    }

    #[test]
    fn test_rejects_mismatched_ids() {
        let value = json!({
            "type": "paypal_order",
            "paypalOrderId": "O1",
            "order": { "id": "O2", "status": "CREATED" }
        });
        assert!(SessionData::from_value(&value, Operation::RetrievePayment).is_err());
    }

    #[test]
    fn test_order_without_id_rejected() {
        let order: Order = serde_json::from_value(json!({ "status": "CREATED" })).unwrap();
        assert!(SessionData::from_order(order, Operation::InitiatePayment).is_err());
    }

    #[test]
    fn test_paypal_order_body_round_trips_unchanged() {
        let data = json!({
            "type": "paypal_order",
            "paypalOrderId": "5O190127TN364715T",
            "order": {
                "id": "5O190127TN364715T",
                "status": "PAYER_ACTION_REQUIRED",
                "intent": "AUTHORIZE",
                "create_time": "2024-03-01T10:00:00.000Z",
                "update_time": "2024-03-01 10:05",
                "payment_source": { "paypal": { "email_address": "buyer@example.com" } },
                "links": [
                    {
                        "href": "https://api-m.paypal.com/v2/checkout/orders/5O190127TN364715T",
                        "rel": "self",
                        "method": "GET",
                        "encType": "application/json"
                    },
                    {
                        "href": "https://www.paypal.com/checkoutnow?token=5O190127TN364715T",
                        "rel": "payer-action",
                        "method": "GET"
                    }
                ]
            }
        });

        let session = SessionData::from_value(&data, Operation::RetrievePayment).unwrap();
        assert_eq!(session.to_value(), data);
    }
}
