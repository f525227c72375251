//! Shared fixtures for provider integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::{collections::VecDeque, sync::Mutex};

use paypal_provider::{
    client::{ApiResult, OrdersApi},
    error::ApiError,
    models::{Capture, CaptureRequest, CreateOrderRequest, Money, Order, Refund, RefundRequest},
};
use serde_json::{Map, Value, json};

/// Remote call observed by [`FakeOrdersApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateOrder { currency_code: String, value: String },
    GetOrder(String),
    UpdateOrderAmount { order_id: String, currency_code: String, value: String },
    CaptureAuthorization(String),
    VoidAuthorization(String),
    RefundCapture { capture_id: String, amount: Option<String> },
}

/// In-memory [`OrdersApi`] with scripted orders.
///
/// `create_order` and `get_order` return queued orders front to back; mutations
/// succeed unless [`FakeOrdersApi::fail_mutations`] is set.
#[derive(Debug, Default)]
pub struct FakeOrdersApi {
    calls: Mutex<Vec<Call>>,
    orders: Mutex<VecDeque<Order>>,
    mutation_status: Mutex<Option<u16>>,
}

impl FakeOrdersApi {
    pub fn with_orders(orders: impl IntoIterator<Item = Value>) -> Self {
        let fake = Self::default();
        fake.orders.lock().unwrap().extend(orders.into_iter().map(order));
        fake
    }

    pub fn fail_mutations(&self, status: u16) {
        *self.mutation_status.lock().unwrap() = Some(status);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_order(&self) -> ApiResult<Order> {
        self.orders.lock().unwrap().pop_front().ok_or_else(|| status_error(404))
    }

    fn mutation_result(&self) -> ApiResult<()> {
        match *self.mutation_status.lock().unwrap() {
            Some(status) => Err(status_error(status)),
            None => Ok(()),
        }
    }
}

impl OrdersApi for FakeOrdersApi {
    async fn create_order<'a>(&'a self, request: &'a CreateOrderRequest) -> ApiResult<Order> {
        let amount = &request.purchase_units[0].amount;
        self.record(Call::CreateOrder {
            currency_code: amount.currency_code.clone(),
            value: amount.value.clone(),
        });
        self.next_order()
    }

    async fn get_order<'a>(&'a self, order_id: &'a str) -> ApiResult<Order> {
        self.record(Call::GetOrder(order_id.to_owned()));
        self.next_order()
    }

    async fn update_order_amount<'a>(
        &'a self,
        order_id: &'a str,
        amount: &'a Money,
    ) -> ApiResult<()> {
        self.record(Call::UpdateOrderAmount {
            order_id: order_id.to_owned(),
            currency_code: amount.currency_code.clone(),
            value: amount.value.clone(),
        });
        self.mutation_result()
    }

    async fn capture_authorization<'a>(
        &'a self,
        authorization_id: &'a str,
        _request: &'a CaptureRequest,
    ) -> ApiResult<Capture> {
        self.record(Call::CaptureAuthorization(authorization_id.to_owned()));
        self.mutation_result()?;
        Ok(Capture {
            id: "C1".to_owned(),
            status: Some("COMPLETED".to_owned()),
            amount: None,
            extra: Map::new(),
        })
    }

    async fn void_authorization<'a>(&'a self, authorization_id: &'a str) -> ApiResult<()> {
        self.record(Call::VoidAuthorization(authorization_id.to_owned()));
        self.mutation_result()
    }

    async fn refund_capture<'a>(
        &'a self,
        capture_id: &'a str,
        request: &'a RefundRequest,
    ) -> ApiResult<Refund> {
        self.record(Call::RefundCapture {
            capture_id: capture_id.to_owned(),
            amount: request.amount.as_ref().map(|m| format!("{} {}", m.value, m.currency_code)),
        });
        self.mutation_result()?;
        Ok(Refund {
            id: "R1".to_owned(),
            status: Some("COMPLETED".to_owned()),
            amount: request.amount.clone(),
            extra: Map::new(),
        })
    }
}

fn status_error(status: u16) -> ApiError {
    ApiError::Status {
        status,
        debug_id: Some("test-debug-id".to_owned()),
        headers: vec![("paypal-debug-id".to_owned(), "test-debug-id".to_owned())],
        body: String::new(),
    }
}

pub fn order(value: Value) -> Order {
    serde_json::from_value(value).unwrap()
}

/// Session payload as the provider would have stored it for `order`.
pub fn payload(order: &Value) -> Value {
    json!({ "type": "paypal_order", "paypalOrderId": order["id"], "order": order })
}

/// Order with one USD purchase unit carrying `payments`.
pub fn order_with_payments(id: &str, status: &str, payments: Value) -> Value {
    json!({
        "id": id,
        "status": status,
        "intent": "AUTHORIZE",
        "purchase_units": [{
            "reference_id": "default",
            "amount": { "currency_code": "USD", "value": "10.00" },
            "payments": payments
        }]
    })
}

/// Order with one USD purchase unit and no payments yet.
pub fn created_order(id: &str) -> Value {
    json!({
        "id": id,
        "status": "CREATED",
        "intent": "AUTHORIZE",
        "purchase_units": [{
            "reference_id": "default",
            "amount": { "currency_code": "USD", "value": "10.00" }
        }],
        "links": [{
            "href": format!("https://www.sandbox.paypal.com/checkoutnow?token={id}"),
            "rel": "approve",
            "method": "GET"
        }]
    })
}
