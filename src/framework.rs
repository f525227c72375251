//! Contract between the payment framework and a payment provider.
//!
//! The framework drives a payment session through [`PaymentProvider`] and stores
//! whatever `data` each call returns. It never interprets that blob; it only
//! hands it back on the next call for the same session.

use std::collections::HashMap;
#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::Result, status::PaymentSessionStatus};

/// Input for starting a payment session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiatePaymentInput {
    /// Amount in major units.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

/// Result of starting a payment session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitiatePaymentOutput {
    /// Provider-side identifier of the session.
    pub id: String,
    /// Session payload to store.
    pub data: Value,
    /// Status right after creation.
    pub status: PaymentSessionStatus,
}

/// Input for operations that only need the stored session payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSessionInput {
    /// Payload previously returned by the provider.
    pub data: Value,
}

impl PaymentSessionInput {
    /// Wraps a stored payload.
    #[must_use]
    pub const fn new(data: Value) -> Self {
        Self { data }
    }
}

/// Input for a refund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundPaymentInput {
    /// Payload previously returned by the provider.
    pub data: Value,
    /// Amount to refund in major units, in the payment's currency.
    pub amount: Decimal,
}

/// Input for changing the payment amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePaymentInput {
    /// Payload previously returned by the provider.
    pub data: Value,
    /// New amount in major units.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

/// Output carrying the refreshed session payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSessionOutput {
    /// Session payload to store.
    pub data: Value,
}

/// Output carrying the session payload and its mapped status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentStatusOutput {
    /// Session payload to store.
    pub data: Value,
    /// Framework status.
    pub status: PaymentSessionStatus,
}

/// Incoming webhook as received by the framework.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderWebhookPayload {
    /// Parsed body.
    pub data: HashMap<String, Value>,
    /// Raw body bytes.
    pub raw_data: Vec<u8>,
    /// Request headers.
    pub headers: HashMap<String, String>,
}

/// What the framework should do in response to a webhook.
///
/// The full framework vocabulary; this provider only answers
/// [`PaymentAction::NotSupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentAction {
    /// Mark the session authorized.
    Authorized,
    /// Mark the session captured.
    Captured,
    /// Mark the session failed.
    Failed,
    /// The provider does not act on this webhook.
    NotSupported,
}

/// Classification of an incoming webhook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookActionResult {
    /// Action for the framework to take.
    pub action: PaymentAction,
    /// Data extracted from the event, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl WebhookActionResult {
    /// Result for webhooks the provider ignores.
    #[must_use]
    pub const fn not_supported() -> Self {
        Self { action: PaymentAction::NotSupported, data: None }
    }
}

/// Payment lifecycle operations a provider exposes to the framework.
///
/// Every operation is stateless on the provider side: all session state travels in
/// the `data` payload.
pub trait PaymentProvider: Send + Sync {
    /// Starts a payment session.
    ///
    /// # Errors
    ///
    /// Returns error if the amount is invalid or the remote session cannot be created.
    fn initiate_payment<'a>(
        &'a self,
        input: InitiatePaymentInput,
    ) -> impl Future<Output = Result<InitiatePaymentOutput>> + Send + 'a;

    /// Reports whether the buyer authorized the payment.
    ///
    /// # Errors
    ///
    /// Returns error if the payload is invalid or the remote call fails.
    fn authorize_payment<'a>(
        &'a self,
        input: PaymentSessionInput,
    ) -> impl Future<Output = Result<PaymentStatusOutput>> + Send + 'a;

    /// Settles authorized funds.
    ///
    /// # Errors
    ///
    /// Returns error if there is nothing to capture or the remote call fails.
    fn capture_payment<'a>(
        &'a self,
        input: PaymentSessionInput,
    ) -> impl Future<Output = Result<PaymentSessionOutput>> + Send + 'a;

    /// Cancels the payment, releasing or returning funds.
    ///
    /// # Errors
    ///
    /// Returns error if there is nothing to cancel or the remote call fails.
    fn cancel_payment<'a>(
        &'a self,
        input: PaymentSessionInput,
    ) -> impl Future<Output = Result<PaymentSessionOutput>> + Send + 'a;

    /// Returns captured funds to the buyer.
    ///
    /// # Errors
    ///
    /// Returns error if nothing was captured or the remote call fails.
    fn refund_payment<'a>(
        &'a self,
        input: RefundPaymentInput,
    ) -> impl Future<Output = Result<PaymentSessionOutput>> + Send + 'a;

    /// Refreshes the session payload from the provider.
    ///
    /// # Errors
    ///
    /// Returns error if the payload is invalid or the remote call fails.
    fn retrieve_payment<'a>(
        &'a self,
        input: PaymentSessionInput,
    ) -> impl Future<Output = Result<PaymentSessionOutput>> + Send + 'a;

    /// Changes the payment amount.
    ///
    /// # Errors
    ///
    /// Returns error if the amount is invalid or the remote call fails.
    fn update_payment<'a>(
        &'a self,
        input: UpdatePaymentInput,
    ) -> impl Future<Output = Result<PaymentSessionOutput>> + Send + 'a;

    /// Returns the current framework status.
    ///
    /// # Errors
    ///
    /// Returns error if the payload is invalid or the remote call fails.
    fn get_payment_status<'a>(
        &'a self,
        input: PaymentSessionInput,
    ) -> impl Future<Output = Result<PaymentStatusOutput>> + Send + 'a;

    /// Forgets the session.
    ///
    /// # Errors
    ///
    /// Returns error if the provider cannot release the session.
    fn delete_payment<'a>(
        &'a self,
        input: PaymentSessionInput,
    ) -> impl Future<Output = Result<PaymentSessionOutput>> + Send + 'a;

    /// Classifies an incoming webhook.
    ///
    /// # Errors
    ///
    /// Returns error if the webhook cannot be interpreted.
    fn get_webhook_action_and_data<'a>(
        &'a self,
        payload: ProviderWebhookPayload,
    ) -> impl Future<Output = Result<WebhookActionResult>> + Send + 'a;
}
