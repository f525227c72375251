//! PayPal payment provider.
//!
//! [`PaypalProvider`] implements [`PaymentProvider`] on top of an [`OrdersApi`]
//! client. Each operation decodes the stored [`SessionData`], decides what to do
//! from the last known order, issues the remote calls in sequence, and re-fetches
//! the order so the returned payload reflects PayPal's current state.
//!
//! # Lifecycle
//!
//! ```text
//! initiate ──► CREATED ──(buyer approves)──► APPROVED / COMPLETED
//!                                                 │
//!                         capture ◄───────────────┤
//!                            │                    └──► cancel ─► void
//!                            ▼
//!                       capture C1 ──► refund / cancel ─► refund C1
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use paypal_provider::{
//!     PaypalProvider,
//!     config::{Environment, ProviderOptions},
//!     framework::{InitiatePaymentInput, PaymentProvider},
//! };
//! use rust_decimal::Decimal;
//!
//! # async fn example() -> paypal_provider::Result<()> {
//! let options = ProviderOptions::new("client-id", "client-secret", Environment::Sandbox);
//! let provider = PaypalProvider::new(&options)?;
//!
//! let session = provider
//!     .initiate_payment(InitiatePaymentInput {
//!         amount: Decimal::new(1000, 2),
//!         currency_code: "USD".to_owned(),
//!     })
//!     .await?;
//! println!("Order {} is {}", session.id, session.status);
//! # Ok(())
//! # }
//! ```

use serde_json::Value;
use tracing::{Span, debug, error, info, instrument};

use crate::{
    amount::to_money,
    client::{OrdersApi, PaypalClient},
    config::{ProviderOptions, RawOptions},
    error::{ApiError, ProviderError, Result},
    framework::{
        InitiatePaymentInput, InitiatePaymentOutput, PaymentProvider, PaymentSessionInput,
        PaymentSessionOutput, PaymentStatusOutput, ProviderWebhookPayload, RefundPaymentInput,
        UpdatePaymentInput, WebhookActionResult,
    },
    models::{CaptureRequest, CreateOrderRequest, RefundRequest},
    operation::Operation,
    reconcile::{CancelAction, cancel_action, capture_target, refund_target},
    session::SessionData,
    status::map_order_status,
};

/// Payment provider backed by the PayPal Orders v2 API.
///
/// Holds nothing but the API client; all session state lives in the payload the
/// framework stores. Share it between tasks behind an `Arc`.
#[derive(Debug)]
pub struct PaypalProvider<A = PaypalClient> {
    api: A,
}

impl PaypalProvider<PaypalClient> {
    /// Creates a provider with a pooled HTTPS client for the configured environment.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidOptions`] if the options are invalid or the HTTP
    /// client cannot be built.
    pub fn new(options: &ProviderOptions) -> Result<Self> {
        options.validate()?;
        let api = PaypalClient::new(options)
            .map_err(|e| ProviderError::InvalidOptions(format!("cannot build client: {e}")))?;
        info!(environment = %options.environment, "PayPal provider initialized");
        Ok(Self { api })
    }

    /// Validates registration options without building a provider.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidOptions`] naming the first missing or invalid option.
    pub fn validate_options(options: &RawOptions) -> Result<()> {
        options.validate()
    }
}

impl<A: OrdersApi> PaypalProvider<A> {
    /// Creates a provider over any [`OrdersApi`] implementation.
    #[must_use]
    pub const fn with_api(api: A) -> Self {
        Self { api }
    }

    /// Returns the underlying API client.
    #[must_use]
    pub const fn api(&self) -> &A {
        &self.api
    }

    /// Decodes the stored payload and re-fetches its order.
    async fn retrieve(&self, data: &Value, operation: Operation) -> Result<SessionData> {
        let session = decode(data, operation)?;
        self.refresh(&session.paypal_order_id, operation).await
    }

    /// Fetches the order and wraps it as a fresh payload.
    async fn refresh(&self, order_id: &str, operation: Operation) -> Result<SessionData> {
        let order = self.api.get_order(order_id).await.map_err(|e| remote_failure(operation, e))?;
        if order.id.as_deref().is_none_or(str::is_empty) {
            return Err(remote_failure(operation, ApiError::MissingOrderId));
        }
        SessionData::from_order(order, operation)
    }
}

fn decode(data: &Value, operation: Operation) -> Result<SessionData> {
    let session = SessionData::from_value(data, operation)?;
    Span::current().record("order_id", session.paypal_order_id.as_str());
    Ok(session)
}

/// Logs a failed remote call and wraps it for the caller.
fn remote_failure(operation: Operation, error: ApiError) -> ProviderError {
    match &error {
        ApiError::Status { status, debug_id, headers, .. } => {
            error!(%operation, status, ?debug_id, ?headers, "PayPal request failed");
        }
        other => error!(%operation, error = %other, "PayPal request failed without a response"),
    }
    ProviderError::remote(operation, error)
}

impl<A: OrdersApi> PaymentProvider for PaypalProvider<A> {
    #[instrument(
        skip(self, input),
        fields(amount = %input.amount, currency = %input.currency_code, order_id)
    )]
    async fn initiate_payment<'a>(
        &'a self,
        input: InitiatePaymentInput,
    ) -> Result<InitiatePaymentOutput> {
        let operation = Operation::InitiatePayment;
        let money = to_money(input.amount, &input.currency_code)?;
        let request = CreateOrderRequest::authorize(money);

        let order =
            self.api.create_order(&request).await.map_err(|e| remote_failure(operation, e))?;
        if order.id.as_deref().is_none_or(str::is_empty) {
            return Err(remote_failure(operation, ApiError::MissingOrderId));
        }

        let session = SessionData::from_order(order, operation)?;
        let status = map_order_status(&session.order.status);
        Span::current().record("order_id", session.paypal_order_id.as_str());
        info!(%status, "PayPal order created");

        Ok(InitiatePaymentOutput {
            id: session.paypal_order_id.clone(),
            data: session.to_value(),
            status,
        })
    }

    #[instrument(skip(self, input), fields(order_id))]
    async fn authorize_payment<'a>(
        &'a self,
        input: PaymentSessionInput,
    ) -> Result<PaymentStatusOutput> {
        let session = self.retrieve(&input.data, Operation::AuthorizePayment).await?;
        let status = map_order_status(&session.order.status);
        info!(remote_status = %session.order.status, %status, "Authorization checked");
        Ok(PaymentStatusOutput { data: session.to_value(), status })
    }

    #[instrument(skip(self, input), fields(order_id))]
    async fn capture_payment<'a>(
        &'a self,
        input: PaymentSessionInput,
    ) -> Result<PaymentSessionOutput> {
        let operation = Operation::CapturePayment;
        let session = decode(&input.data, operation)?;
        let authorization_id = capture_target(&session.order)?;

        let capture = self
            .api
            .capture_authorization(authorization_id, &CaptureRequest::default())
            .await
            .map_err(|e| remote_failure(operation, e))?;
        info!(authorization_id, capture_id = %capture.id, "Authorization captured");

        let session = self.refresh(&session.paypal_order_id, operation).await?;
        Ok(PaymentSessionOutput { data: session.to_value() })
    }

    #[instrument(skip(self, input), fields(order_id))]
    async fn cancel_payment<'a>(
        &'a self,
        input: PaymentSessionInput,
    ) -> Result<PaymentSessionOutput> {
        let operation = Operation::CancelPayment;
        let session = decode(&input.data, operation)?;

        match cancel_action(&session.order)? {
            CancelAction::AlreadyTerminal => {
                info!(remote_status = %session.order.status, "Order already terminal");
                return Ok(PaymentSessionOutput { data: input.data });
            }
            CancelAction::RefundCapture { capture_id } => {
                let refund = self
                    .api
                    .refund_capture(capture_id, &RefundRequest::full())
                    .await
                    .map_err(|e| remote_failure(operation, e))?;
                info!(capture_id, refund_id = %refund.id, "Capture refunded");
            }
            CancelAction::VoidAuthorization { authorization_id } => {
                self.api
                    .void_authorization(authorization_id)
                    .await
                    .map_err(|e| remote_failure(operation, e))?;
                info!(authorization_id, "Authorization voided");
            }
        }

        let session = self.refresh(&session.paypal_order_id, operation).await?;
        Ok(PaymentSessionOutput { data: session.to_value() })
    }

    #[instrument(skip(self, input), fields(amount = %input.amount, order_id))]
    async fn refund_payment<'a>(
        &'a self,
        input: RefundPaymentInput,
    ) -> Result<PaymentSessionOutput> {
        let operation = Operation::RefundPayment;
        let session = decode(&input.data, operation)?;
        let target = refund_target(&session.order)?;
        let money = to_money(input.amount, target.currency_code)?;

        let refund = self
            .api
            .refund_capture(target.capture_id, &RefundRequest::partial(money))
            .await
            .map_err(|e| remote_failure(operation, e))?;
        info!(capture_id = target.capture_id, refund_id = %refund.id, "Capture refunded");

        let session = self.refresh(&session.paypal_order_id, operation).await?;
        Ok(PaymentSessionOutput { data: session.to_value() })
    }

    #[instrument(skip(self, input), fields(order_id))]
    async fn retrieve_payment<'a>(
        &'a self,
        input: PaymentSessionInput,
    ) -> Result<PaymentSessionOutput> {
        let session = self.retrieve(&input.data, Operation::RetrievePayment).await?;
        Ok(PaymentSessionOutput { data: session.to_value() })
    }

    #[instrument(
        skip(self, input),
        fields(amount = %input.amount, currency = %input.currency_code, order_id)
    )]
    async fn update_payment<'a>(
        &'a self,
        input: UpdatePaymentInput,
    ) -> Result<PaymentSessionOutput> {
        let operation = Operation::UpdatePayment;
        let session = decode(&input.data, operation)?;
        let money = to_money(input.amount, &input.currency_code)?;

        self.api
            .update_order_amount(&session.paypal_order_id, &money)
            .await
            .map_err(|e| remote_failure(operation, e))?;
        info!(value = %money.value, "Order amount updated");

        let session = self.refresh(&session.paypal_order_id, operation).await?;
        Ok(PaymentSessionOutput { data: session.to_value() })
    }

    #[instrument(skip(self, input), fields(order_id))]
    async fn get_payment_status<'a>(
        &'a self,
        input: PaymentSessionInput,
    ) -> Result<PaymentStatusOutput> {
        let session = self.retrieve(&input.data, Operation::GetPaymentStatus).await?;
        let status = map_order_status(&session.order.status);
        debug!(remote_status = %session.order.status, %status, "Status mapped");
        Ok(PaymentStatusOutput { data: session.to_value(), status })
    }

    #[instrument(skip(self, input))]
    async fn delete_payment<'a>(
        &'a self,
        input: PaymentSessionInput,
    ) -> Result<PaymentSessionOutput> {
        debug!(operation = %Operation::DeletePayment, "Session dropped without a remote call");
        Ok(PaymentSessionOutput { data: input.data })
    }

    async fn get_webhook_action_and_data<'a>(
        &'a self,
        payload: ProviderWebhookPayload,
    ) -> Result<WebhookActionResult> {
        debug!(bytes = payload.raw_data.len(), "Ignoring PayPal webhook");
        Ok(WebhookActionResult::not_supported())
    }
}
