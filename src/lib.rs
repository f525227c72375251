//! PayPal Payment Provider: Orders v2 Adapter for E-Commerce Payment Frameworks
//!
//! A Rust library that lets an order/payment framework delegate authorization,
//! capture, cancellation and refund to the PayPal Orders v2 and Payments v2 REST
//! APIs.
//!
//! # What does the adapter do?
//!
//! The framework drives a generic payment session (initiate, authorize,
//! capture or cancel, refund). PayPal models the same money movement as orders,
//! authorizations, captures, voids and refunds. This crate translates between the
//! two:
//!
//! - **Status mapping**: remote order status to framework payment status
//! - **Cancel reconciliation**: void an authorization, refund a capture, or do
//!   nothing because the order is already terminal
//! - **Session payload**: the remote order travels in a tagged blob the framework
//!   stores without interpreting
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │    Framework    │  payment sessions, opaque `data` blob
//! └────────┬────────┘
//!          │ PaymentProvider (initiate, capture, cancel, ...)
//!          │
//! ┌────────▼────────────────────────────────────────┐
//! │            PayPal provider (this crate)          │
//! │  ┌──────────────┐      ┌──────────────────┐     │
//! │  │  reconcile,  │──────│  OrdersApi        │     │
//! │  │  status      │      │  (PaypalClient)   │     │
//! │  └──────────────┘      └──────────────────┘     │
//! └────────┬────────────────────────────────────────┘
//!          │ HTTPS + OAuth2 bearer token
//!          │
//! ┌────────▼────────┐
//! │   PayPal API    │  /v2/checkout/orders, /v2/payments/...
//! └─────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use paypal_provider::{
//!     PaypalProvider,
//!     config::ProviderOptions,
//!     framework::{InitiatePaymentInput, PaymentProvider, PaymentSessionInput},
//! };
//! use rust_decimal::Decimal;
//!
//! # async fn example() -> paypal_provider::Result<()> {
//! // PAYPAL_CLIENT_ID, PAYPAL_CLIENT_SECRET, PAYPAL_ENVIRONMENT
//! let options = ProviderOptions::from_env()?;
//! let provider = PaypalProvider::new(&options)?;
//!
//! let created = provider
//!     .initiate_payment(InitiatePaymentInput {
//!         amount: Decimal::new(1000, 2),
//!         currency_code: "USD".to_owned(),
//!     })
//!     .await?;
//!
//! // Later, after the buyer approved the order at checkout:
//! let status = provider.get_payment_status(PaymentSessionInput::new(created.data)).await?;
//! println!("Status: {}", status.status);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`provider`]: [`PaypalProvider`], the lifecycle operations
//! - [`framework`]: the provider trait and its input/output records
//! - [`client`]: [`OrdersApi`](client::OrdersApi) and the reqwest-based [`PaypalClient`]
//! - [`reconcile`]: pure decisions over the stored order (what to capture, cancel, refund)
//! - [`status`]: remote status to framework status mapping
//! - [`session`]: the tagged session payload
//! - [`models`]: PayPal order resources and request bodies
//! - [`amount`]: decimal amounts to PayPal money values
//! - [`config`]: provider options from TOML, JSON or the environment
//! - [`error`]: error types with an [`ErrorKind`](error::ErrorKind) classification
//!
//! # Constraints
//!
//! - Only single-purchase-unit orders are supported; anything else fails with
//!   [`ProviderError::MultiplePurchaseUnits`]
//! - Webhooks are not interpreted; every webhook is reported as not supported
//! - No retries, no total request timeout unless configured
//!
//! # Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](error::Result). Use
//! [`ProviderError::kind`] to tell precondition failures from remote ones:
//!
//! ```rust
//! use paypal_provider::{ProviderError, error::ErrorKind};
//!
//! fn should_refetch(err: &ProviderError) -> bool {
//!     match err.kind() {
//!         ErrorKind::Remote => true,
//!         ErrorKind::Precondition | ErrorKind::SessionData | ErrorKind::Configuration => false,
//!     }
//! }
//!
//! assert!(!should_refetch(&ProviderError::UncapturedPayment));
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and wiremock"
)]

pub mod amount;
pub mod client;
pub mod config;
pub mod error;
pub mod framework;
pub mod models;
pub mod operation;
pub mod provider;
pub mod reconcile;
pub mod session;
pub mod status;

pub use client::PaypalClient;
pub use error::{ProviderError, Result};
pub use provider::PaypalProvider;
pub use status::PaymentSessionStatus;
