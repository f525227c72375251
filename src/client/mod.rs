//! PayPal REST client abstraction.
//!
//! [`OrdersApi`] lists the six remote calls the provider issues. [`PaypalClient`]
//! implements them over HTTPS with an OAuth2 client-credentials token; tests
//! and alternative transports implement the trait directly.
//!
//! # Examples
//!
//! ```rust,no_run
//! use paypal_provider::{
//!     client::{OrdersApi, PaypalClient},
//!     config::{Environment, ProviderOptions},
//! };
//!
//! # async fn example() -> Result<(), paypal_provider::error::ApiError> {
//! let options = ProviderOptions::new("client-id", "client-secret", Environment::Sandbox);
//! let client = PaypalClient::new(&options)?;
//!
//! let order = client.get_order("5O190127TN364715T").await?;
//! println!("Status: {}", order.status);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use crate::{
    error::ApiError,
    models::{Capture, CaptureRequest, CreateOrderRequest, Money, Order, Refund, RefundRequest},
};

mod auth;
pub mod http;

pub use http::PaypalClient;

/// Result type for client calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Remote calls against the Orders v2 and Payments v2 APIs.
///
/// Every call is an independent stateless request; implementations must be safe to
/// share between concurrent operations.
pub trait OrdersApi: Send + Sync {
    /// Creates an order (`POST /v2/checkout/orders`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be decoded.
    fn create_order<'a>(
        &'a self,
        request: &'a CreateOrderRequest,
    ) -> impl Future<Output = ApiResult<Order>> + Send + 'a;

    /// Fetches an order (`GET /v2/checkout/orders/{id}`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be decoded.
    fn get_order<'a>(&'a self, order_id: &'a str)
    -> impl Future<Output = ApiResult<Order>> + Send + 'a;

    /// Replaces the order amount (`PATCH /v2/checkout/orders/{id}`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    fn update_order_amount<'a>(
        &'a self,
        order_id: &'a str,
        amount: &'a Money,
    ) -> impl Future<Output = ApiResult<()>> + Send + 'a;

    /// Captures an authorization (`POST /v2/payments/authorizations/{id}/capture`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be decoded.
    fn capture_authorization<'a>(
        &'a self,
        authorization_id: &'a str,
        request: &'a CaptureRequest,
    ) -> impl Future<Output = ApiResult<Capture>> + Send + 'a;

    /// Voids an authorization (`POST /v2/payments/authorizations/{id}/void`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    fn void_authorization<'a>(
        &'a self,
        authorization_id: &'a str,
    ) -> impl Future<Output = ApiResult<()>> + Send + 'a;

    /// Refunds a capture (`POST /v2/payments/captures/{id}/refund`).
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the response cannot be decoded.
    fn refund_capture<'a>(
        &'a self,
        capture_id: &'a str,
        request: &'a RefundRequest,
    ) -> impl Future<Output = ApiResult<Refund>> + Send + 'a;
}

/// Validates a resource id before it is placed in a URL path.
///
/// PayPal ids are alphanumeric; hyphens and underscores are tolerated.
pub(crate) fn path_segment(id: &str) -> ApiResult<&str> {
    if id.is_empty()
        || id.len() > 128
        || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ApiError::InvalidPath(id.to_owned()));
    }
    Ok(id)
}
