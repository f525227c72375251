//! HTTPS implementation of [`OrdersApi`] using reqwest.

use reqwest::{Client, Method, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::{
    ApiResult, OrdersApi,
    auth::{TokenCache, TokenResponse},
    path_segment,
};
use crate::{
    config::ProviderOptions,
    error::ApiError,
    models::{
        Capture, CaptureRequest, CreateOrderRequest, Money, Order, PatchOperation, Refund,
        RefundRequest,
    },
};

// Relative to the base URL so a path prefix on an override is kept.
const TOKEN_PATH: &str = "v1/oauth2/token";
const ORDERS_PATH: &str = "v2/checkout/orders";
const AUTHORIZATIONS_PATH: &str = "v2/payments/authorizations";
const CAPTURES_PATH: &str = "v2/payments/captures";

/// PayPal REST client.
///
/// Holds one pooled HTTP client and one cached access token for the lifetime of
/// the provider. No total request timeout is applied unless configured.
#[derive(Debug)]
pub struct PaypalClient {
    http: Client,
    base_url: Url,
    client_id: String,
    client_secret: SecretString,
    tokens: TokenCache,
}

impl PaypalClient {
    /// Creates a client for the configured environment.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built or the base URL is invalid.
    pub fn new(options: &ProviderOptions) -> ApiResult<Self> {
        let base_url = options.base_url().map_err(|e| ApiError::InvalidPath(e.to_string()))?;
        Self::with_base_url(options, base_url)
    }

    /// Creates a client against an explicit base URL.
    ///
    /// The URL is not checked for HTTPS; this is the hook for local test servers.
    /// A path on the URL (`https://proxy.example/paypal`) prefixes every request.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn with_base_url(options: &ProviderOptions, mut base_url: Url) -> ApiResult<Self> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder()
            .pool_max_idle_per_host(options.http.pool_max_idle_per_host)
            .connect_timeout(options.http.connect_timeout());
        if let Some(timeout) = options.http.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url,
            client_id: options.client_id.clone(),
            client_secret: SecretString::from(options.client_secret.expose_secret().to_owned()),
            tokens: TokenCache::default(),
        })
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> ApiResult<Url> {
        self.base_url.join(path).map_err(|_| ApiError::InvalidPath(path.to_owned()))
    }

    #[instrument(skip(self))]
    async fn fetch_token(&self) -> ApiResult<TokenResponse> {
        let response = self
            .http
            .post(self.url(TOKEN_PATH)?)
            .basic_auth(&self.client_id, Some(self.client_secret.expose_secret()))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::Authentication(format!("malformed token response: {e}")))
    }

    async fn access_token(&self) -> ApiResult<String> {
        self.tokens.get_or_fetch(|| self.fetch_token()).await
    }

    /// Sends an authenticated request and returns the raw success body.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> ApiResult<Vec<u8>> {
        let token = self.access_token().await?;
        let is_post = method == Method::POST;

        let mut request = self
            .http
            .request(method, self.url(path)?)
            .bearer_auth(token)
            .header("Prefer", "return=representation");

        if is_post {
            request = request.header("PayPal-Request-Id", uuid::Uuid::new_v4().to_string());
        }
        if let Some(body) = body {
            request = request.header("Content-Type", "application/json").body(body);
        }

        let response = request.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            self.tokens.invalidate().await;
        }
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn execute_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> ApiResult<T> {
        let bytes = self.execute(method, path, body).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

async fn status_error(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let headers: Vec<(String, String)> = response
        .headers()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_owned()))
        .collect();
    let debug_id = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("paypal-debug-id"))
        .map(|(_, v)| v.clone());
    let body = response.text().await.unwrap_or_default();

    ApiError::Status { status, debug_id, headers, body }
}

impl OrdersApi for PaypalClient {
    #[instrument(skip(self, request))]
    async fn create_order<'a>(&'a self, request: &'a CreateOrderRequest) -> ApiResult<Order> {
        let body = serde_json::to_vec(request)?;
        self.execute_json(Method::POST, ORDERS_PATH, Some(body)).await
    }

    #[instrument(skip(self))]
    async fn get_order<'a>(&'a self, order_id: &'a str) -> ApiResult<Order> {
        let path = format!("{ORDERS_PATH}/{}", path_segment(order_id)?);
        self.execute_json(Method::GET, &path, None).await
    }

    #[instrument(skip(self, amount))]
    async fn update_order_amount<'a>(
        &'a self,
        order_id: &'a str,
        amount: &'a Money,
    ) -> ApiResult<()> {
        let path = format!("{ORDERS_PATH}/{}", path_segment(order_id)?);
        let body = serde_json::to_vec(&[PatchOperation::replace_amount(amount)])?;
        self.execute(Method::PATCH, &path, Some(body)).await.map(drop)
    }

    #[instrument(skip(self, request))]
    async fn capture_authorization<'a>(
        &'a self,
        authorization_id: &'a str,
        request: &'a CaptureRequest,
    ) -> ApiResult<Capture> {
        let path = format!("{AUTHORIZATIONS_PATH}/{}/capture", path_segment(authorization_id)?);
        let body = serde_json::to_vec(request)?;
        self.execute_json(Method::POST, &path, Some(body)).await
    }

    #[instrument(skip(self))]
    async fn void_authorization<'a>(&'a self, authorization_id: &'a str) -> ApiResult<()> {
        let path = format!("{AUTHORIZATIONS_PATH}/{}/void", path_segment(authorization_id)?);
        self.execute(Method::POST, &path, None).await.map(drop)
    }

    #[instrument(skip(self, request))]
    async fn refund_capture<'a>(
        &'a self,
        capture_id: &'a str,
        request: &'a RefundRequest,
    ) -> ApiResult<Refund> {
        let path = format!("{CAPTURES_PATH}/{}/refund", path_segment(capture_id)?);
        let body = serde_json::to_vec(request)?;
        self.execute_json(Method::POST, &path, Some(body)).await
    }
}
