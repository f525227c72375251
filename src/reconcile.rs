//! Decisions over the stored remote order.
//!
//! Everything here is pure: given the last known order, decide which remote
//! call (if any) an operation has to issue. The provider performs the calls.
//!
//! Only single-purchase-unit orders are supported. Functions that need "the"
//! purchase unit go through [`sole_purchase_unit`], which fails with
//! [`ProviderError::MultiplePurchaseUnits`] rather than picking one.

use crate::{
    error::{ProviderError, Result},
    models::{Order, OrderStatus, Payments, PurchaseUnit},
    operation::Operation,
};

/// What a cancel request has to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelAction<'a> {
    /// The order is voided or fully refunded already; issue nothing.
    AlreadyTerminal,
    /// Funds were captured; refund the capture in full.
    RefundCapture {
        /// Capture to refund.
        capture_id: &'a str,
    },
    /// Funds are only reserved; void the authorization.
    VoidAuthorization {
        /// Authorization to void.
        authorization_id: &'a str,
    },
}

/// Capture a refund is issued against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundTarget<'a> {
    /// Capture to refund.
    pub capture_id: &'a str,
    /// Currency of the purchase unit.
    pub currency_code: &'a str,
}

/// Returns the order's only purchase unit.
///
/// # Errors
///
/// - [`ProviderError::MissingPurchaseUnit`] if there is none
/// - [`ProviderError::MultiplePurchaseUnits`] if there is more than one
pub fn sole_purchase_unit(order: &Order, operation: Operation) -> Result<&PurchaseUnit> {
    match order.units() {
        [unit] => Ok(unit),
        [] => Err(ProviderError::MissingPurchaseUnit { operation }),
        units => Err(ProviderError::MultiplePurchaseUnits { operation, count: units.len() }),
    }
}

fn payments(unit: &PurchaseUnit, operation: Operation) -> Result<&Payments> {
    unit.payments.as_ref().ok_or(ProviderError::MissingPayments { operation })
}

fn has_capture(order: &Order) -> bool {
    order
        .units()
        .iter()
        .any(|unit| unit.payments.as_ref().is_some_and(|p| !p.captures.is_empty()))
}

/// Returns the authorization a capture request targets.
///
/// # Errors
///
/// Fails if the order has no single purchase unit or that unit has no authorization.
pub fn capture_target(order: &Order) -> Result<&str> {
    let operation = Operation::CapturePayment;
    let unit = sole_purchase_unit(order, operation)?;
    unit.payments
        .as_ref()
        .and_then(|p| p.authorizations.first())
        .map(|authorization| authorization.id.as_str())
        .ok_or(ProviderError::NoAuthorization { operation })
}

/// Whether the order counts as fully refunded.
///
/// The order is `COMPLETED` and its purchase unit carries a non-empty invoice id.
/// This heuristic is not checked against refunded totals: a completed order that
/// was created with an invoice id and never refunded also matches.
#[must_use]
pub fn is_fully_refunded(order: &Order) -> bool {
    order.status == OrderStatus::Completed
        && matches!(
            order.units(),
            [unit] if unit.invoice_id.as_deref().is_some_and(|id| !id.is_empty())
        )
}

/// Decides what a cancel request does.
///
/// # Errors
///
/// Fails if the order is not terminal and lacks a single purchase unit, its payments
/// collection, or anything to refund or void.
pub fn cancel_action(order: &Order) -> Result<CancelAction<'_>> {
    let operation = Operation::CancelPayment;

    if order.status == OrderStatus::Voided {
        return Ok(CancelAction::AlreadyTerminal);
    }

    let unit = sole_purchase_unit(order, operation)?;
    if is_fully_refunded(order) {
        return Ok(CancelAction::AlreadyTerminal);
    }

    let payments = payments(unit, operation)?;
    if let Some(capture) = payments.captures.first() {
        return Ok(CancelAction::RefundCapture { capture_id: &capture.id });
    }
    payments
        .authorizations
        .first()
        .map(|authorization| CancelAction::VoidAuthorization {
            authorization_id: &authorization.id,
        })
        .ok_or(ProviderError::NoAuthorization { operation })
}

/// Returns the capture and currency a refund targets.
///
/// # Errors
///
/// - [`ProviderError::UncapturedPayment`] if no purchase unit has a capture
/// - purchase unit errors from [`sole_purchase_unit`]
/// - [`ProviderError::InvalidAmount`] if neither the unit nor the capture names a currency
pub fn refund_target(order: &Order) -> Result<RefundTarget<'_>> {
    let operation = Operation::RefundPayment;

    if !has_capture(order) {
        return Err(ProviderError::UncapturedPayment);
    }

    let unit = sole_purchase_unit(order, operation)?;
    let capture =
        payments(unit, operation)?.captures.first().ok_or(ProviderError::UncapturedPayment)?;
    let currency_code = unit
        .amount
        .as_ref()
        .or(capture.amount.as_ref())
        .map(|money| money.currency_code.as_str())
        .ok_or_else(|| ProviderError::InvalidAmount("purchase unit has no currency".to_owned()))?;

    Ok(RefundTarget { capture_id: &capture.id, currency_code })
}
