//! Conversion of framework amounts into PayPal money values.
//!
//! The framework hands over amounts as decimals in major units. PayPal expects a
//! decimal string whose fraction digits match the currency: most currencies take
//! two, a few take none.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    error::{ProviderError, Result},
    models::Money,
};

/// Currencies PayPal only accepts without a fractional part.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &["HUF", "JPY", "TWD"];

/// Normalizes a currency code to upper case.
///
/// # Errors
///
/// Returns [`ProviderError::InvalidCurrency`] unless the code is three ASCII letters.
pub fn normalize_currency(code: &str) -> Result<String> {
    let code = code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ProviderError::InvalidCurrency(code.to_owned()));
    }
    Ok(code.to_ascii_uppercase())
}

/// Number of fraction digits PayPal accepts for `currency`.
#[must_use]
pub fn minor_digits(currency: &str) -> u32 {
    if ZERO_DECIMAL_CURRENCIES.iter().any(|c| c.eq_ignore_ascii_case(currency)) { 0 } else { 2 }
}

/// Formats `amount` the way PayPal expects for `currency`.
///
/// # Errors
///
/// Returns an error for negative amounts or an invalid currency code.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use paypal_provider::amount::to_money;
///
/// let money = to_money(Decimal::new(10, 0), "usd").unwrap();
/// assert_eq!(money.currency_code, "USD");
/// assert_eq!(money.value, "10.00");
///
/// let yen = to_money(Decimal::new(1999, 1), "JPY").unwrap();
/// assert_eq!(yen.value, "200");
/// ```
pub fn to_money(amount: Decimal, currency: &str) -> Result<Money> {
    let currency = normalize_currency(currency)?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ProviderError::InvalidAmount(format!("{amount} is negative")));
    }

    let digits = minor_digits(&currency);
    let mut rounded = amount.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(digits);

    Ok(Money::new(currency, rounded.to_string()))
}
