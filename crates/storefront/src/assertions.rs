//! Value-level assertions and structural validators.
//!
//! Unlike the polling assertions on [`crate::PageSession`], these check
//! values already read from the page and fail immediately.

use crate::result::{StorefrontError, StorefrontResult};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static PRICE: LazyLock<Regex> = LazyLock::new(|| compile(r"^\$[\d,]+\.\d{2}$"));
static EMAIL: LazyLock<Regex> = LazyLock::new(|| compile(r"^[^\s@]+@[^\s@]+\.[^\s@]+$"));
static PHONE: LazyLock<Regex> = LazyLock::new(|| compile(r"^\d{3}-\d{3}-\d{4}$"));

#[allow(clippy::expect_used)]
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern")
}

/// `$` followed by digits/commas and exactly two decimals
#[must_use]
pub fn is_valid_price(price: &str) -> bool {
    PRICE.is_match(price)
}

/// `local@domain.tld` without whitespace
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// `NNN-NNN-NNNN`
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE.is_match(phone)
}

fn ensure(ok: bool, message: impl FnOnce() -> String) -> StorefrontResult<()> {
    if ok {
        Ok(())
    } else {
        Err(StorefrontError::assertion(message()))
    }
}

/// Fail unless [`is_valid_price`]
pub fn assert_price_format(price: &str) -> StorefrontResult<()> {
    ensure(is_valid_price(price), || {
        format!("expected price like \"$1,234.56\", actual {price:?}")
    })
}

/// Fail unless [`is_valid_email`]
pub fn assert_email_format(email: &str) -> StorefrontResult<()> {
    ensure(is_valid_email(email), || {
        format!("expected an email address, actual {email:?}")
    })
}

/// Fail unless [`is_valid_phone`]
pub fn assert_phone_format(phone: &str) -> StorefrontResult<()> {
    ensure(is_valid_phone(phone), || {
        format!("expected phone like \"555-123-4567\", actual {phone:?}")
    })
}

/// Fail unless `quantity` is at least 1
pub fn assert_positive_quantity(quantity: i64) -> StorefrontResult<()> {
    ensure(quantity > 0, || {
        format!("expected a positive quantity, actual {quantity}")
    })
}

/// Fail unless `text` contains `substring`
pub fn assert_text_contains(text: &str, substring: &str) -> StorefrontResult<()> {
    ensure(text.contains(substring), || {
        format!("expected text containing {substring:?}, actual {text:?}")
    })
}

/// Fail unless `url` contains `path`
pub fn assert_url_contains(url: &str, path: &str) -> StorefrontResult<()> {
    ensure(url.contains(path), || {
        format!("expected URL containing {path:?}, actual {url:?}")
    })
}

/// Fail unless `count` exceeds `min`
pub fn assert_element_count_greater_than(count: usize, min: usize) -> StorefrontResult<()> {
    ensure(count > min, || {
        format!("expected more than {min} elements, actual {count}")
    })
}

/// Fail unless `count` equals `expected`
pub fn assert_element_count_equals(count: usize, expected: usize) -> StorefrontResult<()> {
    ensure(count == expected, || {
        format!("expected {expected} elements, actual {count}")
    })
}

fn field<'a>(data: &'a Value, name: &str, what: &str) -> StorefrontResult<&'a Value> {
    data.get(name)
        .ok_or_else(|| StorefrontError::assertion(format!("{what} is missing field {name:?}")))
}

fn string_field<'a>(data: &'a Value, name: &str, what: &str) -> StorefrontResult<&'a str> {
    field(data, name, what)?.as_str().ok_or_else(|| {
        StorefrontError::assertion(format!("{what} field {name:?} must be a string"))
    })
}

/// Product records carry a non-empty string `name` and a `price`
pub fn validate_product_data(product: &Value) -> StorefrontResult<()> {
    let name = string_field(product, "name", "product")?;
    ensure(!name.is_empty(), || "product name is empty".to_string())?;
    field(product, "price", "product")?;
    Ok(())
}

/// User records carry a well-formed `email` and a string `password`
pub fn validate_user_data(user: &Value) -> StorefrontResult<()> {
    let email = string_field(user, "email", "user")?;
    string_field(user, "password", "user")?;
    assert_email_format(email)
}

/// Cart records, as serialized by [`crate::pages::CartSummary`], carry a
/// non-negative integer `items_count` and a `total`
pub fn validate_cart_data(cart: &Value) -> StorefrontResult<()> {
    let count = field(cart, "items_count", "cart")?;
    ensure(count.as_u64().is_some(), || {
        format!("cart items_count must be a non-negative integer, actual {count}")
    })?;
    field(cart, "total", "cart")?;
    Ok(())
}
