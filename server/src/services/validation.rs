use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;

use crate::models::event::{max_price, PRICE_SCALE};
use crate::models::{EventInput, PurchaseRequest, RegisterRequest};
use crate::utils::error::AppError;

pub const MIN_TITLE_CHARS: usize = 5;
pub const MIN_DESCRIPTION_CHARS: usize = 20;
pub const MIN_FULL_NAME_CHARS: usize = 2;
pub const MIN_PASSWORD_CHARS: usize = 6;

static RE_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email pattern compiles")
});

fn require(condition: bool, message: &str) -> Result<(), AppError> {
    if condition {
        Ok(())
    } else {
        Err(AppError::validation(message))
    }
}

fn long_enough(value: &str, min_chars: usize) -> bool {
    value.trim().chars().count() >= min_chars
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    require(RE_EMAIL.is_match(email.trim()), "Invalid email address")
}

pub fn validate_registration(request: &RegisterRequest) -> Result<(), AppError> {
    require(
        long_enough(&request.full_name, MIN_FULL_NAME_CHARS),
        "Full name must be at least 2 characters",
    )?;
    validate_email(&request.email)?;
    require(
        request.password.chars().count() >= MIN_PASSWORD_CHARS,
        "Password must be at least 6 characters",
    )?;
    require(
        request.password == request.confirm_password,
        "Passwords do not match",
    )
}

/// Checks an event submission. `today` bounds the event date from below.
pub fn validate_event(input: &EventInput, today: NaiveDate) -> Result<(), AppError> {
    require(
        long_enough(&input.title, MIN_TITLE_CHARS),
        "Title must be at least 5 characters",
    )?;
    require(
        long_enough(&input.description, MIN_DESCRIPTION_CHARS),
        "Description must be at least 20 characters",
    )?;
    require(!input.location.trim().is_empty(), "Location is required")?;
    require(input.date >= today, "Event date cannot be in the past")?;
    require(input.price >= Decimal::ZERO, "Price cannot be negative")?;
    require(input.price <= max_price(), "Price cannot exceed 999999999.99")?;
    require(
        input.price.normalize().scale() <= PRICE_SCALE,
        "Price cannot have more than 2 decimal places",
    )?;
    require(input.max_tickets >= 1, "An event needs at least one ticket")?;

    if let Some(url) = input.image_url.as_deref().map(str::trim) {
        require(
            url.is_empty() || url.starts_with("http://") || url.starts_with("https://"),
            "Image URL must be an http(s) URL",
        )?;
    }
    Ok(())
}

pub fn validate_purchase(request: &PurchaseRequest) -> Result<(), AppError> {
    require(!request.buyer_name.trim().is_empty(), "Buyer name is required")?;
    validate_email(&request.buyer_email)
}
