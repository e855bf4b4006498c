// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Receipt validation.
//!
//! [`validate`] is a pure predicate run before any points are computed.
//! Checks run in this order and the first failure is reported:
//!
//! | Field | Rule |
//! |-------|------|
//! | `retailer` | non-empty, no whitespace |
//! | `purchaseDate` | `YYYY-MM-DD`, a real calendar date |
//! | `purchaseTime` | `HH:MM`, a real 24-hour time |
//! | `total` | `<digits>.<two digits>` |
//! | `items` | at least one |
//! | `items[i].shortDescription` | starts with a word character, then word characters, whitespace or hyphens |
//! | `items[i].price` | `<digits>.<two digits>` |
//!
//! The parse helpers here are shared with the rule engine so that scoring
//! reads fields exactly the way validation accepted them.

use crate::error::ValidationError;
use crate::receipt::Receipt;
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

static RETAILER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\S+$").unwrap());
static DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());
static TIME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}$").unwrap());
static AMOUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]{2}$").unwrap());
// ASCII word characters; whitespace is space, tab, newline, form feed or
// carriage return (no vertical tab).
static DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)^\w[\w\t\n\f\r \-]*$").unwrap());

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Checks a submitted receipt's structure and lexical shape.
///
/// # Errors
///
/// Returns the [`ValidationError`] for the first check that fails.
pub fn validate(receipt: &Receipt) -> Result<(), ValidationError> {
    if !RETAILER.is_match(&receipt.retailer) {
        return Err(ValidationError::InvalidRetailer);
    }

    if parse_date(&receipt.purchase_date).is_none() {
        return Err(ValidationError::InvalidPurchaseDate);
    }

    if parse_time(&receipt.purchase_time).is_none() {
        return Err(ValidationError::InvalidPurchaseTime);
    }

    if parse_amount(&receipt.total).is_none() {
        return Err(ValidationError::InvalidTotal);
    }

    if receipt.items.is_empty() {
        return Err(ValidationError::NoItems);
    }

    for (index, item) in receipt.items.iter().enumerate() {
        if !DESCRIPTION.is_match(&item.short_description) {
            return Err(ValidationError::InvalidItemDescription { index });
        }
        if parse_amount(&item.price).is_none() {
            return Err(ValidationError::InvalidItemPrice { index });
        }
    }

    Ok(())
}

/// Parses a `YYYY-MM-DD` calendar date.
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    if !DATE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Parses an `HH:MM` 24-hour time of day.
pub(crate) fn parse_time(value: &str) -> Option<NaiveTime> {
    if !TIME.is_match(value) {
        return None;
    }
    NaiveTime::parse_from_str(value, TIME_FORMAT).ok()
}

/// Parses a `<digits>.<two digits>` amount into an exact decimal.
///
/// Amounts with more digits than [`Decimal`] can hold to the cent are
/// rejected, so a parsed amount always has a scale of two.
pub(crate) fn parse_amount(value: &str) -> Option<Decimal> {
    if !AMOUNT.is_match(value) {
        return None;
    }
    // from_str rounds away fraction digits that do not fit.
    Decimal::from_str(value).ok().filter(|amount| amount.scale() == 2)
}
