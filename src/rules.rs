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

//! Points rule engine.
//!
//! A receipt's score is the sum of seven independent rules:
//!
//! | Rule | Points |
//! |------|--------|
//! | Retailer | 1 per ASCII letter or digit in the retailer name |
//! | Round dollar | 50 if the total has no cents |
//! | Quarter multiple | 25 if the total is a multiple of 0.25 |
//! | Item pairs | 5 per two items |
//! | Descriptions | `ceil(price * 0.2)` per item whose trimmed description length is a multiple of 3 |
//! | Odd day | 6 if the purchase day of month is odd |
//! | Afternoon | 10 if purchased strictly between 14:00 and 16:00 |
//!
//! Amounts are compared as exact decimals, so `10.00` is both a round dollar
//! and a quarter multiple and `35.35` is neither.
//!
//! # Example
//!
//! ```
//! use receipt_processor_rs::{Item, Receipt, rules};
//!
//! let receipt = Receipt {
//!     retailer: "Target".to_string(),
//!     purchase_date: "2022-01-02".to_string(),
//!     purchase_time: "13:13".to_string(),
//!     items: vec![Item::new("Pepsi - 12-oz", "1.25")],
//!     total: "1.25".to_string(),
//! };
//!
//! // 6 retailer characters + 25 for a quarter multiple
//! assert_eq!(rules::score(&receipt).unwrap(), 31);
//! ```

use crate::error::ReceiptError;
use crate::receipt::Receipt;
use crate::validation::{parse_amount, parse_date, parse_time};
use chrono::{Datelike, Timelike};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

const ROUND_DOLLAR_POINTS: u128 = 50;
const QUARTER_MULTIPLE_POINTS: u128 = 25;
const ITEM_PAIR_POINTS: u128 = 5;
const ODD_DAY_POINTS: u128 = 6;
const AFTERNOON_POINTS: u128 = 10;

const QUARTER: Decimal = dec!(0.25);
/// `ceil(price * 0.2)` in whole points is `ceil(cents / 500)`.
const CENTS_PER_DESCRIPTION_POINT: u128 = 500;

/// Minutes past midnight bounding the afternoon window, both exclusive.
const AFTERNOON_START: u32 = 14 * 60;
const AFTERNOON_END: u32 = 16 * 60;

/// Points earned by each rule for a single receipt.
///
/// Only [`breakdown`] builds one, so every value reflects a scored receipt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PointsBreakdown {
    retailer: u128,
    round_dollar: u128,
    quarter_multiple: u128,
    item_pairs: u128,
    descriptions: u128,
    odd_day: u128,
    afternoon: u128,
}

impl PointsBreakdown {
    /// Sum of all rule contributions.
    pub fn total(&self) -> u128 {
        // Each bonus is below 2^96; saturation needs over 2^32 items.
        [
            self.round_dollar,
            self.quarter_multiple,
            self.item_pairs,
            self.descriptions,
            self.odd_day,
            self.afternoon,
        ]
        .into_iter()
        .fold(self.retailer, u128::saturating_add)
    }

    pub fn retailer(&self) -> u128 {
        self.retailer
    }

    pub fn round_dollar(&self) -> u128 {
        self.round_dollar
    }

    pub fn quarter_multiple(&self) -> u128 {
        self.quarter_multiple
    }

    pub fn item_pairs(&self) -> u128 {
        self.item_pairs
    }

    pub fn descriptions(&self) -> u128 {
        self.descriptions
    }

    pub fn odd_day(&self) -> u128 {
        self.odd_day
    }

    pub fn afternoon(&self) -> u128 {
        self.afternoon
    }
}

/// Computes the points for a receipt.
///
/// Every receipt that passes [`validate`](crate::validate) scores, whatever
/// the size of its amounts.
///
/// # Errors
///
/// Returns [`ReceiptError::InvariantViolation`] if a field that validation
/// should have guaranteed cannot be parsed. Callers must validate first.
pub fn score(receipt: &Receipt) -> Result<u128, ReceiptError> {
    breakdown(receipt).map(|points| points.total())
}

/// Computes the per-rule points for a receipt.
///
/// # Errors
///
/// Same as [`score`].
pub fn breakdown(receipt: &Receipt) -> Result<PointsBreakdown, ReceiptError> {
    let total = parse_amount(&receipt.total).ok_or_else(|| invariant("total", &receipt.total))?;
    let date = parse_date(&receipt.purchase_date)
        .ok_or_else(|| invariant("purchase date", &receipt.purchase_date))?;
    let time = parse_time(&receipt.purchase_time)
        .ok_or_else(|| invariant("purchase time", &receipt.purchase_time))?;

    Ok(PointsBreakdown {
        retailer: retailer_points(&receipt.retailer),
        round_dollar: if total.fract().is_zero() {
            ROUND_DOLLAR_POINTS
        } else {
            0
        },
        quarter_multiple: if (total % QUARTER).is_zero() {
            QUARTER_MULTIPLE_POINTS
        } else {
            0
        },
        item_pairs: (receipt.items.len() as u128 / 2) * ITEM_PAIR_POINTS,
        descriptions: description_points(receipt)?,
        odd_day: if date.day() % 2 == 1 { ODD_DAY_POINTS } else { 0 },
        afternoon: {
            let minutes = time.hour() * 60 + time.minute();
            if minutes > AFTERNOON_START && minutes < AFTERNOON_END {
                AFTERNOON_POINTS
            } else {
                0
            }
        },
    })
}

fn retailer_points(retailer: &str) -> u128 {
    retailer.chars().filter(char::is_ascii_alphanumeric).count() as u128
}

fn description_points(receipt: &Receipt) -> Result<u128, ReceiptError> {
    let mut points: u128 = 0;

    for item in &receipt.items {
        let length = item.short_description.trim().chars().count();
        if length == 0 || length % 3 != 0 {
            continue;
        }

        // Validated prices hold exactly two fraction digits, so the mantissa
        // counts cents. Decimal multiplication would round near the top of its range.
        let price = parse_amount(&item.price).ok_or_else(|| invariant("item price", &item.price))?;
        let cents = u128::try_from(price.mantissa())
            .map_err(|_| invariant("item price", &item.price))?;
        points = points.saturating_add(cents.div_ceil(CENTS_PER_DESCRIPTION_POINT));
    }

    Ok(points)
}

fn invariant(field: &str, value: &str) -> ReceiptError {
    ReceiptError::InvariantViolation(format!("validated {field} {value:?} could not be scored"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::Item;

    fn receipt(total: &str, date: &str, time: &str, items: Vec<Item>) -> Receipt {
        Receipt {
            retailer: "Shop".to_string(),
            purchase_date: date.to_string(),
            purchase_time: time.to_string(),
            items,
            total: total.to_string(),
        }
    }

    fn one_item() -> Vec<Item> {
        vec![Item::new("Gum", "0.01")]
    }

    #[test]
    fn retailer_counts_only_alphanumerics() {
        assert_eq!(retailer_points("Target"), 6);
        assert_eq!(retailer_points("M&M-Corner-Market"), 14);
        assert_eq!(retailer_points("7-Eleven"), 7);
        assert_eq!(retailer_points("&&--"), 0);
        assert_eq!(retailer_points("Café"), 3);
    }

    #[test]
    fn whole_dollar_total_earns_both_total_bonuses() {
        let points = breakdown(&receipt("10.00", "2022-01-02", "10:00", one_item())).unwrap();
        assert_eq!(points.round_dollar, 50);
        assert_eq!(points.quarter_multiple, 25);
    }

    #[test]
    fn quarter_total_earns_only_quarter_bonus() {
        for total in ["10.25", "10.50", "10.75", "0.25"] {
            let points = breakdown(&receipt(total, "2022-01-02", "10:00", one_item())).unwrap();
            assert_eq!(points.round_dollar, 0, "{total}");
            assert_eq!(points.quarter_multiple, 25, "{total}");
        }
    }

    #[test]
    fn other_totals_earn_neither_bonus() {
        for total in ["35.35", "10.01", "10.24", "10.26", "0.10"] {
            let points = breakdown(&receipt(total, "2022-01-02", "10:00", one_item())).unwrap();
            assert_eq!(points.round_dollar, 0, "{total}");
            assert_eq!(points.quarter_multiple, 0, "{total}");
        }
    }

    #[test]
    fn zero_total_is_round_dollar() {
        let points = breakdown(&receipt("0.00", "2022-01-02", "10:00", one_item())).unwrap();
        assert_eq!(points.round_dollar, 50);
        assert_eq!(points.quarter_multiple, 25);
    }

    #[test]
    fn item_pairs_round_down() {
        for (count, expected) in [(1, 0), (2, 5), (3, 5), (4, 10), (5, 10), (11, 25)] {
            let items = vec![Item::new("Gum", "0.01"); count];
            let points = breakdown(&receipt("1.01", "2022-01-02", "10:00", items)).unwrap();
            assert_eq!(points.item_pairs, expected, "{count} items");
        }
    }

    #[test]
    fn description_bonus_rounds_price_fraction_up() {
        let items = vec![
            Item::new("Emils Cheese Pizza", "12.25"),
            Item::new("   Klarbrunn 12-PK 12 FL OZ  ", "12.00"),
            Item::new("abc", "6.49"),
        ];
        let points = breakdown(&receipt("1.01", "2022-01-02", "10:00", items)).unwrap();
        // 2.45 -> 3, 2.40 -> 3, 1.298 -> 2
        assert_eq!(points.descriptions, 8);
    }

    #[test]
    fn description_bonus_skips_lengths_not_multiple_of_three() {
        let items = vec![
            Item::new("Mountain Dew 12PK", "6.49"),
            Item::new("Knorr Creamy Chicken", "1.26"),
            Item::new("ab", "100.00"),
            Item::new("   ", "100.00"),
        ];
        let points = breakdown(&receipt("1.01", "2022-01-02", "10:00", items)).unwrap();
        assert_eq!(points.descriptions, 0);
    }

    #[test]
    fn description_bonus_of_zero_price_is_zero() {
        let items = vec![Item::new("abc", "0.00")];
        let points = breakdown(&receipt("1.01", "2022-01-02", "10:00", items)).unwrap();
        assert_eq!(points.descriptions, 0);
    }

    #[test]
    fn odd_days_earn_bonus() {
        for (date, expected) in [
            ("2022-01-01", 6),
            ("2022-01-31", 6),
            ("2022-01-02", 0),
            ("2022-02-28", 0),
        ] {
            let points = breakdown(&receipt("1.01", date, "10:00", one_item())).unwrap();
            assert_eq!(points.odd_day, expected, "{date}");
        }
    }

    #[test]
    fn afternoon_window_is_exclusive() {
        for (time, expected) in [
            ("13:59", 0),
            ("14:00", 0),
            ("14:01", 10),
            ("15:00", 10),
            ("15:59", 10),
            ("16:00", 0),
            ("16:01", 0),
        ] {
            let points = breakdown(&receipt("1.01", "2022-01-02", time, one_item())).unwrap();
            assert_eq!(points.afternoon, expected, "{time}");
        }
    }

    #[test]
    fn unvalidated_total_is_an_invariant_violation() {
        let result = score(&receipt("12", "2022-01-02", "10:00", one_item()));
        assert!(matches!(result, Err(ReceiptError::InvariantViolation(_))));
    }

    #[test]
    fn unvalidated_price_is_an_invariant_violation() {
        let items = vec![Item::new("abc", "free")];
        let result = score(&receipt("1.01", "2022-01-02", "10:00", items));
        assert!(matches!(result, Err(ReceiptError::InvariantViolation(_))));
    }

    #[test]
    fn description_bonus_beyond_u64_still_scores() {
        let items = vec![Item::new("abc", "100000000000000000000.00")];
        let points = breakdown(&receipt("1.01", "2022-01-02", "10:00", items)).unwrap();
        assert_eq!(points.descriptions(), 20_000_000_000_000_000_000);
    }

    #[test]
    fn largest_decimal_price_scores() {
        let price = format!("{}.99", "9".repeat(26));
        let items = vec![Item::new("abc", price.as_str()), Item::new("def", price.as_str())];
        let points = breakdown(&receipt(&price, "2022-01-02", "10:00", items)).unwrap();
        assert_eq!(points.descriptions(), 2 * 20_000_000_000_000_000_000_000_000);
        assert_eq!(points.total(), 4 + 5 + 2 * 20_000_000_000_000_000_000_000_000);
    }

    #[test]
    fn description_bonus_is_exact_at_decimal_limit() {
        // Cents are 1 mod 500, so the bonus must round up past the rounded product.
        let items = vec![Item::new("abc", "792281625142643375935439500.01")];
        let points = breakdown(&receipt("1.01", "2022-01-02", "10:00", items)).unwrap();
        assert_eq!(points.descriptions(), 158_456_325_028_528_675_187_087_901);
    }

    #[test]
    fn breakdown_total_matches_accessors() {
        let items = vec![
            Item::new("Emils Cheese Pizza", "12.25"),
            Item::new("Gatorade", "2.25"),
        ];
        let points = breakdown(&receipt("14.50", "2022-01-01", "15:30", items)).unwrap();
        let sum = points.retailer()
            + points.round_dollar()
            + points.quarter_multiple()
            + points.item_pairs()
            + points.descriptions()
            + points.odd_day()
            + points.afternoon();
        // 4 + 0 + 25 + 5 + 3 + 6 + 10
        assert_eq!(points.total(), 53);
        assert_eq!(points.total(), sum);
    }

    #[test]
    fn total_sums_every_rule() {
        let points = PointsBreakdown {
            retailer: 1,
            round_dollar: 2,
            quarter_multiple: 3,
            item_pairs: 4,
            descriptions: 5,
            odd_day: 6,
            afternoon: 7,
        };
        assert_eq!(points.total(), 28);
    }
}
