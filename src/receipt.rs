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

//! Receipt data model.
//!
//! Amounts, dates and times are kept exactly as submitted. Validation checks
//! their shape; the rule engine parses them on demand.

use crate::base::ReceiptId;
use serde::{Deserialize, Serialize};

/// A purchase receipt as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub retailer: String,
    /// `YYYY-MM-DD`
    pub purchase_date: String,
    /// `HH:MM`, 24-hour
    pub purchase_time: String,
    pub items: Vec<Item>,
    /// Decimal amount with exactly two fraction digits.
    pub total: String,
}

/// One line entry on a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub short_description: String,
    pub price: String,
}

impl Item {
    pub fn new(short_description: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            short_description: short_description.into(),
            price: price.into(),
        }
    }
}

/// An accepted receipt together with the identifier it was stored under.
///
/// Created once at acceptance and never mutated. Points are not kept here;
/// they are recomputed from the receipt on every query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredReceipt {
    id: ReceiptId,
    receipt: Receipt,
}

impl ScoredReceipt {
    pub fn new(id: ReceiptId, receipt: Receipt) -> Self {
        Self { id, receipt }
    }

    pub fn id(&self) -> ReceiptId {
        self.id
    }

    pub fn receipt(&self) -> &Receipt {
        &self.receipt
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: ReceiptId,
    pub points: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_camel_case_fields() {
        let json = r#"{
            "retailer": "Walgreens",
            "purchaseDate": "2022-01-02",
            "purchaseTime": "08:13",
            "total": "2.65",
            "items": [
                {"shortDescription": "Pepsi - 12-oz", "price": "1.25"},
                {"shortDescription": "Dasani", "price": "1.40"}
            ]
        }"#;

        let receipt: Receipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.retailer, "Walgreens");
        assert_eq!(receipt.purchase_date, "2022-01-02");
        assert_eq!(receipt.purchase_time, "08:13");
        assert_eq!(receipt.total, "2.65");
        assert_eq!(receipt.items[0], Item::new("Pepsi - 12-oz", "1.25"));
        assert_eq!(receipt.items.len(), 2);
    }

    #[test]
    fn numeric_price_is_rejected_by_decoder() {
        let json = r#"{
            "retailer": "Target",
            "purchaseDate": "2022-01-01",
            "purchaseTime": "13:01",
            "total": "1.25",
            "items": [{"shortDescription": "Pepsi", "price": 1.25}]
        }"#;

        assert!(serde_json::from_str::<Receipt>(json).is_err());
    }

    #[test]
    fn submission_serializes_id_and_points() {
        let id: ReceiptId = "adb6b560-0eef-42bc-9d16-df48f30e89b2".parse().unwrap();
        let json = serde_json::to_value(Submission { id, points: 28 }).unwrap();
        assert_eq!(json["id"], "adb6b560-0eef-42bc-9d16-df48f30e89b2");
        assert_eq!(json["points"], 28);
    }
}
