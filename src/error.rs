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

//! Error types for receipt processing.

use crate::base::ReceiptId;
use thiserror::Error;

/// Reasons a submitted receipt is rejected before scoring.
///
/// Checks run in a fixed order and the first failure wins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Retailer is empty or contains whitespace
    #[error("retailer name is invalid")]
    InvalidRetailer,

    /// Purchase date is not `YYYY-MM-DD` or not a real calendar date
    #[error("purchase date is invalid")]
    InvalidPurchaseDate,

    /// Purchase time is not `HH:MM` or not a real time of day
    #[error("purchase time is invalid")]
    InvalidPurchaseTime,

    /// Total is not `<digits>.<two digits>`
    #[error("total amount is invalid")]
    InvalidTotal,

    /// Receipt lists no items
    #[error("at least one item is required")]
    NoItems,

    /// Item description has characters outside words, spaces and hyphens
    #[error("item {index} description is invalid")]
    InvalidItemDescription { index: usize },

    /// Item price is not `<digits>.<two digits>`
    #[error("item {index} price is invalid")]
    InvalidItemPrice { index: usize },
}

/// Receipt processing errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReceiptError {
    /// Payload could not be decoded into a receipt
    #[error("malformed receipt: {0}")]
    MalformedInput(String),

    /// Payload decoded but failed a validation check
    #[error("invalid receipt: {0}")]
    Validation(#[from] ValidationError),

    /// No receipt is stored under the requested identifier
    #[error("receipt not found")]
    NotFound,

    /// The identifier generator handed out an id that is already in use
    #[error("identifier {0} is already in use")]
    IdentifierConflict(ReceiptId),

    /// A validated receipt could not be scored
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),
}

impl ReceiptError {
    /// Whether the caller sent something wrong, as opposed to a server fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ReceiptError::MalformedInput(_) | ReceiptError::Validation(_) | ReceiptError::NotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_messages() {
        assert_eq!(
            ValidationError::InvalidRetailer.to_string(),
            "retailer name is invalid"
        );
        assert_eq!(
            ValidationError::InvalidPurchaseDate.to_string(),
            "purchase date is invalid"
        );
        assert_eq!(
            ValidationError::InvalidPurchaseTime.to_string(),
            "purchase time is invalid"
        );
        assert_eq!(ValidationError::InvalidTotal.to_string(), "total amount is invalid");
        assert_eq!(ValidationError::NoItems.to_string(), "at least one item is required");
        assert_eq!(
            ValidationError::InvalidItemDescription { index: 2 }.to_string(),
            "item 2 description is invalid"
        );
        assert_eq!(
            ValidationError::InvalidItemPrice { index: 0 }.to_string(),
            "item 0 price is invalid"
        );
    }

    #[test]
    fn receipt_error_wraps_validation_reason() {
        let error: ReceiptError = ValidationError::NoItems.into();
        assert_eq!(error, ReceiptError::Validation(ValidationError::NoItems));
        assert_eq!(error.to_string(), "invalid receipt: at least one item is required");
    }

    #[test]
    fn client_and_server_faults_are_distinguished() {
        assert!(ReceiptError::MalformedInput("eof".into()).is_client_error());
        assert!(ReceiptError::Validation(ValidationError::InvalidTotal).is_client_error());
        assert!(ReceiptError::NotFound.is_client_error());
        assert!(!ReceiptError::IdentifierConflict(ReceiptId::random()).is_client_error());
        assert!(!ReceiptError::InvariantViolation("total".into()).is_client_error());
    }
}
