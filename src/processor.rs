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

//! Receipt processor.
//!
//! The [`ReceiptProcessor`] ties the pieces together:
//!
//! - **Submit**: validate, score, mint an identifier, store, return `{id, points}`.
//! - **Query**: look the receipt up by identifier and score it again.
//!
//! Points are never cached. Every query rescores the stored receipt, so a
//! change to the rules applies to receipts already on file.
//!
//! # Thread Safety
//!
//! All methods take `&self`; a processor is meant to be shared behind an
//! [`Arc`](std::sync::Arc) across request handlers.

use crate::base::{IdGenerator, RandomIdGenerator, ReceiptId};
use crate::error::ReceiptError;
use crate::receipt::{Receipt, Submission};
use crate::rules;
use crate::store::ReceiptStore;
use crate::validation::validate;
use tracing::{debug, error, warn};

/// Validates, scores and stores receipts, and answers point queries.
pub struct ReceiptProcessor {
    store: ReceiptStore,
    ids: Box<dyn IdGenerator>,
}

impl ReceiptProcessor {
    /// Creates a processor with an empty store and random identifiers.
    pub fn new() -> Self {
        Self::with_id_generator(RandomIdGenerator)
    }

    /// Creates a processor with an empty store and the given identifier source.
    pub fn with_id_generator(ids: impl IdGenerator + 'static) -> Self {
        Self {
            store: ReceiptStore::new(),
            ids: Box::new(ids),
        }
    }

    /// Accepts a receipt and returns its identifier and points.
    ///
    /// # Errors
    ///
    /// - [`ReceiptError::Validation`] - The receipt failed a validation check.
    /// - [`ReceiptError::IdentifierConflict`] - The generator reused an identifier.
    /// - [`ReceiptError::InvariantViolation`] - A validated receipt could not be scored.
    pub fn submit(&self, receipt: Receipt) -> Result<Submission, ReceiptError> {
        if let Err(reason) = validate(&receipt) {
            warn!(retailer = %receipt.retailer, %reason, "rejected receipt");
            return Err(reason.into());
        }

        let points = rules::score(&receipt).inspect_err(|e| error!(error = %e, "scoring failed"))?;

        let id = self.ids.next_id();
        self.store
            .put(id, receipt)
            .inspect_err(|e| error!(error = %e, "identifier generator reused an id"))?;

        debug!(%id, points, "accepted receipt");
        Ok(Submission { id, points })
    }

    /// Returns the points for a previously submitted receipt.
    ///
    /// # Errors
    ///
    /// - [`ReceiptError::NotFound`] - No receipt has this identifier.
    /// - [`ReceiptError::InvariantViolation`] - The stored receipt could not be scored.
    pub fn points_for(&self, id: &ReceiptId) -> Result<u128, ReceiptError> {
        let stored = self.store.get(id).inspect_err(|_| warn!(%id, "unknown receipt"))?;
        let points =
            rules::score(stored.receipt()).inspect_err(|e| error!(%id, error = %e, "scoring failed"))?;

        debug!(%id, points, "scored stored receipt");
        Ok(points)
    }

    /// Returns a copy of a previously submitted receipt.
    ///
    /// # Errors
    ///
    /// [`ReceiptError::NotFound`] if no receipt has this identifier.
    pub fn receipt(&self, id: &ReceiptId) -> Result<Receipt, ReceiptError> {
        self.store
            .get(id)
            .map(|stored| stored.receipt().clone())
    }

    /// Number of receipts accepted so far.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl Default for ReceiptProcessor {
    fn default() -> Self {
        Self::new()
    }
}
