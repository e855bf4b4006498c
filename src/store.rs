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

//! Thread-safe in-memory receipt store.
//!
//! Holds accepted receipts for the lifetime of the process. Nothing is
//! persisted; dropping the store discards every receipt.

use crate::base::ReceiptId;
use crate::error::ReceiptError;
use crate::receipt::{Receipt, ScoredReceipt};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// A concurrent map from [`ReceiptId`] to [`ScoredReceipt`].
///
/// Uses [`DashMap`]'s sharded locking so submissions and lookups from many
/// request handlers can proceed in parallel. An insert is visible to every
/// lookup that starts after it returns.
#[derive(Debug, Default)]
pub struct ReceiptStore {
    receipts: DashMap<ReceiptId, Arc<ScoredReceipt>>,
}

impl ReceiptStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            receipts: DashMap::new(),
        }
    }

    /// Stores a receipt under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IdentifierConflict`] if `id` is already taken.
    /// The existing receipt is left untouched.
    pub fn put(&self, id: ReceiptId, receipt: Receipt) -> Result<Arc<ScoredReceipt>, ReceiptError> {
        // Entry API keeps check-and-insert atomic under the shard lock.
        match self.receipts.entry(id) {
            Entry::Occupied(_) => Err(ReceiptError::IdentifierConflict(id)),
            Entry::Vacant(entry) => {
                let scored = Arc::new(ScoredReceipt::new(id, receipt));
                entry.insert(Arc::clone(&scored));
                Ok(scored)
            }
        }
    }

    /// Looks up a receipt by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::NotFound`] if nothing is stored under `id`.
    pub fn get(&self, id: &ReceiptId) -> Result<Arc<ScoredReceipt>, ReceiptError> {
        self.receipts
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(ReceiptError::NotFound)
    }

    /// Number of stored receipts.
    pub fn len(&self) -> usize {
        self.receipts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receipts.is_empty()
    }
}
