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

//! # Receipt Processor
//!
//! This library validates purchase receipts, awards them loyalty points from a
//! fixed set of rules, and keeps them in memory so their points can be queried
//! later by identifier.
//!
//! ## Core Components
//!
//! - [`ReceiptProcessor`]: Submit and query entry point owning the store
//! - [`validate`]: Structural and lexical checks run before scoring
//! - [`rules`]: The points rule engine
//! - [`ReceiptStore`]: Concurrent identifier to receipt map
//! - [`ReceiptError`]: Error types for submission and lookup failures
//!
//! ## Example
//!
//! ```
//! use receipt_processor_rs::{Item, Receipt, ReceiptProcessor};
//!
//! let processor = ReceiptProcessor::new();
//!
//! let receipt = Receipt {
//!     retailer: "Target".to_string(),
//!     purchase_date: "2022-01-01".to_string(),
//!     purchase_time: "13:01".to_string(),
//!     items: vec![
//!         Item::new("Mountain Dew 12PK", "6.49"),
//!         Item::new("Emils Cheese Pizza", "12.25"),
//!         Item::new("Knorr Creamy Chicken", "1.26"),
//!         Item::new("Doritos Nacho Cheese", "3.35"),
//!         Item::new("Klarbrunn 12-PK 12 FL OZ", "12.00"),
//!     ],
//!     total: "35.35".to_string(),
//! };
//!
//! let submission = processor.submit(receipt).unwrap();
//! assert_eq!(submission.points, 28);
//! assert_eq!(processor.points_for(&submission.id).unwrap(), 28);
//! ```
//!
//! ## Thread Safety
//!
//! The processor's store is a sharded concurrent map, so submissions and
//! queries can run in parallel from any number of request handlers.

mod base;
pub mod error;
mod processor;
mod receipt;
pub mod rules;
pub mod server;
mod store;
mod validation;

pub use base::{IdGenerator, RandomIdGenerator, ReceiptId};
pub use error::{ReceiptError, ValidationError};
pub use processor::ReceiptProcessor;
pub use receipt::{Item, Receipt, ScoredReceipt, Submission};
pub use rules::PointsBreakdown;
pub use store::ReceiptStore;
pub use validation::validate;
