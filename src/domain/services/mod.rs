//! # Domain Services
//!
//! Domain services encapsulate business rules that don't naturally belong
//! to a single entity. They are pure functions over domain entities; the
//! application layer loads and stores the data they work on.
//!
//! ## Services
//!
//! - **fee_settlement**: Carry-forward of deposits onto older receipt balances
//! - **marks_grouping**: Folding mark rows into per-student records
//! - **roll_numbers**: Roll-number assignment and renumbering

mod fee_settlement;
mod marks_grouping;
mod roll_numbers;

pub use fee_settlement::*;
pub use marks_grouping::*;
pub use roll_numbers::*;
