//! Status taxonomy for engine mutations.
//!
//! Domain conditions are returned by value for the caller to branch on;
//! they are never panics. Contract violations (dimension mismatches,
//! out-of-range buffer writes) panic in the layers below instead of
//! appearing here. Each variant carries one stable message for the host
//! binding to surface verbatim.

use thiserror::Error;

/// Recoverable domain conditions reported by engine mutators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocatorError {
    /// `add_category` on an id that is already a category.
    #[error("category already exists")]
    CategoryExists,
    /// Operation names a category the engine does not have.
    #[error("category does not exist")]
    CategoryDoesNotExist,
    /// Rename target label id is already in use.
    #[error("label already exists")]
    LabelExists,
    /// Rename source label id is not in use.
    #[error("label does not exist")]
    LabelDoesNotExist,
    /// Label is already owned by a different category.
    #[error("label exists in another category")]
    LabelExistsInOtherCategory,
    /// Indicator length differs from the engine's row domain.
    #[error("indicator length does not match the row domain")]
    WrongIndexSize,
    /// Batch assignment where label count and marked-row count differ.
    #[error("number of labels does not match the number of marked rows")]
    WrongNumberOfIndices,
    /// A row position at or beyond the current size.
    #[error("row index out of bounds")]
    IndexOutOfBounds,
    /// `append` between engines with different category sets.
    #[error("category sets do not match")]
    CategoriesDoNotMatch,
    /// `append` would push the row count past the 32-bit domain.
    #[error("combined row count exceeds the 32-bit row domain")]
    LocOverflow,
    /// The reserved undefined sentinel used as a label id.
    #[error("label id is the reserved undefined sentinel")]
    IsUndefinedLabel,
}

/// Result alias for engine operations.
pub type LocatorResult<T> = Result<T, LocatorError>;
