//! エラー型定義

use crate::types::Category;
use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Charge is empty")]
    EmptyCode,

    #[error("Charge {0} was already scanned")]
    Duplicate(String),

    #[error("{field} {message}")]
    Field { field: String, message: String },

    #[error("Measurement for {given} does not match {expected} record")]
    CategoryMismatch { expected: Category, given: Category },

    #[error("Category {0} is not available in this catalog")]
    CategoryUnavailable(Category),
}

impl Error {
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Field {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
