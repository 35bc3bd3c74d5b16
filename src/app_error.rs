use diesel::result::Error as DieselError;
use thiserror::Error;

/// Every failure the point-of-sale library can report.
///
/// The variants above `Other` are recoverable: the caller shows them as a
/// warning and lets the operator correct the input. `Other` carries
/// infrastructure failures with `anyhow` context attached.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("username '{0}' already exists")]
    DuplicateUsername(String),

    #[error("product #{product_id} is referenced by {line_items} order line(s) and cannot be deleted")]
    ProductInUse { product_id: i32, line_items: i64 },

    #[error("cart is empty")]
    EmptyCart,

    #[error("an order needs at least one line item")]
    EmptyOrder,

    #[error("cart has no line at position {0}")]
    NoSuchCartLine(usize),

    #[error("record not found")]
    NotFound,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the operator can fix this by changing their input or selection.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<DieselError> for AppError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => AppError::NotFound,
            _ => AppError::Other(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diesel_not_found_maps_to_not_found() {
        let err: AppError = DieselError::NotFound.into();
        assert!(matches!(err, AppError::NotFound));
        assert!(err.is_recoverable());
    }

    #[test]
    fn other_diesel_errors_are_not_recoverable() {
        let err: AppError = DieselError::RollbackTransaction.into();
        assert!(matches!(err, AppError::Other(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn duplicate_username_message_names_the_user() {
        let err = AppError::DuplicateUsername("barista".into());
        assert_eq!(err.to_string(), "username 'barista' already exists");
    }
}
