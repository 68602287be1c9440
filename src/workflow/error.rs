use thiserror::Error;

use super::{Category, RequestStatus, Role};

/// Rejections raised while routing a request. These never touch storage.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("'{item}' is not a valid {category} item")]
    InvalidItem { category: Category, item: String },

    #[error("Quantity for '{0}' must be at least 1")]
    InvalidQuantity(String),

    #[error("{role} cannot {action} requests")]
    NotPermitted { role: Role, action: &'static str },

    #[error("Request is '{actual}', expected '{expected}'")]
    WrongStatus {
        expected: RequestStatus,
        actual: RequestStatus,
    },

    #[error("Request is already closed as '{0}'")]
    Closed(RequestStatus),

    #[error("Request is not assigned to this approver")]
    NotAssignee,

    #[error("{0}")]
    NotApplicable(String),

    #[error("{0}")]
    InvalidInput(String),
}
