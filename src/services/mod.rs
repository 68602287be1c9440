pub mod audit_service;
pub mod auth_service;
pub mod error;
pub mod payment_service;
pub mod report_service;
pub mod request_service;
pub mod user_service;

pub use audit_service::AuditService;
pub use auth_service::{AuthService, LoginOutcome};
pub use error::ServiceError;
pub use payment_service::PaymentService;
pub use report_service::{savings_to_csv, ReportService, SavingsReport, SpendReport};
pub use request_service::{ActionOutcome, RequestService};
pub use user_service::{NewUser, UserService};

use uuid::Uuid;

/// Eight hex characters, the id format used for requests and payments
pub fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}
