pub mod audit;
pub mod payment;
pub mod request;
pub mod user;

pub use audit::AuditEntry;
pub use payment::{Payment, PaymentTask};
pub use request::{Request, RequestHistory, SavingsRow, SpendRow, REQUEST_COLUMNS};
pub use user::{User, UserSummary};
