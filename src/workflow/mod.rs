pub mod cart;
pub mod catalog;
pub mod error;
pub mod machine;
pub mod role;
pub mod status;

pub use cart::{split_cart, CartItem, NewRequest};
pub use catalog::Category;
pub use error::WorkflowError;
pub use machine::{initial_status, plan, queue_status, Action, Actor, CostReview, Quote, Snapshot, Transition};
pub use role::Role;
pub use status::{PaymentStatus, RequestStatus};
