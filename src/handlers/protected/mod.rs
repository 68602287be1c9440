// handlers/protected - endpoints behind the bearer token
pub mod actions;
pub mod auth;
pub mod catalog;
pub mod payments;
pub mod queue;
pub mod reports;
pub mod requests;
pub mod users;
