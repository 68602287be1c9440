// handlers/public - endpoints that do not require a token
pub mod auth;
pub mod root;

pub use auth::login;
pub use root::{health, root};
