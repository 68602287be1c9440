pub mod audit;
pub mod init;
pub mod report;
pub mod user;
