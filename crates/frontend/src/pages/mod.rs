pub mod campus;
pub mod login;
