pub mod center;
pub mod registration;
