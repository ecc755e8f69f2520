pub mod bulk_sync;
pub mod check_in;
pub mod code;
pub mod conflict;
pub mod correction;
pub mod error;
pub mod idempotency;
pub mod registration;
