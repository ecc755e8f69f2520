pub mod attendance_code;
pub mod attendance_correction;
pub mod attendance_record;
pub mod center;
pub mod idempotency_key;
pub mod registration;

pub use attendance_code::Entity as AttendanceCode;
pub use attendance_correction::Entity as AttendanceCorrection;
pub use attendance_record::Entity as AttendanceRecord;
pub use center::Entity as Center;
pub use idempotency_key::Entity as IdempotencyKey;
pub use registration::Entity as Registration;
