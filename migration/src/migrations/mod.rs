pub mod m202412010001_create_registrations;
pub mod m202412010002_create_attendance;
pub mod m202412010003_create_attendance_codes;
pub mod m202412010004_create_idempotency_keys;
