mod bulk_sync_test;
mod code_test;
mod correction_test;
mod get_test;
mod post_test;
