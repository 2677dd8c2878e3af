mod datetime;
mod filesystem;

pub use datetime::get_utc_iso_datetime;
pub use filesystem::{error_log_entry, write_error_to_log};
