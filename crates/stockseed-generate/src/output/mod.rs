pub mod atomic;
pub mod sql;

pub use atomic::write_bytes_atomic;
pub use sql::{BALANCE_AGGREGATION, SqlValue, render_sql};
