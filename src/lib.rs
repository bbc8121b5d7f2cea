//! Compiles a nested graph request language into pattern queries, and folds the flat result rows
//! back into nested entities shaped like the request.

pub mod front_end;
pub mod query;
pub mod reducer;

pub use front_end::error::Error;
pub use query::{parse, Query};
pub use reducer::{Record, Reducer, Row};
