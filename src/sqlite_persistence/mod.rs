mod database;
mod schema;
mod versioned_schema;

pub use database::{format_timestamp, parse_timestamp, Database};
pub use schema::APP_VERSIONED_SCHEMAS;
pub use versioned_schema::*;
