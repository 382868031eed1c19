//! Infrastructure: connection bootstrap, state assembly, database error mapping.

pub mod db_errors;
pub mod state;
