//! Persistence capabilities the HTTP layer is written against.

pub mod users;
