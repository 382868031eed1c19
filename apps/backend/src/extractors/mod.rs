pub mod identity;

pub use identity::{AuthorizedUser, Identity};
