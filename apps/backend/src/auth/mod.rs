pub mod claims;
pub mod cookie;
pub mod gate;
pub mod jwt;
pub mod role;
