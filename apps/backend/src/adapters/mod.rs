//! Implementations of the user directory.

pub mod users_memory;
pub mod users_sea;

pub use users_memory::MemoryUserDirectory;
pub use users_sea::SeaUserDirectory;
