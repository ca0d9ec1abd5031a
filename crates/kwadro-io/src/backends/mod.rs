pub mod memory;

pub use memory::MemoryStore;

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "json")]
pub use json::JsonStore;

#[cfg(feature = "xlsx")]
pub mod xlsx;

#[cfg(feature = "xlsx")]
pub use xlsx::XlsxStore;
