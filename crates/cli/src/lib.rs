// Re-export command modules
pub mod commands;
pub mod topology;

// Re-export commonly used types
pub use commands::Commands;
pub use topology::storage_app;
