//! Background Tasks Module
//!
//! Tasks that run periodically while the server is up.

mod cleanup;

pub use cleanup::spawn_cleanup_task;
