//! Data models for the Mobile Library

pub mod author;
pub mod book;
pub mod requisition;
pub mod user;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookFormat};
pub use requisition::{ModeratorStatus, ReaderStatus, Requisition, RequisitionState};
pub use user::{Role, User};
