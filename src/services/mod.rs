//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own identity and credential logic so route handlers can
//! stay focused on cookie plumbing and status codes.

pub mod browser;
pub mod directory;
pub mod password;
pub mod provider;
pub mod session_store;
