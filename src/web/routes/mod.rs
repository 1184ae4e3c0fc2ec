//! Web Routes
//!
//! Route handlers organized by functionality.

pub mod assets;
pub mod chat;
pub mod health;
pub mod sms;
