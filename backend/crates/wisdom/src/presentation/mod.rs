//! Presentation Layer - Wire protocol and response handlers

pub mod handlers;
pub mod protocol;
pub mod router;
