//! Wren: a multi-model chat assistant.
//!
//! Each inbound message is classified into a task category, routed to the
//! model profile for that category, and answered with a persona-conditioned
//! prompt plus a bounded slice of the sender's conversation history.
//!
//! See `DESIGN.md` for the module map.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod config;
pub mod credentials;
pub mod logging;
pub mod memory;
pub mod providers;

pub mod agent;
pub mod chat;

pub mod health;
