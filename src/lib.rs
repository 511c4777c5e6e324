//! Keeptab - client and CLI for a peer-to-peer lending tracker
//!
//! Keeptab records loans of money or objects to acquaintances, tracks
//! due dates, and confirms repayments against a remote REST API. The
//! client owns no durable state beyond stored credentials and the
//! in-process session.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to the library)
//! - [`client`] - Facade wiring the session core to the API surface
//! - [`api`] - HTTP channels and typed endpoint clients
//! - [`session`] - Session lifecycle: login, bootstrap, logout, token refresh
//! - [`store`] - Credential storage abstraction
//! - [`config`] - Configuration loading
//! - [`ui`] - Output formatting utilities
//!
//! # Session Invariants
//!
//! The session core maintains the following invariants:
//!
//! 1. At most one token refresh call is in flight at any time
//! 2. Requests queued during a refresh are replayed in enqueue order
//! 3. A request is replayed at most once after a refresh
//! 4. Connectivity loss is never treated as an authentication failure
//! 5. Credential values never appear in logs, errors, or debug output

pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod session;
pub mod store;
pub mod ui;

pub use client::Client;
