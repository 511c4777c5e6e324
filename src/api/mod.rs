//! api
//!
//! HTTP surface of the remote lending-tracker API.
//!
//! # Architecture
//!
//! Two logical channels share one HTTP client and base URL:
//!
//! - the **public** channel carries credential exchange (login, code
//!   exchange, refresh) with no request decoration, and
//! - the **private** channel carries everything else, decorated with the
//!   in-memory access token and recovered once through the refresh
//!   coordinator on 401.
//!
//! Typed endpoint clients sit on top: [`AuthApi`] on the public channel,
//! [`LoansApi`] on the private one.

pub mod auth;
pub(crate) mod channels;
pub mod error;
pub mod loans;

pub use auth::{AuthApi, RefreshExchange, TokenPair};
pub use error::ApiError;
pub use loans::{CreateLoanRequest, Loan, LoanKind, LoanStatus, LoansApi, Reminder};
