//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! Available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Keeptab - track what you lend, get it back
#[derive(Parser, Debug)]
#[command(name = "ktab")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the login session
    #[command(subcommand)]
    Auth(AuthCommand),

    /// Record and track loans
    #[command(subcommand)]
    Loans(LoanCommand),

    /// List upcoming and overdue returns
    Reminders,
}

/// Session commands.
#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Log in with email and password, or a third-party code
    Login {
        /// Email address (prompted when omitted)
        #[arg(long)]
        email: Option<String>,

        /// Third-party authorization code; skips the password prompt
        #[arg(long, conflicts_with = "email")]
        code: Option<String>,
    },

    /// Show whether a session exists
    Status,

    /// Log out and clear stored credentials
    Logout,
}

/// Loan commands.
#[derive(Subcommand, Debug)]
pub enum LoanCommand {
    /// List recorded loans
    List,

    /// Record a new loan
    Add {
        /// Who is borrowing
        #[arg(long)]
        to: String,

        /// Amount lent, in the smallest currency unit
        #[arg(long, conflicts_with = "item")]
        amount: Option<i64>,

        /// Description of the lent object
        #[arg(long)]
        item: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,

        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },

    /// Ask the borrower to return a loan
    Request {
        /// Loan id
        id: u64,
    },

    /// Confirm a loan came back
    Confirm {
        /// Loan id
        id: u64,
    },
}
