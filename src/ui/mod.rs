//! ui
//!
//! Output formatting and terminal interaction for the CLI.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag.
//! Credential values never pass through this module.

use std::fmt::Display;
use std::io::Write;

use crate::api::{Loan, LoanKind, Reminder};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (respects quiet mode).
pub fn warn(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        eprintln!("warning: {}", message);
    }
}

/// Print a success message (respects quiet mode).
pub fn success(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Prompt for a single line on stdin.
pub fn prompt_line(prompt: &str) -> std::io::Result<String> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Format an amount with thousands separators.
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if amount < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

/// Format one loan as a list row.
pub fn format_loan_row(loan: &Loan) -> String {
    let what = match loan.kind {
        LoanKind::Money => loan
            .amount
            .map(format_amount)
            .unwrap_or_else(|| "?".to_string()),
        LoanKind::Object => loan.item.clone().unwrap_or_else(|| "?".to_string()),
    };
    let due = match loan.due_on {
        Some(date) => format!("due {}", date),
        None => "no due date".to_string(),
    };
    format!(
        "#{:<4} {:<14} {:<16} lent {}  {}  [{}]",
        loan.id, loan.counterparty, what, loan.lent_on, due, loan.status
    )
}

/// Format one reminder as a list row.
pub fn format_reminder_row(reminder: &Reminder) -> String {
    let when = if reminder.days_left < 0 {
        format!("{} days overdue", -reminder.days_left)
    } else if reminder.days_left == 0 {
        "due today".to_string()
    } else {
        format!("due in {} days", reminder.days_left)
    };
    format!(
        "#{:<4} {:<14} due {} ({})",
        reminder.loan_id, reminder.counterparty, reminder.due_on, when
    )
}
