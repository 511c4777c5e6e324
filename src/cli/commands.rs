//! cli::commands
//!
//! Command handlers. Each handler wires a [`Client`] from configuration,
//! bootstraps the session, and delegates to the library surface.

use anyhow::{bail, Context, Result};
use chrono::Local;

use crate::api::{CreateLoanRequest, LoanKind};
use crate::client::Client;
use crate::config::ClientConfig;
use crate::store;
use crate::ui::{self, Verbosity};

use super::args::{AuthCommand, Command, LoanCommand};

/// Dispatch a parsed command.
pub async fn dispatch(command: Command, verbosity: Verbosity) -> Result<()> {
    let config = ClientConfig::load().context("failed to load configuration")?;
    let token_store =
        store::create_store(&config.store_provider).context("failed to open credential store")?;
    let client = Client::new(&config, token_store);
    client.session().bootstrap().await;

    match command {
        Command::Auth(cmd) => auth(cmd, &client, verbosity).await,
        Command::Loans(cmd) => loans(cmd, &client, verbosity).await,
        Command::Reminders => reminders(&client, verbosity).await,
    }
}

async fn auth(cmd: AuthCommand, client: &Client, verbosity: Verbosity) -> Result<()> {
    match cmd {
        AuthCommand::Login { email, code } => {
            if let Some(code) = code {
                client.session().login_with_code(&code).await?;
            } else {
                let email = match email {
                    Some(email) => email,
                    None => ui::prompt_line("email: ").context("cannot read email")?,
                };
                let password =
                    rpassword::prompt_password("password: ").context("cannot read password")?;
                client.session().login(&email, &password).await?;
            }
            ui::success("Logged in.", verbosity);
            Ok(())
        }
        AuthCommand::Status => {
            if client.session().is_authenticated() {
                ui::print("Logged in.", verbosity);
            } else {
                ui::print("Not logged in.", verbosity);
            }
            Ok(())
        }
        AuthCommand::Logout => {
            client.session().logout().await;
            ui::success("Logged out.", verbosity);
            Ok(())
        }
    }
}

async fn loans(cmd: LoanCommand, client: &Client, verbosity: Verbosity) -> Result<()> {
    match cmd {
        LoanCommand::List => {
            let loans = client.loans().list().await?;
            if loans.is_empty() {
                ui::print("No loans recorded.", verbosity);
                return Ok(());
            }
            for loan in &loans {
                ui::print(ui::format_loan_row(loan), verbosity);
            }
            Ok(())
        }
        LoanCommand::Add {
            to,
            amount,
            item,
            due,
            note,
        } => {
            let kind = match (&amount, &item) {
                (Some(_), None) => LoanKind::Money,
                (None, Some(_)) => LoanKind::Object,
                _ => bail!("specify exactly one of --amount or --item"),
            };
            let request = CreateLoanRequest {
                counterparty: to,
                kind,
                amount,
                item,
                note,
                lent_on: Local::now().date_naive(),
                due_on: due,
            };
            let loan = client.loans().create(&request).await?;
            ui::success(
                format!("Recorded loan #{} to {}.", loan.id, loan.counterparty),
                verbosity,
            );
            Ok(())
        }
        LoanCommand::Request { id } => {
            let loan = client.loans().request_repayment(id).await?;
            ui::success(
                format!("Asked {} to return loan #{}.", loan.counterparty, loan.id),
                verbosity,
            );
            Ok(())
        }
        LoanCommand::Confirm { id } => {
            let loan = client.loans().confirm_repayment(id).await?;
            ui::success(format!("Loan #{} marked {}.", loan.id, loan.status), verbosity);
            Ok(())
        }
    }
}

async fn reminders(client: &Client, verbosity: Verbosity) -> Result<()> {
    let reminders = client.loans().reminders().await?;
    if reminders.is_empty() {
        ui::print("Nothing due soon.", verbosity);
        return Ok(());
    }
    for reminder in &reminders {
        ui::print(ui::format_reminder_row(reminder), verbosity);
    }
    Ok(())
}
