//! api::loans
//!
//! Authenticated loan and reminder endpoints.
//!
//! # Repayment flow
//!
//! A loan starts `outstanding`. The lender asks for it back
//! (`repayment-request`), which moves it to `repayment_requested`, and
//! confirms the return (`repayment-confirm`), which moves it to
//! `repaid`. Status transitions are owned by the server; the client
//! only reflects them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::channels::{PrivateChannel, RequestSpec};
use super::error::ApiError;

/// What was lent: money or a physical object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanKind {
    /// A sum of money.
    Money,
    /// A physical object (book, charger, umbrella...).
    Object,
}

impl std::fmt::Display for LoanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoanKind::Money => write!(f, "money"),
            LoanKind::Object => write!(f, "object"),
        }
    }
}

/// Server-owned repayment status of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// Lent and not yet returned.
    Outstanding,
    /// The lender asked for it back.
    RepaymentRequested,
    /// Returned and confirmed.
    Repaid,
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoanStatus::Outstanding => write!(f, "outstanding"),
            LoanStatus::RepaymentRequested => write!(f, "repayment requested"),
            LoanStatus::Repaid => write!(f, "repaid"),
        }
    }
}

/// A recorded loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    /// Server-assigned identifier.
    pub id: u64,

    /// Who borrowed it.
    pub counterparty: String,

    pub kind: LoanKind,

    /// Amount in the smallest currency unit; present for money loans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,

    /// Description of the lent object; present for object loans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,

    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// When it was lent.
    pub lent_on: NaiveDate,

    /// When it is due back, if agreed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_on: Option<NaiveDate>,

    pub status: LoanStatus,
}

/// Request to record a new loan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanRequest {
    pub counterparty: String,
    pub kind: LoanKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub lent_on: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_on: Option<NaiveDate>,
}

/// An upcoming or overdue return.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    /// The loan this reminder is for.
    pub loan_id: u64,

    /// Who has it.
    pub counterparty: String,

    /// When it is due back.
    pub due_on: NaiveDate,

    /// Days until due; negative means overdue.
    pub days_left: i64,
}

impl Reminder {
    /// Whether the due date has passed.
    pub fn is_overdue(&self) -> bool {
        self.days_left < 0
    }
}

/// Client for the authenticated loan endpoints.
#[derive(Debug)]
pub struct LoansApi {
    channel: PrivateChannel,
}

impl LoansApi {
    pub(crate) fn new(channel: PrivateChannel) -> Self {
        Self { channel }
    }

    /// List all recorded loans.
    pub async fn list(&self) -> Result<Vec<Loan>, ApiError> {
        self.channel.execute_json(&RequestSpec::get("/loans")).await
    }

    /// Record a new loan.
    pub async fn create(&self, request: &CreateLoanRequest) -> Result<Loan, ApiError> {
        let body = serde_json::to_value(request).map_err(|e| ApiError::Api {
            status: 0,
            message: format!("cannot encode loan: {}", e),
        })?;
        self.channel
            .execute_json(&RequestSpec::post("/loans", Some(body)))
            .await
    }

    /// Fetch a single loan.
    pub async fn get(&self, id: u64) -> Result<Loan, ApiError> {
        self.channel
            .execute_json(&RequestSpec::get(format!("/loans/{}", id)))
            .await
    }

    /// Ask the borrower to return a loan.
    pub async fn request_repayment(&self, id: u64) -> Result<Loan, ApiError> {
        self.channel
            .execute_json(&RequestSpec::post(
                format!("/loans/{}/repayment-request", id),
                None,
            ))
            .await
    }

    /// Confirm a loan came back.
    pub async fn confirm_repayment(&self, id: u64) -> Result<Loan, ApiError> {
        self.channel
            .execute_json(&RequestSpec::post(
                format!("/loans/{}/repayment-confirm", id),
                None,
            ))
            .await
    }

    /// List upcoming and overdue returns.
    pub async fn reminders(&self) -> Result<Vec<Reminder>, ApiError> {
        self.channel
            .execute_json(&RequestSpec::get("/reminders"))
            .await
    }
}
