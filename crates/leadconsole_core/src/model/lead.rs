//! Lead record and lead form validation.
//!
//! # Responsibility
//! - Define the canonical lead record and its wire shape.
//! - Provide the form-level draft validator used before records reach the
//!   repository.
//!
//! # Invariants
//! - A lead built from a draft always starts with `LeadStatus::New`.
//! - Editing through a draft never changes `id` or `status`.
//! - `score` must be within `SCORE_MIN..=SCORE_MAX` for drafts to validate.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-\.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("valid email regex")
});

/// Qualification state of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Converted,
}

impl LeadStatus {
    /// Wire value, also used as the facet value in lead tables.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Converted => "converted",
        }
    }

    /// All statuses in display order.
    pub fn all() -> [LeadStatus; 2] {
        [Self::New, Self::Converted]
    }
}

impl Display for LeadStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prospective contact record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub company: String,
    pub email: String,
    pub source: String,
    /// Qualification score, 0..=100 when produced by a validated draft.
    /// Fractional values are valid.
    pub score: f64,
    pub status: LeadStatus,
}

impl Lead {
    /// Returns whether the convert action may be offered for this lead.
    pub fn can_convert(&self) -> bool {
        self.status == LeadStatus::New
    }

    /// Returns whether this lead has already been converted.
    pub fn is_converted(&self) -> bool {
        self.status == LeadStatus::Converted
    }
}

/// Form input for creating or editing a lead.
///
/// Carries every user-editable field. `id` and `status` are owned by the
/// create/edit flow, never by the form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeadDraft {
    pub name: String,
    pub company: String,
    pub email: String,
    pub source: String,
    pub score: f64,
}

/// Editable lead fields, used to attach validation messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadField {
    Name,
    Company,
    Email,
    Source,
    Score,
}

/// One validation failure for a lead draft.
#[derive(Debug, Clone, PartialEq)]
pub enum LeadFieldError {
    MissingName,
    MissingCompany,
    InvalidEmail,
    MissingSource,
    /// NaN or infinite.
    ScoreNotANumber,
    ScoreTooLow(f64),
    ScoreTooHigh(f64),
}

impl LeadFieldError {
    /// Field this error should be displayed next to.
    pub fn field(&self) -> LeadField {
        match self {
            Self::MissingName => LeadField::Name,
            Self::MissingCompany => LeadField::Company,
            Self::InvalidEmail => LeadField::Email,
            Self::MissingSource => LeadField::Source,
            Self::ScoreNotANumber | Self::ScoreTooLow(_) | Self::ScoreTooHigh(_) => {
                LeadField::Score
            }
        }
    }
}

impl Display for LeadFieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => f.write_str("Please enter the name"),
            Self::MissingCompany => f.write_str("Please enter the company"),
            Self::InvalidEmail => f.write_str("Please enter a valid email address"),
            Self::MissingSource => f.write_str("Please enter the source"),
            Self::ScoreNotANumber => f.write_str("Score must be a number"),
            Self::ScoreTooLow(_) => write!(f, "Score must be at least {SCORE_MIN}"),
            Self::ScoreTooHigh(_) => write!(f, "Score cannot exceed {SCORE_MAX}"),
        }
    }
}

impl Error for LeadFieldError {}

impl LeadDraft {
    /// Pre-fills an edit form from an existing lead.
    pub fn from_lead(lead: &Lead) -> Self {
        Self {
            name: lead.name.clone(),
            company: lead.company.clone(),
            email: lead.email.clone(),
            source: lead.source.clone(),
            score: lead.score,
        }
    }

    /// Checks every field and returns all violations in field order.
    pub fn validate(&self) -> Result<(), Vec<LeadFieldError>> {
        let mut errors = Vec::new();

        if self.name.is_empty() {
            errors.push(LeadFieldError::MissingName);
        }
        if self.company.is_empty() {
            errors.push(LeadFieldError::MissingCompany);
        }
        if !is_valid_email(&self.email) {
            errors.push(LeadFieldError::InvalidEmail);
        }
        if self.source.is_empty() {
            errors.push(LeadFieldError::MissingSource);
        }
        if !self.score.is_finite() {
            errors.push(LeadFieldError::ScoreNotANumber);
        } else if self.score < SCORE_MIN {
            errors.push(LeadFieldError::ScoreTooLow(self.score));
        } else if self.score > SCORE_MAX {
            errors.push(LeadFieldError::ScoreTooHigh(self.score));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Builds a new lead with the given id and status `new`.
    ///
    /// Does not validate; call `validate()` first.
    pub fn into_new_lead(self, id: impl Into<String>) -> Lead {
        Lead {
            id: id.into(),
            name: self.name,
            company: self.company,
            email: self.email,
            source: self.source,
            score: self.score,
            status: LeadStatus::New,
        }
    }

    /// Builds the edited version of `existing`, keeping its id and status.
    pub fn apply_to(self, existing: &Lead) -> Lead {
        Lead {
            id: existing.id.clone(),
            name: self.name,
            company: self.company,
            email: self.email,
            source: self.source,
            score: self.score,
            status: existing.status,
        }
    }
}

fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}
