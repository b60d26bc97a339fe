//! Opportunity record.
//!
//! # Invariants
//! - Opportunities are only created by lead conversion.
//! - `account_name` is serialized as `accountName`; `amount` is omitted
//!   from the wire shape when absent.

use serde::{Deserialize, Serialize};

/// Stage assigned to every freshly converted opportunity.
pub const INITIAL_STAGE: &str = "Prospecting";

/// Sales record derived from a converted lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,
    pub name: String,
    pub stage: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub account_name: String,
}
