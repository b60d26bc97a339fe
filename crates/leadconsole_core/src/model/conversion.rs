//! Lead to opportunity conversion rule.
//!
//! # Invariants
//! - One conversion yields exactly one opportunity.
//! - The opportunity copies values from the lead; it keeps no lead id.
//! - A converted lead is never converted again.

use crate::model::lead::{Lead, LeadStatus};
use crate::model::new_record_id;
use crate::model::opportunity::{Opportunity, INITIAL_STAGE};

/// Derives the opportunity for `lead` with a caller-provided id.
///
/// Returns `None` when the lead has already been converted.
pub fn opportunity_for(lead: &Lead, opportunity_id: impl Into<String>) -> Option<Opportunity> {
    if lead.is_converted() {
        return None;
    }

    Some(Opportunity {
        id: opportunity_id.into(),
        name: format!("Opportunity for {}", lead.name),
        stage: INITIAL_STAGE.to_string(),
        amount: None,
        account_name: lead.company.clone(),
    })
}

/// Applies the conversion rule to `lead` in place.
///
/// Flips the status to `converted` and returns the new opportunity, or
/// `None` (leaving the lead untouched) when it was already converted.
pub fn convert(lead: &mut Lead) -> Option<Opportunity> {
    let opportunity = opportunity_for(lead, new_record_id())?;
    lead.status = LeadStatus::Converted;
    Some(opportunity)
}
