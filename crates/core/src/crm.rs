//! CRM record model — deals, contacts, and the raw export shapes they
//! arrive in. Raw records carry string-encoded flags and ISO-8601 date
//! strings; parsing into the typed records happens here, at the record-store
//! boundary, so the journey engine only ever sees strongly-typed inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{PulseError, PulseResult};

/// Pipeline stage of a deal, as maintained in the CRM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DealStage {
    AppointmentScheduled,
    PresentationScheduled,
    DecisionMakerBoughtIn,
    ContractSent,
    ClosedWon,
    ClosedLost,
}

impl DealStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealStage::AppointmentScheduled => "appointment_scheduled",
            DealStage::PresentationScheduled => "presentation_scheduled",
            DealStage::DecisionMakerBoughtIn => "decision_maker_bought_in",
            DealStage::ContractSent => "contract_sent",
            DealStage::ClosedWon => "closed_won",
            DealStage::ClosedLost => "closed_lost",
        }
    }

    fn parse(raw: &str) -> PulseResult<Self> {
        match raw {
            "appointment_scheduled" => Ok(DealStage::AppointmentScheduled),
            "presentation_scheduled" => Ok(DealStage::PresentationScheduled),
            "decision_maker_bought_in" => Ok(DealStage::DecisionMakerBoughtIn),
            "contract_sent" => Ok(DealStage::ContractSent),
            "closed_won" => Ok(DealStage::ClosedWon),
            "closed_lost" => Ok(DealStage::ClosedLost),
            other => Err(PulseError::Validation(format!(
                "unknown dealstage '{other}'"
            ))),
        }
    }
}

/// Lead status — a data-quality signal, never load-bearing for
/// classification beyond the negative statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Open,
    InProgress,
    OpenDeal,
    Unqualified,
    AttemptedToContact,
    Connected,
    BadTiming,
}

impl LeadStatus {
    /// Parse a raw CRM value. Unknown values degrade to `None` rather than
    /// failing validation.
    pub fn from_raw(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "new" => Some(LeadStatus::New),
            "open" => Some(LeadStatus::Open),
            "in_progress" => Some(LeadStatus::InProgress),
            "open_deal" => Some(LeadStatus::OpenDeal),
            "unqualified" => Some(LeadStatus::Unqualified),
            "attempted_to_contact" => Some(LeadStatus::AttemptedToContact),
            "connected" => Some(LeadStatus::Connected),
            "bad_timing" => Some(LeadStatus::BadTiming),
            _ => None,
        }
    }
}

/// Marketing lifecycle stage of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStage {
    Subscriber,
    Lead,
    MarketingQualifiedLead,
    SalesQualifiedLead,
    Opportunity,
    Customer,
    Evangelist,
    Other,
}

impl LifecycleStage {
    /// Parse a raw CRM value. Accepts both snake_case and the compressed
    /// lowercase form the CRM export uses (`salesqualifiedlead`).
    pub fn from_raw(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .to_ascii_lowercase()
            .chars()
            .filter(|c| *c != '_')
            .collect();
        match normalized.as_str() {
            "subscriber" => Some(LifecycleStage::Subscriber),
            "lead" => Some(LifecycleStage::Lead),
            "marketingqualifiedlead" => Some(LifecycleStage::MarketingQualifiedLead),
            "salesqualifiedlead" => Some(LifecycleStage::SalesQualifiedLead),
            "opportunity" => Some(LifecycleStage::Opportunity),
            "customer" => Some(LifecycleStage::Customer),
            "evangelist" => Some(LifecycleStage::Evangelist),
            "other" => Some(LifecycleStage::Other),
            _ => None,
        }
    }
}

/// A sales opportunity, fully typed. Read-only to the journey engine.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Deal {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub stage: DealStage,
    pub pipeline: String,
    pub proposal_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_deposit_date: Option<DateTime<Utc>>,
    pub allocation_done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// The person associated with a deal (one contact per deal).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Contact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub whatsapp_cadence_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_meeting_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_status: Option<LeadStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_stage: Option<LifecycleStage>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Deal record as exported by the CRM: every property is a string, flags
/// included.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDeal {
    pub id: String,
    pub dealname: String,
    #[serde(default)]
    pub amount: Option<String>,
    pub dealstage: String,
    #[serde(default)]
    pub pipeline: Option<String>,
    /// Boolean as string ("true"/"false").
    #[serde(default)]
    pub proposal_sent: Option<String>,
    /// ISO-8601 date string.
    #[serde(default)]
    pub first_deposit_date: Option<String>,
    /// Boolean as string ("true"/"false").
    #[serde(default)]
    pub allocation_done: Option<String>,
    #[serde(default)]
    pub hubspot_owner_id: Option<String>,
    pub createdate: String,
    pub hs_lastmodifieddate: String,
}

/// Contact record as exported by the CRM.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawContact {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    /// Boolean as string ("true"/"false").
    #[serde(default)]
    pub whatsapp_cadence_active: Option<String>,
    /// ISO-8601 date string.
    #[serde(default)]
    pub last_meeting_date: Option<String>,
    #[serde(default)]
    pub hs_lead_status: Option<String>,
    #[serde(default)]
    pub lifecyclestage: Option<String>,
    pub createdate: String,
    pub lastmodifieddate: String,
}

/// A string-encoded flag is true only for the literal "true".
fn parse_flag(raw: Option<&String>) -> bool {
    raw.map(|v| v == "true").unwrap_or(false)
}

fn parse_date(raw: &str, field: &str) -> PulseResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PulseError::Validation(format!("invalid {field} '{raw}': {e}")))
}

/// Empty strings count as absent, matching how the CRM clears fields.
fn parse_date_opt(raw: Option<&String>, field: &str) -> PulseResult<Option<DateTime<Utc>>> {
    match raw {
        Some(v) if !v.is_empty() => parse_date(v, field).map(Some),
        _ => Ok(None),
    }
}

impl TryFrom<RawDeal> for Deal {
    type Error = PulseError;

    fn try_from(raw: RawDeal) -> PulseResult<Self> {
        if raw.id.is_empty() {
            return Err(PulseError::Validation("deal id must not be empty".into()));
        }
        let stage = DealStage::parse(&raw.dealstage)?;
        let amount = match raw.amount.as_deref() {
            Some(v) if !v.is_empty() => {
                let parsed: f64 = v.parse().map_err(|_| {
                    PulseError::Validation(format!("invalid deal amount '{v}'"))
                })?;
                if parsed < 0.0 {
                    return Err(PulseError::Validation(format!(
                        "deal amount must be non-negative, got {parsed}"
                    )));
                }
                Some(parsed)
            }
            _ => None,
        };

        Ok(Deal {
            stage,
            amount,
            proposal_sent: parse_flag(raw.proposal_sent.as_ref()),
            first_deposit_date: parse_date_opt(
                raw.first_deposit_date.as_ref(),
                "first_deposit_date",
            )?,
            allocation_done: parse_flag(raw.allocation_done.as_ref()),
            owner_id: raw.hubspot_owner_id.filter(|v| !v.is_empty()),
            created_at: parse_date(&raw.createdate, "createdate")?,
            last_modified: parse_date(&raw.hs_lastmodifieddate, "hs_lastmodifieddate")?,
            pipeline: raw.pipeline.unwrap_or_else(|| "default".to_string()),
            id: raw.id,
            name: raw.dealname,
        })
    }
}

impl TryFrom<RawContact> for Contact {
    type Error = PulseError;

    fn try_from(raw: RawContact) -> PulseResult<Self> {
        if raw.id.is_empty() {
            return Err(PulseError::Validation(
                "contact id must not be empty".into(),
            ));
        }

        Ok(Contact {
            whatsapp_cadence_active: parse_flag(raw.whatsapp_cadence_active.as_ref()),
            last_meeting_date: parse_date_opt(
                raw.last_meeting_date.as_ref(),
                "last_meeting_date",
            )?,
            lead_status: raw.hs_lead_status.as_deref().and_then(LeadStatus::from_raw),
            lifecycle_stage: raw
                .lifecyclestage
                .as_deref()
                .and_then(LifecycleStage::from_raw),
            created_at: parse_date(&raw.createdate, "createdate")?,
            last_modified: parse_date(&raw.lastmodifieddate, "lastmodifieddate")?,
            id: raw.id,
            first_name: raw.firstname,
            last_name: raw.lastname,
            email: raw.email,
            company: raw.company.filter(|v| !v.is_empty()),
        })
    }
}
