use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use pulse_core::crm::{Contact, Deal, DealStage, LeadStatus, LifecycleStage};

/// Coarse position along the client journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Prospeccao,
    Onboarding,
    Relacionamento,
}

impl Stage {
    /// Journey order, earliest first.
    pub fn all() -> [Stage; 3] {
        [Stage::Prospeccao, Stage::Onboarding, Stage::Relacionamento]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Prospeccao => "prospeccao",
            Stage::Onboarding => "onboarding",
            Stage::Relacionamento => "relacionamento",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Prospeccao => "Prospecção",
            Stage::Onboarding => "Onboarding",
            Stage::Relacionamento => "Relacionamento",
        }
    }
}

/// Finer-grained position within a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubStage {
    // Prospecção
    AgendamentoMarcado,
    ApresentacaoAgendada,
    PropostaEnviada,
    PropostaPendente,
    // Onboarding
    ContratoEnviado,
    DepositoRealizado,
    AlocacaoPendente,
    AlocacaoFeita,
    // Relacionamento
    CadenciaAtiva,
    ReuniaoRecente,
    SeguimentoNecessario,
}

impl SubStage {
    pub fn display_name(&self) -> &'static str {
        match self {
            SubStage::AgendamentoMarcado => "Agendamento Marcado",
            SubStage::ApresentacaoAgendada => "Apresentação Agendada",
            SubStage::PropostaEnviada => "Proposta Enviada",
            SubStage::PropostaPendente => "Proposta Pendente",
            SubStage::ContratoEnviado => "Contrato Enviado",
            SubStage::DepositoRealizado => "Depósito Realizado",
            SubStage::AlocacaoPendente => "Alocação Pendente",
            SubStage::AlocacaoFeita => "Alocação Feita",
            SubStage::CadenciaAtiva => "Cadência Ativa",
            SubStage::ReuniaoRecente => "Reunião Recente",
            SubStage::SeguimentoNecessario => "Seguimento Necessário",
        }
    }

    /// Progress through the whole journey, as a percentage for board cards.
    pub fn progress_pct(&self) -> u8 {
        match self {
            SubStage::AgendamentoMarcado => 15,
            SubStage::ApresentacaoAgendada => 20,
            SubStage::PropostaPendente => 25,
            SubStage::PropostaEnviada => 50,
            SubStage::ContratoEnviado => 55,
            SubStage::DepositoRealizado => 60,
            SubStage::AlocacaoPendente => 70,
            SubStage::AlocacaoFeita => 80,
            SubStage::SeguimentoNecessario => 85,
            SubStage::CadenciaAtiva => 90,
            SubStage::ReuniaoRecente => 95,
        }
    }
}

/// Urgency ranking for human follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// A detected condition suggesting relationship deterioration.
///
/// Tagged enum with a separate display mapping; generation order is
/// preserved end to end and duplicates across independent conditions are
/// not suppressed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    NoContactOver60Days,
    NoContactOver30Days,
    WhatsappCadenceInactive,
    DepositPendingOver14Days,
    AllocationPending,
    LifecycleStageOutdated,
    HighValueWithoutRecentContact,
    NegativeLeadStatus,
}

impl RiskFactor {
    pub fn description(&self) -> &'static str {
        match self {
            RiskFactor::NoContactOver60Days => "no contact in 60+ days",
            RiskFactor::NoContactOver30Days => "no contact in 30+ days",
            RiskFactor::WhatsappCadenceInactive => "WhatsApp cadence inactive",
            RiskFactor::DepositPendingOver14Days => "contract sent 14+ days without deposit",
            RiskFactor::AllocationPending => "deal closed but allocation pending",
            RiskFactor::LifecycleStageOutdated => "lifecycle stage not updated",
            RiskFactor::HighValueWithoutRecentContact => "high value without recent contact",
            RiskFactor::NegativeLeadStatus => "negative lead status",
        }
    }
}

/// A recommended follow-up, at most five per position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    ConfirmAppointment,
    PreparePresentation,
    SendProposal,
    FollowUpProposal,
    FollowUpContract,
    ConfirmFirstDeposit,
    CompleteAllocation,
    ScheduleFollowUpMeeting,
    ActivateRelationshipCadence,
    ScheduleUrgentMeeting,
    MakePhoneContact,
    ReactivateWhatsappCadence,
    UpdateLifecycleStage,
    ReviewPortfolioPerformance,
    IdentifyUpsellOpportunities,
}

impl NextAction {
    pub fn description(&self) -> &'static str {
        match self {
            NextAction::ConfirmAppointment => "confirm scheduled appointment",
            NextAction::PreparePresentation => "prepare presentation material",
            NextAction::SendProposal => "send proposal",
            NextAction::FollowUpProposal => "follow up on proposal",
            NextAction::FollowUpContract => "follow up on contract signature",
            NextAction::ConfirmFirstDeposit => "confirm first deposit",
            NextAction::CompleteAllocation => "complete portfolio allocation",
            NextAction::ScheduleFollowUpMeeting => "schedule follow-up meeting",
            NextAction::ActivateRelationshipCadence => "activate relationship cadence",
            NextAction::ScheduleUrgentMeeting => "schedule urgent meeting",
            NextAction::MakePhoneContact => "make phone contact",
            NextAction::ReactivateWhatsappCadence => "reactivate WhatsApp cadence",
            NextAction::UpdateLifecycleStage => "update lifecycle stage to customer",
            NextAction::ReviewPortfolioPerformance => "review portfolio performance",
            NextAction::IdentifyUpsellOpportunities => "identify upsell opportunities",
        }
    }
}

/// Raw signals the classification consumed, plus the derived risk and
/// action lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PositionMetadata {
    pub deal_stage: DealStage,
    pub proposal_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_deposit_date: Option<DateTime<Utc>>,
    pub allocation_done: bool,
    pub whatsapp_cadence_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_meeting_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_since_last_meeting: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_status: Option<LeadStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_stage: Option<LifecycleStage>,
    pub risk_factors: Vec<RiskFactor>,
    pub next_actions: Vec<NextAction>,
}

/// Output of the journey engine. Recomputed on every read, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JourneyPosition {
    pub stage: Stage,
    pub sub_stage: SubStage,
    /// Engine's certainty in the stage assignment, in [0.5, 1.0].
    pub confidence: f64,
    pub priority: Priority,
    pub days_in_current_stage: i64,
    pub metadata: PositionMetadata,
}

/// Externally-visible envelope combining the raw records with the computed
/// journey position and health score. Assembled by the caller per request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClientJourney {
    pub contact_id: String,
    pub deal_id: String,
    pub contact: Contact,
    pub deal: Deal,
    pub journey_position: JourneyPosition,
    pub health_score: u8,
    pub last_activity: DateTime<Utc>,
    pub owner_name: String,
}
