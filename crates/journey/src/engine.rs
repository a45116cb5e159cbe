//! Journey classification engine — a priority-ordered decision list over a
//! handful of CRM signals. Pure and deterministic: identical
//! (deal, contact, now) triples always produce identical output, and the
//! clock is threaded in by the caller rather than read ambiently.

use chrono::{DateTime, Utc};
use tracing::trace;

use pulse_core::crm::{Contact, Deal, DealStage, LeadStatus, LifecycleStage};

use crate::types::{
    JourneyPosition, NextAction, PositionMetadata, Priority, RiskFactor, Stage, SubStage,
};

/// A meeting older than this no longer counts as an active relationship.
const ACTIVE_RELATIONSHIP_WINDOW_DAYS: i64 = 90;
/// Relacionamento sub-stage windows.
const RECENT_MEETING_DAYS: i64 = 7;
const CADENCE_WINDOW_DAYS: i64 = 30;
/// Inactivity thresholds that erode confidence, per stage.
const RELACIONAMENTO_STALE_DAYS: i64 = 60;
const PROSPECCAO_STALE_DAYS: i64 = 30;
/// Confidence of the safety-net classification when no rule matches.
const FALLBACK_CONFIDENCE: f64 = 0.5;
/// Deal amounts that escalate priority.
const HIGH_VALUE_AMOUNT: f64 = 200_000.0;
const MEDIUM_VALUE_AMOUNT: f64 = 100_000.0;
/// Amount above which a stale relationship is itself a risk.
const VERY_HIGH_VALUE_AMOUNT: f64 = 300_000.0;
/// A contract without a deposit is overdue after this many days in stage.
const DEPOSIT_OVERDUE_DAYS: i64 = 14;
/// Recommended actions are capped; extras past the cap are dropped silently.
const MAX_NEXT_ACTIONS: usize = 5;

/// Stateless classification and scoring engine. Safe to share and to call
/// concurrently from any number of tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct JourneyEngine;

impl JourneyEngine {
    pub fn new() -> Self {
        Self
    }

    /// Classify a deal/contact pair into a journey position.
    ///
    /// Never fails for well-formed input: when none of the three stage
    /// predicates match, the safety-net branch classifies the client as
    /// early prospecção with pinned confidence and low priority.
    pub fn classify(&self, deal: &Deal, contact: &Contact, now: DateTime<Utc>) -> JourneyPosition {
        let days_since_last_meeting = contact.last_meeting_date.map(|d| (now - d).num_days());
        let days_in_current_stage = (now - deal.last_modified).num_days().max(0);

        let risk_factors =
            self.risk_factors(deal, contact, days_since_last_meeting, days_in_current_stage);
        let next_actions = self.next_actions(deal, contact, days_since_last_meeting);

        // Strict priority order: an active relationship supersedes pipeline
        // mechanics, onboarding supersedes prospecting.
        let recent_meeting =
            matches!(days_since_last_meeting, Some(d) if d <= ACTIVE_RELATIONSHIP_WINDOW_DAYS);
        let in_onboarding = matches!(deal.stage, DealStage::ContractSent | DealStage::ClosedWon)
            && deal.first_deposit_date.is_some();
        let in_prospecting = matches!(
            deal.stage,
            DealStage::AppointmentScheduled | DealStage::PresentationScheduled
        );

        let (stage, sub_stage, base_confidence, fallback) =
            if contact.whatsapp_cadence_active && recent_meeting {
                let sub = self.derive_sub_stage(Stage::Relacionamento, deal, days_since_last_meeting);
                (Stage::Relacionamento, sub, 0.95, false)
            } else if in_onboarding {
                let sub = self.derive_sub_stage(Stage::Onboarding, deal, days_since_last_meeting);
                let base = if deal.allocation_done { 0.95 } else { 0.85 };
                (Stage::Onboarding, sub, base, false)
            } else if in_prospecting {
                let sub = self.derive_sub_stage(Stage::Prospeccao, deal, days_since_last_meeting);
                let base = if deal.proposal_sent { 0.85 } else { 0.75 };
                (Stage::Prospeccao, sub, base, false)
            } else {
                // Safety net, not an error path: assume early prospecting.
                (Stage::Prospeccao, SubStage::PropostaPendente, FALLBACK_CONFIDENCE, true)
            };

        let confidence = self.confidence(stage, base_confidence, contact, days_since_last_meeting);
        let priority = if fallback {
            Priority::Low
        } else {
            self.priority(stage, deal, days_since_last_meeting, &risk_factors)
        };

        trace!(
            deal_id = %deal.id,
            stage = stage.as_str(),
            confidence,
            "classified journey position"
        );

        JourneyPosition {
            stage,
            sub_stage,
            confidence,
            priority,
            days_in_current_stage,
            metadata: PositionMetadata {
                deal_stage: deal.stage,
                proposal_sent: deal.proposal_sent,
                first_deposit_date: deal.first_deposit_date,
                allocation_done: deal.allocation_done,
                whatsapp_cadence_active: contact.whatsapp_cadence_active,
                last_meeting_date: contact.last_meeting_date,
                days_since_last_meeting,
                lead_status: contact.lead_status,
                lifecycle_stage: contact.lifecycle_stage,
                risk_factors,
                next_actions,
            },
        }
    }

    /// Composite 0–100 wellness indicator. Additive model over the same
    /// signals the classification used, recomputed on every read.
    pub fn health_score(&self, deal: &Deal, contact: &Contact, position: &JourneyPosition) -> u8 {
        let mut score: f64 = 50.0;

        score += match position.stage {
            Stage::Relacionamento => 30.0,
            Stage::Onboarding => 20.0,
            Stage::Prospeccao => 10.0,
        };

        if contact.whatsapp_cadence_active {
            score += 15.0;
        }

        // Exactly one recency bucket applies; no meeting on file is neutral.
        score += match position.metadata.days_since_last_meeting {
            Some(d) if d <= 7 => 20.0,
            Some(d) if d <= 30 => 10.0,
            Some(d) if d <= 60 => -10.0,
            Some(_) => -25.0,
            None => 0.0,
        };

        if deal.proposal_sent {
            score += 10.0;
        }
        if deal.allocation_done {
            score += 15.0;
        }

        score -= 8.0 * position.metadata.risk_factors.len() as f64;
        score += (position.confidence - 0.5) * 20.0;

        score.round().clamp(0.0, 100.0) as u8
    }

    /// Sub-stage table, evaluated after the stage is fixed.
    fn derive_sub_stage(
        &self,
        stage: Stage,
        deal: &Deal,
        days_since_last_meeting: Option<i64>,
    ) -> SubStage {
        match stage {
            Stage::Relacionamento => match days_since_last_meeting {
                Some(d) if d <= RECENT_MEETING_DAYS => SubStage::ReuniaoRecente,
                Some(d) if d <= CADENCE_WINDOW_DAYS => SubStage::CadenciaAtiva,
                _ => SubStage::SeguimentoNecessario,
            },
            Stage::Onboarding => match deal.stage {
                DealStage::ClosedWon => {
                    if deal.allocation_done {
                        SubStage::AlocacaoFeita
                    } else {
                        SubStage::AlocacaoPendente
                    }
                }
                _ => {
                    if deal.first_deposit_date.is_some() {
                        SubStage::DepositoRealizado
                    } else {
                        SubStage::ContratoEnviado
                    }
                }
            },
            Stage::Prospeccao => match deal.stage {
                DealStage::AppointmentScheduled => SubStage::AgendamentoMarcado,
                DealStage::PresentationScheduled => {
                    if deal.proposal_sent {
                        SubStage::PropostaEnviada
                    } else {
                        SubStage::ApresentacaoAgendada
                    }
                }
                _ => {
                    if deal.proposal_sent {
                        SubStage::PropostaEnviada
                    } else {
                        SubStage::PropostaPendente
                    }
                }
            },
        }
    }

    /// Base confidence eroded by stage-specific inactivity, then scaled by
    /// data quality and clamped to [0.5, 1.0].
    fn confidence(
        &self,
        stage: Stage,
        base: f64,
        contact: &Contact,
        days_since_last_meeting: Option<i64>,
    ) -> f64 {
        let mut confidence = base;

        let stale_after = match stage {
            Stage::Relacionamento => Some(RELACIONAMENTO_STALE_DAYS),
            Stage::Prospeccao => Some(PROSPECCAO_STALE_DAYS),
            Stage::Onboarding => None,
        };
        if let (Some(threshold), Some(days)) = (stale_after, days_since_last_meeting) {
            if days > threshold {
                confidence -= 0.1;
            }
        }

        // The typed deal stage is always present; the two contact signals
        // may be missing from the raw records.
        let mut present_fields = 1;
        if contact.lifecycle_stage.is_some() {
            present_fields += 1;
        }
        if contact.lead_status.is_some() {
            present_fields += 1;
        }
        confidence *= 0.8 + 0.2 * (present_fields as f64 / 3.0);

        confidence.clamp(0.5, 1.0)
    }

    /// Ordered checklist; the first matching condition wins.
    fn priority(
        &self,
        stage: Stage,
        deal: &Deal,
        days_since_last_meeting: Option<i64>,
        risk_factors: &[RiskFactor],
    ) -> Priority {
        let amount = deal.amount.unwrap_or(0.0);

        if !risk_factors.is_empty() {
            Priority::High
        } else if amount > HIGH_VALUE_AMOUNT {
            Priority::High
        } else if stage == Stage::Onboarding && !deal.allocation_done {
            Priority::High
        } else if stage == Stage::Relacionamento
            && matches!(days_since_last_meeting, Some(d) if d > 45)
        {
            Priority::High
        } else if stage == Stage::Prospeccao && deal.proposal_sent {
            Priority::Medium
        } else if amount > MEDIUM_VALUE_AMOUNT {
            Priority::Medium
        } else if stage == Stage::Onboarding {
            Priority::Medium
        } else {
            Priority::Low
        }
    }

    /// Independent conditions appended in a fixed order. The two no-contact
    /// thresholds are mutually exclusive — only the stronger one fires.
    fn risk_factors(
        &self,
        deal: &Deal,
        contact: &Contact,
        days_since_last_meeting: Option<i64>,
        days_in_current_stage: i64,
    ) -> Vec<RiskFactor> {
        let mut risks = Vec::new();

        match days_since_last_meeting {
            Some(d) if d > 60 => risks.push(RiskFactor::NoContactOver60Days),
            Some(d) if d > 30 => risks.push(RiskFactor::NoContactOver30Days),
            _ => {}
        }

        if !contact.whatsapp_cadence_active {
            risks.push(RiskFactor::WhatsappCadenceInactive);
        }

        if deal.stage == DealStage::ContractSent
            && deal.first_deposit_date.is_none()
            && days_in_current_stage > DEPOSIT_OVERDUE_DAYS
        {
            risks.push(RiskFactor::DepositPendingOver14Days);
        }

        if deal.stage == DealStage::ClosedWon && !deal.allocation_done {
            risks.push(RiskFactor::AllocationPending);
        }

        if deal.stage == DealStage::ClosedWon
            && contact.lifecycle_stage != Some(LifecycleStage::Customer)
        {
            risks.push(RiskFactor::LifecycleStageOutdated);
        }

        if deal.amount.unwrap_or(0.0) > VERY_HIGH_VALUE_AMOUNT
            && matches!(days_since_last_meeting, Some(d) if d > 21)
        {
            risks.push(RiskFactor::HighValueWithoutRecentContact);
        }

        if matches!(
            contact.lead_status,
            Some(LeadStatus::BadTiming | LeadStatus::Unqualified)
        ) {
            risks.push(RiskFactor::NegativeLeadStatus);
        }

        risks
    }

    /// Stage-specific block first, then cross-cutting signals, truncated to
    /// the cap in generation order.
    fn next_actions(
        &self,
        deal: &Deal,
        contact: &Contact,
        days_since_last_meeting: Option<i64>,
    ) -> Vec<NextAction> {
        let mut actions = Vec::new();

        match deal.stage {
            DealStage::AppointmentScheduled => {
                actions.push(NextAction::ConfirmAppointment);
                actions.push(NextAction::PreparePresentation);
            }
            DealStage::PresentationScheduled => {
                if deal.proposal_sent {
                    actions.push(NextAction::FollowUpProposal);
                } else {
                    actions.push(NextAction::SendProposal);
                }
            }
            DealStage::ContractSent => {
                if deal.first_deposit_date.is_none() {
                    actions.push(NextAction::FollowUpContract);
                    actions.push(NextAction::ConfirmFirstDeposit);
                } else {
                    actions.push(NextAction::CompleteAllocation);
                }
            }
            DealStage::ClosedWon => {
                if deal.allocation_done {
                    actions.push(NextAction::ScheduleFollowUpMeeting);
                    actions.push(NextAction::ActivateRelationshipCadence);
                } else {
                    actions.push(NextAction::CompleteAllocation);
                }
            }
            DealStage::DecisionMakerBoughtIn | DealStage::ClosedLost => {}
        }

        match days_since_last_meeting {
            Some(d) if d > 30 => actions.push(NextAction::ScheduleUrgentMeeting),
            Some(d) if d > 14 => actions.push(NextAction::MakePhoneContact),
            _ => {}
        }

        if !contact.whatsapp_cadence_active {
            actions.push(NextAction::ReactivateWhatsappCadence);
        }

        if deal.stage == DealStage::ClosedWon
            && contact.lifecycle_stage != Some(LifecycleStage::Customer)
        {
            actions.push(NextAction::UpdateLifecycleStage);
        }

        if deal.stage == DealStage::ClosedWon && deal.allocation_done {
            actions.push(NextAction::ReviewPortfolioPerformance);
            actions.push(NextAction::IdentifyUpsellOpportunities);
        }

        actions.truncate(MAX_NEXT_ACTIONS);
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 10, 12, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> DateTime<Utc> {
        test_now() - Duration::days(days)
    }

    fn make_deal(stage: DealStage) -> Deal {
        Deal {
            id: "deal-1".to_string(),
            name: "Test Deal".to_string(),
            amount: Some(50_000.0),
            stage,
            pipeline: "default".to_string(),
            proposal_sent: false,
            first_deposit_date: None,
            allocation_done: false,
            owner_id: Some("12345".to_string()),
            created_at: days_ago(120),
            last_modified: days_ago(3),
        }
    }

    fn make_contact() -> Contact {
        Contact {
            id: "contact-1".to_string(),
            first_name: "Maria".to_string(),
            last_name: "Silva".to_string(),
            email: "maria@example.com".to_string(),
            company: Some("Silva Investimentos".to_string()),
            whatsapp_cadence_active: false,
            last_meeting_date: None,
            lead_status: Some(LeadStatus::Connected),
            lifecycle_stage: Some(LifecycleStage::Customer),
            created_at: days_ago(300),
            last_modified: days_ago(3),
        }
    }

    #[test]
    fn classification_is_deterministic() {
        let engine = JourneyEngine::new();
        let mut deal = make_deal(DealStage::ClosedWon);
        deal.first_deposit_date = Some(days_ago(20));
        let mut contact = make_contact();
        contact.whatsapp_cadence_active = true;
        contact.last_meeting_date = Some(days_ago(10));

        let a = engine.classify(&deal, &contact, test_now());
        let b = engine.classify(&deal, &contact, test_now());
        assert_eq!(a, b);
        assert_eq!(
            engine.health_score(&deal, &contact, &a),
            engine.health_score(&deal, &contact, &b)
        );
    }

    #[test]
    fn active_relationship_supersedes_onboarding() {
        // Scenario A: satisfies both the relacionamento and onboarding
        // predicates; rule order must pick relacionamento.
        let engine = JourneyEngine::new();
        let mut deal = make_deal(DealStage::ClosedWon);
        deal.first_deposit_date = Some(days_ago(30));
        deal.allocation_done = true;
        let mut contact = make_contact();
        contact.whatsapp_cadence_active = true;
        contact.last_meeting_date = Some(days_ago(5));

        let position = engine.classify(&deal, &contact, test_now());
        assert_eq!(position.stage, Stage::Relacionamento);
        assert_eq!(position.sub_stage, SubStage::ReuniaoRecente);
    }

    #[test]
    fn onboarding_with_deposit_and_inactive_cadence() {
        // Scenario B.
        let engine = JourneyEngine::new();
        let mut deal = make_deal(DealStage::ContractSent);
        deal.first_deposit_date = Some(days_ago(10));
        let contact = make_contact();

        let position = engine.classify(&deal, &contact, test_now());
        assert_eq!(position.stage, Stage::Onboarding);
        assert_eq!(position.sub_stage, SubStage::DepositoRealizado);
        assert!(position
            .metadata
            .risk_factors
            .contains(&RiskFactor::WhatsappCadenceInactive));
    }

    #[test]
    fn stale_prospect_with_proposal_is_high_priority() {
        // Scenario C: proposal sent would be medium, but the active risk
        // factors promote it to high.
        let engine = JourneyEngine::new();
        let mut deal = make_deal(DealStage::PresentationScheduled);
        deal.proposal_sent = true;
        let mut contact = make_contact();
        contact.last_meeting_date = Some(days_ago(40));

        let position = engine.classify(&deal, &contact, test_now());
        assert_eq!(position.stage, Stage::Prospeccao);
        assert_eq!(position.sub_stage, SubStage::PropostaEnviada);
        assert_eq!(
            position.metadata.risk_factors,
            vec![
                RiskFactor::NoContactOver30Days,
                RiskFactor::WhatsappCadenceInactive
            ]
        );
        assert_eq!(position.priority, Priority::High);
    }

    #[test]
    fn proposal_sent_without_risks_is_medium_priority() {
        let engine = JourneyEngine::new();
        let mut deal = make_deal(DealStage::PresentationScheduled);
        deal.proposal_sent = true;
        let mut contact = make_contact();
        contact.whatsapp_cadence_active = true;

        let position = engine.classify(&deal, &contact, test_now());
        assert_eq!(position.stage, Stage::Prospeccao);
        assert!(position.metadata.risk_factors.is_empty());
        assert_eq!(position.priority, Priority::Medium);
    }

    #[test]
    fn fallback_classification() {
        // Scenario D: no predicate matches. Stage, sub-stage, confidence,
        // and priority are all pinned even though a risk factor fires.
        let engine = JourneyEngine::new();
        let deal = make_deal(DealStage::DecisionMakerBoughtIn);
        let contact = make_contact();

        let position = engine.classify(&deal, &contact, test_now());
        assert_eq!(position.stage, Stage::Prospeccao);
        assert_eq!(position.sub_stage, SubStage::PropostaPendente);
        assert!((position.confidence - 0.5).abs() < 1e-9);
        assert_eq!(position.priority, Priority::Low);
        assert!(position
            .metadata
            .risk_factors
            .contains(&RiskFactor::WhatsappCadenceInactive));
    }

    #[test]
    fn fallback_ignores_proposal_flag_for_sub_stage() {
        let engine = JourneyEngine::new();
        let mut deal = make_deal(DealStage::DecisionMakerBoughtIn);
        deal.proposal_sent = true;
        let contact = make_contact();

        let position = engine.classify(&deal, &contact, test_now());
        assert_eq!(position.sub_stage, SubStage::PropostaPendente);
    }

    #[test]
    fn relacionamento_sub_stage_windows() {
        let engine = JourneyEngine::new();
        let deal = make_deal(DealStage::ClosedWon);
        let mut contact = make_contact();
        contact.whatsapp_cadence_active = true;

        for (days, expected) in [
            (7, SubStage::ReuniaoRecente),
            (8, SubStage::CadenciaAtiva),
            (30, SubStage::CadenciaAtiva),
            (31, SubStage::SeguimentoNecessario),
            (90, SubStage::SeguimentoNecessario),
        ] {
            contact.last_meeting_date = Some(days_ago(days));
            let position = engine.classify(&deal, &contact, test_now());
            assert_eq!(position.stage, Stage::Relacionamento, "at {days} days");
            assert_eq!(position.sub_stage, expected, "at {days} days");
        }

        // Past the window the relacionamento predicate no longer holds.
        contact.last_meeting_date = Some(days_ago(91));
        let position = engine.classify(&deal, &contact, test_now());
        assert_ne!(position.stage, Stage::Relacionamento);
    }

    #[test]
    fn onboarding_allocation_sub_stages() {
        let engine = JourneyEngine::new();
        let contact = make_contact();

        let mut deal = make_deal(DealStage::ClosedWon);
        deal.first_deposit_date = Some(days_ago(15));
        let position = engine.classify(&deal, &contact, test_now());
        assert_eq!(position.sub_stage, SubStage::AlocacaoPendente);

        deal.allocation_done = true;
        let position = engine.classify(&deal, &contact, test_now());
        assert_eq!(position.sub_stage, SubStage::AlocacaoFeita);
    }

    #[test]
    fn no_contact_thresholds_are_mutually_exclusive() {
        let engine = JourneyEngine::new();
        let deal = make_deal(DealStage::PresentationScheduled);
        let mut contact = make_contact();
        contact.last_meeting_date = Some(days_ago(70));

        let position = engine.classify(&deal, &contact, test_now());
        assert!(position
            .metadata
            .risk_factors
            .contains(&RiskFactor::NoContactOver60Days));
        assert!(!position
            .metadata
            .risk_factors
            .contains(&RiskFactor::NoContactOver30Days));
    }

    #[test]
    fn overdue_contract_and_negative_lead_status_risks() {
        let engine = JourneyEngine::new();
        let mut deal = make_deal(DealStage::ContractSent);
        deal.last_modified = days_ago(20);
        let mut contact = make_contact();
        contact.lead_status = Some(LeadStatus::BadTiming);

        let position = engine.classify(&deal, &contact, test_now());
        assert!(position
            .metadata
            .risk_factors
            .contains(&RiskFactor::DepositPendingOver14Days));
        assert!(position
            .metadata
            .risk_factors
            .contains(&RiskFactor::NegativeLeadStatus));
    }

    #[test]
    fn high_value_stale_relationship_risk() {
        let engine = JourneyEngine::new();
        let mut deal = make_deal(DealStage::PresentationScheduled);
        deal.amount = Some(450_000.0);
        let mut contact = make_contact();
        contact.whatsapp_cadence_active = true;
        contact.last_meeting_date = Some(days_ago(25));

        let position = engine.classify(&deal, &contact, test_now());
        assert!(position
            .metadata
            .risk_factors
            .contains(&RiskFactor::HighValueWithoutRecentContact));
    }

    #[test]
    fn onboarding_without_allocation_and_no_risks_is_high_priority() {
        let engine = JourneyEngine::new();
        let mut deal = make_deal(DealStage::ContractSent);
        deal.first_deposit_date = Some(days_ago(5));
        let mut contact = make_contact();
        contact.whatsapp_cadence_active = true; // no meeting on file

        let position = engine.classify(&deal, &contact, test_now());
        assert_eq!(position.stage, Stage::Onboarding);
        assert!(position.metadata.risk_factors.is_empty());
        assert_eq!(position.priority, Priority::High);
    }

    #[test]
    fn large_amount_without_risks_is_high_priority() {
        let engine = JourneyEngine::new();
        let mut deal = make_deal(DealStage::AppointmentScheduled);
        deal.amount = Some(250_000.0);
        let mut contact = make_contact();
        contact.whatsapp_cadence_active = true;
        contact.last_meeting_date = Some(days_ago(10));

        let position = engine.classify(&deal, &contact, test_now());
        assert_eq!(position.stage, Stage::Relacionamento);
        assert!(position.metadata.risk_factors.is_empty());
        assert_eq!(position.priority, Priority::High);
    }

    #[test]
    fn next_actions_are_capped_at_five_in_generation_order() {
        let engine = JourneyEngine::new();
        let mut deal = make_deal(DealStage::ClosedWon);
        deal.allocation_done = true;
        deal.first_deposit_date = Some(days_ago(60));
        let mut contact = make_contact();
        contact.lifecycle_stage = Some(LifecycleStage::Opportunity);
        contact.last_meeting_date = Some(days_ago(40));

        // Seven candidate actions; only the first five survive.
        let position = engine.classify(&deal, &contact, test_now());
        assert_eq!(
            position.metadata.next_actions,
            vec![
                NextAction::ScheduleFollowUpMeeting,
                NextAction::ActivateRelationshipCadence,
                NextAction::ScheduleUrgentMeeting,
                NextAction::ReactivateWhatsappCadence,
                NextAction::UpdateLifecycleStage,
            ]
        );
    }

    #[test]
    fn phone_contact_suggested_between_14_and_30_days() {
        let engine = JourneyEngine::new();
        let deal = make_deal(DealStage::AppointmentScheduled);
        let mut contact = make_contact();
        contact.whatsapp_cadence_active = true;
        contact.last_meeting_date = Some(days_ago(20));

        let position = engine.classify(&deal, &contact, test_now());
        assert!(position
            .metadata
            .next_actions
            .contains(&NextAction::MakePhoneContact));
        assert!(!position
            .metadata
            .next_actions
            .contains(&NextAction::ScheduleUrgentMeeting));
    }

    #[test]
    fn confidence_stays_within_bounds() {
        let engine = JourneyEngine::new();
        let stages = [
            DealStage::AppointmentScheduled,
            DealStage::PresentationScheduled,
            DealStage::DecisionMakerBoughtIn,
            DealStage::ContractSent,
            DealStage::ClosedWon,
            DealStage::ClosedLost,
        ];
        for stage in stages {
            for meeting_days in [None, Some(3), Some(35), Some(75), Some(120)] {
                for cadence in [true, false] {
                    let mut deal = make_deal(stage);
                    deal.first_deposit_date = Some(days_ago(30));
                    let mut contact = make_contact();
                    contact.whatsapp_cadence_active = cadence;
                    contact.last_meeting_date = meeting_days.map(days_ago);
                    contact.lead_status = None;
                    contact.lifecycle_stage = None;

                    let position = engine.classify(&deal, &contact, test_now());
                    assert!(
                        (0.5..=1.0).contains(&position.confidence),
                        "confidence {} out of bounds for {stage:?}/{meeting_days:?}",
                        position.confidence
                    );
                }
            }
        }
    }

    #[test]
    fn inactivity_erodes_confidence() {
        let engine = JourneyEngine::new();
        let deal = make_deal(DealStage::ClosedWon);
        let mut contact = make_contact();
        contact.whatsapp_cadence_active = true;

        contact.last_meeting_date = Some(days_ago(10));
        let fresh = engine.classify(&deal, &contact, test_now());

        contact.last_meeting_date = Some(days_ago(75));
        let stale = engine.classify(&deal, &contact, test_now());

        assert!(stale.confidence < fresh.confidence);
    }

    #[test]
    fn health_score_stays_within_bounds() {
        let engine = JourneyEngine::new();

        // Worst case: fallback stage, every penalty active.
        let mut deal = make_deal(DealStage::ClosedLost);
        deal.amount = Some(400_000.0);
        let mut contact = make_contact();
        contact.last_meeting_date = Some(days_ago(200));
        contact.lead_status = Some(LeadStatus::Unqualified);
        contact.lifecycle_stage = None;
        let position = engine.classify(&deal, &contact, test_now());
        let low = engine.health_score(&deal, &contact, &position);
        assert!(low <= 100);

        // Best case: thriving relationship.
        let mut deal = make_deal(DealStage::ClosedWon);
        deal.proposal_sent = true;
        deal.allocation_done = true;
        deal.first_deposit_date = Some(days_ago(30));
        let mut contact = make_contact();
        contact.whatsapp_cadence_active = true;
        contact.last_meeting_date = Some(days_ago(2));
        let position = engine.classify(&deal, &contact, test_now());
        let high = engine.health_score(&deal, &contact, &position);
        assert!(high <= 100);
        assert!(high > low);
    }

    #[test]
    fn future_last_modified_clamps_days_in_stage_to_zero() {
        let engine = JourneyEngine::new();
        let mut deal = make_deal(DealStage::AppointmentScheduled);
        deal.last_modified = test_now() + Duration::days(2);
        let contact = make_contact();

        let position = engine.classify(&deal, &contact, test_now());
        assert_eq!(position.days_in_current_stage, 0);
    }
}
