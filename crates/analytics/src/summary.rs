use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use pulse_core::crm::DealStage;
use pulse_journey::types::{ClientJourney, Priority, RiskFactor, Stage};

/// Full analytics document computed over one pass of journey envelopes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JourneyAnalytics {
    pub snapshot_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub summary: Summary,
    pub stage_distribution: Vec<StageBreakdown>,
    pub priority_distribution: PriorityDistribution,
    pub health_distribution: HealthDistribution,
    pub risk_overview: RiskOverview,
    pub conversion: ConversionRates,
    pub time_in_stage: Vec<StageDuration>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Summary {
    pub total_clients: usize,
    pub total_pipeline_value: f64,
    pub average_health_score: i64,
    pub average_deal_size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StageBreakdown {
    pub stage: Stage,
    pub count: usize,
    pub total_value: f64,
    pub average_health_score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PriorityDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Bucket thresholds: excellent ≥ 90, good ≥ 70, attention ≥ 50, the rest
/// critical.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthDistribution {
    pub excellent: usize,
    pub good: usize,
    pub attention: usize,
    pub critical: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RiskOverview {
    pub clients_at_risk: usize,
    pub common_risks: Vec<RiskFrequency>,
    pub high_risk_clients: Vec<HighRiskClient>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RiskFrequency {
    pub risk: RiskFactor,
    pub description: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HighRiskClient {
    pub deal_id: String,
    pub client_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub health_score: u8,
    pub risk_factors: Vec<RiskFactor>,
    pub stage: Stage,
}

/// Naive stage-population ratios, in whole percent.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversionRates {
    pub prospeccao_to_onboarding: i64,
    pub onboarding_to_relacionamento: i64,
    pub overall: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StageDuration {
    pub stage: Stage,
    pub average_days: i64,
}

/// How many of the top risk factors to surface.
const TOP_RISK_COUNT: usize = 5;

pub fn summarize(clients: &[ClientJourney], now: DateTime<Utc>) -> JourneyAnalytics {
    JourneyAnalytics {
        snapshot_id: Uuid::new_v4(),
        generated_at: now,
        summary: build_summary(clients),
        stage_distribution: Stage::all()
            .into_iter()
            .map(|stage| stage_breakdown(clients, stage))
            .collect(),
        priority_distribution: priority_distribution(clients),
        health_distribution: health_distribution(clients),
        risk_overview: risk_overview(clients),
        conversion: conversion_rates(clients),
        time_in_stage: Stage::all()
            .into_iter()
            .map(|stage| StageDuration {
                stage,
                average_days: average_days_in_stage(clients, stage),
            })
            .collect(),
    }
}

fn amount_of(client: &ClientJourney) -> f64 {
    client.deal.amount.unwrap_or(0.0)
}

fn build_summary(clients: &[ClientJourney]) -> Summary {
    let total = clients.len();
    let total_value: f64 = clients.iter().map(amount_of).sum();
    let total_health: i64 = clients.iter().map(|c| c.health_score as i64).sum();
    Summary {
        total_clients: total,
        total_pipeline_value: total_value,
        average_health_score: if total > 0 {
            (total_health as f64 / total as f64).round() as i64
        } else {
            0
        },
        average_deal_size: if total > 0 {
            (total_value / total as f64).round() as i64
        } else {
            0
        },
    }
}

fn stage_breakdown(clients: &[ClientJourney], stage: Stage) -> StageBreakdown {
    let in_stage: Vec<&ClientJourney> = clients
        .iter()
        .filter(|c| c.journey_position.stage == stage)
        .collect();
    let total_value: f64 = in_stage.iter().map(|c| amount_of(c)).sum();
    let total_health: i64 = in_stage.iter().map(|c| c.health_score as i64).sum();
    StageBreakdown {
        stage,
        count: in_stage.len(),
        total_value,
        average_health_score: (total_health as f64 / in_stage.len().max(1) as f64).round()
            as i64,
    }
}

fn priority_distribution(clients: &[ClientJourney]) -> PriorityDistribution {
    let count = |p: Priority| {
        clients
            .iter()
            .filter(|c| c.journey_position.priority == p)
            .count()
    };
    PriorityDistribution {
        high: count(Priority::High),
        medium: count(Priority::Medium),
        low: count(Priority::Low),
    }
}

fn health_distribution(clients: &[ClientJourney]) -> HealthDistribution {
    let count = |lo: u8, hi: u8| {
        clients
            .iter()
            .filter(|c| c.health_score >= lo && c.health_score <= hi)
            .count()
    };
    HealthDistribution {
        excellent: count(90, 100),
        good: count(70, 89),
        attention: count(50, 69),
        critical: count(0, 49),
    }
}

fn risk_overview(clients: &[ClientJourney]) -> RiskOverview {
    let mut counts: HashMap<RiskFactor, usize> = HashMap::new();
    for client in clients {
        for risk in &client.journey_position.metadata.risk_factors {
            *counts.entry(*risk).or_insert(0) += 1;
        }
    }

    let mut common_risks: Vec<(RiskFactor, usize)> = counts.into_iter().collect();
    // Descending by frequency; enum order breaks ties deterministically.
    common_risks.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    common_risks.truncate(TOP_RISK_COUNT);

    let high_risk_clients = clients
        .iter()
        .filter(|c| c.journey_position.metadata.risk_factors.len() > 1 || c.health_score < 50)
        .map(|c| HighRiskClient {
            deal_id: c.deal_id.clone(),
            client_name: c.contact.full_name(),
            company: c.contact.company.clone(),
            health_score: c.health_score,
            risk_factors: c.journey_position.metadata.risk_factors.clone(),
            stage: c.journey_position.stage,
        })
        .collect();

    RiskOverview {
        clients_at_risk: clients
            .iter()
            .filter(|c| !c.journey_position.metadata.risk_factors.is_empty())
            .count(),
        common_risks: common_risks
            .into_iter()
            .map(|(risk, count)| RiskFrequency {
                risk,
                description: risk.description().to_string(),
                count,
            })
            .collect(),
        high_risk_clients,
    }
}

fn stage_count(clients: &[ClientJourney], stage: Stage) -> usize {
    clients
        .iter()
        .filter(|c| c.journey_position.stage == stage)
        .count()
}

/// `round(to / (from + to) * 100)`; 0 when the source stage is empty.
fn conversion_rate(clients: &[ClientJourney], from: Stage, to: Stage) -> i64 {
    let from_count = stage_count(clients, from);
    let to_count = stage_count(clients, to);
    if from_count == 0 {
        return 0;
    }
    (to_count as f64 / (from_count + to_count) as f64 * 100.0).round() as i64
}

fn conversion_rates(clients: &[ClientJourney]) -> ConversionRates {
    let total = clients.len();
    let converted = clients
        .iter()
        .filter(|c| {
            c.journey_position.stage == Stage::Relacionamento
                || c.deal.stage == DealStage::ClosedWon
        })
        .count();
    ConversionRates {
        prospeccao_to_onboarding: conversion_rate(clients, Stage::Prospeccao, Stage::Onboarding),
        onboarding_to_relacionamento: conversion_rate(
            clients,
            Stage::Onboarding,
            Stage::Relacionamento,
        ),
        overall: if total > 0 {
            (converted as f64 / total as f64 * 100.0).round() as i64
        } else {
            0
        },
    }
}

fn average_days_in_stage(clients: &[ClientJourney], stage: Stage) -> i64 {
    let in_stage: Vec<&ClientJourney> = clients
        .iter()
        .filter(|c| c.journey_position.stage == stage)
        .collect();
    if in_stage.is_empty() {
        return 0;
    }
    let total: i64 = in_stage
        .iter()
        .map(|c| c.journey_position.days_in_current_stage)
        .sum();
    (total as f64 / in_stage.len() as f64).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::test_support::make_client;
    use chrono::TimeZone;
    use pulse_journey::types::SubStage;

    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 11, 10, 12, 0, 0).unwrap()
    }

    fn sample_clients() -> Vec<ClientJourney> {
        vec![
            make_client(
                "1001",
                Stage::Relacionamento,
                SubStage::ReuniaoRecente,
                Priority::Low,
                95,
                vec![],
                4,
                Some(850_000.0),
                DealStage::ClosedWon,
            ),
            make_client(
                "1002",
                Stage::Onboarding,
                SubStage::DepositoRealizado,
                Priority::High,
                62,
                vec![
                    RiskFactor::NoContactOver30Days,
                    RiskFactor::WhatsappCadenceInactive,
                ],
                10,
                Some(250_000.0),
                DealStage::ContractSent,
            ),
            make_client(
                "1003",
                Stage::Prospeccao,
                SubStage::PropostaEnviada,
                Priority::Medium,
                78,
                vec![],
                6,
                Some(120_000.0),
                DealStage::PresentationScheduled,
            ),
            make_client(
                "1004",
                Stage::Prospeccao,
                SubStage::PropostaPendente,
                Priority::Low,
                30,
                vec![
                    RiskFactor::NoContactOver60Days,
                    RiskFactor::WhatsappCadenceInactive,
                    RiskFactor::HighValueWithoutRecentContact,
                ],
                40,
                Some(500_000.0),
                DealStage::DecisionMakerBoughtIn,
            ),
        ]
    }

    #[test]
    fn summary_totals_and_averages() {
        let analytics = summarize(&sample_clients(), test_now());
        assert_eq!(analytics.summary.total_clients, 4);
        assert_eq!(analytics.summary.total_pipeline_value, 1_720_000.0);
        // (95 + 62 + 78 + 30) / 4 = 66.25 → 66
        assert_eq!(analytics.summary.average_health_score, 66);
        assert_eq!(analytics.summary.average_deal_size, 430_000);
    }

    #[test]
    fn stage_distribution_counts_and_values() {
        let analytics = summarize(&sample_clients(), test_now());
        let prospeccao = &analytics.stage_distribution[0];
        assert_eq!(prospeccao.stage, Stage::Prospeccao);
        assert_eq!(prospeccao.count, 2);
        assert_eq!(prospeccao.total_value, 620_000.0);
        // (78 + 30) / 2 = 54
        assert_eq!(prospeccao.average_health_score, 54);

        let onboarding = &analytics.stage_distribution[1];
        assert_eq!(onboarding.count, 1);
        assert_eq!(onboarding.average_health_score, 62);
    }

    #[test]
    fn empty_input_yields_zeroed_document() {
        let analytics = summarize(&[], test_now());
        assert_eq!(analytics.summary.total_clients, 0);
        assert_eq!(analytics.summary.average_health_score, 0);
        assert_eq!(analytics.conversion.overall, 0);
        assert!(analytics.risk_overview.common_risks.is_empty());
        for breakdown in &analytics.stage_distribution {
            assert_eq!(breakdown.count, 0);
            assert_eq!(breakdown.average_health_score, 0);
        }
    }

    #[test]
    fn health_buckets_split_at_thresholds() {
        let analytics = summarize(&sample_clients(), test_now());
        assert_eq!(analytics.health_distribution.excellent, 1); // 95
        assert_eq!(analytics.health_distribution.good, 1); // 78
        assert_eq!(analytics.health_distribution.attention, 1); // 62
        assert_eq!(analytics.health_distribution.critical, 1); // 30
    }

    #[test]
    fn top_risks_ordered_by_frequency() {
        let analytics = summarize(&sample_clients(), test_now());
        let risks = &analytics.risk_overview.common_risks;
        assert_eq!(risks[0].risk, RiskFactor::WhatsappCadenceInactive);
        assert_eq!(risks[0].count, 2);
        assert_eq!(risks[0].description, "WhatsApp cadence inactive");
        assert!(risks.len() <= 5);
        assert_eq!(analytics.risk_overview.clients_at_risk, 2);
    }

    #[test]
    fn high_risk_clients_require_multiple_risks_or_low_health() {
        let analytics = summarize(&sample_clients(), test_now());
        let ids: Vec<&str> = analytics
            .risk_overview
            .high_risk_clients
            .iter()
            .map(|c| c.deal_id.as_str())
            .collect();
        assert_eq!(ids, vec!["1002", "1004"]);
    }

    #[test]
    fn conversion_rates_follow_population_formula() {
        let analytics = summarize(&sample_clients(), test_now());
        // onboarding 1 / (prospeccao 2 + onboarding 1) = 33%
        assert_eq!(analytics.conversion.prospeccao_to_onboarding, 33);
        // relacionamento 1 / (onboarding 1 + relacionamento 1) = 50%
        assert_eq!(analytics.conversion.onboarding_to_relacionamento, 50);
        // converted: 1001 (relacionamento, also closed_won) = 1 of 4 → 25%
        assert_eq!(analytics.conversion.overall, 25);
    }

    #[test]
    fn average_days_in_stage_per_stage() {
        let analytics = summarize(&sample_clients(), test_now());
        let prospeccao = &analytics.time_in_stage[0];
        assert_eq!(prospeccao.stage, Stage::Prospeccao);
        // (6 + 40) / 2 = 23
        assert_eq!(prospeccao.average_days, 23);
        let relacionamento = &analytics.time_in_stage[2];
        assert_eq!(relacionamento.average_days, 4);
    }
}
