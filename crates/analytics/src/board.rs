use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use pulse_journey::types::{ClientJourney, Priority, Stage, SubStage};

/// Column-per-stage view backing the journey board UI.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BoardView {
    pub columns: Vec<BoardColumn>,
    pub total_clients: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BoardColumn {
    pub stage: Stage,
    pub display_name: String,
    pub count: usize,
    pub total_value: f64,
    pub clients: Vec<BoardCard>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BoardCard {
    pub deal_id: String,
    pub client_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub sub_stage: SubStage,
    pub sub_stage_display: String,
    pub progress_pct: u8,
    pub health_score: u8,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    pub owner_name: String,
}

/// Group envelopes into stage columns, preserving the caller's ordering
/// within each column.
pub fn build_board(clients: &[ClientJourney]) -> BoardView {
    let columns = Stage::all()
        .into_iter()
        .map(|stage| {
            let in_stage: Vec<&ClientJourney> = clients
                .iter()
                .filter(|c| c.journey_position.stage == stage)
                .collect();
            BoardColumn {
                stage,
                display_name: stage.display_name().to_string(),
                count: in_stage.len(),
                total_value: in_stage.iter().map(|c| c.deal.amount.unwrap_or(0.0)).sum(),
                clients: in_stage.iter().map(|c| card(c)).collect(),
            }
        })
        .collect();

    BoardView {
        columns,
        total_clients: clients.len(),
    }
}

fn card(client: &ClientJourney) -> BoardCard {
    let sub_stage = client.journey_position.sub_stage;
    BoardCard {
        deal_id: client.deal_id.clone(),
        client_name: client.contact.full_name(),
        company: client.contact.company.clone(),
        sub_stage,
        sub_stage_display: sub_stage.display_name().to_string(),
        progress_pct: sub_stage.progress_pct(),
        health_score: client.health_score,
        priority: client.journey_position.priority,
        amount: client.deal.amount,
        owner_name: client.owner_name.clone(),
    }
}
