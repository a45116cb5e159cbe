//! Journey REST API endpoints — single lookup, filtered listing, analytics,
//! and the board view.

use std::cmp::Ordering;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::{IntoParams, ToSchema};

use pulse_analytics::{build_board, summarize, BoardView, JourneyAnalytics};
use pulse_core::crm::{Contact, Deal};
use pulse_journey::types::{ClientJourney, Priority, Stage};

use crate::rest::{AppState, ErrorResponse};

/// GET /v1/journey/{deal_id} response envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JourneyResponse {
    pub success: bool,
    pub data: ClientJourney,
    pub timestamp: DateTime<Utc>,
}

/// GET /v1/journey response envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct JourneyListResponse {
    pub success: bool,
    pub data: Vec<ClientJourney>,
    pub meta: PageMeta,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedDate,
    Amount,
    HealthScore,
    Stage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Query parameters for the listing endpoint. Filters apply first, then
/// sorting, then paging.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct JourneyListQuery {
    pub stage: Option<Stage>,
    pub priority: Option<Priority>,
    pub health_score_min: Option<u8>,
    pub health_score_max: Option<u8>,
    pub sort: Option<SortField>,
    pub order: Option<SortOrder>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Per-request integrity check on the raw records. These are simple
/// field-presence checks; structural parsing already happened at the store
/// boundary.
fn validate_records(deal: &Deal, contact: &Contact) -> Result<(), &'static str> {
    if deal.name.is_empty() {
        return Err("deal name is missing");
    }
    if contact.email.is_empty() {
        return Err("contact email is missing");
    }
    if deal.amount.is_some_and(|a| a < 0.0) {
        return Err("deal amount is negative");
    }
    Ok(())
}

/// Assemble the externally-visible envelope for one deal/contact pair.
fn build_envelope(
    state: &AppState,
    deal: Deal,
    contact: Contact,
    now: DateTime<Utc>,
) -> ClientJourney {
    let position = state.engine.classify(&deal, &contact, now);
    let health_score = state.engine.health_score(&deal, &contact, &position);
    let owner_name = state.store.owner_name(deal.owner_id.as_deref());
    ClientJourney {
        contact_id: contact.id.clone(),
        deal_id: deal.id.clone(),
        journey_position: position,
        health_score,
        last_activity: deal.last_modified,
        owner_name,
        contact,
        deal,
    }
}

/// GET /v1/journey/{deal_id} — Journey position for a specific deal.
#[utoipa::path(
    get,
    path = "/v1/journey/{deal_id}",
    tag = "Journey",
    params(
        ("deal_id" = String, Path, description = "CRM deal identifier"),
    ),
    responses(
        (status = 200, description = "Journey position computed", body = JourneyResponse),
        (status = 400, description = "Blank deal id", body = ErrorResponse),
        (status = 404, description = "Deal, association, or contact missing", body = ErrorResponse),
        (status = 422, description = "Records failed integrity checks", body = ErrorResponse),
    )
)]
pub async fn handle_get_journey(
    State(state): State<AppState>,
    Path(deal_id): Path<String>,
) -> Result<Json<JourneyResponse>, (StatusCode, Json<ErrorResponse>)> {
    if deal_id.trim().is_empty() {
        metrics::counter!("journey.api.validation_errors").increment(1);
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(
                "invalid_deal_id",
                "deal id must be a non-empty string",
            )),
        ));
    }

    let Some((deal, contact)) = state.store.deal_with_contact(deal_id.trim()) else {
        metrics::counter!("journey.api.not_found").increment(1);
        return Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(
                "deal_not_found",
                format!("deal {deal_id} not found"),
            )),
        ));
    };

    if let Err(msg) = validate_records(&deal, &contact) {
        warn!(deal_id = %deal.id, error = msg, "Record integrity check failed");
        metrics::counter!("journey.api.validation_errors").increment(1);
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorResponse::new("validation_failed", msg)),
        ));
    }

    metrics::counter!("journey.api.requests").increment(1);
    let now = Utc::now();
    Ok(Json(JourneyResponse {
        success: true,
        data: build_envelope(&state, deal, contact, now),
        timestamp: now,
    }))
}

/// GET /v1/journey — All clients with their journey positions.
#[utoipa::path(
    get,
    path = "/v1/journey",
    tag = "Journey",
    params(JourneyListQuery),
    responses(
        (status = 200, description = "Filtered, sorted, paged journey list", body = JourneyListResponse),
    )
)]
pub async fn handle_list_journeys(
    State(state): State<AppState>,
    Query(query): Query<JourneyListQuery>,
) -> Json<JourneyListResponse> {
    metrics::counter!("journey.api.list_requests").increment(1);
    let now = Utc::now();

    let mut clients: Vec<ClientJourney> = state
        .store
        .all_deals_with_contacts()
        .into_iter()
        .map(|(deal, contact)| build_envelope(&state, deal, contact, now))
        .collect();

    if let Some(stage) = query.stage {
        clients.retain(|c| c.journey_position.stage == stage);
    }
    if let Some(priority) = query.priority {
        clients.retain(|c| c.journey_position.priority == priority);
    }
    if let Some(min) = query.health_score_min {
        clients.retain(|c| c.health_score >= min);
    }
    if let Some(max) = query.health_score_max {
        clients.retain(|c| c.health_score <= max);
    }

    let sort = query.sort.unwrap_or(SortField::CreatedDate);
    let order = query.order.unwrap_or(SortOrder::Desc);
    clients.sort_by(|a, b| {
        let ordering = match sort {
            SortField::Amount => a
                .deal
                .amount
                .unwrap_or(0.0)
                .partial_cmp(&b.deal.amount.unwrap_or(0.0))
                .unwrap_or(Ordering::Equal),
            SortField::HealthScore => a.health_score.cmp(&b.health_score),
            // Stage sorts by serialized name, string order.
            SortField::Stage => a
                .journey_position
                .stage
                .as_str()
                .cmp(b.journey_position.stage.as_str()),
            SortField::CreatedDate => a.deal.created_at.cmp(&b.deal.created_at),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    let limit = query
        .limit
        .unwrap_or(state.default_page_size)
        .clamp(1, state.max_page_size);
    let offset = query.offset.unwrap_or(0);
    let total = clients.len();
    let data: Vec<ClientJourney> = clients.into_iter().skip(offset).take(limit).collect();

    Json(JourneyListResponse {
        success: true,
        data,
        meta: PageMeta {
            total,
            page: offset / limit + 1,
            limit,
        },
        timestamp: now,
    })
}

/// GET /v1/journey/analytics — Aggregate analytics over all clients.
#[utoipa::path(
    get,
    path = "/v1/journey/analytics",
    tag = "Journey",
    responses(
        (status = 200, description = "Aggregate journey analytics", body = JourneyAnalytics),
    )
)]
pub async fn handle_analytics(State(state): State<AppState>) -> Json<JourneyAnalytics> {
    metrics::counter!("journey.api.analytics_requests").increment(1);
    let now = Utc::now();
    let clients: Vec<ClientJourney> = state
        .store
        .all_deals_with_contacts()
        .into_iter()
        .map(|(deal, contact)| build_envelope(&state, deal, contact, now))
        .collect();
    Json(summarize(&clients, now))
}

/// GET /v1/journey/board — Stage-column view backing the journey board.
#[utoipa::path(
    get,
    path = "/v1/journey/board",
    tag = "Journey",
    responses(
        (status = 200, description = "Board columns grouped by stage", body = BoardView),
    )
)]
pub async fn handle_board(State(state): State<AppState>) -> Json<BoardView> {
    metrics::counter!("journey.api.board_requests").increment(1);
    let now = Utc::now();
    let clients: Vec<ClientJourney> = state
        .store
        .all_deals_with_contacts()
        .into_iter()
        .map(|(deal, contact)| build_envelope(&state, deal, contact, now))
        .collect();
    Json(build_board(&clients))
}
