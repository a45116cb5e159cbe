//! OpenAPI specification for the Client Pulse API.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Client Pulse API",
        version = "0.1.0",
        description = "Client journey classification and relationship health scoring.\n\nMaps CRM deal/contact pairs onto a three-stage journey (prospecção, onboarding, relacionamento) and serves board and analytics views.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Journey", description = "Journey classification, listing, board, and analytics"),
        (name = "Operations", description = "Health, readiness, and liveness probes"),
    ),
    paths(
        // Journey
        crate::journey_rest::handle_get_journey,
        crate::journey_rest::handle_list_journeys,
        crate::journey_rest::handle_analytics,
        crate::journey_rest::handle_board,
        // Operations
        crate::rest::health_check,
        crate::rest::readiness,
        crate::rest::liveness,
    ),
    components(schemas(
        // CRM record types
        pulse_core::crm::Deal,
        pulse_core::crm::Contact,
        pulse_core::crm::DealStage,
        pulse_core::crm::LeadStatus,
        pulse_core::crm::LifecycleStage,
        // Journey types
        pulse_journey::types::Stage,
        pulse_journey::types::SubStage,
        pulse_journey::types::Priority,
        pulse_journey::types::RiskFactor,
        pulse_journey::types::NextAction,
        pulse_journey::types::PositionMetadata,
        pulse_journey::types::JourneyPosition,
        pulse_journey::types::ClientJourney,
        // Analytics types
        pulse_analytics::summary::JourneyAnalytics,
        pulse_analytics::summary::Summary,
        pulse_analytics::summary::StageBreakdown,
        pulse_analytics::summary::PriorityDistribution,
        pulse_analytics::summary::HealthDistribution,
        pulse_analytics::summary::RiskOverview,
        pulse_analytics::summary::RiskFrequency,
        pulse_analytics::summary::HighRiskClient,
        pulse_analytics::summary::ConversionRates,
        pulse_analytics::summary::StageDuration,
        pulse_analytics::board::BoardView,
        pulse_analytics::board::BoardColumn,
        pulse_analytics::board::BoardCard,
        // REST envelope types
        crate::rest::ErrorResponse,
        crate::rest::HealthResponse,
        crate::journey_rest::JourneyResponse,
        crate::journey_rest::JourneyListResponse,
        crate::journey_rest::PageMeta,
        crate::journey_rest::SortField,
        crate::journey_rest::SortOrder,
    ))
)]
pub struct ApiDoc;
