//! Sample dataset — eight Brazilian investment-advisory clients covering
//! every journey stage, the fallback branch, and a spread of risk profiles.
//! All timestamps are expressed relative to the supplied `now`.

use chrono::{DateTime, Duration, Utc};

use pulse_core::crm::{RawContact, RawDeal};

/// Owner directory, as the CRM owners API would return it.
pub fn sample_owners() -> Vec<(&'static str, &'static str)> {
    vec![
        ("12345", "João Assessor"),
        ("12346", "Maria Assessora"),
        ("12347", "Carlos Assessor"),
        ("12348", "Ana Assessora"),
        ("12349", "Pedro Assessor"),
        ("12350", "Lucia Assessora"),
        ("12351", "Roberto Assessor"),
    ]
}

fn days_ago(now: DateTime<Utc>, days: i64) -> String {
    (now - Duration::days(days)).to_rfc3339()
}

/// Raw deal/contact pairs in CRM export shape: flags as strings, dates as
/// ISO-8601 text. Parsing happens at the store boundary.
pub fn sample_records(now: DateTime<Utc>) -> Vec<(RawDeal, RawContact)> {
    vec![
        // Established client, active cadence, recent meeting.
        (
            RawDeal {
                id: "1001".to_string(),
                dealname: "Silva Investimentos — Carteira Premium".to_string(),
                amount: Some("850000".to_string()),
                dealstage: "closed_won".to_string(),
                pipeline: Some("default".to_string()),
                proposal_sent: Some("true".to_string()),
                first_deposit_date: Some(days_ago(now, 30)),
                allocation_done: Some("true".to_string()),
                hubspot_owner_id: Some("12345".to_string()),
                createdate: days_ago(now, 300),
                hs_lastmodifieddate: days_ago(now, 3),
            },
            RawContact {
                id: "51".to_string(),
                firstname: "Maria".to_string(),
                lastname: "Silva".to_string(),
                email: "maria.silva@silvainvestimentos.com.br".to_string(),
                company: Some("Silva Investimentos Ltda".to_string()),
                whatsapp_cadence_active: Some("true".to_string()),
                last_meeting_date: Some(days_ago(now, 5)),
                hs_lead_status: Some("CONNECTED".to_string()),
                lifecyclestage: Some("customer".to_string()),
                createdate: days_ago(now, 300),
                lastmodifieddate: days_ago(now, 3),
            },
        ),
        // Deposit received but cadence never activated; meeting going stale.
        (
            RawDeal {
                id: "1002".to_string(),
                dealname: "Santos & Associados — Renda Fixa".to_string(),
                amount: Some("250000".to_string()),
                dealstage: "contract_sent".to_string(),
                pipeline: Some("default".to_string()),
                proposal_sent: Some("true".to_string()),
                first_deposit_date: Some(days_ago(now, 10)),
                allocation_done: Some("false".to_string()),
                hubspot_owner_id: Some("12346".to_string()),
                createdate: days_ago(now, 260),
                hs_lastmodifieddate: days_ago(now, 10),
            },
            RawContact {
                id: "52".to_string(),
                firstname: "João".to_string(),
                lastname: "Santos".to_string(),
                email: "joao.santos@santosassociados.com.br".to_string(),
                company: Some("Santos & Associados".to_string()),
                whatsapp_cadence_active: Some("false".to_string()),
                last_meeting_date: Some(days_ago(now, 55)),
                hs_lead_status: Some("OPEN_DEAL".to_string()),
                lifecyclestage: Some("opportunity".to_string()),
                createdate: days_ago(now, 260),
                lastmodifieddate: days_ago(now, 10),
            },
        ),
        // Engaged prospect with an open proposal and fresh meeting.
        (
            RawDeal {
                id: "1003".to_string(),
                dealname: "TechCorp — Tesouraria".to_string(),
                amount: Some("120000".to_string()),
                dealstage: "presentation_scheduled".to_string(),
                pipeline: Some("default".to_string()),
                proposal_sent: Some("true".to_string()),
                first_deposit_date: None,
                allocation_done: Some("false".to_string()),
                hubspot_owner_id: Some("12347".to_string()),
                createdate: days_ago(now, 240),
                hs_lastmodifieddate: days_ago(now, 1),
            },
            RawContact {
                id: "53".to_string(),
                firstname: "Ana".to_string(),
                lastname: "Costa".to_string(),
                email: "ana.costa@techcorp.io".to_string(),
                company: Some("TechCorp Startup".to_string()),
                whatsapp_cadence_active: Some("true".to_string()),
                last_meeting_date: Some(days_ago(now, 2)),
                hs_lead_status: Some("IN_PROGRESS".to_string()),
                lifecyclestage: Some("salesqualifiedlead".to_string()),
                createdate: days_ago(now, 240),
                lastmodifieddate: days_ago(now, 1),
            },
        ),
        // High-value deal parked outside every rule set — the safety net.
        (
            RawDeal {
                id: "1004".to_string(),
                dealname: "Oliveira Holdings — Multimercado".to_string(),
                amount: Some("500000".to_string()),
                dealstage: "decision_maker_bought_in".to_string(),
                pipeline: Some("default".to_string()),
                proposal_sent: Some("false".to_string()),
                first_deposit_date: None,
                allocation_done: Some("false".to_string()),
                hubspot_owner_id: Some("12348".to_string()),
                createdate: days_ago(now, 220),
                hs_lastmodifieddate: days_ago(now, 45),
            },
            RawContact {
                id: "54".to_string(),
                firstname: "Carlos".to_string(),
                lastname: "Oliveira".to_string(),
                email: "carlos.oliveira@oliveiraholdings.com".to_string(),
                company: Some("Oliveira Holdings".to_string()),
                whatsapp_cadence_active: Some("false".to_string()),
                last_meeting_date: Some(days_ago(now, 80)),
                hs_lead_status: Some("OPEN_DEAL".to_string()),
                lifecyclestage: Some("opportunity".to_string()),
                createdate: days_ago(now, 220),
                lastmodifieddate: days_ago(now, 45),
            },
        ),
        // Won deal stuck before allocation, lifecycle never updated.
        (
            RawDeal {
                id: "1005".to_string(),
                dealname: "Lima Consultoria — Previdência".to_string(),
                amount: Some("300000".to_string()),
                dealstage: "closed_won".to_string(),
                pipeline: Some("default".to_string()),
                proposal_sent: Some("true".to_string()),
                first_deposit_date: Some(days_ago(now, 20)),
                allocation_done: Some("false".to_string()),
                hubspot_owner_id: Some("12349".to_string()),
                createdate: days_ago(now, 180),
                hs_lastmodifieddate: days_ago(now, 8),
            },
            RawContact {
                id: "55".to_string(),
                firstname: "Patricia".to_string(),
                lastname: "Lima".to_string(),
                email: "patricia.lima@limaconsultoria.com.br".to_string(),
                company: Some("Lima Consultoria".to_string()),
                whatsapp_cadence_active: Some("false".to_string()),
                last_meeting_date: Some(days_ago(now, 35)),
                hs_lead_status: Some("CONNECTED".to_string()),
                lifecyclestage: Some("opportunity".to_string()),
                createdate: days_ago(now, 180),
                lastmodifieddate: days_ago(now, 8),
            },
        ),
        // Fresh prospect, first appointment booked, no meeting history yet.
        (
            RawDeal {
                id: "1006".to_string(),
                dealname: "Fernandes Tech — Reserva".to_string(),
                amount: Some("80000".to_string()),
                dealstage: "appointment_scheduled".to_string(),
                pipeline: Some("default".to_string()),
                proposal_sent: Some("false".to_string()),
                first_deposit_date: None,
                allocation_done: Some("false".to_string()),
                hubspot_owner_id: Some("12350".to_string()),
                createdate: days_ago(now, 150),
                hs_lastmodifieddate: days_ago(now, 2),
            },
            RawContact {
                id: "56".to_string(),
                firstname: "Roberto".to_string(),
                lastname: "Fernandes".to_string(),
                email: "roberto.fernandes@fernandestech.com".to_string(),
                company: Some("Fernandes Tech Solutions".to_string()),
                whatsapp_cadence_active: Some("true".to_string()),
                last_meeting_date: None,
                hs_lead_status: Some("IN_PROGRESS".to_string()),
                lifecyclestage: Some("salesqualifiedlead".to_string()),
                createdate: days_ago(now, 150),
                lastmodifieddate: days_ago(now, 2),
            },
        ),
        // Presentation scheduled, proposal still pending, cadence inactive.
        (
            RawDeal {
                id: "1007".to_string(),
                dealname: "Mendes Advocacia — Fundo Imobiliário".to_string(),
                amount: Some("150000".to_string()),
                dealstage: "presentation_scheduled".to_string(),
                pipeline: Some("default".to_string()),
                proposal_sent: Some("false".to_string()),
                first_deposit_date: None,
                allocation_done: Some("false".to_string()),
                hubspot_owner_id: Some("12351".to_string()),
                createdate: days_ago(now, 120),
                hs_lastmodifieddate: days_ago(now, 12),
            },
            RawContact {
                id: "57".to_string(),
                firstname: "Luciana".to_string(),
                lastname: "Mendes".to_string(),
                email: "luciana.mendes@mendeslaw.com.br".to_string(),
                company: Some("Mendes Advocacia".to_string()),
                whatsapp_cadence_active: Some("false".to_string()),
                last_meeting_date: Some(days_ago(now, 20)),
                hs_lead_status: Some("OPEN".to_string()),
                lifecyclestage: Some("lead".to_string()),
                createdate: days_ago(now, 120),
                lastmodifieddate: days_ago(now, 12),
            },
        ),
        // Active cadence but follow-up overdue; contract out with no deposit.
        (
            RawDeal {
                id: "1008".to_string(),
                dealname: "Almeida Capital — Offshore".to_string(),
                amount: Some("420000".to_string()),
                dealstage: "contract_sent".to_string(),
                pipeline: Some("default".to_string()),
                proposal_sent: Some("true".to_string()),
                first_deposit_date: None,
                allocation_done: Some("false".to_string()),
                hubspot_owner_id: Some("12345".to_string()),
                createdate: days_ago(now, 90),
                hs_lastmodifieddate: days_ago(now, 25),
            },
            RawContact {
                id: "58".to_string(),
                firstname: "Fernando".to_string(),
                lastname: "Almeida".to_string(),
                email: "fernando.almeida@almeidacapital.com.br".to_string(),
                company: Some("Almeida Capital".to_string()),
                whatsapp_cadence_active: Some("true".to_string()),
                last_meeting_date: Some(days_ago(now, 50)),
                hs_lead_status: Some("OPEN_DEAL".to_string()),
                lifecyclestage: Some("opportunity".to_string()),
                createdate: days_ago(now, 90),
                lastmodifieddate: days_ago(now, 25),
            },
        ),
    ]
}
