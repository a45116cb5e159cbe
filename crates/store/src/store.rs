use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::info;

use pulse_core::crm::{Contact, Deal, RawContact, RawDeal};
use pulse_core::error::PulseResult;

use crate::sample;

/// Fallback owner name when a deal has no owner on file, matching the CRM
/// convention for unassigned advisors.
const UNASSIGNED_OWNER: &str = "Assessor Não Definido";

/// Read-mostly record store. Deals and contacts are keyed by their CRM ids;
/// the association map enforces the one-deal-to-one-contact model.
#[derive(Clone)]
pub struct RecordStore {
    deals: Arc<DashMap<String, Deal>>,
    contacts: Arc<DashMap<String, Contact>>,
    associations: Arc<DashMap<String, String>>,
    owners: Arc<DashMap<String, String>>,
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("deals", &self.deals.len())
            .field("contacts", &self.contacts.len())
            .finish()
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self {
            deals: Arc::new(DashMap::new()),
            contacts: Arc::new(DashMap::new()),
            associations: Arc::new(DashMap::new()),
            owners: Arc::new(DashMap::new()),
        }
    }

    /// Build a store seeded with the sample dataset. Sample timestamps are
    /// expressed relative to `now` so classifications stay stable on any
    /// day the service runs.
    pub fn with_sample_data(now: DateTime<Utc>) -> PulseResult<Self> {
        let store = Self::new();
        for (owner_id, name) in sample::sample_owners() {
            store.owners.insert(owner_id.to_string(), name.to_string());
        }
        for (raw_deal, raw_contact) in sample::sample_records(now) {
            store.insert(raw_deal, raw_contact)?;
        }
        info!(deals = store.deals.len(), "Record store seeded with sample data");
        Ok(store)
    }

    /// Parse and validate a raw deal/contact pair at the boundary, storing
    /// the typed records and their association.
    pub fn insert(&self, raw_deal: RawDeal, raw_contact: RawContact) -> PulseResult<()> {
        let deal = Deal::try_from(raw_deal)?;
        let contact = Contact::try_from(raw_contact)?;
        self.associations
            .insert(deal.id.clone(), contact.id.clone());
        self.contacts.insert(contact.id.clone(), contact);
        self.deals.insert(deal.id.clone(), deal);
        Ok(())
    }

    /// Look up a deal together with its associated contact. A missing deal,
    /// association, or contact all read as "not found".
    pub fn deal_with_contact(&self, deal_id: &str) -> Option<(Deal, Contact)> {
        let deal = self.deals.get(deal_id)?.clone();
        let contact_id = self.associations.get(deal_id)?.clone();
        let contact = self.contacts.get(&contact_id)?.clone();
        Some((deal, contact))
    }

    /// Every deal/contact pair, in deterministic order (sorted by deal id)
    /// so listings are stable across calls.
    pub fn all_deals_with_contacts(&self) -> Vec<(Deal, Contact)> {
        let mut deal_ids: Vec<String> = self.deals.iter().map(|r| r.key().clone()).collect();
        deal_ids.sort();
        deal_ids
            .iter()
            .filter_map(|id| self.deal_with_contact(id))
            .collect()
    }

    /// Resolve an owner id to the advisor's display name.
    pub fn owner_name(&self, owner_id: Option<&str>) -> String {
        owner_id
            .and_then(|id| self.owners.get(id).map(|r| r.clone()))
            .unwrap_or_else(|| UNASSIGNED_OWNER.to_string())
    }

    pub fn len(&self) -> usize {
        self.deals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deals.is_empty()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}
