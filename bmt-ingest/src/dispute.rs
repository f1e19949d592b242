//! Dispute processor: removes one existing record named by identifier

use crate::error::{IngestError, IngestResult};
use crate::fields::{self, IssueFields};
use crate::outcome::{AcceptedDispute, Outcome, ValidationErrors};
use bmt_common::normalize::slugify;
use bmt_common::{PlatformIds, StoreRepository};
use tracing::{info, warn};

pub struct DisputeProcessor<S> {
    store: S,
}

impl<S: StoreRepository> DisputeProcessor<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate the dispute and splice the matching record out of the store
    ///
    /// The first record matching either identifier is removed; the relative
    /// order of the remaining records is preserved.
    pub fn process(&self, issue: &IssueFields) -> IngestResult<Outcome<AcceptedDispute>> {
        let mut errors = ValidationErrors::new();

        let identity = issue.identity(&mut errors);
        if issue.text(fields::EXPLANATION).is_none() {
            errors.push("Explanation is required");
        }
        let dispute_type = issue.text(fields::DISPUTE_TYPE).unwrap_or_default();

        let store = self.store.load().map_err(IngestError::StoreUnreadable)?;
        let index = store.position(&identity.ids);
        if index.is_none() {
            errors.push(not_found_message(&identity.ids));
        }

        let index = match index {
            Some(index) if errors.is_empty() => index,
            _ => {
                info!(errors = errors.len(), "Dispute rejected: {}", errors);
                return Ok(Outcome::Rejected(errors));
            }
        };

        if let Some(name) = identity.name.as_deref() {
            if name != store.mods[index].name {
                warn!(
                    named = name,
                    stored = %store.mods[index].name,
                    "Dispute names a different mod than the matched record"
                );
            }
        }

        let removed = self
            .store
            .save(|mods| (index < mods.len()).then(|| mods.remove(index)))?
            .ok_or_else(|| {
                bmt_common::Error::Internal(format!("Record {} vanished before removal", index))
            })?;
        let mod_slug = slugify(&removed.name);
        info!(mod_name = %removed.name, index, dispute_type = %dispute_type, "Dispute accepted");

        Ok(Outcome::Accepted(AcceptedDispute {
            removed,
            index,
            mod_slug,
            dispute_type,
        }))
    }
}

fn not_found_message(ids: &PlatformIds) -> String {
    let curseforge = ids
        .curseforge_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    format!(
        "Mod not found in database (Modrinth: {}, CurseForge: {})",
        ids.modrinth_id.as_deref().unwrap_or("N/A"),
        curseforge
    )
}
