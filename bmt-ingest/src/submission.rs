//! Submission processor: loose intake fields to one appended record

use crate::error::{IngestError, IngestResult};
use crate::fields::{self, IssueFields};
use crate::outcome::{AcceptedSubmission, Outcome, ValidationErrors};
use crate::verifier::{verify_optional, IdentityVerifier, Verification};
use bmt_common::integrity::find_conflicts;
use bmt_common::normalize::{parse_loaders, parse_tag, slugify};
use bmt_common::{CorrectTags, Loader, Record, StoreRepository};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

/// Audit value when the submitter identity is unavailable
pub const UNKNOWN_AUTHOR: &str = "unknown";

/// Validates a submission and appends it through the store repository
///
/// Every rule runs; a rejection carries all accumulated messages and
/// leaves the store untouched.
pub struct SubmissionProcessor<S> {
    store: S,
    verifier: Arc<dyn IdentityVerifier>,
}

impl<S: StoreRepository> SubmissionProcessor<S> {
    pub fn new(store: S, verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { store, verifier }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn process(
        &self,
        issue: &IssueFields,
        author: Option<&str>,
    ) -> IngestResult<Outcome<AcceptedSubmission>> {
        let mut errors = ValidationErrors::new();

        let identity = issue.identity(&mut errors);

        let client = issue
            .text(fields::CORRECT_CLIENT_TAG)
            .and_then(|raw| parse_tag(&raw));
        let server = issue
            .text(fields::CORRECT_SERVER_TAG)
            .and_then(|raw| parse_tag(&raw));
        if client.is_none() {
            errors.push("Correct client tag is required");
        }
        if server.is_none() {
            errors.push("Correct server tag is required");
        }

        let loaders = canonical_loaders(issue, &mut errors);
        let notes = issue.text(fields::NOTES);

        let verification =
            verify_optional(self.verifier.as_ref(), identity.ids.modrinth_id.as_deref()).await;
        if let Verification::Rejected(message) = verification {
            errors.push(message);
        }

        let store = self.store.load().map_err(IngestError::StoreUnreadable)?;
        errors.extend(find_conflicts(&store.mods, &identity.ids));

        let (name, client, server) = match (identity.name, client, server) {
            (Some(name), Some(client), Some(server)) if errors.is_empty() => (name, client, server),
            _ => {
                info!(errors = errors.len(), "Submission rejected: {}", errors);
                return Ok(Outcome::Rejected(errors));
            }
        };

        let record = Record {
            name,
            modrinth_id: identity.ids.modrinth_id,
            curseforge_id: identity.ids.curseforge_id,
            correct_tags: CorrectTags { client, server },
            loaders,
            notes,
            reported_by: Some(reporter(author)),
            reported_date: Some(bmt_common::time::today()),
        };
        debug!(?record, "Appending record");

        let appended = record.clone();
        self.store.save(move |mods| mods.push(appended))?;

        let mod_slug = slugify(&record.name);
        info!(mod_name = %record.name, mod_slug = %mod_slug, "Submission accepted");

        Ok(Outcome::Accepted(AcceptedSubmission { record, mod_slug }))
    }
}

/// Normalized loader names mapped onto the closed loader set
fn canonical_loaders(issue: &IssueFields, errors: &mut ValidationErrors) -> Vec<Loader> {
    parse_loaders(issue.raw(fields::LOADERS))
        .iter()
        .filter_map(|name| match Loader::from_str(name) {
            Ok(loader) => Some(loader),
            Err(e) => {
                errors.push(e.to_string());
                None
            }
        })
        .collect()
}

fn reporter(author: Option<&str>) -> String {
    author
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(UNKNOWN_AUTHOR)
        .to_string()
}
