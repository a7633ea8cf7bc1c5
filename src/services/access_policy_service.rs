// src/services/access_policy_service.rs

use crate::models::{AccessError, Deadline, User};
use crate::services::access_facts::{FactsAssembler, VisibilityFacts};
use crate::services::access_rules::{VisibilityRule, VISIBILITY_RULES};
use crate::services::directory::{Directory, DirectorySource};
use log::{debug, error, info};

// First rule in table order that lets the requester see the deadline
pub fn visibility_grant(
    requester: &User,
    deadline: &Deadline,
    facts: &VisibilityFacts,
) -> Option<VisibilityRule> {
    VISIBILITY_RULES
        .iter()
        .copied()
        .find(|rule| rule.grants(requester, deadline, facts))
}

pub fn can_view(requester: &User, deadline: &Deadline, facts: &VisibilityFacts) -> bool {
    visibility_grant(requester, deadline, facts).is_some()
}

fn resolve_requester(directory: &dyn Directory, requester_id: &str) -> Result<User, AccessError> {
    directory.get_user(requester_id).ok_or_else(|| {
        error!("❌ Requester not found in directory: {}", requester_id);
        AccessError::RequesterNotFound(requester_id.to_string())
    })
}

// Keeps the visible candidates in input order; fails whole for an unknown requester
pub fn filter_visible(
    directory: &dyn Directory,
    requester_id: &str,
    candidates: Vec<Deadline>,
) -> Result<Vec<Deadline>, AccessError> {
    let requester = resolve_requester(directory, requester_id)?;

    if requester.is_admin() {
        debug!("Admin {} sees all {} candidates", requester.id, candidates.len());
        return Ok(candidates);
    }

    let facts = FactsAssembler::new(directory, &requester).assemble(&candidates);

    let visible: Vec<Deadline> = candidates
        .into_iter()
        .zip(facts.iter())
        .filter_map(|(deadline, facts)| match visibility_grant(&requester, &deadline, facts) {
            Some(rule) => {
                debug!("Deadline {} visible to {} via {}", deadline.id, requester.id, rule);
                Some(deadline)
            }
            None => None,
        })
        .collect();

    Ok(visible)
}

// Fetches one directory snapshot, then filters against it
pub async fn list_visible(
    source: &dyn DirectorySource,
    requester_id: &str,
    candidates: Vec<Deadline>,
) -> Result<Vec<Deadline>, AccessError> {
    let directory = source.snapshot().await?;
    let total = candidates.len();
    let visible = filter_visible(directory.as_ref(), requester_id, candidates)?;

    info!("✅ {} of {} deadlines visible to user: {}", visible.len(), total, requester_id);
    Ok(visible)
}

// `Ok(None)` is a normal denial, not an error
pub async fn check_visibility(
    source: &dyn DirectorySource,
    requester_id: &str,
    deadline: &Deadline,
) -> Result<Option<VisibilityRule>, AccessError> {
    let directory = source.snapshot().await?;
    let requester = resolve_requester(directory.as_ref(), requester_id)?;

    let facts = FactsAssembler::new(directory.as_ref(), &requester).facts_for(deadline);
    let grant = visibility_grant(&requester, deadline, &facts);

    match grant {
        Some(rule) => debug!("Deadline {} visible to {} via {}", deadline.id, requester_id, rule),
        None => debug!("Deadline {} hidden from {}", deadline.id, requester_id),
    }
    Ok(grant)
}
