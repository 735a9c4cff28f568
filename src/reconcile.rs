//! Mark-and-sweep reconciliation of the agent registry against a snapshot.
//!
//! A reload replaces the whole configuration, so there is no diff to apply.
//! Instead every live agent is marked, every agent still configured has its
//! mark cleared (or is created), and whatever is still marked afterwards is
//! dead. Dead agents that are idle are unlinked at once; dead agents on a call
//! stay linked until the call side logs them off.

use crate::agent::{Agent, AgentRegistry};
use crate::config::ConfigSnapshot;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// What one reconciliation pass did, by username.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    /// Agents created for configs that had no live agent.
    pub created: Vec<String>,
    /// Existing agents that are still configured.
    pub retained: Vec<String>,
    /// Retained agents that had been dead and are live again.
    pub resurrected: Vec<String>,
    /// Dead idle agents unlinked by this pass.
    pub removed: Vec<String>,
    /// Dead agents left linked because they are on a call.
    pub deferred: Vec<String>,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.created.is_empty()
            && self.resurrected.is_empty()
            && self.removed.is_empty()
            && self.deferred.is_empty()
    }
}

/// Converges an [`AgentRegistry`] to a [`ConfigSnapshot`].
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    /// Run mark, reconcile and sweep. Runs to completion once started.
    ///
    /// Existing agents keep the config they were created with; a changed
    /// record only applies once the agent is recreated.
    pub fn reconcile(snapshot: &ConfigSnapshot, registry: &AgentRegistry) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let _pass = registry.lock_transitions();

        Self::mark(registry);

        for cfg in snapshot.iter() {
            match registry.find_by_username(&cfg.username) {
                Some(agent) => {
                    agent.lock().set_mark(false);
                    report.retained.push(cfg.username.clone());
                }
                None => {
                    registry.insert(Arc::new(Agent::new(Arc::clone(cfg))));
                    debug!(agent = %cfg.username, "Created agent");
                    report.created.push(cfg.username.clone());
                }
            }
        }

        Self::sweep(registry, &mut report);

        info!(
            created = report.created.len(),
            retained = report.retained.len(),
            resurrected = report.resurrected.len(),
            removed = report.removed.len(),
            deferred = report.deferred.len(),
            "Reconciled agent pool"
        );
        report
    }

    fn mark(registry: &AgentRegistry) {
        for agent in registry.list() {
            agent.lock().set_mark(true);
        }
    }

    fn sweep(registry: &AgentRegistry, report: &mut ReconcileReport) {
        let deferred = &mut report.deferred;
        let resurrected = &mut report.resurrected;

        let removed = registry.remove_where(|fields| {
            let username = fields.config().username.clone();
            if fields.is_marked() {
                fields.set_mark(false);
                fields.set_dead(true);
                if fields.is_logged_in() {
                    debug!(agent = %username, "Agent is dead but on a call, deferring removal");
                    deferred.push(username);
                    return false;
                }
                return true;
            }
            if fields.is_dead() {
                debug!(agent = %username, "Resurrected agent");
                resurrected.push(username);
            }
            fields.set_dead(false);
            false
        });

        report.removed = removed
            .iter()
            .map(|agent| agent.username().to_string())
            .collect();
        for username in &report.removed {
            debug!(agent = %username, "Removed agent");
        }
    }
}
