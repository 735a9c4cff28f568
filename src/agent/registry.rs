//! Registry of live agents.
//!
//! The registry lock guards only which agents are linked. Per-agent fields
//! sit behind each agent's own lock, and the two are never held together:
//! scans copy the agent list under the registry lock, release it, then lock
//! agents one at a time.

use super::channel::ChannelHandle;
use super::entry::{Agent, AgentFields};
use crate::keyed::Keyed;
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use tracing::{debug, warn};

/// Concurrent container of live agents keyed by username.
#[derive(Default)]
pub struct AgentRegistry {
    agents: RwLock<BTreeMap<String, Arc<Agent>>>,
    /// Held for a whole reconciliation pass and for the dead check in
    /// `logoff`, so a deferred removal never unlinks a resurrected agent.
    /// Taken before, never while holding, the map or an agent lock.
    transitions: Mutex<()>,
}

impl AgentRegistry {
    /// Create a new empty agent registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an agent by username
    pub fn find_by_username(&self, username: &str) -> Option<Arc<Agent>> {
        self.agents.read().get(username).cloned()
    }

    /// Agents whose username starts with `prefix`, in key order.
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<Arc<Agent>> {
        self.agents
            .read()
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .map(|(_, agent)| agent)
            .take_while(|agent| agent.compare_by_prefix(prefix) == Ordering::Equal)
            .cloned()
            .collect()
    }

    /// Find the agent logged in on `channel`.
    pub fn find_by_channel(&self, channel: &ChannelHandle) -> Option<Arc<Agent>> {
        self.list()
            .into_iter()
            .find(|agent| agent.lock().channel() == Some(channel))
    }

    /// Link an agent, replacing any entry with the same username.
    ///
    /// Never fails. A replaced entry is marked unlinked.
    pub fn insert(&self, agent: Arc<Agent>) {
        let replaced = self
            .agents
            .write()
            .insert(agent.username().to_string(), Arc::clone(&agent));
        if let Some(old) = replaced {
            if !Arc::ptr_eq(&old, &agent) {
                warn!(agent = %old.username(), "Replaced existing agent in registry");
                old.lock().set_unlinked();
            }
        }
    }

    /// Unlink `agent` if it is the entry currently registered under its name.
    pub fn remove(&self, agent: &Arc<Agent>) -> bool {
        let removed = {
            let mut agents = self.agents.write();
            match agents.get(agent.username()) {
                Some(current) if Arc::ptr_eq(current, agent) => agents.remove(agent.username()),
                _ => None,
            }
        };
        match removed {
            Some(agent) => {
                agent.lock().set_unlinked();
                debug!(agent = %agent.username(), "Unlinked agent");
                true
            }
            None => false,
        }
    }

    /// Unlink every agent the predicate accepts, returning the unlinked agents.
    ///
    /// The predicate runs with the agent's lock held and may update its fields.
    pub fn remove_where<F>(&self, mut predicate: F) -> Vec<Arc<Agent>>
    where
        F: FnMut(&mut AgentFields) -> bool,
    {
        let matched: Vec<Arc<Agent>> = self
            .list()
            .into_iter()
            .filter(|agent| predicate(&mut agent.lock()))
            .collect();
        if matched.is_empty() {
            return matched;
        }

        let mut removed = Vec::with_capacity(matched.len());
        {
            let mut agents = self.agents.write();
            for agent in matched {
                let is_current = agents
                    .get(agent.username())
                    .map(|current| Arc::ptr_eq(current, &agent))
                    .unwrap_or(false);
                if is_current {
                    agents.remove(agent.username());
                    removed.push(agent);
                }
            }
        }
        for agent in &removed {
            agent.lock().set_unlinked();
        }
        removed
    }

    /// Log an agent off, returning the channel it held.
    ///
    /// A dead agent is unlinked here, completing the removal that was deferred
    /// while it was on a call.
    pub fn logoff(&self, agent: &Arc<Agent>) -> Option<ChannelHandle> {
        let channel = agent.lock().take_channel();

        let _transitions = self.transitions.lock();
        let dead = agent.is_dead();
        debug!(agent = %agent.username(), dead, "Agent logged off");
        if dead {
            self.remove(agent);
        }
        channel
    }

    /// Exclude deferred removals for the lifetime of the guard.
    pub(crate) fn lock_transitions(&self) -> MutexGuard<'_, ()> {
        self.transitions.lock()
    }

    /// All linked agents in username order.
    pub fn list(&self) -> Vec<Arc<Agent>> {
        self.agents.read().values().cloned().collect()
    }

    pub fn usernames(&self) -> Vec<String> {
        self.agents.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.agents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.read().is_empty()
    }
}
