use std::collections::BTreeSet;

use agent_pool::{AgentRegistry, ChannelHandle, ConfigSnapshot, LoginOverrides, ReconciliationEngine};
use proptest::prelude::*;

fn snapshot(names: &BTreeSet<String>) -> ConfigSnapshot {
    let text: String = names.iter().map(|n| format!("[{}]\n", n)).collect();
    ConfigSnapshot::parse(&text).unwrap()
}

fn names() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("[a-f][0-9]?", 0..8)
}

fn flags(registry: &AgentRegistry) -> Vec<(String, bool, bool, bool)> {
    registry
        .list()
        .iter()
        .map(|agent| {
            let fields = agent.lock();
            (
                agent.username().to_string(),
                fields.is_marked(),
                fields.is_dead(),
                fields.is_logged_in(),
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn reconcile_converges_from_any_registry(
        initial in names(),
        target in names(),
        logins in any::<u64>(),
    ) {
        let registry = AgentRegistry::new();
        ReconciliationEngine::reconcile(&snapshot(&initial), &registry);

        let mut busy = BTreeSet::new();
        for (i, agent) in registry.list().into_iter().enumerate() {
            if logins & (1 << (i % 64)) != 0 {
                agent
                    .login(ChannelHandle::new(format!("SIP/{}-1", agent.username())), LoginOverrides::default())
                    .unwrap();
                busy.insert(agent.username().to_string());
            }
        }

        ReconciliationEngine::reconcile(&snapshot(&target), &registry);

        let expected: BTreeSet<String> = target.union(&busy).cloned().collect();
        let linked: BTreeSet<String> = registry.usernames().into_iter().collect();
        prop_assert_eq!(&linked, &expected);

        for (name, marked, dead, _) in flags(&registry) {
            prop_assert!(!marked);
            prop_assert_eq!(dead, !target.contains(&name));
        }
    }

    #[test]
    fn reconcile_is_idempotent(
        initial in names(),
        target in names(),
        logins in any::<u64>(),
    ) {
        let registry = AgentRegistry::new();
        ReconciliationEngine::reconcile(&snapshot(&initial), &registry);
        for (i, agent) in registry.list().into_iter().enumerate() {
            if logins & (1 << (i % 64)) != 0 {
                agent
                    .login(ChannelHandle::new(format!("SIP/{}-1", agent.username())), LoginOverrides::default())
                    .unwrap();
            }
        }

        let snap = snapshot(&target);
        ReconciliationEngine::reconcile(&snap, &registry);
        let first = flags(&registry);
        let report = ReconciliationEngine::reconcile(&snap, &registry);
        prop_assert_eq!(flags(&registry), first);
        prop_assert!(report.created.is_empty());
        prop_assert!(report.removed.is_empty());
        prop_assert!(report.resurrected.is_empty());
    }
}
