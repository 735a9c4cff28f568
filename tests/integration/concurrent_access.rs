use std::sync::Arc;
use std::sync::Barrier;
use std::thread;

use agent_pool::{
    AgentPool, ChannelHandle, ConfigSource, DeviceState, LoginOverrides, PresenceService,
};

fn assert_configured_agents_linked(pool: &AgentPool) {
    for name in pool.current_config().usernames() {
        assert!(
            pool.registry().find_by_username(&name).is_some(),
            "configured agent {} is not in the registry",
            name
        );
        assert_ne!(pool.device_state(&name), DeviceState::Invalid);
    }
}

const FULL: &str = "[A]\n[B]\n[C]\n[D]\n";
const PARTIAL: &str = "[B]\n[D]\n[E]\n";

#[test]
fn logins_race_reloads_without_losing_consistency() {
    let presence = Arc::new(PresenceService::new());
    let pool = Arc::new(AgentPool::start(&ConfigSource::text(FULL), Arc::clone(&presence)).unwrap());

    let workers: Vec<_> = ["A", "B", "C", "D", "E"]
        .into_iter()
        .map(|name| {
            let pool = Arc::clone(&pool);
            let presence = Arc::clone(&presence);
            thread::spawn(move || {
                for i in 0..200 {
                    let channel = ChannelHandle::new(format!("SIP/{}-{}", name, i));
                    if pool.login(name, channel, LoginOverrides::default()).is_ok() {
                        let _ = presence.query(&format!("Agent:{}", name));
                        let _ = pool.logoff(name);
                    }
                }
            })
        })
        .collect();

    for i in 0..50 {
        let text = if i % 2 == 0 { PARTIAL } else { FULL };
        pool.reload(&ConfigSource::text(text)).unwrap();
    }

    for worker in workers {
        worker.join().unwrap();
    }

    // Every configured agent must still be linked, before any converging pass.
    assert_configured_agents_linked(&pool);

    // Nobody is logged in any more, so one more pass converges exactly.
    pool.reload(&ConfigSource::text(PARTIAL)).unwrap();
    assert_eq!(pool.registry().usernames(), vec!["B", "D", "E"]);
    for agent in pool.registry().list() {
        let fields = agent.lock();
        assert!(!fields.is_marked());
        assert!(!fields.is_dead());
        assert!(!fields.is_logged_in());
    }
}

#[test]
fn deferred_removal_never_drops_resurrected_agent() {
    for _ in 0..2000 {
        let pool = Arc::new(
            AgentPool::start(&ConfigSource::text("[A]\n"), Arc::new(PresenceService::new())).unwrap(),
        );
        let a = pool
            .login("A", ChannelHandle::new("SIP/A-1"), LoginOverrides::default())
            .unwrap();
        pool.reload(&ConfigSource::text("")).unwrap();
        assert!(a.is_dead());

        let barrier = Arc::new(Barrier::new(2));
        let logoff = {
            let pool = Arc::clone(&pool);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                pool.registry().logoff(&a);
            })
        };
        let reload = {
            let pool = Arc::clone(&pool);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                pool.reload(&ConfigSource::text("[A]\n")).unwrap();
            })
        };
        logoff.join().unwrap();
        reload.join().unwrap();

        assert_configured_agents_linked(&pool);
    }
}
