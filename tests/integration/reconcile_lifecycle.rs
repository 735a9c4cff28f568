use std::sync::Arc;

use agent_pool::agent::AgentInfoItem;
use agent_pool::{
    AgentLifecycle, AgentPool, ChannelHandle, ConfigSource, DeviceState, LoginOverrides,
    PoolError, PresenceService,
};

fn pool(text: &str) -> AgentPool {
    AgentPool::start(&ConfigSource::text(text), Arc::new(PresenceService::new())).unwrap()
}

#[test]
fn busy_agent_survives_removal_until_logoff() {
    let pool = pool("[A]\n[B]\n");
    let chan = ChannelHandle::new("SIP/alice-00000001");
    let a = pool.login("A", chan.clone(), LoginOverrides::default()).unwrap();
    a.begin_call().unwrap();

    let report = pool.reload(&ConfigSource::text("[B]\n[C]\n")).unwrap();
    assert_eq!(report.deferred, vec!["A"]);
    assert_eq!(pool.registry().usernames(), vec!["A", "B", "C"]);
    assert_eq!(a.lifecycle(), AgentLifecycle::DeadButBusy);

    // Still visible with its prior state while the call runs.
    assert_eq!(pool.device_state("A"), DeviceState::InUse);
    assert_eq!(pool.agent_info("A", AgentInfoItem::Channel).unwrap(), "SIP/alice");
    assert_eq!(
        pool.registry().find_by_channel(&chan).map(|agent| agent.username().to_string()),
        Some("A".to_string())
    );

    a.end_call().unwrap();
    assert_eq!(pool.logoff("A").unwrap(), chan);
    assert_eq!(a.lifecycle(), AgentLifecycle::Removed);
    assert_eq!(pool.registry().usernames(), vec!["B", "C"]);
    assert_eq!(pool.device_state("A"), DeviceState::Invalid);
}

#[test]
fn dead_agent_refuses_new_login() {
    let pool = pool("[A]\n[B]\n");
    let b = pool
        .login("B", ChannelHandle::new("SIP/b-1"), LoginOverrides::default())
        .unwrap();
    pool.reload(&ConfigSource::text("[A]\n")).unwrap();
    assert!(b.is_dead());

    assert!(matches!(
        b.login(ChannelHandle::new("SIP/b-2"), LoginOverrides::default()),
        Err(PoolError::AgentDead(_))
    ));
    assert!(pool.registry().logoff(&b).is_some());
    assert!(matches!(
        b.login(ChannelHandle::new("SIP/b-3"), LoginOverrides::default()),
        Err(PoolError::AgentDead(_))
    ));
    assert!(matches!(
        pool.login("B", ChannelHandle::new("SIP/b-4"), LoginOverrides::default()),
        Err(PoolError::UnknownAgent(_))
    ));
}

#[test]
fn reappearing_agent_is_resurrected_not_recreated() {
    let pool = pool("[A]\n");
    let a = pool
        .login("A", ChannelHandle::new("SIP/a-1"), LoginOverrides::default())
        .unwrap();

    pool.reload(&ConfigSource::text("")).unwrap();
    assert!(a.is_dead());

    let report = pool.reload(&ConfigSource::text("[A]\nfullname = Renamed\n")).unwrap();
    assert_eq!(report.resurrected, vec!["A"]);
    let current = pool.agent("A").unwrap();
    assert!(Arc::ptr_eq(&a, &current));
    assert_eq!(current.lifecycle(), AgentLifecycle::Active);
    // Live agents keep the record they were created from.
    assert_eq!(current.config().full_name, "");

    pool.logoff("A").unwrap();
    assert_eq!(pool.registry().usernames(), vec!["A"]);
}

#[test]
fn login_overrides_take_precedence() {
    let pool = pool("[A]\nwrapuptime = 100\nackcall = no\nmaxlogintries = 3\n");
    let a = pool
        .login(
            "A",
            ChannelHandle::new("SIP/a-1"),
            LoginOverrides::default().with_wrapup_time(2500).with_ack_call(true),
        )
        .unwrap();
    let params = a.effective_params();
    assert_eq!(params.wrapup_time, 2500);
    assert!(params.ack_call);
    assert_eq!(params.max_login_tries, 3);
}

#[test]
fn prefix_lookup_is_key_ordered() {
    let pool = pool("[1001]\n[1002]\n[2001]\n[100]\n");
    let matches: Vec<String> = pool
        .registry()
        .find_by_prefix("100")
        .iter()
        .map(|agent| agent.username().to_string())
        .collect();
    assert_eq!(matches, vec!["100", "1001", "1002"]);

    let configs: Vec<String> = pool
        .current_config()
        .find_prefix("100")
        .iter()
        .map(|cfg| cfg.username.clone())
        .collect();
    assert_eq!(configs, matches);
}
