use std::sync::Arc;

use agent_pool::{
    AgentPool, ChannelHandle, ConfigSource, DeviceState, DeviceStateProvider, LoginOverrides,
    PresenceError, PoolError, PresenceService,
};

struct AlwaysBusy;

impl DeviceStateProvider for AlwaysBusy {
    fn device_state(&self, _device: &str) -> DeviceState {
        DeviceState::Busy
    }
}

#[test]
fn presence_follows_agent_session() {
    let presence = Arc::new(PresenceService::new());
    let pool = AgentPool::start(&ConfigSource::text("[1001]\n"), Arc::clone(&presence)).unwrap();

    assert_eq!(presence.query("Agent:1001"), DeviceState::Unavailable);
    let agent = pool
        .login("1001", ChannelHandle::new("SIP/1001-1"), LoginOverrides::default())
        .unwrap();
    assert_eq!(presence.query("Agent:1001"), DeviceState::NotInUse);
    agent.begin_call().unwrap();
    assert_eq!(presence.query("Agent:1001"), DeviceState::InUse);
    agent.end_call().unwrap();
    pool.logoff("1001").unwrap();
    assert_eq!(presence.query("Agent:1001"), DeviceState::Unavailable);
}

#[test]
fn unknown_devices_are_invalid() {
    let presence = Arc::new(PresenceService::new());
    let _pool = AgentPool::start(&ConfigSource::text("[1001]\n"), Arc::clone(&presence)).unwrap();

    assert_eq!(presence.query("Agent:nobody"), DeviceState::Invalid);
    assert_eq!(presence.query("Nope:1001"), DeviceState::Invalid);
    assert_eq!(presence.query("1001"), DeviceState::Invalid);
}

#[test]
fn provider_name_is_exclusive() {
    let presence = Arc::new(PresenceService::new());
    presence.add_provider("Agent", Arc::new(AlwaysBusy)).unwrap();

    let result = AgentPool::start(&ConfigSource::text("[1001]\n"), Arc::clone(&presence));
    assert!(matches!(
        result,
        Err(PoolError::Presence(PresenceError::DuplicateProvider(_)))
    ));
    // The existing provider is left alone.
    assert_eq!(presence.query("Agent:1001"), DeviceState::Busy);

    let pool = AgentPool::start_with_provider(
        &ConfigSource::text("[1001]\n"),
        Arc::clone(&presence),
        "Operator",
    )
    .unwrap();
    assert_eq!(pool.device_state("1001"), DeviceState::Unavailable);
    drop(pool);
    assert!(!presence.has_provider("Operator"));
    assert!(presence.has_provider("Agent"));
}
