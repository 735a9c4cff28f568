use std::fs;
use std::sync::Arc;

use agent_pool::config::{AgentConfig, GroupMask};
use agent_pool::{AgentPool, ConfigError, ConfigSnapshot, ConfigSource, PoolError, PresenceService};
use tempfile::TempDir;

const AGENTS: &str = "\
; call center agents
[general]

[1001]
password = 4321
fullname = Alice Smith
group = 1,3-5
savecallsin = recordings

[1002]
fullname => Bob Jones
ackcall = yes
wrapuptime = 500

[1003]
";

#[test]
fn loads_three_agents_with_defaults() {
    let snapshot = ConfigSnapshot::parse(AGENTS).unwrap();
    assert_eq!(snapshot.usernames(), vec!["1001", "1002", "1003"]);

    let alice = snapshot.get("1001").unwrap();
    assert_eq!(alice.password, "4321");
    assert_eq!(alice.full_name, "Alice Smith");
    assert_eq!(alice.save_calls_in, "/recordings/");
    assert_eq!(alice.group, GroupMask((1 << 1) | (1 << 3) | (1 << 4) | (1 << 5)));

    let bob = snapshot.get("1002").unwrap();
    assert_eq!(bob.full_name, "Bob Jones");
    assert!(bob.ack_call);
    assert_eq!(bob.wrapup_time, 500);

    let plain = snapshot.get("1003").unwrap();
    assert_eq!(*plain.as_ref(), AgentConfig::new("1003"));
}

#[test]
fn duplicate_agent_publishes_nothing() {
    let presence = Arc::new(PresenceService::new());
    let pool = AgentPool::start(&ConfigSource::text("[alice]\n"), presence).unwrap();
    let before = pool.current_config();

    let result = pool.reload(&ConfigSource::text("[bob]\n[carol]\n[bob]\n"));
    assert!(matches!(result, Err(PoolError::Config(_))));
    assert!(Arc::ptr_eq(&before, &pool.current_config()));
    assert_eq!(pool.registry().usernames(), vec!["alice"]);
}

#[test]
fn reload_from_file_tracks_edits() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("agents.conf");
    fs::write(&path, "[A]\n[B]\n").unwrap();

    let source = ConfigSource::file(&path);
    let pool = AgentPool::start(&source, Arc::new(PresenceService::new())).unwrap();
    assert_eq!(pool.registry().usernames(), vec!["A", "B"]);

    fs::write(&path, "[B]\n[C]\n").unwrap();
    let report = pool.reload(&source).unwrap();
    assert_eq!(report.removed, vec!["A"]);
    assert_eq!(report.created, vec!["C"]);
    assert_eq!(pool.registry().usernames(), vec!["B", "C"]);
    assert_eq!(pool.current_config().usernames(), vec!["B", "C"]);
}

#[test]
fn broken_file_keeps_previous_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("agents.conf");
    fs::write(&path, "[A]\n").unwrap();

    let source = ConfigSource::file(&path);
    let pool = AgentPool::start(&source, Arc::new(PresenceService::new())).unwrap();

    fs::write(&path, "[A]\nwrapuptime = soon\n").unwrap();
    match pool.reload(&source) {
        Err(PoolError::Config(ConfigError::InvalidValue { line, key, .. })) => {
            assert_eq!(line, 2);
            assert_eq!(key, "wrapuptime");
        }
        other => panic!("expected invalid value, got {:?}", other.map(|_| ())),
    }
    assert_eq!(pool.current_config().usernames(), vec!["A"]);

    fs::remove_file(&path).unwrap();
    assert!(matches!(
        pool.reload(&source),
        Err(PoolError::Config(ConfigError::Io { .. }))
    ));
    assert_eq!(pool.registry().usernames(), vec!["A"]);
}

#[test]
fn general_section_rules() {
    assert!(ConfigSnapshot::parse("[general]\n[A]\n").is_ok());
    assert!(matches!(
        ConfigSnapshot::parse("[general]\nfoo = bar\n[A]\n"),
        Err(ConfigError::UnknownOption { .. })
    ));
    assert!(matches!(
        ConfigSnapshot::parse("[agents]\n"),
        Err(ConfigError::ReservedSection { .. })
    ));
}

#[test]
fn beep_and_recording_options() {
    assert!(matches!(
        ConfigSnapshot::parse("[A]\ncustom_beep =\n"),
        Err(ConfigError::InvalidValue { .. })
    ));
    let snapshot = ConfigSnapshot::parse("[A]\ncustom_beep = tone\nsavecallsin = /foo/\n").unwrap();
    let a = snapshot.get("A").unwrap();
    assert_eq!(a.beep_sound, "tone");
    assert_eq!(a.save_calls_in, "/foo/");
}
