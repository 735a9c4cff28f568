use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use agent_pool::config::WatchSettings;
use agent_pool::watch::ConfigWatcher;
use agent_pool::{AgentPool, ConfigSource, PresenceService};
use tempfile::TempDir;

fn wait_for(deadline: Duration, mut check: impl FnMut() -> bool) -> bool {
    let started = Instant::now();
    while started.elapsed() < deadline {
        if check() {
            return true;
        }
        thread::sleep(Duration::from_millis(25));
    }
    check()
}

#[test]
fn edits_to_watched_file_reload_the_pool() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("agents.conf");
    fs::write(&path, "[A]\n").unwrap();

    let pool = Arc::new(
        AgentPool::start(&ConfigSource::file(&path), Arc::new(PresenceService::new())).unwrap(),
    );
    let watcher = ConfigWatcher::new(Arc::clone(&pool), &path, &WatchSettings { debounce_ms: 50 });
    let handle = watcher.handle();
    let worker = thread::spawn(move || watcher.run());

    thread::sleep(Duration::from_millis(300));
    fs::write(&path, "[A]\n[B]\n").unwrap();
    let reloaded = wait_for(Duration::from_secs(10), || {
        pool.registry().usernames() == vec!["A", "B"]
    });

    // A broken edit is ignored and the watcher keeps running.
    fs::write(&path, "[A]\n[A]\n").unwrap();
    thread::sleep(Duration::from_millis(300));
    let kept = pool.registry().usernames() == vec!["A", "B"];

    handle.stop();
    worker.join().unwrap().unwrap();

    assert!(reloaded, "pool was not reloaded after the file changed");
    assert!(kept);
}
