mod concurrent_access;
mod config_reload;
mod presence;
mod reconcile_lifecycle;
mod reconcile_properties;
mod watch_reload;
