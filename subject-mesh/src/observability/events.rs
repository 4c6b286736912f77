//! Canonical structured event names used across `subject-mesh`.

// Binder events.
pub const BIND_START: &str = "bind_start";
pub const BIND_OK: &str = "bind_ok";
pub const BIND_FAILED: &str = "bind_failed";
pub const SUBSCRIBE_OK: &str = "subscribe_ok";
pub const SUBSCRIBE_FAILED: &str = "subscribe_failed";
pub const ROLLBACK_UNSUBSCRIBE_OK: &str = "rollback_unsubscribe_ok";
pub const ROLLBACK_UNSUBSCRIBE_FAILED: &str = "rollback_unsubscribe_failed";
pub const RELEASE_OK: &str = "release_ok";
pub const RELEASE_FAILED: &str = "release_failed";

// Service lifecycle events.
pub const SERVICE_START: &str = "service_start";
pub const SERVICE_ENDPOINT_EXPANDED: &str = "service_endpoint_expanded";
pub const SERVICE_ENDPOINT_SUBJECT: &str = "service_endpoint_subject";
pub const SERVICE_REGISTERED: &str = "service_registered";
pub const SERVICE_START_FAILED: &str = "service_start_failed";
pub const SERVICE_STOPPED: &str = "service_stopped";

// Configuration events.
pub const CONFIG_ENV_OVERRIDE: &str = "config_env_override";
