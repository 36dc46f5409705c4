mod provider;

pub use provider::{DEFAULT_USER_AGENT, FALLBACK_LABEL, Provider, SERVICE_NAME};
