mod provider;

pub use provider::{DEFAULT_PAGESPEED_ENDPOINT, Provider, SERVICE_NAME, Strategy};
