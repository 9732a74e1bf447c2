/// Re-export `Config` from `ga4-connector-core` for use within this crate.
///
/// Environment parsing lives in the core crate so the data-api client and the
/// integration tests can build a `Config` without depending on the server.
pub use ga4_connector_core::config::Config;
