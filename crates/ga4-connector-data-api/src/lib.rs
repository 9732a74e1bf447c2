pub mod client;
pub mod credentials;
pub mod token;

pub use client::DataApiClient;
