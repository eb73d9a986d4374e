//! Error taxonomy for the resolution pipeline.
//!
//! Not-found is not an error anywhere in this crate: it travels as
//! `Ok(None)` through every layer. Persistence faults are absorbed by the
//! resolver (logged, resolved to absent). Provider faults propagate, since
//! they mean the lookup never ran to completion and a retry may succeed.

/// Failure talking to the external geolocation provider.
///
/// A clean "no data for this IP" answer is NOT one of these; the provider
/// port returns `Ok(None)` for that case.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Connection, TLS or timeout failure before a response arrived.
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("provider returned HTTP status {code}")]
    Status { code: u16 },

    /// The provider rejected the request via its error envelope
    /// (invalid access key, quota exceeded, ...).
    #[error("provider rejected the request: {kind} (code {code})")]
    Api { code: i64, kind: String },

    /// The response body could not be decoded as a provider payload.
    #[error("provider response could not be decoded: {0}")]
    Decode(String),
}

/// Error returned by `GeolocationResolver::resolve`.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
