//! Geolocation Store Port
//!
//! Defines the interface for the durable record store keyed by IP address.
//! Implementations may use SQLite, PostgreSQL, or in-memory storage.

use crate::domain::entities::Geolocation;
use async_trait::async_trait;

/// Durable key-value store for geolocation records.
///
/// This is an outbound port that abstracts the persistence mechanism.
/// The store owns the authoritative copy of every record; at most one row
/// exists per IP address (key-level uniqueness is the implementation's
/// responsibility).
#[async_trait]
pub trait GeolocationStore: Send + Sync {
    /// Point lookup by IP address.
    ///
    /// Not-found is a normal outcome (`Ok(None)`), never an error. `Err`
    /// means the store itself failed.
    async fn find(&self, ip: &str) -> anyhow::Result<Option<Geolocation>>;

    /// Attempt to add exactly one new row, returning the rows affected.
    ///
    /// A duplicate key or any store fault surfaces as `Err`; it is never
    /// swallowed here. Callers decide what a result other than `Ok(1)`
    /// means.
    async fn insert(&self, record: &Geolocation) -> anyhow::Result<usize>;
}
