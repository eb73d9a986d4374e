//! SQLite Geolocation Store
//!
//! Implements GeolocationStore using SQLite for durable storage. The IP
//! address is the primary key, which is the sole backstop against
//! duplicate-insert races: the losing writer gets a constraint error.

use crate::domain::entities::Geolocation;
use crate::domain::ports::GeolocationStore;
use anyhow::Result;
use async_trait::async_trait;
use rusqlite::{params, Connection, Row};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS geolocations (
    ip           TEXT PRIMARY KEY,
    country_code TEXT,
    country_name TEXT,
    region_code  TEXT,
    region_name  TEXT,
    city         TEXT,
    zip          TEXT,
    latitude     REAL,
    longitude    REAL
);
";

/// SQLite-backed geolocation store.
///
/// Every operation opens its own connection and runs on the blocking
/// thread pool; SQLite serializes writers internally.
pub struct SqliteGeolocationStore {
    db_path: String,
}

impl SqliteGeolocationStore {
    /// Open (creating if needed) the database and ensure the schema exists.
    pub fn open(db_path: impl Into<String>) -> Result<Self> {
        let db_path = db_path.into();
        let conn = Connection::open(&db_path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { db_path })
    }

    /// Point read against the database file.
    fn find_blocking(db_path: &str, ip: &str) -> Result<Option<Geolocation>> {
        let conn = Connection::open(db_path)?;
        let mut stmt = conn.prepare(
            "SELECT ip, country_code, country_name, region_code, region_name,
                    city, zip, latitude, longitude
             FROM geolocations
             WHERE ip = ?1",
        )?;

        let mut rows = stmt.query_map([ip], Self::row_to_geolocation)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Single-row insert against the database file.
    fn insert_blocking(db_path: &str, record: &Geolocation) -> Result<usize> {
        let conn = Connection::open(db_path)?;
        let rows = conn.execute(
            "INSERT INTO geolocations
                 (ip, country_code, country_name, region_code, region_name,
                  city, zip, latitude, longitude)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                record.ip,
                record.country_code,
                record.country_name,
                record.region_code,
                record.region_name,
                record.city,
                record.zip,
                record.latitude,
                record.longitude,
            ],
        )?;
        Ok(rows)
    }

    /// Convert a SQLite row to a Geolocation record.
    fn row_to_geolocation(row: &Row) -> rusqlite::Result<Geolocation> {
        Ok(Geolocation {
            ip: row.get(0)?,
            country_code: row.get(1)?,
            country_name: row.get(2)?,
            region_code: row.get(3)?,
            region_name: row.get(4)?,
            city: row.get(5)?,
            zip: row.get(6)?,
            latitude: row.get(7)?,
            longitude: row.get(8)?,
        })
    }
}

#[async_trait]
impl GeolocationStore for SqliteGeolocationStore {
    async fn find(&self, ip: &str) -> Result<Option<Geolocation>> {
        let db_path = self.db_path.clone();
        let ip = ip.to_string();

        tokio::task::spawn_blocking(move || Self::find_blocking(&db_path, &ip)).await?
    }

    async fn insert(&self, record: &Geolocation) -> Result<usize> {
        let db_path = self.db_path.clone();
        let record = record.clone();

        tokio::task::spawn_blocking(move || Self::insert_blocking(&db_path, &record)).await?
    }
}
