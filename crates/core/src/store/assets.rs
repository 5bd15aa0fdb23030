//! Asset CRUD operations on named caches.
//!
//! Provides the same observable surface as the browser CacheStorage the
//! offline worker uses: put into a named cache, match by URL, enumerate
//! cache names, and delete a whole cache at once.

use super::connection::CacheDb;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A cached static asset.
///
/// One entry per (cache name, URL). The body is stored verbatim so a cache
/// hit is byte-identical to what was fetched at install time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedAsset {
    pub cache_name: String,
    pub url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
    pub stored_at: String,
}

impl CachedAsset {
    /// Build an entry stamped with the current time.
    pub fn new(cache_name: &str, url: &str, status: u16, content_type: Option<String>, body: Vec<u8>) -> Self {
        Self {
            cache_name: cache_name.to_string(),
            url: url.to_string(),
            status,
            content_type,
            body,
            stored_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl CacheDb {
    /// Insert or update a cached asset.
    ///
    /// Uses UPSERT semantics: inserts if the (cache name, URL) pair doesn't
    /// exist, replaces the stored response if it does.
    pub async fn put_asset(&self, asset: &CachedAsset) -> Result<(), Error> {
        let asset = asset.clone();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO assets (cache_name, url, status, content_type, body, stored_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                     ON CONFLICT(cache_name, url) DO UPDATE SET
                        status = excluded.status,
                        content_type = excluded.content_type,
                        body = excluded.body,
                        stored_at = excluded.stored_at",
                    params![
                        &asset.cache_name,
                        &asset.url,
                        asset.status as i64,
                        &asset.content_type,
                        &asset.body,
                        &asset.stored_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Look up an asset by cache name and URL.
    ///
    /// Returns None if the cache has no entry for the URL.
    pub async fn get_asset(&self, cache_name: &str, url: &str) -> Result<Option<CachedAsset>, Error> {
        let cache_name = cache_name.to_string();
        let url = url.to_string();
        self.conn
            .call(move |conn| -> Result<Option<CachedAsset>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT cache_name, url, status, content_type, body, stored_at
                     FROM assets WHERE cache_name = ?1 AND url = ?2",
                )?;

                let result = stmt.query_row(params![cache_name, url], |row| {
                    Ok(CachedAsset {
                        cache_name: row.get(0)?,
                        url: row.get(1)?,
                        status: row.get::<_, i64>(2)? as u16,
                        content_type: row.get(3)?,
                        body: row.get(4)?,
                        stored_at: row.get(5)?,
                    })
                });

                match result {
                    Ok(a) => Ok(Some(a)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// List the names of all existing caches.
    pub async fn cache_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT DISTINCT cache_name FROM assets ORDER BY cache_name")?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete an entire named cache.
    ///
    /// Returns the number of deleted entries.
    pub async fn delete_cache(&self, cache_name: &str) -> Result<u64, Error> {
        let cache_name = cache_name.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM assets WHERE cache_name = ?1", params![cache_name])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of entries in a named cache.
    pub async fn cache_len(&self, cache_name: &str) -> Result<u64, Error> {
        let cache_name = cache_name.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM assets WHERE cache_name = ?1",
                    params![cache_name],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
