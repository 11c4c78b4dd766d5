// [libs/infra/store/src/client.rs]
/*!
 * =================================================================
 * APARATO: STORE CLIENT (REDIS-COMPATIBLE)
 * CLASIFICACION: INFRASTRUCTURE LAYER (ESTRATO L3)
 * RESPONSABILIDAD: GESTION DE BANDAS LSH, PUNTUACIONES, CACHE DE
 * VEREDICTOS Y LISTAS BLANCAS SOBRE UN SERVIDOR COMPATIBLE CON REDIS
 * =================================================================
 */

use std::collections::HashSet;

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::StoreError;

/// One hour, in seconds. TTL for oracle-cache entries and their LSH bands.
pub const ORACLE_CACHE_SPAM_TTL_SECS: usize = 60 * 60;
/// Five minutes, in seconds. TTL for negative oracle-cache entries.
pub const ORACLE_CACHE_NEGATIVE_TTL_SECS: usize = 5 * 60;
/// 24 hours, in seconds. TTL for the duplicate-report suppression flag.
pub const REPORT_DEDUP_TTL_SECS: usize = 24 * 60 * 60;
/// 7 days, in seconds. TTL for a message's scan record.
pub const MSGID_RECORD_TTL_SECS: usize = 7 * 24 * 60 * 60;

/// JSON payload cached under `mi:oracle_cache:<digest>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedVerdict {
    /// `"spam"` or `"allow"`.
    pub action: String,
    /// Free-form label, when the source carried one.
    pub label: Option<String>,
    /// Distance of the match that produced this verdict.
    pub distance: Option<u32>,
    /// Confidence score, when computed.
    pub confidence: Option<f64>,
}

/// JSON payload cached under `mi:msgid:<sha1(msgid)>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Every signature digest computed for this message at analyze time.
    pub hashes: Vec<String>,
    /// Unix timestamp of the analysis.
    pub timestamp: i64,
}

/// Which whitelist set an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhitelistSet {
    /// `mi:whitelist:email`.
    Email,
    /// `mi:whitelist:domain`.
    Domain,
}

impl WhitelistSet {
    fn key(self) -> &'static str {
        match self {
            WhitelistSet::Email => "mi:whitelist:email",
            WhitelistSet::Domain => "mi:whitelist:domain",
        }
    }
}

/// Hashes a message-id into the hex digest the spec's `mi:msgid:*` and
/// `mi:rpt:*` keys are keyed on.
pub fn hash_message_id(message_id: &str) -> String {
    use sha1::{Digest as _, Sha1};
    let mut hasher = Sha1::new();
    hasher.update(message_id.as_bytes());
    hex::encode(hasher.finalize())
}

/// A connected handle to the index store. Cheap to clone — internally an
/// `Arc`-backed connection manager that reconnects transparently.
#[derive(Clone)]
pub struct GuardianStore {
    conn: ConnectionManager,
}

impl GuardianStore {
    /// Opens a connection to `host:port`. Fatal at startup if unreachable —
    /// callers in `apps/sidecar` should treat a connect failure as a reason
    /// to exit, per the store-unavailable error policy.
    #[instrument(skip_all, fields(host, port))]
    pub async fn connect(host: &str, port: u16) -> Result<Self, StoreError> {
        let url = format!("redis://{host}:{port}");
        info!(%url, "connecting to index store");
        let client = redis::Client::open(url.as_str())
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;
        Ok(GuardianStore { conn })
    }

    // ---- Node identity & sync sequence -------------------------------

    /// Returns this node's stable identity, minting and persisting a fresh
    /// one on first boot.
    pub async fn node_id(&self) -> Result<Uuid, StoreError> {
        let mut conn = self.conn.clone();
        let existing: Option<String> = conn.get("mi_meta:id").await?;
        if let Some(raw) = existing {
            if let Ok(id) = Uuid::parse_str(&raw) {
                return Ok(id);
            }
        }
        let fresh = Uuid::new_v4();
        let _: () = conn.set("mi_meta:id", fresh.to_string()).await?;
        Ok(fresh)
    }

    /// Last sync sequence number this node applied.
    pub async fn current_seq(&self) -> Result<i64, StoreError> {
        let mut conn = self.conn.clone();
        let seq: Option<i64> = conn.get("mi_meta:v").await?;
        Ok(seq.unwrap_or(0))
    }

    /// Persists `seq` as the new sync checkpoint.
    pub async fn set_seq(&self, seq: i64) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set("mi_meta:v", seq).await?;
        Ok(())
    }

    // ---- Layer 1: exact oracle-decision cache ------------------------

    /// Reads the cached verdict for `digest`, if any.
    pub async fn get_oracle_cache(&self, digest: &str) -> Result<Option<CachedVerdict>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(format!("mi:oracle_cache:{digest}")).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Caches `verdict` for `digest`; TTL is 1 hour for spam verdicts, 5
    /// minutes otherwise.
    pub async fn set_oracle_cache(&self, digest: &str, verdict: &CachedVerdict) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let ttl = if verdict.action == "spam" {
            ORACLE_CACHE_SPAM_TTL_SECS
        } else {
            ORACLE_CACHE_NEGATIVE_TTL_SECS
        };
        let json = serde_json::to_string(verdict)?;
        let _: () = conn
            .set_ex(format!("mi:oracle_cache:{digest}"), json, ttl as u64)
            .await?;
        Ok(())
    }

    // ---- Generic LSH band operations ---------------------------------

    /// Pipelines `EXISTS <prefix><band>` for every band, returning the
    /// subset that exist.
    pub async fn exists_bands(&self, prefix: &str, bands: &[String]) -> Result<Vec<String>, StoreError> {
        if bands.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.conn.clone();
        let mut pipe = redis::pipe();
        for band in bands {
            pipe.cmd("EXISTS").arg(format!("{prefix}{band}"));
        }
        let flags: Vec<bool> = pipe.query_async(&mut conn).await?;
        Ok(bands
            .iter()
            .zip(flags)
            .filter_map(|(band, present)| present.then(|| band.clone()))
            .collect())
    }

    /// Pipelines `SMEMBERS <prefix><band>` over `bands`, deduping the
    /// union into one candidate set.
    pub async fn smembers_many(&self, prefix: &str, bands: &[String]) -> Result<HashSet<String>, StoreError> {
        if bands.is_empty() {
            return Ok(HashSet::new());
        }
        let mut conn = self.conn.clone();
        let mut pipe = redis::pipe();
        for band in bands {
            pipe.cmd("SMEMBERS").arg(format!("{prefix}{band}"));
        }
        let sets: Vec<Vec<String>> = pipe.query_async(&mut conn).await?;
        Ok(sets.into_iter().flatten().collect())
    }

    /// Adds `member` to the set at `<prefix><band>` and refreshes its TTL.
    pub async fn index_band(
        &self,
        prefix: &str,
        band: &str,
        member: &str,
        ttl_secs: usize,
    ) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let key = format!("{prefix}{band}");
        let _: () = conn.sadd(&key, member).await?;
        let _: () = conn.expire(&key, ttl_secs as i64).await?;
        Ok(())
    }

    /// Refreshes the TTL on `<prefix><band>` without modifying membership.
    pub async fn refresh_band_ttl(&self, prefix: &str, band: &str, ttl_secs: usize) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.expire(format!("{prefix}{band}"), ttl_secs as i64).await?;
        Ok(())
    }

    // ---- Local learning score -----------------------------------------

    /// Reads the learning score for `digest`; absent keys score 0.
    pub async fn get_score(&self, digest: &str) -> Result<i64, StoreError> {
        let mut conn = self.conn.clone();
        let score: Option<i64> = conn.get(format!("lg_s:{digest}")).await?;
        Ok(score.unwrap_or(0))
    }

    /// Adjusts the learning score for `digest` by `delta` (negative for
    /// ham corrections) and refreshes its sliding TTL.
    pub async fn adjust_score(&self, digest: &str, delta: i64, ttl_secs: usize) -> Result<i64, StoreError> {
        let mut conn = self.conn.clone();
        let key = format!("lg_s:{digest}");
        let new_score: i64 = conn.incr(&key, delta).await?;
        let _: () = conn.expire(&key, ttl_secs as i64).await?;
        Ok(new_score)
    }

    // ---- Report dedup & per-message scan record ------------------------

    /// Attempts to claim the duplicate-report suppression flag for
    /// `(mid_hash, report_type)`. Returns `true` the first time, `false`
    /// on every subsequent attempt inside the 24h window.
    pub async fn claim_report_dedup(&self, mid_hash: &str, report_type: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let key = format!("mi:rpt:{mid_hash}:{report_type}");
        let claimed: bool = conn.set_nx(&key, "1").await?;
        if claimed {
            let _: () = conn.expire(&key, REPORT_DEDUP_TTL_SECS as i64).await?;
        }
        Ok(claimed)
    }

    /// Loads the scan record written at analyze time for `mid_hash`.
    pub async fn get_scan_record(&self, mid_hash: &str) -> Result<Option<ScanRecord>, StoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(format!("mi:msgid:{mid_hash}")).await?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Persists the scan record for `mid_hash`, enabling a later `/report`
    /// to recover the signatures used at analyze time.
    pub async fn set_scan_record(&self, mid_hash: &str, record: &ScanRecord) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let json = serde_json::to_string(record)?;
        let _: () = conn
            .set_ex(format!("mi:msgid:{mid_hash}"), json, MSGID_RECORD_TTL_SECS as u64)
            .await?;
        Ok(())
    }

    // ---- Whitelist ------------------------------------------------------

    /// Adds `value` to the given whitelist set.
    pub async fn whitelist_add(&self, set: WhitelistSet, value: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.sadd(set.key(), value).await?;
        Ok(())
    }

    /// Removes `value` from the given whitelist set.
    pub async fn whitelist_remove(&self, set: WhitelistSet, value: &str) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: () = conn.srem(set.key(), value).await?;
        Ok(())
    }

    /// Lists every entry in the given whitelist set.
    pub async fn whitelist_members(&self, set: WhitelistSet) -> Result<Vec<String>, StoreError> {
        let mut conn = self.conn.clone();
        Ok(conn.smembers(set.key()).await?)
    }

    /// Checks whether `value` is present in the given whitelist set.
    pub async fn whitelist_contains(&self, set: WhitelistSet, value: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        Ok(conn.sismember(set.key(), value).await?)
    }

    // ---- Global oracle-known bands (mi_f:*) ----------------------------

    /// Pipelines `SET mi_f:<band> "1"` (no TTL) for every band in one
    /// round trip, per the sync worker's `UPDATE_DELTA` add ops.
    pub async fn set_global_bands(&self, bands: &[String]) -> Result<(), StoreError> {
        if bands.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        let mut pipe = redis::pipe();
        for band in bands {
            pipe.cmd("SET").arg(format!("mi_f:{band}")).arg("1");
        }
        let _: Vec<()> = pipe.query_async(&mut conn).await?;
        Ok(())
    }

    /// Pipelines `DEL mi_f:<band>` for every band in one round trip, per
    /// the sync worker's `UPDATE_DELTA` del ops.
    pub async fn del_global_bands(&self, bands: &[String]) -> Result<(), StoreError> {
        if bands.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        let mut pipe = redis::pipe();
        for band in bands {
            pipe.cmd("DEL").arg(format!("mi_f:{band}"));
        }
        let _: Vec<()> = pipe.query_async(&mut conn).await?;
        Ok(())
    }

    /// Clears every `mi_f:*` key, used when the oracle signals `RESET_DB`.
    pub async fn reset_global_bands(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg("mi_f:*")
                .arg("COUNT")
                .arg(500)
                .query_async(&mut conn)
                .await?;
            if !keys.is_empty() {
                let _: () = conn.del(&keys).await?;
            }
            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }
        let _: () = conn.set("mi_meta:v", 0i64).await?;
        warn!("global band index reset by oracle instruction");
        Ok(())
    }

    /// Pings the store; used at startup to fail fast when it is unreachable.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}
