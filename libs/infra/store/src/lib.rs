// libs/infra/store/src/lib.rs
//! Persistence adapter over a Redis-compatible server: LSH band indexes at
//! three tiers (global oracle-known, oracle-cache, local-learning), the
//! scalar learning score, the exact oracle-decision cache, per-message scan
//! records, duplicate-report suppression and the whitelist sets.

pub mod client;
pub mod errors;

pub use client::{
    hash_message_id, CachedVerdict, GuardianStore, ScanRecord, WhitelistSet,
    MSGID_RECORD_TTL_SECS, ORACLE_CACHE_NEGATIVE_TTL_SECS, ORACLE_CACHE_SPAM_TTL_SECS,
    REPORT_DEDUP_TTL_SECS,
};
pub use errors::StoreError;
