use crate::config::ClaimConfig;
use crate::error::ClaimError;
use crate::slices::SliceStore;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use uuid::Uuid;

/// One persisted inner range. Ownerless ranges and ranges bottoming out at
/// the floor sentinel are placeholders and never serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerClaimRecord {
    pub owner: Uuid,
    pub upper: i32,
    pub lower: i32,
}

/// Persisted state of one occupied column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceRecord {
    /// Column index within the chunk, 0..256.
    pub index: u8,
    pub claims: Vec<InnerClaimRecord>,
}

/// Converts slice state to its persisted record list, in column order.
/// Reads are order-independent, so the order is only for stable output.
pub fn serialize_slices(config: &ClaimConfig, store: &SliceStore) -> Vec<SliceRecord> {
    let mut records = Vec::new();
    for (index, slice) in store.occupied() {
        let claims: Vec<InnerClaimRecord> = slice
            .iter()
            .filter_map(|claim| {
                let owner = claim.owner?;
                if claim.lower == config.floor_sentinel() {
                    return None;
                }
                Some(InnerClaimRecord {
                    owner,
                    upper: claim.upper,
                    lower: claim.lower,
                })
            })
            .collect();
        if !claims.is_empty() {
            records.push(SliceRecord {
                index: index as u8,
                claims,
            });
        }
    }
    records
}

/// Replays a record list into `store`. Ranges the store considers
/// out-of-world are dropped by its silent no-op; nothing aborts the load.
pub fn deserialize_slices(config: &ClaimConfig, store: &mut SliceStore, records: &[SliceRecord]) {
    for record in records {
        for claim in &record.claims {
            store.set_range(
                config,
                record.index as usize,
                Some(claim.owner),
                claim.lower,
                claim.upper,
            );
        }
    }
}

pub fn encode_records(records: &[SliceRecord]) -> Result<Vec<u8>, ClaimError> {
    serde_json::to_vec_pretty(records).map_err(|e| ClaimError::Encode(e.to_string()))
}

/// Best-effort decode of a persisted record list: the payload must be a
/// JSON array, but each malformed element inside it is skipped with a
/// warning rather than failing the whole load.
pub fn decode_records(bytes: &[u8]) -> Result<Vec<SliceRecord>, ClaimError> {
    let value: JsonValue =
        serde_json::from_slice(bytes).map_err(|e| ClaimError::Decode(e.to_string()))?;
    let JsonValue::Array(entries) = value else {
        return Err(ClaimError::Decode("claim records must be an array".into()));
    };
    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        match serde_json::from_value::<SliceRecord>(entry) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed claim record");
            }
        }
    }
    Ok(records)
}

/// Atomically persists one chunk's claim records: write to a temp file in
/// the target directory, then rename over the destination.
pub fn write_claims_file(path: &Path, records: &[SliceRecord]) -> Result<(), ClaimError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    let bytes = encode_records(records)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| ClaimError::Io(e.error))?;
    Ok(())
}

pub fn read_claims_file(path: &Path) -> Result<Vec<SliceRecord>, ClaimError> {
    let bytes = fs::read(path)?;
    decode_records(&bytes)
}
