use crate::error::ClaimError;
use crate::permission::ClaimSetting;
use std::collections::HashSet;
use uuid::Uuid;

/// Runtime configuration for a claim engine instance.
#[derive(Debug, Clone)]
pub struct ClaimConfig {
    /// Global per-player claim limit. Negative means unlimited, zero
    /// disables claiming entirely, positive caps against each player's
    /// own `max_chunk_limit`.
    pub claim_limit: i64,
    /// `max_chunk_limit` seeded onto newly created player profiles.
    pub default_chunk_limit: u32,
    /// Reserved administrative identity. Chunks and ranges owned by it are
    /// permanent: they bypass the claim limit and survive owner resets.
    pub spawn_owner: Uuid,
    /// Lowest valid block height, inclusive.
    pub min_height: i32,
    /// Highest valid block height, exclusive.
    pub max_height: i32,
    /// Settings excluded from claimant evaluation; they always resolve to
    /// their ownership-dependent default.
    pub disabled_settings: HashSet<ClaimSetting>,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            claim_limit: 40,
            default_chunk_limit: 40,
            spawn_owner: Uuid::nil(),
            min_height: 0,
            max_height: 256,
            disabled_settings: HashSet::new(),
        }
    }
}

impl ClaimConfig {
    /// Profile with no per-player cap, for creative or admin worlds.
    pub fn unlimited() -> Self {
        Self {
            claim_limit: -1,
            ..Self::default()
        }
    }

    pub fn height_valid(&self, y: i32) -> bool {
        y >= self.min_height && y < self.max_height
    }

    /// Serialized ranges bottoming out at this height are placeholders,
    /// not claims, and are dropped by the serializer.
    pub fn floor_sentinel(&self) -> i32 {
        self.min_height - 1
    }

    pub fn setting_enabled(&self, setting: ClaimSetting) -> bool {
        !self.disabled_settings.contains(&setting)
    }

    /// Opt-in validation for callers that want feedback before calling the
    /// slice store, which silently ignores out-of-world ranges.
    pub fn validate_heights(&self, from: i32, to: i32) -> Result<(), ClaimError> {
        if self.height_valid(from) && self.height_valid(to) {
            Ok(())
        } else {
            Err(ClaimError::InvalidRange {
                lower: from.min(to),
                upper: from.max(to),
            })
        }
    }
}
