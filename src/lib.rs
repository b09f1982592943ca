//! Chunk claim and permission engine for tile-partitioned worlds.
//!
//! The world is divided into 16x16 chunks, each independently claimable by
//! a player (and through them, a town) and vertically re-partitionable
//! into per-column owned ranges. [`ClaimEngine`] owns the chunk records,
//! the claimant registries, and the configuration, and answers the one
//! question external hooks care about: may this actor do this action at
//! this position?

pub mod chunk;
pub mod claimant;
pub mod config;
pub mod error;
pub mod permission;
pub mod persist;
pub mod position;
pub mod rank;
pub mod slices;

pub use chunk::ClaimedChunk;
pub use claimant::{ClaimantPlayer, ClaimantTown, PlayerRegistry, TownRegistry};
pub use config::ClaimConfig;
pub use error::{ClaimError, ClaimErrorCode};
pub use permission::{ClaimPermission, ClaimSetting};
pub use persist::SliceRecord;
pub use position::{BlockPos, ChunkPos};
pub use rank::ClaimRank;

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Persistence hook: notified whenever a chunk's claim state mutates so an
/// external save path can schedule it for writing.
pub trait DirtyListener: Send + Sync {
    fn chunk_dirty(&self, pos: ChunkPos);
}

/// The claim engine instance: configuration, claimant registries, and the
/// claimed-chunk map. All operations are synchronous in-memory lookups
/// driven by the world engine's update thread.
pub struct ClaimEngine {
    config: ClaimConfig,
    players: PlayerRegistry,
    towns: TownRegistry,
    chunks: HashMap<ChunkPos, ClaimedChunk>,
    dirty_listeners: Vec<Arc<dyn DirtyListener>>,
}

impl Default for ClaimEngine {
    fn default() -> Self {
        Self::new(ClaimConfig::default())
    }
}

impl ClaimEngine {
    pub fn new(config: ClaimConfig) -> Self {
        let players = PlayerRegistry::new(config.default_chunk_limit);
        Self {
            config,
            players,
            towns: TownRegistry::new(),
            chunks: HashMap::new(),
            dirty_listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &ClaimConfig {
        &self.config
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub fn towns(&self) -> &TownRegistry {
        &self.towns
    }

    pub fn register_dirty_listener(&mut self, listener: Arc<dyn DirtyListener>) {
        self.dirty_listeners.push(listener);
    }

    fn notify_dirty(&self, pos: ChunkPos) {
        for listener in &self.dirty_listeners {
            listener.chunk_dirty(pos);
        }
    }

    pub fn chunk(&self, pos: ChunkPos) -> Option<&ClaimedChunk> {
        self.chunks.get(&pos)
    }

    /// Whether `actor` could claim the chunk at `pos` right now. A chunk
    /// with no record yet is wilderness and only capacity rules apply.
    pub fn can_claim(&self, actor: Uuid, pos: ChunkPos) -> Result<(), ClaimError> {
        match self.chunks.get(&pos) {
            Some(chunk) => chunk.can_claim(&self.players, &self.config, actor),
            None => ClaimedChunk::new(pos).can_claim(&self.players, &self.config, actor),
        }
    }

    /// Claims the chunk for `actor`, pairing the ownership change with the
    /// profile's chunk counter as one operation from the caller's view.
    pub fn claim(&mut self, actor: Uuid, pos: ChunkPos) -> Result<(), ClaimError> {
        self.can_claim(actor, pos)?;
        self.chunks
            .entry(pos)
            .or_insert_with(|| ClaimedChunk::new(pos))
            .set_owner(&self.config, Some(actor));
        if actor != self.config.spawn_owner {
            self.players.get(actor).write().claimed_chunks += 1;
        }
        debug!(chunk = %pos, owner = %actor, "chunk claimed");
        self.notify_dirty(pos);
        Ok(())
    }

    /// Releases the chunk, returning its previous owner. Fails with a
    /// chunk `NotFound` when there is nothing to release.
    pub fn unclaim(&mut self, pos: ChunkPos) -> Result<Uuid, ClaimError> {
        let config = &self.config;
        let owner = self
            .chunks
            .get_mut(&pos)
            .and_then(|chunk| {
                let owner = chunk.owner()?;
                chunk.set_owner(config, None);
                Some(owner)
            })
            .ok_or_else(|| ClaimError::NotFound {
                resource_type: error::ResourceType::Chunk,
                id: pos.to_string(),
            })?;
        if owner != self.config.spawn_owner {
            let profile = self.players.get(owner);
            let mut profile = profile.write();
            profile.claimed_chunks = profile.claimed_chunks.saturating_sub(1);
        }
        debug!(chunk = %pos, owner = %owner, "chunk released");
        self.notify_dirty(pos);
        Ok(owner)
    }

    /// Explicitly overrides the chunk's town reference; an unknown town id
    /// is treated as "no town".
    pub fn set_town_owner(&mut self, pos: ChunkPos, town: Option<Uuid>) {
        let Some(chunk) = self.chunks.get_mut(&pos) else {
            return;
        };
        chunk.set_town(&self.towns, town);
        self.notify_dirty(pos);
    }

    /// Installs an owned vertical range at a column of the chunk.
    pub fn set_range(
        &mut self,
        pos: ChunkPos,
        column: usize,
        owner: Option<Uuid>,
        from: i32,
        to: i32,
    ) {
        self.chunks
            .entry(pos)
            .or_insert_with(|| ClaimedChunk::new(pos))
            .set_range(&self.config, column, owner, from, to);
        self.notify_dirty(pos);
    }

    /// Clears every vertical range in the chunk except ranges owned by
    /// the reserved spawn identity. The chunk-level owner is untouched.
    pub fn reset_ranges(&mut self, pos: ChunkPos) {
        let Some(chunk) = self.chunks.get_mut(&pos) else {
            return;
        };
        chunk.reset_ranges(&self.config);
        self.notify_dirty(pos);
    }

    /// Effective owner at a block position: inner range first, chunk owner
    /// as fallback, `None` in wilderness.
    pub fn owner_at(&self, pos: BlockPos) -> Option<Uuid> {
        self.chunks
            .get(&ChunkPos::containing(pos))
            .and_then(|chunk| chunk.owner_at(pos))
    }

    pub fn town_of(&self, pos: ChunkPos) -> Option<Uuid> {
        self.chunks
            .get(&pos)
            .and_then(|chunk| chunk.town_id(&self.players, &self.towns))
    }

    pub fn can_perform(
        &self,
        pos: BlockPos,
        actor: Option<Uuid>,
        permission: ClaimPermission,
    ) -> bool {
        match self.chunks.get(&ChunkPos::containing(pos)) {
            Some(chunk) => chunk.can_perform(&self.players, &self.towns, pos, actor, permission),
            // Wilderness permits everything.
            None => true,
        }
    }

    pub fn is_setting(&self, pos: BlockPos, setting: ClaimSetting) -> bool {
        match self.chunks.get(&ChunkPos::containing(pos)) {
            Some(chunk) => chunk.is_setting(&self.players, &self.config, pos, setting),
            None => setting.default_outcome(false),
        }
    }

    /// Moves a player between towns and eagerly evicts the stale town
    /// cache on every chunk that player owns. The per-chunk cache itself
    /// stays lazy; this is the one mutation path that must not serve the
    /// old town indefinitely.
    pub fn set_player_town(&mut self, player: Uuid, town: Option<Uuid>) {
        self.players.get(player).write().town = town;
        for chunk in self.chunks.values() {
            if chunk.owner() == Some(player) {
                chunk.invalidate_town();
            }
        }
    }

    pub fn serialize_chunk(&self, pos: ChunkPos) -> Vec<SliceRecord> {
        self.chunks
            .get(&pos)
            .map(|chunk| persist::serialize_slices(&self.config, chunk.slices()))
            .unwrap_or_default()
    }

    /// Restores a chunk's slice state from persisted records without
    /// marking it dirty.
    pub fn deserialize_chunk(&mut self, pos: ChunkPos, records: &[SliceRecord]) {
        self.chunks
            .entry(pos)
            .or_insert_with(|| ClaimedChunk::new(pos))
            .load_slices(&self.config, records);
    }

    /// Chunks mutated since their dirty flag was last cleared, and clears
    /// the flags. The persistence layer drains this once per save pass.
    pub fn drain_dirty(&mut self) -> Vec<ChunkPos> {
        let mut dirty = Vec::new();
        for (pos, chunk) in self.chunks.iter_mut() {
            if chunk.is_dirty() {
                chunk.clear_dirty();
                dirty.push(*pos);
            }
        }
        dirty.sort();
        dirty
    }
}
