use crate::claimant::{ClaimantTown, PlayerRegistry, TownHandle, TownRegistry};
use crate::config::ClaimConfig;
use crate::error::ClaimError;
use crate::permission::{ClaimPermission, ClaimSetting};
use crate::position::{BlockPos, ChunkPos};
use crate::slices::{InnerClaim, SliceStore};
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use uuid::Uuid;

/// Claim state of one chunk: the player owner, the lazily cached town
/// reference, and the per-column vertical range store.
///
/// A chunk record is mutated and queried from the world engine's single
/// update thread. The town cache cell is the one interior-mutable piece so
/// read-only permission checks can populate it on miss.
#[derive(Debug)]
pub struct ClaimedChunk {
    pos: ChunkPos,
    slices: SliceStore,
    owner: Option<Uuid>,
    /// `None` means "not computed"; a dead `Weak` means the cached town was
    /// dropped from the registry and the chunk reads as townless until the
    /// cache is invalidated. Recompute happens only on `None`.
    town: RwLock<Option<Weak<RwLock<ClaimantTown>>>>,
    dirty: bool,
}

/// Where the town of the governing claimant comes from during evaluation:
/// the chunk-level cache, or a fresh derivation from an inner-claim
/// owner's profile.
enum TownSource {
    ChunkCache,
    OwnerProfile,
}

impl ClaimedChunk {
    pub fn new(pos: ChunkPos) -> Self {
        Self {
            pos,
            slices: SliceStore::new(),
            owner: None,
            town: RwLock::new(None),
            dirty: false,
        }
    }

    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    /// Chunk-level player owner; `None` is wilderness.
    pub fn owner(&self) -> Option<Uuid> {
        self.owner
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    pub fn slices(&self) -> &SliceStore {
        &self.slices
    }

    /// Sets or clears the player owner. Clearing also clears the town
    /// cache and resets every column's ranges, preserving ranges owned by
    /// the reserved spawn identity since the store itself does not
    /// special-case them.
    pub fn set_owner(&mut self, config: &ClaimConfig, owner: Option<Uuid>) {
        self.owner = owner;
        self.dirty = true;
        if owner.is_none() {
            self.reset_ranges(config);
            *self.town.get_mut() = None;
        }
    }

    /// Clears every column's ranges except those owned by the reserved
    /// spawn identity, which are collected and reinstalled around the
    /// store's unconditional reset. Marks dirty.
    pub fn reset_ranges(&mut self, config: &ClaimConfig) {
        let keep: Vec<(usize, InnerClaim)> = self
            .slices
            .occupied()
            .flat_map(|(column, slice)| {
                slice
                    .iter()
                    .filter(|claim| claim.owner == Some(config.spawn_owner))
                    .map(move |claim| (column, *claim))
            })
            .collect();
        self.slices.reset_all();
        for (column, claim) in keep {
            self.slices
                .set_range(config, column, claim.owner, claim.lower, claim.upper);
        }
        self.dirty = true;
    }

    /// Explicit town override. A registry miss is swallowed and logged;
    /// the chunk is then treated as townless until the next recompute.
    pub fn set_town(&mut self, towns: &TownRegistry, town: Option<Uuid>) {
        let handle = town.and_then(|id| match towns.lookup(id) {
            Ok(handle) => Some(handle),
            Err(_) => {
                tracing::warn!(town = %id, chunk = %self.pos, "town override for unknown town");
                None
            }
        });
        *self.town.get_mut() = handle.as_ref().map(Arc::downgrade);
        self.dirty = true;
    }

    /// Town governing this chunk. Derived from the owner profile's town
    /// membership on cache miss and cached; a populated cache is returned
    /// as-is, so external membership changes are observed lazily (callers
    /// that need eager eviction use `invalidate_town`).
    pub fn town(&self, players: &PlayerRegistry, towns: &TownRegistry) -> Option<TownHandle> {
        let owner = self.owner?;
        if let Some(cached) = self.town.read().as_ref() {
            return cached.upgrade();
        }
        let town_id = players.get(owner).read().town?;
        match towns.lookup(town_id) {
            Ok(handle) => {
                *self.town.write() = Some(Arc::downgrade(&handle));
                Some(handle)
            }
            Err(_) => {
                tracing::warn!(town = %town_id, owner = %owner, "chunk owner references unknown town");
                None
            }
        }
    }

    pub fn town_id(&self, players: &PlayerRegistry, towns: &TownRegistry) -> Option<Uuid> {
        self.town(players, towns).map(|town| town.read().id)
    }

    /// Drops the cached town reference so the next query recomputes it.
    pub fn invalidate_town(&self) {
        *self.town.write() = None;
    }

    /// Installs an owned vertical range at `column`, superseding prior
    /// coverage there. Out-of-world bounds are a silent no-op.
    pub fn set_range(
        &mut self,
        config: &ClaimConfig,
        column: usize,
        owner: Option<Uuid>,
        from: i32,
        to: i32,
    ) {
        self.slices.set_range(config, column, owner, from, to);
        self.dirty = true;
    }

    /// Replays persisted slice records into this chunk without marking it
    /// dirty; used when loading, not when mutating.
    pub fn load_slices(&mut self, config: &ClaimConfig, records: &[crate::persist::SliceRecord]) {
        crate::persist::deserialize_slices(config, &mut self.slices, records);
    }

    /// Effective owner at a position: the covering inner claim's owner if
    /// one exists, else the chunk-level owner.
    pub fn owner_at(&self, pos: BlockPos) -> Option<Uuid> {
        self.slices.resolve(pos.column(), pos.y).or(self.owner)
    }

    /// Whether `actor` may perform `permission` at `pos`.
    ///
    /// Resolution order: governing claim (inner range, else chunk), then
    /// wilderness/owner short-circuit, town-owner bypass, the governing
    /// claimant's rank requirement, and finally the town-friendship path
    /// when the claimant is itself the town's owner.
    pub fn can_perform(
        &self,
        players: &PlayerRegistry,
        towns: &TownRegistry,
        pos: BlockPos,
        actor: Option<Uuid>,
        permission: ClaimPermission,
    ) -> bool {
        match self.slices.resolve(pos.column(), pos.y) {
            Some(inner) => self.evaluate(
                players,
                towns,
                Some(inner),
                TownSource::OwnerProfile,
                actor,
                permission,
            ),
            None => self.evaluate(
                players,
                towns,
                self.owner,
                TownSource::ChunkCache,
                actor,
                permission,
            ),
        }
    }

    fn evaluate(
        &self,
        players: &PlayerRegistry,
        towns: &TownRegistry,
        owner: Option<Uuid>,
        town_source: TownSource,
        actor: Option<Uuid>,
        permission: ClaimPermission,
    ) -> bool {
        let Some(owner_id) = owner else {
            // Wilderness permits everything.
            return true;
        };
        if actor == Some(owner_id) {
            return true;
        }

        let town = match town_source {
            TownSource::ChunkCache => self.town(players, towns),
            TownSource::OwnerProfile => players
                .get(owner_id)
                .read()
                .town
                .and_then(|id| towns.lookup(id).ok()),
        };
        if let Some(town) = &town {
            if actor == Some(town.read().owner) {
                return true;
            }
        }

        let profile = players.get(owner_id);
        let (actor_rank, required) = {
            let profile = profile.read();
            (
                profile.friend_rank(actor),
                profile.permission_requirement(permission),
            )
        };
        if required.can_perform(actor_rank) {
            return true;
        }

        // Town friendship is an alternate path only when the governing
        // claimant is the town's own founding player.
        if let Some(town) = &town {
            let town = town.read();
            if town.owner == owner_id
                && town
                    .permission_requirement(permission)
                    .can_perform(town.friend_rank(actor))
            {
                return true;
            }
        }
        false
    }

    /// Value of a claim setting at `pos`. Settings disabled in the config
    /// never consult a claimant: they resolve straight to the
    /// ownership-dependent default of the governing claim.
    pub fn is_setting(
        &self,
        players: &PlayerRegistry,
        config: &ClaimConfig,
        pos: BlockPos,
        setting: ClaimSetting,
    ) -> bool {
        let governing = self.owner_at(pos);
        if !config.setting_enabled(setting) {
            return setting.default_outcome(governing.is_some());
        }
        match governing {
            Some(owner) => players.get(owner).read().protected_setting(setting),
            None => setting.default_outcome(false),
        }
    }

    /// Whether `actor` may claim this chunk, per the capacity rules.
    pub fn can_claim(
        &self,
        players: &PlayerRegistry,
        config: &ClaimConfig,
        actor: Uuid,
    ) -> Result<(), ClaimError> {
        if self.owner.is_some() {
            return Err(ClaimError::AlreadyClaimed { chunk: self.pos });
        }
        if actor == config.spawn_owner {
            return Ok(());
        }
        let profile = players.get(actor);
        let (count, max) = {
            let profile = profile.read();
            (profile.claimed_chunks, profile.max_chunk_limit)
        };
        if config.claim_limit == 0 {
            return Err(ClaimError::LimitReached { count, limit: 0 });
        }
        if config.claim_limit > 0 && count + 1 > max {
            return Err(ClaimError::LimitReached { count, limit: max });
        }
        Ok(())
    }
}
