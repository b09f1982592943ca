use crate::permission::{ClaimPermission, ClaimSetting};
use crate::rank::ClaimRank;
use im::HashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-player claimant profile.
///
/// One record exists per player who has ever claimed land or been named in
/// a friend list. Records are shared across every chunk that references
/// them; a friend-list or requirement change is visible to the next
/// permission evaluation on any chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimantPlayer {
    pub id: Uuid,
    #[serde(default)]
    pub friends: HashMap<Uuid, ClaimRank>,
    /// Town this player belongs to, if any. Chunk town caches derive from
    /// this field on miss.
    #[serde(default)]
    pub town: Option<Uuid>,
    /// Number of chunks currently owned. Maintained by the engine's
    /// claim/unclaim paths, not by the chunk records themselves.
    #[serde(default)]
    pub claimed_chunks: u32,
    pub max_chunk_limit: u32,
    #[serde(default)]
    pub permission_requirements: HashMap<ClaimPermission, ClaimRank>,
    #[serde(default)]
    pub protected_settings: HashMap<ClaimSetting, bool>,
}

impl ClaimantPlayer {
    pub fn new(id: Uuid, max_chunk_limit: u32) -> Self {
        Self {
            id,
            friends: HashMap::new(),
            town: None,
            claimed_chunks: 0,
            max_chunk_limit,
            permission_requirements: HashMap::new(),
            protected_settings: HashMap::new(),
        }
    }

    /// Rank this claimant assigns to `player`. The claimant itself ranks
    /// `Owner`; anonymous actors and players without an entry rank `Guest`.
    pub fn friend_rank(&self, player: Option<Uuid>) -> ClaimRank {
        match player {
            Some(id) if id == self.id => ClaimRank::Owner,
            Some(id) => self.friends.get(&id).copied().unwrap_or_default(),
            None => ClaimRank::Guest,
        }
    }

    pub fn set_friend_rank(&mut self, player: Uuid, rank: ClaimRank) {
        self.friends.insert(player, rank);
    }

    pub fn remove_friend(&mut self, player: Uuid) {
        self.friends.remove(&player);
    }

    /// Minimum rank required to perform `permission` on this claimant's
    /// land; the per-action default applies when unconfigured.
    pub fn permission_requirement(&self, permission: ClaimPermission) -> ClaimRank {
        self.permission_requirements
            .get(&permission)
            .copied()
            .unwrap_or_else(|| permission.default_requirement())
    }

    pub fn set_permission_requirement(&mut self, permission: ClaimPermission, rank: ClaimRank) {
        self.permission_requirements.insert(permission, rank);
    }

    /// Value of `setting` on this claimant's land; falls back to the
    /// claimed-land default when unconfigured.
    pub fn protected_setting(&self, setting: ClaimSetting) -> bool {
        self.protected_settings
            .get(&setting)
            .copied()
            .unwrap_or_else(|| setting.default_outcome(true))
    }

    pub fn set_protected_setting(&mut self, setting: ClaimSetting, enabled: bool) {
        self.protected_settings.insert(setting, enabled);
    }
}
