use crate::rank::ClaimRank;
use serde::{Deserialize, Serialize};

/// Claim authorization primitives.
///
/// Semantics are intentionally strict:
/// - Every gated action belongs to exactly one `ClaimPermission` variant.
/// - Each permission carries a default minimum rank; a claimant override in
///   its profile replaces the default, it does not combine with it.
/// - Settings are claim-wide booleans, not per-actor: their fallback value
///   depends only on whether the governing claim is owned.
/// - A setting whose global toggle is off is never looked up on a claimant;
///   it short-circuits to the ownership-dependent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimPermission {
    /// Place or break blocks.
    Blocks,
    /// Open containers and take or store items.
    Storage,
    /// Use doors, gates, and buttons.
    Doors,
    /// Pick up dropped items.
    Pickup,
    /// Harvest and replant mature crops.
    Harvest,
    /// Attack, leash, or breed creatures.
    Creatures,
    /// Ride mounts and vehicles.
    Riding,
    /// Trade with resident villagers.
    Trading,
    /// Use warp points anchored in the claim.
    Warp,
}

impl ClaimPermission {
    /// All permissions, for profile seeding and exhaustive checks.
    pub const ALL: [ClaimPermission; 9] = [
        ClaimPermission::Blocks,
        ClaimPermission::Storage,
        ClaimPermission::Doors,
        ClaimPermission::Pickup,
        ClaimPermission::Harvest,
        ClaimPermission::Creatures,
        ClaimPermission::Riding,
        ClaimPermission::Trading,
        ClaimPermission::Warp,
    ];

    /// Minimum rank required when the claimant has not configured one.
    pub fn default_requirement(self) -> ClaimRank {
        match self {
            ClaimPermission::Blocks => ClaimRank::Ally,
            ClaimPermission::Storage => ClaimRank::Ally,
            ClaimPermission::Doors => ClaimRank::Guest,
            ClaimPermission::Pickup => ClaimRank::Ally,
            ClaimPermission::Harvest => ClaimRank::Guest,
            ClaimPermission::Creatures => ClaimRank::Ally,
            ClaimPermission::Riding => ClaimRank::Ally,
            ClaimPermission::Trading => ClaimRank::Guest,
            ClaimPermission::Warp => ClaimRank::Owner,
        }
    }
}

/// Claim-wide protection toggle with an ownership-dependent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimSetting {
    /// Players may damage each other.
    PlayerCombat,
    /// Explosions break blocks.
    ExplosionGriefing,
    /// Mobs pick up and break blocks.
    MobGriefing,
    /// Fire spreads between blocks.
    FireSpread,
    /// Harvested crops replant themselves.
    CropAutoReplant,
}

impl ClaimSetting {
    pub const ALL: [ClaimSetting; 5] = [
        ClaimSetting::PlayerCombat,
        ClaimSetting::ExplosionGriefing,
        ClaimSetting::MobGriefing,
        ClaimSetting::FireSpread,
        ClaimSetting::CropAutoReplant,
    ];

    /// Outcome when no claimant has explicitly configured the setting.
    /// Wilderness keeps vanilla behavior; claimed land protects by default.
    pub fn default_outcome(self, claimed: bool) -> bool {
        match self {
            ClaimSetting::PlayerCombat => !claimed,
            ClaimSetting::ExplosionGriefing => !claimed,
            ClaimSetting::MobGriefing => !claimed,
            ClaimSetting::FireSpread => !claimed,
            ClaimSetting::CropAutoReplant => claimed,
        }
    }
}
