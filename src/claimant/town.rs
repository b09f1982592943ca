use crate::permission::ClaimPermission;
use crate::rank::ClaimRank;
use im::HashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-town claimant record.
///
/// Towns are created explicitly by a founding action and owned by the town
/// registry; chunk records only hold a recomputable weak reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimantTown {
    pub id: Uuid,
    /// Founding player. Always permitted on land claimed through the town.
    pub owner: Uuid,
    #[serde(default)]
    pub friends: HashMap<Uuid, ClaimRank>,
    /// Town-level minimum ranks. These gate the alternate town-friendship
    /// path, independently of the chunk claimant's own requirements.
    #[serde(default)]
    pub permission_requirements: HashMap<ClaimPermission, ClaimRank>,
}

impl ClaimantTown {
    pub fn new(id: Uuid, owner: Uuid) -> Self {
        Self {
            id,
            owner,
            friends: HashMap::new(),
            permission_requirements: HashMap::new(),
        }
    }

    pub fn friend_rank(&self, player: Option<Uuid>) -> ClaimRank {
        match player {
            Some(id) if id == self.owner => ClaimRank::Owner,
            Some(id) => self.friends.get(&id).copied().unwrap_or_default(),
            None => ClaimRank::Guest,
        }
    }

    pub fn set_friend_rank(&mut self, player: Uuid, rank: ClaimRank) {
        self.friends.insert(player, rank);
    }

    pub fn permission_requirement(&self, permission: ClaimPermission) -> ClaimRank {
        self.permission_requirements
            .get(&permission)
            .copied()
            .unwrap_or_else(|| permission.default_requirement())
    }

    pub fn set_permission_requirement(&mut self, permission: ClaimPermission, rank: ClaimRank) {
        self.permission_requirements.insert(permission, rank);
    }
}

#[cfg(test)]
mod tests {
    use super::ClaimantTown;
    use crate::rank::ClaimRank;
    use uuid::Uuid;

    #[test]
    fn town_owner_outranks_listed_friends() {
        let owner = Uuid::new_v4();
        let member = Uuid::new_v4();
        let mut town = ClaimantTown::new(Uuid::new_v4(), owner);
        town.set_friend_rank(member, ClaimRank::Ally);

        assert_eq!(town.friend_rank(Some(owner)), ClaimRank::Owner);
        assert_eq!(town.friend_rank(Some(member)), ClaimRank::Ally);
        assert_eq!(town.friend_rank(None), ClaimRank::Guest);
    }
}
