use serde::{Deserialize, Serialize};

/// Trust level a claimant assigns to another player.
///
/// The derived ordering is the authorization order: `Enemy` is the lowest
/// trust, `Owner` the highest. Players with no friend entry rank `Guest`,
/// so `Enemy` exists to rank someone *below* a stranger.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum ClaimRank {
    Enemy,
    #[default]
    Guest,
    Ally,
    Owner,
}

impl ClaimRank {
    /// Whether an actor holding `actual` satisfies `self` as the required
    /// minimum rank for an action.
    pub fn can_perform(self, actual: ClaimRank) -> bool {
        actual >= self
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClaimRank::Enemy => "enemy",
            ClaimRank::Guest => "guest",
            ClaimRank::Ally => "ally",
            ClaimRank::Owner => "owner",
        }
    }
}

impl std::fmt::Display for ClaimRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::ClaimRank;

    #[test]
    fn rank_order_is_total() {
        assert!(ClaimRank::Enemy < ClaimRank::Guest);
        assert!(ClaimRank::Guest < ClaimRank::Ally);
        assert!(ClaimRank::Ally < ClaimRank::Owner);
    }

    #[test]
    fn can_perform_requires_at_least_the_required_rank() {
        assert!(ClaimRank::Guest.can_perform(ClaimRank::Guest));
        assert!(ClaimRank::Guest.can_perform(ClaimRank::Owner));
        assert!(!ClaimRank::Ally.can_perform(ClaimRank::Guest));
        assert!(!ClaimRank::Guest.can_perform(ClaimRank::Enemy));
    }

    #[test]
    fn missing_friend_entries_default_to_guest() {
        assert_eq!(ClaimRank::default(), ClaimRank::Guest);
    }
}
