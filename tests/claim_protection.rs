use homestead::position::CHUNK_WIDTH;
use homestead::{
    BlockPos, ChunkPos, ClaimConfig, ClaimEngine, ClaimPermission, ClaimRank, ClaimSetting,
};
use uuid::Uuid;

fn pos_in(chunk: ChunkPos, x: i32, y: i32, z: i32) -> BlockPos {
    BlockPos::new(chunk.x * CHUNK_WIDTH + x, y, chunk.z * CHUNK_WIDTH + z)
}

#[test]
fn owner_is_permitted_everywhere_in_their_chunk() {
    let mut engine = ClaimEngine::default();
    let owner = Uuid::new_v4();
    let chunk = ChunkPos::new(4, 4);
    engine.claim(owner, chunk).expect("claim");

    for x in [0, 7, 15] {
        for z in [0, 8, 15] {
            for permission in ClaimPermission::ALL {
                assert!(
                    engine.can_perform(pos_in(chunk, x, 64, z), Some(owner), permission),
                    "owner denied {permission:?} at ({x}, {z})"
                );
            }
        }
    }
}

#[test]
fn stranger_is_denied_build_but_wilderness_is_open() {
    let mut engine = ClaimEngine::default();
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let chunk = ChunkPos::new(0, 0);
    engine.claim(owner, chunk).expect("claim");

    assert!(!engine.can_perform(pos_in(chunk, 5, 64, 5), Some(stranger), ClaimPermission::Blocks));
    // The neighboring chunk has no record at all: wilderness.
    let wild = pos_in(ChunkPos::new(1, 0), 5, 64, 5);
    assert!(engine.can_perform(wild, Some(stranger), ClaimPermission::Blocks));
}

#[test]
fn friend_list_changes_apply_to_later_checks_on_every_chunk() {
    let mut engine = ClaimEngine::default();
    let owner = Uuid::new_v4();
    let friend = Uuid::new_v4();
    let first = ChunkPos::new(0, 0);
    let second = ChunkPos::new(8, -3);
    engine.claim(owner, first).expect("claim first");
    engine.claim(owner, second).expect("claim second");

    let at_first = pos_in(first, 1, 64, 1);
    let at_second = pos_in(second, 1, 64, 1);
    assert!(!engine.can_perform(at_first, Some(friend), ClaimPermission::Storage));

    engine
        .players()
        .get(owner)
        .write()
        .set_friend_rank(friend, ClaimRank::Ally);
    assert!(engine.can_perform(at_first, Some(friend), ClaimPermission::Storage));
    assert!(engine.can_perform(at_second, Some(friend), ClaimPermission::Storage));
}

#[test]
fn raised_requirement_locks_out_previously_permitted_ranks() {
    let mut engine = ClaimEngine::default();
    let owner = Uuid::new_v4();
    let chunk = ChunkPos::new(2, 2);
    engine.claim(owner, chunk).expect("claim");
    let pos = pos_in(chunk, 3, 70, 3);
    let visitor = Uuid::new_v4();

    // Doors default to Guest, so a stranger passes.
    assert!(engine.can_perform(pos, Some(visitor), ClaimPermission::Doors));
    engine
        .players()
        .get(owner)
        .write()
        .set_permission_requirement(ClaimPermission::Doors, ClaimRank::Ally);
    assert!(!engine.can_perform(pos, Some(visitor), ClaimPermission::Doors));
}

#[test]
fn town_owner_bypasses_every_member_chunk() {
    let mut engine = ClaimEngine::default();
    let mayor = Uuid::new_v4();
    let member = Uuid::new_v4();
    let town = Uuid::new_v4();
    engine.towns().found_owned(town, mayor);
    engine.set_player_town(member, Some(town));

    let chunk = ChunkPos::new(-3, 6);
    engine.claim(member, chunk).expect("claim");
    assert_eq!(engine.town_of(chunk), Some(town));

    for permission in ClaimPermission::ALL {
        assert!(engine.can_perform(pos_in(chunk, 9, 64, 9), Some(mayor), permission));
    }
}

#[test]
fn leaving_a_town_removes_the_bypass_after_eviction() {
    let mut engine = ClaimEngine::default();
    let mayor = Uuid::new_v4();
    let member = Uuid::new_v4();
    let town = Uuid::new_v4();
    engine.towns().found_owned(town, mayor);
    engine.set_player_town(member, Some(town));

    let chunk = ChunkPos::new(1, -1);
    engine.claim(member, chunk).expect("claim");
    let pos = pos_in(chunk, 2, 64, 2);
    assert!(engine.can_perform(pos, Some(mayor), ClaimPermission::Blocks));

    engine.set_player_town(member, None);
    assert_eq!(engine.town_of(chunk), None);
    assert!(!engine.can_perform(pos, Some(mayor), ClaimPermission::Blocks));
}

#[test]
fn inner_range_transfers_governance_within_its_span() {
    let mut engine = ClaimEngine::default();
    let chunk_owner = Uuid::new_v4();
    let tenant = Uuid::new_v4();
    let chunk = ChunkPos::new(10, 10);
    engine.claim(chunk_owner, chunk).expect("claim");

    let inside = pos_in(chunk, 10, 30, 0);
    let above = pos_in(chunk, 10, 80, 0);
    engine.set_range(chunk, inside.column(), Some(tenant), 0, 60);

    assert_eq!(engine.owner_at(inside), Some(tenant));
    assert_eq!(engine.owner_at(above), Some(chunk_owner));
    assert!(engine.can_perform(inside, Some(tenant), ClaimPermission::Blocks));
    assert!(!engine.can_perform(inside, Some(chunk_owner), ClaimPermission::Blocks));
    assert!(engine.can_perform(above, Some(chunk_owner), ClaimPermission::Blocks));
}

#[test]
fn settings_follow_governing_claim_and_global_toggle() {
    let mut config = ClaimConfig::default();
    config.disabled_settings.insert(ClaimSetting::MobGriefing);
    let mut engine = ClaimEngine::new(config);
    let owner = Uuid::new_v4();
    let chunk = ChunkPos::new(0, 3);
    engine.claim(owner, chunk).expect("claim");
    let pos = pos_in(chunk, 4, 64, 4);

    // Disabled settings never consult the claimant.
    engine
        .players()
        .get(owner)
        .write()
        .set_protected_setting(ClaimSetting::MobGriefing, true);
    assert!(!engine.is_setting(pos, ClaimSetting::MobGriefing));

    // Enabled settings do.
    assert!(!engine.is_setting(pos, ClaimSetting::PlayerCombat));
    engine
        .players()
        .get(owner)
        .write()
        .set_protected_setting(ClaimSetting::PlayerCombat, true);
    assert!(engine.is_setting(pos, ClaimSetting::PlayerCombat));

    // Wilderness takes the unowned default.
    let wild = pos_in(ChunkPos::new(20, 20), 0, 64, 0);
    assert!(engine.is_setting(wild, ClaimSetting::PlayerCombat));
}

#[test]
fn claim_limits_are_enforced_per_configuration() {
    let mut engine = ClaimEngine::new(ClaimConfig {
        claim_limit: 2,
        default_chunk_limit: 2,
        ..ClaimConfig::default()
    });
    let actor = Uuid::new_v4();
    engine.claim(actor, ChunkPos::new(0, 0)).expect("first");
    engine.claim(actor, ChunkPos::new(0, 1)).expect("second");
    let err = engine.claim(actor, ChunkPos::new(0, 2)).unwrap_err();
    assert_eq!(err.code_str(), "limit_reached");

    // Releasing one frees capacity again.
    engine.unclaim(ChunkPos::new(0, 0)).expect("unclaim");
    engine.claim(actor, ChunkPos::new(0, 2)).expect("third");
}

#[test]
fn disabled_claiming_still_admits_the_spawn_identity() {
    let config = ClaimConfig {
        claim_limit: 0,
        ..ClaimConfig::default()
    };
    let spawn = config.spawn_owner;
    let mut engine = ClaimEngine::new(config);

    let err = engine.claim(Uuid::new_v4(), ChunkPos::new(0, 0)).unwrap_err();
    assert_eq!(err.code_str(), "limit_reached");
    engine.claim(spawn, ChunkPos::new(0, 0)).expect("spawn claim");
}

#[test]
fn resetting_ranges_keeps_ownership_and_spawn_ranges() {
    let mut engine = ClaimEngine::default();
    let spawn = engine.config().spawn_owner;
    let owner = Uuid::new_v4();
    let chunk = ChunkPos::new(12, 0);
    engine.claim(owner, chunk).expect("claim");

    let tenant_pos = pos_in(chunk, 5, 30, 5);
    let spawn_pos = pos_in(chunk, 9, 30, 9);
    engine.set_range(chunk, tenant_pos.column(), Some(Uuid::new_v4()), 0, 60);
    engine.set_range(chunk, spawn_pos.column(), Some(spawn), 0, 60);

    engine.reset_ranges(chunk);
    // Cleared ranges fall back to the chunk owner, who is untouched.
    assert_eq!(engine.owner_at(tenant_pos), Some(owner));
    assert_eq!(engine.owner_at(spawn_pos), Some(spawn));
}

#[test]
fn unclaim_clears_town_and_ranges_but_keeps_spawn_ranges() {
    let mut engine = ClaimEngine::default();
    let spawn = engine.config().spawn_owner;
    let owner = Uuid::new_v4();
    let town = Uuid::new_v4();
    engine.towns().found_owned(town, Uuid::new_v4());
    engine.set_player_town(owner, Some(town));

    let chunk = ChunkPos::new(6, 6);
    engine.claim(owner, chunk).expect("claim");
    let tenant_pos = pos_in(chunk, 3, 30, 3);
    let spawn_pos = pos_in(chunk, 8, 30, 8);
    engine.set_range(chunk, tenant_pos.column(), Some(Uuid::new_v4()), 0, 60);
    engine.set_range(chunk, spawn_pos.column(), Some(spawn), 0, 60);
    assert_eq!(engine.town_of(chunk), Some(town));

    engine.unclaim(chunk).expect("unclaim");
    assert_eq!(engine.town_of(chunk), None);
    assert_eq!(engine.owner_at(tenant_pos), None);
    assert_eq!(engine.owner_at(spawn_pos), Some(spawn));
}
