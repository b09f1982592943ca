pub mod player;
pub mod town;

pub use player::ClaimantPlayer;
pub use town::ClaimantTown;

use crate::error::{ClaimError, ResourceType};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Shared handle to a claimant record. Chunks and permission evaluations
/// read through these; profile mutations (friend lists, requirements) are
/// immediately visible everywhere the handle is referenced.
pub type PlayerHandle = Arc<RwLock<ClaimantPlayer>>;
pub type TownHandle = Arc<RwLock<ClaimantTown>>;

/// Registry of player profiles, keyed by id with create-on-first-use
/// semantics: any reference to an unknown player materializes a default
/// profile rather than failing.
#[derive(Debug, Default)]
pub struct PlayerRegistry {
    players: RwLock<HashMap<Uuid, PlayerHandle>>,
    default_chunk_limit: u32,
}

impl PlayerRegistry {
    pub fn new(default_chunk_limit: u32) -> Self {
        Self {
            players: RwLock::new(HashMap::new()),
            default_chunk_limit,
        }
    }

    pub fn get(&self, id: Uuid) -> PlayerHandle {
        if let Some(handle) = self.players.read().get(&id) {
            return Arc::clone(handle);
        }
        let mut players = self.players.write();
        Arc::clone(players.entry(id).or_insert_with(|| {
            Arc::new(RwLock::new(ClaimantPlayer::new(id, self.default_chunk_limit)))
        }))
    }

    /// Restores an externally persisted profile, replacing any lazily
    /// created placeholder for the same id.
    pub fn insert(&self, profile: ClaimantPlayer) -> PlayerHandle {
        let handle = Arc::new(RwLock::new(profile));
        let id = handle.read().id;
        self.players.write().insert(id, Arc::clone(&handle));
        handle
    }

    pub fn len(&self) -> usize {
        self.players.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.read().is_empty()
    }
}

/// Registry of towns. Unlike players, towns are never created implicitly:
/// a lookup miss is a `NotFound` the caller decides how to treat.
#[derive(Debug, Default)]
pub struct TownRegistry {
    towns: RwLock<HashMap<Uuid, TownHandle>>,
}

impl TownRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn found(&self, id: Uuid) -> TownHandle {
        self.found_with(id, |_| {})
    }

    /// Founds a town, running `init` on the fresh record before it becomes
    /// visible. Founding an existing id returns the existing town.
    pub fn found_with(&self, id: Uuid, init: impl FnOnce(&mut ClaimantTown)) -> TownHandle {
        let mut towns = self.towns.write();
        Arc::clone(towns.entry(id).or_insert_with(|| {
            let mut town = ClaimantTown::new(id, Uuid::nil());
            init(&mut town);
            Arc::new(RwLock::new(town))
        }))
    }

    /// Founds a town owned by `owner`.
    pub fn found_owned(&self, id: Uuid, owner: Uuid) -> TownHandle {
        self.found_with(id, |town| town.owner = owner)
    }

    pub fn lookup(&self, id: Uuid) -> Result<TownHandle, ClaimError> {
        self.towns
            .read()
            .get(&id)
            .map(Arc::clone)
            .ok_or_else(|| ClaimError::NotFound {
                resource_type: ResourceType::Town,
                id: id.to_string(),
            })
    }

    pub fn remove(&self, id: Uuid) -> Option<TownHandle> {
        self.towns.write().remove(&id)
    }

    pub fn len(&self) -> usize {
        self.towns.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.towns.read().is_empty()
    }
}
