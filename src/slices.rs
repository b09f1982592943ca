use crate::config::ClaimConfig;
use crate::position::COLUMNS_PER_CHUNK;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeSet;
use uuid::Uuid;

/// A contiguous vertical span within one column, owned by at most one
/// claimant. `upper >= lower`, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InnerClaim {
    pub owner: Option<Uuid>,
    pub upper: i32,
    pub lower: i32,
}

impl InnerClaim {
    pub fn new(owner: Option<Uuid>, upper: i32, lower: i32) -> Self {
        debug_assert!(upper >= lower);
        Self { owner, upper, lower }
    }

    pub fn contains(&self, y: i32) -> bool {
        self.lower <= y && y <= self.upper
    }

    fn intersects(&self, lower: i32, upper: i32) -> bool {
        self.lower <= upper && lower <= self.upper
    }
}

/// Vertical ownership partition of one block column: an ordered,
/// non-overlapping set of inner claims sorted by lower bound. Most columns
/// carry a single range, so the vector stays inline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSlice {
    claims: SmallVec<[InnerClaim; 2]>,
}

impl ClaimSlice {
    /// Installs `claim`, truncating or splitting any previously stored
    /// range it overlaps so the non-overlap invariant holds and the newest
    /// write wins over the full inserted span.
    pub fn set(&mut self, claim: InnerClaim) {
        let mut next: SmallVec<[InnerClaim; 2]> = SmallVec::new();
        for existing in self.claims.drain(..) {
            if !existing.intersects(claim.lower, claim.upper) {
                next.push(existing);
                continue;
            }
            if existing.lower < claim.lower {
                next.push(InnerClaim::new(existing.owner, claim.lower - 1, existing.lower));
            }
            if existing.upper > claim.upper {
                next.push(InnerClaim::new(existing.owner, existing.upper, claim.upper + 1));
            }
        }
        next.push(claim);
        next.sort_by_key(|c| c.lower);
        self.claims = next;
    }

    /// The inner claim covering height `y`, if any.
    pub fn get(&self, y: i32) -> Option<&InnerClaim> {
        self.claims.iter().find(|c| c.contains(y))
    }

    pub fn iter(&self) -> impl Iterator<Item = &InnerClaim> {
        self.claims.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn reset(&mut self) {
        self.claims.clear();
    }
}

/// Per-chunk store of 256 column slices, indexed by the position of the
/// column within the chunk. Dense by design: slice resolution sits on the
/// permission-check hot path.
#[derive(Debug, Clone)]
pub struct SliceStore {
    slices: Box<[Option<ClaimSlice>; COLUMNS_PER_CHUNK]>,
}

impl Default for SliceStore {
    fn default() -> Self {
        Self {
            slices: Box::new(std::array::from_fn(|_| None)),
        }
    }
}

impl SliceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs an owned range at `column`, normalizing `from`/`to` into
    /// `(upper, lower)`. A bound outside the world's vertical span makes
    /// the whole call a silent no-op; callers wanting feedback validate
    /// through `ClaimConfig::validate_heights` first.
    pub fn set_range(
        &mut self,
        config: &ClaimConfig,
        column: usize,
        owner: Option<Uuid>,
        from: i32,
        to: i32,
    ) {
        if column >= COLUMNS_PER_CHUNK {
            return;
        }
        if !config.height_valid(from) || !config.height_valid(to) {
            return;
        }
        let upper = from.max(to);
        let lower = from.min(to);
        self.slices[column]
            .get_or_insert_with(ClaimSlice::default)
            .set(InnerClaim::new(owner, upper, lower));
    }

    /// Deduplicated owners of every range intersecting the normalized span
    /// at `column`. Empty when the column has no slice.
    pub fn query_owners(&self, column: usize, from: i32, to: i32) -> BTreeSet<Uuid> {
        let mut owners = BTreeSet::new();
        let Some(slice) = self.slices.get(column).and_then(|s| s.as_ref()) else {
            return owners;
        };
        let upper = from.max(to);
        let lower = from.min(to);
        for claim in slice.iter() {
            if claim.intersects(lower, upper) {
                if let Some(owner) = claim.owner {
                    owners.insert(owner);
                }
            }
        }
        owners
    }

    /// Owner of the inner claim covering `(column, y)`, or `None` to defer
    /// to the chunk-level owner.
    pub fn resolve(&self, column: usize, y: i32) -> Option<Uuid> {
        self.slices
            .get(column)?
            .as_ref()?
            .get(y)
            .and_then(|claim| claim.owner)
    }

    /// The inner claim covering `(column, y)`, if any.
    pub fn claim_at(&self, column: usize, y: i32) -> Option<&InnerClaim> {
        self.slices.get(column)?.as_ref()?.get(y)
    }

    /// Clears every column unconditionally. Preserving a permanent region
    /// is the caller's job; the store does not special-case any owner.
    pub fn reset_all(&mut self) {
        for slice in self.slices.iter_mut().flatten() {
            slice.reset();
        }
    }

    /// Occupied columns and their slices, in index order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &ClaimSlice)> {
        self.slices
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|slice| (i, slice)))
            .filter(|(_, slice)| !slice.is_empty())
    }
}
