//! Hash containers used by the cache, the definition and the resolver.

use core::any::TypeId;
use core::hash::BuildHasher;

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHashState

const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0x6D61_7070_6572_2D31);

/// Hash state with a fixed seed, so maps iterate identically across runs.
#[derive(Copy, Clone, Default, Debug)]
pub(crate) struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FoldHasher<'static>;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// Containers

pub(crate) type HashMap<K, V> = hashbrown::HashMap<K, V, FixedHashState>;
pub(crate) type HashSet<K> = hashbrown::HashSet<K, FixedHashState>;

pub(crate) type TypeIdMap<V> = HashMap<TypeId, V>;
pub(crate) type TypeIdSet = HashSet<TypeId>;
