//! Internal implementation details.

pub(crate) mod guard;
pub(crate) mod sync;

pub(crate) use guard::construct_observed;
pub(crate) use sync::{Mutex, Slot};

#[cfg(feature = "ahash")]
pub(crate) type Map<K, V> = ahash::AHashMap<K, V>;
#[cfg(not(feature = "ahash"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;
