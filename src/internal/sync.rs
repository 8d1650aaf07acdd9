//! Lock and once-slot primitives, swapped by the `parking-lot` and
//! `once-cell` features.

#[cfg(feature = "once-cell")]
use once_cell::sync::OnceCell;

/// Mutex that never reports poisoning.
///
/// A panicking constructor never runs under the registry lock, so a poisoned
/// std mutex still guards consistent data and is recovered transparently.
pub(crate) struct Mutex<T> {
    #[cfg(feature = "parking-lot")]
    inner: parking_lot::Mutex<T>,
    #[cfg(not(feature = "parking-lot"))]
    inner: std::sync::Mutex<T>,
}

#[cfg(feature = "parking-lot")]
pub(crate) type MutexGuard<'a, T> = parking_lot::MutexGuard<'a, T>;
#[cfg(not(feature = "parking-lot"))]
pub(crate) type MutexGuard<'a, T> = std::sync::MutexGuard<'a, T>;

impl<T> Mutex<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            #[cfg(feature = "parking-lot")]
            inner: parking_lot::Mutex::new(value),
            #[cfg(not(feature = "parking-lot"))]
            inner: std::sync::Mutex::new(value),
        }
    }

    #[inline]
    pub(crate) fn lock(&self) -> MutexGuard<'_, T> {
        #[cfg(feature = "parking-lot")]
        {
            self.inner.lock()
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }
}

/// Write-once slot holding a handle-local singleton.
pub(crate) struct Slot<T> {
    #[cfg(feature = "once-cell")]
    cell: OnceCell<T>,
    #[cfg(not(feature = "once-cell"))]
    cell: Mutex<Option<T>>,
}

impl<T: Clone> Slot<T> {
    pub(crate) fn new(initial: Option<T>) -> Self {
        #[cfg(feature = "once-cell")]
        {
            let cell = OnceCell::new();
            if let Some(value) = initial {
                let _ = cell.set(value);
            }
            Self { cell }
        }
        #[cfg(not(feature = "once-cell"))]
        {
            Self { cell: Mutex::new(initial) }
        }
    }

    pub(crate) fn get(&self) -> Option<T> {
        #[cfg(feature = "once-cell")]
        {
            self.cell.get().cloned()
        }
        #[cfg(not(feature = "once-cell"))]
        {
            self.cell.lock().clone()
        }
    }

    /// Stores `value` unless the slot is already filled; returns the stored value.
    pub(crate) fn fill(&self, value: T) -> T {
        #[cfg(feature = "once-cell")]
        {
            self.cell.get_or_init(|| value).clone()
        }
        #[cfg(not(feature = "once-cell"))]
        {
            self.cell.lock().get_or_insert(value).clone()
        }
    }
}
