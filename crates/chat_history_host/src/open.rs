//! Connection-opening contract and the single-attempt guard around it.

use std::cell::Cell;

use crate::{ChatStore, ChatStoreFuture};

/// Opens a connected [`ChatStore`] handle, or reports the environment as unavailable.
///
/// Implementations never fail loudly: every detection, open, upgrade-block, or connectivity
/// failure resolves to `None`.
pub trait ChatStoreOpener {
    /// Connected handle type.
    type Store: ChatStore + Clone;

    /// Attempts to open the store.
    fn open(&self) -> ChatStoreFuture<'_, Option<Self::Store>>;
}

#[derive(Debug, Default)]
/// Records whether an open attempt has been made.
pub struct OpenGuard {
    attempted: Cell<bool>,
}

impl OpenGuard {
    /// Marks the attempt as started; returns `false` if one was already made.
    pub fn begin_attempt(&self) -> bool {
        !self.attempted.replace(true)
    }

    /// Whether an attempt has been made.
    pub fn attempted(&self) -> bool {
        self.attempted.get()
    }
}

#[derive(Debug, Default)]
/// Opener that delegates only its first call; every later call resolves to `None` without
/// retrying, whether or not the first attempt succeeded.
pub struct GuardedOpener<O> {
    inner: O,
    guard: OpenGuard,
}

impl<O> GuardedOpener<O> {
    /// Wraps `inner` with a fresh guard.
    pub fn new(inner: O) -> Self {
        Self {
            inner,
            guard: OpenGuard::default(),
        }
    }

    /// Whether the single open attempt has been spent.
    pub fn attempted(&self) -> bool {
        self.guard.attempted()
    }

    /// Returns the wrapped opener.
    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: ChatStoreOpener> ChatStoreOpener for GuardedOpener<O> {
    type Store = O::Store;

    fn open(&self) -> ChatStoreFuture<'_, Option<Self::Store>> {
        if !self.guard.begin_attempt() {
            return Box::pin(async { None });
        }
        self.inner.open()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use futures::executor::block_on;

    use super::*;
    use crate::MemoryChatStore;

    #[derive(Default)]
    struct CountingOpener {
        calls: Cell<u32>,
        succeed: bool,
    }

    impl ChatStoreOpener for CountingOpener {
        type Store = MemoryChatStore;

        fn open(&self) -> ChatStoreFuture<'_, Option<Self::Store>> {
            self.calls.set(self.calls.get() + 1);
            let succeed = self.succeed;
            Box::pin(async move { succeed.then(MemoryChatStore::default) })
        }
    }

    #[test]
    fn second_open_is_unavailable_after_success() {
        let opener = GuardedOpener::new(CountingOpener {
            succeed: true,
            ..CountingOpener::default()
        });

        assert!(block_on(opener.open()).is_some());
        assert!(block_on(opener.open()).is_none());
        assert_eq!(opener.inner().calls.get(), 1);
    }

    #[test]
    fn second_open_is_unavailable_after_failure() {
        let opener = GuardedOpener::new(CountingOpener::default());

        assert!(!opener.attempted());
        assert!(block_on(opener.open()).is_none());
        assert!(opener.attempted());
        assert!(block_on(opener.open()).is_none());
        assert_eq!(opener.inner().calls.get(), 1);
    }
}
