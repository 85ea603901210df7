//! Listener bookkeeping shared by the headless backends.

use bridge_traits::{error::Result, BridgeError, ListenerId};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

/// Keyed listener table handing out [`ListenerId`]s.
///
/// [`ListenerRegistry::snapshot`] clones the matching listeners so dispatch
/// happens with the table unlocked.
pub struct ListenerRegistry<K, L> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(ListenerId, K, L)>>,
}

impl<K, L> ListenerRegistry<K, L>
where
    K: PartialEq + Copy,
    L: Clone,
{
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            entries: Mutex::new(Vec::new()),
        }
    }

    pub fn add(&self, kind: K, listener: L) -> ListenerId {
        let id = ListenerId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.lock().push((id, kind, listener));
        id
    }

    pub fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|(entry_id, _, _)| *entry_id != id);
        entries.len() != before
    }

    /// Listeners registered for `kind`, in registration order.
    pub fn snapshot(&self, kind: K) -> Vec<L> {
        self.entries
            .lock()
            .iter()
            .filter(|(_, entry_kind, _)| *entry_kind == kind)
            .map(|(_, _, listener)| listener.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, L> Default for ListenerRegistry<K, L>
where
    K: PartialEq + Copy,
    L: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Commands a backend has been told to refuse.
#[derive(Default)]
pub(crate) struct Rejections {
    commands: Mutex<HashSet<String>>,
}

impl Rejections {
    pub(crate) fn reject(&self, command: &str) {
        self.commands.lock().insert(command.to_string());
    }

    pub(crate) fn allow(&self, command: &str) {
        self.commands.lock().remove(command);
    }

    pub(crate) fn check(&self, command: &str) -> Result<()> {
        if self.commands.lock().contains(command) {
            return Err(BridgeError::CommandRejected {
                command: command.to_string(),
                reason: "rejected by headless backend".to_string(),
            });
        }
        Ok(())
    }
}
