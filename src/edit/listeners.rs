//! Document-level listeners scoped to an edit session.
//!
//! A listener exists only as long as the [`Subscription`] token returned for
//! it; the token is not `Clone`, so whoever opened the session is the only one
//! able to end it.

use std::collections::BTreeMap;

pub type SubId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Clicks landing outside the edit surface.
    OutsideClick,
    /// Key presses anywhere in the document.
    KeyPress,
}

#[derive(Debug, PartialEq, Eq)]
#[must_use = "dropping a subscription token leaks the listener"]
pub struct Subscription {
    id: SubId,
    kind: ListenerKind,
}

impl Subscription {
    pub fn id(&self) -> SubId {
        self.id
    }

    pub fn kind(&self) -> ListenerKind {
        self.kind
    }
}

#[derive(Debug, Default)]
pub struct DocumentListeners {
    next_id: SubId,
    active: BTreeMap<SubId, ListenerKind>,
}

impl DocumentListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kind: ListenerKind) -> Subscription {
        let id = self.next_id;
        self.next_id += 1;
        self.active.insert(id, kind);
        Subscription { id, kind }
    }

    /// Ends the listener behind `subscription`. Returns `false` if it was
    /// already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.active.remove(&subscription.id).is_some()
    }

    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.active.values().any(|active| *active == kind)
    }

    pub fn listener_count(&self) -> usize {
        self.active.len()
    }
}
