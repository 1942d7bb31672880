//! Inline edit controller and its scoped document listeners.

mod controller;
pub mod listeners;

pub use controller::{
    CommitOutcome, EditContext, EditController, EditError, EditState, EditStep, EditTarget,
};
pub use listeners::{DocumentListeners, ListenerKind, Subscription};
