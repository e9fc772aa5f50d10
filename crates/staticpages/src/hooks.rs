//! Lifecycle hooks around page writes.
//!
//! The page aggregate calls these directly at fixed points of a save. Only
//! `on_saving` can change the outcome: returning [`HookDecision::Reject`]
//! aborts the save before anything is validated or written.

use crate::page::StaticPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookDecision {
    Proceed,
    Reject,
}

pub trait PageHooks {
    /// Before validation; may veto the save.
    fn on_saving(&mut self, _page: &StaticPage) -> HookDecision {
        HookDecision::Proceed
    }

    /// After every locale row was written.
    fn on_saved(&mut self, _page: &StaticPage) {}

    /// Before a new row is inserted for `lang`; the page already carries its
    /// file name.
    fn on_creating(&mut self, _page: &StaticPage, _lang: &str) {}

    /// After a new row was inserted and the page was placed in the tree index.
    fn on_created(&mut self, _page: &StaticPage, _lang: &str) {}
}

/// Hooks that do nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl PageHooks for NoHooks {}
