//! ctxhelp-core/src/resolver.rs
//!
//! Picks the single most specific help entry for a page context.
//!
//! Specificity, best first:
//!   1. exact action + exact property
//!   2. any action (stored action empty) + exact property
//!   3. exact action, page-level (no property)
//!   4. controller-wide page-level entry
//!
//! Entries that tie on all of the above are ordered by lowest id.

use ctxhelp_common::models::context_help::normalize_key;
use ctxhelp_common::models::{ContextHelp, HelpQuery};

/// Ascending rank key; lower is more specific.
fn specificity(ch: &ContextHelp) -> (u8, u8, i32) {
    (
        if ch.has_property() { 0 } else { 1 },
        if ch.has_action() { 0 } else { 1 },
        ch.context_help_id,
    )
}

/// Whether `ch` is a candidate for `query` at all.
pub fn matches(query: &HelpQuery, ch: &ContextHelp) -> bool {
    if ch.controller != query.controller() {
        return false;
    }

    // A stored action restricts the entry to that action; no stored action means any.
    let action_ok = match normalize_key(ch.action.as_deref()) {
        None => true,
        Some(stored) => query.action() == Some(stored.as_str()),
    };
    if !action_ok {
        return false;
    }

    // Property must match exactly, absent == absent.
    normalize_key(ch.property.as_deref()).as_deref() == query.property()
}

/// Returns the best entry for `query`, or `None` when nothing applies.
pub fn resolve<'a, I>(query: &HelpQuery, candidates: I) -> Option<&'a ContextHelp>
where
    I: IntoIterator<Item = &'a ContextHelp>,
{
    candidates
        .into_iter()
        .filter(|ch| matches(query, ch))
        .min_by_key(|ch| specificity(ch))
}

pub fn resolve_owned(query: &HelpQuery, candidates: &[ContextHelp]) -> Option<ContextHelp> {
    resolve(query, candidates).cloned()
}

/// Every matching entry, best first. `rank(..).first()` is what [`resolve`] returns.
pub fn rank<'a, I>(query: &HelpQuery, candidates: I) -> Vec<&'a ContextHelp>
where
    I: IntoIterator<Item = &'a ContextHelp>,
{
    let mut survivors: Vec<&ContextHelp> = candidates
        .into_iter()
        .filter(|ch| matches(query, ch))
        .collect();
    survivors.sort_by_key(|ch| specificity(ch));
    survivors
}
