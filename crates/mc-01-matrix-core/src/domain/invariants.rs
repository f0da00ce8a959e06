//! Domain invariants for the Matrix Core
//!
//! Pure checks over the store and registry. The service asserts them in debug
//! builds after every mutation; tests call them directly.

use super::entities::{MatrixStore, SessionRegistry};
use std::collections::HashSet;

/// INVARIANT-1: Uniform Width
/// Every stored row has exactly `column_width` values.
pub fn invariant_uniform_width(store: &MatrixStore) -> bool {
    match store.column_width() {
        None => store.row_count() == 0,
        Some(width) => store.rows().iter().all(|row| row.len() == width),
    }
}

/// INVARIANT-2: Dense Indices
/// Contributed indices cover `0..row_count` exactly once, and each client's
/// list is strictly increasing.
pub fn invariant_dense_indices(store: &MatrixStore, registry: &SessionRegistry) -> bool {
    let mut seen = HashSet::new();

    for (_, session) in registry.iter() {
        if session
            .contributed_rows
            .windows(2)
            .any(|pair| pair[0] >= pair[1])
        {
            return false;
        }

        for &index in &session.contributed_rows {
            if index >= store.row_count() || !seen.insert(index) {
                return false;
            }
        }
    }

    seen.len() == store.row_count()
}

/// INVARIANT-3: Attribution
/// Every stored row maps back to the session that lists it.
pub fn invariant_attribution(store: &MatrixStore, registry: &SessionRegistry) -> bool {
    (0..store.row_count()).all(|index| {
        registry
            .contributor_of(index)
            .and_then(|client| registry.session(client))
            .map(|session| session.contributed_rows.contains(&index))
            .unwrap_or(false)
    })
}

/// Check all invariants.
pub fn check_all_invariants(store: &MatrixStore, registry: &SessionRegistry) -> bool {
    invariant_uniform_width(store)
        && invariant_dense_indices(store, registry)
        && invariant_attribution(store, registry)
}
