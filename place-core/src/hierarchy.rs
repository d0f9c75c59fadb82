//! # Hierarchy oracle
//!
//! Places form a containment DAG via `located_in_id` (primary parent) and
//! `also_located_in_ids` (secondary parents). This module answers
//! "is `candidate` contained in any of `ancestors`?" and the two bulk
//! operations the level matcher and scorer build on top of it.
//!
//! The containment graph is documented as acyclic (`spec.md` §3), but the
//! walk still bounds its own depth so malformed source data can't hang the
//! engine — see `spec.md` §9.

use std::collections::HashSet;

use crate::model::MAX_LEVELS;
use crate::store::GazetteerStore;

/// Recursion depth bound: `MAX_LEVELS` hierarchy hops should never be
/// exceeded by well-formed data, so a small multiple gives headroom for
/// secondary-parent fan-out without allowing an unbounded walk.
const MAX_WALK_DEPTH: usize = MAX_LEVELS as usize * 4;

/// `true` if `candidate_id` is contained, at any depth, in `ancestors`.
/// Walks `located_in_id` and every `also_located_in_id` upward. A
/// `located_in_id` of `0` terminates that branch.
pub fn is_ancestor(store: &dyn GazetteerStore, candidate_id: i64, ancestors: &HashSet<i64>) -> bool {
    let mut visited = HashSet::new();
    walk(store, candidate_id, ancestors, &mut visited, 0)
}

fn walk(
    store: &dyn GazetteerStore,
    id: i64,
    ancestors: &HashSet<i64>,
    visited: &mut HashSet<i64>,
    depth: usize,
) -> bool {
    if depth >= MAX_WALK_DEPTH || !visited.insert(id) {
        return false;
    }
    let Some(place) = store.place(id) else {
        return false;
    };

    let mut parents = Vec::with_capacity(1 + place.also_located_in_ids.len());
    if place.located_in_id != 0 {
        parents.push(place.located_in_id);
    }
    parents.extend(place.also_located_in_ids.iter().copied());

    for parent in parents {
        if ancestors.contains(&parent) {
            return true;
        }
        if walk(store, parent, ancestors, visited, depth + 1) {
            return true;
        }
    }
    false
}

/// Keeps only the `children` that are descendants of some place in
/// `parents`. Order is preserved.
pub fn filter_subplaces(store: &dyn GazetteerStore, children: &[i64], parents: &HashSet<i64>) -> Vec<i64> {
    children
        .iter()
        .copied()
        .filter(|&c| is_ancestor(store, c, parents))
        .collect()
}

/// Drops every id that is a descendant of another id in the same set.
///
/// Matches the reference behavior of comparing each id against the *full*
/// set, including itself (`spec.md` §9): since `is_ancestor` only walks
/// strictly upward, an id can never be its own ancestor, so self-inclusion
/// in the comparison set is harmless.
pub fn remove_children(store: &dyn GazetteerStore, ids: &[i64]) -> Vec<i64> {
    let all: HashSet<i64> = ids.iter().copied().collect();
    ids.iter()
        .copied()
        .filter(|&id| !is_ancestor(store, id, &all))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Place, Source};
    use crate::store::InMemoryStore;

    fn place(id: i64, located_in_id: i64, also: Vec<i64>, level: u8) -> Place {
        Place {
            id,
            name: format!("place-{id}"),
            alt_names: vec![],
            types: vec![],
            located_in_id,
            also_located_in_ids: also,
            level,
            country_id: 1500,
            latitude: 0.0,
            longitude: 0.0,
            sources: vec![Source { text: "test".into(), id: None }],
        }
    }

    fn store_with(places: Vec<Place>) -> InMemoryStore {
        InMemoryStore::from_places(places, Default::default())
    }

    #[test]
    fn walks_primary_parent_chain() {
        let store = store_with(vec![
            place(1, 0, vec![], 1),
            place(2, 1, vec![], 2),
            place(3, 2, vec![], 3),
        ]);
        let ancestors: HashSet<i64> = [1].into_iter().collect();
        assert!(is_ancestor(&store, 3, &ancestors));
        assert!(!is_ancestor(&store, 1, &ancestors.iter().copied().filter(|&x| x != 1).collect()));
    }

    #[test]
    fn walks_secondary_parent() {
        let store = store_with(vec![
            place(1, 0, vec![], 1),
            place(2, 0, vec![], 1),
            place(3, 1, vec![2], 2),
        ]);
        let ancestors: HashSet<i64> = [2].into_iter().collect();
        assert!(is_ancestor(&store, 3, &ancestors));
    }

    #[test]
    fn terminates_on_cycle() {
        // Malformed data: 1 -> 2 -> 1. Must not hang.
        let store = store_with(vec![place(1, 2, vec![], 2), place(2, 1, vec![], 2)]);
        let ancestors: HashSet<i64> = [99].into_iter().collect();
        assert!(!is_ancestor(&store, 1, &ancestors));
    }

    #[test]
    fn remove_children_drops_descendants() {
        let store = store_with(vec![
            place(1, 0, vec![], 2),
            place(2, 1, vec![], 3),
            place(3, 0, vec![], 2),
        ]);
        let mut remaining = remove_children(&store, &[1, 2, 3]);
        remaining.sort();
        assert_eq!(remaining, vec![1, 3]);
    }
}
