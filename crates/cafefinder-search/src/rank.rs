//! Distance ranking of raw POI elements.

use std::collections::HashSet;

use cafefinder_core::{Coordinate, PlaceResult, PoiElement, ResultSet};

/// Measures every element against `center` and orders them nearest first.
///
/// Elements with no resolvable coordinate (a node without `lat`/`lon`, or a
/// way/relation without `center`) are skipped with a warning. When the same
/// element identity appears twice only the first occurrence is kept. Ties
/// keep input order.
#[must_use]
pub fn rank(elements: &[PoiElement], center: Coordinate) -> ResultSet {
    let mut seen = HashSet::with_capacity(elements.len());
    let mut places: Vec<PlaceResult> = elements
        .iter()
        .filter_map(|element| {
            let id = element.place_id();
            let Some(position) = element.position() else {
                tracing::warn!(%id, "skipping element without a resolvable coordinate");
                return None;
            };
            if !seen.insert(id) {
                tracing::debug!(%id, "skipping duplicate element");
                return None;
            }
            Some(PlaceResult::from_element(
                element,
                position,
                center.distance_to(&position),
            ))
        })
        .collect();

    places.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));
    ResultSet::from_sorted(places)
}
