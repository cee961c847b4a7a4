//! Filtering and multi-key sorting of generated combinations.
//!
//! Both operations are pure: they borrow the source combinations and return
//! a new ordered selection without mutating anything, so callers can
//! memoize on (source, filter state, sort state).

use std::cmp::Ordering;

use propmatrix_model::{FilterState, PropertyCombination, SortDirection, SortState};

/// True if `combination` passes every restricted dimension of `filters`.
pub fn passes(combination: &PropertyCombination, filters: &FilterState) -> bool {
    filters.iter().all(|(dimension, allowed)| {
        combination
            .get(dimension)
            .is_some_and(|value| allowed.contains(value))
    })
}

pub fn apply_filters<'a>(
    combinations: impl IntoIterator<Item = &'a PropertyCombination>,
    filters: &FilterState,
) -> Vec<&'a PropertyCombination> {
    combinations
        .into_iter()
        .filter(|combination| passes(combination, filters))
        .collect()
}

/// Stable multi-key sort; an empty sort state keeps input order.
pub fn apply_sort<'a>(
    combinations: impl IntoIterator<Item = &'a PropertyCombination>,
    sort: &SortState,
) -> Vec<&'a PropertyCombination> {
    let mut sorted: Vec<&PropertyCombination> = combinations.into_iter().collect();
    if !sort.is_empty() {
        sorted.sort_by(|a, b| compare(a, b, sort));
    }
    sorted
}

/// Filter then sort.
pub fn apply_view<'a>(
    combinations: &'a [PropertyCombination],
    filters: &FilterState,
    sort: &SortState,
) -> Vec<&'a PropertyCombination> {
    apply_sort(apply_filters(combinations, filters), sort)
}

/// Compares two combinations key by key, first non-equal result wins.
///
/// A missing value sorts before any present value.
pub fn compare(a: &PropertyCombination, b: &PropertyCombination, sort: &SortState) -> Ordering {
    for key in sort.keys() {
        let ordering = match (a.get(&key.field), b.get(&key.field)) {
            (Some(left), Some(right)) => left.sort_cmp(right),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        let ordering = match key.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use propmatrix_model::{Dimension, PropValue};

    use super::*;
    use crate::generator::generate;

    fn dimensions() -> Vec<Dimension> {
        vec![
            Dimension::boolean("disabled", "Disabled"),
            Dimension::new(
                "size",
                "Size",
                vec![
                    PropValue::text("sm"),
                    PropValue::text("md"),
                    PropValue::text("lg"),
                ],
            )
            .unwrap(),
        ]
    }

    fn labels(items: &[&PropertyCombination]) -> Vec<String> {
        items.iter().map(|c| c.label.clone()).collect()
    }

    #[test]
    fn filter_requires_every_restricted_dimension() {
        let dims = dimensions();
        let result = generate(&dims, 100);
        let mut filters = FilterState::new();
        filters
            .toggle_value(&dims[0], PropValue::Bool(true))
            .unwrap();
        filters
            .toggle_value(&dims[1], PropValue::text("lg"))
            .unwrap();

        let visible = apply_filters(&result.combinations, &filters);
        assert_eq!(labels(&visible), vec!["disabled, lg"]);
        assert_eq!(result.combinations.len(), 6);
    }

    #[test]
    fn descending_sort_then_ascending_tie_break() {
        let dims = dimensions();
        let result = generate(&dims, 100);
        let mut sort = SortState::new();
        sort.set_direction("disabled", SortDirection::Desc);
        sort.toggle("size");

        let sorted = apply_sort(&result.combinations, &sort);
        assert_eq!(
            labels(&sorted),
            vec![
                "disabled, lg",
                "disabled, md",
                "disabled, sm",
                "!disabled, lg",
                "!disabled, md",
                "!disabled, sm",
            ]
        );
    }

    #[test]
    fn ties_keep_input_order() {
        let dims = dimensions();
        let result = generate(&dims, 100);
        let mut sort = SortState::new();
        sort.toggle("size");

        let sorted = apply_sort(&result.combinations, &sort);
        let ordinals: Vec<usize> = sorted.iter().map(|c| c.ordinal).collect();
        // lg: 2, 5; md: 1, 4; sm: 0, 3
        assert_eq!(ordinals, vec![2, 5, 1, 4, 0, 3]);
    }
}
