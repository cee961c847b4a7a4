//! Cartesian-product generation over dimensions.
//!
//! Combinations are enumerated with a mixed-radix counter: one index per
//! dimension, the last dimension varying fastest. Enumeration stops at the
//! caller's limit; `total` always reports the full product size.

use indexmap::IndexMap;
use propmatrix_model::{
    Dimension, GenerationResult, MatrixConfig, NO_PROPS_LABEL, PropValue, PropertyCombination,
};
use tracing::debug;

/// Separator between formatted dimension values in a label.
pub const LABEL_SEPARATOR: &str = ", ";

const PREALLOCATE_MAX: usize = 4096;

/// Generates combinations with the default label length threshold.
pub fn generate(dimensions: &[Dimension], limit: usize) -> GenerationResult {
    generate_with(dimensions, limit, MatrixConfig::DEFAULT_LABEL_MAX_CHARS)
}

/// Generates combinations using the limit and label threshold from `config`.
pub fn generate_for(dimensions: &[Dimension], config: &MatrixConfig) -> GenerationResult {
    generate_with(dimensions, config.limit, config.label_max_chars)
}

pub fn generate_with(
    dimensions: &[Dimension],
    limit: usize,
    label_max_chars: usize,
) -> GenerationResult {
    if dimensions.is_empty() {
        return GenerationResult {
            combinations: vec![PropertyCombination {
                ordinal: 0,
                values: IndexMap::new(),
                label: NO_PROPS_LABEL.to_string(),
            }],
            total: 1,
            truncated: false,
            dimensions: Vec::new(),
        };
    }

    // Products beyond u64 are only ever reported as truncated.
    let total = dimensions
        .iter()
        .fold(1u64, |acc, dimension| acc.saturating_mul(dimension.len() as u64));
    let expected = usize::try_from(total)
        .unwrap_or(usize::MAX)
        .min(limit)
        .min(PREALLOCATE_MAX);

    let mut combinations = Vec::with_capacity(expected);
    let mut indices = vec![0usize; dimensions.len()];

    'enumerate: while combinations.len() < limit {
        combinations.push(build_combination(
            combinations.len(),
            dimensions,
            &indices,
            label_max_chars,
        ));

        let mut position = dimensions.len();
        loop {
            if position == 0 {
                break 'enumerate;
            }
            position -= 1;
            indices[position] += 1;
            if indices[position] < dimensions[position].len() {
                break;
            }
            indices[position] = 0;
        }
    }

    let truncated = (combinations.len() as u64) < total;
    debug!(
        produced = combinations.len(),
        total, truncated, limit, "generated combinations"
    );
    GenerationResult {
        combinations,
        total,
        truncated,
        dimensions: dimensions.to_vec(),
    }
}

fn build_combination(
    ordinal: usize,
    dimensions: &[Dimension],
    indices: &[usize],
    label_max_chars: usize,
) -> PropertyCombination {
    let mut values = IndexMap::with_capacity(dimensions.len());
    let mut parts = Vec::with_capacity(dimensions.len());
    for (dimension, &index) in dimensions.iter().zip(indices) {
        let value = &dimension.values()[index];
        parts.push(format_value(&dimension.name, value, label_max_chars));
        values.insert(dimension.name.clone(), value.clone());
    }
    PropertyCombination {
        ordinal,
        values,
        label: parts.join(LABEL_SEPARATOR),
    }
}

/// Formats one dimension value for a combination label.
///
/// `false` booleans render as `!name`, `true` as `name`; strings longer
/// than `max_chars` are cut and suffixed with an ellipsis.
pub fn format_value(name: &str, value: &PropValue, max_chars: usize) -> String {
    match value {
        PropValue::Bool(true) => name.to_string(),
        PropValue::Bool(false) => format!("!{name}"),
        PropValue::Text(text) if text.chars().count() > max_chars => {
            let mut cut: String = text.chars().take(max_chars).collect();
            cut.push('…');
            cut
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size() -> Dimension {
        Dimension::new(
            "size",
            "Size",
            vec![PropValue::text("sm"), PropValue::text("lg")],
        )
        .unwrap()
    }

    #[test]
    fn odometer_varies_last_dimension_fastest() {
        let result = generate(&[Dimension::boolean("disabled", "Disabled"), size()], 100);
        let labels: Vec<&str> = result.combinations.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "!disabled, sm",
                "!disabled, lg",
                "disabled, sm",
                "disabled, lg"
            ]
        );
        assert_eq!(result.total, 4);
        assert!(!result.truncated);
    }

    #[test]
    fn zero_dimensions_yield_single_empty_combination() {
        let result = generate(&[], 100);
        assert_eq!(result.total, 1);
        assert!(!result.truncated);
        assert_eq!(result.combinations.len(), 1);
        assert_eq!(result.combinations[0].label, NO_PROPS_LABEL);
        assert!(result.combinations[0].values.is_empty());
    }

    #[test]
    fn long_strings_are_shortened_in_labels() {
        assert_eq!(
            format_value("title", &PropValue::text("A rather long title"), 15),
            "A rather long t…"
        );
        assert_eq!(format_value("title", &PropValue::text("Short"), 15), "Short");
        assert_eq!(format_value("count", &PropValue::Number(3.0), 15), "3");
    }

    #[test]
    fn ordinals_follow_generation_order() {
        let result = generate(
            &[Dimension::boolean("a", "A"), Dimension::boolean("b", "B")],
            3,
        );
        let ordinals: Vec<usize> = result.combinations.iter().map(|c| c.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
        assert!(result.truncated);
    }
}
