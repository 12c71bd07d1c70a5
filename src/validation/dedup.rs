use crate::models::ParsedSpec;
use log::debug;
use std::collections::HashMap;

/// Keep one spec per (category, key), in first-seen order.
///
/// A later duplicate replaces the kept one only when it ranks strictly
/// higher: having a unit beats not having one, then the longer value wins.
/// Ties keep the earlier spec.
pub fn merge_duplicates(specs: Vec<ParsedSpec>) -> Vec<ParsedSpec> {
    let mut merged: Vec<ParsedSpec> = Vec::with_capacity(specs.len());
    let mut positions: HashMap<(String, String), usize> = HashMap::new();

    for spec in specs {
        let slot = (spec.category.clone(), spec.key.clone());
        match positions.get(&slot) {
            Some(&index) => {
                let kept = &merged[index];
                if rank(&spec) > rank(kept) {
                    debug!(
                        "Duplicate '{}' / '{}': '{}' replaces '{}'",
                        spec.category,
                        spec.key,
                        spec.display_value(),
                        kept.display_value()
                    );
                    merged[index] = spec;
                } else {
                    debug!(
                        "Duplicate '{}' / '{}': keeping '{}' over '{}'",
                        spec.category,
                        spec.key,
                        kept.display_value(),
                        spec.display_value()
                    );
                }
            }
            None => {
                positions.insert(slot, merged.len());
                merged.push(spec);
            }
        }
    }
    merged
}

fn rank(spec: &ParsedSpec) -> (bool, usize) {
    (spec.has_unit(), spec.value.chars().count())
}
