use crate::models::{ParsedSpec, SpecificationMapping};
use log::debug;

/// Fold deduplicated specs into the category -> key -> display value map.
///
/// Only categories that received at least one spec appear.
pub fn assemble(specs: &[ParsedSpec]) -> SpecificationMapping {
    let mut mapping = SpecificationMapping::new();
    for spec in specs {
        mapping
            .entry(spec.category.clone())
            .or_default()
            .insert(spec.key.clone(), spec.display_value());
    }
    debug!(
        "Assembled {} specs into {} categories",
        specs.len(),
        mapping.len()
    );
    mapping
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_groups_by_category() {
        let specs = vec![
            ParsedSpec::new("Двигатель", "Мощность", "110", Some("кВт".to_string())),
            ParsedSpec::new("Двигатель", "Модель", "Cummins QSB6.7", None),
            ParsedSpec::new("Вес", "Масса", "20000", Some("кг".to_string())),
        ];
        let mapping = assemble(&specs);
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping["Двигатель"]["Мощность"], "110 кВт");
        assert_eq!(mapping["Двигатель"]["Модель"], "Cummins QSB6.7");
        assert_eq!(mapping["Вес"]["Масса"], "20000 кг");
    }

    #[test]
    fn test_empty_input_gives_empty_mapping() {
        assert!(assemble(&[]).is_empty());
    }
}
