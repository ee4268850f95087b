use serde::{Deserialize, Serialize};

use super::Nutrient;

/// Fixed-shape nutrient values for one food item. Every field is always
/// present; a nutrient missing from the upstream payload normalizes to 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientProfile {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub vitamins: Vitamins,
    pub minerals: Minerals,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitamins {
    pub a: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Minerals {
    pub iron: f64,
    pub calcium: f64,
    pub potassium: f64,
}

/// How one profile field is pulled out of the loosely-named upstream
/// vocabulary. Macros match the exact upstream spelling; vitamins and
/// minerals match any name containing the marker, so qualified entries
/// like "Vitamin A, RAE" still resolve.
#[derive(Debug, Clone, Copy)]
enum Rule {
    Exact(&'static str),
    Contains(&'static str),
}

const CALORIES: Rule = Rule::Exact("Energy");
const PROTEIN: Rule = Rule::Exact("Protein");
const CARBS: Rule = Rule::Exact("Carbohydrate, by difference");
const FAT: Rule = Rule::Exact("Total lipid (fat)");
const FIBER: Rule = Rule::Exact("Fiber, total dietary");
const VITAMIN_A: Rule = Rule::Contains("Vitamin A");
const VITAMIN_C: Rule = Rule::Contains("Vitamin C");
const VITAMIN_D: Rule = Rule::Contains("Vitamin D");
const VITAMIN_E: Rule = Rule::Contains("Vitamin E");
const IRON: Rule = Rule::Contains("Iron");
const CALCIUM: Rule = Rule::Contains("Calcium");
const POTASSIUM: Rule = Rule::Contains("Potassium");

impl Rule {
    /// First match in payload order wins; no match yields 0.
    fn extract(self, payload: &[Nutrient]) -> f64 {
        payload
            .iter()
            .find(|n| match self {
                Rule::Exact(marker) => n.name == marker,
                Rule::Contains(marker) => n.name.contains(marker),
            })
            .map(|n| n.value.max(0.0))
            .unwrap_or(0.0)
    }
}

/// Total over all well-formed payloads: never fails, always returns every
/// field of the profile.
pub fn normalize(payload: &[Nutrient]) -> NutrientProfile {
    NutrientProfile {
        calories: CALORIES.extract(payload),
        protein: PROTEIN.extract(payload),
        carbs: CARBS.extract(payload),
        fat: FAT.extract(payload),
        fiber: FIBER.extract(payload),
        vitamins: Vitamins {
            a: VITAMIN_A.extract(payload),
            c: VITAMIN_C.extract(payload),
            d: VITAMIN_D.extract(payload),
            e: VITAMIN_E.extract(payload),
        },
        minerals: Minerals {
            iron: IRON.extract(payload),
            calcium: CALCIUM.extract(payload),
            potassium: POTASSIUM.extract(payload),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(entries: &[(&str, f64)]) -> Vec<Nutrient> {
        entries
            .iter()
            .map(|(name, value)| Nutrient::new(*name, *value))
            .collect()
    }

    #[test]
    fn empty_payload_yields_all_zero_profile() {
        assert_eq!(normalize(&[]), NutrientProfile::default());
    }

    #[test]
    fn exact_macro_names_are_extracted() {
        let p = payload(&[
            ("Energy", 250.0),
            ("Protein", 12.0),
            ("Carbohydrate, by difference", 30.0),
            ("Total lipid (fat)", 8.5),
            ("Fiber, total dietary", 4.0),
        ]);
        let profile = normalize(&p);
        assert_eq!(profile.calories, 250.0);
        assert_eq!(profile.protein, 12.0);
        assert_eq!(profile.carbs, 30.0);
        assert_eq!(profile.fat, 8.5);
        assert_eq!(profile.fiber, 4.0);
    }

    #[test]
    fn macro_match_is_case_sensitive_and_exact() {
        // "Energy, total" is not the exact upstream spelling, so it does
        // not populate calories.
        let profile = normalize(&payload(&[("Energy, total", 99.0), ("protein", 5.0)]));
        assert_eq!(profile.calories, 0.0);
        assert_eq!(profile.protein, 0.0);
    }

    #[test]
    fn qualified_vitamin_names_match_by_substring() {
        let profile = normalize(&payload(&[
            ("Vitamin A, RAE", 500.0),
            ("Vitamin C, total ascorbic acid", 60.0),
            ("Vitamin D (D2 + D3)", 2.0),
            ("Vitamin E (alpha-tocopherol)", 1.5),
            ("Iron, Fe", 3.0),
            ("Calcium, Ca", 120.0),
            ("Potassium, K", 400.0),
        ]));
        assert_eq!(profile.vitamins.a, 500.0);
        assert_eq!(profile.vitamins.c, 60.0);
        assert_eq!(profile.vitamins.d, 2.0);
        assert_eq!(profile.vitamins.e, 1.5);
        assert_eq!(profile.minerals.iron, 3.0);
        assert_eq!(profile.minerals.calcium, 120.0);
        assert_eq!(profile.minerals.potassium, 400.0);
    }

    #[test]
    fn first_match_in_payload_order_wins() {
        let profile = normalize(&payload(&[
            ("Vitamin A, RAE", 500.0),
            ("Vitamin A", 10.0),
        ]));
        assert_eq!(profile.vitamins.a, 500.0);
    }

    #[test]
    fn missing_fields_default_to_zero() {
        let profile = normalize(&payload(&[("Protein", 12.0)]));
        assert_eq!(profile.protein, 12.0);
        assert_eq!(profile.calories, 0.0);
        assert_eq!(profile.fiber, 0.0);
        assert_eq!(profile.vitamins, Vitamins::default());
        assert_eq!(profile.minerals, Minerals::default());
    }

    #[test]
    fn negative_upstream_values_clamp_to_zero() {
        let profile = normalize(&payload(&[("Protein", -3.0)]));
        assert_eq!(profile.protein, 0.0);
    }
}
