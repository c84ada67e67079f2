use crate::model::Exercise;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Only(value) => value,
        }
    }

    fn matches_value(&self, value: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == value,
        }
    }

    fn contained_in(&self, values: &[String]) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => values.iter().any(|v| v == wanted),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search: String,
    pub category: Selection,
    pub equipment: Selection,
    pub muscle: Selection,
}

impl FilterCriteria {
    pub fn matches(&self, exercise: &Exercise) -> bool {
        self.search_matches(exercise)
            && self.category.matches_value(&exercise.category)
            && self.equipment.contained_in(&exercise.equipment)
            // primary muscles only
            && self.muscle.contained_in(&exercise.primary_muscles)
    }

    fn search_matches(&self, exercise: &Exercise) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        exercise.name.to_lowercase().contains(&needle)
            || exercise.name_en.to_lowercase().contains(&needle)
    }

    pub fn summary(&self) -> Option<String> {
        let mut parts: Vec<String> = Vec::new();
        if !self.search.is_empty() {
            parts.push(format!("search=\"{}\"", self.search));
        }
        if !self.category.is_all() {
            parts.push(format!("category={}", self.category.label()));
        }
        if !self.equipment.is_all() {
            parts.push(format!("equipment={}", self.equipment.label()));
        }
        if !self.muscle.is_all() {
            parts.push(format!("muscle={}", self.muscle.label()));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

pub fn filter_exercises<'a>(
    records: &'a [Exercise],
    criteria: &FilterCriteria,
) -> Vec<&'a Exercise> {
    records.iter().filter(|ex| criteria.matches(ex)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(
        id: i64,
        name_en: &str,
        category: &str,
        equipment: &[&str],
        primary: &[&str],
    ) -> Exercise {
        let mut ex = Exercise::blank(id);
        ex.name_en = name_en.to_string();
        ex.category = category.to_string();
        ex.equipment = equipment.iter().map(|s| s.to_string()).collect();
        ex.primary_muscles = primary.iter().map(|s| s.to_string()).collect();
        ex
    }

    fn sample() -> Vec<Exercise> {
        let mut bench = exercise(2, "Bench Press", "strength", &["barbell", "bench"], &["chest"]);
        bench.secondary_muscles = vec!["triceps".to_string()];
        let mut stretch = exercise(
            3,
            "Hamstring Stretch",
            "stretching",
            &["gym mat"],
            &["hamstrings"],
        );
        stretch.name = "کشش همسترینگ".to_string();
        vec![
            exercise(1, "Back Squat", "strength", &["barbell"], &["quads", "glutes"]),
            bench,
            stretch,
        ]
    }

    fn ids(found: &[&Exercise]) -> Vec<i64> {
        found.iter().map(|e| e.id).collect()
    }

    #[test]
    fn unfiltered_criteria_keep_everything_in_order() {
        let records = sample();
        let criteria = FilterCriteria::default();
        assert_eq!(ids(&filter_exercises(&records, &criteria)), vec![1, 2, 3]);
    }

    #[test]
    fn search_is_case_insensitive_over_both_names() {
        let records = sample();
        let mut criteria = FilterCriteria {
            search: "SQUAT".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&filter_exercises(&records, &criteria)), vec![1]);

        criteria.search = "همسترینگ".to_string();
        assert_eq!(ids(&filter_exercises(&records, &criteria)), vec![3]);
    }

    #[test]
    fn predicates_combine_with_and() {
        let records = sample();
        let criteria = FilterCriteria {
            search: String::new(),
            category: Selection::Only("strength".to_string()),
            equipment: Selection::Only("barbell".to_string()),
            muscle: Selection::Only("chest".to_string()),
        };
        assert_eq!(ids(&filter_exercises(&records, &criteria)), vec![2]);
    }

    #[test]
    fn muscle_filter_ignores_secondary_muscles() {
        let records = sample();
        let criteria = FilterCriteria {
            muscle: Selection::Only("triceps".to_string()),
            ..Default::default()
        };
        assert!(filter_exercises(&records, &criteria).is_empty());
    }

    #[test]
    fn clearing_search_yields_a_superset() {
        let records = sample();
        let mut criteria = FilterCriteria {
            search: "press".to_string(),
            category: Selection::Only("strength".to_string()),
            ..Default::default()
        };
        let narrow = ids(&filter_exercises(&records, &criteria));
        criteria.search.clear();
        let wide = ids(&filter_exercises(&records, &criteria));
        assert!(narrow.iter().all(|id| wide.contains(id)));
        assert_eq!(wide, vec![1, 2]);
    }

    #[test]
    fn summary_lists_active_criteria() {
        let criteria = FilterCriteria {
            search: "row".to_string(),
            equipment: Selection::Only("cable".to_string()),
            ..Default::default()
        };
        assert_eq!(
            criteria.summary().as_deref(),
            Some("search=\"row\" equipment=cable")
        );
        assert_eq!(FilterCriteria::default().summary(), None);
    }
}
