use serde::Deserialize;
use serde::Serialize;

pub type ExerciseId = i64;

pub const DEFAULT_CATEGORY: &str = "strength";

pub const CATEGORIES: &[&str] = &[
    "strength",
    "stretching",
    "plyometrics",
    "strongman",
    "cardio",
    "olympic weightlifting",
    "crossfit",
    "calisthenics",
];

pub const EQUIPMENT_OPTIONS: &[&str] = &[
    "ez curl bar",
    "barbell",
    "dumbbell",
    "gym mat",
    "exercise ball",
    "medicine ball",
    "pull-up bar",
    "bench",
    "incline bench",
    "kettlebell",
    "machine",
    "cable",
    "bands",
    "foam roll",
    "other",
];

pub const MUSCLE_OPTIONS: &[&str] = &[
    "abductors",
    "abs",
    "adductors",
    "biceps",
    "brachialis",
    "calves",
    "chest",
    "forearms",
    "glutes",
    "hamstrings",
    "lats",
    "lower back",
    "middle back",
    "neck",
    "quads",
    "shoulders",
    "soleus",
    "traps",
    "triceps",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    pub name_en: String,
    pub category: String,
    pub equipment: Vec<String>,
    pub primary_muscles: Vec<String>,
    pub secondary_muscles: Vec<String>,
    pub description: String,
    pub description_fa: String,
    pub instructions: Vec<String>,
    pub instructions_fa: Vec<String>,
    pub video: Option<String>,
    pub images: Vec<String>,
    pub aliases: Vec<String>,
    pub tips: Vec<String>,
    pub variation_on: Vec<String>,
}

impl Exercise {
    pub fn blank(id: ExerciseId) -> Self {
        Self {
            id,
            name: String::new(),
            name_en: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            equipment: Vec::new(),
            primary_muscles: Vec::new(),
            secondary_muscles: Vec::new(),
            description: String::new(),
            description_fa: String::new(),
            instructions: Vec::new(),
            instructions_fa: Vec::new(),
            video: None,
            images: Vec::new(),
            aliases: Vec::new(),
            tips: Vec::new(),
            variation_on: Vec::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        if !self.name_en.trim().is_empty() {
            &self.name_en
        } else {
            &self.name
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vocabulary {
    Category,
    Equipment,
    Muscle,
}

impl Vocabulary {
    pub const ALL: [Vocabulary; 3] = [Self::Category, Self::Equipment, Self::Muscle];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "category" | "categories" => Some(Self::Category),
            "equipment" => Some(Self::Equipment),
            "muscle" | "muscles" => Some(Self::Muscle),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Equipment => "equipment",
            Self::Muscle => "muscle",
        }
    }

    pub fn values(self) -> &'static [&'static str] {
        match self {
            Self::Category => CATEGORIES,
            Self::Equipment => EQUIPMENT_OPTIONS,
            Self::Muscle => MUSCLE_OPTIONS,
        }
    }

    // Accepts the UI spelling with underscores as well ("lower_back").
    pub fn canonicalize(self, value: &str) -> Option<&'static str> {
        let wanted = value.trim().to_lowercase().replace('_', " ");
        self.values().iter().copied().find(|v| *v == wanted)
    }

    pub fn contains(self, value: &str) -> bool {
        self.values().contains(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_accepts_case_and_underscores() {
        assert_eq!(
            Vocabulary::Muscle.canonicalize("Lower_Back"),
            Some("lower back")
        );
        assert_eq!(
            Vocabulary::Category.canonicalize(" Olympic Weightlifting "),
            Some("olympic weightlifting")
        );
        assert_eq!(Vocabulary::Equipment.canonicalize("anvil"), None);
    }

    #[test]
    fn display_name_falls_back_to_localized_name() {
        let mut ex = Exercise::blank(1);
        ex.name = "اسکات".to_string();
        assert_eq!(ex.display_name(), "اسکات");
        ex.name_en = "Squat".to_string();
        assert_eq!(ex.display_name(), "Squat");
    }

    #[test]
    fn absent_video_serializes_as_null() {
        let json = serde_json::to_value(Exercise::blank(3)).unwrap();
        assert!(json["video"].is_null());
        assert_eq!(json["category"], "strength");
        assert_eq!(json["tips"], serde_json::json!([]));
    }
}
