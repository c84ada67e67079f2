use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::model::{Exercise, ExerciseId, Vocabulary, DEFAULT_CATEGORY};
use crate::utils;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("unknown field '{name}'")]
    UnknownField { name: String },

    #[error("field '{field}' is not a multi-select field")]
    NotMultiSelect { field: &'static str },

    #[error("unknown {vocabulary} '{value}'")]
    UnknownValue {
        vocabulary: &'static str,
        value: String,
    },

    #[error("invalid exercise JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftField {
    Name,
    NameEn,
    Category,
    Equipment,
    PrimaryMuscles,
    SecondaryMuscles,
    Description,
    DescriptionFa,
    Instructions,
    InstructionsFa,
    Video,
    Images,
    Aliases,
    Tips,
    VariationOn,
}

impl DraftField {
    pub const ALL: [DraftField; 15] = [
        Self::Name,
        Self::NameEn,
        Self::Category,
        Self::Equipment,
        Self::PrimaryMuscles,
        Self::SecondaryMuscles,
        Self::Description,
        Self::DescriptionFa,
        Self::Instructions,
        Self::InstructionsFa,
        Self::Video,
        Self::Images,
        Self::Aliases,
        Self::Tips,
        Self::VariationOn,
    ];

    pub fn parse(value: &str) -> Result<Self, FormError> {
        let wanted = value.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|f| f.key() == wanted)
            .ok_or_else(|| FormError::UnknownField {
                name: value.trim().to_string(),
            })
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::NameEn => "name_en",
            Self::Category => "category",
            Self::Equipment => "equipment",
            Self::PrimaryMuscles => "primary_muscles",
            Self::SecondaryMuscles => "secondary_muscles",
            Self::Description => "description",
            Self::DescriptionFa => "description_fa",
            Self::Instructions => "instructions",
            Self::InstructionsFa => "instructions_fa",
            Self::Video => "video",
            Self::Images => "images",
            Self::Aliases => "aliases",
            Self::Tips => "tips",
            Self::VariationOn => "variation_on",
        }
    }

    fn multi_select_vocabulary(self) -> Option<Vocabulary> {
        match self {
            Self::Equipment => Some(Vocabulary::Equipment),
            Self::PrimaryMuscles | Self::SecondaryMuscles => Some(Vocabulary::Muscle),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExerciseDraft {
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

impl Default for ExerciseDraft {
    fn default() -> Self {
        Self {
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
}

impl From<&Exercise> for ExerciseDraft {
    fn from(ex: &Exercise) -> Self {
        Self {
            name: ex.name.clone(),
            name_en: ex.name_en.clone(),
            category: ex.category.clone(),
            equipment: ex.equipment.clone(),
            primary_muscles: ex.primary_muscles.clone(),
            secondary_muscles: ex.secondary_muscles.clone(),
            description: ex.description.clone(),
            description_fa: ex.description_fa.clone(),
            instructions: ex.instructions.clone(),
            instructions_fa: ex.instructions_fa.clone(),
            video: ex.video.clone(),
            images: ex.images.clone(),
            aliases: ex.aliases.clone(),
            tips: ex.tips.clone(),
            variation_on: ex.variation_on.clone(),
        }
    }
}

impl ExerciseDraft {
    pub fn from_json(raw: &str) -> Result<Self, FormError> {
        let draft: Self =
            serde_json::from_str(raw).map_err(|source| FormError::InvalidJson { source })?;
        draft.validate()?;
        Ok(draft)
    }

    pub fn validate(&self) -> Result<(), FormError> {
        if !Vocabulary::Category.contains(&self.category) {
            return Err(unknown(Vocabulary::Category, &self.category));
        }
        for (vocab, values) in [
            (Vocabulary::Equipment, &self.equipment),
            (Vocabulary::Muscle, &self.primary_muscles),
            (Vocabulary::Muscle, &self.secondary_muscles),
        ] {
            if let Some(bad) = values.iter().find(|v| !vocab.contains(v)) {
                return Err(unknown(vocab, bad));
            }
        }
        Ok(())
    }

    pub fn set_field(&mut self, field: DraftField, value: &str) -> Result<(), FormError> {
        match field {
            DraftField::Name => self.name = value.to_string(),
            DraftField::NameEn => self.name_en = value.to_string(),
            DraftField::Description => self.description = value.to_string(),
            DraftField::DescriptionFa => self.description_fa = value.to_string(),
            DraftField::Category => {
                self.category = Vocabulary::Category
                    .canonicalize(value)
                    .ok_or_else(|| unknown(Vocabulary::Category, value))?
                    .to_string();
            }
            DraftField::Equipment | DraftField::PrimaryMuscles | DraftField::SecondaryMuscles => {
                let vocab = field
                    .multi_select_vocabulary()
                    .ok_or(FormError::NotMultiSelect { field: field.key() })?;
                let parsed = utils::parse_csv_list(value)
                    .iter()
                    .map(|v| {
                        vocab
                            .canonicalize(v)
                            .map(str::to_string)
                            .ok_or_else(|| unknown(vocab, v))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if let Some(list) = self.list_mut(field) {
                    *list = parsed;
                }
            }
            DraftField::Video => {
                let trimmed = value.trim();
                self.video = if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                };
            }
            DraftField::Instructions
            | DraftField::InstructionsFa
            | DraftField::Images
            | DraftField::Aliases
            | DraftField::Tips
            | DraftField::VariationOn => {
                if let Some(list) = self.list_mut(field) {
                    *list = utils::parse_pipe_list(value);
                }
            }
        }
        Ok(())
    }

    // Multi-select semantics: add the value if missing, otherwise remove it.
    pub fn toggle(&mut self, field: DraftField, value: &str) -> Result<bool, FormError> {
        let vocab = field
            .multi_select_vocabulary()
            .ok_or(FormError::NotMultiSelect { field: field.key() })?;
        let canonical = vocab
            .canonicalize(value)
            .ok_or_else(|| unknown(vocab, value))?;
        let Some(list) = self.list_mut(field) else {
            return Err(FormError::NotMultiSelect { field: field.key() });
        };
        if let Some(pos) = list.iter().position(|v| v == canonical) {
            list.remove(pos);
            Ok(false)
        } else {
            list.push(canonical.to_string());
            Ok(true)
        }
    }

    fn list_mut(&mut self, field: DraftField) -> Option<&mut Vec<String>> {
        let list = match field {
            DraftField::Equipment => &mut self.equipment,
            DraftField::PrimaryMuscles => &mut self.primary_muscles,
            DraftField::SecondaryMuscles => &mut self.secondary_muscles,
            DraftField::Instructions => &mut self.instructions,
            DraftField::InstructionsFa => &mut self.instructions_fa,
            DraftField::Images => &mut self.images,
            DraftField::Aliases => &mut self.aliases,
            DraftField::Tips => &mut self.tips,
            DraftField::VariationOn => &mut self.variation_on,
            _ => return None,
        };
        Some(list)
    }

    pub fn finalize(self, id: ExerciseId) -> Exercise {
        Exercise {
            id,
            name: self.name,
            name_en: self.name_en,
            category: self.category,
            equipment: self.equipment,
            primary_muscles: self.primary_muscles,
            secondary_muscles: self.secondary_muscles,
            description: self.description,
            description_fa: self.description_fa,
            instructions: strip_blank(self.instructions),
            instructions_fa: strip_blank(self.instructions_fa),
            video: self.video.filter(|v| !v.trim().is_empty()),
            images: strip_blank(self.images),
            aliases: strip_blank(self.aliases),
            tips: strip_blank(self.tips),
            variation_on: strip_blank(self.variation_on),
        }
    }
}

fn unknown(vocab: Vocabulary, value: &str) -> FormError {
    FormError::UnknownValue {
        vocabulary: vocab.label(),
        value: value.trim().to_string(),
    }
}

fn strip_blank(values: Vec<String>) -> Vec<String> {
    values.into_iter().filter(|v| !v.trim().is_empty()).collect()
}
