use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Unisex,
}

impl Gender {
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "f" | "female" | "w" | "woman" | "women" | "женский" | "жен" => Some(Gender::Female),
            "m" | "male" | "man" | "men" | "мужской" | "муж" => Some(Gender::Male),
            "u" | "unisex" | "унисекс" => Some(Gender::Unisex),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
            Gender::Unisex => "unisex",
        }
    }
}

/// One product record of the external catalog. Read-only for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    #[serde(deserialize_with = "first_category")]
    pub category_id: String,
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub image_external_url: String,
    #[serde(deserialize_with = "string_or_number")]
    pub good_id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub store_id: String,
    #[serde(default, alias = "detailes")]
    pub detail: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub brand: Option<String>,
}

impl CatalogRow {
    pub fn gender(&self) -> Option<Gender> {
        Gender::from_label(&self.gender)
    }

    /// A blank label means the export carries no gender at all.
    pub fn has_gender_label(&self) -> bool {
        !self.gender.trim().is_empty()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

// Catalog exports carry either a plain id or a list whose head is the primary category.
fn first_category<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Array(items) => Ok(items
            .first()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected category string or list, got {other}"
        ))),
    }
}

/// One abstract garment or accessory slot of a generated look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfitPart {
    pub slot: String,
    #[serde(default)]
    pub index: usize,
    pub category: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Fabric, pattern and other free-text hints.
    #[serde(default)]
    pub details: Vec<String>,
}

impl OutfitPart {
    pub fn new(slot: &str, category: &str) -> Self {
        Self {
            slot: slot.to_string(),
            index: 0,
            category: category.to_string(),
            color: None,
            gender: None,
            details: Vec::new(),
        }
    }

    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_details(mut self, details: &[&str]) -> Self {
        self.details = details.iter().map(|value| (*value).to_string()).collect();
        self
    }

    /// `<slot>_<category>_<index>`, stable across runs.
    pub fn key(&self) -> String {
        format!("{}_{}_{}", self.slot, self.category, self.index)
    }
}
