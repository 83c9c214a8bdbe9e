use serde::{Deserialize, Deserializer, Serialize};

use super::rows::{Gender, OutfitPart};
use crate::director::{extract_json_payload, ParseFailure, PromptMessages};

/// Outfit slots in the order parts are emitted and shown on the runway.
pub const OUTFIT_SLOTS: [&str; 7] = [
    "top",
    "bottom",
    "full",
    "shoes",
    "bag",
    "outerwear",
    "accessories",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub category: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub fabric: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default, alias = "detailes")]
    pub details: Option<String>,
}

/// A look slot entry: either a bare category word or a described item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookItem {
    Name(String),
    Detailed(ItemSpec),
}

impl LookItem {
    fn category(&self) -> &str {
        match self {
            LookItem::Name(name) => name.trim(),
            LookItem::Detailed(spec) => spec.category.trim(),
        }
    }
}

/// Structured total look produced by the stylist model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OneTotalLook {
    pub sex: Option<String>,
    pub season: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub style: Vec<String>,
    pub fit: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub fabric: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub pattern: Vec<String>,
    pub color_temperature: Option<String>,
    pub color_tone: Option<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub top: Vec<LookItem>,
    #[serde(deserialize_with = "one_or_many")]
    pub bottom: Vec<LookItem>,
    #[serde(deserialize_with = "one_or_many")]
    pub full: Vec<LookItem>,
    #[serde(deserialize_with = "one_or_many")]
    pub shoes: Vec<LookItem>,
    #[serde(deserialize_with = "one_or_many")]
    pub bag: Vec<LookItem>,
    #[serde(deserialize_with = "one_or_many")]
    pub outerwear: Vec<LookItem>,
    #[serde(deserialize_with = "one_or_many")]
    pub accessories: Vec<LookItem>,
}

impl OneTotalLook {
    pub fn gender(&self) -> Option<Gender> {
        self.sex.as_deref().and_then(Gender::from_label)
    }

    pub fn slot(&self, slot: &str) -> &[LookItem] {
        match slot {
            "top" => &self.top,
            "bottom" => &self.bottom,
            "full" => &self.full,
            "shoes" => &self.shoes,
            "bag" => &self.bag,
            "outerwear" => &self.outerwear,
            "accessories" => &self.accessories,
            _ => &[],
        }
    }

    /// Flattens the look into matchable parts. Indices are positions within the
    /// slot, so a skipped blank entry still takes its index.
    pub fn outfit_parts(&self) -> Vec<OutfitPart> {
        let gender = self.gender();
        let mut parts = Vec::new();
        for slot in OUTFIT_SLOTS {
            for (index, item) in self.slot(slot).iter().enumerate() {
                let category = item.category();
                if category.is_empty() {
                    continue;
                }
                let mut part = OutfitPart::new(slot, &category.to_lowercase());
                part.index = index;
                part.gender = gender;
                if let LookItem::Detailed(spec) = item {
                    part.color = spec
                        .color
                        .as_deref()
                        .map(str::trim)
                        .filter(|value| !value.is_empty())
                        .map(str::to_string);
                    part.details = [&spec.fabric, &spec.pattern, &spec.details]
                        .into_iter()
                        .flatten()
                        .map(|value| value.trim().to_string())
                        .filter(|value| !value.is_empty())
                        .collect();
                }
                parts.push(part);
            }
        }
        parts
    }

    pub fn is_empty(&self) -> bool {
        OUTFIT_SLOTS
            .iter()
            .all(|slot| self.slot(slot).iter().all(|item| item.category().is_empty()))
    }
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
    })
}

/// Minimal outfit used when the stylist model keeps failing.
pub fn fallback_look() -> OneTotalLook {
    OneTotalLook {
        sex: Some("unisex".to_string()),
        top: vec![LookItem::Name("shirt".to_string())],
        bottom: vec![LookItem::Name("pants".to_string())],
        shoes: vec![LookItem::Name("sneakers".to_string())],
        ..OneTotalLook::default()
    }
}

pub fn decode_look(content: &str) -> Result<OneTotalLook, ParseFailure> {
    let payload = extract_json_payload(content)?;
    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|err| ParseFailure::NotJson(err.to_string()))?;
    if !value.is_object() {
        return Err(ParseFailure::NotObject);
    }
    let look: OneTotalLook =
        serde_json::from_value(value).map_err(|err| ParseFailure::NotJson(err.to_string()))?;
    if look.is_empty() {
        return Err(ParseFailure::invalid("look", "no outfit items"));
    }
    Ok(look)
}

pub fn look_prompt(brief: &str) -> PromptMessages {
    let system = "You are a professional stylist creating a total look.\n\
        Analyze the user request and put together a look that meets all of its requirements.\n\
        The basic outfit is a top item plus a bottom item, or a single full-body item.\n\
        Also select shoes and a bag. Add outerwear or accessories if needed.\n\
        If layering is necessary, list several items in one slot (top: [\"tank top\", \"shirt\"]).\n\n\
        Rules:\n\
        - sex is one of female | male | unisex.\n\
        - season is one of summer | demi | winter.\n\
        - fit is one of fitted | semi-fitted | oversized.\n\
        - Slots are top, bottom, full, shoes, bag, outerwear, accessories. Each slot is a list \
        of category words or objects {\"category\", \"color\", \"fabric\", \"pattern\", \"details\"}.\n\
        - Use English category words, one word per value where possible.\n\
        - Avoid watches, shawls and flowers.\n\
        - Return ONLY the JSON object, no prose and no code fences."
        .to_string();
    let user = format!("User request: {}", brief.trim());
    PromptMessages { system, user }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_mixed_slots_into_ordered_parts() -> anyhow::Result<()> {
        let look = decode_look(
            r##"```json
            {
              "sex": "f",
              "season": "demi",
              "style": "casual",
              "shoes": "loafers",
              "top": ["tank top", {"category": "Shirt", "color": "white", "fabric": "linen"}],
              "bottom": [{"category": "skirt", "color": "black", "pattern": "pleated"}],
              "bag": [""],
              "unexpected": true
            }
            ```"##,
        )?;
        assert_eq!(look.gender(), Some(Gender::Female));
        assert_eq!(look.style, vec!["casual".to_string()]);

        let parts = look.outfit_parts();
        let keys: Vec<String> = parts.iter().map(OutfitPart::key).collect();
        assert_eq!(
            keys,
            vec!["top_tank top_0", "top_shirt_1", "bottom_skirt_0", "shoes_loafers_0"]
        );
        assert_eq!(parts[1].color.as_deref(), Some("white"));
        assert_eq!(parts[1].details, vec!["linen".to_string()]);
        assert_eq!(parts[2].details, vec!["pleated".to_string()]);
        assert_eq!(parts[0].gender, Some(Gender::Female));
        Ok(())
    }

    #[test]
    fn blank_entries_keep_their_slot_position() -> anyhow::Result<()> {
        let look = decode_look(r#"{"sex": "m", "top": ["", "shirt"], "shoes": ["boots", " "]}"#)?;
        let keys: Vec<String> = look.outfit_parts().iter().map(OutfitPart::key).collect();
        assert_eq!(keys, vec!["top_shirt_1", "shoes_boots_0"]);
        Ok(())
    }

    #[test]
    fn looks_without_items_are_rejected() {
        assert_eq!(
            decode_look(r#"{"sex": "m", "top": []}"#),
            Err(ParseFailure::invalid("look", "no outfit items"))
        );
        assert!(matches!(decode_look("not json"), Err(ParseFailure::NotJson(_))));
        assert_eq!(decode_look("[1, 2]"), Err(ParseFailure::NotObject));
    }

    #[test]
    fn fallback_look_is_unisex_basics() {
        let look = fallback_look();
        assert!(!look.is_empty());
        assert_eq!(look.gender(), Some(Gender::Unisex));
        let categories: Vec<String> = look
            .outfit_parts()
            .into_iter()
            .map(|part| part.category)
            .collect();
        assert_eq!(categories, vec!["shirt", "pants", "sneakers"]);
    }

    #[test]
    fn look_prompt_carries_brief() {
        let prompt = look_prompt("  evening look for a gallery opening ");
        assert_eq!(prompt.user, "User request: evening look for a gallery opening");
        assert!(prompt.system.contains("top, bottom, full, shoes, bag, outerwear, accessories"));
    }
}
