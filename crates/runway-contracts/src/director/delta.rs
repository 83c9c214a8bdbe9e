use serde_json::{Map, Value};

use super::failure::ParseFailure;
use super::response::extract_json_payload;
use crate::scene::fields::{
    bounded_text, normalize_hex_color, NumericDomain, BADGES_MAX, BADGE_MAX_CHARS,
    CAMERA_DISTANCE, CAMERA_HEIGHT, COVER_SUBTITLE_MAX_CHARS, COVER_TITLE_MAX_CHARS, FOG_DENSITY,
    LABEL_MAX_CHARS, PARTICLE_COUNT, PARTICLE_SPEED, SPOTLIGHT_INTENSITY, TRANSITIONS_MAX,
};
use crate::scene::{Preset, TransitionEffect};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneDelta {
    pub fog_density: Option<f64>,
    pub fog_color: Option<String>,
    pub background_color: Option<String>,
    pub spotlight_intensity: Option<f64>,
    pub spotlight_color: Option<String>,
    pub particle_count: Option<u32>,
    pub particle_speed: Option<f64>,
    pub camera_distance: Option<f64>,
    pub camera_height: Option<f64>,
    pub theme: Option<String>,
    pub lighting: Option<String>,
    pub atmosphere: Option<String>,
}

impl SceneDelta {
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        let mut mark = |name: &'static str, present: bool| {
            if present {
                fields.push(name);
            }
        };
        mark("fog_density", self.fog_density.is_some());
        mark("fog_color", self.fog_color.is_some());
        mark("background_color", self.background_color.is_some());
        mark("spotlight_intensity", self.spotlight_intensity.is_some());
        mark("spotlight_color", self.spotlight_color.is_some());
        mark("particle_count", self.particle_count.is_some());
        mark("particle_speed", self.particle_speed.is_some());
        mark("camera_distance", self.camera_distance.is_some());
        mark("camera_height", self.camera_height.is_some());
        mark("theme", self.theme.is_some());
        mark("lighting", self.lighting.is_some());
        mark("atmosphere", self.atmosphere.is_some());
        fields
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverDelta {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub badges: Option<Vec<String>>,
}

/// Sparse, already-validated overrides derived from one director command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandDelta {
    pub preset: Option<Preset>,
    pub scene: SceneDelta,
    pub cover: CoverDelta,
    pub transitions: Option<Vec<TransitionEffect>>,
}

impl CommandDelta {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_preset(preset: Preset) -> Self {
        Self {
            preset: Some(preset),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Dotted names of everything this delta touches, for logging.
    pub fn changed_fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        if self.preset.is_some() {
            fields.push("preset".to_string());
        }
        for name in self.scene.changed_fields() {
            fields.push(format!("scene.{name}"));
        }
        if self.cover.title.is_some() {
            fields.push("cover.title".to_string());
        }
        if self.cover.subtitle.is_some() {
            fields.push("cover.subtitle".to_string());
        }
        if self.cover.badges.is_some() {
            fields.push("cover.badges".to_string());
        }
        if self.transitions.is_some() {
            fields.push("transitions".to_string());
        }
        fields
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedDelta {
    pub delta: CommandDelta,
    /// Tolerated irregularities: clamped numbers, truncated text, dropped presets.
    pub warnings: Vec<String>,
}

/// Strictly decodes a model response into a delta.
///
/// The response must be a single JSON object using only the keys `preset`,
/// `scene`, `cover` and `transitions`. Unknown keys or wrongly typed values
/// reject the whole response. Out-of-range numbers are clamped and overlong
/// text is truncated. An unrecognized preset is dropped on its own while the
/// remaining overrides still apply. `null` means "no change".
pub fn decode_delta(content: &str) -> Result<DecodedDelta, ParseFailure> {
    let payload = extract_json_payload(content)?;
    let value: Value =
        serde_json::from_str(payload).map_err(|err| ParseFailure::NotJson(err.to_string()))?;
    let Value::Object(root) = value else {
        return Err(ParseFailure::NotObject);
    };

    let mut decoder = DeltaDecoder::default();
    let mut top_level_preset: Option<&Value> = None;
    let mut scene_preset: Option<&Value> = None;

    for (key, value) in &root {
        if value.is_null() {
            continue;
        }
        match key.as_str() {
            "preset" => top_level_preset = Some(value),
            "scene" => {
                let fields = expect_object("scene", value)?;
                scene_preset = fields.get("preset").filter(|value| !value.is_null());
                decoder.scene(fields)?;
            }
            "cover" => decoder.cover(expect_object("cover", value)?)?,
            "transitions" => decoder.transitions(value)?,
            other => return Err(ParseFailure::UnknownField(other.to_string())),
        }
    }

    if let Some(raw) = top_level_preset.or(scene_preset) {
        decoder.preset(raw)?;
    }

    Ok(DecodedDelta {
        delta: decoder.delta,
        warnings: decoder.warnings,
    })
}

#[derive(Default)]
struct DeltaDecoder {
    delta: CommandDelta,
    warnings: Vec<String>,
}

impl DeltaDecoder {
    fn preset(&mut self, value: &Value) -> Result<(), ParseFailure> {
        let raw = value
            .as_str()
            .ok_or_else(|| ParseFailure::invalid("preset", "expected string"))?;
        match Preset::parse(raw) {
            Some(preset) => self.delta.preset = Some(preset),
            None => self
                .warnings
                .push(format!("unknown preset '{raw}' dropped")),
        }
        Ok(())
    }

    fn scene(&mut self, fields: &Map<String, Value>) -> Result<(), ParseFailure> {
        for (key, value) in fields {
            if value.is_null() {
                continue;
            }
            let scene = &mut self.delta.scene;
            let warnings = &mut self.warnings;
            let field = format!("scene.{key}");
            match key.as_str() {
                // Resolved by the caller so the top-level key wins.
                "preset" => {}
                "fog_density" => {
                    scene.fog_density = Some(number(&field, value, FOG_DENSITY, warnings)?)
                }
                "spotlight_intensity" => {
                    scene.spotlight_intensity =
                        Some(number(&field, value, SPOTLIGHT_INTENSITY, warnings)?)
                }
                "particle_count" => {
                    let count = number(&field, value, PARTICLE_COUNT, warnings)?;
                    scene.particle_count = Some(count.round() as u32);
                }
                "particle_speed" => {
                    scene.particle_speed = Some(number(&field, value, PARTICLE_SPEED, warnings)?)
                }
                "camera_distance" => {
                    scene.camera_distance =
                        Some(number(&field, value, CAMERA_DISTANCE, warnings)?)
                }
                "camera_height" => {
                    scene.camera_height = Some(number(&field, value, CAMERA_HEIGHT, warnings)?)
                }
                "fog_color" => scene.fog_color = Some(color(&field, value)?),
                "background_color" => scene.background_color = Some(color(&field, value)?),
                "spotlight_color" => scene.spotlight_color = Some(color(&field, value)?),
                "theme" => scene.theme = Some(text(&field, value, LABEL_MAX_CHARS, warnings)?),
                "lighting" => {
                    scene.lighting = Some(text(&field, value, LABEL_MAX_CHARS, warnings)?)
                }
                "atmosphere" => {
                    scene.atmosphere = Some(text(&field, value, LABEL_MAX_CHARS, warnings)?)
                }
                _ => return Err(ParseFailure::UnknownField(field)),
            }
        }
        Ok(())
    }

    fn cover(&mut self, fields: &Map<String, Value>) -> Result<(), ParseFailure> {
        for (key, value) in fields {
            if value.is_null() {
                continue;
            }
            let field = format!("cover.{key}");
            match key.as_str() {
                "title" => {
                    self.delta.cover.title = Some(text(
                        &field,
                        value,
                        COVER_TITLE_MAX_CHARS,
                        &mut self.warnings,
                    )?)
                }
                "subtitle" => {
                    self.delta.cover.subtitle = Some(text(
                        &field,
                        value,
                        COVER_SUBTITLE_MAX_CHARS,
                        &mut self.warnings,
                    )?)
                }
                "badges" => self.delta.cover.badges = Some(self.badges(&field, value)?),
                _ => return Err(ParseFailure::UnknownField(field)),
            }
        }
        Ok(())
    }

    fn badges(&mut self, field: &str, value: &Value) -> Result<Vec<String>, ParseFailure> {
        let items = value
            .as_array()
            .ok_or_else(|| ParseFailure::invalid(field, "expected array of strings"))?;
        let mut badges: Vec<String> = Vec::new();
        for item in items {
            let raw = item
                .as_str()
                .ok_or_else(|| ParseFailure::invalid(field, "expected array of strings"))?;
            let Some(badge) = bounded_text(raw, BADGE_MAX_CHARS) else {
                continue;
            };
            if badges.contains(&badge) {
                continue;
            }
            if badges.len() == BADGES_MAX {
                self.warnings
                    .push(format!("{field} capped at {BADGES_MAX} entries"));
                break;
            }
            badges.push(badge);
        }
        Ok(badges)
    }

    fn transitions(&mut self, value: &Value) -> Result<(), ParseFailure> {
        // The older `{"effects": [...]}` shape is accepted as well as a bare list.
        let list = match value {
            Value::Object(fields) => {
                if let Some(key) = fields.keys().find(|key| key.as_str() != "effects") {
                    return Err(ParseFailure::UnknownField(format!("transitions.{key}")));
                }
                match fields.get("effects") {
                    Some(list) if !list.is_null() => list,
                    _ => return Ok(()),
                }
            }
            other => other,
        };
        let items = list
            .as_array()
            .ok_or_else(|| ParseFailure::invalid("transitions", "expected array of effects"))?;
        let mut effects: Vec<TransitionEffect> = Vec::new();
        for item in items {
            let effect = item
                .as_str()
                .and_then(TransitionEffect::parse)
                .ok_or_else(|| {
                    ParseFailure::invalid("transitions", format!("unsupported effect {item}"))
                })?;
            if !effects.contains(&effect) {
                effects.push(effect);
            }
        }
        if effects.len() > TRANSITIONS_MAX {
            effects.truncate(TRANSITIONS_MAX);
            self.warnings
                .push(format!("transitions capped at {TRANSITIONS_MAX} effects"));
        }
        self.delta.transitions = Some(effects);
        Ok(())
    }
}

fn expect_object<'a>(field: &str, value: &'a Value) -> Result<&'a Map<String, Value>, ParseFailure> {
    value
        .as_object()
        .ok_or_else(|| ParseFailure::invalid(field, "expected object"))
}

fn number(
    field: &str,
    value: &Value,
    domain: NumericDomain,
    warnings: &mut Vec<String>,
) -> Result<f64, ParseFailure> {
    let raw = value
        .as_f64()
        .ok_or_else(|| ParseFailure::invalid(field, "expected number"))?;
    let clamped = domain.clamp(raw);
    if clamped != raw {
        warnings.push(format!("{field} {raw} clamped to {clamped}"));
    }
    Ok(clamped)
}

fn color(field: &str, value: &Value) -> Result<String, ParseFailure> {
    value
        .as_str()
        .and_then(normalize_hex_color)
        .ok_or_else(|| ParseFailure::invalid(field, "expected #rrggbb hex color"))
}

fn text(
    field: &str,
    value: &Value,
    max_chars: usize,
    warnings: &mut Vec<String>,
) -> Result<String, ParseFailure> {
    let raw = value
        .as_str()
        .ok_or_else(|| ParseFailure::invalid(field, "expected string"))?;
    let bounded =
        bounded_text(raw, max_chars).ok_or_else(|| ParseFailure::invalid(field, "blank text"))?;
    if bounded.chars().count() < raw.trim().chars().count() {
        warnings.push(format!("{field} truncated to {max_chars} characters"));
    }
    Ok(bounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_nested_schema() -> anyhow::Result<()> {
        let decoded = decode_delta(
            r##"{
                "preset": "paris_runway",
                "scene": {"camera_distance": 12, "lighting": "Warm Soft", "spotlight_color": "#FFF"},
                "cover": {"title": "PARIS", "badges": ["office-to-party", "waterproof"]},
                "transitions": ["fade", "zoom"]
            }"##,
        )?;
        let delta = decoded.delta;
        assert_eq!(delta.preset, Some(Preset::ParisRunway));
        assert_eq!(delta.scene.camera_distance, Some(12.0));
        assert_eq!(delta.scene.lighting.as_deref(), Some("Warm Soft"));
        assert_eq!(delta.scene.spotlight_color.as_deref(), Some("#ffffff"));
        assert_eq!(delta.cover.title.as_deref(), Some("PARIS"));
        assert_eq!(
            delta.cover.badges,
            Some(vec!["office-to-party".to_string(), "waterproof".to_string()])
        );
        assert_eq!(
            delta.transitions,
            Some(vec![TransitionEffect::Fade, TransitionEffect::Zoom])
        );
        assert!(decoded.warnings.is_empty());
        Ok(())
    }

    #[test]
    fn out_of_range_numbers_are_clamped_not_rejected() -> anyhow::Result<()> {
        let decoded = decode_delta(r#"{"scene": {"fog_density": 5, "particle_count": 99999}}"#)?;
        assert_eq!(decoded.delta.scene.fog_density, Some(1.0));
        assert_eq!(decoded.delta.scene.particle_count, Some(1000));
        assert_eq!(decoded.warnings.len(), 2);
        Ok(())
    }

    #[test]
    fn unknown_fields_reject_the_response() {
        assert_eq!(
            decode_delta(r#"{"mood": "sad"}"#),
            Err(ParseFailure::UnknownField("mood".to_string()))
        );
        assert_eq!(
            decode_delta(r#"{"scene": {"fog_density": 0.1, "rain": true}}"#),
            Err(ParseFailure::UnknownField("scene.rain".to_string()))
        );
        assert_eq!(
            decode_delta(r#"{"cover": {"font": "serif"}}"#),
            Err(ParseFailure::UnknownField("cover.font".to_string()))
        );
    }

    #[test]
    fn wrong_types_reject_the_response() {
        assert!(matches!(
            decode_delta(r#"{"scene": {"fog_density": "thick"}}"#),
            Err(ParseFailure::InvalidValue { .. })
        ));
        assert!(matches!(
            decode_delta(r#"{"scene": {"fog_color": "red"}}"#),
            Err(ParseFailure::InvalidValue { .. })
        ));
        assert!(matches!(
            decode_delta(r#"{"cover": {"badges": [1, 2]}}"#),
            Err(ParseFailure::InvalidValue { .. })
        ));
        assert!(matches!(
            decode_delta(r#"{"transitions": ["teleport"]}"#),
            Err(ParseFailure::InvalidValue { .. })
        ));
    }

    #[test]
    fn non_object_responses_are_rejected() {
        assert_eq!(decode_delta("[1, 2]"), Err(ParseFailure::NotObject));
        assert!(matches!(
            decode_delta("sure! make it foggy"),
            Err(ParseFailure::NotJson(_))
        ));
        assert!(matches!(
            decode_delta(r#"{"preset": "minimal"} {"preset": "red_carpet"}"#),
            Err(ParseFailure::NotJson(_))
        ));
        assert_eq!(decode_delta(""), Err(ParseFailure::EmptyContent));
    }

    #[test]
    fn unknown_preset_is_dropped_but_fields_apply() -> anyhow::Result<()> {
        let decoded = decode_delta(r#"{"preset": "vaporwave", "scene": {"camera_height": 4}}"#)?;
        assert_eq!(decoded.delta.preset, None);
        assert_eq!(decoded.delta.scene.camera_height, Some(4.0));
        assert_eq!(decoded.warnings, vec!["unknown preset 'vaporwave' dropped"]);
        Ok(())
    }

    #[test]
    fn top_level_preset_wins_over_scene_preset() -> anyhow::Result<()> {
        let decoded =
            decode_delta(r#"{"scene": {"preset": "minimal"}, "preset": "red_carpet"}"#)?;
        assert_eq!(decoded.delta.preset, Some(Preset::RedCarpet));

        let nested_only = decode_delta(r#"{"scene": {"preset": "cyberpunk"}}"#)?;
        assert_eq!(nested_only.delta.preset, Some(Preset::CyberpunkTokyo));
        Ok(())
    }

    #[test]
    fn nulls_mean_no_change() -> anyhow::Result<()> {
        let decoded = decode_delta(r#"{"preset": null, "scene": {"theme": null}, "cover": null}"#)?;
        assert!(decoded.delta.is_empty());
        Ok(())
    }

    #[test]
    fn legacy_transition_shape_and_caps() -> anyhow::Result<()> {
        let decoded = decode_delta(
            r#"{"transitions": {"effects": ["fade", "glitch", "neon_pulse", "zoom", "fade"]}}"#,
        )?;
        assert_eq!(
            decoded.delta.transitions,
            Some(vec![
                TransitionEffect::Fade,
                TransitionEffect::Glitch,
                TransitionEffect::NeonPulse
            ])
        );
        assert_eq!(decoded.warnings, vec!["transitions capped at 3 effects"]);
        Ok(())
    }

    #[test]
    fn fenced_response_is_accepted() -> anyhow::Result<()> {
        let decoded = decode_delta("```json\n{\"scene\": {\"camera_distance\": 8}}\n```")?;
        assert_eq!(decoded.delta.scene.camera_distance, Some(8.0));
        assert_eq!(decoded.delta.changed_fields(), vec!["scene.camera_distance"]);
        Ok(())
    }
}
