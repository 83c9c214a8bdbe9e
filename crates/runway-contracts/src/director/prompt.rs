use serde_json::json;

use crate::scene::fields::{
    NumericDomain, BADGES_MAX, BADGE_MAX_CHARS, CAMERA_DISTANCE, CAMERA_HEIGHT,
    COVER_SUBTITLE_MAX_CHARS, COVER_TITLE_MAX_CHARS, FOG_DENSITY, LABEL_MAX_CHARS,
    PARTICLE_COUNT, PARTICLE_SPEED, SPOTLIGHT_INTENSITY, TRANSITIONS_MAX,
};
use crate::scene::{Preset, SceneState, TransitionEffect};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptMessages {
    pub system: String,
    pub user: String,
}

fn range(domain: NumericDomain) -> String {
    format!("number {}..{}", domain.min, domain.max)
}

pub fn director_schema_text() -> String {
    let presets = Preset::all()
        .iter()
        .map(|preset| preset.id())
        .collect::<Vec<&str>>()
        .join("|");
    let effects = TransitionEffect::ALL
        .iter()
        .map(|effect| effect.id())
        .collect::<Vec<&str>>()
        .join("|");
    let mut lines = vec![
        "{".to_string(),
        format!("  \"preset\": \"{presets}\","),
        "  \"scene\": {".to_string(),
        format!("    \"fog_density\": {},", range(FOG_DENSITY)),
        "    \"fog_color\": \"#rrggbb\",".to_string(),
        "    \"background_color\": \"#rrggbb\",".to_string(),
        format!("    \"spotlight_intensity\": {},", range(SPOTLIGHT_INTENSITY)),
        "    \"spotlight_color\": \"#rrggbb\",".to_string(),
        format!("    \"particle_count\": integer {}..{},", PARTICLE_COUNT.min, PARTICLE_COUNT.max),
        format!("    \"particle_speed\": {},", range(PARTICLE_SPEED)),
        format!("    \"camera_distance\": {},", range(CAMERA_DISTANCE)),
        format!("    \"camera_height\": {},", range(CAMERA_HEIGHT)),
    ];
    for label in ["theme", "lighting", "atmosphere"] {
        lines.push(format!("    \"{label}\": string (max {LABEL_MAX_CHARS} chars),"));
    }
    lines.push("  },".to_string());
    lines.push("  \"cover\": {".to_string());
    lines.push(format!(
        "    \"title\": string (uppercase, 2-3 words, max {COVER_TITLE_MAX_CHARS} chars),"
    ));
    lines.push(format!(
        "    \"subtitle\": string (short phrase, max {COVER_SUBTITLE_MAX_CHARS} chars),"
    ));
    lines.push(format!(
        "    \"badges\": [up to {BADGES_MAX} strings, max {BADGE_MAX_CHARS} chars each]"
    ));
    lines.push("  },".to_string());
    lines.push(format!(
        "  \"transitions\": [up to {TRANSITIONS_MAX} of {effects}]"
    ));
    lines.push("}".to_string());
    lines.join("\n")
}

/// Builds the director request: schema rules in the system message, the command
/// and a compact snapshot of the current scene and cover in the user message.
pub fn director_prompt(command: &str, current: &SceneState) -> PromptMessages {
    let system = format!(
        "You are a fashion show director adjusting a 3D runway presentation.\n\
         Translate the user's director command into a JSON object that lists ONLY the \
         settings that should change. Every key is optional; omit anything the command \
         does not ask to change.\n\n\
         Allowed schema:\n{}\n\n\
         Rules:\n\
         - Use \"preset\" only when the command asks for a whole new look \
         (Paris, cyberpunk, Tokyo, 90s editorial, red carpet, minimal).\n\
         - Field overrides are applied on top of the preset.\n\
         - Colors are hex strings like \"#1a1a1a\".\n\
         - Do not invent keys outside the schema.\n\
         - Return ONLY the JSON object, no prose and no code fences.",
        director_schema_text()
    );
    let context = json!({
        "scene": current.scene,
        "cover": current.cover,
        "transitions": current.transitions.effects,
    });
    let user = format!(
        "Current state: {context}\nDirector command: {}",
        command.trim()
    );
    PromptMessages { system, user }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_lists_every_field_and_preset() {
        let schema = director_schema_text();
        for field in crate::scene::SCENE_FIELDS {
            assert!(schema.contains(&format!("\"{field}\"")), "missing {field}");
        }
        for field in crate::scene::COVER_FIELDS {
            assert!(schema.contains(&format!("\"{field}\"")), "missing {field}");
        }
        assert!(schema.contains("cyberpunk_tokyo"));
        assert!(schema.contains("neon_pulse"));
    }

    #[test]
    fn prompt_carries_command_and_compact_context() {
        let prompt = director_prompt("  closer camera  ", &SceneState::default());
        assert!(prompt.user.ends_with("Director command: closer camera"));
        assert!(prompt.user.contains("\"camera_distance\":15.0"));
        assert!(prompt.system.contains("Return ONLY the JSON object"));
    }
}
