use serde::{Deserialize, Serialize};

use super::fields::{
    bounded_text, fits_text, is_hex_color, normalize_hex_color, BADGES_MAX, BADGE_MAX_CHARS,
    CAMERA_DISTANCE, CAMERA_HEIGHT, COVER_SUBTITLE_MAX_CHARS, COVER_TITLE_MAX_CHARS, FOG_DENSITY,
    LABEL_MAX_CHARS, PARTICLE_COUNT, PARTICLE_SPEED, SPOTLIGHT_INTENSITY, TRANSITIONS_MAX,
};
use super::presets::Preset;

pub const SCENE_FIELDS: &[&str] = &[
    "preset",
    "fog_density",
    "fog_color",
    "background_color",
    "spotlight_intensity",
    "spotlight_color",
    "particle_count",
    "particle_speed",
    "camera_distance",
    "camera_height",
    "theme",
    "lighting",
    "atmosphere",
];

pub const COVER_FIELDS: &[&str] = &["title", "subtitle", "badges"];

/// Complete scene handed to the renderer. Every field is always present and in range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub preset: Preset,
    pub fog_density: f64,
    pub fog_color: String,
    pub background_color: String,
    pub spotlight_intensity: f64,
    pub spotlight_color: String,
    pub particle_count: u32,
    pub particle_speed: f64,
    pub camera_distance: f64,
    pub camera_height: f64,
    pub theme: String,
    pub lighting: String,
    pub atmosphere: String,
}

impl SceneConfig {
    pub fn is_within_domain(&self) -> bool {
        FOG_DENSITY.contains(self.fog_density)
            && SPOTLIGHT_INTENSITY.contains(self.spotlight_intensity)
            && PARTICLE_COUNT.contains(f64::from(self.particle_count))
            && PARTICLE_SPEED.contains(self.particle_speed)
            && CAMERA_DISTANCE.contains(self.camera_distance)
            && CAMERA_HEIGHT.contains(self.camera_height)
            && is_hex_color(&self.fog_color)
            && is_hex_color(&self.background_color)
            && is_hex_color(&self.spotlight_color)
            && fits_text(&self.theme, LABEL_MAX_CHARS)
            && fits_text(&self.lighting, LABEL_MAX_CHARS)
            && fits_text(&self.atmosphere, LABEL_MAX_CHARS)
    }

    /// Pulls every field back into its domain. Values that cannot be repaired
    /// (bad colors, blank labels) fall back to the preset's own value.
    pub fn sanitized(self) -> Self {
        let base = self.preset.config();
        Self {
            preset: self.preset,
            fog_density: FOG_DENSITY.clamp(self.fog_density),
            fog_color: normalize_hex_color(&self.fog_color).unwrap_or(base.fog_color),
            background_color: normalize_hex_color(&self.background_color)
                .unwrap_or(base.background_color),
            spotlight_intensity: SPOTLIGHT_INTENSITY.clamp(self.spotlight_intensity),
            spotlight_color: normalize_hex_color(&self.spotlight_color)
                .unwrap_or(base.spotlight_color),
            particle_count: PARTICLE_COUNT.clamp(f64::from(self.particle_count)) as u32,
            particle_speed: PARTICLE_SPEED.clamp(self.particle_speed),
            camera_distance: CAMERA_DISTANCE.clamp(self.camera_distance),
            camera_height: CAMERA_HEIGHT.clamp(self.camera_height),
            theme: bounded_text(&self.theme, LABEL_MAX_CHARS).unwrap_or(base.theme),
            lighting: bounded_text(&self.lighting, LABEL_MAX_CHARS).unwrap_or(base.lighting),
            atmosphere: bounded_text(&self.atmosphere, LABEL_MAX_CHARS)
                .unwrap_or(base.atmosphere),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Preset::default().config()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverConfig {
    pub title: String,
    pub subtitle: String,
    pub badges: Vec<String>,
}

impl CoverConfig {
    pub fn is_within_domain(&self) -> bool {
        fits_text(&self.title, COVER_TITLE_MAX_CHARS)
            && fits_text(&self.subtitle, COVER_SUBTITLE_MAX_CHARS)
            && self.badges.len() <= BADGES_MAX
            && self
                .badges
                .iter()
                .all(|badge| fits_text(badge, BADGE_MAX_CHARS))
            && self
                .badges
                .iter()
                .enumerate()
                .all(|(index, badge)| !self.badges[..index].contains(badge))
    }

    pub fn sanitized(self) -> Self {
        let base = Self::default();
        let mut badges: Vec<String> = Vec::new();
        for badge in &self.badges {
            let Some(value) = bounded_text(badge, BADGE_MAX_CHARS) else {
                continue;
            };
            if badges.len() < BADGES_MAX && !badges.contains(&value) {
                badges.push(value);
            }
        }
        Self {
            title: bounded_text(&self.title, COVER_TITLE_MAX_CHARS).unwrap_or(base.title),
            subtitle: bounded_text(&self.subtitle, COVER_SUBTITLE_MAX_CHARS)
                .unwrap_or(base.subtitle),
            badges,
        }
    }
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            title: "VOGUE".to_string(),
            subtitle: "Collection 2026".to_string(),
            badges: vec!["Total Look".to_string(), "AI Styled".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionEffect {
    Fade,
    Glitch,
    NeonPulse,
    Zoom,
    Slide,
}

impl TransitionEffect {
    pub const ALL: [TransitionEffect; 5] = [
        TransitionEffect::Fade,
        TransitionEffect::Glitch,
        TransitionEffect::NeonPulse,
        TransitionEffect::Zoom,
        TransitionEffect::Slide,
    ];

    pub fn id(self) -> &'static str {
        match self {
            TransitionEffect::Fade => "fade",
            TransitionEffect::Glitch => "glitch",
            TransitionEffect::NeonPulse => "neon_pulse",
            TransitionEffect::Zoom => "zoom",
            TransitionEffect::Slide => "slide",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|effect| effect.id() == normalized)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionConfig {
    pub effects: Vec<TransitionEffect>,
}

impl TransitionConfig {
    /// De-duplicates while keeping order and caps the list length.
    pub fn from_effects(effects: &[TransitionEffect]) -> Self {
        let mut unique: Vec<TransitionEffect> = Vec::new();
        for effect in effects {
            if unique.len() < TRANSITIONS_MAX && !unique.contains(effect) {
                unique.push(*effect);
            }
        }
        Self { effects: unique }
    }
}

/// Scene, cover and transitions for one presentation session.
///
/// Owned by the caller and replaced wholesale on every update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneState {
    pub scene: SceneConfig,
    pub cover: CoverConfig,
    pub transitions: TransitionConfig,
}

impl SceneState {
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            scene: preset.config(),
            cover: CoverConfig::default(),
            transitions: TransitionConfig::default(),
        }
    }

    pub fn is_within_domain(&self) -> bool {
        self.scene.is_within_domain()
            && self.cover.is_within_domain()
            && self.transitions.effects.len() <= TRANSITIONS_MAX
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}
