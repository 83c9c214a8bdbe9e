use crate::director::CommandDelta;

use super::config::{CoverConfig, SceneConfig, SceneState, TransitionConfig};

/// Applies a validated delta on top of `baseline`.
///
/// A preset switch replaces the scene first, then field overrides land on top
/// of the preset. Fields the delta does not name keep their baseline value.
/// The result is always complete and in range, whatever the delta held.
pub fn merge(baseline: &SceneState, delta: &CommandDelta) -> SceneState {
    SceneState {
        scene: merge_scene(&baseline.scene, delta),
        cover: merge_cover(&baseline.cover, delta),
        transitions: match &delta.transitions {
            Some(effects) => TransitionConfig::from_effects(effects),
            None => baseline.transitions.clone(),
        },
    }
}

pub fn merge_scene(baseline: &SceneConfig, delta: &CommandDelta) -> SceneConfig {
    let mut scene = match delta.preset {
        Some(preset) => preset.config(),
        None => baseline.clone(),
    };
    let fields = &delta.scene;
    if let Some(value) = fields.fog_density {
        scene.fog_density = value;
    }
    if let Some(value) = &fields.fog_color {
        scene.fog_color = value.clone();
    }
    if let Some(value) = &fields.background_color {
        scene.background_color = value.clone();
    }
    if let Some(value) = fields.spotlight_intensity {
        scene.spotlight_intensity = value;
    }
    if let Some(value) = &fields.spotlight_color {
        scene.spotlight_color = value.clone();
    }
    if let Some(value) = fields.particle_count {
        scene.particle_count = value;
    }
    if let Some(value) = fields.particle_speed {
        scene.particle_speed = value;
    }
    if let Some(value) = fields.camera_distance {
        scene.camera_distance = value;
    }
    if let Some(value) = fields.camera_height {
        scene.camera_height = value;
    }
    if let Some(value) = &fields.theme {
        scene.theme = value.clone();
    }
    if let Some(value) = &fields.lighting {
        scene.lighting = value.clone();
    }
    if let Some(value) = &fields.atmosphere {
        scene.atmosphere = value.clone();
    }
    scene.sanitized()
}

pub fn merge_cover(baseline: &CoverConfig, delta: &CommandDelta) -> CoverConfig {
    let mut cover = baseline.clone();
    if let Some(title) = &delta.cover.title {
        cover.title = title.clone();
    }
    if let Some(subtitle) = &delta.cover.subtitle {
        cover.subtitle = subtitle.clone();
    }
    if let Some(badges) = &delta.cover.badges {
        cover.badges = badges.clone();
    }
    cover.sanitized()
}

/// Direct preset application from the UI: the scene resets, cover and transitions stay.
pub fn apply_preset(baseline: &SceneState, preset: super::presets::Preset) -> SceneState {
    merge(baseline, &CommandDelta::with_preset(preset))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::director::decode_delta;
    use crate::scene::{Preset, TransitionEffect};

    fn customized_state() -> SceneState {
        let mut state = SceneState::from_preset(Preset::RedCarpet);
        state.scene.camera_distance = 9.5;
        state.scene.lighting = "Candle".to_string();
        state.cover.title = "GALA".to_string();
        state.transitions = TransitionConfig::from_effects(&[TransitionEffect::Fade]);
        state
    }

    #[test]
    fn empty_delta_is_identity() {
        let state = customized_state();
        assert_eq!(merge(&state, &CommandDelta::empty()), state);
    }

    #[test]
    fn padded_labels_and_repeated_badges_are_out_of_domain() {
        let mut state = SceneState::default();
        state.scene.theme = " Neon".to_string();
        state.cover.badges = vec!["AI".to_string(), "AI".to_string()];
        assert!(!state.scene.is_within_domain());
        assert!(!state.cover.is_within_domain());

        let merged = merge(&state, &CommandDelta::empty());
        assert!(merged.is_within_domain());
        assert_eq!(merged.scene.theme, "Neon");
        assert_eq!(merged.cover.badges, vec!["AI".to_string()]);
        assert_eq!(merge(&merged, &CommandDelta::empty()), merged);
    }

    #[test]
    fn clamped_fog_density_lands_at_ceiling() -> anyhow::Result<()> {
        let decoded = decode_delta(r#"{"scene": {"fog_density": 5.0}}"#)?;
        let merged = merge(&SceneState::default(), &decoded.delta);
        assert_eq!(merged.scene.fog_density, 1.0);
        Ok(())
    }

    #[test]
    fn preset_switch_applies_before_field_overrides() -> anyhow::Result<()> {
        let decoded =
            decode_delta(r#"{"preset": "cyberpunk_tokyo", "scene": {"camera_distance": 8}}"#)?;
        let merged = merge(&customized_state(), &decoded.delta);

        let mut expected = Preset::CyberpunkTokyo.config();
        expected.camera_distance = 8.0;
        assert_eq!(merged.scene, expected);
        assert_eq!(merged.cover.title, "GALA");
        Ok(())
    }

    #[test]
    fn untouched_fields_survive_partial_delta() -> anyhow::Result<()> {
        let decoded = decode_delta(r##"{"scene": {"fog_color": "#223344"}}"##)?;
        let merged = merge(&customized_state(), &decoded.delta);
        assert_eq!(merged.scene.fog_color, "#223344");
        assert_eq!(merged.scene.camera_distance, 9.5);
        assert_eq!(merged.scene.lighting, "Candle");
        assert_eq!(merged.transitions.effects, vec![TransitionEffect::Fade]);
        Ok(())
    }

    #[test]
    fn apply_preset_keeps_cover() {
        let merged = apply_preset(&customized_state(), Preset::Editorial90s);
        assert_eq!(merged.scene, Preset::Editorial90s.config());
        assert_eq!(merged.cover.title, "GALA");
    }

    fn arb_preset() -> impl Strategy<Value = Preset> {
        prop::sample::select(Preset::ALL.to_vec())
    }

    fn arb_delta_json() -> impl Strategy<Value = String> {
        (
            prop::option::of(arb_preset()),
            prop::option::of(-10.0f64..10.0),
            prop::option::of(-5_000i64..5_000),
            prop::option::of(-100.0f64..100.0),
            prop::option::of("[a-zA-Z ]{0,80}"),
            prop::option::of(prop::collection::vec("[a-z ]{0,30}", 0..9)),
        )
            .prop_map(|(preset, fog, particles, camera, title, badges)| {
                let mut root = serde_json::Map::new();
                if let Some(preset) = preset {
                    root.insert("preset".to_string(), serde_json::json!(preset.id()));
                }
                let mut scene = serde_json::Map::new();
                if let Some(fog) = fog {
                    scene.insert("fog_density".to_string(), serde_json::json!(fog));
                }
                if let Some(particles) = particles {
                    scene.insert("particle_count".to_string(), serde_json::json!(particles));
                }
                if let Some(camera) = camera {
                    scene.insert("camera_height".to_string(), serde_json::json!(camera));
                }
                root.insert("scene".to_string(), serde_json::Value::Object(scene));
                let mut cover = serde_json::Map::new();
                if let Some(title) = title {
                    cover.insert("title".to_string(), serde_json::json!(title));
                }
                if let Some(badges) = badges {
                    cover.insert("badges".to_string(), serde_json::json!(badges));
                }
                root.insert("cover".to_string(), serde_json::Value::Object(cover));
                serde_json::Value::Object(root).to_string()
            })
    }

    fn arb_label(max_inner: usize) -> impl Strategy<Value = String> {
        proptest::string::string_regex(&format!("[A-Za-z][A-Za-z0-9 ]{{0,{max_inner}}}[A-Za-z0-9]"))
            .expect("valid regex")
    }

    fn arb_scene() -> impl Strategy<Value = SceneConfig> {
        let numbers = (
            0.0f64..=1.0,
            0.0f64..=3.0,
            0u32..=1000,
            0.0f64..=0.01,
            5.0f64..=30.0,
            1.0f64..=15.0,
        );
        let colors = ("#[0-9a-f]{6}", "#[0-9a-f]{6}", "#[0-9a-f]{6}");
        let labels = (arb_label(30), arb_label(30), arb_label(30));
        (arb_preset(), numbers, colors, labels).prop_map(
            |(preset, numbers, colors, labels)| SceneConfig {
                preset,
                fog_density: numbers.0,
                spotlight_intensity: numbers.1,
                particle_count: numbers.2,
                particle_speed: numbers.3,
                camera_distance: numbers.4,
                camera_height: numbers.5,
                fog_color: colors.0,
                background_color: colors.1,
                spotlight_color: colors.2,
                theme: labels.0,
                lighting: labels.1,
                atmosphere: labels.2,
            },
        )
    }

    fn arb_cover() -> impl Strategy<Value = CoverConfig> {
        (
            arb_label(20),
            arb_label(40),
            prop::collection::vec(arb_label(12), 0..=5),
        )
            .prop_map(|(title, subtitle, raw_badges)| {
                let mut badges: Vec<String> = Vec::new();
                for badge in raw_badges {
                    if !badges.contains(&badge) {
                        badges.push(badge);
                    }
                }
                CoverConfig {
                    title,
                    subtitle,
                    badges,
                }
            })
    }

    fn arb_state() -> impl Strategy<Value = SceneState> {
        (
            arb_scene(),
            arb_cover(),
            prop::collection::vec(prop::sample::select(TransitionEffect::ALL.to_vec()), 0..5),
        )
            .prop_map(|(scene, cover, effects)| SceneState {
                scene,
                cover,
                transitions: TransitionConfig::from_effects(&effects),
            })
    }

    proptest! {
        #[test]
        fn merge_with_empty_delta_is_identity_for_in_domain_states(state in arb_state()) {
            prop_assert!(state.is_within_domain());
            prop_assert_eq!(merge(&state, &CommandDelta::empty()), state);
        }

        #[test]
        fn merge_always_yields_complete_state(
            preset in arb_preset(),
            raw in arb_delta_json(),
        ) {
            let baseline = SceneState::from_preset(preset);
            let delta = decode_delta(&raw)
                .map(|decoded| decoded.delta)
                .unwrap_or_default();
            let merged = merge(&baseline, &delta);
            prop_assert!(merged.is_within_domain());
        }
    }
}
