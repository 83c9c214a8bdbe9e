use serde::{Deserialize, Serialize};

use super::config::SceneConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    #[serde(rename = "paris_runway")]
    ParisRunway,
    #[serde(rename = "cyberpunk_tokyo", alias = "cyberpunk")]
    CyberpunkTokyo,
    #[serde(rename = "editorial_90s")]
    Editorial90s,
    #[serde(rename = "red_carpet")]
    RedCarpet,
    #[serde(rename = "minimal")]
    Minimal,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::ParisRunway,
        Preset::CyberpunkTokyo,
        Preset::Editorial90s,
        Preset::RedCarpet,
        Preset::Minimal,
    ];

    pub fn all() -> &'static [Preset] {
        &Self::ALL
    }

    pub fn id(self) -> &'static str {
        match self {
            Preset::ParisRunway => "paris_runway",
            Preset::CyberpunkTokyo => "cyberpunk_tokyo",
            Preset::Editorial90s => "editorial_90s",
            Preset::RedCarpet => "red_carpet",
            Preset::Minimal => "minimal",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Preset::ParisRunway => "Paris Runway",
            Preset::CyberpunkTokyo => "Cyberpunk Tokyo",
            Preset::Editorial90s => "Editorial 90s",
            Preset::RedCarpet => "Red Carpet",
            Preset::Minimal => "Minimal",
        }
    }

    /// Resolves ids, display names and the legacy `cyberpunk` id.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw
            .trim()
            .to_lowercase()
            .replace([' ', '-'], "_");
        match normalized.as_str() {
            "paris_runway" | "paris" => Some(Preset::ParisRunway),
            "cyberpunk_tokyo" | "cyberpunk" => Some(Preset::CyberpunkTokyo),
            "editorial_90s" | "editorial" => Some(Preset::Editorial90s),
            "red_carpet" => Some(Preset::RedCarpet),
            "minimal" => Some(Preset::Minimal),
            _ => None,
        }
    }

    pub fn config(self) -> SceneConfig {
        let (
            fog_density,
            fog_color,
            background_color,
            spotlight_intensity,
            spotlight_color,
            particle_count,
            particle_speed,
            camera_distance,
            camera_height,
            lighting,
            atmosphere,
        ) = match self {
            Preset::ParisRunway => (
                0.015, "#1a1a1a", "#2a2a2a", 0.8, "#fff5e6", 300, 0.0005, 18.0, 6.0,
                "Warm Soft", "Elegant Minimal",
            ),
            Preset::CyberpunkTokyo => (
                0.04, "#0a0a1a", "#050510", 1.5, "#7cffd1", 800, 0.003, 12.0, 3.0, "Neon",
                "Futuristic Rain",
            ),
            Preset::Editorial90s => (
                0.005, "#ffffff", "#ffffff", 1.2, "#ffffff", 200, 0.0002, 20.0, 8.0,
                "High Contrast", "Clean Minimal",
            ),
            Preset::RedCarpet => (
                0.01, "#1a0000", "#0a0000", 2.0, "#ffffff", 400, 0.001, 14.0, 4.0,
                "Dramatic Spots", "Glamorous",
            ),
            Preset::Minimal => (
                0.02, "#000000", "#111111", 1.0, "#ffffff", 500, 0.001, 15.0, 5.0, "Soft",
                "Clean",
            ),
        };
        SceneConfig {
            preset: self,
            fog_density,
            fog_color: fog_color.to_string(),
            background_color: background_color.to_string(),
            spotlight_intensity,
            spotlight_color: spotlight_color.to_string(),
            particle_count,
            particle_speed,
            camera_distance,
            camera_height,
            theme: self.display_name().to_string(),
            lighting: lighting.to_string(),
            atmosphere: atmosphere.to_string(),
        }
    }

    pub fn description(self) -> String {
        let config = self.config();
        format!(
            "{} - {} lighting, {} atmosphere",
            config.theme, config.lighting, config.atmosphere
        )
    }
}

impl Default for Preset {
    fn default() -> Self {
        Preset::Minimal
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::Preset;

    #[test]
    fn every_preset_is_within_domain() {
        for preset in Preset::all() {
            let config = preset.config();
            assert_eq!(config.preset, *preset);
            assert!(config.is_within_domain(), "{preset} out of domain");
        }
    }

    #[test]
    fn parse_accepts_ids_aliases_and_display_names() {
        assert_eq!(Preset::parse("cyberpunk_tokyo"), Some(Preset::CyberpunkTokyo));
        assert_eq!(Preset::parse("cyberpunk"), Some(Preset::CyberpunkTokyo));
        assert_eq!(Preset::parse("Cyberpunk Tokyo"), Some(Preset::CyberpunkTokyo));
        assert_eq!(Preset::parse("Editorial-90s"), Some(Preset::Editorial90s));
        assert_eq!(Preset::parse(" RED CARPET "), Some(Preset::RedCarpet));
        assert_eq!(Preset::parse("vaporwave"), None);
    }

    #[test]
    fn serde_uses_snake_ids_and_legacy_alias() -> anyhow::Result<()> {
        assert_eq!(
            serde_json::to_string(&Preset::Editorial90s)?,
            "\"editorial_90s\""
        );
        let legacy: Preset = serde_json::from_str("\"cyberpunk\"")?;
        assert_eq!(legacy, Preset::CyberpunkTokyo);
        Ok(())
    }

    #[test]
    fn description_mentions_lighting_and_atmosphere() {
        assert_eq!(
            Preset::ParisRunway.description(),
            "Paris Runway - Warm Soft lighting, Elegant Minimal atmosphere"
        );
    }
}
