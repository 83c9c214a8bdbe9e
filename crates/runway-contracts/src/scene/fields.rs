#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericDomain {
    pub min: f64,
    pub max: f64,
}

impl NumericDomain {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

pub const FOG_DENSITY: NumericDomain = NumericDomain::new(0.0, 1.0);
pub const SPOTLIGHT_INTENSITY: NumericDomain = NumericDomain::new(0.0, 3.0);
pub const PARTICLE_COUNT: NumericDomain = NumericDomain::new(0.0, 1000.0);
pub const PARTICLE_SPEED: NumericDomain = NumericDomain::new(0.0, 0.01);
pub const CAMERA_DISTANCE: NumericDomain = NumericDomain::new(5.0, 30.0);
pub const CAMERA_HEIGHT: NumericDomain = NumericDomain::new(1.0, 15.0);

pub const LABEL_MAX_CHARS: usize = 40;
pub const COVER_TITLE_MAX_CHARS: usize = 32;
pub const COVER_SUBTITLE_MAX_CHARS: usize = 64;
pub const BADGE_MAX_CHARS: usize = 24;
pub const BADGES_MAX: usize = 5;
pub const TRANSITIONS_MAX: usize = 3;

/// Accepts `#rgb` or `#rrggbb` (any case) and returns the lowercase six digit form.
pub fn normalize_hex_color(raw: &str) -> Option<String> {
    let digits = raw.trim().strip_prefix('#')?;
    if !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    let expanded = match digits.len() {
        3 => digits.chars().flat_map(|ch| [ch, ch]).collect::<String>(),
        6 => digits.to_string(),
        _ => return None,
    };
    Some(format!("#{}", expanded.to_ascii_lowercase()))
}

pub fn is_hex_color(raw: &str) -> bool {
    normalize_hex_color(raw).as_deref() == Some(raw)
}

/// Trims and truncates to `max_chars`; blank input yields `None`.
pub fn bounded_text(raw: &str, max_chars: usize) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(max_chars).collect::<String>().trim_end().to_string())
}

/// True when `bounded_text` would return `value` unchanged.
pub fn fits_text(value: &str, max_chars: usize) -> bool {
    !value.is_empty() && value == value.trim() && value.chars().count() <= max_chars
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_pins_out_of_range_values() {
        assert_eq!(FOG_DENSITY.clamp(5.0), 1.0);
        assert_eq!(FOG_DENSITY.clamp(-0.3), 0.0);
        assert_eq!(CAMERA_DISTANCE.clamp(8.0), 8.0);
        assert_eq!(PARTICLE_SPEED.clamp(f64::NAN), 0.0);
    }

    #[test]
    fn hex_colors_are_normalized() {
        assert_eq!(normalize_hex_color("#FFF").as_deref(), Some("#ffffff"));
        assert_eq!(normalize_hex_color(" #7CFFD1 ").as_deref(), Some("#7cffd1"));
        assert_eq!(normalize_hex_color("red"), None);
        assert_eq!(normalize_hex_color("#12345"), None);
        assert_eq!(normalize_hex_color("#ggg"), None);
        assert!(is_hex_color("#0a0a1a"));
        assert!(!is_hex_color("#0A0A1A"));
    }

    #[test]
    fn bounded_text_trims_and_truncates() {
        assert_eq!(bounded_text("   ", 10), None);
        assert_eq!(bounded_text("  Neon  ", 10).as_deref(), Some("Neon"));
        assert_eq!(
            bounded_text("Futuristic Rain", 11).as_deref(),
            Some("Futuristic")
        );
    }

    #[test]
    fn fits_text_rejects_padding() {
        assert!(fits_text("Neon", 10));
        assert!(!fits_text(" Neon", 10));
        assert!(!fits_text("Neon\t", 10));
        assert!(!fits_text("", 10));
        assert!(!fits_text("Futuristic Rain", 11));
    }
}
