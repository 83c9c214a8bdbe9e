use crate::scene::Preset;

#[derive(Clone, Copy, Debug)]
pub(crate) struct KeywordSet {
    pub preset: Preset,
    pub keywords: &'static [&'static str],
}

/// Checked in order; the first set with a hit wins.
pub(crate) const PRESET_KEYWORDS: &[KeywordSet] = &[
    KeywordSet {
        preset: Preset::CyberpunkTokyo,
        keywords: &["cyberpunk", "tokyo", "neon", "киберпанк", "токио", "неон"],
    },
    KeywordSet {
        preset: Preset::RedCarpet,
        keywords: &["red carpet", "red_carpet", "premiere", "красная дорожка"],
    },
    KeywordSet {
        preset: Preset::Editorial90s,
        keywords: &["editorial", "90s", "nineties", "90-е", "редакц"],
    },
    KeywordSet {
        preset: Preset::ParisRunway,
        keywords: &["paris", "fashion week", "париж"],
    },
    KeywordSet {
        preset: Preset::Minimal,
        keywords: &["minimal", "минимал"],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMatch {
    pub preset: Preset,
    pub keyword: &'static str,
}

/// Deterministic preset lookup used when the model path yields nothing.
pub fn resolve_keywords(command: &str) -> Option<Preset> {
    resolve_keyword_match(command).map(|hit| hit.preset)
}

pub fn resolve_keyword_match(command: &str) -> Option<KeywordMatch> {
    let haystack = command.to_lowercase();
    if haystack.trim().is_empty() {
        return None;
    }
    PRESET_KEYWORDS.iter().find_map(|set| {
        set.keywords
            .iter()
            .find(|keyword| haystack.contains(*keyword))
            .map(|keyword| KeywordMatch {
                preset: set.preset,
                keyword: *keyword,
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cyberpunk_vibes_resolve() {
        assert_eq!(
            resolve_keywords("give me cyberpunk Tokyo vibes"),
            Some(Preset::CyberpunkTokyo)
        );
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        assert_eq!(
            resolve_keywords("PARIS FASHION WEEK please"),
            Some(Preset::ParisRunway)
        );
        assert_eq!(
            resolve_keywords("Сделай показ как в Париже"),
            Some(Preset::ParisRunway)
        );
        assert_eq!(resolve_keywords("go minimalism"), Some(Preset::Minimal));
    }

    #[test]
    fn priority_order_breaks_ties() {
        let hit = resolve_keyword_match("Paris Fashion Week, minimalism, soft light");
        assert_eq!(
            hit,
            Some(KeywordMatch {
                preset: Preset::ParisRunway,
                keyword: "paris"
            })
        );
        assert_eq!(
            resolve_keywords("90s editorial cover on the red carpet"),
            Some(Preset::RedCarpet)
        );
    }

    #[test]
    fn nonsense_resolves_to_none() {
        assert_eq!(resolve_keywords("asdkjhasd nonsense"), None);
        assert_eq!(resolve_keywords("   "), None);
    }
}
