use std::cmp::{Ordering, Reverse};
use std::collections::HashSet;

use serde::Serialize;

use super::rows::{CatalogRow, Gender, OutfitPart};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelaxationLevel {
    Exact,
    CategoryGender,
    CategoryColor,
    CategoryOnly,
    None,
}

impl RelaxationLevel {
    pub fn tag(self) -> &'static str {
        match self {
            RelaxationLevel::Exact => "exact",
            RelaxationLevel::CategoryGender => "category_gender",
            RelaxationLevel::CategoryColor => "category_color",
            RelaxationLevel::CategoryOnly => "category_only",
            RelaxationLevel::None => "none",
        }
    }

    /// How many of the color/gender constraints were given up. `None` when nothing matched.
    pub fn dropped_constraints(self) -> Option<usize> {
        match self {
            RelaxationLevel::Exact => Some(0),
            RelaxationLevel::CategoryGender | RelaxationLevel::CategoryColor => Some(1),
            RelaxationLevel::CategoryOnly => Some(2),
            RelaxationLevel::None => None,
        }
    }

    fn keeps_color(self) -> bool {
        matches!(self, RelaxationLevel::Exact | RelaxationLevel::CategoryColor)
    }

    fn keeps_gender(self) -> bool {
        matches!(self, RelaxationLevel::Exact | RelaxationLevel::CategoryGender)
    }
}

/// Which constraint is given up first when the exact filter finds nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelaxationOrder {
    #[default]
    ColorFirst,
    GenderFirst,
}

impl RelaxationOrder {
    pub fn levels(self) -> [RelaxationLevel; 4] {
        match self {
            RelaxationOrder::ColorFirst => [
                RelaxationLevel::Exact,
                RelaxationLevel::CategoryGender,
                RelaxationLevel::CategoryColor,
                RelaxationLevel::CategoryOnly,
            ],
            RelaxationOrder::GenderFirst => [
                RelaxationLevel::Exact,
                RelaxationLevel::CategoryColor,
                RelaxationLevel::CategoryGender,
                RelaxationLevel::CategoryOnly,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    pub order: RelaxationOrder,
    /// Whether unisex rows satisfy a gendered part.
    pub allow_unisex: bool,
    pub max_candidates: Option<usize>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            order: RelaxationOrder::default(),
            allow_unisex: true,
            max_candidates: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub part: OutfitPart,
    pub relaxation: RelaxationLevel,
    pub candidates: Vec<CatalogRow>,
}

impl MatchResult {
    pub fn unmatched(part: &OutfitPart) -> Self {
        Self {
            part: part.clone(),
            relaxation: RelaxationLevel::None,
            candidates: Vec::new(),
        }
    }

    pub fn is_unmatched(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn key(&self) -> String {
        self.part.key()
    }
}

/// Finds catalog candidates for one outfit part, relaxing constraints level by level.
///
/// The first non-empty level wins. Within a level, rows with more detail-hint
/// hits come first, then rows are ordered by `store_id` and `good_id`, so the
/// same catalog snapshot always yields the same list.
pub fn match_part(part: &OutfitPart, catalog: &[CatalogRow], options: &MatchOptions) -> MatchResult {
    let category = normalize(&part.category);
    if category.is_empty() {
        return MatchResult::unmatched(part);
    }
    let in_category: Vec<&CatalogRow> = catalog
        .iter()
        .filter(|row| normalize(&row.category_id) == category)
        .collect();
    if in_category.is_empty() {
        return MatchResult::unmatched(part);
    }

    for level in options.order.levels() {
        let accepted: Vec<&CatalogRow> = in_category
            .iter()
            .copied()
            .filter(|row| !level.keeps_color() || color_matches(part, row))
            .filter(|row| !level.keeps_gender() || gender_matches(part, row, options.allow_unisex))
            .collect();
        if !accepted.is_empty() {
            return MatchResult {
                part: part.clone(),
                relaxation: level,
                candidates: rank(accepted, part, options.max_candidates),
            };
        }
    }
    MatchResult::unmatched(part)
}

/// Matches every part independently; an unmatched part does not affect the others.
pub fn match_look(
    parts: &[OutfitPart],
    catalog: &[CatalogRow],
    options: &MatchOptions,
) -> Vec<MatchResult> {
    parts
        .iter()
        .map(|part| match_part(part, catalog, options))
        .collect()
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn color_matches(part: &OutfitPart, row: &CatalogRow) -> bool {
    let Some(wanted) = part.color.as_deref().map(normalize).filter(|value| !value.is_empty())
    else {
        return true;
    };
    normalize(&row.color) == wanted
}

fn gender_matches(part: &OutfitPart, row: &CatalogRow, allow_unisex: bool) -> bool {
    let wanted = match part.gender {
        None | Some(Gender::Unisex) => return true,
        Some(gender) => gender,
    };
    match row.gender() {
        None => !row.has_gender_label(),
        Some(Gender::Unisex) => allow_unisex,
        Some(gender) => gender == wanted,
    }
}

fn detail_score(part: &OutfitPart, row: &CatalogRow) -> usize {
    let haystack = format!(
        "{} {}",
        row.name.to_lowercase(),
        row.detail.as_deref().unwrap_or_default().to_lowercase()
    );
    part.details
        .iter()
        .map(|hint| normalize(hint))
        .filter(|hint| !hint.is_empty() && haystack.contains(hint.as_str()))
        .count()
}

// Numeric ids sort by value and ahead of free-form ids, so "9" lands before "10".
fn compare_ids(left: &str, right: &str) -> Ordering {
    match (left.trim().parse::<u64>(), right.trim().parse::<u64>()) {
        (Ok(left_value), Ok(right_value)) => left_value
            .cmp(&right_value)
            .then_with(|| left.cmp(right)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => left.cmp(right),
    }
}

fn rank(rows: Vec<&CatalogRow>, part: &OutfitPart, max_candidates: Option<usize>) -> Vec<CatalogRow> {
    let mut scored: Vec<(usize, &CatalogRow)> = rows
        .into_iter()
        .map(|row| (detail_score(part, row), row))
        .collect();
    scored.sort_by(|(left_score, left), (right_score, right)| {
        Reverse(*left_score)
            .cmp(&Reverse(*right_score))
            .then_with(|| compare_ids(&left.store_id, &right.store_id))
            .then_with(|| compare_ids(&left.good_id, &right.good_id))
    });

    let mut seen_ids: HashSet<(&str, &str)> = HashSet::new();
    let mut seen_images: HashSet<&str> = HashSet::new();
    let mut ranked: Vec<CatalogRow> = Vec::new();
    for (_, row) in scored {
        if !seen_ids.insert((row.store_id.as_str(), row.good_id.as_str())) {
            continue;
        }
        let image = row.image_external_url.trim();
        if !image.is_empty() && !seen_images.insert(image) {
            continue;
        }
        ranked.push(row.clone());
        if max_candidates.is_some_and(|limit| ranked.len() >= limit) {
            break;
        }
    }
    ranked
}
