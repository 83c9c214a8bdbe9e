use serde::{Deserialize, Serialize};

use crate::catalog::MatchResult;
use crate::scene::{CoverConfig, SceneConfig, SceneState, TransitionEffect};

/// One garment shown on the runway, taken from a catalog candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub look_label: String,
    pub image_url: Option<String>,
    pub price: Option<f64>,
    pub brand: Option<String>,
    pub store_id: String,
    pub good_id: String,
}

/// Self-contained hand-off for the renderer: complete scene, cover and items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunwayPayload {
    pub items: Vec<RunwayItem>,
    pub unmatched: Vec<String>,
    pub scene: SceneConfig,
    pub cover: CoverConfig,
    pub transitions: Vec<TransitionEffect>,
}

pub fn look_label(look_index: usize) -> String {
    format!("Look {}", look_index + 1)
}

/// Picks the candidate at `look_index` from every match. Parts that have no
/// such candidate are reported by key in `unmatched`.
pub fn build_payload(results: &[MatchResult], look_index: usize, state: &SceneState) -> RunwayPayload {
    let label = look_label(look_index);
    let mut items = Vec::new();
    let mut unmatched = Vec::new();
    for result in results {
        let Some(row) = result.candidates.get(look_index) else {
            unmatched.push(result.key());
            continue;
        };
        let image = row.image_external_url.trim();
        items.push(RunwayItem {
            id: result.key(),
            name: row.name.clone(),
            category: result.part.category.clone(),
            look_label: label.clone(),
            image_url: (!image.is_empty()).then(|| image.to_string()),
            price: row.price,
            brand: row.brand.clone(),
            store_id: row.store_id.clone(),
            good_id: row.good_id.clone(),
        });
    }
    RunwayPayload {
        items,
        unmatched,
        scene: state.scene.clone(),
        cover: state.cover.clone(),
        transitions: state.transitions.effects.clone(),
    }
}
