mod composer;
mod config;
pub mod fields;
mod presets;

pub use composer::{apply_preset, merge, merge_cover, merge_scene};
pub use config::{
    CoverConfig, SceneConfig, SceneState, TransitionConfig, TransitionEffect, COVER_FIELDS,
    SCENE_FIELDS,
};
pub use presets::Preset;
