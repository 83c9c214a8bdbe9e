mod look;
mod matcher;
mod rows;

pub use look::{decode_look, fallback_look, look_prompt, ItemSpec, LookItem, OneTotalLook, OUTFIT_SLOTS};
pub use matcher::{
    match_look, match_part, MatchOptions, MatchResult, RelaxationLevel, RelaxationOrder,
};
pub use rows::{CatalogRow, Gender, OutfitPart};
