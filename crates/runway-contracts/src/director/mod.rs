mod delta;
mod failure;
mod keywords;
mod prompt;
mod response;

pub use delta::{decode_delta, CommandDelta, CoverDelta, DecodedDelta, SceneDelta};
pub use failure::ParseFailure;
pub use keywords::{resolve_keyword_match, resolve_keywords, KeywordMatch};
pub use prompt::{director_prompt, director_schema_text, PromptMessages};
pub use response::extract_json_payload;
