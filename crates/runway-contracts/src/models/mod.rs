mod registry;
mod selectors;

pub use registry::{ModelRegistry, ModelSpec, TEXT_CAPABILITY};
pub use selectors::{ModelSelection, ModelSelector};
