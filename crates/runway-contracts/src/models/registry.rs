use indexmap::IndexMap;

pub const TEXT_CAPABILITY: &str = "text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    pub name: String,
    pub provider: String,
    pub capabilities: Vec<String>,
    pub context_window: Option<u64>,
    /// Whether the model reliably answers with a bare JSON object.
    pub json_output: bool,
}

impl ModelSpec {
    pub fn supports(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|item| item == capability)
    }
}

#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: IndexMap<String, ModelSpec>,
}

impl ModelRegistry {
    pub fn new(models: Option<IndexMap<String, ModelSpec>>) -> Self {
        Self {
            models: models.unwrap_or_else(default_models),
        }
    }

    pub fn from_specs(specs: impl IntoIterator<Item = ModelSpec>) -> Self {
        Self {
            models: specs
                .into_iter()
                .map(|spec| (spec.name.clone(), spec))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ModelSpec> {
        self.models.get(name)
    }

    pub fn list(&self) -> impl Iterator<Item = &ModelSpec> {
        self.models.values()
    }

    pub fn by_capability(&self, capability: &str) -> Vec<ModelSpec> {
        self.models
            .values()
            .filter(|model| model.supports(capability))
            .cloned()
            .collect()
    }

    pub fn ensure(&self, name: &str, capability: &str) -> Option<ModelSpec> {
        let model = self.get(name)?;
        if model.supports(capability) {
            return Some(model.clone());
        }
        None
    }

    /// Keeps only models whose provider passes `available`, preserving order.
    pub fn retain_providers(&self, available: impl Fn(&str) -> bool) -> Self {
        Self {
            models: self
                .models
                .iter()
                .filter(|(_, model)| available(&model.provider))
                .map(|(name, model)| (name.clone(), model.clone()))
                .collect(),
        }
    }
}

fn default_models() -> IndexMap<String, ModelSpec> {
    let mut map = IndexMap::new();

    let mut insert = |name: &str, provider: &str, context_window: Option<u64>, json_output: bool| {
        map.insert(
            name.to_string(),
            ModelSpec {
                name: name.to_string(),
                provider: provider.to_string(),
                capabilities: vec![TEXT_CAPABILITY.to_string()],
                context_window,
                json_output,
            },
        );
    };

    insert("zai-glm-4.7", "cerebras", Some(131072), true);
    insert("llama-3.3-70b", "cerebras", Some(65536), false);
    insert("gpt-4o-mini", "openai", Some(128000), true);
    insert("dryrun-text-1", "dryrun", Some(8192), true);

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_is_ordered_text_models() {
        let registry = ModelRegistry::new(None);
        let names: Vec<&str> = registry.list().map(|model| model.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["zai-glm-4.7", "llama-3.3-70b", "gpt-4o-mini", "dryrun-text-1"]
        );
        assert!(registry.by_capability(TEXT_CAPABILITY).len() == 4);
        assert!(registry.ensure("gpt-4o-mini", "image").is_none());
    }

    #[test]
    fn retain_providers_filters_unconfigured() {
        let registry = ModelRegistry::new(None).retain_providers(|provider| provider != "cerebras");
        let names: Vec<&str> = registry.list().map(|model| model.name.as_str()).collect();
        assert_eq!(names, vec!["gpt-4o-mini", "dryrun-text-1"]);
    }
}
