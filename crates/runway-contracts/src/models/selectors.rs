use super::registry::{ModelRegistry, ModelSpec, TEXT_CAPABILITY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    pub model: ModelSpec,
    pub requested: Option<String>,
    pub fallback_reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ModelSelector {
    pub registry: ModelRegistry,
}

impl ModelSelector {
    pub fn new(registry: Option<ModelRegistry>) -> Self {
        Self {
            registry: registry.unwrap_or_else(|| ModelRegistry::new(None)),
        }
    }

    pub fn select(
        &self,
        requested: Option<&str>,
        capability: &str,
    ) -> Result<ModelSelection, String> {
        let requested = requested.map(str::trim).filter(|value| !value.is_empty());
        let (fallback_reason, requested_text) = if let Some(requested_value) = requested {
            if let Some(model) = self.registry.ensure(requested_value, capability) {
                return Ok(ModelSelection {
                    model,
                    requested: Some(requested_value.to_string()),
                    fallback_reason: None,
                });
            }
            (
                Some(format!(
                    "Requested model '{requested_value}' unavailable for capability '{capability}'."
                )),
                Some(requested_value.to_string()),
            )
        } else {
            (Some("No model specified; using default.".to_string()), None)
        };

        let candidates = self.registry.by_capability(capability);
        let Some(model) = candidates.first().cloned() else {
            return Err(format!(
                "No models available for capability '{capability}'."
            ));
        };
        Ok(ModelSelection {
            model,
            requested: requested_text,
            fallback_reason,
        })
    }

    pub fn select_text(&self, requested: Option<&str>) -> Result<ModelSelection, String> {
        self.select(requested, TEXT_CAPABILITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_model_wins_when_registered() -> anyhow::Result<()> {
        let selector = ModelSelector::new(None);
        let selection = selector
            .select_text(Some("gpt-4o-mini"))
            .map_err(anyhow::Error::msg)?;
        assert_eq!(selection.model.name, "gpt-4o-mini");
        assert_eq!(selection.fallback_reason, None);
        Ok(())
    }

    #[test]
    fn unknown_model_falls_back_with_reason() -> anyhow::Result<()> {
        let selector = ModelSelector::new(None);
        let selection = selector
            .select_text(Some("mystery-llm"))
            .map_err(anyhow::Error::msg)?;
        assert_eq!(selection.model.name, "zai-glm-4.7");
        assert_eq!(selection.requested.as_deref(), Some("mystery-llm"));
        assert!(selection
            .fallback_reason
            .unwrap_or_default()
            .contains("mystery-llm"));
        Ok(())
    }

    #[test]
    fn empty_registry_is_an_error() {
        let selector = ModelSelector::new(Some(ModelRegistry::from_specs(Vec::new())));
        assert!(selector.select_text(None).is_err());
    }
}
