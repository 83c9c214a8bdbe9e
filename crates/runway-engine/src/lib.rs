use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::blocking::{Client as HttpClient, Response as HttpResponse};
use reqwest::header::CONTENT_TYPE;
use runway_contracts::catalog::{
    decode_look, fallback_look, look_prompt, match_look, CatalogRow, MatchOptions, MatchResult,
    OneTotalLook, OutfitPart,
};
use runway_contracts::director::{
    decode_delta, director_prompt, resolve_keyword_match, CommandDelta, ParseFailure,
    PromptMessages,
};
use runway_contracts::events::{
    EventWriter, CATALOG_MATCHED, DIRECTOR_COMMAND, DIRECTOR_FALLBACK, LOOK_GENERATED,
    RUNWAY_PAYLOAD, SCENE_UPDATED, SESSION_STARTED,
};
use runway_contracts::models::{ModelRegistry, ModelSelection, ModelSelector};
use runway_contracts::payload::{build_payload, RunwayPayload};
use runway_contracts::scene::{apply_preset, merge, CoverConfig, Preset, SceneConfig, SceneState};
use serde::Serialize;
use serde_json::{json, Map, Value};

const DEFAULT_TIMEOUT_S: f64 = 20.0;
const MIN_TIMEOUT_S: f64 = 1.0;
const MAX_TIMEOUT_S: f64 = 120.0;
const DEFAULT_CEREBRAS_API_BASE: &str = "https://api.cerebras.ai/v1";
const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const ERROR_TEXT_MAX_CHARS: usize = 512;

#[derive(Debug, Clone, PartialEq)]
pub struct DirectorSettings {
    pub text_model: Option<String>,
    pub timeout_s: f64,
    /// Extra attempts after a transport failure of a director command call.
    pub max_retries: usize,
    pub retry_backoff_s: f64,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Extra look-generation attempts before the fallback look is used.
    pub look_max_retries: usize,
}

impl Default for DirectorSettings {
    fn default() -> Self {
        Self {
            text_model: None,
            timeout_s: DEFAULT_TIMEOUT_S,
            max_retries: 0,
            retry_backoff_s: 1.0,
            temperature: 0.3,
            max_tokens: 500,
            look_max_retries: 2,
        }
    }
}

impl DirectorSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(non_empty_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            text_model: lookup("RUNWAY_TEXT_MODEL"),
            timeout_s: parse_f64(
                lookup("RUNWAY_LLM_TIMEOUT_S"),
                defaults.timeout_s,
                MIN_TIMEOUT_S,
                MAX_TIMEOUT_S,
            ),
            max_retries: parse_f64(lookup("RUNWAY_LLM_MAX_RETRIES"), 0.0, 0.0, 4.0).round()
                as usize,
            retry_backoff_s: defaults.retry_backoff_s,
            temperature: parse_f64(
                lookup("RUNWAY_LLM_TEMPERATURE"),
                defaults.temperature,
                0.0,
                2.0,
            ),
            max_tokens: parse_f64(
                lookup("RUNWAY_LLM_MAX_TOKENS"),
                f64::from(defaults.max_tokens),
                16.0,
                8192.0,
            )
            .round() as u32,
            look_max_retries: parse_f64(lookup("RUNWAY_LOOK_MAX_RETRIES"), 2.0, 0.0, 5.0).round()
                as usize,
        }
    }

    pub fn with_text_model(mut self, model: Option<String>) -> Self {
        if let Some(model) = model.map(|value| value.trim().to_string()) {
            if !model.is_empty() {
                self.text_model = Some(model);
            }
        }
        self
    }

    pub fn with_timeout_s(mut self, timeout_s: f64) -> Self {
        self.timeout_s = clamp_timeout(timeout_s);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(clamp_timeout(self.timeout_s))
    }
}

fn clamp_timeout(timeout_s: f64) -> f64 {
    if timeout_s.is_finite() {
        timeout_s.clamp(MIN_TIMEOUT_S, MAX_TIMEOUT_S)
    } else {
        DEFAULT_TIMEOUT_S
    }
}

fn parse_f64(raw: Option<String>, default: f64, min: f64, max: f64) -> f64 {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(default)
        .clamp(min, max)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionPurpose {
    DirectorCommand,
    Look,
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub purpose: CompletionPurpose,
    /// Raw command or brief the prompt was built from.
    pub subject: String,
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub json_output: bool,
    pub timeout: Duration,
}

pub trait TextProvider: Send + Sync {
    fn name(&self) -> &str;
    fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

#[derive(Default)]
pub struct TextProviderRegistry {
    providers: BTreeMap<String, Box<dyn TextProvider>>,
}

impl TextProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dryrun is always available; hosted providers only when their key is set.
    pub fn from_env() -> Self {
        let mut registry = Self::new();
        registry.register(DryrunProvider);
        if let Some(provider) = ChatCompletionsProvider::cerebras_from_env() {
            registry.register(provider);
        }
        if let Some(provider) = ChatCompletionsProvider::openai_from_env() {
            registry.register(provider);
        }
        registry
    }

    pub fn register<P: TextProvider + 'static>(&mut self, provider: P) {
        self.providers
            .insert(provider.name().to_string(), Box::new(provider));
    }

    pub fn get(&self, name: &str) -> Option<&dyn TextProvider> {
        self.providers.get(name).map(|provider| provider.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.providers.keys().cloned().collect()
    }
}

/// Marker a provider can return when its own deadline expired.
#[derive(Debug, thiserror::Error)]
#[error("text model call exceeded {0:?}")]
pub struct CallTimeout(pub Duration);

pub struct DryrunProvider;

impl TextProvider for DryrunProvider {
    fn name(&self) -> &str {
        "dryrun"
    }

    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let content = match request.purpose {
            CompletionPurpose::DirectorCommand => match resolve_keyword_match(&request.subject) {
                Some(hit) => json!({ "preset": hit.preset.id() }),
                None => json!({}),
            },
            CompletionPurpose::Look => serde_json::to_value(fallback_look())?,
        };
        Ok(content.to_string())
    }
}

/// OpenAI-compatible `chat/completions` client (Cerebras, OpenAI).
pub struct ChatCompletionsProvider {
    name: String,
    api_base: String,
    api_key: String,
    http: HttpClient,
}

impl ChatCompletionsProvider {
    pub fn new(name: &str, api_base: &str, api_key: &str) -> Self {
        Self {
            name: name.to_string(),
            api_base: api_base.trim().trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http: HttpClient::new(),
        }
    }

    pub fn cerebras_from_env() -> Option<Self> {
        let api_key =
            non_empty_env("API_KEY_CEREBRAS").or_else(|| non_empty_env("CEREBRAS_API_KEY"))?;
        let api_base = non_empty_env("CEREBRAS_API_BASE")
            .unwrap_or_else(|| DEFAULT_CEREBRAS_API_BASE.to_string());
        Some(Self::new("cerebras", &api_base, &api_key))
    }

    pub fn openai_from_env() -> Option<Self> {
        let api_key = non_empty_env("OPENAI_API_KEY")?;
        let api_base =
            non_empty_env("OPENAI_API_BASE").unwrap_or_else(|| DEFAULT_OPENAI_API_BASE.to_string());
        Some(Self::new("openai", &api_base, &api_key))
    }

    fn request_payload(request: &CompletionRequest) -> Value {
        let mut payload = map_object(json!({
            "model": request.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "stream": false,
        }));
        if request.json_output {
            payload.insert(
                "response_format".to_string(),
                json!({ "type": "json_object" }),
            );
        }
        Value::Object(payload)
    }
}

impl TextProvider for ChatCompletionsProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let endpoint = format!("{}/chat/completions", self.api_base);
        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .header("accept", "application/json")
            .header(CONTENT_TYPE, "application/json")
            .timeout(request.timeout)
            .json(&Self::request_payload(request))
            .send()
            .with_context(|| format!("{} request failed ({endpoint})", self.name))?;
        let payload = response_json_or_error(&self.name, response)?;
        extract_message_content(&payload)
            .with_context(|| format!("{} returned no message content", self.name))
    }
}

fn extract_message_content(payload: &Value) -> Option<String> {
    let content = payload
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))?;
    match content {
        Value::String(text) => Some(text.clone()),
        Value::Array(parts) => Some(
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect::<Vec<&str>>()
                .join(""),
        ),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

/// Maps a provider error onto the parse-failure taxonomy.
pub fn classify_call_error(err: &anyhow::Error) -> ParseFailure {
    let timed_out = err.chain().any(|cause| {
        cause.downcast_ref::<CallTimeout>().is_some()
            || cause
                .downcast_ref::<reqwest::Error>()
                .map(reqwest::Error::is_timeout)
                .unwrap_or(false)
    });
    if timed_out {
        return ParseFailure::Timeout;
    }
    ParseFailure::Transport(error_chain_text(err, ERROR_TEXT_MAX_CHARS))
}

#[derive(Debug, Clone)]
pub struct ModelReply {
    pub content: String,
    pub model: String,
    pub attempts: usize,
}

/// Model selection plus a bounded, timeout-guarded call to the chosen provider.
#[derive(Clone)]
pub struct ModelClient {
    selector: ModelSelector,
    providers: Arc<TextProviderRegistry>,
    settings: DirectorSettings,
}

impl ModelClient {
    /// Models whose provider is not registered are hidden from selection.
    pub fn new(settings: DirectorSettings, providers: TextProviderRegistry) -> Self {
        let registry = ModelRegistry::new(None).retain_providers(|name| providers.contains(name));
        Self::with_registry(settings, registry, providers)
    }

    pub fn with_registry(
        settings: DirectorSettings,
        registry: ModelRegistry,
        providers: TextProviderRegistry,
    ) -> Self {
        Self {
            selector: ModelSelector::new(Some(registry)),
            providers: Arc::new(providers),
            settings,
        }
    }

    pub fn settings(&self) -> &DirectorSettings {
        &self.settings
    }

    pub fn selection(&self) -> Result<ModelSelection> {
        self.selector
            .select_text(self.settings.text_model.as_deref())
            .map_err(anyhow::Error::msg)
    }

    pub fn complete(
        &self,
        purpose: CompletionPurpose,
        subject: &str,
        messages: &PromptMessages,
        max_retries: usize,
    ) -> std::result::Result<ModelReply, ParseFailure> {
        let selection = self
            .selection()
            .map_err(|err| ParseFailure::Transport(err.to_string()))?;
        if let Some(reason) = &selection.fallback_reason {
            tracing::debug!(model = %selection.model.name, reason = %reason, "text model fallback");
        }
        let Some(provider) = self.providers.get(&selection.model.provider) else {
            return Err(ParseFailure::Transport(format!(
                "no provider '{}' registered for model '{}'",
                selection.model.provider, selection.model.name
            )));
        };
        let request = CompletionRequest {
            purpose,
            subject: subject.to_string(),
            model: selection.model.name.clone(),
            system: messages.system.clone(),
            user: messages.user.clone(),
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            json_output: selection.model.json_output,
            timeout: self.settings.timeout(),
        };

        let mut attempt = 0usize;
        loop {
            match provider.complete(&request) {
                Ok(content) => {
                    return Ok(ModelReply {
                        content,
                        model: request.model,
                        attempts: attempt + 1,
                    })
                }
                Err(err) => {
                    let failure = classify_call_error(&err);
                    if attempt >= max_retries || !is_retryable_transport_error(&err, &failure) {
                        tracing::warn!(
                            model = %request.model,
                            attempts = attempt + 1,
                            failure = %failure,
                            "text model call failed"
                        );
                        return Err(failure);
                    }
                    tracing::debug!(
                        model = %request.model,
                        "text model transport retry {}/{}",
                        attempt + 1,
                        max_retries
                    );
                    self.backoff(attempt);
                    attempt += 1;
                }
            }
        }
    }

    fn backoff(&self, attempt: usize) {
        let delay_s = self.settings.retry_backoff_s * (attempt as f64 + 1.0);
        if delay_s > 0.0 && delay_s.is_finite() {
            thread::sleep(Duration::from_secs_f64(delay_s));
        }
    }
}

fn is_retryable_transport_error(err: &anyhow::Error, failure: &ParseFailure) -> bool {
    if matches!(failure, ParseFailure::Timeout) {
        return true;
    }
    let reqwest_cause = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<reqwest::Error>());
    match reqwest_cause {
        Some(reqwest_err) => reqwest_err.is_connect() || reqwest_err.is_request(),
        None => failure.is_transport(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    pub delta: CommandDelta,
    pub warnings: Vec<String>,
    pub failure: Option<ParseFailure>,
    pub model: Option<String>,
}

impl ParsedCommand {
    fn empty(failure: Option<ParseFailure>, model: Option<String>) -> Self {
        Self {
            delta: CommandDelta::empty(),
            warnings: Vec::new(),
            failure,
            model,
        }
    }
}

/// Turns a director command into a validated delta. Never fails: any call or
/// decode problem yields an empty delta with the failure recorded.
#[derive(Clone)]
pub struct CommandParser {
    client: ModelClient,
}

impl CommandParser {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }

    pub fn parse(&self, command: &str, scene: &SceneConfig, cover: &CoverConfig) -> CommandDelta {
        let current = SceneState {
            scene: scene.clone(),
            cover: cover.clone(),
            ..SceneState::default()
        };
        self.parse_detailed(command, &current).delta
    }

    pub fn parse_detailed(&self, command: &str, current: &SceneState) -> ParsedCommand {
        let command = command.trim();
        if command.is_empty() {
            return ParsedCommand::empty(None, None);
        }
        let messages = director_prompt(command, current);
        let reply = match self.client.complete(
            CompletionPurpose::DirectorCommand,
            command,
            &messages,
            self.client.settings().max_retries,
        ) {
            Ok(reply) => reply,
            Err(failure) => return ParsedCommand::empty(Some(failure), None),
        };
        match decode_delta(&reply.content) {
            Ok(decoded) => {
                for warning in &decoded.warnings {
                    tracing::debug!(model = %reply.model, "director delta: {warning}");
                }
                ParsedCommand {
                    delta: decoded.delta,
                    warnings: decoded.warnings,
                    failure: None,
                    model: Some(reply.model),
                }
            }
            Err(failure) => {
                tracing::warn!(model = %reply.model, failure = %failure, "director response rejected");
                ParsedCommand::empty(Some(failure), Some(reply.model))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookSource {
    Model,
    Fallback,
}

impl LookSource {
    pub fn as_str(self) -> &'static str {
        match self {
            LookSource::Model => "model",
            LookSource::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedLook {
    pub look: OneTotalLook,
    pub source: LookSource,
    pub attempts: usize,
    pub failure: Option<ParseFailure>,
    pub model: Option<String>,
}

impl GeneratedLook {
    pub fn parts(&self) -> Vec<OutfitPart> {
        self.look.outfit_parts()
    }
}

#[derive(Clone)]
pub struct LookGenerator {
    client: ModelClient,
}

impl LookGenerator {
    pub fn new(client: ModelClient) -> Self {
        Self { client }
    }

    /// Asks the stylist model for a look, retrying any failure, then falls back.
    pub fn generate(&self, brief: &str) -> GeneratedLook {
        let messages = look_prompt(brief);
        let max_attempts = self.client.settings().look_max_retries + 1;
        let mut last_failure = None;
        let mut last_model = None;
        for attempt in 0..max_attempts {
            let outcome = self
                .client
                .complete(CompletionPurpose::Look, brief, &messages, 0)
                .and_then(|reply| {
                    last_model = Some(reply.model.clone());
                    decode_look(&reply.content).map(|look| (look, reply.model))
                });
            match outcome {
                Ok((look, model)) => {
                    return GeneratedLook {
                        look,
                        source: LookSource::Model,
                        attempts: attempt + 1,
                        failure: None,
                        model: Some(model),
                    }
                }
                Err(failure) => {
                    tracing::warn!(attempt = attempt + 1, failure = %failure, "look generation failed");
                    last_failure = Some(failure);
                    if attempt + 1 < max_attempts {
                        self.client.backoff(attempt);
                    }
                }
            }
        }
        GeneratedLook {
            look: fallback_look(),
            source: LookSource::Fallback,
            attempts: max_attempts,
            failure: last_failure,
            model: last_model,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaSource {
    Model,
    KeywordFallback,
    Unchanged,
}

impl DeltaSource {
    pub fn as_str(self) -> &'static str {
        match self {
            DeltaSource::Model => "model",
            DeltaSource::KeywordFallback => "keyword_fallback",
            DeltaSource::Unchanged => "unchanged",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectorOutcome {
    pub state: SceneState,
    pub delta: CommandDelta,
    pub source: DeltaSource,
    pub fallback_reason: Option<String>,
    pub warnings: Vec<String>,
    pub model: Option<String>,
}

impl DirectorOutcome {
    fn unchanged(current: &SceneState) -> Self {
        Self {
            state: current.clone(),
            delta: CommandDelta::empty(),
            source: DeltaSource::Unchanged,
            fallback_reason: None,
            warnings: Vec::new(),
            model: None,
        }
    }
}

/// One director session: parse, fall back, compose, log.
pub struct RunwayDirector {
    parser: CommandParser,
    looks: LookGenerator,
    events: Option<EventWriter>,
    session_id: String,
}

impl RunwayDirector {
    pub fn new(settings: DirectorSettings) -> Self {
        Self::with_client(ModelClient::new(settings, TextProviderRegistry::from_env()))
    }

    pub fn with_client(client: ModelClient) -> Self {
        Self {
            parser: CommandParser::new(client.clone()),
            looks: LookGenerator::new(client),
            events: None,
            session_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn with_events(mut self, path: impl Into<PathBuf>) -> Self {
        let writer = EventWriter::new(path, self.session_id.clone());
        self.events = Some(writer);
        let model = self
            .parser
            .client
            .selection()
            .map(|selection| json!({
                "model": selection.model.name,
                "provider": selection.model.provider,
                "fallback_reason": selection.fallback_reason,
            }))
            .unwrap_or(Value::Null);
        self.emit(SESSION_STARTED, &json!({ "text_model": model }));
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn event_writer(&self) -> Option<&EventWriter> {
        self.events.as_ref()
    }

    pub fn parser(&self) -> &CommandParser {
        &self.parser
    }

    pub fn apply_command(&self, command: &str, current: &SceneState) -> DirectorOutcome {
        let command = command.trim();
        if command.is_empty() {
            return DirectorOutcome::unchanged(current);
        }
        self.emit(DIRECTOR_COMMAND, &json!({ "command": command }));

        let parsed = self.parser.parse_detailed(command, current);
        let (delta, source, fallback_reason) = if !parsed.delta.is_empty() {
            (parsed.delta, DeltaSource::Model, None)
        } else {
            let reason = parsed
                .failure
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_else(|| "model returned no changes".to_string());
            match resolve_keyword_match(command) {
                Some(hit) => {
                    self.emit(
                        DIRECTOR_FALLBACK,
                        &json!({
                            "reason": reason,
                            "failure_kind": parsed.failure.as_ref().map(ParseFailure::kind),
                            "keyword": hit.keyword,
                            "preset": hit.preset.id(),
                        }),
                    );
                    (
                        CommandDelta::with_preset(hit.preset),
                        DeltaSource::KeywordFallback,
                        Some(reason),
                    )
                }
                None => (CommandDelta::empty(), DeltaSource::Unchanged, Some(reason)),
            }
        };

        let state = merge(current, &delta);
        self.emit(
            SCENE_UPDATED,
            &json!({
                "source": source.as_str(),
                "changed": delta.changed_fields(),
                "warnings": parsed.warnings,
                "fallback_reason": fallback_reason,
                "scene": state.scene,
                "cover": state.cover,
                "transitions": state.transitions.effects,
            }),
        );
        DirectorOutcome {
            state,
            delta,
            source,
            fallback_reason,
            warnings: parsed.warnings,
            model: parsed.model,
        }
    }

    pub fn apply_preset(&self, current: &SceneState, preset: Preset) -> SceneState {
        let state = apply_preset(current, preset);
        self.emit(
            SCENE_UPDATED,
            &json!({
                "source": "preset",
                "preset": preset.id(),
                "scene": state.scene,
                "cover": state.cover,
                "transitions": state.transitions.effects,
            }),
        );
        state
    }

    pub fn generate_look(&self, brief: &str) -> GeneratedLook {
        let generated = self.looks.generate(brief);
        self.emit(
            LOOK_GENERATED,
            &json!({
                "brief": brief.trim(),
                "source": generated.source.as_str(),
                "attempts": generated.attempts,
                "model": generated.model,
                "failure": generated.failure.as_ref().map(ToString::to_string),
                "look": generated.look,
            }),
        );
        generated
    }

    pub fn match_look(
        &self,
        look: &OneTotalLook,
        catalog: &[CatalogRow],
        options: &MatchOptions,
    ) -> Vec<MatchResult> {
        let results = match_look(&look.outfit_parts(), catalog, options);
        let summary: Vec<Value> = results
            .iter()
            .map(|result| {
                json!({
                    "key": result.key(),
                    "relaxation": result.relaxation.tag(),
                    "candidates": result.candidates.len(),
                })
            })
            .collect();
        self.emit(CATALOG_MATCHED, &json!({ "parts": summary }));
        results
    }

    pub fn build_payload(
        &self,
        results: &[MatchResult],
        look_index: usize,
        state: &SceneState,
    ) -> RunwayPayload {
        let payload = build_payload(results, look_index, state);
        self.emit(
            RUNWAY_PAYLOAD,
            &json!({
                "look_index": look_index,
                "items": payload.items.len(),
                "unmatched": payload.unmatched,
            }),
        );
        payload
    }

    fn emit<T: Serialize>(&self, event_type: &str, record: &T) {
        let Some(events) = &self.events else {
            return;
        };
        if let Err(err) = events.emit_record(event_type, record) {
            tracing::warn!(event = event_type, error = %err, "failed to write director event");
        }
    }
}

fn map_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn response_json_or_error(provider: &str, response: HttpResponse) -> Result<Value> {
    let status = response.status();
    let code = status.as_u16();
    let body = response
        .text()
        .with_context(|| format!("{provider} response body read failed"))?;
    if !status.is_success() {
        bail!(
            "{provider} request failed ({code}): {}",
            truncate_text(&body, ERROR_TEXT_MAX_CHARS)
        );
    }
    let parsed: Value = serde_json::from_str(&body)
        .with_context(|| format!("{provider} returned invalid JSON payload"))?;
    Ok(parsed)
}

fn error_chain_text(err: &anyhow::Error, max_chars: usize) -> String {
    let mut parts: Vec<String> = Vec::new();
    for cause in err.chain() {
        let text = cause.to_string();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        if parts.last().map(|existing| existing == trimmed).unwrap_or(false) {
            continue;
        }
        parts.push(trimmed.to_string());
    }
    if parts.is_empty() {
        return truncate_text(&err.to_string(), max_chars);
    }
    truncate_text(&parts.join(" | caused by: "), max_chars)
}

fn truncate_text(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    value.chars().take(max_chars).collect::<String>() + "…"
}
