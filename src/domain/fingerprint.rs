//! Deterministic request fingerprinting.
//!
//! A fingerprint is a SHA-256 hex digest over a canonical encoding of the
//! fields that determine a request's cache identity. Two requests that
//! differ only in insignificant ways (whitespace, field order, letter case
//! of case-insensitive fields, omitted-vs-explicit defaults) produce the
//! same digest; any change to a generation parameter produces a different
//! one.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Model identifier assumed when a request does not name one.
pub const DEFAULT_MODEL: &str = "default";
/// Sampling temperature assumed when a request does not set one.
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Token budget assumed when a request does not set one.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
/// Plan length assumed when a meal-plan request does not set one.
pub const DEFAULT_DAYS_COUNT: u32 = 7;
/// Meals per day assumed when a meal-plan request does not set one.
pub const DEFAULT_MEALS_PER_DAY: u32 = 3;
/// Audience assumed when a story request does not name one.
pub const DEFAULT_AGE_GROUP: &str = "any";

/// Requests that can derive their own cache key.
///
/// Implementations return the normalized fields in a `BTreeMap` so the
/// canonical JSON encoding is ordered independently of construction order.
/// Normalization (trimming, lowercasing, sorting unordered collections,
/// substituting explicit defaults) happens inside `canonicalize`.
pub trait Fingerprintable {
    /// Normalized fields that determine this request's cache identity.
    fn canonicalize(&self) -> BTreeMap<&'static str, serde_json::Value>;

    /// Stable hex digest over the canonical form.
    fn fingerprint(&self) -> String {
        let canonical =
            serde_json::to_string(&self.canonicalize()).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// A generic inference request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// Prompt text; surrounding whitespace is not significant.
    pub prompt: String,
    /// Upstream provider name; case-insensitive.
    pub provider: String,
    /// Model identifier; `None` means [`DEFAULT_MODEL`].
    pub model: Option<String>,
    /// Sampling temperature; `None` means [`DEFAULT_TEMPERATURE`].
    pub temperature: Option<f64>,
    /// Token budget; `None` means [`DEFAULT_MAX_TOKENS`].
    pub max_tokens: Option<u32>,
}

impl InferenceRequest {
    pub fn new(prompt: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            provider: provider.into(),
            model: None,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Generation configuration summary, suitable for `CacheEntry::model_tag`.
    pub fn model_tag(&self) -> String {
        format!(
            "{}:{}:{}",
            self.model.as_deref().unwrap_or(DEFAULT_MODEL),
            self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        )
    }
}

impl Fingerprintable for InferenceRequest {
    fn canonicalize(&self) -> BTreeMap<&'static str, serde_json::Value> {
        let mut parts = BTreeMap::new();
        parts.insert("prompt", serde_json::json!(self.prompt.trim()));
        parts.insert("provider", serde_json::json!(self.provider.trim().to_lowercase()));
        parts.insert(
            "model",
            serde_json::json!(self.model.as_deref().unwrap_or(DEFAULT_MODEL)),
        );
        parts.insert(
            "temperature",
            serde_json::json!(self.temperature.unwrap_or(DEFAULT_TEMPERATURE)),
        );
        parts.insert(
            "max_tokens",
            serde_json::json!(self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)),
        );
        parts
    }
}

/// A meal-plan generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanRequest {
    /// Dietary preference labels; order is not significant.
    pub dietary_preferences: Vec<String>,
    /// Available ingredients; order is not significant.
    pub ingredients: Vec<String>,
    /// Plan length in days; `None` means [`DEFAULT_DAYS_COUNT`].
    pub days_count: Option<u32>,
    /// Meals per day; `None` means [`DEFAULT_MEALS_PER_DAY`].
    pub meals_per_day: Option<u32>,
}

impl MealPlanRequest {
    pub fn new(dietary_preferences: Vec<String>, ingredients: Vec<String>) -> Self {
        Self {
            dietary_preferences,
            ingredients,
            days_count: None,
            meals_per_day: None,
        }
    }

    pub fn with_days_count(mut self, days_count: u32) -> Self {
        self.days_count = Some(days_count);
        self
    }

    pub fn with_meals_per_day(mut self, meals_per_day: u32) -> Self {
        self.meals_per_day = Some(meals_per_day);
        self
    }
}

impl Fingerprintable for MealPlanRequest {
    fn canonicalize(&self) -> BTreeMap<&'static str, serde_json::Value> {
        let mut preferences = self.dietary_preferences.clone();
        preferences.sort();
        let mut ingredients = self.ingredients.clone();
        ingredients.sort();

        let mut parts = BTreeMap::new();
        parts.insert("dietary_preferences", serde_json::json!(preferences));
        parts.insert("ingredients", serde_json::json!(ingredients));
        parts.insert(
            "days_count",
            serde_json::json!(self.days_count.unwrap_or(DEFAULT_DAYS_COUNT)),
        );
        parts.insert(
            "meals_per_day",
            serde_json::json!(self.meals_per_day.unwrap_or(DEFAULT_MEALS_PER_DAY)),
        );
        parts
    }
}

/// A bedtime-story generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryRequest {
    /// Story theme; case and surrounding whitespace are not significant.
    pub theme: String,
    /// Target audience; case-insensitive; `None` means [`DEFAULT_AGE_GROUP`].
    pub age_group: Option<String>,
    /// Character names; order is not significant.
    pub characters: Vec<String>,
}

impl StoryRequest {
    pub fn new(theme: impl Into<String>) -> Self {
        Self {
            theme: theme.into(),
            age_group: None,
            characters: Vec::new(),
        }
    }

    pub fn with_age_group(mut self, age_group: impl Into<String>) -> Self {
        self.age_group = Some(age_group.into());
        self
    }

    pub fn with_character(mut self, character: impl Into<String>) -> Self {
        self.characters.push(character.into());
        self
    }
}

impl Fingerprintable for StoryRequest {
    fn canonicalize(&self) -> BTreeMap<&'static str, serde_json::Value> {
        let mut characters = self.characters.clone();
        characters.sort();

        let mut parts = BTreeMap::new();
        parts.insert("theme", serde_json::json!(self.theme.trim().to_lowercase()));
        parts.insert(
            "age_group",
            serde_json::json!(self
                .age_group
                .as_deref()
                .unwrap_or(DEFAULT_AGE_GROUP)
                .trim()
                .to_lowercase()),
        );
        parts.insert("characters", serde_json::json!(characters));
        parts
    }
}
