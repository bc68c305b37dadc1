//! Field registry: logical content fields to physical index field names.
//!
//! Physical names are derived from the content type, the field identifier and the field
//! kind: `<content_type>_<field>_value_<suffix>`. Translatable fields are indexed once per
//! language (`<base>_<language>`), once for the main language (`<base>_main`) and once
//! aggregated over every language (`<base>_all`).
//!
//! The registry is built once from [`FieldDefinition`]s and shared read-only.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::criterion::CustomFields;
use crate::error::{Error, Result};

/// Index-level kind of a content field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Exact-match string.
    String,
    /// Analysed text.
    Text,
    /// 64-bit integer.
    Integer,
    /// 64-bit float.
    Float,
    /// Boolean.
    Boolean,
    /// Date and time, stored as a UTC timestamp.
    Date,
    /// Geographic point.
    GeoLocation,
}

impl FieldKind {
    /// Suffix appended to physical field names.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::String => "s",
            Self::Text => "t",
            Self::Integer => "i",
            Self::Float => "f",
            Self::Boolean => "b",
            Self::Date => "dt",
            Self::GeoLocation => "gl",
        }
    }

    /// Whether values of this kind feed the full-text index.
    #[must_use]
    pub const fn is_textual(self) -> bool {
        matches!(self, Self::String | Self::Text)
    }
}

const fn default_true() -> bool {
    true
}

/// Definition of one content-type field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Content type identifier, e.g. `folder`.
    pub content_type: String,
    /// Field identifier, e.g. `name`.
    pub identifier: String,
    /// Index kind.
    pub kind: FieldKind,
    /// Whether values differ per translation.
    #[serde(default = "default_true")]
    pub translatable: bool,
    /// Whether the field is indexed at all.
    #[serde(default = "default_true")]
    pub searchable: bool,
}

impl FieldDefinition {
    /// Creates a translatable, searchable definition.
    #[must_use]
    pub fn new(
        content_type: impl Into<String>,
        identifier: impl Into<String>,
        kind: FieldKind,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            identifier: identifier.into(),
            kind,
            translatable: true,
            searchable: true,
        }
    }

    /// Sets translatability.
    #[must_use]
    pub fn translatable(mut self, translatable: bool) -> Self {
        self.translatable = translatable;
        self
    }

    /// Sets searchability.
    #[must_use]
    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    /// Default physical base name, before any language projection.
    #[must_use]
    pub fn base_name(&self) -> String {
        format!(
            "{}_{}_value_{}",
            self.content_type,
            self.identifier,
            self.kind.suffix()
        )
    }
}

/// Language projection of a physical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLanguage<'a> {
    /// The translation in one language.
    Code(&'a str),
    /// The main-language translation.
    Main,
    /// Every translation, aggregated.
    Any,
}

impl FieldLanguage<'_> {
    /// Appends the projection suffix to a base name.
    #[must_use]
    pub fn project(self, base: &str) -> String {
        match self {
            Self::Code(code) => format!("{base}_{code}"),
            Self::Main => format!("{base}_main"),
            Self::Any => format!("{base}_all"),
        }
    }
}

/// Registered content-type fields, keyed by `(content_type, identifier)`.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: FxHashMap<(String, String), FieldDefinition>,
    by_identifier: FxHashMap<String, Vec<String>>,
}

impl FieldRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from field definitions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a `(content_type, identifier)` pair is defined twice
    /// or a name component is empty.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = FieldDefinition>,
    ) -> Result<Self> {
        let mut registry = Self::new();
        for definition in definitions {
            registry.register(definition)?;
        }
        Ok(registry)
    }

    /// Adds one definition.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for duplicates or empty name components.
    pub fn register(&mut self, definition: FieldDefinition) -> Result<()> {
        if definition.content_type.is_empty() || definition.identifier.is_empty() {
            return Err(Error::Config(
                "field definitions need a content type and an identifier".into(),
            ));
        }

        let key = (
            definition.content_type.clone(),
            definition.identifier.clone(),
        );
        if self.fields.contains_key(&key) {
            return Err(Error::Config(format!(
                "duplicate field definition {}/{}",
                key.0, key.1
            )));
        }

        let content_types = self
            .by_identifier
            .entry(definition.identifier.clone())
            .or_default();
        content_types.push(definition.content_type.clone());
        content_types.sort_unstable();

        self.fields.insert(key, definition);
        Ok(())
    }

    /// Number of registered fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up one definition.
    #[must_use]
    pub fn definition(&self, content_type: &str, identifier: &str) -> Option<&FieldDefinition> {
        self.fields
            .get(&(content_type.to_owned(), identifier.to_owned()))
    }

    /// Every definition with the given identifier, ordered by content type.
    #[must_use]
    pub fn definitions_for(&self, identifier: &str) -> Vec<&FieldDefinition> {
        self.by_identifier
            .get(identifier)
            .into_iter()
            .flatten()
            .filter_map(|content_type| self.definition(content_type, identifier))
            .collect()
    }

    /// Every definition of one content type, ordered by identifier.
    #[must_use]
    pub fn fields_of(&self, content_type: &str) -> Vec<&FieldDefinition> {
        let mut fields: Vec<&FieldDefinition> = self
            .fields
            .values()
            .filter(|d| d.content_type == content_type)
            .collect();
        fields.sort_unstable_by(|a, b| a.identifier.cmp(&b.identifier));
        fields
    }

    /// Physical base name for a field, honouring an override for the exact pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] when the pair is neither overridden nor registered
    /// as searchable.
    pub fn base_name(
        &self,
        content_type: &str,
        identifier: &str,
        overrides: &CustomFields,
    ) -> Result<String> {
        if let Some(custom) = overrides.get(content_type, identifier) {
            return Ok(custom.to_owned());
        }
        self.searchable(content_type, identifier)
            .map(FieldDefinition::base_name)
    }

    /// Resolves a logical field to its physical name.
    ///
    /// The override for `(content_type, identifier)` replaces the base name. Translatable
    /// fields get the language projection appended; other fields use the base name.
    /// An overridden field that is not registered is treated as language neutral.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] when the pair is neither overridden nor registered
    /// as searchable.
    pub fn resolve(
        &self,
        content_type: &str,
        identifier: &str,
        language: FieldLanguage<'_>,
        overrides: &CustomFields,
    ) -> Result<String> {
        let base = self.base_name(content_type, identifier, overrides)?;
        let translatable = self
            .definition(content_type, identifier)
            .is_some_and(|d| d.translatable);

        if translatable {
            Ok(language.project(&base))
        } else {
            Ok(base)
        }
    }

    fn searchable(&self, content_type: &str, identifier: &str) -> Result<&FieldDefinition> {
        self.definition(content_type, identifier)
            .filter(|d| d.searchable)
            .ok_or_else(|| Error::UnknownField(format!("{content_type}/{identifier}")))
    }
}
