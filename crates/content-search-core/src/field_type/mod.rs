//! Per-field-type index encoders.
//!
//! The indexing mapper asks the [`FieldTypeRegistry`] for the encoder of a field's
//! [`FieldKind`] and stores whatever values it returns. The gateway uses the same encoder
//! to turn stored values back into a [`FieldValue`] when rebuilding hits.
//!
//! Built-in encoders cover every kind; [`FieldTypeRegistry::register`] replaces one.

pub mod date_time;

use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::content::FieldValue;
use crate::document::IndexValue;
use crate::error::{Error, Result};
use crate::field_registry::FieldKind;

pub use date_time::{DateAndTimeValue, DateTimeEncoder, DateTimeHash};

/// Converts field values to and from index values.
pub trait FieldTypeEncoder: Send + Sync {
    /// Kind handled by this encoder.
    fn kind(&self) -> FieldKind;

    /// Values to store for one field translation. An empty vector stores nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the value does not fit the kind.
    fn index_values(&self, value: &FieldValue) -> Result<Vec<IndexValue>>;

    /// Text contributed to the full-text index, if any.
    fn full_text(&self, _value: &FieldValue) -> Option<String> {
        None
    }

    /// Rebuilds a field value from stored values.
    fn decode(&self, values: &[IndexValue]) -> Option<FieldValue>;
}

pub(crate) fn mismatch(kind: FieldKind, value: &FieldValue) -> Error {
    Error::InvalidArgument(format!(
        "a {} value cannot be indexed as {kind:?}",
        value.type_name()
    ))
}

/// String and text fields.
#[derive(Debug)]
pub struct TextEncoder {
    kind: FieldKind,
}

impl TextEncoder {
    /// Encoder for exact strings.
    #[must_use]
    pub const fn string() -> Self {
        Self {
            kind: FieldKind::String,
        }
    }

    /// Encoder for analysed text.
    #[must_use]
    pub const fn text() -> Self {
        Self {
            kind: FieldKind::Text,
        }
    }
}

impl FieldTypeEncoder for TextEncoder {
    fn kind(&self) -> FieldKind {
        self.kind
    }

    fn index_values(&self, value: &FieldValue) -> Result<Vec<IndexValue>> {
        match value {
            FieldValue::Text(text) => Ok(vec![IndexValue::String(text.clone())]),
            other => Err(mismatch(self.kind, other)),
        }
    }

    fn full_text(&self, value: &FieldValue) -> Option<String> {
        match value {
            FieldValue::Text(text) if !text.is_empty() => Some(text.clone()),
            _ => None,
        }
    }

    fn decode(&self, values: &[IndexValue]) -> Option<FieldValue> {
        values
            .first()?
            .as_str()
            .map(|s| FieldValue::Text(s.to_owned()))
    }
}

/// Integer fields.
#[derive(Debug, Default)]
pub struct IntegerEncoder;

impl FieldTypeEncoder for IntegerEncoder {
    fn kind(&self) -> FieldKind {
        FieldKind::Integer
    }

    fn index_values(&self, value: &FieldValue) -> Result<Vec<IndexValue>> {
        match value {
            FieldValue::Integer(i) => Ok(vec![IndexValue::Integer(*i)]),
            other => Err(mismatch(self.kind(), other)),
        }
    }

    fn decode(&self, values: &[IndexValue]) -> Option<FieldValue> {
        values.first()?.as_i64().map(FieldValue::Integer)
    }
}

/// Float fields; integers are widened.
#[derive(Debug, Default)]
pub struct FloatEncoder;

impl FieldTypeEncoder for FloatEncoder {
    fn kind(&self) -> FieldKind {
        FieldKind::Float
    }

    #[allow(clippy::cast_precision_loss)]
    fn index_values(&self, value: &FieldValue) -> Result<Vec<IndexValue>> {
        match value {
            FieldValue::Float(f) => Ok(vec![IndexValue::Float(*f)]),
            FieldValue::Integer(i) => Ok(vec![IndexValue::Float(*i as f64)]),
            other => Err(mismatch(self.kind(), other)),
        }
    }

    fn decode(&self, values: &[IndexValue]) -> Option<FieldValue> {
        values.first()?.as_f64().map(FieldValue::Float)
    }
}

/// Boolean fields.
#[derive(Debug, Default)]
pub struct BooleanEncoder;

impl FieldTypeEncoder for BooleanEncoder {
    fn kind(&self) -> FieldKind {
        FieldKind::Boolean
    }

    fn index_values(&self, value: &FieldValue) -> Result<Vec<IndexValue>> {
        match value {
            FieldValue::Boolean(b) => Ok(vec![IndexValue::Boolean(*b)]),
            other => Err(mismatch(self.kind(), other)),
        }
    }

    fn decode(&self, values: &[IndexValue]) -> Option<FieldValue> {
        values.first()?.as_bool().map(FieldValue::Boolean)
    }
}

/// Map-location fields, stored as geo points. The address feeds the full text.
#[derive(Debug, Default)]
pub struct MapLocationEncoder;

impl FieldTypeEncoder for MapLocationEncoder {
    fn kind(&self) -> FieldKind {
        FieldKind::GeoLocation
    }

    fn index_values(&self, value: &FieldValue) -> Result<Vec<IndexValue>> {
        match value {
            FieldValue::MapLocation {
                latitude,
                longitude,
                ..
            } => {
                if !(-90.0..=90.0).contains(latitude) || !(-180.0..=180.0).contains(longitude) {
                    return Err(Error::InvalidArgument(format!(
                        "invalid coordinates ({latitude}, {longitude})"
                    )));
                }
                Ok(vec![IndexValue::GeoPoint {
                    lat: *latitude,
                    lon: *longitude,
                }])
            }
            other => Err(mismatch(self.kind(), other)),
        }
    }

    fn full_text(&self, value: &FieldValue) -> Option<String> {
        match value {
            FieldValue::MapLocation {
                address: Some(address),
                ..
            } if !address.is_empty() => Some(address.clone()),
            _ => None,
        }
    }

    fn decode(&self, values: &[IndexValue]) -> Option<FieldValue> {
        match values.first()? {
            IndexValue::GeoPoint { lat, lon } => Some(FieldValue::MapLocation {
                latitude: *lat,
                longitude: *lon,
                address: None,
            }),
            _ => None,
        }
    }
}

/// Encoders by field kind.
#[derive(Clone)]
pub struct FieldTypeRegistry {
    encoders: FxHashMap<FieldKind, Arc<dyn FieldTypeEncoder>>,
}

impl std::fmt::Debug for FieldTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<FieldKind> = self.encoders.keys().copied().collect();
        kinds.sort_unstable_by_key(|k| k.suffix());
        f.debug_struct("FieldTypeRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

impl Default for FieldTypeRegistry {
    fn default() -> Self {
        let mut registry = Self {
            encoders: FxHashMap::default(),
        };
        registry.register(Arc::new(TextEncoder::string()));
        registry.register(Arc::new(TextEncoder::text()));
        registry.register(Arc::new(IntegerEncoder));
        registry.register(Arc::new(FloatEncoder));
        registry.register(Arc::new(BooleanEncoder));
        registry.register(Arc::new(DateTimeEncoder));
        registry.register(Arc::new(MapLocationEncoder));
        registry
    }
}

impl FieldTypeRegistry {
    /// Registry with the built-in encoders.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs an encoder for its kind, replacing the previous one.
    pub fn register(&mut self, encoder: Arc<dyn FieldTypeEncoder>) {
        self.encoders.insert(encoder.kind(), encoder);
    }

    /// Encoder for a kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Internal`] if no encoder handles the kind.
    pub fn encoder(&self, kind: FieldKind) -> Result<Arc<dyn FieldTypeEncoder>> {
        self.encoders
            .get(&kind)
            .cloned()
            .ok_or_else(|| Error::Internal(format!("no encoder registered for {kind:?}")))
    }
}
