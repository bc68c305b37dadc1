//! Indexing mapper: content objects to flat index documents and back.
//!
//! Mapping is deterministic, so indexing the same content twice produces the same
//! document and the backend's replace-on-write keeps a single copy.

use chrono::{DateTime, Utc};
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::debug;

use crate::content::{Content, ContentInfo, Field, Location, VersionInfo, VersionStatus};
use crate::document::{names, Document, IndexValue};
use crate::error::{Error, Result};
use crate::field_registry::{FieldLanguage, FieldRegistry};
use crate::field_type::FieldTypeRegistry;

/// Maps [`Content`] to [`Document`] using the field and field-type registries.
#[derive(Debug, Clone)]
pub struct ContentMapper {
    fields: Arc<FieldRegistry>,
    field_types: Arc<FieldTypeRegistry>,
}

impl ContentMapper {
    /// Creates a mapper over shared registries.
    #[must_use]
    pub fn new(fields: Arc<FieldRegistry>, field_types: Arc<FieldTypeRegistry>) -> Self {
        Self {
            fields,
            field_types,
        }
    }

    /// Flattens a content object into its index document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when a field value does not fit its registered
    /// kind.
    pub fn map_content(&self, content: &Content) -> Result<Document> {
        let info = &content.info;
        let mut doc = Document::new(info.id.to_string());

        doc.add(names::ID, info.id);
        doc.add(names::TYPE, info.content_type_id);
        doc.add(names::TYPE_IDENTIFIER, info.content_type_identifier.as_str());
        doc.add(names::VERSION, content.version.version_no);
        doc.add(names::STATUS, content.version.status.code());
        doc.add(names::NAME, info.name.as_str());
        doc.add(names::CREATOR, content.version.creator_id);
        doc.add(names::SECTION, info.section_id);
        doc.add(names::REMOTE_ID, info.remote_id.as_str());
        doc.add(names::MODIFIED, IndexValue::Date(info.modification_date.timestamp()));
        doc.add(names::PUBLISHED, IndexValue::Date(info.publication_date.timestamp()));
        doc.add(names::MAIN_LANGUAGE_CODE, info.main_language_code.as_str());
        doc.add(names::ALWAYS_AVAILABLE, info.always_available);

        let mut seen = FxHashSet::default();
        for code in &content.version.language_codes {
            if seen.insert(code.as_str()) {
                doc.add(names::LANGUAGE_CODE, code.as_str());
            }
        }

        for location in &content.locations {
            doc.add(names::PATH, location.path_string.as_str());
            doc.add(names::LOCATION, location.id);
            doc.add(names::DEPTH, location.depth);
            doc.add(names::LOCATION_PARENT, location.parent_id);
            doc.add(names::LOCATION_REMOTE_ID, location.remote_id.as_str());
        }

        self.map_fields(content, &mut doc)?;

        debug!(
            content_id = info.id,
            fields = doc.fields.len(),
            "Mapped content to index document"
        );
        Ok(doc)
    }

    fn map_fields(&self, content: &Content, doc: &mut Document) -> Result<()> {
        let main = content.info.main_language_code.as_str();
        let content_type = content.info.content_type_identifier.as_str();

        // Main-language translations first so language-neutral fields take their value.
        let mut ordered: Vec<&Field> = content.fields.iter().collect();
        ordered.sort_by_key(|f| f.language_code != main);

        let mut neutral_written = FxHashSet::default();

        for field in ordered {
            let Some(definition) = self.fields.definition(content_type, &field.identifier) else {
                debug!(
                    content_type,
                    field = %field.identifier,
                    "Skipping unregistered field"
                );
                continue;
            };
            if !definition.searchable {
                continue;
            }

            let encoder = self.field_types.encoder(definition.kind)?;
            let values = encoder.index_values(&field.value)?;
            let base = definition.base_name();
            let language = field.language_code.as_str();
            let is_main = language == main;

            if definition.translatable {
                doc.extend(FieldLanguage::Code(language).project(&base), values.clone());
                doc.extend(FieldLanguage::Any.project(&base), values.clone());
                if is_main {
                    doc.extend(FieldLanguage::Main.project(&base), values);
                }
            } else if neutral_written.insert(field.identifier.as_str()) {
                doc.extend(base, values);
            }

            if let Some(text) = encoder.full_text(&field.value) {
                doc.add(FieldLanguage::Code(language).project(names::TEXT), text.as_str());
                doc.add(FieldLanguage::Any.project(names::TEXT), text.as_str());
                if is_main {
                    doc.add(FieldLanguage::Main.project(names::TEXT), text);
                }
            }
        }

        Ok(())
    }

    /// Rebuilds a content object from its index document.
    ///
    /// Fields come back for every indexed translation of every searchable registered field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] when a system field is missing or malformed.
    pub fn document_to_content(&self, doc: &Document) -> Result<Content> {
        let info = ContentInfo {
            id: int(doc, names::ID)?,
            content_type_id: int(doc, names::TYPE)?,
            content_type_identifier: string(doc, names::TYPE_IDENTIFIER)?,
            name: string(doc, names::NAME)?,
            section_id: int(doc, names::SECTION)?,
            remote_id: string(doc, names::REMOTE_ID)?,
            main_language_code: string(doc, names::MAIN_LANGUAGE_CODE)?,
            always_available: doc
                .first(names::ALWAYS_AVAILABLE)
                .and_then(IndexValue::as_bool)
                .unwrap_or(false),
            modification_date: date(doc, names::MODIFIED)?,
            publication_date: date(doc, names::PUBLISHED)?,
        };

        let status_code = int(doc, names::STATUS)?;
        let version = VersionInfo {
            version_no: int(doc, names::VERSION)?,
            status: VersionStatus::from_code(status_code).ok_or_else(|| {
                malformed(doc, names::STATUS, &format!("unknown status {status_code}"))
            })?,
            creator_id: int(doc, names::CREATOR)?,
            language_codes: doc
                .get(names::LANGUAGE_CODE)
                .iter()
                .filter_map(IndexValue::as_str)
                .map(str::to_owned)
                .collect(),
        };

        let locations = rebuild_locations(doc)?;
        let fields = self.rebuild_fields(doc, &info, &version)?;

        Ok(Content {
            info,
            version,
            locations,
            fields,
        })
    }

    fn rebuild_fields(
        &self,
        doc: &Document,
        info: &ContentInfo,
        version: &VersionInfo,
    ) -> Result<Vec<Field>> {
        let mut fields = Vec::new();

        for definition in self.fields.fields_of(&info.content_type_identifier) {
            if !definition.searchable {
                continue;
            }
            let encoder = self.field_types.encoder(definition.kind)?;
            let base = definition.base_name();

            if definition.translatable {
                for language in &version.language_codes {
                    let stored = doc.get(&FieldLanguage::Code(language).project(&base));
                    if let Some(value) = encoder.decode(stored) {
                        fields.push(Field::new(&definition.identifier, language, value));
                    }
                }
            } else if let Some(value) = encoder.decode(doc.get(&base)) {
                fields.push(Field::new(
                    &definition.identifier,
                    &info.main_language_code,
                    value,
                ));
            }
        }

        Ok(fields)
    }
}

fn malformed(doc: &Document, field: &str, reason: &str) -> Error {
    Error::Serialization(format!("document {}: field '{field}' {reason}", doc.id))
}

fn int(doc: &Document, field: &str) -> Result<i64> {
    doc.first(field)
        .and_then(IndexValue::as_i64)
        .ok_or_else(|| malformed(doc, field, "is missing or not an integer"))
}

fn string(doc: &Document, field: &str) -> Result<String> {
    doc.first(field)
        .and_then(IndexValue::as_str)
        .map(str::to_owned)
        .ok_or_else(|| malformed(doc, field, "is missing or not a string"))
}

fn date(doc: &Document, field: &str) -> Result<DateTime<Utc>> {
    let timestamp = int(doc, field)?;
    DateTime::from_timestamp(timestamp, 0)
        .ok_or_else(|| malformed(doc, field, "holds an out of range timestamp"))
}

fn rebuild_locations(doc: &Document) -> Result<Vec<Location>> {
    let paths = doc.get(names::PATH);
    let ids = doc.get(names::LOCATION);
    let depths = doc.get(names::DEPTH);
    let parents = doc.get(names::LOCATION_PARENT);
    let remote_ids = doc.get(names::LOCATION_REMOTE_ID);

    let count = paths.len();
    if [ids.len(), depths.len(), parents.len(), remote_ids.len()]
        .iter()
        .any(|&len| len != count)
    {
        return Err(malformed(
            doc,
            names::LOCATION,
            "is not aligned with the other location fields",
        ));
    }

    (0..count)
        .map(|i| {
            Some(Location {
                id: ids[i].as_i64()?,
                path_string: paths[i].as_str()?.to_owned(),
                depth: depths[i].as_i64()?,
                parent_id: parents[i].as_i64()?,
                remote_id: remote_ids[i].as_str()?.to_owned(),
            })
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| malformed(doc, names::LOCATION, "holds a value of the wrong type"))
}
