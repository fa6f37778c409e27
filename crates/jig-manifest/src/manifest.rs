//! The persisted extension manifest.

use std::fs;

use camino::Utf8Path;
use serde_json::{Map, Value};

use crate::contribution::GrammarContribution;
use crate::error::ManifestError;

/// An extension manifest held as a JSON document.
///
/// Only `contributes.languages` and `contributes.grammars` are interpreted;
/// every other field, and the key order of the whole document, is preserved
/// verbatim when the manifest is written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    document: Value,
}

impl Manifest {
    /// Parses a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Parse`] for malformed JSON and
    /// [`ManifestError::Shape`] when the document is not an object.
    pub fn from_json(source: &str) -> Result<Self, ManifestError> {
        let document: Value = serde_json::from_str(source).map_err(ManifestError::parse)?;
        if !document.is_object() {
            return Err(ManifestError::shape("$", "is not an object"));
        }
        Ok(Self { document })
    }

    /// Reads a manifest from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Read`] when the file cannot be read and any
    /// error raised by [`Manifest::from_json`].
    pub fn from_path(path: &Utf8Path) -> Result<Self, ManifestError> {
        let source = fs::read_to_string(path).map_err(|error| ManifestError::read(path, error))?;
        Self::from_json(&source)
    }

    /// The underlying document.
    #[must_use]
    pub const fn document(&self) -> &Value {
        &self.document
    }

    /// Renders the manifest with two-space indentation and a trailing newline.
    ///
    /// # Errors
    ///
    /// Propagates serialisation failures.
    pub fn to_json_string(&self) -> Result<String, ManifestError> {
        let mut rendered =
            serde_json::to_string_pretty(&self.document).map_err(ManifestError::parse)?;
        rendered.push('\n');
        Ok(rendered)
    }

    /// Writes the manifest to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Write`] when the file cannot be written.
    pub fn write(&self, path: &Utf8Path) -> Result<(), ManifestError> {
        let rendered = self.to_json_string()?;
        fs::write(path, rendered).map_err(|error| ManifestError::write(path, error))
    }

    /// Raw `contributes.languages` entries; empty when the section is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Shape`] when the section is not an array.
    pub fn languages(&self) -> Result<&[Value], ManifestError> {
        self.section("languages")
    }

    /// Raw `contributes.grammars` entries; empty when the section is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Shape`] when the section is not an array.
    pub fn grammars(&self) -> Result<&[Value], ManifestError> {
        self.section("grammars")
    }

    /// Every declared grammar, typed.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Shape`] when an entry lacks `scopeName` or
    /// `path`.
    pub fn declared_grammars(&self) -> Result<Vec<GrammarContribution>, ManifestError> {
        self.grammars()?
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                serde_json::from_value(entry.clone()).map_err(|error| {
                    ManifestError::shape(
                        format!("contributes.grammars[{index}]"),
                        format!("is not a grammar entry: {error}"),
                    )
                })
            })
            .collect()
    }

    fn section(&self, name: &str) -> Result<&[Value], ManifestError> {
        let Some(section) = self
            .document
            .get("contributes")
            .and_then(|contributes| contributes.get(name))
        else {
            return Ok(&[]);
        };
        section
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| ManifestError::shape(format!("contributes.{name}"), "is not an array"))
    }

    /// Mutable access to a contribution section, creating it when absent.
    pub(crate) fn section_mut(&mut self, name: &str) -> Result<&mut Vec<Value>, ManifestError> {
        let root = self
            .document
            .as_object_mut()
            .ok_or_else(|| ManifestError::shape("$", "is not an object"))?;
        let contributes = root
            .entry("contributes")
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| ManifestError::shape("contributes", "is not an object"))?;
        contributes
            .entry(name)
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
            .ok_or_else(|| ManifestError::shape(format!("contributes.{name}"), "is not an array"))
    }
}
