//! The validated, ordered catalogue of supported languages.

use std::collections::HashMap;
use std::fs;

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::descriptor::LanguageDescriptor;
use crate::error::RegistryError;
use crate::reserved::ReservedTags;

const BUILTIN_REGISTRY: &str = include_str!("../languages.json");

/// On-disk shape of a registry document.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RegistryDocument {
    #[serde(default)]
    reserved_tags: ReservedTags,
    languages: Vec<LanguageDescriptor>,
}

/// An immutable, validated list of language descriptors.
///
/// Declaration order is significant: it is the priority order used when
/// several embed rules could start at the same position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    languages: Vec<LanguageDescriptor>,
    reserved: ReservedTags,
}

impl Registry {
    /// Validates and wraps a list of descriptors.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistryError`] when the list is empty, an id is invalid
    /// or repeated, a host scope is missing, a name is unusable, two
    /// languages claim the same case-folded name, or the reserved tag set is
    /// malformed.
    pub fn new(
        languages: Vec<LanguageDescriptor>,
        reserved: ReservedTags,
    ) -> Result<Self, RegistryError> {
        if languages.is_empty() {
            return Err(RegistryError::Empty);
        }
        reserved.validate()?;

        let mut owners: HashMap<String, &str> = HashMap::new();
        for (index, language) in languages.iter().enumerate() {
            if !is_language_id(language.id()) {
                return Err(RegistryError::invalid_id(language.id()));
            }
            if languages
                .iter()
                .take(index)
                .any(|earlier| earlier.id() == language.id())
            {
                return Err(RegistryError::duplicate_id(language.id()));
            }
            if language.host_grammar_scope().trim().is_empty() {
                return Err(RegistryError::missing_host_scope(language.id()));
            }
            for name in language.names() {
                if name.is_empty() || name.chars().any(char::is_whitespace) || name.contains("::")
                {
                    return Err(RegistryError::invalid_name(language.id(), name));
                }
                let folded = name.to_lowercase();
                match owners.get(&folded) {
                    Some(owner) if *owner != language.id() => {
                        return Err(RegistryError::alias_collision(
                            folded,
                            *owner,
                            language.id(),
                        ));
                    }
                    Some(_) => {}
                    None => {
                        owners.insert(folded, language.id());
                    }
                }
            }
        }

        Ok(Self {
            languages,
            reserved,
        })
    }

    /// Parses and validates a registry document.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Parse`] for malformed JSON and any
    /// validation error raised by [`Registry::new`].
    pub fn from_json(source: &str) -> Result<Self, RegistryError> {
        let document: RegistryDocument =
            serde_json::from_str(source).map_err(RegistryError::parse)?;
        Self::new(document.languages, document.reserved_tags)
    }

    /// Reads, parses, and validates a registry document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Read`] when the file cannot be read, and any
    /// error raised by [`Registry::from_json`].
    pub fn from_path(path: &Utf8Path) -> Result<Self, RegistryError> {
        let source = fs::read_to_string(path).map_err(|error| RegistryError::read(path, error))?;
        Self::from_json(&source)
    }

    /// The catalogue shipped with the toolkit.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded catalogue itself is invalid.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_json(BUILTIN_REGISTRY)
    }

    /// Serialises the registry back into its document form.
    ///
    /// # Errors
    ///
    /// Propagates serialisation failures.
    pub fn to_json(&self) -> Result<String, RegistryError> {
        let document = RegistryDocument {
            reserved_tags: self.reserved.clone(),
            languages: self.languages.clone(),
        };
        serde_json::to_string_pretty(&document).map_err(RegistryError::parse)
    }

    /// Descriptors in declaration order.
    #[must_use]
    pub fn languages(&self) -> &[LanguageDescriptor] {
        &self.languages
    }

    /// Identifiers in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(LanguageDescriptor::id)
    }

    /// Number of declared languages.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.languages.len()
    }

    /// Always false for a validated registry; present for API symmetry.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Looks up a descriptor by exact id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LanguageDescriptor> {
        self.languages.iter().find(|language| language.id() == id)
    }

    /// Declaration index of `id`, used as its embed priority.
    #[must_use]
    pub fn priority(&self, id: &str) -> Option<usize> {
        self.languages.iter().position(|language| language.id() == id)
    }

    /// Resolves an id or alias, ignoring case.
    ///
    /// # Examples
    ///
    /// ```
    /// use jig_registry::Registry;
    ///
    /// let registry = Registry::builtin()?;
    /// let language = registry.resolve("TS").map(|language| language.id());
    /// assert_eq!(language, Some("typescript"));
    /// # Ok::<(), jig_registry::RegistryError>(())
    /// ```
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&LanguageDescriptor> {
        let folded = name.to_lowercase();
        self.languages
            .iter()
            .find(|language| language.names().any(|candidate| candidate.to_lowercase() == folded))
    }

    /// Finds the language associated with a file path.
    #[must_use]
    pub fn for_path(&self, path: &std::path::Path) -> Option<&LanguageDescriptor> {
        self.languages
            .iter()
            .find(|language| language.matches_path(path))
    }

    /// The reserved tag vocabulary.
    #[must_use]
    pub const fn reserved_tags(&self) -> &ReservedTags {
        &self.reserved
    }
}

fn is_language_id(id: &str) -> bool {
    let starts_with_letter = id.chars().next().is_some_and(|c| c.is_ascii_lowercase());
    starts_with_letter
        && !id.ends_with('-')
        && !id.contains("--")
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
