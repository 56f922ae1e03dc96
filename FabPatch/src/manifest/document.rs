//! Typed view over the manifest JSON

use serde_json::{Map, Value};

use super::MANIFEST_PATH;
use crate::error::{Error, Result};

const DEPENDS_KEY: &str = "depends";
const MINECRAFT_KEY: &str = "minecraft";
const NAME_KEY: &str = "name";

/// A parsed `fabric.mod.json`.
///
/// Only `name` and `depends.minecraft` are interpreted. The rest of the
/// document is kept as-is, in its original key order, and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct ModManifest {
    document: Map<String, Value>,
}

impl ModManifest {
    /// Parse manifest text.
    ///
    /// A leading UTF-8 byte order mark is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ManifestMalformed`] if the text is not JSON or the root
    /// is not an object.
    ///
    /// [`Error::ManifestMalformed`]: crate::Error::ManifestMalformed
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let value: Value =
            serde_json::from_str(text).map_err(|e| Error::ManifestMalformed(e.to_string()))?;
        Self::from_value(value)
    }

    /// Build a manifest from an already parsed JSON value.
    ///
    /// Field shapes are not checked here. A `depends` that is not an object
    /// simply declares no Minecraft dependency.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(document) = value else {
            return Err(Error::ManifestMalformed(
                "top-level value is not an object".to_string(),
            ));
        };

        Ok(Self { document })
    }

    /// The display name, if declared as a string.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.document.get(NAME_KEY).and_then(Value::as_str)
    }

    /// The raw `name` value, whatever its JSON type.
    #[must_use]
    pub fn name_value(&self) -> Option<&Value> {
        self.document.get(NAME_KEY)
    }

    /// Replace the display name. Only called when a name is already declared.
    pub(crate) fn set_name(&mut self, name: String) {
        if let Some(slot) = self.document.get_mut(NAME_KEY) {
            *slot = Value::String(name);
        }
    }

    /// The raw `depends.minecraft` constraint, if declared.
    ///
    /// Fabric allows a single version string or a list of alternatives.
    #[must_use]
    pub fn minecraft_dependency(&self) -> Option<&Value> {
        self.document
            .get(DEPENDS_KEY)
            .and_then(Value::as_object)
            .and_then(|depends| depends.get(MINECRAFT_KEY))
    }

    /// Overwrite an existing `depends.minecraft` constraint.
    ///
    /// Returns `false` when the manifest declares no Minecraft dependency.
    pub(crate) fn set_minecraft_dependency(&mut self, version: &str) -> bool {
        let slot = self
            .document
            .get_mut(DEPENDS_KEY)
            .and_then(Value::as_object_mut)
            .and_then(|depends| depends.get_mut(MINECRAFT_KEY));

        match slot {
            Some(slot) => {
                *slot = Value::String(version.to_string());
                true
            }
            None => false,
        }
    }

    /// The underlying JSON object.
    #[must_use]
    pub fn as_json(&self) -> &Map<String, Value> {
        &self.document
    }

    /// Serialize with four-space indentation and a trailing newline.
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        serde::Serialize::serialize(&self.document, &mut ser)?;
        buf.push(b'\n');
        String::from_utf8(buf).map_err(|e| Error::write_failure(MANIFEST_PATH, e))
    }
}
