//! Page manifests.
//! Loads an existing `manifest.json` (or starts from a skeleton), rebuilds its `Actions` table
//! and writes it back with 4-space indentation.
//!
//! Regeneration is destructive: only the page indicator (`0,5`) and change-page (`2,5`) entries
//! survive from the old table, byte for byte. Every other top-level field is carried over
//! untouched and keeps its position in the file.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::button::MultiAction;
use crate::config::{DEVICE_MODEL, DEVICE_UUID, PROFILE_NAME, PROFILE_VERSION};
use crate::error::GenerateError;
use crate::layout::{PAGE_CHANGE_POSITION, PAGE_INDICATOR_POSITION, RESERVED_POSITIONS};
use crate::token;

pub const PAGE_INDICATOR_UUID: &str = "com.hotspot.streamdock.page.indicator";
pub const PAGE_CHANGE_UUID: &str = "com.hotspot.streamdock.page.change";

const ACTIONS_KEY: &str = "Actions";
const PAGES_KEY: &str = "Pages";

/// Top-level manifest object, kept in file order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    fields: Map<String, Value>,
}

/// `Pages` block of the root manifest.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageList {
    #[serde(rename = "Current")]
    pub current: String,
    #[serde(rename = "Pages")]
    pub pages: Vec<String>,
}

impl Manifest {
    pub fn skeleton() -> Self {
        let mut fields = Map::new();
        fields.insert(ACTIONS_KEY.to_string(), json!({}));
        fields.insert("DeviceModel".to_string(), json!(DEVICE_MODEL));
        fields.insert("DeviceUUID".to_string(), json!(DEVICE_UUID));
        fields.insert("Name".to_string(), json!(PROFILE_NAME));
        fields.insert("Version".to_string(), json!(PROFILE_VERSION));
        Manifest { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The action table; `None` when absent or not an object.
    pub fn actions(&self) -> Option<&Map<String, Value>> {
        self.fields.get(ACTIONS_KEY).and_then(Value::as_object)
    }

    /// Replaces `Pages` where it stands, or appends it.
    pub fn set_page_list(&mut self, list: &PageList) {
        self.fields.insert(
            PAGES_KEY.to_string(),
            json!({ "Current": list.current, "Pages": list.pages }),
        );
    }

    /// Replaces the action table: reserved entries first, then `buttons` in the given order.
    pub fn rebuild_actions<'a>(&mut self, buttons: impl IntoIterator<Item = (&'a str, MultiAction)>) {
        let mut actions = Map::new();
        for position in RESERVED_POSITIONS {
            let entry = self
                .reserved(position)
                .cloned()
                .unwrap_or_else(|| default_reserved(position));
            actions.insert(position.to_string(), entry);
        }
        for (position, button) in buttons {
            match serde_json::to_value(&button) {
                Ok(value) => {
                    actions.insert(position.to_string(), value);
                }
                // Plain structs of strings and numbers; not expected to happen
                Err(err) => tracing::error!("Failed to encode button at {}: {}", position, err),
            }
        }
        self.fields.insert(ACTIONS_KEY.to_string(), Value::Object(actions));
    }

    /// Existing reserved entry, if it holds anything worth keeping.
    fn reserved(&self, position: &str) -> Option<&Value> {
        self.actions()?.get(position).filter(|value| is_truthy(value))
    }
}

/// `false`, `0`, `""` and `null` count as an empty slot.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn default_reserved(position: &str) -> Value {
    match position {
        PAGE_INDICATOR_POSITION => json!({
            "ActionID": token::action_id(),
            "Controller": "",
            "Name": "Page Indicator",
            "Settings": {},
            "State": 0,
            "States": [{
                "FontSize": "20",
                "Image": "Images/btn_pageIndicator",
                "TitleAlignment": "middle"
            }],
            "UUID": PAGE_INDICATOR_UUID
        }),
        PAGE_CHANGE_POSITION => json!({
            "ActionID": token::action_id(),
            "Controller": "",
            "Name": "change page",
            "Settings": {},
            "State": 0,
            "States": [{ "Image": "" }],
            "UUID": PAGE_CHANGE_UUID
        }),
        _ => Value::Null,
    }
}

#[derive(Debug)]
pub enum ManifestSource {
    Existing,
    Missing,
    /// Present but unreadable or not a JSON object; the skeleton was used instead.
    Invalid(String),
}

/// Never fails: anything short of a JSON object yields the skeleton.
pub fn load_manifest(path: &Path) -> (Manifest, ManifestSource) {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return (Manifest::skeleton(), ManifestSource::Missing);
        }
        Err(err) => return (Manifest::skeleton(), ManifestSource::Invalid(err.to_string())),
    };
    match serde_json::from_str::<Manifest>(&text) {
        Ok(manifest) => (manifest, ManifestSource::Existing),
        Err(err) => (Manifest::skeleton(), ManifestSource::Invalid(err.to_string())),
    }
}

/// 4-space indented JSON, no trailing newline.
pub fn to_json_string(manifest: &Manifest) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    manifest.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn write_manifest(path: &Path, manifest: &Manifest) -> Result<(), GenerateError> {
    let text = to_json_string(manifest).map_err(|source| GenerateError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let mut file = fs::File::create(path).map_err(|e| GenerateError::io("write manifest", path, e))?;
    file.write_all(text.as_bytes())
        .map_err(|e| GenerateError::io("write manifest", path, e))
}
