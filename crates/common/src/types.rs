// Core domain types shared across all reqbook crates.

use std::fmt;
use std::str::FromStr;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Method shown for records that never set one.
pub const DEFAULT_METHOD: &str = "GET";

/// Storage domain a request record belongs to.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Scope {
    /// Per-installation key/value slot. Where a save lands by default.
    #[default]
    Global,
    /// Per-workspace file under the active project root.
    Project,
}

impl Scope {
    /// Lookup order used whenever the owning scope is unknown.
    pub const SEARCH_ORDER: [Scope; 2] = [Scope::Global, Scope::Project];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Project => "project",
        }
    }

    /// Section heading used by the display hierarchy.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Global => "Global",
            Self::Project => "Project",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown scope `{0}` (expected `global` or `project`)")]
pub struct ParseScopeError(pub String);

impl FromStr for Scope {
    type Err = ParseScopeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "global" => Ok(Self::Global),
            "project" => Ok(Self::Project),
            _ => Err(ParseScopeError(value.to_string())),
        }
    }
}

impl TryFrom<String> for Scope {
    type Error = ParseScopeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A saved HTTP-style request.
///
/// `id`, `name`, `method`, `url` and the transient `scope` tag are the only
/// fields the core reads. Everything else (headers, body, auth blobs written
/// by an editing surface) lands in `extra` and is carried through verbatim.
/// A known field whose value has an unexpected shape also stays in `extra`
/// untouched, so no stored record is ever unreadable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestRecord {
    /// Assigned by the store on first save, never changed afterwards.
    pub id: Option<String>,
    pub name: Option<String>,
    pub method: Option<String>,
    pub url: Option<String>,
    /// Which store the record lives in. Carried in messages, stripped on disk.
    pub scope: Option<Scope>,
    pub extra: Map<String, Value>,
}

impl RequestRecord {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self { method: Some(method.into()), url: Some(url.into()), ..Self::default() }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Attach an opaque pass-through field (headers, body, ...).
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The name, if it is set and not blank.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.trim().is_empty())
    }

    pub fn method_or_default(&self) -> &str {
        match self.method.as_deref() {
            Some(method) if !method.is_empty() => method,
            _ => DEFAULT_METHOD,
        }
    }

    /// `"<method> <url>"`, used whenever no name is set.
    pub fn summary(&self) -> String {
        format!("{} {}", self.method_or_default(), self.url.as_deref().unwrap_or_default())
    }

    /// Primary label: the name when present, otherwise the summary.
    pub fn label(&self) -> String {
        match self.display_name() {
            Some(name) => name.to_string(),
            None => self.summary(),
        }
    }

    /// Secondary text: the summary, only when the label is a real name.
    pub fn description(&self) -> Option<String> {
        self.display_name().map(|_| self.summary())
    }
}

const ID_KEY: &str = "id";
const NAME_KEY: &str = "name";
const METHOD_KEY: &str = "method";
const URL_KEY: &str = "url";
const SCOPE_KEY: &str = "scope";

impl Serialize for RequestRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let typed = [
            (ID_KEY, self.id.as_deref()),
            (NAME_KEY, self.name.as_deref()),
            (METHOD_KEY, self.method.as_deref()),
            (URL_KEY, self.url.as_deref()),
            (SCOPE_KEY, self.scope.map(Scope::as_str)),
        ];

        let mut map = serializer.serialize_map(None)?;
        for (key, value) in typed {
            if let Some(value) = value {
                map.serialize_entry(key, value)?;
            }
        }
        // A typed value wins over a raw value kept under the same key.
        for (key, value) in &self.extra {
            let shadowed = typed.iter().any(|(typed_key, typed)| *typed_key == key.as_str() && typed.is_some());
            if !shadowed {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RequestRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra = Map::<String, Value>::deserialize(deserializer)?;
        for key in [ID_KEY, NAME_KEY, METHOD_KEY, URL_KEY, SCOPE_KEY] {
            if extra.get(key).is_some_and(Value::is_null) {
                extra.remove(key);
            }
        }
        // An empty id means "not yet saved".
        if extra.get(ID_KEY).and_then(Value::as_str) == Some("") {
            extra.remove(ID_KEY);
        }

        Ok(Self {
            id: take_field(&mut extra, ID_KEY, read_id),
            name: take_field(&mut extra, NAME_KEY, read_text),
            method: take_field(&mut extra, METHOD_KEY, read_text),
            url: take_field(&mut extra, URL_KEY, read_text),
            scope: take_field(&mut extra, SCOPE_KEY, |value| value.as_str()?.parse().ok()),
            extra,
        })
    }
}

/// Move `key` out of `map` only when `read` understands its value.
fn take_field<T>(map: &mut Map<String, Value>, key: &str, read: impl FnOnce(&Value) -> Option<T>) -> Option<T> {
    let parsed = read(map.get(key)?)?;
    map.remove(key);
    Some(parsed)
}

// Legacy records sometimes carry numeric ids.
fn read_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn read_text(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}
