// Datasource domain model
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A configured backend. Appears as a reference on panels, targets and template
/// variables, and as a full entry in the `/api/datasources` listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datasource {
    #[serde(default)]
    pub uid: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(rename = "isDefault", default)]
    pub is_default: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Datasource {
    pub fn new(uid: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// No uid means "not configured"
    pub fn is_empty(&self) -> bool {
        self.uid.is_empty()
    }

    /// Picks the backend-wide default out of a datasource listing.
    /// The first entry flagged as default wins; no default yields an empty datasource.
    pub fn find_default(datasources: Vec<Datasource>) -> Datasource {
        datasources
            .into_iter()
            .find(|ds| ds.is_default)
            .unwrap_or_default()
    }

    /// Reference form attached to query targets: `{"type": .., "uid": ..}`
    pub fn to_reference(&self) -> Value {
        let mut reference = Map::new();
        if !self.kind.is_empty() {
            reference.insert("type".to_string(), Value::String(self.kind.clone()));
        }
        if !self.uid.is_empty() {
            reference.insert("uid".to_string(), Value::String(self.uid.clone()));
        }
        Value::Object(reference)
    }
}

/// Accepts the shapes dashboards use for datasource references: an object,
/// a bare uid string (older schema versions) or null.
pub fn deserialize_reference<'de, D>(deserializer: D) -> Result<Option<Datasource>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(uid)) => Ok(Some(Datasource {
            uid,
            ..Datasource::default()
        })),
        Some(other) => serde_json::from_value(other)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
