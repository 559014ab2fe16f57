// Query result data model, as returned by /api/ds/query
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Decoded query response plus the legend templates resolved for each target.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Results {
    #[serde(default)]
    pub results: BTreeMap<String, TargetResult>,
    /// refId -> legend template. Attached after decoding, never part of the wire format.
    #[serde(skip)]
    pub legends: HashMap<String, String>,
}

impl Results {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn frame_count(&self, ref_id: &str) -> usize {
        self.results.get(ref_id).map_or(0, |r| r.frames.len())
    }

    pub fn legend(&self, ref_id: &str) -> Option<&str> {
        self.legends.get(ref_id).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub frames: Vec<Frame>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub schema: Schema,
    #[serde(default)]
    pub data: FrameData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "refId", default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Field {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: BTreeMap<String, String>,
}

/// Column-oriented values: by convention column 0 holds timestamps in ms and
/// column 1 the sample values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub values: Vec<Vec<Value>>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
