// Panel query target model
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DATASOURCE: &str = "datasource";
pub const EXPR: &str = "expr";
pub const LEGEND_FORMAT: &str = "legendFormat";
pub const REF_ID: &str = "refId";
pub const MAX_DATA_POINTS: &str = "maxDataPoints";
pub const INTERVAL_MS: &str = "intervalMs";

/// One query definition of a panel.
///
/// The shape depends on the datasource plugin, so the target stays a raw JSON object
/// and is sent back to Grafana verbatim. Typed accessors return `None` when a key is
/// absent or holds a different type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Target(Map<String, Value>);

impl Target {
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(Value::as_i64)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Sets `key` only when absent. Returns whether a value was written.
    pub fn set_if_absent(&mut self, key: &str, value: impl Into<Value>) -> bool {
        if self.contains(key) {
            return false;
        }
        self.set(key, value);
        true
    }

    pub fn ref_id(&self) -> Option<&str> {
        self.get_str(REF_ID)
    }

    pub fn expr(&self) -> Option<&str> {
        self.get_str(EXPR)
    }

    pub fn legend_format(&self) -> Option<&str> {
        self.get_str(LEGEND_FORMAT)
    }
}
