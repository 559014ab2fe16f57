// Dashboard domain model, as returned by /api/dashboards/uid/{uid}
use super::datasource::{deserialize_reference, Datasource};
use super::target::Target;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardResponse {
    pub dashboard: Dashboard,
}

/// Only the parts of the dashboard JSON the query pipeline reads; everything else
/// is ignored on decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub panels: Vec<Panel>,
    #[serde(default)]
    pub time: TimeWindow,
    #[serde(default)]
    pub templating: Templating,
}

/// Dashboard default time range, usually relative (`now-6h` .. `now`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: String,
    pub to: String,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            from: "now-6h".to_string(),
            to: "now".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Panel {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "deserialize_reference")]
    pub datasource: Option<Datasource>,
    /// `None` when the panel leaves it unset; zero is a legitimate value
    #[serde(rename = "maxDataPoints", default)]
    pub max_data_points: Option<i64>,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub targets: Vec<Target>,
    /// Children of a collapsed row panel
    #[serde(default)]
    pub panels: Vec<Panel>,
}

impl Panel {
    pub fn interval(&self) -> &str {
        self.interval.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Templating {
    #[serde(default)]
    pub list: Vec<TemplateVariable>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateVariable {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Plugin specific payload; query variables carry `{"query": "..."}`
    #[serde(default)]
    pub query: Value,
    #[serde(default, deserialize_with = "deserialize_reference")]
    pub datasource: Option<Datasource>,
}

impl TemplateVariable {
    pub fn is_query(&self) -> bool {
        self.kind == "query"
    }

    /// The query string, if the payload has the expected `{"query": "<string>"}` shape
    pub fn query_string(&self) -> Option<&str> {
        self.query.as_object()?.get("query")?.as_str()
    }
}

impl Dashboard {
    /// Every panel, with collapsed row children flattened in after their row
    pub fn all_panels(&self) -> Vec<&Panel> {
        fn walk<'a>(panels: &'a [Panel], out: &mut Vec<&'a Panel>) {
            for panel in panels {
                out.push(panel);
                walk(&panel.panels, out);
            }
        }

        let mut out = Vec::new();
        walk(&self.panels, &mut out);
        out
    }

    pub fn panel_by_id(&self, id: i64) -> Option<&Panel> {
        self.all_panels().into_iter().find(|p| p.id == id)
    }

    /// First panel with a matching title
    pub fn panel_by_title(&self, title: &str) -> Option<&Panel> {
        self.all_panels().into_iter().find(|p| p.title == title)
    }

    pub fn panel_summaries(&self) -> Vec<PanelSearch> {
        self.all_panels()
            .into_iter()
            .map(|p| PanelSearch {
                id: p.id,
                title: p.title.clone(),
                kind: p.kind.clone(),
            })
            .collect()
    }
}

/// One hit of /api/search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSearch {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub uid: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(rename = "folderTitle", default, skip_serializing_if = "Option::is_none")]
    pub folder_title: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSearch {
    pub id: i64,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
}
