// Prometheus matrix response model and conversion from query results
use super::results::Results;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub const REF_ID_LABEL: &str = "__refId__";
pub const LEGEND_LABEL: &str = "__legend__";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixResponse {
    pub status: String,
    pub data: MatrixData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixData {
    #[serde(rename = "resultType")]
    pub result_type: String,
    pub result: Vec<MatrixSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixSeries {
    pub metric: BTreeMap<String, String>,
    /// `[unix seconds, value]` pairs; values are passed through untouched
    pub values: Vec<(i64, Value)>,
}

/// Converts query results into a Prometheus `query_range` style matrix.
///
/// Each frame becomes one series. Its labels are the union of the frame's field
/// labels plus `__refId__`, and `__legend__` holds the target's legend template with
/// every `{{label}}` placeholder filled from those labels. Malformed frames are
/// tolerated: missing columns give a series without samples.
pub fn to_matrix_response(results: &Results) -> MatrixResponse {
    let mut series = Vec::new();

    for (ref_id, result) in &results.results {
        let template = results.legend(ref_id).unwrap_or("");

        for frame in &result.frames {
            let mut metric = BTreeMap::new();
            metric.insert(REF_ID_LABEL.to_string(), ref_id.clone());

            let mut legend = template.to_string();
            for field in &frame.schema.fields {
                for (key, value) in &field.labels {
                    metric.insert(key.clone(), value.clone());
                    if !legend.is_empty() {
                        legend = legend.replace(&format!("{{{{{}}}}}", key), value);
                    }
                }
            }
            metric.insert(LEGEND_LABEL.to_string(), legend);

            let mut values = Vec::new();
            if let [timestamps, samples, ..] = frame.data.values.as_slice() {
                for (timestamp, sample) in timestamps.iter().zip(samples) {
                    match timestamp_ms(timestamp) {
                        Some(ms) => values.push((ms / 1000, sample.clone())),
                        None => tracing::debug!(
                            ref_id = %ref_id,
                            %timestamp,
                            "skipping sample with a non numeric timestamp"
                        ),
                    }
                }
            }

            series.push(MatrixSeries { metric, values });
        }
    }

    MatrixResponse {
        status: "success".to_string(),
        data: MatrixData {
            result_type: "matrix".to_string(),
            result: series,
        },
    }
}

fn timestamp_ms(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::results::{Field, Frame, FrameData, Schema, TargetResult};
    use serde_json::json;

    fn single_frame(labels: &[(&str, &str)], values: Vec<Vec<Value>>) -> Results {
        let labels = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let frame = Frame {
            schema: Schema {
                fields: vec![
                    Field {
                        name: "Time".to_string(),
                        ..Field::default()
                    },
                    Field {
                        name: "Value".to_string(),
                        labels,
                        ..Field::default()
                    },
                ],
                ..Schema::default()
            },
            data: FrameData { values },
        };

        let mut results = Results::default();
        results.results.insert(
            "A".to_string(),
            TargetResult {
                frames: vec![frame],
                ..TargetResult::default()
            },
        );
        results
    }

    #[test]
    fn test_legend_filled_from_field_labels() {
        let mut results = single_frame(&[("instance", "host1")], vec![]);
        results
            .legends
            .insert("A".to_string(), "{{instance}}".to_string());

        let response = to_matrix_response(&results);
        let metric = &response.data.result[0].metric;
        assert_eq!(metric[LEGEND_LABEL], "host1");
        assert_eq!(metric[REF_ID_LABEL], "A");
        assert_eq!(metric["instance"], "host1");
    }

    #[test]
    fn test_unknown_placeholders_left_in_place() {
        let mut results = single_frame(&[("instance", "host1")], vec![]);
        results
            .legends
            .insert("A".to_string(), "{{instance}} / {{pod}}".to_string());

        let response = to_matrix_response(&results);
        assert_eq!(
            response.data.result[0].metric[LEGEND_LABEL],
            "host1 / {{pod}}"
        );
    }

    #[test]
    fn test_missing_legend_is_empty_label() {
        let results = single_frame(&[("job", "api")], vec![]);
        let response = to_matrix_response(&results);
        assert_eq!(response.data.result[0].metric[LEGEND_LABEL], "");
        assert!(response.data.result[0].values.is_empty());
    }

    #[test]
    fn test_samples_converted_to_seconds_and_truncated() {
        let results = single_frame(
            &[],
            vec![
                vec![
                    json!(1_700_000_000_500_i64),
                    json!(1_700_000_015_000_i64),
                    json!(1_700_000_030_000_i64),
                ],
                vec![json!(1.5), json!(null)],
            ],
        );

        let response = to_matrix_response(&results);
        assert_eq!(
            response.data.result[0].values,
            vec![(1_700_000_000, json!(1.5)), (1_700_000_015, json!(null))]
        );
    }

    #[test]
    fn test_non_numeric_timestamps_are_skipped() {
        let results = single_frame(
            &[],
            vec![
                vec![json!("yesterday"), json!(1_700_000_015_000_i64)],
                vec![json!(1.0), json!(2.0)],
            ],
        );

        let response = to_matrix_response(&results);
        assert_eq!(response.data.result[0].values, vec![(1_700_000_015, json!(2.0))]);
    }

    #[test]
    fn test_fixture_to_matrix_json_shape() {
        let mut results: Results =
            serde_json::from_str(include_str!("../../testdata/data.json")).unwrap();
        results
            .legends
            .insert("A".to_string(), "{{method}} api".to_string());

        let response = to_matrix_response(&results);
        assert_eq!(response.data.result.len(), 3);

        let encoded = serde_json::to_value(&response).unwrap();
        assert_eq!(encoded["status"], "success");
        assert_eq!(encoded["data"]["resultType"], "matrix");

        let first = &encoded["data"]["result"][0];
        assert_eq!(first["metric"]["__legend__"], "GET api");
        assert_eq!(first["metric"]["method"], "GET");
        assert_eq!(first["values"][0], json!([1_700_000_000_i64, 12.5]));

        // B's second frame has three timestamps but only two values
        let last = &encoded["data"]["result"][2];
        assert_eq!(last["metric"]["code"], "503");
        assert_eq!(last["values"].as_array().unwrap().len(), 2);
    }
}
