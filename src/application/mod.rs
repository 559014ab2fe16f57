// Application layer - Panel query use cases
pub mod datasource_resolver;
pub mod grafana_api;
pub mod panel_service;
pub mod target_normalizer;
pub mod variable_service;

#[cfg(test)]
pub(crate) mod test_support;
