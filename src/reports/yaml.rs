//! YAML report generator.

use super::document::DeltaDocument;
use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::diff::DeltaReport;

/// YAML report generator
#[derive(Default)]
pub struct YamlReporter;

impl YamlReporter {
    /// Create a new YAML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReportGenerator for YamlReporter {
    fn generate_delta_report(
        &self,
        report: &DeltaReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        serde_yaml::to_string(&DeltaDocument::new(report, config))
            .map_err(|e| ReportError::YamlError(e.to_string()))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Yaml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DeltaEngine;
    use crate::model::ResourceRecord;
    use serde_json::json;

    #[test]
    fn test_yaml_includes_unchanged_on_request() {
        let records = vec![ResourceRecord::try_from(json!({"arn": "q", "service": "SQS"})).unwrap()];
        let report = DeltaEngine::new().diff(&records, &records, "a", "b").unwrap();

        let config = ReportConfig {
            include_unchanged: true,
            ..ReportConfig::default()
        };
        let output = YamlReporter::new().generate_delta_report(&report, &config).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&output).unwrap();

        assert_eq!(value["to_state_id"], serde_yaml::Value::from("b"));
        let unchanged = value["unchanged"].as_sequence().unwrap();
        assert_eq!(unchanged.len(), 1);
        assert_eq!(unchanged[0]["change_type"], serde_yaml::Value::from("Unchanged"));
    }
}
