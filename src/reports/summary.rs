//! Summary report generator for shell output.
//!
//! Provides a compact, human-readable summary for terminal usage.

use super::{ReportConfig, ReportError, ReportFormat, ReportGenerator};
use crate::diff::{ChangeSeverity, ChangeType, DeltaReport, ResourceChange};

/// Apply ANSI color formatting if colored output is enabled.
fn ansi_color(text: &str, color: &str, colored: bool) -> String {
    if colored {
        match color {
            "red" => format!("\x1b[31m{text}\x1b[0m"),
            "green" => format!("\x1b[32m{text}\x1b[0m"),
            "yellow" => format!("\x1b[33m{text}\x1b[0m"),
            "cyan" => format!("\x1b[36m{text}\x1b[0m"),
            "magenta" => format!("\x1b[35m{text}\x1b[0m"),
            "bold" => format!("\x1b[1m{text}\x1b[0m"),
            "dim" => format!("\x1b[2m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    } else {
        text.to_string()
    }
}

const fn severity_color(severity: ChangeSeverity) -> &'static str {
    match severity {
        ChangeSeverity::Critical => "magenta",
        ChangeSeverity::High => "red",
        ChangeSeverity::Medium => "yellow",
        ChangeSeverity::Low => "cyan",
        ChangeSeverity::Info => "dim",
    }
}

const fn change_marker(change_type: ChangeType) -> (&'static str, &'static str) {
    match change_type {
        ChangeType::Added => ("+", "green"),
        ChangeType::Removed => ("-", "red"),
        ChangeType::Modified => ("~", "yellow"),
        ChangeType::Unchanged => ("=", "dim"),
    }
}

fn plural(count: usize, singular: &'static str, plural: &'static str) -> &'static str {
    if count == 1 {
        singular
    } else {
        plural
    }
}

/// Summary reporter for shell output
pub struct SummaryReporter {
    /// Use colored output
    colored: bool,
}

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { colored: true }
    }

    /// Disable colored output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn color(&self, text: &str, color: &str) -> String {
        ansi_color(text, color, self.colored)
    }

    fn change_line(&self, change: &ResourceChange) -> String {
        let (marker, marker_color) = change_marker(change.change_type);
        let severity = format!("[{}]", change.severity.as_str().to_uppercase());
        let mut line = format!(
            "  {} {:<10} {} {}",
            self.color(marker, marker_color),
            self.color(&severity, severity_color(change.severity)),
            change.identity,
            self.color(&format!("({} {})", change.service, change.category), "dim"),
        );
        if change.change_type == ChangeType::Modified {
            let count = change.attribute_changes.len();
            line.push_str(&format!(
                " {count} {}",
                plural(count, "attribute", "attributes")
            ));
        }
        line
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate_delta_report(
        &self,
        report: &DeltaReport,
        config: &ReportConfig,
    ) -> Result<String, ReportError> {
        let mut lines = Vec::new();
        let summary = &report.summary;

        // Header
        lines.push(self.color("Cloud Resource Delta", "bold"));
        lines.push(self.color("─".repeat(40).as_str(), "dim"));

        lines.push(format!(
            "{}  {} → {}",
            self.color("States:", "cyan"),
            report.from_state_id,
            report.to_state_id
        ));
        lines.push(format!(
            "{}  {} → {} resources",
            self.color("Size:", "cyan"),
            summary.old_total,
            summary.new_total
        ));

        lines.push(String::new());

        // Changes
        lines.push(self.color("Changes:", "bold"));
        for (count, marker, color, verb) in [
            (summary.added, "+", "green", "added"),
            (summary.removed, "-", "red", "removed"),
            (summary.modified, "~", "yellow", "modified"),
        ] {
            if count > 0 {
                lines.push(format!(
                    "  {} {} {verb}",
                    self.color(&format!("{marker}{count}"), color),
                    plural(count, "resource", "resources")
                ));
            }
        }
        if !report.has_changes() {
            lines.push(format!("  {}", self.color("No changes", "dim")));
        }
        if summary.unchanged > 0 {
            lines.push(format!(
                "  {}",
                self.color(&format!("{} unchanged", summary.unchanged), "dim")
            ));
        }

        let stats = &report.change_statistics;
        if report.has_changes() {
            lines.push(String::new());
            lines.push(self.color("Severity:", "bold"));
            let by_severity: Vec<String> = ChangeSeverity::ALL
                .iter()
                .filter_map(|severity| {
                    stats.by_severity.get(severity).filter(|n| **n > 0).map(|n| {
                        self.color(&format!("{severity} {n}"), severity_color(*severity))
                    })
                })
                .collect();
            lines.push(format!("  {}", by_severity.join("  ")));

            let by_category: Vec<String> = stats
                .by_category
                .iter()
                .map(|(category, n)| format!("{category} {n}"))
                .collect();
            lines.push(format!(
                "{}  {}",
                self.color("Categories:", "cyan"),
                by_category.join(", ")
            ));

            if let Some(service) = &stats.most_changed_service {
                let total = stats.by_service.get(service).map_or(0, |s| s.total());
                lines.push(format!(
                    "{}  {service} ({total} {})",
                    self.color("Most changed:", "cyan"),
                    plural(total, "change", "changes")
                ));
            }
        }

        // Impact
        let impact = &report.impact_analysis;
        if !impact.high_impact_changes.is_empty() || !impact.cascade_risks.is_empty() {
            lines.push(String::new());
            lines.push(self.color("Impact:", "bold"));
            if !impact.high_impact_changes.is_empty() {
                let n = impact.high_impact_changes.len();
                lines.push(format!(
                    "  {} high-impact {}",
                    self.color(&format!("!{n}"), "red"),
                    plural(n, "change", "changes")
                ));
            }
            for risk in &impact.cascade_risks {
                lines.push(format!(
                    "  {} {} {}",
                    self.color("cascade", severity_color(risk.risk_level)),
                    risk.identity,
                    self.color(&format!("({} causes)", risk.caused_by.len()), "dim")
                ));
            }
        }

        // Compliance
        let compliance = &report.compliance_changes;
        if compliance.newly_compliant > 0
            || compliance.newly_non_compliant > 0
            || !compliance.entries.is_empty()
        {
            lines.push(String::new());
            lines.push(format!(
                "{}  {:.1}% → {:.1}% compliant",
                self.color("Compliance:", "cyan"),
                compliance.compliant_before_pct,
                compliance.compliant_after_pct
            ));
            if compliance.newly_non_compliant > 0 {
                lines.push(format!(
                    "  {} newly non-compliant",
                    self.color(&format!("!{}", compliance.newly_non_compliant), "red")
                ));
            }
            if compliance.newly_compliant > 0 {
                lines.push(format!(
                    "  {} newly compliant",
                    self.color(&format!("✓{}", compliance.newly_compliant), "green")
                ));
            }
        }

        // Change lines
        let mut selected: Vec<&ResourceChange> = report
            .all_changes()
            .filter(|c| config.includes_severity(c.severity))
            .collect();
        selected.sort_by(|a, b| b.severity.cmp(&a.severity).then_with(|| a.identity.cmp(&b.identity)));
        let total_selected = selected.len();
        if let Some(max) = config.max_items {
            selected.truncate(max);
        }
        if !selected.is_empty() {
            lines.push(String::new());
            let heading = match config.min_severity {
                Some(min) => format!("Resources ({min} and above):"),
                None => "Resources:".to_string(),
            };
            lines.push(self.color(&heading, "bold"));
            for change in &selected {
                lines.push(self.change_line(change));
            }
            if total_selected > selected.len() {
                lines.push(format!(
                    "  {}",
                    self.color(&format!("... {} more", total_selected - selected.len()), "dim")
                ));
            }
        }

        Ok(lines.join("\n"))
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::DeltaEngine;
    use crate::model::ResourceRecord;
    use serde_json::json;

    fn records(values: Vec<serde_json::Value>) -> Vec<ResourceRecord> {
        values
            .into_iter()
            .map(|v| ResourceRecord::try_from(v).unwrap())
            .collect()
    }

    #[test]
    fn test_summary_no_changes() {
        let report = DeltaEngine::new().diff(&[], &[], "a", "b").unwrap();
        let output = SummaryReporter::new()
            .no_color()
            .generate_delta_report(&report, &ReportConfig::all())
            .unwrap();
        assert!(output.contains("States:  a → b"));
        assert!(output.contains("No changes"));
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_summary_lists_changes_by_severity() {
        let new = records(vec![
            json!({"arn": "role-1", "service": "IAM"}),
            json!({"arn": "topic-1", "service": "SNS"}),
        ]);
        let report = DeltaEngine::new().diff(&[], &new, "a", "b").unwrap();
        let output = SummaryReporter::new()
            .no_color()
            .generate_delta_report(&report, &ReportConfig::all())
            .unwrap();

        assert!(output.contains("+2 resources added"));
        assert!(output.contains("critical 1"));
        let role = output.find("role-1").unwrap();
        let topic = output.find("topic-1").unwrap();
        assert!(role < topic, "critical change should be listed first");
    }

    #[test]
    fn test_summary_respects_min_severity() {
        let new = records(vec![
            json!({"arn": "role-1", "service": "IAM"}),
            json!({"arn": "topic-1", "service": "SNS"}),
        ]);
        let report = DeltaEngine::new().diff(&[], &new, "a", "b").unwrap();
        let config = ReportConfig::all().with_min_severity(Some(ChangeSeverity::High));
        let output = SummaryReporter::new()
            .no_color()
            .generate_delta_report(&report, &config)
            .unwrap();

        assert!(output.contains("Resources (high and above):"));
        assert!(output.contains("role-1"));
        assert!(!output.contains("topic-1"));
    }

    #[test]
    fn test_summary_truncates_to_max_items() {
        let new = records(vec![
            json!({"arn": "q-1", "service": "SQS"}),
            json!({"arn": "q-2", "service": "SQS"}),
            json!({"arn": "q-3", "service": "SQS"}),
        ]);
        let report = DeltaEngine::new().diff(&[], &new, "a", "b").unwrap();
        let config = ReportConfig {
            max_items: Some(1),
            ..ReportConfig::default()
        };
        let output = SummaryReporter::new()
            .no_color()
            .generate_delta_report(&report, &config)
            .unwrap();
        assert!(output.contains("... 2 more"));
        assert!(output.contains("Most changed:  SQS (3 changes)"));
    }
}
