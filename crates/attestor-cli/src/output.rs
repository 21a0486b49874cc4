//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use attestor_domain::AggregateRecord;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the aggregate summary record.
    pub fn format_aggregate(&self, aggregate: &AggregateRecord) -> Result<String> {
        match self.format {
            CliFormat::Json => self.format_aggregate_json(aggregate),
            CliFormat::Table => Ok(self.format_aggregate_table(aggregate)),
        }
    }

    /// Format the aggregate as JSON.
    fn format_aggregate_json(&self, aggregate: &AggregateRecord) -> Result<String> {
        let exceptions: Vec<serde_json::Value> = aggregate
            .exceptions
            .iter()
            .map(|e| {
                serde_json::json!({
                    "Control": e.control,
                    "Exception": e.exception,
                    "Response": e.response,
                })
            })
            .collect();

        let mut value = serde_json::json!({
            "Auditor": aggregate.auditor,
            "Time Period": aggregate.time_period,
            "Scope": aggregate.scope,
            "Exceptions": exceptions,
            "Tags": aggregate.tags,
            "System Description": aggregate.system_description,
            "Status Counts": {
                "Passed": aggregate.status_counts.passed,
                "Passed with Exception": aggregate.status_counts.passed_with_exception,
                "Excluded": aggregate.status_counts.excluded,
            },
            "Total Excerpts": aggregate.total_excerpts,
            "Failed Excerpts": aggregate.failed_excerpts,
        });
        if let Some(error) = &aggregate.error {
            value["Error"] = serde_json::json!(error);
        }

        Ok(serde_json::to_string_pretty(&value)?)
    }

    /// Format the aggregate as rendered sections and tables.
    fn format_aggregate_table(&self, aggregate: &AggregateRecord) -> String {
        let mut sections: Vec<String> = Vec::new();

        let field = |value: &str| {
            if value.is_empty() {
                "(not found)".to_string()
            } else {
                value.to_string()
            }
        };

        sections.push(format!(
            "Auditor:     {}\nTime Period: {}\nScope:       {}",
            field(&aggregate.auditor),
            field(&aggregate.time_period),
            field(&aggregate.scope)
        ));

        if aggregate.tags.is_empty() {
            sections.push("Tags: (none identified)".to_string());
        } else {
            sections.push(format!("Tags: {}", aggregate.tags.join(", ")));
        }

        if !aggregate.system_description.is_empty() {
            let bullets: Vec<String> = aggregate
                .system_description
                .iter()
                .map(|b| format!("  - {}", b))
                .collect();
            sections.push(format!("System Description:\n{}", bullets.join("\n")));
        }

        if aggregate.exceptions.is_empty() {
            sections.push(self.colorize("No control exceptions found.", "green"));
        } else {
            let mut builder = Builder::default();
            builder.push_record(["Control", "Exception", "Response"]);
            for entry in &aggregate.exceptions {
                builder.push_record([&entry.control, &entry.exception, &entry.response]);
            }
            let mut table = builder.build();
            table
                .with(Style::rounded())
                .with(Modify::new(Rows::first()).with(Alignment::center()));
            sections.push(format!("Exceptions Found:\n{}", table));
        }

        sections.push(self.status_counts_table(aggregate));

        sections.push(format!(
            "Excerpts analyzed: {} ({} failed)",
            aggregate.total_excerpts, aggregate.failed_excerpts
        ));

        if let Some(error) = &aggregate.error {
            sections.push(self.colorize(&format!("Failures:\n{}", error), "red"));
        }

        sections.join("\n\n")
    }

    fn status_counts_table(&self, aggregate: &AggregateRecord) -> String {
        let counts = &aggregate.status_counts;
        let total = counts.total();
        if total == 0 {
            return "No control status counts reported.".to_string();
        }

        let share = |count: u64| format!("{:.1}%", (count as f64) * 100.0 / (total as f64));

        let mut builder = Builder::default();
        builder.push_record(["Status", "Count", "Share"]);
        builder.push_record([
            "Passed",
            &counts.passed.to_string(),
            &share(counts.passed),
        ]);
        builder.push_record([
            "Passed with Exception",
            &counts.passed_with_exception.to_string(),
            &share(counts.passed_with_exception),
        ]);
        builder.push_record([
            "Excluded",
            &counts.excluded.to_string(),
            &share(counts.excluded),
        ]);
        builder.push_record(["Total", &total.to_string(), "100.0%"]);

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!("Control Status Summary:\n{}", table)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
