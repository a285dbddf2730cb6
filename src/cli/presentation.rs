//! CLI presentation: text and json formatters per command.

use crate::config::SiteConfig;
use crate::error::ApiError;
use crate::generator::GenerationReport;
use crate::usage::{summarize, StageTotals, UsageRow};
use comfy_table::Table;

pub fn format_generation_report(
    report: &GenerationReport,
    format: &str,
) -> Result<String, ApiError> {
    if format == "json" {
        let out = serde_json::json!({
            "artifact": report.artifact,
            "attempts": report.attempts,
            "request": report.request,
            "title": report.site.meta_data.title,
        });
        return Ok(serde_json::to_string_pretty(&out)?);
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);
    let attempts = report.attempts.to_string();
    let layouts = report.site.layouts.len().to_string();
    let artifact = report.artifact.display().to_string();
    table.add_row(vec!["Company", report.request.company.as_str()]);
    table.add_row(vec!["Industry", report.request.industry.as_str()]);
    table.add_row(vec!["Keyword", report.request.keyword.as_str()]);
    table.add_row(vec!["Title", report.site.meta_data.title.as_str()]);
    table.add_row(vec!["Layout blocks", layouts.as_str()]);
    table.add_row(vec!["Attempts", attempts.as_str()]);
    table.add_row(vec!["Artifact", artifact.as_str()]);
    Ok(format!("Site generated\n{}", table))
}

/// Per-stage token totals, optionally restricted to one company.
pub fn format_usage_summary(rows: &[UsageRow], company: Option<&str>) -> String {
    let rows: Vec<UsageRow> = rows
        .iter()
        .filter(|row| company.map_or(true, |c| row.company == c))
        .cloned()
        .collect();
    if rows.is_empty() {
        return "No token usage recorded.".to_string();
    }

    let totals = summarize(&rows);
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec![
        "Stage",
        "Calls",
        "Prompt Tokens",
        "Completion Tokens",
        "Total Tokens",
        "Price",
    ]);
    let mut overall = StageTotals::default();
    for (stage, t) in &totals {
        table.add_row(totals_row(stage, t));
        overall.calls += t.calls;
        overall.prompt_tokens += t.prompt_tokens;
        overall.completion_tokens += t.completion_tokens;
        overall.total_tokens += t.total_tokens;
        overall.price += t.price;
    }
    table.add_row(totals_row("Total", &overall));
    table.to_string()
}

fn totals_row(stage: &str, totals: &StageTotals) -> Vec<String> {
    vec![
        stage.to_string(),
        totals.calls.to_string(),
        totals.prompt_tokens.to_string(),
        totals.completion_tokens.to_string(),
        totals.total_tokens.to_string(),
        format!("${:.6}", totals.price),
    ]
}

/// Resolved configuration as TOML, credentials masked.
pub fn format_config_toml(config: &SiteConfig) -> Result<String, ApiError> {
    toml::to_string_pretty(&config.redacted())
        .map_err(|e| ApiError::ConfigError(format!("Failed to render configuration: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(company: &str, stage: &str, total: u32) -> UsageRow {
        UsageRow {
            company: company.to_string(),
            keyword: "coffee".to_string(),
            iteration: 0,
            stage: stage.to_string(),
            prompt_tokens: total / 2,
            completion_tokens: total - total / 2,
            total_tokens: total,
            price: crate::usage::PRICE_PER_TOKEN * f64::from(total),
        }
    }

    #[test]
    fn usage_summary_lists_stages_and_total() {
        let rows = vec![
            row("Acme", "Content Generation", 1000),
            row("Acme", "Content Generation", 500),
            row("Acme", "Title Generation", 30),
        ];
        let out = format_usage_summary(&rows, None);
        assert!(out.contains("Content Generation"));
        assert!(out.contains("Title Generation"));
        assert!(out.contains("1530"));
        assert!(out.contains("Total"));
    }

    #[test]
    fn usage_summary_filters_by_company() {
        let rows = vec![row("Acme", "Initial", 0), row("Globex", "Initial", 0)];
        assert_eq!(
            format_usage_summary(&rows, Some("Initech")),
            "No token usage recorded."
        );
        assert!(format_usage_summary(&rows, Some("Globex")).contains("Initial"));
    }

    #[test]
    fn config_toml_masks_credentials() {
        let mut config = SiteConfig::default();
        config.text.api_key = Some("sk-secret".to_string());
        let out = format_config_toml(&config).unwrap();
        assert!(!out.contains("sk-secret"));
        assert!(out.contains("********"));
        assert!(out.contains("[pipeline]"));
    }
}
