use std::fmt::Write;

use crate::verdict::VerdictResult;

/// Format styles supported when printing a verdict.
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Produce a printable verdict in the desired format.
pub fn render_verdict(verdict: &VerdictResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Human => render_human(verdict),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(verdict)?),
    }
}

fn render_human(verdict: &VerdictResult) -> anyhow::Result<String> {
    let mut out = String::new();
    writeln!(out, "Verdict: {}", single_line(&verdict.verdict_summary))?;
    writeln!(out, "Winner: {}", verdict.winner)?;
    writeln!(
        out,
        "Responsibility: female {:.0}% • male {:.0}%",
        verdict.female_responsibility, verdict.male_responsibility
    )?;
    writeln!(out)?;
    writeln!(out, "Analysis:")?;
    writeln!(out, "  {}", single_line(&verdict.analysis))?;
    writeln!(out, "Advice:")?;
    writeln!(out, "  {}", single_line(&verdict.advice))?;
    Ok(out)
}

fn single_line(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\n' | '\r' => ' ',
            _ => c,
        })
        .collect()
}
