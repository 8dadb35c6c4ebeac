//! Shared output formatting for findings.

use anyhow::Result;
use dep_assert_core::{DependencyMap, FindingKind, Findings};

use crate::OutputFormat;

/// Print findings in the specified format.
pub fn print(findings: &Findings, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(findings),
        OutputFormat::Json => return print_json(findings),
        OutputFormat::Compact => {
            for line in compact_lines(findings) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn print_text(findings: &Findings) {
    let report = findings.format_report();
    if !report.is_empty() {
        println!("{report}");
    }

    let summary_color = if findings.is_empty() {
        "\x1b[32m"
    } else {
        "\x1b[31m"
    };

    println!("{summary_color}{}\x1b[0m", summary(findings));
}

fn summary(findings: &Findings) -> String {
    format!(
        "Found {} missing, {} denied, {} not existing, {} undefined, {} cycle(s) in {}",
        findings.count(FindingKind::Missing),
        findings.count(FindingKind::Denied),
        findings.count(FindingKind::NotExisting),
        findings.count(FindingKind::Undefined),
        findings.count(FindingKind::Cycle),
        findings.scope,
    )
}

fn print_json(findings: &Findings) -> Result<()> {
    let json = serde_json::to_string_pretty(findings)?;
    println!("{json}");
    Ok(())
}

fn edge_lines(kind: FindingKind, map: &DependencyMap, out: &mut Vec<String>) {
    for (from, to, info) in map.edges() {
        if info.vias.is_empty() {
            out.push(format!("{kind}: {from} -> {to}"));
        } else {
            let vias: Vec<&str> = info.vias.iter().map(String::as_str).collect();
            out.push(format!("{kind}: {from} -> {to} [{}]", vias.join(", ")));
        }
    }
}

fn compact_lines(findings: &Findings) -> Vec<String> {
    let mut lines = Vec::new();
    edge_lines(FindingKind::Missing, &findings.missing, &mut lines);
    edge_lines(FindingKind::Denied, &findings.denied, &mut lines);
    for location in &findings.not_existing {
        lines.push(format!("{}: {}", FindingKind::NotExisting, location.pattern()));
    }
    for name in &findings.undefined {
        lines.push(format!("{}: {name}", FindingKind::Undefined));
    }
    for cycle in &findings.cycles {
        let members: Vec<&str> = cycle.elements().into_iter().collect();
        lines.push(format!("{}: {}", FindingKind::Cycle, members.join(", ")));
    }
    lines
}
