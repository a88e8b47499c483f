//! Plain-text rendering of reports and progress lines.

use std::fmt::Write;

use ctia_core::{LanguageCode, Phase, TradeReport};

const RULE: &str = "----------------------------------------------------------------";

/// One live-log line for a committed phase.
pub fn phase_line(phase: Phase) -> String {
    match phase.descriptor() {
        Some(d) => format!("[{}] {}: {}", d.label, d.agent, d.activity),
        None => match phase {
            Phase::Complete => "[Done] Analysis complete".to_string(),
            Phase::Error => "[Failed] Analysis failed".to_string(),
            other => format!("[{other}]"),
        },
    }
}

/// Supported languages, one per line.
pub fn languages() -> String {
    let mut out = String::new();
    for lang in LanguageCode::ALL {
        let _ = writeln!(out, "{:<4}{:<20}{}", lang.code(), lang.native_label(), lang.prompt_name());
    }
    out
}

/// Compact CAD amount: `$3.90B`, `$610.0M`, `$95.0K`, `$420`.
pub fn cad(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    if abs >= 1e9 {
        format!("{sign}${:.2}B", abs / 1e9)
    } else if abs >= 1e6 {
        format!("{sign}${:.1}M", abs / 1e6)
    } else if abs >= 1e3 {
        format!("{sign}${:.1}K", abs / 1e3)
    } else {
        format!("{sign}${abs:.0}")
    }
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out);
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", &RULE[..title.len().min(RULE.len())]);
}

/// Full text rendering of a report.
pub fn report(report: &TradeReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{}  (HS {})", report.commodity, report.hs_code);
    let _ = writeln!(out, "{}", report.hs_description);
    let _ = writeln!(out, "Route: {} -> {}", report.origin_country, report.target_country);
    if let Some(updated) = &report.last_updated {
        let _ = writeln!(out, "Last updated: {updated}");
    }
    let _ = writeln!(out, "{RULE}");

    section(&mut out, "Summary");
    let _ = writeln!(out, "{}", report.summary);

    section(&mut out, "Compliance");
    if report.compliance.is_empty() {
        let _ = writeln!(out, "No requirements listed.");
    }
    for item in &report.compliance {
        let _ = writeln!(out, "[{}] {} ({})", item.severity.as_str(), item.title, item.source);
        let _ = writeln!(out, "    {}", item.description);
        if item.has_source_url() {
            if let Some(url) = &item.source_url {
                let _ = writeln!(out, "    {url}");
            }
        }
    }

    section(&mut out, "Duties");
    let _ = writeln!(out, "Treatment: {}", report.duties.tariff_treatment);
    let _ = writeln!(out, "Rate: {}", report.duties.rate);
    if !report.duties.programs.is_empty() {
        let _ = writeln!(out, "Programs: {}", report.duties.programs.join(", "));
    }

    section(&mut out, "Market trends");
    for point in &report.trends {
        let _ = writeln!(out, "{:<8}{:>14.0}{:>14}", point.month, point.volume, cad(point.value));
    }

    if let Some(top) = report.top_partners.as_deref().filter(|t| !t.is_empty()) {
        section(&mut out, "Top trading partners");
        for row in top {
            let _ = writeln!(out, "{:<24}{:>12}{:>8.1}%", row.country, cad(row.value), row.percentage);
        }
    }

    if let Some(provinces) = report.provincial_data.as_deref().filter(|p| !p.is_empty()) {
        section(&mut out, "By province");
        for row in provinces {
            let _ = writeln!(out, "{:<24}{:>12}{:>8.1}%", row.province, cad(row.value), row.percentage);
        }
    }

    section(&mut out, "Partner leads");
    for partner in &report.partners {
        let _ = writeln!(
            out,
            "{:>3}%  {} ({:?}, {})",
            partner.match_percent(),
            partner.name,
            partner.partner_type,
            partner.location
        );
    }

    section(&mut out, "Trade commissioners");
    for tc in &report.trade_commissioners {
        let _ = writeln!(out, "{}, {}", tc.name, tc.title);
        let _ = writeln!(out, "    {} <{}>", tc.location, tc.email);
        let focus: Vec<&str> = tc
            .sectors
            .iter()
            .chain(tc.expertise.iter())
            .flatten()
            .map(String::as_str)
            .collect();
        if !focus.is_empty() {
            let _ = writeln!(out, "    Focus: {}", focus.join(", "));
        }
    }

    out
}
