use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::scoring::{Category, CategoryScore, RiskAssessment, Tier};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Scores are shown with one decimal (27.2, 100.0)
pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

/// Tier label padded to the widest label ("CRITICAL"), colored by severity
pub fn format_tier(tier: Tier, use_colors: bool) -> String {
    let padded = format!("{:<8}", tier.label());
    if !use_colors {
        return padded;
    }
    match tier {
        Tier::Low => padded.green().to_string(),
        Tier::Moderate => padded.yellow().to_string(),
        Tier::High => padded.bright_red().to_string(),
        Tier::Critical => padded.red().bold().to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a label to fit available width, accounting for Unicode
fn truncate_label(label: &str, max_width: usize) -> String {
    let chars: Vec<char> = label.chars().collect();
    if chars.len() <= max_width {
        label.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn score_line(name: &str, score: &CategoryScore, use_colors: bool) -> String {
    let score_str = format!("{:>5}", format_score(score.score));
    let tier = format_tier(score.tier, use_colors);
    let line = if use_colors {
        format!("{:<28}{}  {}", name, score_str.bold(), tier)
    } else {
        format!("{:<28}{}  {}", name, score_str, tier)
    };
    line.trim_end().to_string()
}

/// Multi-line report for a single assessment
pub fn format_assessment(assessment: &RiskAssessment, use_colors: bool) -> String {
    let mut lines = Vec::new();

    if let Some(ref id) = assessment.patient_id {
        if use_colors {
            lines.push(format!("Patient {}", id.bold()));
        } else {
            lines.push(format!("Patient {}", id));
        }
    }

    lines.push(score_line("Overall", &assessment.overall_risk, use_colors));
    for category in Category::ALL {
        lines.push(score_line(
            &format!("  {}", category.label()),
            assessment.category(category),
            use_colors,
        ));
    }

    lines.push(String::new());
    lines.push(format!(
        "LACE index: {}   Charlson index: {}",
        assessment.lace_index_score, assessment.charlson_comorbidity_index
    ));

    let contributors = &assessment.overall_risk.top_contributors;
    if !contributors.is_empty() {
        lines.push(String::new());
        lines.push("Top contributors:".to_string());
        for contributor in contributors {
            lines.push(format!(
                "  {:<28}{:>5}",
                contributor.factor.name(),
                format_score(contributor.weight)
            ));
        }
    }

    lines.push(String::new());
    let version = format!("weights {}", assessment.weights_version);
    if use_colors {
        lines.push(version.dimmed().to_string());
    } else {
        lines.push(version);
    }

    lines.join("\n")
}

/// Ranked batch table with columns: Index, Score, Tier, Patient, Top factor
/// Patient ids are truncated to fit the terminal; pipes get them whole.
pub fn format_batch_table(assessments: &[RiskAssessment], use_colors: bool) -> String {
    if assessments.is_empty() {
        return "No patients assessed.".to_string();
    }

    let term_width = get_terminal_width();

    let index_width = 3;
    let score_width = 5;
    let tier_width = 8;
    let separator = "  ";

    assessments
        .iter()
        .enumerate()
        .map(|(idx, assessment)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score_padded = format!(
                "{:>width$}",
                format_score(assessment.overall_risk.score),
                width = score_width
            );
            let tier = format_tier(assessment.overall_risk.tier, use_colors);
            let top = assessment
                .overall_risk
                .top_contributors
                .first()
                .map(|c| c.factor.name())
                .unwrap_or("-");

            let id = assessment.patient_id.as_deref().unwrap_or("-");
            let fixed_width =
                index_width + 1 + score_width + tier_width + separator.len() * 3 + top.len();
            let id = match term_width {
                Some(width) if width > fixed_width + 10 => truncate_label(id, width - fixed_width),
                Some(_) => truncate_label(id, 20),
                None => id.to_string(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_padded.bold(),
                    separator,
                    tier,
                    separator,
                    id,
                    separator,
                    top.dimmed()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, score_padded, separator, tier, separator, id, separator, top
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format assessments as tab-separated values for scripting
/// Columns: patient, overall, tier, infection, readmission, fall,
/// mental_health, medication_non_adherence, lace, charlson (no headers, no colors)
pub fn format_tsv(assessments: &[RiskAssessment]) -> String {
    if assessments.is_empty() {
        return String::new();
    }

    assessments
        .iter()
        .map(|assessment| {
            let mut fields = vec![
                assessment.patient_id.clone().unwrap_or_default(),
                format_score(assessment.overall_risk.score),
                assessment.overall_risk.tier.label().to_string(),
            ];
            fields.extend(
                Category::ALL
                    .iter()
                    .map(|c| format_score(assessment.category(*c).score)),
            );
            fields.push(assessment.lace_index_score.to_string());
            fields.push(assessment.charlson_comorbidity_index.to_string());
            fields.join("\t")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
