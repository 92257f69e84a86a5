use crate::{
    app::{ClassificationReport, Outcome},
    domain::{types::is_productive_label, Priority},
    history::{AggregateStats, HistoryEntry},
};

const INCONCLUSIVE_HINT: &str = "The email could not be classified with enough confidence. \
This happens with very short or ambiguous text; add more context and try again.";

pub fn print_report(report: &ClassificationReport) {
    let result = &report.result;
    match &report.outcome {
        Outcome::ServiceError(message) => {
            println!("❌ Classification failed: {message}");
        }
        Outcome::Inconclusive => {
            println!("⚠️  {INCONCLUSIVE_HINT}");
            if let Some(message) = result.message.as_deref() {
                println!("   Service said: {message}");
            }
        }
        Outcome::Classified(_) => {
            let category = result.category().unwrap_or_default();
            let marker = if result.is_productive() { "✅" } else { "⚠️ " };
            println!("{marker} Category: {category}");
            println!("{}", priority_line(result.priority.as_deref()));
            if let Some(reply) = result.reply.as_deref() {
                println!("\nSuggested reply:\n{reply}");
            }
            if let Some(analysis) = result.detailed_analysis_text() {
                println!("\nDetailed analysis:\n{analysis}");
            }
        }
    }
    println!("\nProcessed in {} ms", report.processing_time_ms);
}

pub fn print_history(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("No classifications yet.");
        return;
    }
    for entry in entries {
        let category = entry.category.as_deref().unwrap_or("-");
        let kind = if is_productive_label(category) {
            "productive"
        } else {
            "unproductive"
        };
        println!(
            "{} | {} ({}) | {} | {} ms\n    {}",
            entry.timestamp,
            category,
            kind,
            priority_line(entry.priority.as_deref()),
            entry.processing_time_ms,
            entry.text_summary
        );
    }
}

pub fn print_stats(stats: &AggregateStats) {
    println!("Emails processed: {}", stats.emails_processed);
    println!("Average time: {:.1}s", stats.average_seconds());
}

fn priority_line(priority: Option<&str>) -> String {
    match (priority, priority.and_then(Priority::parse)) {
        (Some(raw), Some(level)) => format!("{} {} ({raw})", level.icon(), level.label()),
        (Some(raw), None) => format!("⚪ {raw}"),
        (None, _) => "⚪ No priority".to_string(),
    }
}
