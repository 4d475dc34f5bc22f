//! Panic hook printing a structured crash report.
//!
//! The report names the run phase, the AST dump and the declaration being
//! processed, plus progress through the discovered declarations.

use super::context::{get_current_context, get_progress, AnalysisContext};
use std::panic::PanicHookInfo;
use tracing::Span;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const WIDTH: usize = 78;

pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        print_crash_report(info);
    }));
}

fn print_crash_report(info: &PanicHookInfo<'_>) {
    let context = get_current_context();
    let (processed, total) = get_progress();

    eprintln!();
    for line in crash_report_lines(info, &context, processed, total) {
        eprintln!("{}", line);
    }
    if std::env::var("RUST_BACKTRACE").is_ok() {
        eprintln!();
        eprintln!("{}", std::backtrace::Backtrace::capture());
    }
}

fn crash_report_lines(
    info: &PanicHookInfo<'_>,
    context: &AnalysisContext,
    processed: usize,
    total: usize,
) -> Vec<String> {
    let mut lines = vec![
        rule('╔', '╗'),
        row("METACLASSIFY CRASH REPORT"),
        rule('╠', '╣'),
        row(&format!("Version: {}", VERSION)),
        row(&format!("Platform: {}", std::env::consts::OS)),
        row(&format!(
            "Time: {}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )),
        rule('╠', '╣'),
        row(&format!("PANIC: {}", extract_panic_message(info))),
    ];

    if let Some(location) = info.location() {
        lines.push(row(&format!(
            "Location: {}:{}:{}",
            location.file(),
            location.line(),
            location.column()
        )));
    }

    lines.push(rule('╠', '╣'));
    lines.extend(context_lines(context, processed, total));

    if let Some(metadata) = Span::current().metadata() {
        lines.push(row(&format!("  Span: {}", metadata.name())));
    }

    if std::env::var("RUST_BACKTRACE").is_err() {
        lines.push(rule('╠', '╣'));
        lines.push(row("Run with RUST_BACKTRACE=1 for stack trace"));
    }
    lines.push(rule('╚', '╝'));
    lines
}

fn context_lines(context: &AnalysisContext, processed: usize, total: usize) -> Vec<String> {
    let mut lines = vec![row("OPERATION CONTEXT:")];

    match &context.phase {
        Some(phase) => lines.push(row(&format!("  Phase: {}", phase))),
        None => lines.push(row("  Phase: (not set - crash occurred before analysis started)")),
    }
    if let Some(file) = &context.current_file {
        lines.push(row(&format!("  AST: {}", file.display())));
    }
    if let Some(entity) = &context.current_entity {
        lines.push(row(&format!("  Entity: {}", entity)));
    }
    if total > 0 {
        let pct = (processed as f64 / total as f64 * 100.0) as usize;
        lines.push(row(&format!(
            "  Progress: {} / {} declarations ({}%)",
            processed, total, pct
        )));
    }
    lines
}

fn rule(left: char, right: char) -> String {
    format!("{}{}{}", left, "═".repeat(WIDTH), right)
}

fn row(text: &str) -> String {
    let inner = WIDTH - 2;
    format!("║  {:<width$}║", truncate(text, inner), width = inner)
}

fn extract_panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(s) = info.payload().downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = info.payload().downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
