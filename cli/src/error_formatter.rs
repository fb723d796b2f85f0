use ariadne::{Color, Label, Report, ReportKind, Source};
use endive::EndiveError;

/// Format an EndiveError for the terminal, with a labelled source excerpt
/// for parse errors
pub fn format_error(error: &EndiveError) -> String {
    match error {
        EndiveError::Parse(details) => {
            let mut output = Vec::new();
            let source_id = details.source_id.as_str();
            let text_len = details.source_text.chars().count();
            let start = details.span.start.min(text_len);
            let end = details.span.end.max(start + 1).min(text_len.max(start + 1));

            let message = format!(
                "Parse error: {} ({}:{}:{})",
                details.message, source_id, details.span.line, details.span.col
            );

            let mut report = Report::build(ReportKind::Error, source_id, start)
                .with_message(message)
                .with_label(
                    Label::new((source_id, start..end))
                        .with_message(&details.message)
                        .with_color(Color::Red),
                );

            if let Some(suggestion) = &details.suggestion {
                report = report.with_help(suggestion);
            }

            match report.finish().write(
                (source_id, Source::from(details.source_text.as_ref())),
                &mut output,
            ) {
                Ok(_) => String::from_utf8_lossy(&output).to_string(),
                Err(_) => error.to_string(),
            }
        }
        other => other.to_string(),
    }
}
