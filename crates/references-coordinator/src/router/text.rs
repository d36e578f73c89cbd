use crate::model::{ReferenceInfo, ReferencesResult};

const CANCELED_MARKER: &str = "(canceled)";

/// Plain-text summary printed to the side panel in Peek mode.
///
/// A canceled search only lists confirmed references. Returns an empty
/// string when there is nothing to show.
pub fn render_text_summary(
    result: &ReferencesResult,
    canceled: bool,
    group_by_file: bool,
) -> String {
    let shown = if canceled {
        result.confirmed_only()
    } else {
        result.clone()
    };

    let header = match (shown.text.is_empty(), canceled) {
        (false, false) => Some(shown.text.clone()),
        (false, true) => Some(format!("{} {CANCELED_MARKER}", shown.text)),
        (true, true) if !shown.references.is_empty() => Some(CANCELED_MARKER.to_string()),
        (true, _) => None,
    };

    let mut out = String::new();
    if let Some(header) = header {
        out.push_str(&header);
    }

    if group_by_file {
        for group in shown.grouped_by_file() {
            push_line(&mut out, &format!("{}:", group.file.display()));
            for reference in &group.references {
                push_line(&mut out, &format!("  {}", describe(reference)));
            }
        }
    } else {
        for reference in &shown.references {
            push_line(&mut out, &format!("{}:{}", reference.file.display(), describe(reference)));
        }
    }
    out
}

fn describe(reference: &ReferenceInfo) -> String {
    format!(
        "{}:{} [{}] {}",
        reference.position.line + 1,
        reference.position.character + 1,
        reference.kind.label(),
        reference.text.trim()
    )
}

fn push_line(
    out: &mut String,
    line: &str,
) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(line);
}

#[cfg(test)]
#[path = "../../tests/src/router/text_tests.rs"]
mod tests;
