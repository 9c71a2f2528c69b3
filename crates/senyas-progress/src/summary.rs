//! Progress summary - text lines for the profile loader panel

use senyas_core::{Category, LessonKind};

use crate::profile::Progress;

/// Default wrap width for value lines
pub const SUMMARY_WRAP: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryLineKind {
    /// "Galaxy Explorer:"
    Category,
    /// "Alphabets:"
    LessonType,
    /// "A, B, C"
    Values,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub kind: SummaryLineKind,
    /// Category key, for colouring
    pub category: String,
    pub text: String,
}

impl SummaryLine {
    /// Indent level used by the loader panel
    pub fn indent(&self) -> usize {
        match self.kind {
            SummaryLineKind::Category => 0,
            SummaryLineKind::LessonType => 1,
            SummaryLineKind::Values => 2,
        }
    }
}

/// Lines grouped by category, then lesson type in first-seen order
pub fn summarize(progress: &Progress, wrap: usize) -> Vec<SummaryLine> {
    let mut lines = Vec::new();
    for (category, entries) in &progress.completed_lessons {
        lines.push(SummaryLine {
            kind: SummaryLineKind::Category,
            category: category.clone(),
            text: format!("{}:", category_title(category)),
        });

        let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
        for entry in entries {
            let Some((kind, value)) = LessonKind::parse_entry(entry) else {
                tracing::trace!(entry = %entry, "unrecognised progress entry skipped");
                continue;
            };
            match groups.iter_mut().find(|(prefix, _)| *prefix == kind.prefix()) {
                Some((_, values)) => values.push(value),
                None => groups.push((kind.prefix(), vec![value])),
            }
        }

        for (prefix, values) in groups {
            lines.push(SummaryLine {
                kind: SummaryLineKind::LessonType,
                category: category.clone(),
                text: format!("{prefix}:"),
            });
            for text in wrap_values(&values, wrap) {
                lines.push(SummaryLine {
                    kind: SummaryLineKind::Values,
                    category: category.clone(),
                    text,
                });
            }
        }
    }
    lines
}

fn category_title(key: &str) -> String {
    if let Some(category) = Category::from_key(key) {
        return category.title().to_string();
    }
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Join values with ", " into lines of at most `width` characters
///
/// A single value longer than `width` gets a line of its own.
pub fn wrap_values(values: &[&str], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for value in values {
        if current.is_empty() {
            current.push_str(value);
        } else if current.len() + value.len() + 2 > width {
            lines.push(std::mem::take(&mut current));
            current.push_str(value);
        } else {
            current.push_str(", ");
            current.push_str(value);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
