//! Stats report type and terminal formatting.

use serde::Serialize;
use std::fmt;

use crate::store::ClassCount;

/// Inner width of the report boxes, between the two vertical borders.
const INNER_WIDTH: usize = 59;

/// The result of computing dataset statistics.
#[derive(Clone, Debug, Serialize)]
pub struct StatsReport {
    /// Rows in the images table.
    pub total_images: usize,
    /// Bounding boxes across all classes.
    pub total_boxes: usize,
    /// Boxes per class, sorted by count descending then name.
    pub classes: Vec<ClassCount>,
    /// Display-only option for histogram rendering width.
    #[serde(skip)]
    pub(crate) bar_width: usize,
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_summary(f)?;
        writeln!(f)?;
        self.fmt_classes(f)?;
        Ok(())
    }
}

impl StatsReport {
    fn fmt_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_top(f, "Summary")?;
        write_row(f, "")?;
        write_row(
            f,
            &format!("   Total Images:     {:>8}", group_thousands(self.total_images)),
        )?;
        write_row(
            f,
            &format!("   Bounding boxes:   {:>8}", group_thousands(self.total_boxes)),
        )?;
        write_row(
            f,
            &format!("   Classes:          {:>8}", group_thousands(self.classes.len())),
        )?;
        write_row(f, "")?;
        write_bottom(f)
    }

    fn fmt_classes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_top(f, "Class Distribution")?;
        write_row(f, "")?;

        if self.classes.is_empty() {
            write_row(f, "   No annotations found.")?;
        } else {
            let max_count = self.classes.iter().map(|c| c.count).max().unwrap_or(1);

            for class in &self.classes {
                let columns = format!(
                    "   {:<16} {:>7} {:>6}  ",
                    clip_label(&format!("'{}'", class.class_name), 16),
                    group_thousands(class.count),
                    percent_of(class.count, self.total_boxes),
                );
                // The bar gets whatever room the row has left.
                let room = INNER_WIDTH.saturating_sub(columns.chars().count());
                let bar = histogram_bar(class.count, max_count, self.bar_width.min(room));
                write_row(f, &format!("{}{}", columns, bar))?;
            }
        }

        write_row(f, "")?;
        write_bottom(f)
    }
}

fn write_top(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    let used = title.chars().count() + 3;
    writeln!(
        f,
        "┌─ {} {}┐",
        title,
        "─".repeat(INNER_WIDTH.saturating_sub(used))
    )
}

fn write_row(f: &mut fmt::Formatter<'_>, content: &str) -> fmt::Result {
    let padding = INNER_WIDTH.saturating_sub(content.chars().count());
    writeln!(f, "│{}{}│", content, " ".repeat(padding))
}

fn write_bottom(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "└{}┘", "─".repeat(INNER_WIDTH))
}

/// `1234567` -> `"1,234,567"`.
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let lead = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Share of `part` in `whole` with one decimal, or `n/a` for an empty whole.
fn percent_of(part: usize, whole: usize) -> String {
    match whole {
        0 => "n/a".to_string(),
        _ => format!("{:.1}%", part as f64 * 100.0 / whole as f64),
    }
}

/// A `width`-cell bar, filled in proportion to `count / max_count`.
fn histogram_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 || width == 0 {
        return String::new();
    }

    let filled = (count as u128 * width as u128 / max_count as u128).min(width as u128) as usize;
    let mut bar = "█".repeat(filled);
    bar.push_str(&"░".repeat(width - filled));
    bar
}

/// Cut `label` to `max_len` characters, marking the cut with an ellipsis.
fn clip_label(label: &str, max_len: usize) -> String {
    if label.chars().count() <= max_len {
        return label.to_string();
    }
    let mut clipped: String = label.chars().take(max_len.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}
