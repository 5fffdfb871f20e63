use std::{sync::LazyLock, time::Duration};

use console::style;
use regex::{Captures, Regex};

static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\*").expect("bullet pattern is valid"));

pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

/// Render the backend's markdown-ish summary for the terminal:
/// `**bold**` spans and `*` bullets.
pub fn render_summary(summary: &str) -> String {
    let bolded = BOLD_RE.replace_all(summary, |caps: &Captures| {
        style(&caps[1]).bold().to_string()
    });
    BULLET_RE.replace_all(&bolded, "\n •").into_owned()
}
