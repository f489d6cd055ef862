use chrono::{DateTime, TimeZone};

/// Formats a report timestamp in its own timezone, e.g. "2025-12-16 10:30:00 +01:00"
pub fn format_generated_at<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y-%m-%d %H:%M:%S %:z").to_string()
}

/// File name for a report written at `at`, e.g. "steam-wishlist-overlap-2025-12-16.md"
pub fn report_file_name<Tz: TimeZone>(wishlist_label: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let label = sanitize_filename(wishlist_label).to_lowercase().replace(' ', "-");
    format!("{}-wishlist-overlap-{}.md", label, at.format("%Y-%m-%d"))
}

/// Sanitizes a string for use in a filename
/// Replaces invalid filename characters with hyphens
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
