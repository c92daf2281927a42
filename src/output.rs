use colored::Colorize as _;
use jiff::tz::TimeZone;

use crate::data::ForceMergeRecord;
use crate::error::Result;

/// Render the records as a pretty-printed JSON array
pub fn render_json(records: &[ForceMergeRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Render one record as a three-line block followed by a blank line
pub fn render_record(record: &ForceMergeRecord) -> String {
    let merged_on = record.merged_at.to_zoned(TimeZone::UTC).date();
    let heading = format!("{}#{}", record.repo, record.pr_number);
    format!(
        "{}: {} - {} @ {}\nComment by {}: {}\nURL: {}\n\n",
        heading.cyan().bold(),
        record.author,
        record.title,
        merged_on,
        record.commenter.yellow(),
        record.comment_body,
        record.url.bright_blue(),
    )
}

/// Render the full text report, header included
pub fn render_text(records: &[ForceMergeRecord]) -> String {
    let mut text = format!("\n{}\n", "Force-Merged PRs:".bold());
    for record in records {
        text.push_str(&render_record(record));
    }
    text
}

/// Print the report to stdout
pub fn print_report(records: &[ForceMergeRecord], output_json: bool) -> Result<()> {
    if output_json {
        println!("{}", render_json(records)?);
    } else {
        print!("{}", render_text(records));
    }
    Ok(())
}
