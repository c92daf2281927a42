use clap::Parser;
use jiff::Zoned;
use jiff::civil::Date;
use log::LevelFilter;

mod data;
mod error;
mod github;
mod output;
mod scan;
mod window;

use github::{Credentials, FetchOptions, RestClient};
use scan::ScanRequest;
use window::DateWindow;

/// Find pull requests that were force-merged in a GitHub repository
#[derive(Parser)]
#[command(name = "force-merge-report")]
#[command(about = "Find PRs force-merged in a GitHub repository")]
#[command(long_about = r#"force-merge-report - Find PRs force-merged in a GitHub repository

Lists pull requests merged inside a date window that carry a comment
containing the force-merge marker (FORCE_MERGE by default).

When only --startdate is given, the window ends on the last day of that
month if the start is the first of a month, or 30 days later otherwise."#)]
struct Args {
    /// GitHub repository in the format 'owner/repo'
    repo: String,

    /// Start date in YYYY-MM-DD format (default: 30 days ago)
    #[arg(long = "startdate", value_name = "DATE", value_parser = parse_date)]
    start_date: Option<Date>,

    /// End date in YYYY-MM-DD format (default: derived from the start date)
    #[arg(long = "enddate", value_name = "DATE", value_parser = parse_date)]
    end_date: Option<Date>,

    /// GitHub personal access token
    #[arg(long)]
    token: Option<String>,

    /// Output results as JSON instead of text
    #[arg(long = "output_json")]
    output_json: bool,

    /// Log progress and per-PR decisions
    #[arg(long)]
    verbose: bool,

    /// Comment text that marks a force merge (case-sensitive)
    #[arg(long, default_value = scan::DEFAULT_MARKER)]
    marker: String,

    /// Base URL of the GitHub REST API
    #[arg(long = "api_url", value_name = "URL", default_value = github::DEFAULT_API_URL)]
    api_url: String,

    /// Page through every closed PR instead of stopping at the first one merged before the window
    #[arg(long = "full_scan")]
    full_scan: bool,

    /// Read every page of comments instead of only the first
    #[arg(long = "all_comments")]
    all_comments: bool,
}

/// Parse a strict `YYYY-MM-DD` date
fn parse_date(value: &str) -> Result<Date, String> {
    let well_formed = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(format!("expected a date in YYYY-MM-DD format, got '{value}'"));
    }
    Date::strptime("%Y-%m-%d", value).map_err(|err| format!("invalid date '{value}': {err}"))
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .format_timestamp(None)
        .target(env_logger::Target::Stdout)
        .init();

    let start_date = args
        .start_date
        .unwrap_or_else(|| window::default_start(Zoned::now().date()));

    let request = ScanRequest {
        repo: args.repo,
        window: DateWindow::resolve(start_date, args.end_date),
        marker: args.marker,
        options: FetchOptions {
            full_scan: args.full_scan,
            all_comments: args.all_comments,
        },
    };
    let client = RestClient::new(&args.api_url, Credentials::new(args.token));

    let result = scan::scan(&client, &request)
        .and_then(|records| output::print_report(&records, args.output_json));
    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use jiff::civil::date;

    #[test]
    fn full_command_line() {
        let args = Args::try_parse_from([
            "force-merge-report",
            "acme/widgets",
            "--startdate",
            "2024-03-01",
            "--enddate",
            "2024-03-20",
            "--token",
            "abc",
            "--output_json",
            "--verbose",
            "--marker",
            "[override]",
            "--api_url",
            "http://localhost:8080",
            "--full_scan",
            "--all_comments",
        ])
        .unwrap();

        assert_eq!(args.repo, "acme/widgets");
        assert_eq!(args.start_date, Some(date(2024, 3, 1)));
        assert_eq!(args.end_date, Some(date(2024, 3, 20)));
        assert_eq!(args.token.as_deref(), Some("abc"));
        assert!(args.output_json);
        assert!(args.verbose);
        assert_eq!(args.marker, "[override]");
        assert_eq!(args.api_url, "http://localhost:8080");
        assert!(args.full_scan);
        assert!(args.all_comments);
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["force-merge-report", "acme/widgets"]).unwrap();

        assert_eq!(args.start_date, None);
        assert_eq!(args.end_date, None);
        assert_eq!(args.token, None);
        assert!(!args.output_json);
        assert!(!args.verbose);
        assert_eq!(args.marker, "FORCE_MERGE");
        assert_eq!(args.api_url, "https://api.github.com");
        assert!(!args.full_scan);
        assert!(!args.all_comments);
    }

    #[test]
    fn repo_is_required() {
        let err = Args::try_parse_from(["force-merge-report"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn dates_must_be_year_month_day() {
        for bad in [
            "2024-3-1",
            "2024-03-01T10:00",
            "20240301",
            "2024-03-01 23:00:00",
            "2024-02-30",
            "yesterday",
        ] {
            for flag in ["--startdate", "--enddate"] {
                let err = Args::try_parse_from(["force-merge-report", "acme/widgets", flag, bad])
                    .err()
                    .unwrap();
                assert_eq!(err.kind(), ErrorKind::ValueValidation, "{flag} {bad}");
            }
        }
    }
}
