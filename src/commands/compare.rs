//! `compare` command: orchestration and table rendering

use super::{CliError, CompareArgs};
use crate::config::AppConfig;
use crate::members::{clean_channel_name, ChannelComparer, ComparisonResult};
use crate::slack::{Directory, SlackClient, UserProfile};
use colored::Colorize;
use std::fmt::Write;
use std::io::{self, Write as _};

pub async fn execute_compare(config: &AppConfig, args: &CompareArgs) -> Result<(), CliError> {
    let client = SlackClient::from_config(config)?;
    let comparer = ChannelComparer::new(client)
        .with_fetch_settings(config.fetch)
        .with_resolver_settings(config.resolver);

    run_compare(&comparer, args, &mut io::stdout().lock()).await
}

/// Run one comparison and write the report to `out`.
///
/// Under `--json`, `out` receives nothing but the JSON document; progress
/// banners go to stderr instead.
pub async fn run_compare<D, W>(
    comparer: &ChannelComparer<D>,
    args: &CompareArgs,
    out: &mut W,
) -> Result<(), CliError>
where
    D: Directory,
    W: io::Write,
{
    let mut banner = |line: String| -> io::Result<()> {
        if args.json {
            eprintln!("{}", line);
            Ok(())
        } else {
            writeln!(out, "{}", line)
        }
    };

    if args.verbose {
        banner("🔌 Testing Slack connection...".to_string())?;
        let status = comparer.test_connection().await;
        if !status.ok {
            return Err(CliError::ConnectionFailed);
        }
        banner(format!(
            "✅ Connected to Slack as {} on {}\n",
            status.user.unwrap_or_default().cyan(),
            status.team.unwrap_or_default().cyan()
        ))?;
    }

    if !args.json {
        banner(format!(
            "🔀 Comparing members between #{} and #{}...\n",
            clean_channel_name(&args.channel_a),
            clean_channel_name(&args.channel_b)
        ))?;
    }

    let comparison = comparer
        .compare_channels(&args.channel_a, &args.channel_b)
        .await?;

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &comparison)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", render_comparison(&comparison, args.verbose))?;
    }

    Ok(())
}

pub fn render_comparison(comparison: &ComparisonResult, verbose: bool) -> String {
    let mut out = String::new();
    let a = &comparison.channel_a_name;
    let b = &comparison.channel_b_name;

    let _ = writeln!(out, "{}\n", "📊 Comparison Results".bold());

    if comparison.is_identical() {
        let _ = writeln!(
            out,
            "{}",
            "🎉 Perfect match! Both channels have identical members.".green()
        );
    } else {
        let _ = writeln!(out, "📈 Summary:");
        let _ = writeln!(out, "   • Members only in #{}: {}", a, comparison.unique_to_a.len());
        let _ = writeln!(out, "   • Members only in #{}: {}", b, comparison.unique_to_b.len());
        let _ = writeln!(out, "   • Total unique members: {}\n", comparison.total_unique_count);

        for (channel, users) in [(a, &comparison.unique_to_a), (b, &comparison.unique_to_b)] {
            if users.is_empty() {
                continue;
            }
            let _ = writeln!(out, "👥 Members only in #{}:", channel);
            out.push_str(&render_table(&format!("Only in #{}", channel), users));
            out.push('\n');
        }
    }

    if verbose {
        let _ = writeln!(out, "📋 Additional Details:");
        let _ = writeln!(
            out,
            "   • Total members processed from #{}: {}",
            a,
            comparison.unique_to_a.len() + comparison.common_count
        );
        let _ = writeln!(
            out,
            "   • Total members processed from #{}: {}",
            b,
            comparison.unique_to_b.len() + comparison.common_count
        );
        let _ = writeln!(out, "   • Profiles skipped: {}", comparison.warnings.len());
        for warning in &comparison.warnings {
            let _ = writeln!(out, "     {} {}", "⚠".yellow(), warning);
        }
    }

    out
}

/// Name / Email / Username table, one row per user
///
/// Widths are counted in `char`s, so every border lines up for names made of
/// single-width characters. Double-width glyphs (CJK, emoji) push their row's
/// right border out by one column each.
pub fn render_table(title: &str, users: &[UserProfile]) -> String {
    const HEADERS: [&str; 3] = ["Name", "Email", "Username"];

    let rows: Vec<[String; 3]> = users
        .iter()
        .map(|u| [u.real_name.clone(), u.email.clone(), format!("@{}", u.name)])
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut inner_width = widths.iter().sum::<usize>() + 3 * widths.len() - 1;
    let title_width = title.chars().count() + 2;
    if title_width > inner_width {
        widths[2] += title_width - inner_width;
        inner_width = title_width;
    }

    let border = |left: &str, mid: &str, right: &str| {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}\n", left, segments.join(mid), right)
    };

    let mut out = String::new();
    let _ = writeln!(out, "┌{}┐", "─".repeat(inner_width));
    let _ = writeln!(out, "│ {} │", pad(title, inner_width - 2).bold());
    out.push_str(&border("├", "┬", "┤"));

    let header: Vec<String> = HEADERS
        .iter()
        .zip(widths)
        .map(|(h, w)| pad(h, w).bold().to_string())
        .collect();
    let _ = writeln!(out, "│ {} │", header.join(" │ "));
    out.push_str(&border("├", "┼", "┤"));

    for [name, email, username] in &rows {
        let _ = writeln!(
            out,
            "│ {} │ {} │ {} │",
            pad(name, widths[0]).cyan(),
            pad(email, widths[1]).white(),
            pad(username, widths[2]).bright_black()
        );
    }
    out.push_str(&border("└", "┴", "┘"));

    out
}

fn pad(cell: &str, width: usize) -> String {
    let fill = width.saturating_sub(cell.chars().count());
    format!("{}{}", cell, " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResolverSettings;
    use crate::members::ProfileLookupWarning;
    use crate::slack::mock::MockDirectory;
    use crate::slack::AuthIdentity;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn user(id: &str, name: &str, real_name: &str, email: &str) -> UserProfile {
        UserProfile {
            id: id.into(),
            name: name.into(),
            real_name: real_name.into(),
            email: email.into(),
            display_name: real_name.into(),
        }
    }

    fn args(verbose: bool, json: bool) -> CompareArgs {
        CompareArgs {
            channel_a: "#eng".into(),
            channel_b: "ops".into(),
            verbose,
            json,
        }
    }

    fn comparer(directory: MockDirectory) -> ChannelComparer<MockDirectory> {
        ChannelComparer::new(directory).with_resolver_settings(ResolverSettings {
            batch_size: 20,
            batch_delay: Duration::ZERO,
        })
    }

    fn workspace() -> MockDirectory {
        MockDirectory::new()
            .with_channel("C1", "eng", false)
            .with_channel("C2", "ops", true)
            .with_members("C1", &["U1", "U2"])
            .with_members("C2", &["U2", "U3"])
            .with_auth(AuthIdentity {
                ok: true,
                user: Some("comparer-bot".into()),
                team: Some("acme".into()),
                error: None,
            })
    }

    #[tokio::test]
    async fn test_verbose_json_writes_only_json() {
        let comparer = comparer(workspace());
        let mut out = Vec::new();

        run_compare(&comparer, &args(true, true), &mut out).await.unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["channelAName"], "eng");
        assert_eq!(json["channelBName"], "ops");
        assert_eq!(json["uniqueToA"][0]["id"], "U1");
        assert_eq!(json["uniqueToB"][0]["id"], "U3");
        assert_eq!(json["totalUniqueCount"], 2);
    }

    #[tokio::test]
    async fn test_verbose_tables_include_connection_banner() {
        let comparer = comparer(workspace());
        let mut out = Vec::new();

        run_compare(&comparer, &args(true, false), &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Testing Slack connection"));
        assert!(text.contains("Connected to Slack as"));
        assert!(text.contains("Comparing members between #eng and #ops"));
        assert!(text.contains("Total unique members: 2"));
    }

    #[tokio::test]
    async fn test_failed_credential_stops_before_comparing() {
        let comparer = comparer(workspace().with_auth(AuthIdentity {
            ok: false,
            user: None,
            team: None,
            error: Some("invalid_auth".into()),
        }));
        let mut out = Vec::new();

        let err = run_compare(&comparer, &args(true, true), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, CliError::ConnectionFailed));
        assert!(out.is_empty());
        assert_eq!(
            comparer.directory().list_channels_calls.load(Ordering::SeqCst),
            0
        );
    }

    #[test]
    fn test_table_rows_share_one_width() {
        let users = vec![
            user("U1", "ann", "Ann Lee", "ann@example.com"),
            user("U2", "zoë", "Zoë Müller-Lüdenscheidt", "No email"),
        ];
        colored::control::set_override(false);
        let table = render_table("Only in #a-much-longer-channel-name-than-the-columns", &users);

        let widths: Vec<usize> = table.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{table}");
    }

    fn result(unique_to_a: Vec<UserProfile>, unique_to_b: Vec<UserProfile>) -> ComparisonResult {
        ComparisonResult {
            channel_a_name: "eng".into(),
            channel_b_name: "ops".into(),
            total_unique_count: unique_to_a.len() + unique_to_b.len(),
            common_count: 2,
            unique_to_a,
            unique_to_b,
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_render_perfect_match() {
        let out = render_comparison(&result(Vec::new(), Vec::new()), false);
        assert!(out.contains("Perfect match"));
        assert!(!out.contains("Summary"));
    }

    #[test]
    fn test_render_summary_and_tables() {
        let out = render_comparison(
            &result(
                vec![user("U1", "ann", "Ann Lee", "ann@example.com")],
                Vec::new(),
            ),
            false,
        );

        assert!(out.contains("Members only in #eng: 1"));
        assert!(out.contains("Members only in #ops: 0"));
        assert!(out.contains("Total unique members: 1"));
        assert!(out.contains("Only in #eng"));
        assert!(!out.contains("Only in #ops"));
        assert!(out.contains("ann@example.com"));
        assert!(out.contains("@ann"));
        assert!(!out.contains("Additional Details"));
    }

    #[test]
    fn test_render_verbose_details() {
        let mut comparison = result(vec![user("U1", "ann", "Ann", "a@x.io")], Vec::new());
        comparison.warnings.push(ProfileLookupWarning {
            user_id: "U9".into(),
            reason: "user_not_found".into(),
        });

        let out = render_comparison(&comparison, true);
        assert!(out.contains("Total members processed from #eng: 3"));
        assert!(out.contains("Total members processed from #ops: 2"));
        assert!(out.contains("Profiles skipped: 1"));
        assert!(out.contains("U9"));
    }

    #[test]
    fn test_table_has_one_row_per_user() {
        let users = vec![
            user("U1", "ann", "Ann Lee", "ann@example.com"),
            user("U2", "bo", "Bo", "No email"),
        ];
        let table = render_table("Only in #eng", &users);

        assert!(table.contains("Name"));
        assert!(table.contains("Email"));
        assert!(table.contains("Username"));
        assert!(table.contains("Ann Lee"));
        assert!(table.contains("@bo"));
        // top, title, header separator, header, body separator, 2 rows, bottom
        assert_eq!(table.lines().count(), 8);
    }
}
