//! Plain-text rendering of the vote and results views.

use std::fmt::Write as _;

use crate::model::{PollResults, ResultOption};
use crate::views::{Action, PollResultsView, PollVoteView};

/// Shown instead of the bars when a poll has no votes.
pub const NO_VOTES: &str = "No votes yet. Be the first to vote!";

const BAR_FILLED: &str = "█";
const BAR_EMPTY: &str = "░";

/// Format a percentage the way the server sent it, without a trailing `.0`.
///
/// `f64`'s `Display` already prints whole values without a fraction.
#[must_use]
pub fn format_percentage(percentage: f64) -> String {
    format!("{percentage}")
}

/// `"1 vote"` or `"{n} votes"`.
#[must_use]
pub fn vote_label(count: i64) -> String {
    if count == 1 {
        "1 vote".to_string()
    } else {
        format!("{count} votes")
    }
}

/// A bar scaled so the leading option fills `width` cells.
#[must_use]
pub fn bar(vote_count: i64, max_vote_count: i64, width: usize) -> String {
    // i64 counts times a usize width always fit in u128.
    let max = u128::try_from(max_vote_count.max(1)).unwrap_or(1);
    let count = u128::try_from(vote_count.clamp(0, max_vote_count.max(1))).unwrap_or(0);
    let cells = u128::try_from(width).unwrap_or(u128::MAX);
    let filled = usize::try_from(count * cells / max)
        .unwrap_or(width)
        .min(width);

    format!(
        "{}{}",
        BAR_FILLED.repeat(filled),
        BAR_EMPTY.repeat(width - filled)
    )
}

fn option_line(option: &ResultOption) -> String {
    format!(
        "{}  {} ({}%)",
        option.option_text,
        option.vote_count,
        format_percentage(option.percentage)
    )
}

fn write_tally(out: &mut String, results: &PollResults, bar_width: usize) {
    let _ = writeln!(out, "{}", results.question);
    let _ = writeln!(out, "{}", vote_label(results.total_votes));
    let _ = writeln!(out);

    let max = results.max_vote_count();
    for option in &results.options {
        let _ = writeln!(out, "{}", option_line(option));
        let _ = writeln!(out, "{}", bar(option.vote_count, max, bar_width));
    }

    if results.total_votes == 0 {
        let _ = writeln!(out);
        let _ = writeln!(out, "{NO_VOTES}");
    }
}

fn write_actions(out: &mut String, actions: &[Action]) {
    let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
    let _ = writeln!(out, "Actions: {}", labels.join(" | "));
}

/// Render tallied results with bars and the share URL.
#[must_use]
pub fn render_results(results: &PollResults, share_url: &str, bar_width: usize) -> String {
    let mut out = String::new();
    write_tally(&mut out, results, bar_width);
    let _ = writeln!(out);
    let _ = write!(out, "Share this poll: {share_url}");
    out
}

/// Render the results view: loading text, a lone error, or the results with
/// the view's actions.
#[must_use]
pub fn render_results_view(view: &PollResultsView, share_url: &str, bar_width: usize) -> String {
    match (view.results(), view.error()) {
        (Some(results), _) => {
            let mut out = String::new();
            write_tally(&mut out, results, bar_width);
            let _ = writeln!(out);
            write_actions(&mut out, &view.actions());
            let _ = write!(out, "Share this poll: {share_url}");
            out
        }
        (None, Some(error)) => error.to_string(),
        (None, None) => "Loading results...".to_string(),
    }
}

/// Render the vote view: question, numbered options, and the share URL.
#[must_use]
pub fn render_vote_view(view: &PollVoteView, share_url: &str) -> String {
    let Some(poll) = view.poll() else {
        return view
            .state()
            .failure()
            .map_or_else(|| "Loading poll...".to_string(), str::to_string);
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", poll.question);
    let _ = writeln!(out);
    for (index, option) in poll.options.iter().enumerate() {
        let marker = if view.selected_option() == Some(option.option_id) {
            "(x)"
        } else {
            "( )"
        };
        let _ = writeln!(
            out,
            "{marker} {}. {}  [id {}]",
            index + 1,
            option.option_text,
            option.option_id
        );
    }

    if let Some(error) = view.error() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{error}");
    }
    if view.inputs_disabled() {
        let _ = writeln!(out);
        let _ = writeln!(out, "You have already voted on this poll.");
    }

    let _ = writeln!(out);
    write_actions(&mut out, &view.actions());
    let _ = write!(out, "Share this poll: {share_url}");
    out
}
