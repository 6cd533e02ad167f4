use chrono::{DateTime, Utc};
use colored::Colorize;
use std::collections::BTreeMap;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};
use wishapp::commands::{CmdMessage, CmdResult, DisplayWish, MessageLevel};
use wishapp::model::{FilterCounts, WishFilter};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const DONE_MARKER: &str = "✓";
const STAR_MARKER: &str = "★";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// A list view: filter bar, wishes, then messages.
pub(super) fn print_list(result: &CmdResult, filter: WishFilter) {
    if let Some(counts) = result.counts {
        println!("{}", filter_bar(counts, filter));
        println!();
    }
    print_wishes(&result.wishes);
    if let Some(token) = &result.sync_token {
        println!();
        println!("{}", format!("Syncing with {}", token).dimmed());
    }
    print_messages(&result.messages);
}

/// Wishes affected by a command, followed by its messages.
pub(super) fn print_result(result: &CmdResult) {
    print_messages(&result.messages);
    print_wishes(&result.wishes);
    if !result.categories.is_empty() {
        print_categories(&result.categories);
    }
}

pub(super) fn print_wishes(wishes: &[DisplayWish]) {
    for dw in wishes {
        println!("{}", wish_line(dw, Utc::now()));
    }
}

fn print_categories(categories: &BTreeMap<String, usize>) {
    let name_width = categories.keys().map(|c| c.width()).max().unwrap_or(0);
    for (name, count) in categories {
        let padding = name_width.saturating_sub(name.width());
        println!(
            "  {}{}  {}",
            name.bold(),
            " ".repeat(padding),
            count.to_string().dimmed()
        );
    }
}

fn filter_bar(counts: FilterCounts, active: WishFilter) -> String {
    let entries = [
        (WishFilter::All, "All", counts.all),
        (WishFilter::Pending, "Pending", counts.pending),
        (WishFilter::Completed, "Completed", counts.completed),
        (WishFilter::Priority, "Priority", counts.priority),
    ];
    entries
        .iter()
        .map(|(filter, label, count)| {
            let text = format!("{} ({})", label, count);
            if *filter == active {
                text.bold().underline().to_string()
            } else {
                text.dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn wish_line(dw: &DisplayWish, now: DateTime<Utc>) -> String {
    let wish = &dw.wish;
    let idx_str = format!("{:>3}. ", dw.index);
    let done = if wish.completed { DONE_MARKER } else { " " };
    let star = if wish.priority { STAR_MARKER } else { " " };
    let category = format!(" [{}]", wish.category);
    let time_ago = format_time_ago(wish.created_at, now);

    let left = format!("{}{} ", idx_str, done);
    let fixed_width = left.width() + category.width() + 2 + TIME_WIDTH;
    let available = LINE_WIDTH.saturating_sub(fixed_width);
    let text = truncate_to_width(&wish.text, available);
    let padding = available.saturating_sub(text.width());

    let text_colored = if wish.completed {
        text.strikethrough().dimmed()
    } else if wish.priority {
        text.bold()
    } else {
        text.normal()
    };

    format!(
        "{}{} {}{}{}{} {}",
        idx_str,
        done.green(),
        text_colored,
        category.cyan(),
        " ".repeat(padding),
        star.yellow(),
        time_ago.dimmed()
    )
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use wishapp::model::Wish;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn truncates_long_text_with_ellipsis() {
        assert_eq!(truncate_to_width("short", 10), "short");
        let cut = truncate_to_width("a very long wish indeed", 10);
        assert_eq!(cut, "a very lo…");
        assert_eq!(cut.width(), 10);
    }

    #[test]
    fn truncation_respects_wide_characters() {
        let cut = truncate_to_width("日本に行きたいです", 8);
        assert!(cut.width() <= 8);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn time_ago_is_right_aligned() {
        let now = Utc::now();
        let s = format_time_ago(now - Duration::hours(2), now);
        assert_eq!(s.width(), TIME_WIDTH);
        assert!(s.trim_start().starts_with("2 hours"));
    }

    #[test]
    fn wish_line_shows_flags_and_category() {
        plain();
        let mut wish = Wish::new("Swim with dolphins", Some("Nature")).unwrap();
        wish.completed = true;
        wish.priority = true;
        let line = wish_line(&DisplayWish { index: 3, wish }, Utc::now());

        assert!(line.starts_with("  3. ✓ Swim with dolphins [Nature]"));
        assert!(line.contains(STAR_MARKER));
    }

    #[test]
    fn filter_bar_lists_all_counts() {
        plain();
        let counts = FilterCounts {
            all: 3,
            pending: 2,
            completed: 1,
            priority: 0,
        };
        assert_eq!(
            filter_bar(counts, WishFilter::All),
            "All (3)  Pending (2)  Completed (1)  Priority (0)"
        );
    }
}
