use chrono::{DateTime, Local, Utc};
use colored::{Color, Colorize};
use keep::api::{CmdMessage, MessageLevel};
use keep::config::KeepConfig;
use keep::model::{FileHeader, Group, Note};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const NAME_WIDTH: usize = 20;

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
        }
    }
}

/// One line per note: id, text in the note's color, creation time.
pub(super) fn print_notes(header: Option<&FileHeader>, notes: &[Note]) {
    if let Some(header) = header {
        println!("{}", header.title.bold());
    }
    if notes.is_empty() {
        println!("No notes found.");
        return;
    }

    let now = Local::now();
    for note in notes {
        let idx_str = format!("{:>4}. ", note.id);
        let when = note
            .created()
            .map(|t| format_when(t, now))
            .unwrap_or_default();

        let available = LINE_WIDTH.saturating_sub(idx_str.width() + TIME_WIDTH);
        let text = truncate_to_width(&single_line(&note.text), available);
        let padding = available.saturating_sub(text.width());

        println!(
            "{}{}{}{}",
            idx_str,
            colorize(&text, note.color),
            " ".repeat(padding),
            format!("{:>width$}", when, width = TIME_WIDTH).dimmed()
        );
    }
}

pub(super) fn print_full_notes(notes: &[Note]) {
    let now = Local::now();
    for (i, note) in notes.iter().enumerate() {
        if i > 0 {
            println!("\n--------------------------------\n");
        }
        let when = note
            .created()
            .map(|t| format_when(t, now))
            .unwrap_or_default();
        println!("{} {}", format!("#{}", note.id).yellow(), when.dimmed());
        println!("{}", colorize(&note.text, note.color));
    }
}

pub(super) fn print_groups(groups: &[Group]) {
    for group in groups {
        let name = format!(
            "{:<width$}",
            truncate_to_width(&group.name, NAME_WIDTH),
            width = NAME_WIDTH
        );
        let count = format!("{:>4} ", group.header.size);
        let updated = group
            .header
            .updated()
            .map(format_time_ago)
            .unwrap_or_default();

        let fixed = NAME_WIDTH + 2 + count.width() + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let description = truncate_to_width(&single_line(&group.header.description), available);
        let padding = available.saturating_sub(description.width());

        println!(
            "{}  {}{}{}{}",
            name.bold(),
            count.cyan(),
            description,
            " ".repeat(padding),
            updated.dimmed()
        );
    }
}

pub(super) fn print_header(header: &FileHeader) {
    let stamp = |t: Option<DateTime<Utc>>| {
        t.map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default()
    };

    println!("{}", header.title.bold());
    if !header.description.is_empty() {
        println!("{}", header.description);
    }
    println!("notes:    {} ({} ever)", header.size, header.size_all_time);
    println!("created:  {}", stamp(header.created()));
    println!("updated:  {}", stamp(header.updated()));
}

pub(super) fn print_config(config: &KeepConfig) {
    for key in KeepConfig::KEYS {
        println!("{} = {}", key, config.get(key).unwrap_or_default());
    }
}

/// Maps the stored ANSI foreground code onto a terminal color.
fn note_color(code: i8) -> Option<Color> {
    match code {
        31 => Some(Color::Red),
        32 => Some(Color::Green),
        33 => Some(Color::Yellow),
        34 => Some(Color::Blue),
        36 => Some(Color::Cyan),
        _ => None,
    }
}

fn colorize(text: &str, code: i8) -> String {
    match note_color(code) {
        Some(color) => text.color(color).to_string(),
        None => text.to_string(),
    }
}

fn single_line(s: &str) -> String {
    s.chars().map(|c| if c == '\n' { ' ' } else { c }).collect()
}

/// Clock time for notes written today, the date otherwise.
fn format_when(timestamp: DateTime<Utc>, now: DateTime<Local>) -> String {
    let local = timestamp.with_timezone(&Local);
    if local.date_naive() == now.date_naive() {
        local.format("%H:%M").to_string()
    } else {
        local.format("%Y-%m-%d").to_string()
    }
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
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn truncates_by_display_width() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        // Wide characters take two columns each
        assert_eq!(truncate_to_width("日本語です", 5), "日本…");
    }

    #[test]
    fn today_shows_time_other_days_show_date() {
        let now = Local.with_ymd_and_hms(2024, 3, 10, 18, 30, 0).unwrap();
        let earlier = (now - Duration::hours(2)).with_timezone(&Utc);
        let last_week = (now - Duration::days(7)).with_timezone(&Utc);

        assert_eq!(format_when(earlier, now), "16:30");
        assert_eq!(format_when(last_week, now), "2024-03-03");
    }

    #[test]
    fn palette_codes_map_to_colors() {
        for code in keep::model::PALETTE {
            assert!(note_color(code).is_some(), "code {}", code);
        }
        assert_eq!(note_color(0), None);
    }

    #[test]
    fn newlines_are_flattened() {
        assert_eq!(single_line("a\nb"), "a b");
    }
}
