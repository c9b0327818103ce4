use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use typerace::{
    clock::Clock, difficulty::GameMode, game::Game, session::Status, stats::CharStatus,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

pub fn draw<C: Clock>(f: &mut Frame, game: &Game<C>) {
    let area = f.area();
    let prompt = game.session().target_text();

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
    let prompt_lines = prompt
        .split('\n')
        .map(|line| (line.width() as u16 / max_chars_per_line) + 1)
        .sum::<u16>();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(prompt_lines),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    f.render_widget(header(game), chunks[0]);
    f.render_widget(mode_line(game), chunks[1]);
    f.render_widget(prompt_widget(game), chunks[2]);
    f.render_widget(stats_line(game), chunks[3]);
    f.render_widget(help_line(game.status()), chunks[4]);
}

fn header<C: Clock>(game: &Game<C>) -> Paragraph<'static> {
    let dim = Style::default().add_modifier(Modifier::DIM);
    let mut spans = vec![
        Span::styled(
            format!("{} ", game.mode()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("· {} · {}", game.difficulty(), game.difficulty().description()),
            dim,
        ),
    ];
    if let Some(secs) = game.seconds_left() {
        spans.push(Span::styled(
            format!("   {secs}s"),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    Paragraph::new(Line::from(spans))
}

/// Goal, lesson position or bot standings, depending on the mode
fn mode_line<C: Clock>(game: &Game<C>) -> Paragraph<'static> {
    let text = match game.mode() {
        GameMode::Daily => format!("today's goal: {} wpm", game.daily().goal_wpm),
        GameMode::Lesson => {
            let cursor = game.lesson();
            let lesson = cursor.lesson();
            let done = if game.is_lesson_completed(lesson.id) { " ✓" } else { "" };
            format!(
                "lesson {}: {} ({}/{}) · keys {}{done}",
                cursor.lesson_index() + 1,
                lesson.title,
                cursor.exercise_index() + 1,
                lesson.exercises.len(),
                lesson.keys,
            )
        }
        GameMode::Bots => {
            let mut parts = vec![format!("you {}%", game.stats().progress)];
            parts.extend(
                game.bot_standings()
                    .into_iter()
                    .map(|(bot, progress)| format!("{} {progress}%", bot.name)),
            );
            parts.join("  ")
        }
        _ => String::new(),
    };
    Paragraph::new(Span::styled(text, Style::default().add_modifier(Modifier::DIM)))
}

fn prompt_widget<C: Clock>(game: &Game<C>) -> Paragraph<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let correct = bold.fg(Color::Green);
    let incorrect = bold.fg(Color::Red);
    let pending = bold.add_modifier(Modifier::DIM);
    let cursor = pending.add_modifier(Modifier::UNDERLINED);

    let target = game.session().target_chars();
    let cursor_pos = game.session().input_chars().len();
    let show_cursor = game.status() != Status::Finished;

    let mut lines = Vec::new();
    let mut spans = Vec::new();
    for (idx, (&expected, status)) in target.iter().zip(game.char_statuses()).enumerate() {
        let style = match status {
            CharStatus::Correct => correct,
            CharStatus::Incorrect => incorrect,
            CharStatus::Pending if show_cursor && idx == cursor_pos => cursor,
            CharStatus::Pending => pending,
        };
        let shown = match (expected, status) {
            ('\n', _) => "⏎".to_string(),
            (' ', CharStatus::Incorrect) => "·".to_string(),
            (c, _) => c.to_string(),
        };
        spans.push(Span::styled(shown, style));
        if expected == '\n' {
            lines.push(Line::from(std::mem::take(&mut spans)));
        }
    }
    lines.push(Line::from(spans));

    Paragraph::new(lines).wrap(Wrap { trim: false })
}

fn stats_line<C: Clock>(game: &Game<C>) -> Paragraph<'static> {
    let stats = game.stats();
    let text = match (game.status(), game.last_result()) {
        (Status::Finished, Some(result)) => format!(
            "{}  {} wpm  {}% acc  max streak {}  best {} wpm",
            match (result.won, result.goal_met, result.completed) {
                (Some(true), _, _) => "you win!",
                (Some(false), _, _) => "a bot got there first",
                (_, Some(true), _) => "goal reached!",
                (_, Some(false), _) => "goal missed",
                (_, _, true) => "done!",
                (_, _, false) => "time's up",
            },
            result.wpm,
            result.accuracy,
            result.max_streak,
            game.high_score(result.difficulty),
        ),
        (Status::Initial, _) => "start typing to begin".to_string(),
        _ => format!(
            "{} wpm  {}% acc  {}%  streak {} (max {})",
            stats.wpm,
            stats.accuracy,
            stats.progress,
            game.session().streak(),
            game.session().max_streak(),
        ),
    };
    Paragraph::new(Span::styled(text, Style::default().fg(Color::Magenta)))
        .alignment(Alignment::Center)
}

fn help_line(status: Status) -> Paragraph<'static> {
    let text = match status {
        Status::Finished => "(tab) retry  (ctrl+n) new text  (f1-f4) difficulty  (esc) quit",
        _ => "(tab) restart  (ctrl+n) new text  (f1-f4) difficulty  (esc) quit",
    };
    Paragraph::new(Span::styled(
        text,
        Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
    ))
    .alignment(Alignment::Center)
}
