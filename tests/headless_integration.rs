use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use typerace::difficulty::{Difficulty, GameMode};
use typerace::game::{Game, GameSettings};
use typerace::runtime::{command_for, Command, FixedTicker, GameEvent, Runner, TestEventSource};
use typerace::session::Status;

fn key(c: char) -> GameEvent {
    GameEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn custom_game(prompt: &str, mode: GameMode) -> Game {
    Game::new(GameSettings {
        mode,
        difficulty: Difficulty::Easy,
        custom_prompt: Some(prompt.to_string()),
        seed: Some(5),
        ..GameSettings::default()
    })
}

// Drives the game loop the way the binary does, without a terminal.
#[test]
fn headless_typing_flow_completes() {
    let mut game = custom_game("hi", GameMode::Custom);

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(key('h')).unwrap();
    tx.send(key('i')).unwrap();

    for _ in 0..100u32 {
        let step = runner.step();
        game.advance(step.elapsed);
        if let GameEvent::Key(k) = step.event {
            match command_for(k) {
                Some(Command::Quit) => break,
                Some(command) => game.apply(command),
                None => {}
            }
        }
        if game.status() == Status::Finished {
            break;
        }
    }

    assert_eq!(game.status(), Status::Finished);
    let result = game.last_result().expect("finished round has a result");
    assert!(result.completed);
    assert_eq!(result.accuracy, 100);
    assert_eq!(result.max_streak, 2);
}

#[test]
fn headless_esc_quits_before_finishing() {
    let mut game = custom_game("hello", GameMode::Custom);

    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );
    tx.send(key('h')).unwrap();
    tx.send(GameEvent::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)))
        .unwrap();

    let mut quit = false;
    for _ in 0..20u32 {
        let step = runner.step();
        if let GameEvent::Key(k) = step.event {
            match command_for(k) {
                Some(Command::Quit) => {
                    quit = true;
                    break;
                }
                Some(command) => game.apply(command),
                None => {}
            }
        }
    }

    assert!(quit);
    assert_eq!(game.status(), Status::Playing);
    assert_eq!(game.session().user_input(), "h");
}

#[test]
fn headless_timed_session_finishes_by_time() {
    let mut game = custom_game("hello world", GameMode::Classic);
    game.type_char('h');

    // ticks only; the countdown sees one second per step
    for _ in 0..100u32 {
        game.advance(Duration::from_secs(1));
        if game.status() == Status::Finished {
            break;
        }
    }

    assert_eq!(game.status(), Status::Finished);
    assert_eq!(game.seconds_left(), Some(0));
    let result = game.last_result().expect("timed out round has a result");
    assert!(!result.completed);
    assert_eq!(result.progress, 9);
}

#[test]
fn headless_difficulty_keys_switch_text() {
    let mut game = Game::new(GameSettings {
        seed: Some(1),
        ..GameSettings::default()
    });
    assert_eq!(game.session().target_text(), Difficulty::Medium.paragraph());

    let f1 = KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE);
    if let Some(command) = command_for(f1) {
        game.apply(command);
    }

    assert_eq!(game.difficulty(), Difficulty::Easy);
    assert_eq!(game.session().target_text(), Difficulty::Easy.paragraph());
    assert_eq!(game.seconds_left(), Some(45));
}
