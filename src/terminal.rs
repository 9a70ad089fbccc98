//! Line-oriented terminal front-end for the quiz.

use cat_facts_game::{Command, GameEvent, PowerUpKind, RunnerEvent, SessionState};

/// A parsed line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Forward to the runner.
    Command(Command),
    /// Print the key list.
    Help,
    /// Leave the game.
    Quit,
    /// Not understood.
    Unknown,
}

/// Key reference shown at startup and on `h`.
pub const HELP: &str = "\
Keys (press Enter after each):
  t  true          f  false
  x  extra time    d  double points    s  skip question
  p  pause/resume  i  status
  n  new game      e  end game         r  reset
  h  help          q  quit";

/// Maps one line of input to an action.
pub fn parse_input(line: &str) -> Input {
    match line.trim().to_lowercase().as_str() {
        "t" | "true" => Input::Command(Command::Answer(true)),
        "f" | "false" => Input::Command(Command::Answer(false)),
        "x" => Input::Command(Command::PowerUp(PowerUpKind::ExtraTime)),
        "d" => Input::Command(Command::PowerUp(PowerUpKind::DoublePoints)),
        "s" => Input::Command(Command::PowerUp(PowerUpKind::SkipQuestion)),
        "p" => Input::Command(Command::TogglePause),
        "i" => Input::Command(Command::Status),
        "n" | "start" => Input::Command(Command::Start),
        "e" => Input::Command(Command::End),
        "r" => Input::Command(Command::Reset),
        "h" | "?" => Input::Help,
        "q" | "quit" => Input::Quit,
        _ => Input::Unknown,
    }
}

/// Renders an event as a line of text. Most clock ticks stay silent.
pub fn describe(event: &RunnerEvent) -> Option<String> {
    match event {
        RunnerEvent::Game(event) => describe_game(event),
        RunnerEvent::Rejected(e) => Some(format!("Cannot start: {e}")),
        RunnerEvent::Status(state) => Some(describe_state(state)),
    }
}

fn describe_game(event: &GameEvent) -> Option<String> {
    let line = match event {
        GameEvent::Started { fact } => format!("Game on!\n\n  \"{fact}\"\n\nTrue or false?"),
        GameEvent::FactDrawn { fact } => format!("\n  \"{fact}\"\n\nTrue or false?"),
        GameEvent::Ticked { time_left } => match time_left {
            20 | 10 | 5 | 3 | 2 | 1 => format!("{time_left}s left"),
            _ => return None,
        },
        GameEvent::Answered {
            correct: true,
            points,
            score,
            streak,
            ..
        } => format!("Correct! +{points} (score {score}, streak {streak})"),
        GameEvent::Answered {
            correct: false,
            lives,
            ..
        } => format!("Wrong! {lives} lives left"),
        GameEvent::LevelChanged { from, to } => format!("Level up! {from} -> {to}"),
        GameEvent::AchievementUnlocked(achievement) => {
            format!("Achievement unlocked: {} - {}", achievement.title(), achievement.description())
        }
        GameEvent::PowerUpUsed { kind, remaining } => format!("Used {kind} ({remaining} left)"),
        GameEvent::Paused => "Paused. Press p to resume.".to_string(),
        GameEvent::Resumed => "Resumed.".to_string(),
        GameEvent::Ended { cause, score } => {
            format!("Game over ({cause}). Final score: {score}. Press n to play again.")
        }
        GameEvent::HighScoreBeaten { previous, new } => {
            format!("New high score: {new} (was {previous})")
        }
        GameEvent::Reset => "Ready. Press n to start.".to_string(),
    };
    Some(line)
}

/// Renders a status snapshot.
pub fn describe_state(state: &SessionState) -> String {
    let power_ups = state.power_ups();
    format!(
        "[{}] score {} | high {} | lives {} | streak {} | {}s left\n\
         level {} ({:.0} XP) | accuracy {}% | games {} | best streak {}\n\
         power-ups: extra time {}, double points {}, skip {} | achievements {}/6",
        state.phase(),
        state.score(),
        state.high_score(),
        state.lives(),
        state.streak(),
        state.time_left(),
        state.current_level(),
        state.xp(),
        state.accuracy(),
        state.games_played(),
        state.best_streak(),
        power_ups.remaining(PowerUpKind::ExtraTime),
        power_ups.remaining(PowerUpKind::DoublePoints),
        power_ups.remaining(PowerUpKind::SkipQuestion),
        state.unlocked_achievements().len(),
    )
}
