use std::io::{self, BufRead, Write};

/// Blocking confirmation and notification, the modal half of a command.
pub trait Prompt {
    fn confirm(&mut self, question: &str) -> bool;
    fn notify(&mut self, message: &str);
}

/// Asks on stdin; anything other than `y`/`yes` declines.
pub struct ConsolePrompt;

impl Prompt for ConsolePrompt {
    fn confirm(&mut self, question: &str) -> bool {
        print!("{question} [y/N] ");
        if let Err(err) = io::stdout().flush() {
            tracing::warn!(error = %err, "failed to flush prompt");
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read confirmation; declining");
                false
            }
        }
    }

    fn notify(&mut self, message: &str) {
        println!("{message}");
    }
}

/// Accepts every confirmation, for scripted use (`--yes`).
pub struct AssumeYes;

impl Prompt for AssumeYes {
    fn confirm(&mut self, question: &str) -> bool {
        tracing::info!(question, "confirmation assumed");
        true
    }

    fn notify(&mut self, message: &str) {
        println!("{message}");
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
