use console::{style, Term};
use folioapp::error::{FolioError, Result};
use folioapp::resolve::Prompter;

/// Numbered-list picker on the terminal. Choices go to stderr so stdout
/// stays clean for the command's output.
pub struct TermPrompter {
    term: Term,
}

impl TermPrompter {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Prompter for TermPrompter {
    fn prompt(&self, message: &str, choices: &[String]) -> Result<String> {
        if !self.term.is_term() {
            return Err(FolioError::Prompt(
                "no identifier given and no terminal to ask on".to_string(),
            ));
        }

        self.term.write_line(&style(message).bold().to_string())?;
        for (i, choice) in choices.iter().enumerate() {
            self.term
                .write_line(&format!("  {} {}", style(i + 1).cyan(), choice))?;
        }
        self.term.write_str("> ")?;

        let answer = self.term.read_line()?;
        pick(choices, &answer)
    }
}

/// Maps a 1-based answer onto `choices`.
fn pick(choices: &[String], answer: &str) -> Result<String> {
    answer
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| choices.get(i))
        .cloned()
        .ok_or_else(|| FolioError::Prompt(format!("invalid choice: {}", answer.trim())))
}
