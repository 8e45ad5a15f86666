use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;

use crate::error::RelocateError;

/// The prompt/response channel a migration session talks to the user through.
pub trait Console {
    /// Asks a question and returns the trimmed answer. An empty answer is
    /// returned as an empty string, not an error.
    fn ask(&mut self, prompt: &str) -> Result<String, RelocateError>;

    /// Shows a progress or result line to the user.
    fn report(&mut self, message: &str);
}

/// Terminal console backed by dialoguer.
pub struct TerminalConsole {
    theme: ColorfulTheme,
}

impl TerminalConsole {
    pub fn new() -> Self {
        TerminalConsole {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn ask(&mut self, prompt: &str) -> Result<String, RelocateError> {
        let answer: String = Input::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()?;

        Ok(answer.trim().to_owned())
    }

    fn report(&mut self, message: &str) {
        println!("{}", message);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Console double that replays canned answers and records everything
    /// shown to the user.
    #[derive(Default)]
    pub(crate) struct ScriptedConsole {
        answers: VecDeque<String>,
        pub prompts: Vec<String>,
        pub reports: Vec<String>,
    }

    impl ScriptedConsole {
        pub(crate) fn new(answers: &[&str]) -> Self {
            ScriptedConsole {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                ..Default::default()
            }
        }
    }

    impl Console for ScriptedConsole {
        fn ask(&mut self, prompt: &str) -> Result<String, RelocateError> {
            self.prompts.push(prompt.to_owned());
            self.answers
                .pop_front()
                .map(|a| a.trim().to_owned())
                .ok_or_else(|| RelocateError::Error(format!("No scripted answer for: {prompt}")))
        }

        fn report(&mut self, message: &str) {
            self.reports.push(message.to_owned());
        }
    }

    #[test]
    fn test_scripted_console_trims_and_records() {
        let mut console = ScriptedConsole::new(&["  C:/music \n"]);
        assert_eq!(console.ask("old?").unwrap(), "C:/music");
        assert_eq!(console.prompts, vec!["old?".to_owned()]);
        assert!(console.ask("new?").is_err());
    }
}
