//! REPL (Read-Eval-Print Loop) for interactive chat
//!
//! The REPL owns the conversation history. Each turn hands the history to
//! [`RespondUseCase`] by reference and records the exchange afterwards.

use crate::ConsoleFormatter;
use crate::ProgressReporter;
use colored::Colorize;
use naomi_application::{NoTurnProgress, RespondInput, RespondOutput, RespondUseCase};
use naomi_domain::{ControlWord, ConversationTurn};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use tracing::debug;

/// What a slash command asks the loop to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandOutcome {
    Continue,
    Quit,
}

/// Interactive chat REPL
pub struct ChatRepl {
    use_case: RespondUseCase,
    name: String,
    model: String,
    history: Vec<ConversationTurn>,
    show_progress: bool,
    show_tools: bool,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(use_case: RespondUseCase, name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            use_case,
            name: name.into(),
            model: model.into(),
            history: Vec::new(),
            show_progress: true,
            show_tools: false,
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Set whether to list executed tools under each reply
    pub fn with_tool_output(mut self, show: bool) -> Self {
        self.show_tools = show;
        self
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    fn history_path() -> Option<PathBuf> {
        dirs::data_dir().map(|p| p.join("naomi").join("history.txt"))
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = Self::history_path();
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline("you> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line) == CommandOutcome::Quit {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);
                    self.process_message(line).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│{:^45}│", format!("{} - Chat Mode", self.name));
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Model: {}", self.model);
        println!("Say STOP, CANCEL or RESET at any time.");
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?    - Show this help");
        println!("  /history         - Show the conversation so far");
        println!("  /clear           - Forget the conversation");
        println!("  /quit, /exit, /q - Exit chat");
        println!();
    }

    /// Handle slash commands.
    fn handle_command(&mut self, cmd: &str) -> CommandOutcome {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                CommandOutcome::Quit
            }
            "/help" | "/h" | "/?" => {
                println!();
                Self::print_help();
                CommandOutcome::Continue
            }
            "/history" => {
                println!();
                println!("{}", ConsoleFormatter::format_history(&self.name, &self.history));
                println!();
                CommandOutcome::Continue
            }
            "/clear" => {
                self.history.clear();
                println!("{}", "Conversation cleared.".dimmed());
                CommandOutcome::Continue
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                CommandOutcome::Continue
            }
        }
    }

    async fn process_message(&mut self, message: &str) {
        println!();
        debug!(history = self.history.len(), "Chat turn");

        let input = RespondInput::new(message, &self.history);
        let output = if self.show_progress {
            let progress = ProgressReporter::new();
            self.use_case.execute(input, &progress).await
        } else {
            self.use_case.execute(input, &NoTurnProgress).await
        };

        let rendered = if self.show_tools {
            ConsoleFormatter::format_full(&self.name, &output)
        } else {
            ConsoleFormatter::format_reply(&self.name, &output)
        };
        println!("{}", rendered);
        println!();

        self.record(message, &output);
    }

    /// Update history after a turn.
    ///
    /// `RESET` wipes it; other control words leave it untouched.
    fn record(&mut self, message: &str, output: &RespondOutput) {
        match output.control {
            Some(ControlWord::Reset) => self.history.clear(),
            Some(_) => {}
            None => {
                self.history.push(ConversationTurn::user(message));
                self.history.push(ConversationTurn::assistant(output.reply.clone()));
            }
        }
    }
}
