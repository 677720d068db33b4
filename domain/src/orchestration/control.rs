//! Control words that end a turn without consulting the model.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlWord {
    Stop,
    Cancel,
    Reset,
}

impl ControlWord {
    /// Recognise a control word. Surrounding whitespace, case and trailing
    /// punctuation are ignored; anything longer is a normal message.
    pub fn parse(input: &str) -> Option<Self> {
        let word = input
            .trim()
            .trim_end_matches(['.', '!', '?'])
            .trim()
            .to_uppercase();
        match word.as_str() {
            "STOP" => Some(ControlWord::Stop),
            "CANCEL" => Some(ControlWord::Cancel),
            "RESET" => Some(ControlWord::Reset),
            _ => None,
        }
    }

    /// Fixed reply for the word.
    pub fn acknowledgement(&self) -> &'static str {
        match self {
            ControlWord::Stop => "Okay, stopping.",
            ControlWord::Cancel => "Okay, cancelled.",
            ControlWord::Reset => "Okay, starting fresh.",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlWord::Stop => "STOP",
            ControlWord::Cancel => "CANCEL",
            ControlWord::Reset => "RESET",
        }
    }
}

impl fmt::Display for ControlWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
