use super::session::Command;
use super::ui::{self, StyleType};
use crate::core::config::FormDefaults;
use crate::core::{ConversionRequest, conversion::parse_amount, fallback};
use anyhow::{Context, Result, bail};
use console::{Key, Term};

/// Collects what to convert. Blocks until the user submits.
pub trait FormController: Send {
    fn collect(&mut self, defaults: &FormDefaults) -> Result<ConversionRequest>;
}

/// Reads result-screen commands. `None` means input is closed.
pub trait KeySource: Send {
    fn next_command(&mut self) -> Option<Command>;
}

#[derive(Debug, PartialEq, Eq)]
enum PickerAction {
    Moved,
    Selected,
    Cancelled,
    Ignored,
}

/// Single-select list with a cursor.
struct Picker {
    options: Vec<&'static str>,
    cursor: usize,
}

impl Picker {
    fn new(options: Vec<&'static str>, default: &str) -> Self {
        let cursor = options.iter().position(|o| *o == default).unwrap_or(0);
        Self { options, cursor }
    }

    fn on_key(&mut self, key: &Key) -> PickerAction {
        match key {
            Key::ArrowUp | Key::Char('k') => {
                self.cursor = self.cursor.checked_sub(1).unwrap_or(self.options.len() - 1);
                PickerAction::Moved
            }
            Key::ArrowDown | Key::Char('j') | Key::Tab => {
                self.cursor = (self.cursor + 1) % self.options.len();
                PickerAction::Moved
            }
            Key::Enter => PickerAction::Selected,
            Key::Escape | Key::CtrlC => PickerAction::Cancelled,
            _ => PickerAction::Ignored,
        }
    }

    fn selected(&self) -> &'static str {
        self.options[self.cursor]
    }

    fn lines(&self) -> Vec<String> {
        self.options
            .iter()
            .enumerate()
            .map(|(i, code)| {
                let label = format!("{code}  {}", fallback::display_name(code).unwrap_or(""));
                if i == self.cursor {
                    format!("> {}", ui::style_text(&label, StyleType::Selected))
                } else {
                    format!("  {label}")
                }
            })
            .collect()
    }
}

fn key_command(key: &Key) -> Option<Command> {
    match key {
        Key::Char('r') | Key::Char('R') => Some(Command::Restart),
        Key::Char('q') | Key::Char('Q') | Key::Escape | Key::CtrlC => Some(Command::Quit),
        _ => None,
    }
}

/// Form and key input on the attached terminal.
pub struct ConsoleInput {
    term: Term,
}

impl ConsoleInput {
    pub fn new() -> Self {
        Self { term: Term::stdout() }
    }

    fn read_amount(&self, default: &str) -> Result<String> {
        loop {
            self.term.write_str("Amount: ")?;
            let text = self.term.read_line_initial_text(default)?;
            match parse_amount(&text) {
                Ok(_) => return Ok(text.trim().to_string()),
                Err(e) => self
                    .term
                    .write_line(&ui::style_text(&e.to_string(), StyleType::Error))?,
            }
        }
    }

    fn pick(&self, title: &str, default: &str) -> Result<&'static str> {
        let mut picker = Picker::new(fallback::codes().collect(), default);
        self.term.write_line(&ui::style_text(title, StyleType::Result))?;
        self.term.hide_cursor()?;

        let result = (|| -> Result<&'static str> {
            let mut drawn = 0;
            loop {
                self.term.clear_last_lines(drawn)?;
                let lines = picker.lines();
                for line in &lines {
                    self.term.write_line(line)?;
                }
                drawn = lines.len();

                let key = self.term.read_key()?;
                match picker.on_key(&key) {
                    PickerAction::Selected => {
                        self.term.clear_last_lines(drawn)?;
                        self.term.write_line(&format!("  {}", picker.selected()))?;
                        return Ok(picker.selected());
                    }
                    PickerAction::Cancelled => bail!("form cancelled"),
                    PickerAction::Moved | PickerAction::Ignored => {}
                }
            }
        })();

        self.term.show_cursor()?;
        result
    }
}

impl Default for ConsoleInput {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController for ConsoleInput {
    fn collect(&mut self, defaults: &FormDefaults) -> Result<ConversionRequest> {
        self.term.clear_screen()?;
        self.term.write_line(&format!("\n{}\n", ui::title()))?;

        let amount = self.read_amount(&defaults.amount)?;
        let from = self.pick("From Currency", &defaults.from)?;
        let to = self.pick("To Currency", &defaults.to)?;

        ConversionRequest::parse(&amount, from, to).context("invalid form input")
    }
}

impl KeySource for ConsoleInput {
    fn next_command(&mut self) -> Option<Command> {
        loop {
            match self.term.read_key() {
                Ok(key) => {
                    if let Some(command) = key_command(&key) {
                        return Some(command);
                    }
                }
                Err(_) => return None,
            }
        }
    }
}
