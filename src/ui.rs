// 🖥️ Terminal operator - arrow-key merge picker
//
// The merge prompt is drawn as a ratatui list in an inline viewport just
// below the cursor; free-text prompts stay plain stdin lines.

use crate::operator::{Operator, StdioOperator};
use anyhow::{bail, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    backend::CrosstermBackend,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame, Terminal, TerminalOptions, Viewport,
};
use std::io::{self, Stdout, StdinLock};

/// Outcome of one key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerAction {
    Continue,
    Selected(usize),
    Aborted,
}

/// Selection state of the merge picker
pub struct Picker<'a> {
    pub prompt: &'a str,
    pub choices: &'a [String],
    pub state: ListState,
}

impl<'a> Picker<'a> {
    pub fn new(prompt: &'a str, choices: &'a [String]) -> Self {
        Picker {
            prompt,
            choices,
            state: ListState::default().with_selected(Some(0)),
        }
    }

    pub fn selected(&self) -> usize {
        self.state.selected().unwrap_or(0)
    }

    pub fn next(&mut self) {
        let i = (self.selected() + 1) % self.choices.len();
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.choices.len();
        let i = (self.selected() + len - 1) % len;
        self.state.select(Some(i));
    }

    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> PickerAction {
        match code {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => PickerAction::Aborted,
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                self.next();
                PickerAction::Continue
            }
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
                self.previous();
                PickerAction::Continue
            }
            KeyCode::Enter => PickerAction::Selected(self.selected()),
            _ => PickerAction::Continue,
        }
    }
}

fn render_picker(f: &mut Frame, picker: &mut Picker) {
    let items: Vec<ListItem> = picker
        .choices
        .iter()
        .map(|c| ListItem::new(c.as_str()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(picker.prompt)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, f.size(), &mut picker.state);
}

fn run_picker<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    picker: &mut Picker,
) -> Result<usize> {
    loop {
        terminal.draw(|f| render_picker(f, picker))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match picker.handle_key(key.code, key.modifiers) {
                PickerAction::Continue => {}
                PickerAction::Selected(i) => return Ok(i),
                PickerAction::Aborted => bail!("Selection aborted"),
            }
        }
    }
}

/// Operator on a real terminal
pub struct TerminalOperator {
    lines: StdioOperator<StdinLock<'static>, Stdout>,
}

impl TerminalOperator {
    pub fn new() -> Self {
        TerminalOperator {
            lines: StdioOperator::stdio(),
        }
    }
}

impl Default for TerminalOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl Operator for TerminalOperator {
    fn choose(&mut self, prompt: &str, choices: &[String]) -> Result<String> {
        if choices.is_empty() {
            bail!("Nothing to choose from for: {}", prompt);
        }

        // Border rows plus one row per choice
        let height = u16::try_from(choices.len()).unwrap_or(u16::MAX).saturating_add(2);

        enable_raw_mode()?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::with_options(
            backend,
            TerminalOptions {
                viewport: Viewport::Inline(height),
            },
        )?;

        let mut picker = Picker::new(prompt, choices);
        let res = run_picker(&mut terminal, &mut picker);

        // Restore terminal
        disable_raw_mode()?;
        terminal.clear()?;
        terminal.show_cursor()?;

        let index = res?;
        println!("{} {}", prompt, choices[index]);
        Ok(choices[index].clone())
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        self.lines.ask(prompt)
    }

    fn show(&mut self, text: &str) -> Result<()> {
        self.lines.show(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> Vec<String> {
        vec!["Tomaten".to_string(), "Tomatenmark".to_string(), "Do not merge.".to_string()]
    }

    #[test]
    fn test_picker_starts_on_first_choice() {
        let choices = choices();
        let picker = Picker::new("Merge?", &choices);
        assert_eq!(picker.selected(), 0);
    }

    #[test]
    fn test_picker_wraps_around() {
        let choices = choices();
        let mut picker = Picker::new("Merge?", &choices);

        picker.previous();
        assert_eq!(picker.selected(), 2);
        picker.next();
        assert_eq!(picker.selected(), 0);
    }

    #[test]
    fn test_picker_keys() {
        let choices = choices();
        let mut picker = Picker::new("Merge?", &choices);

        assert_eq!(picker.handle_key(KeyCode::Down, KeyModifiers::NONE), PickerAction::Continue);
        assert_eq!(picker.handle_key(KeyCode::Char('j'), KeyModifiers::NONE), PickerAction::Continue);
        assert_eq!(picker.handle_key(KeyCode::Enter, KeyModifiers::NONE), PickerAction::Selected(2));
        assert_eq!(
            picker.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            PickerAction::Aborted
        );
    }
}
