use crossterm::event::KeyCode;

const PLACEHOLDER: &str = "AAAA-MM-JJ";

/// Digit-only date entry that lays the digits out as `YYYY-MM-DD`.
#[derive(Debug, Default, Clone)]
pub struct DateInputState {
    digits: String,
}

impl DateInputState {
    pub fn handle_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) if c.is_ascii_digit() && self.digits.len() < 8 => {
                self.digits.push(c);
            }
            KeyCode::Backspace => {
                self.digits.pop();
            }
            _ => {}
        }
    }

    /// The typed value with separators, e.g. `2020-12` after six digits.
    pub fn value(&self) -> String {
        let mut value = String::with_capacity(10);
        for (i, c) in self.digits.chars().enumerate() {
            if i == 4 || i == 6 {
                value.push('-');
            }
            value.push(c);
        }
        value
    }

    /// Text for the form, showing the remaining placeholder while typing.
    pub fn get_display_string(&self, editing: bool) -> String {
        let value = self.value();
        if editing {
            format!("{}{}", value, &PLACEHOLDER[value.len()..])
        } else if value.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            value
        }
    }
}
