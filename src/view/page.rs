//! Visit page view model

use askama::Template;

/// Background of the label block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Green,
    Red,
}

impl Color {
    pub fn as_str(self) -> &'static str {
        match self {
            Color::Green => "green",
            Color::Red => "red",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// View model for the visit counter page
#[derive(Debug, Clone, Template)]
#[template(path = "visits.html")]
pub struct VisitView {
    pub visits: i64,
    pub is_even: bool,
    pub flag_on: bool,
    pub color: Color,
    pub label: &'static str,
    pub flag_name: String,
    pub flag_text: &'static str,
}

impl VisitView {
    /// Derive colour and label: green/PAR only when the count is even
    /// and the flag is on, red/IMPAR otherwise.
    pub fn new(visits: i64, flag_on: bool, flag_name: impl Into<String>) -> Self {
        let is_even = visits % 2 == 0;
        let highlight = is_even && flag_on;

        Self {
            visits,
            is_even,
            flag_on,
            color: if highlight { Color::Green } else { Color::Red },
            label: if highlight { "PAR" } else { "IMPAR" },
            flag_name: flag_name.into(),
            flag_text: if flag_on { "ON" } else { "OFF" },
        }
    }
}
