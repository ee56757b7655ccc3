// Template Renderer: turns one generated letter body into the three fixed layouts.
// Rendering is pure string formatting; the date is passed in, never read here.

pub mod address;
pub mod layouts;

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::application::ApplicationRecord;

/// Date format used in every letter, e.g. `19 October 2026`.
pub const LETTER_DATE_FORMAT: &str = "%d %B %Y";

/// The fixed letter layouts, in display order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemplateStyle {
    #[default]
    Minimal,
    Formal,
    Modern,
}

impl TemplateStyle {
    pub const ALL: [TemplateStyle; 3] = [
        TemplateStyle::Minimal,
        TemplateStyle::Formal,
        TemplateStyle::Modern,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TemplateStyle::Minimal => "Minimal",
            TemplateStyle::Formal => "Formal",
            TemplateStyle::Modern => "Modern",
        }
    }

    /// Renders `body` for `record` in this layout.
    pub fn render(&self, body: &str, record: &ApplicationRecord, date: NaiveDate) -> String {
        let date = format_letter_date(date);
        match self {
            TemplateStyle::Minimal => layouts::render_minimal(body, record, &date),
            TemplateStyle::Formal => layouts::render_formal(body, record, &date),
            TemplateStyle::Modern => layouts::render_modern(body, record, &date),
        }
    }
}

impl fmt::Display for TemplateStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One formatted letter, as shown in a result panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedLetter {
    pub style: TemplateStyle,
    /// Panel header, e.g. `"Formal Template"`.
    pub title: String,
    pub text: String,
}

pub fn format_letter_date(date: NaiveDate) -> String {
    date.format(LETTER_DATE_FORMAT).to_string()
}

/// Renders every style in `TemplateStyle::ALL` order.
pub fn render_all(body: &str, record: &ApplicationRecord, date: NaiveDate) -> Vec<RenderedLetter> {
    TemplateStyle::ALL
        .iter()
        .map(|style| RenderedLetter {
            style: *style,
            title: format!("{style} Template"),
            text: style.render(body, record, date),
        })
        .collect()
}
