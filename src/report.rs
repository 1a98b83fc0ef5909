/// Structured Reports
///
/// Builders assemble a `Report` from typed sections; text only exists once
/// the report is rendered through `Display`.

use std::fmt;

/// One piece of a report, rendered as one or more lines
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    /// Report title, always the first line
    Title(String),
    /// Section heading, rendered with a trailing colon
    Heading(String),
    /// Free text line
    Line(String),
    /// Bulleted line
    Bullet(String),
    /// Marked entry with indented detail lines
    Item {
        marker: &'static str,
        text: String,
        details: Vec<String>,
    },
    Blank,
}

/// Ordered sequence of sections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    sections: Vec<Section>,
}

impl Report {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            sections: vec![Section::Title(title.into())],
        }
    }

    pub fn heading(&mut self, text: impl Into<String>) -> &mut Self {
        self.sections.push(Section::Heading(text.into()));
        self
    }

    pub fn line(&mut self, text: impl Into<String>) -> &mut Self {
        self.sections.push(Section::Line(text.into()));
        self
    }

    pub fn bullet(&mut self, text: impl Into<String>) -> &mut Self {
        self.sections.push(Section::Bullet(text.into()));
        self
    }

    pub fn item(&mut self, marker: &'static str, text: impl Into<String>, details: Vec<String>) -> &mut Self {
        self.sections.push(Section::Item {
            marker,
            text: text.into(),
            details,
        });
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.sections.push(Section::Blank);
        self
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            match section {
                Section::Title(text) | Section::Line(text) => writeln!(f, "{}", text)?,
                Section::Heading(text) => writeln!(f, "{}:", text)?,
                Section::Bullet(text) => writeln!(f, "• {}", text)?,
                Section::Item { marker, text, details } => {
                    writeln!(f, "{} {}", marker, text)?;
                    for detail in details {
                        writeln!(f, "   {}", detail)?;
                    }
                }
                Section::Blank => writeln!(f)?,
            }
        }
        Ok(())
    }
}

/// Format an integer with comma thousands separators (`78450` -> `78,450`)
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Dollar amount with thousands separators
pub fn currency(value: u64) -> String {
    format!("${}", thousands(value))
}

/// Float as written in the data, keeping one decimal on whole numbers
/// (`42.0` -> `42.0`, `3.25` -> `3.25`)
pub fn decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

pub fn percent(value: f64) -> String {
    format!("{}%", decimal(value))
}

/// Score out of five (`4.6` -> `4.6/5.0`)
pub fn rating(value: f64) -> String {
    format!("{}/5.0", decimal(value))
}
