/// Semantic colors used for terminal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Header,
    OkBlue,
    OkGreen,
    Subtext,
    Info,
    Warning,
    Fail,
    Reset,
}

impl Color {
    pub const fn code(self) -> &'static str {
        match self {
            Color::Header => "\x1b[95m",
            Color::OkBlue => "\x1b[94m",
            Color::OkGreen => "\x1b[92m",
            Color::Subtext => "\x1b[90m",
            Color::Info => "\x1b[96m",
            Color::Warning => "\x1b[93m",
            Color::Fail => "\x1b[91m",
            Color::Reset => "\x1b[0m",
        }
    }
}

/// Resolves colors to escape sequences, or to nothing when color is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Default for Palette {
    fn default() -> Self {
        Self::colored()
    }
}

impl Palette {
    pub const fn colored() -> Self {
        Self { enabled: true }
    }

    pub const fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get(&self, color: Color) -> &'static str {
        if self.enabled {
            color.code()
        } else {
            ""
        }
    }

    /// Wraps `text` in `color` followed by a reset.
    pub fn paint(&self, color: Color, text: &str) -> String {
        if !self.enabled {
            return text.to_string();
        }
        format!("{}{}{}", color.code(), text, Color::Reset.code())
    }
}
