use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Styles for CLI output. Salaries get their own styles so a disclosed range
/// stands out from the "не указана" placeholder.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub info: Style,
    pub dim: Style,
    pub muted: Style,
    pub company: Style,
    pub vacancy: Style,
    pub salary: Style,
    pub salary_unspecified: Style,
    pub link: Style,
}

impl Theme {
    /// Colours only when stdout is a terminal
    pub fn for_terminal(is_term: bool) -> Self {
        if !is_term {
            return Self::default();
        }
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            info: Style::new().magenta(),
            dim: Style::new().white().dimmed(),
            muted: Style::new().bright_black(),
            company: Style::new().blue().bold(),
            vacancy: Style::new().bold(),
            salary: Style::new().green(),
            salary_unspecified: Style::new().bright_black().italic(),
            link: Style::new().cyan().underline(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(|| Theme::for_terminal(console::Term::stdout().is_term()))
}
