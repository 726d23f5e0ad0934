use crossterm::style::Stylize;

use crate::ui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Success,
    Error,
    Warning,
    Arrow,
    Upload,
    Delete,
    Cdn,
}

impl Icon {
    pub fn render(&self, supports_unicode: bool) -> &'static str {
        match (supports_unicode, self) {
            (true, Icon::Success) => theme::icons::SUCCESS,
            (true, Icon::Error) => theme::icons::ERROR,
            (true, Icon::Warning) => theme::icons::WARNING,
            (true, Icon::Arrow) => theme::icons::ARROW,
            (true, Icon::Upload) => theme::icons::UPLOAD,
            (true, Icon::Delete) => theme::icons::DELETE,
            (true, Icon::Cdn) => theme::icons::CDN,
            (false, Icon::Success) => theme::icons_ascii::SUCCESS,
            (false, Icon::Error) => theme::icons_ascii::ERROR,
            (false, Icon::Warning) => theme::icons_ascii::WARNING,
            (false, Icon::Arrow) => theme::icons_ascii::ARROW,
            (false, Icon::Upload) => theme::icons_ascii::UPLOAD,
            (false, Icon::Delete) => theme::icons_ascii::DELETE,
            (false, Icon::Cdn) => theme::icons_ascii::CDN,
        }
    }

    pub fn colored(&self, supports_color: bool, supports_unicode: bool) -> String {
        let s = self.render(supports_unicode);
        if !supports_color {
            return s.to_string();
        }
        let color = match self {
            Icon::Success | Icon::Upload => theme::colors::SUCCESS,
            Icon::Error => theme::colors::ERROR,
            Icon::Warning | Icon::Delete => theme::colors::WARNING,
            Icon::Arrow => theme::colors::DIM,
            Icon::Cdn => theme::colors::INFO,
        };
        format!("{}", s.with(color))
    }
}
