use std::{
    fmt::Display,
    sync::{LazyLock, RwLock},
};

use nu_ansi_term::Color;

pub static COLOR: LazyLock<RwLock<bool>> = LazyLock::new(|| RwLock::new(true));

pub fn color_enabled() -> bool {
    match COLOR.read() {
        Ok(color) => *color,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

pub fn set_color(enabled: bool) {
    match COLOR.write() {
        Ok(mut color) => *color = enabled,
        Err(poisoned) => *poisoned.into_inner() = enabled,
    }
}

pub struct Colored<T: Display>(pub Color, pub T);

impl<T: Display> Display for Colored<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if color_enabled() {
            write!(f, "{}", self.0.prefix())?;
            self.1.fmt(f)?;
            write!(f, "{}", self.0.suffix())
        } else {
            self.1.fmt(f)
        }
    }
}

/// `n thing` or `n things`.
pub fn pluralize(count: usize, singular: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {singular}s")
    }
}

#[cfg(test)]
mod tests {
    use nu_ansi_term::Color::Red;

    use super::*;

    #[test]
    fn test_colored_respects_switch() {
        set_color(false);
        assert_eq!(Colored(Red, "x").to_string(), "x");

        set_color(true);
        let colored = Colored(Red, "x").to_string();
        assert!(colored.contains('x'));
        assert_ne!(colored, "x");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1, "statement"), "1 statement");
        assert_eq!(pluralize(3, "statement"), "3 statements");
        assert_eq!(pluralize(0, "error"), "0 errors");
    }
}
