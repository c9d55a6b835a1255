//! Navigation key table

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Abstract directional/control input mapped to an Android key code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    Up,
    Down,
    Left,
    Right,
    Select,
    Back,
    Home,
}

impl NavKey {
    pub const ALL: [NavKey; 7] = [
        NavKey::Up,
        NavKey::Down,
        NavKey::Left,
        NavKey::Right,
        NavKey::Select,
        NavKey::Back,
        NavKey::Home,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NavKey::Up => "up",
            NavKey::Down => "down",
            NavKey::Left => "left",
            NavKey::Right => "right",
            NavKey::Select => "select",
            NavKey::Back => "back",
            NavKey::Home => "home",
        }
    }

    pub fn key_code(&self) -> &'static str {
        match self {
            NavKey::Up => "KEYCODE_DPAD_UP",
            NavKey::Down => "KEYCODE_DPAD_DOWN",
            NavKey::Left => "KEYCODE_DPAD_LEFT",
            NavKey::Right => "KEYCODE_DPAD_RIGHT",
            NavKey::Select => "KEYCODE_DPAD_CENTER",
            NavKey::Back => "KEYCODE_BACK",
            NavKey::Home => "KEYCODE_HOME",
        }
    }

    /// Quoted, comma separated list of valid names: `'up', 'down', ...`
    pub fn allowed_values() -> String {
        NavKey::ALL.iter().map(|k| format!("'{}'", k.as_str())).collect::<Vec<_>>().join(", ")
    }
}

impl FromStr for NavKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        NavKey::ALL
            .into_iter()
            .find(|k| k.as_str() == lowered)
            .ok_or_else(|| CoreError::UnknownNavKey(s.to_string()))
    }
}

impl fmt::Display for NavKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("UP".parse::<NavKey>().unwrap(), NavKey::Up);
        assert_eq!("Select".parse::<NavKey>().unwrap(), NavKey::Select);
        assert!("banana".parse::<NavKey>().is_err());
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(NavKey::Up.key_code(), "KEYCODE_DPAD_UP");
        assert_eq!(NavKey::Select.key_code(), "KEYCODE_DPAD_CENTER");
        assert_eq!(NavKey::Back.key_code(), "KEYCODE_BACK");
        assert_eq!(NavKey::Home.key_code(), "KEYCODE_HOME");
    }

    #[test]
    fn test_allowed_values_lists_all_seven() {
        assert_eq!(
            NavKey::allowed_values(),
            "'up', 'down', 'left', 'right', 'select', 'back', 'home'"
        );
    }
}
