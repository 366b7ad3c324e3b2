use anyhow::{Result, anyhow};
use std::str::FromStr;

use crate::core::Direction;

/// What a key does while the picker is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickerAction {
    Focus(Direction),
    Select,
    Cancel,
}

impl std::fmt::Display for PickerAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PickerAction::Focus(direction) => write!(f, "focus {direction}"),
            PickerAction::Select => write!(f, "select"),
            PickerAction::Cancel => write!(f, "cancel"),
        }
    }
}

impl FromStr for PickerAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        match parts.as_slice() {
            ["focus", direction] => Ok(PickerAction::Focus(direction.parse()?)),
            ["select"] => Ok(PickerAction::Select),
            ["cancel"] => Ok(PickerAction::Cancel),
            _ => Err(anyhow!("Unknown picker action: {}", s)),
        }
    }
}
