use anyhow::{Context, Result, anyhow};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::action::PickerAction;
use crate::core::{Direction, PickerLayout, Settings};

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const CMD = 1 << 0;
        const SHIFT = 1 << 1;
        const ALT = 1 << 2;
        const CTRL = 1 << 3;
    }
}

impl FromStr for Modifiers {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut modifiers = Modifiers::empty();
        for m in s.split('+').map(str::trim) {
            modifiers |= match m {
                "cmd" => Modifiers::CMD,
                "shift" => Modifiers::SHIFT,
                "alt" | "option" => Modifiers::ALT,
                "ctrl" | "control" => Modifiers::CTRL,
                _ => return Err(anyhow!("Unknown modifier: {}", m)),
            };
        }
        Ok(modifiers)
    }
}

fn default_snap_modifiers() -> Modifiers {
    Modifiers::CTRL | Modifiers::ALT
}

fn deserialize_modifiers<'de, D>(deserializer: D) -> Result<Modifiers, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

fn default_picker_keymaps() -> HashMap<String, PickerAction> {
    let mut keymaps = HashMap::new();
    for direction in [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ] {
        keymaps.insert(direction.to_string(), PickerAction::Focus(direction));
    }
    keymaps.insert("return".into(), PickerAction::Select);
    keymaps.insert("enter".into(), PickerAction::Select);
    keymaps.insert("escape".into(), PickerAction::Cancel);
    keymaps
}

fn deserialize_picker_keymaps<'de, D>(
    deserializer: D,
) -> Result<HashMap<String, PickerAction>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<String, String>::deserialize(deserializer)?;
    let mut keymaps = HashMap::new();
    for (key, action_str) in raw {
        let action = action_str
            .parse::<PickerAction>()
            .map_err(serde::de::Error::custom)?;
        keymaps.insert(key, action);
    }
    Ok(keymaps)
}

fn default_inset() -> f32 {
    20.0
}

fn default_spacing() -> f32 {
    30.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct PickerConfig {
    #[serde(default = "default_inset")]
    pub inset: f32,
    #[serde(default = "default_spacing")]
    pub spacing: f32,
    #[serde(
        default = "default_picker_keymaps",
        deserialize_with = "deserialize_picker_keymaps"
    )]
    keymaps: HashMap<String, PickerAction>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            inset: default_inset(),
            spacing: default_spacing(),
            keymaps: default_picker_keymaps(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(
        default = "default_snap_modifiers",
        deserialize_with = "deserialize_modifiers"
    )]
    pub snap_modifiers: Modifiers,
    /// Also suggest minimized windows
    #[serde(default)]
    pub include_minimized: bool,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub picker: PickerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            snap_modifiers: default_snap_modifiers(),
            include_minimized: false,
            log_level: None,
            picker: PickerConfig::default(),
        }
    }
}

impl Config {
    pub fn default_path() -> String {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        Path::new(&home)
            .join(".config")
            .join("splitter")
            .join("config.toml")
            .to_string_lossy()
            .into_owned()
    }

    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn picker_action(&self, key: &str) -> Option<PickerAction> {
        self.picker.keymaps.get(key).copied()
    }

    pub fn session_settings(&self) -> Settings {
        Settings {
            snap_modifiers: self.snap_modifiers,
            include_minimized: self.include_minimized,
            layout: PickerLayout {
                inset: self.picker.inset,
                spacing: self.picker.spacing,
            },
            picker_keymaps: self.picker.keymaps.clone(),
        }
    }
}

/// Reload the config whenever the file changes. The parent directory is watched as editors
/// usually replace the file instead of writing to it. A config that fails to parse is logged and
/// skipped, keeping the current one.
pub fn start_config_watcher<F>(path: &str, on_change: F) -> Result<RecommendedWatcher>
where
    F: Fn(Config) + Send + 'static,
{
    let file = PathBuf::from(path);
    let dir = file
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("no parent dir for {path}"))?;
    let config_path = path.to_string();

    let mut watcher = notify::recommended_watcher({
        let file = file.clone();
        move |res: notify::Result<notify::Event>| match res {
            Ok(event) => {
                let touches_config = event.paths.iter().any(|p| p.ends_with(&file));
                if !touches_config || !(event.kind.is_modify() || event.kind.is_create()) {
                    return;
                }
                match Config::load(&config_path) {
                    Ok(config) => {
                        tracing::info!("Config reloaded successfully");
                        on_change(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to reload config: {e:#}, keeping current config")
                    }
                }
            }
            Err(e) => tracing::warn!("Config watcher error: {e}"),
        }
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;

    tracing::info!(path, "Config watcher started");
    Ok(watcher)
}
