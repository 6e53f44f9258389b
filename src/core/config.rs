use crate::binding::ButtonBinding;
use crate::binding::KeyBinding;
use crate::common::Color;

use std::env;
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use x11rb::protocol::xproto::ModMask;

/// Everything a reload may replace. The event loop never mutates a
/// configuration in place; a reload builds a new record and swaps it in
/// whole.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub general: GeneralConfiguration,
    pub tiling: TilingConfiguration,
    pub font: FontConfiguration,
    pub border: BorderConfiguration,
    pub gaps: GapsConfiguration,
    pub notification: NotificationConfiguration,
    pub mouse: MouseConfiguration,
    pub keyboard: KeyboardConfiguration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfiguration {
    pub overlap_percentage: u32,
}

impl Default for GeneralConfiguration {
    fn default() -> Self {
        Self {
            overlap_percentage: 80,
        }
    }
}

/// Fill empty frames but never automatically remove them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilingConfiguration {
    pub auto_remove_void: bool,
    pub auto_fill_void: bool,
}

impl Default for TilingConfiguration {
    fn default() -> Self {
        Self {
            auto_remove_void: false,
            auto_fill_void: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfiguration {
    pub name: String,
}

impl Default for FontConfiguration {
    fn default() -> Self {
        Self {
            name: "Mono".to_owned(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderConfiguration {
    pub size: u32,
}

/// Insets as (left, top, right, bottom) pixel quads.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapsConfiguration {
    pub inner: [i32; 4],
    pub outer: [i32; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfiguration {
    pub duration: u32,
    pub padding: u32,
    pub border_color: Color,
    pub border_size: u32,
    pub foreground: Color,
    pub background: Color,
}

impl Default for NotificationConfiguration {
    fn default() -> Self {
        Self {
            duration: 2,
            padding: 6,
            border_color: 0x000000,
            border_size: 1,
            foreground: 0x000000,
            background: 0xffffff,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MouseConfiguration {
    pub resize_tolerance: i32,
    pub modifiers: u16,
    pub ignore_modifiers: u16,
    pub buttons: Vec<ButtonBinding>,
}

impl Default for MouseConfiguration {
    fn default() -> Self {
        Self {
            resize_tolerance: 8,
            modifiers: u16::from(ModMask::M4),
            ignore_modifiers: u16::from(
                ModMask::LOCK | ModMask::M2 | ModMask::M3 | ModMask::M5,
            ),
            buttons: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyboardConfiguration {
    pub modifiers: u16,
    pub ignore_modifiers: u16,
    pub keys: Vec<KeyBinding>,
}

impl Default for KeyboardConfiguration {
    fn default() -> Self {
        Self {
            modifiers: u16::from(ModMask::M4),
            ignore_modifiers: u16::from(
                ModMask::LOCK | ModMask::M2 | ModMask::M3 | ModMask::M5,
            ),
            keys: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Unreadable(std::io::Error),
    Malformed(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Unreadable(err) => write!(f, "unable to read configuration: {}", err),
            Self::Malformed(err) => write!(f, "malformed configuration: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Configuration {
    /// Parse a user configuration file. The caller merges the default
    /// bindings afterwards; a parse failure leaves the previous
    /// configuration in force.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(ConfigError::Unreadable)?;

        toml::from_str(&content).map_err(ConfigError::Malformed)
    }

    pub fn default_path() -> Option<PathBuf> {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
            .map(|config| config.join("fensterchef").join("fensterchef.toml"))
    }
}
