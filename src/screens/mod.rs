pub mod builtin;
pub mod config;

pub use config::{ConfigError, FieldConfig, FieldKind, ScreenConfig};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenKind {
    Login,
    Signup,
    Forgot,
    Verify,
    Reset,
}

impl ScreenKind {
    pub const ALL: [ScreenKind; 5] = [
        ScreenKind::Login,
        ScreenKind::Signup,
        ScreenKind::Forgot,
        ScreenKind::Verify,
        ScreenKind::Reset,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Forgot => "forgot",
            Self::Verify => "verify",
            Self::Reset => "reset",
        }
    }

    pub fn config(self) -> ScreenConfig {
        builtin::screen_config(self)
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScreenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown screen: {s}"))
    }
}
