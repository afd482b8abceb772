use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level screen. Closed set; there is no way to hold anything else.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Chat,
    Documents,
    Settings,
    Analytics,
}

impl View {
    pub const ALL: [View; 4] = [View::Chat, View::Documents, View::Settings, View::Analytics];

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Chat => "chat",
            View::Documents => "documents",
            View::Settings => "settings",
            View::Analytics => "analytics",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown view: {0}")]
pub struct UnknownView(pub String);

impl FromStr for View {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        View::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownView(s.to_string()))
    }
}
