use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Identifies one feature-area panel driven by an operation catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelId {
    Technical,
    OnPage,
    OffPage,
    Local,
    Agents,
    Phases,
    Orchestration,
}

impl PanelId {
    /// Every panel, in display order.
    pub const ALL: [PanelId; 7] = [
        PanelId::Orchestration,
        PanelId::Agents,
        PanelId::Phases,
        PanelId::Technical,
        PanelId::OnPage,
        PanelId::Local,
        PanelId::OffPage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::OnPage => "on_page",
            Self::OffPage => "off_page",
            Self::Local => "local",
            Self::Agents => "agents",
            Self::Phases => "phases",
            Self::Orchestration => "orchestration",
        }
    }

    /// Whether the catalog for this panel is compiled in, as opposed to being
    /// synthesized from backend data at runtime.
    pub fn is_static(&self) -> bool {
        !matches!(self, Self::Agents)
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelId {
    type Err = ParsePanelIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let normalized = normalized.strip_suffix("_seo").unwrap_or(&normalized);
        match normalized {
            "technical" => Ok(Self::Technical),
            "on_page" | "onpage" => Ok(Self::OnPage),
            "off_page" | "offpage" => Ok(Self::OffPage),
            "local" => Ok(Self::Local),
            "agents" => Ok(Self::Agents),
            "phases" => Ok(Self::Phases),
            "orchestration" => Ok(Self::Orchestration),
            _ => Err(ParsePanelIdError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePanelIdError(pub String);

impl fmt::Display for ParsePanelIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid panel '{}'; expected one of technical, on_page, off_page, local, agents, phases, orchestration",
            self.0
        )
    }
}

impl Error for ParsePanelIdError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("technical-seo".parse::<PanelId>(), Ok(PanelId::Technical));
        assert_eq!("On-Page".parse::<PanelId>(), Ok(PanelId::OnPage));
        assert_eq!("offpage".parse::<PanelId>(), Ok(PanelId::OffPage));
        assert_eq!("local_seo".parse::<PanelId>(), Ok(PanelId::Local));
        assert!("dashboard".parse::<PanelId>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for panel in PanelId::ALL {
            assert_eq!(panel.to_string().parse::<PanelId>(), Ok(panel));
        }
    }
}
