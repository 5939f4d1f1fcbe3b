use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two spreadsheets produced by one processing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// The extracted data tables (`output_tables.xlsx`).
    Tables,
    /// The fertilization plan (`Plan_de_fertilizare.xlsx`).
    Plan,
}

impl ArtifactKind {
    /// Path segment used by the download route.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Tables => "tables",
            ArtifactKind::Plan => "plan",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tables" => Ok(ArtifactKind::Tables),
            "plan" => Ok(ArtifactKind::Plan),
            other => Err(format!("Unknown artifact '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_route_segments() {
        assert_eq!("tables".parse::<ArtifactKind>(), Ok(ArtifactKind::Tables));
        assert_eq!("plan".parse::<ArtifactKind>(), Ok(ArtifactKind::Plan));
        assert!("output".parse::<ArtifactKind>().is_err());
    }
}
