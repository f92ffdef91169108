//! Configuration types for the cycle pipelines.
//!
//! The ephemeris engine is driven entirely by data declared here: which
//! input column holds each body's longitude in each reference frame, and the
//! ordered list of derived columns to append. The defaults reproduce the
//! master ephemeris spreadsheet layout and its published column set.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Reference frame of a longitude column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frame {
    Geocentric,
    Heliocentric,
}

impl Frame {
    /// Single-letter prefix used in derived column labels.
    pub fn prefix(self) -> &'static str {
        match self {
            Frame::Geocentric => "G",
            Frame::Heliocentric => "H",
        }
    }

    /// Label for one body in this frame, e.g. `G.Moon`.
    pub fn label(self, body: &str) -> String {
        format!("{}.{}", self.prefix(), body)
    }
}

/// A single-body unwrap column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleColumn {
    pub frame: Frame,
    pub body: String,
}

impl SingleColumn {
    /// Column label written into the output header, e.g. `H.Mercury`.
    pub fn label(&self) -> String {
        self.frame.label(&self.body)
    }
}

/// A two-body synodic combination column.
///
/// The faster/slower ordering is the caller's labelling convention; it is not
/// validated against real orbital periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairColumn {
    pub frame: Frame,
    pub faster: String,
    pub slower: String,
}

impl PairColumn {
    /// Column label written into the output header, e.g. `G.Moon/G.Mercury`.
    pub fn label(&self) -> String {
        format!(
            "{}/{}",
            self.frame.label(&self.faster),
            self.frame.label(&self.slower)
        )
    }
}

/// Configuration for the ephemeris derived-column engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EphemerisConfig {
    /// Input column index of each body's geocentric longitude. Cell values
    /// in these columns are in [0, 360).
    #[serde(default = "default_geocentric_columns")]
    pub geocentric_columns: HashMap<String, usize>,

    /// Input column index of each body's heliocentric longitude. Cell values
    /// in these columns are in [0, 360).
    #[serde(default = "default_heliocentric_columns")]
    pub heliocentric_columns: HashMap<String, usize>,

    /// Single-body unwrap columns to append, in output order.
    #[serde(default = "default_single_columns")]
    pub singles: Vec<SingleColumn>,

    /// Two-body combination columns to append, after the singles.
    #[serde(default = "default_pair_columns")]
    pub pairs: Vec<PairColumn>,
}

impl EphemerisConfig {
    /// Looks up the input column index for a body in the given frame.
    pub fn column_for(&self, frame: Frame, body: &str) -> Option<usize> {
        let map = match frame {
            Frame::Geocentric => &self.geocentric_columns,
            Frame::Heliocentric => &self.heliocentric_columns,
        };
        map.get(body).copied()
    }

    /// Total number of derived columns this configuration will append.
    pub fn num_derived_columns(&self) -> usize {
        self.singles.len() + self.pairs.len()
    }
}

impl Default for EphemerisConfig {
    fn default() -> Self {
        Self {
            geocentric_columns: default_geocentric_columns(),
            heliocentric_columns: default_heliocentric_columns(),
            singles: default_single_columns(),
            pairs: default_pair_columns(),
        }
    }
}

fn default_geocentric_columns() -> HashMap<String, usize> {
    let entries: &[(&str, usize)] = &[
        ("Sun", 18),
        ("Moon", 19),
        ("Mercury", 20),
        ("Venus", 21),
        ("Mars", 22),
        ("Jupiter", 23),
        ("Saturn", 24),
        ("Uranus", 25),
        ("Neptune", 26),
        ("Pluto", 27),
        ("TrueNorthNode", 28),
        ("Chiron", 29),
        ("Isis", 30),
    ];
    entries.iter().map(|&(k, v)| (k.to_string(), v)).collect()
}

fn default_heliocentric_columns() -> HashMap<String, usize> {
    let entries: &[(&str, usize)] = &[
        ("Mercury", 55),
        ("Venus", 56),
        ("Earth", 57),
        ("Mars", 58),
        ("Jupiter", 59),
        ("Saturn", 60),
        ("Uranus", 61),
        ("Neptune", 62),
        ("Pluto", 63),
        ("Chiron", 64),
        ("Isis", 65),
    ];
    entries.iter().map(|&(k, v)| (k.to_string(), v)).collect()
}

/// Geocentric single-body columns, in output order.
const DEFAULT_GEO_SINGLES: &[&str] = &[
    "Moon", "Mercury", "Venus", "Sun", "Mars", "Jupiter", "TrueNorthNode", "Saturn", "Chiron",
    "Uranus", "Neptune", "Pluto", "Isis",
];

/// Heliocentric single-body columns, in output order.
const DEFAULT_HELIO_SINGLES: &[&str] = &[
    "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Chiron", "Uranus", "Neptune",
    "Pluto", "Isis",
];

/// Geocentric (faster, slower) combinations, in output order.
const DEFAULT_GEO_PAIRS: &[(&str, &str)] = &[
    ("Moon", "Mercury"), ("Moon", "Venus"), ("Moon", "Sun"), ("Moon", "Mars"), ("Moon", "Jupiter"),
    ("Moon", "TrueNorthNode"), ("Moon", "Saturn"), ("Moon", "Uranus"), ("Mercury", "Venus"),
    ("Mercury", "Sun"), ("Mercury", "Mars"), ("Mercury", "Jupiter"), ("Mercury", "TrueNorthNode"),
    ("Mercury", "Saturn"), ("Mercury", "Chiron"), ("Mercury", "Uranus"), ("Mercury", "Neptune"),
    ("Mercury", "Pluto"), ("Venus", "Sun"), ("Venus", "Mars"), ("Venus", "Jupiter"),
    ("Venus", "TrueNorthNode"), ("Venus", "Saturn"), ("Venus", "Chiron"), ("Venus", "Uranus"),
    ("Venus", "Neptune"), ("Venus", "Pluto"), ("Sun", "Mars"), ("Sun", "Jupiter"),
    ("Sun", "TrueNorthNode"), ("Sun", "Saturn"), ("Sun", "Chiron"), ("Sun", "Uranus"),
    ("Sun", "Neptune"), ("Sun", "Pluto"), ("Mars", "Jupiter"), ("Mars", "TrueNorthNode"),
    ("Mars", "Saturn"), ("Mars", "Chiron"), ("Mars", "Uranus"), ("Mars", "Neptune"),
    ("Mars", "Pluto"), ("Jupiter", "TrueNorthNode"), ("Jupiter", "Saturn"), ("Jupiter", "Chiron"),
    ("Jupiter", "Uranus"), ("Jupiter", "Neptune"), ("Jupiter", "Pluto"),
    ("TrueNorthNode", "Saturn"), ("TrueNorthNode", "Chiron"), ("TrueNorthNode", "Uranus"),
    ("TrueNorthNode", "Neptune"), ("TrueNorthNode", "Pluto"), ("Saturn", "Chiron"),
    ("Saturn", "Uranus"), ("Saturn", "Neptune"), ("Saturn", "Pluto"), ("Chiron", "Uranus"),
    ("Chiron", "Neptune"), ("Chiron", "Pluto"), ("Uranus", "Neptune"), ("Uranus", "Pluto"),
    ("Neptune", "Pluto"),
];

/// Heliocentric (faster, slower) combinations, in output order.
const DEFAULT_HELIO_PAIRS: &[(&str, &str)] = &[
    ("Mercury", "Venus"), ("Mercury", "Earth"), ("Mercury", "Mars"), ("Mercury", "Jupiter"),
    ("Mercury", "Chiron"), ("Mercury", "Saturn"), ("Mercury", "Uranus"), ("Mercury", "Neptune"),
    ("Mercury", "Pluto"), ("Venus", "Earth"), ("Venus", "Mars"), ("Venus", "Jupiter"),
    ("Venus", "Chiron"), ("Venus", "Saturn"), ("Venus", "Uranus"), ("Venus", "Neptune"),
    ("Venus", "Pluto"), ("Earth", "Mars"), ("Earth", "Jupiter"), ("Earth", "Chiron"),
    ("Earth", "Saturn"), ("Earth", "Uranus"), ("Earth", "Neptune"), ("Earth", "Pluto"),
    ("Mars", "Jupiter"), ("Mars", "Chiron"), ("Mars", "Saturn"), ("Mars", "Uranus"),
    ("Mars", "Neptune"), ("Mars", "Pluto"), ("Jupiter", "Chiron"), ("Jupiter", "Saturn"),
    ("Jupiter", "Uranus"), ("Jupiter", "Neptune"), ("Jupiter", "Pluto"), ("Chiron", "Saturn"),
    ("Chiron", "Uranus"), ("Chiron", "Neptune"), ("Chiron", "Pluto"), ("Saturn", "Uranus"),
    ("Saturn", "Neptune"), ("Saturn", "Pluto"), ("Uranus", "Neptune"), ("Uranus", "Pluto"),
    ("Neptune", "Pluto"),
];

fn default_single_columns() -> Vec<SingleColumn> {
    let geo = DEFAULT_GEO_SINGLES.iter().map(|&body| SingleColumn {
        frame: Frame::Geocentric,
        body: body.to_string(),
    });
    let helio = DEFAULT_HELIO_SINGLES.iter().map(|&body| SingleColumn {
        frame: Frame::Heliocentric,
        body: body.to_string(),
    });
    geo.chain(helio).collect()
}

fn default_pair_columns() -> Vec<PairColumn> {
    let geo = DEFAULT_GEO_PAIRS.iter().map(|&(faster, slower)| PairColumn {
        frame: Frame::Geocentric,
        faster: faster.to_string(),
        slower: slower.to_string(),
    });
    let helio = DEFAULT_HELIO_PAIRS.iter().map(|&(faster, slower)| PairColumn {
        frame: Frame::Heliocentric,
        faster: faster.to_string(),
        slower: slower.to_string(),
    });
    geo.chain(helio).collect()
}

/// Main pipeline configuration combining all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub ephemeris: EphemerisConfig,
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_column_maps() {
        let config = EphemerisConfig::default();
        assert_eq!(config.column_for(Frame::Geocentric, "Sun"), Some(18));
        assert_eq!(config.column_for(Frame::Geocentric, "Isis"), Some(30));
        assert_eq!(config.column_for(Frame::Heliocentric, "Mercury"), Some(55));
        assert_eq!(config.column_for(Frame::Heliocentric, "Earth"), Some(57));
        assert_eq!(config.column_for(Frame::Heliocentric, "Moon"), None);
    }

    #[test]
    fn test_default_derived_column_set() {
        let config = EphemerisConfig::default();
        assert_eq!(config.singles.len(), 24);
        assert_eq!(config.pairs.len(), 108);
        assert_eq!(config.num_derived_columns(), 132);

        assert_eq!(config.singles[0].label(), "G.Moon");
        assert_eq!(config.singles[13].label(), "H.Mercury");
        assert_eq!(config.pairs[0].label(), "G.Moon/G.Mercury");
        assert_eq!(config.pairs.last().unwrap().label(), "H.Neptune/H.Pluto");
    }

    #[test]
    fn test_pair_label_format() {
        let pair = PairColumn {
            frame: Frame::Heliocentric,
            faster: "Venus".to_string(),
            slower: "Earth".to_string(),
        };
        assert_eq!(pair.label(), "H.Venus/H.Earth");
    }

    #[test]
    fn test_yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let config = PipelineConfig::default();
        config.to_yaml(&path).unwrap();

        let loaded = PipelineConfig::from_yaml(&path).unwrap();
        assert_eq!(loaded.ephemeris.singles, config.ephemeris.singles);
        assert_eq!(loaded.ephemeris.pairs, config.ephemeris.pairs);
        assert_eq!(
            loaded.ephemeris.geocentric_columns,
            config.ephemeris.geocentric_columns
        );
    }
}
