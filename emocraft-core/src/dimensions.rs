//! Affective dimensions of emotions.
//!
//! Each emotion can be described along ten dimensions (valence, arousal,
//! and so on). Hand-authored values come from a [`DimensionTable`]; for
//! emotions without an entry the value is inferred from the dimensions of
//! the emotion's base components.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::{EmocraftError, Result};
use crate::graph::CombinationGraph;

/// The dimension table shipped with the crate.
const EMBEDDED_DIMENSIONS: &str = include_str!("../data/dimensions.toml");

/// One affective dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    /// Pleasure–displeasure.
    Valence,
    /// Activation energy.
    Arousal,
    /// Sense of control.
    Dominance,
    /// Past, present or future orientation.
    TemporalFocus,
    /// Approach or avoidance tendency.
    MotivationalDirection,
    /// Predictability of the situation.
    Certainty,
    /// Strength of the experience.
    Intensity,
    /// Directed at others or internal.
    SocialContext,
    /// How the situation is evaluated.
    CognitiveAppraisal,
    /// Bodily awareness.
    Embodiment,
}

impl Dimension {
    /// Every dimension, in display order.
    pub const ALL: [Dimension; 10] = [
        Dimension::Valence,
        Dimension::Arousal,
        Dimension::Dominance,
        Dimension::TemporalFocus,
        Dimension::MotivationalDirection,
        Dimension::Certainty,
        Dimension::Intensity,
        Dimension::SocialContext,
        Dimension::CognitiveAppraisal,
        Dimension::Embodiment,
    ];

    /// Key used in dimension tables.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Valence => "valence",
            Self::Arousal => "arousal",
            Self::Dominance => "dominance",
            Self::TemporalFocus => "temporal_focus",
            Self::MotivationalDirection => "motivational_direction",
            Self::Certainty => "certainty",
            Self::Intensity => "intensity",
            Self::SocialContext => "social_context",
            Self::CognitiveAppraisal => "cognitive_appraisal",
            Self::Embodiment => "embodiment",
        }
    }

    /// Human-readable name.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Valence => "Valence",
            Self::Arousal => "Arousal",
            Self::Dominance => "Dominance",
            Self::TemporalFocus => "Temporal Focus",
            Self::MotivationalDirection => "Motivational Direction",
            Self::Certainty => "Certainty",
            Self::Intensity => "Intensity",
            Self::SocialContext => "Social Context",
            Self::CognitiveAppraisal => "Cognitive Appraisal",
            Self::Embodiment => "Embodiment",
        }
    }

    /// Valid values. For ordinal dimensions the list runs from the value
    /// that wins inference to the one that loses.
    #[must_use]
    pub fn allowed_values(self) -> &'static [&'static str] {
        match self {
            Self::Valence | Self::CognitiveAppraisal => &["positive", "negative", "neutral"],
            Self::Arousal | Self::Dominance | Self::Embodiment => &["high", "medium", "low"],
            Self::TemporalFocus => &["present", "future", "past"],
            Self::MotivationalDirection => &["approach", "avoidance", "neutral"],
            Self::Certainty => &["predictable", "uncertain", "ambiguous"],
            Self::Intensity => &["strong", "medium", "weak"],
            Self::SocialContext => &["social", "individual"],
        }
    }

    /// Parse a table key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.key() == key)
    }

    fn canonical_value(self, value: &str) -> Option<&'static str> {
        self.allowed_values().iter().copied().find(|v| *v == value)
    }
}

/// Dimension values of one emotion.
pub type DimensionProfile = BTreeMap<Dimension, &'static str>;

/// Hand-authored dimension values, keyed by emotion name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionTable {
    profiles: HashMap<String, DimensionProfile>,
}

impl DimensionTable {
    /// Parse a dimension table from TOML (`[Emotion]` tables of
    /// `dimension = "value"`).
    ///
    /// # Errors
    /// Returns [`EmocraftError::DimensionTable`] for invalid TOML, unknown
    /// dimensions or values outside [`Dimension::allowed_values`].
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let raw: HashMap<String, BTreeMap<String, String>> =
            toml::from_str(toml_str).map_err(|e| EmocraftError::DimensionTable(e.to_string()))?;

        let mut profiles = HashMap::with_capacity(raw.len());
        for (emotion, values) in raw {
            let mut profile = DimensionProfile::new();
            for (key, value) in values {
                let dimension = Dimension::from_key(&key).ok_or_else(|| {
                    EmocraftError::DimensionTable(format!("{emotion}: unknown dimension {key:?}"))
                })?;
                let value = dimension.canonical_value(&value).ok_or_else(|| {
                    EmocraftError::DimensionTable(format!("{emotion}: invalid {key} value {value:?}"))
                })?;
                profile.insert(dimension, value);
            }
            profiles.insert(emotion, profile);
        }
        Ok(Self { profiles })
    }

    /// Load a dimension table from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// The table compiled into the crate.
    ///
    /// # Errors
    /// Returns [`EmocraftError::DimensionTable`] if the embedded data is
    /// malformed.
    pub fn embedded() -> Result<Self> {
        Self::from_toml(EMBEDDED_DIMENSIONS)
    }

    /// Authored profile of `emotion`, if any.
    #[must_use]
    pub fn profile(&self, emotion: &str) -> Option<&DimensionProfile> {
        self.profiles.get(emotion)
    }

    /// Authored value of one dimension.
    #[must_use]
    pub fn value(&self, emotion: &str, dimension: Dimension) -> Option<&'static str> {
        self.profiles.get(emotion)?.get(&dimension).copied()
    }

    /// Number of emotions with a profile.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Infer a dimension value from a set of (base) component emotions.
///
/// `None` when no component has an authored value for `dimension`.
#[must_use]
pub fn infer_from_components<S: AsRef<str>>(
    table: &DimensionTable,
    components: &[S],
    dimension: Dimension,
) -> Option<&'static str> {
    let values: Vec<&'static str> = components
        .iter()
        .filter_map(|c| table.value(c.as_ref(), dimension))
        .collect();
    if values.is_empty() {
        return None;
    }
    let all = |v: &str| values.iter().all(|x| *x == v);
    let any = |v: &str| values.iter().any(|x| *x == v);

    let inferred = match dimension {
        Dimension::Valence | Dimension::CognitiveAppraisal => {
            if all("positive") {
                "positive"
            } else if all("negative") {
                "negative"
            } else {
                "neutral"
            }
        }
        Dimension::MotivationalDirection => {
            if all("approach") {
                "approach"
            } else if all("avoidance") {
                "avoidance"
            } else {
                "neutral"
            }
        }
        Dimension::Certainty => {
            if any("uncertain") || any("ambiguous") {
                "uncertain"
            } else {
                "predictable"
            }
        }
        Dimension::SocialContext => {
            if any("social") {
                "social"
            } else {
                "individual"
            }
        }
        Dimension::Arousal
        | Dimension::Dominance
        | Dimension::Embodiment
        | Dimension::Intensity
        | Dimension::TemporalFocus => dimension
            .allowed_values()
            .iter()
            .copied()
            .find(|&v| any(v))
            .unwrap_or(values[0]),
    };
    Some(inferred)
}

/// Value of `dimension` for `emotion`: the authored value when present,
/// otherwise inferred from the emotion's base components.
#[must_use]
pub fn emotion_dimension(
    graph: &CombinationGraph,
    table: &DimensionTable,
    emotion: &str,
    dimension: Dimension,
) -> Option<&'static str> {
    if let Some(value) = table.value(emotion, dimension) {
        return Some(value);
    }
    let components = graph.get_base_components(emotion);
    infer_from_components(table, &components, dimension)
}
