//! Feature schema for animal classification
//!
//! One [`FeatureRecord`] describes a single specimen: fifteen binary traits and the
//! number of legs. The column order used by the classifier is the order of [`FEATURES`].

use crate::error::FormError;
use ndarray::Array1;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Number of features every record carries.
pub const N_FEATURES: usize = 16;

pub const LEGS_MIN: u8 = 0;
pub const LEGS_MAX: u8 = 8;
pub const LEGS_DEFAULT: u8 = 2;

/// Input domain of a single feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeatureKind {
    /// Yes/no trait, encoded as 0 or 1
    Binary,
    /// Bounded integer with a default (inclusive bounds)
    Range { min: u8, max: u8, default: u8 },
}

impl FeatureKind {
    pub fn default_value(&self) -> u8 {
        match self {
            FeatureKind::Binary => 0,
            FeatureKind::Range { default, .. } => *default,
        }
    }

    pub fn contains(&self, value: u8) -> bool {
        match self {
            FeatureKind::Binary => value <= 1,
            FeatureKind::Range { min, max, .. } => (*min..=*max).contains(&value),
        }
    }

    /// Every value a user can pick for this feature, in ascending order.
    pub fn options(&self) -> Vec<u8> {
        match self {
            FeatureKind::Binary => vec![0, 1],
            FeatureKind::Range { min, max, .. } => (*min..=*max).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FeatureKind,
}

const fn binary(name: &'static str, label: &'static str) -> FeatureSpec {
    FeatureSpec {
        name,
        label,
        kind: FeatureKind::Binary,
    }
}

pub const FEATURES: [FeatureSpec; N_FEATURES] = [
    binary("hair", "Hair"),
    binary("feathers", "Feathers"),
    binary("eggs", "Eggs"),
    binary("milk", "Milk"),
    binary("airborne", "Airborne"),
    binary("aquatic", "Aquatic"),
    binary("predator", "Predator"),
    binary("toothed", "Toothed"),
    binary("backbone", "Backbone"),
    binary("breathes", "Breathes"),
    binary("venomous", "Venomous"),
    binary("fins", "Fins"),
    FeatureSpec {
        name: "legs",
        label: "Legs",
        kind: FeatureKind::Range {
            min: LEGS_MIN,
            max: LEGS_MAX,
            default: LEGS_DEFAULT,
        },
    },
    binary("tail", "Tail"),
    binary("domestic", "Domestic"),
    binary("catsize", "Cat Size"),
];

pub fn feature_names() -> impl Iterator<Item = &'static str> {
    FEATURES.iter().map(|f| f.name)
}

pub fn feature_spec(name: &str) -> Option<&'static FeatureSpec> {
    FEATURES.iter().find(|f| f.name == name)
}

/// One specimen to classify.
///
/// Binary traits are `0` or `1`, `legs` is within `0..=8`. Deserialization requires all
/// sixteen keys and rejects unknown ones; domains are checked by [`FeatureRecord::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct FeatureRecord {
    pub hair: u8,
    pub feathers: u8,
    pub eggs: u8,
    pub milk: u8,
    pub airborne: u8,
    pub aquatic: u8,
    pub predator: u8,
    pub toothed: u8,
    pub backbone: u8,
    pub breathes: u8,
    pub venomous: u8,
    pub fins: u8,
    pub legs: u8,
    pub tail: u8,
    pub domestic: u8,
    pub catsize: u8,
}

impl Default for FeatureRecord {
    fn default() -> Self {
        FeatureRecord {
            hair: 0,
            feathers: 0,
            eggs: 0,
            milk: 0,
            airborne: 0,
            aquatic: 0,
            predator: 0,
            toothed: 0,
            backbone: 0,
            breathes: 0,
            venomous: 0,
            fins: 0,
            legs: LEGS_DEFAULT,
            tail: 0,
            domestic: 0,
            catsize: 0,
        }
    }
}

impl FeatureRecord {
    /// Raw values in column order.
    pub fn values(&self) -> [u8; N_FEATURES] {
        [
            self.hair,
            self.feathers,
            self.eggs,
            self.milk,
            self.airborne,
            self.aquatic,
            self.predator,
            self.toothed,
            self.backbone,
            self.breathes,
            self.venomous,
            self.fins,
            self.legs,
            self.tail,
            self.domestic,
            self.catsize,
        ]
    }

    pub fn get(&self, name: &str) -> Option<u8> {
        FEATURES
            .iter()
            .position(|f| f.name == name)
            .map(|idx| self.values()[idx])
    }

    /// Set a feature by name, rejecting unknown names and out-of-domain values.
    pub fn set(&mut self, name: &str, value: u8) -> Result<(), FormError> {
        let spec = feature_spec(name).ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        if !spec.kind.contains(value) {
            return Err(FormError::OutOfRange {
                field: spec.name,
                value: value.to_string(),
            });
        }
        let slot = match spec.name {
            "hair" => &mut self.hair,
            "feathers" => &mut self.feathers,
            "eggs" => &mut self.eggs,
            "milk" => &mut self.milk,
            "airborne" => &mut self.airborne,
            "aquatic" => &mut self.aquatic,
            "predator" => &mut self.predator,
            "toothed" => &mut self.toothed,
            "backbone" => &mut self.backbone,
            "breathes" => &mut self.breathes,
            "venomous" => &mut self.venomous,
            "fins" => &mut self.fins,
            "legs" => &mut self.legs,
            "tail" => &mut self.tail,
            "domestic" => &mut self.domestic,
            "catsize" => &mut self.catsize,
            other => return Err(FormError::UnknownField(other.to_string())),
        };
        *slot = value;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), FormError> {
        for (spec, value) in FEATURES.iter().zip(self.values()) {
            if !spec.kind.contains(value) {
                return Err(FormError::OutOfRange {
                    field: spec.name,
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Model input row in column order.
    pub fn to_vector(&self) -> Array1<f64> {
        self.values().iter().map(|v| f64::from(*v)).collect()
    }
}
