//! Form builder
//!
//! Reads a [`FeatureRecord`] out of submitted form parameters and describes the sixteen
//! input controls the page renders for it.

use fauna_ml::features::{FEATURES, FeatureKind};
use fauna_ml::{FeatureRecord, FormError};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: u8,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Widget {
    Select { options: Vec<SelectOption> },
    Slider { min: u8, max: u8, value: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Control {
    pub name: &'static str,
    pub label: &'static str,
    pub widget: Widget,
}

pub struct FormBuilder;

impl FormBuilder {
    /// Current record from submitted parameters.
    ///
    /// Absent fields take their default, present fields must parse into the field's domain.
    /// Parameters that are not features are ignored.
    pub fn read(params: &HashMap<String, String>) -> Result<FeatureRecord, FormError> {
        let mut record = FeatureRecord::default();
        for spec in FEATURES.iter() {
            let Some(raw) = params.get(spec.name) else {
                continue;
            };
            let value: u8 = raw.trim().parse().map_err(|_| FormError::OutOfRange {
                field: spec.name,
                value: raw.clone(),
            })?;
            record.set(spec.name, value)?;
        }
        Ok(record)
    }

    /// Controls in form order, showing the values held by `record`.
    pub fn controls(record: &FeatureRecord) -> Vec<Control> {
        FEATURES
            .iter()
            .zip(record.values())
            .map(|(spec, current)| {
                let widget = match spec.kind {
                    FeatureKind::Binary => Widget::Select {
                        options: spec
                            .kind
                            .options()
                            .into_iter()
                            .map(|value| SelectOption {
                                value,
                                selected: value == current,
                            })
                            .collect(),
                    },
                    FeatureKind::Range { min, max, .. } => Widget::Slider {
                        min,
                        max,
                        value: current,
                    },
                };
                Control {
                    name: spec.name,
                    label: spec.label,
                    widget,
                }
            })
            .collect()
    }
}
