//! Class number → class name table
//!
//! Read from a CSV export with at least the `Class_Number` and `Class_Type` columns.

use crate::error::PredictError;
use fauna_types::{Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct ClassRow {
    #[serde(rename = "Class_Number")]
    class_number: usize,
    #[serde(rename = "Class_Type")]
    class_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassMapping {
    classes: BTreeMap<usize, String>,
}

impl ClassMapping {
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut classes = BTreeMap::new();
        for (line, row) in rdr.deserialize::<ClassRow>().enumerate() {
            let row = row.map_err(|e| anyhow!("Row {}: {}", line + 1, e))?;
            match classes.get(&row.class_number) {
                Some(existing) if *existing != row.class_type => bail!(
                    "Row {}: class {} is mapped to both `{}` and `{}`",
                    line + 1,
                    row.class_number,
                    existing,
                    row.class_type
                ),
                Some(_) => {}
                None => {
                    classes.insert(row.class_number, row.class_type);
                }
            }
        }

        if classes.is_empty() {
            bail!("class mapping contains no rows");
        }
        Ok(ClassMapping { classes })
    }

    pub fn label(&self, class_number: usize) -> Result<&str, PredictError> {
        self.classes
            .get(&class_number)
            .map(String::as_str)
            .ok_or(PredictError::UnknownClass(class_number))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.classes.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl FromIterator<(usize, String)> for ClassMapping {
    fn from_iter<T: IntoIterator<Item = (usize, String)>>(iter: T) -> Self {
        ClassMapping {
            classes: iter.into_iter().collect(),
        }
    }
}
