use crate::form::{Control, FormBuilder};
use fauna_ml::{FeatureRecord, MLPrediction, format_confidence};
use minijinja::Environment;
use serde::Serialize;

const INDEX_TEMPLATE: &str = "index.html";

#[derive(Serialize)]
struct ResultView<'a> {
    label: &'a str,
    confidence: String,
}

#[derive(Serialize)]
struct PageContext<'a> {
    controls: Vec<Control>,
    result: Option<ResultView<'a>>,
}

/// Renders the single page: the form, plus the last prediction when there is one.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))?;
        Ok(Self { env })
    }

    pub fn render(
        &self,
        record: &FeatureRecord,
        prediction: Option<&MLPrediction>,
    ) -> Result<String, minijinja::Error> {
        let context = PageContext {
            controls: FormBuilder::controls(record),
            result: prediction.map(|p| ResultView {
                label: &p.label,
                confidence: format_confidence(p.confidence),
            }),
        };
        self.env.get_template(INDEX_TEMPLATE)?.render(context)
    }
}
