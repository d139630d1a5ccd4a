use crate::page::PageRenderer;
use fauna_ml::Artifacts;
use std::sync::Arc;

pub type AppState = Arc<State>;

/// Everything a request needs. Built once at startup, read-only afterwards.
pub struct State {
    pub artifacts: Arc<Artifacts>,
    pub page: PageRenderer,
}

impl State {
    pub fn new(artifacts: Arc<Artifacts>) -> Result<AppState, minijinja::Error> {
        Ok(Arc::new(Self {
            artifacts,
            page: PageRenderer::new()?,
        }))
    }
}
