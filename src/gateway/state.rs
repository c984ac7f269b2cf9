use std::sync::Arc;

use crate::pipeline::EssayGrader;
use crate::registry::ModelRegistry;

#[derive(Clone)]
pub struct HandlerState {
    pub grader: EssayGrader,

    /// Reported by `/ready`; the registry itself decides what gets loaded.
    pub stub_models: bool,
}

impl HandlerState {
    pub fn new(registry: Arc<ModelRegistry>, stub_models: bool) -> Self {
        Self {
            grader: EssayGrader::new(registry),
            stub_models,
        }
    }
}
