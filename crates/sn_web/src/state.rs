use std::sync::Arc;

use sn_core::{ArticleStore, PipelineMetrics};
use sn_enrich::Translator;
use sn_pipeline::{CycleScheduler, QuietWindow};

#[derive(Clone)]
pub struct AppState {
    pub scheduler: CycleScheduler,
    pub metrics: Arc<PipelineMetrics>,
    pub store: Arc<dyn ArticleStore>,
    pub translator: Arc<Translator>,
    /// Key required by `/parse`
    pub api_key: String,
    pub environment: String,
    pub quiet_window: Option<QuietWindow>,
}
