pub mod classifier;
pub mod providers;
pub mod translator;

pub use classifier::{CategoryScores, Classifier};
pub use providers::{GoogleTranslateProvider, MicrosoftTranslatorProvider, OpenAiTranslatorProvider};
pub use translator::{CacheStats, Translator, TranslatorConfig};
