// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod deepseek;
pub mod gnews;
pub mod storage;

pub use deepseek::DeepSeekScorer;
pub use gnews::GNewsClient;
pub use storage::LocalStorage;
