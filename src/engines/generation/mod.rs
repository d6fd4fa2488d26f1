pub mod evolution_engine;
pub mod operators;
pub mod progress;
pub mod stagnation;

pub use evolution_engine::{
    sort_population, EvolutionConfig, EvolutionEngine, GenerationPlan, ProgressCallback,
    SearchOutcome,
};
pub use progress::{ChannelProgressCallback, ProgressMessage};
pub use stagnation::StagnationWindow;
