pub mod normalize;
pub mod orchestrator;
pub mod sources;
pub mod threats;

pub use orchestrator::{run_collection, SourceTally};
pub use sources::{
    MetMuseumAdapter, NewsMonitor, SourceAdapter, SourceError, SourceKind, UnescoAdapter,
};
