pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod merge;
pub mod toolchain;

pub use cache::DiscoveryCache;
pub use config::DiscoveryConfig;
pub use context::{ContextResolver, ModelElement, ResolvedScope};
pub use error::Result;
pub use merge::{MergeMode, SettingsMerger};
pub use toolchain::BuildModel;
pub use toolchain::manifest::ProjectManifest;
