//! Raw data handling: source types, loaders and the aligned panel

pub mod loader;
pub mod panel;
pub mod series;

pub use loader::{load_source, LoadedSource, SourceConfig};
pub use panel::Panel;
pub use series::{Frequency, Observation, Series, SourceKind};
