// Shopping List - Core Library
// Merges differently spelled purchase lines into one list per shop section,
// remembering merge and section decisions between runs.

pub mod aggregate;
pub mod collation;
pub mod config;
pub mod equivalence;
pub mod logging;
pub mod operator;
pub mod records;
pub mod report;
pub mod sections;
pub mod session;
pub mod similarity;
pub mod store;
pub mod units;

// Only compile the terminal picker when the TUI feature is enabled
#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use aggregate::{Aggregator, QuantityVector};
pub use collation::{CodepointCollation, Collation, GermanCollation};
pub use config::{Config, StateBackend};
pub use equivalence::{EquivalenceResolver, Resolution};
pub use operator::{Interaction, Operator, ScriptedOperator, StdioOperator};
pub use records::{load_records, read_records, RawRecord};
pub use report::ReportFormatter;
pub use sections::{CatalogError, SectionCatalog, SectionClassifier};
pub use session::{RunSummary, Session};
pub use similarity::similarity_ratio;
pub use store::{
    DurableState, EquivalenceMap, JsonStateStore, SectionAssignment, SqliteStateStore, StateStore,
};
pub use units::{CanonicalUnit, DecimalStyle, Quantity, RawUnit, Rejection, UnitNormalizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
