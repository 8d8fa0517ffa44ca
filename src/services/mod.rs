pub mod guard;
pub mod http_lookup;
pub mod materializer;
pub mod postprocess;
pub mod substitution;

pub use http_lookup::HttpAddressLookup;
pub use materializer::{MaterializationResult, UnresolvedTokens, materialize};
pub use substitution::{SubstitutionOutcome, substitute};
