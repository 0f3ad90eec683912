//! esforge synth: generator families and variant synthesis.
//!
//! Every variant carries its identifier, documentation, parameter list and query
//! body, all derived from the same combination, option tuple and target choice.

pub mod builder;
pub mod docs;
pub mod family;
pub mod naming;
pub mod params;
pub mod query;
pub mod synthesizer;
pub mod target;
pub mod variant;

pub use builder::{bind_params, build_query, Slots};
pub use docs::Phrasebook;
pub use family::{Family, FilterMode, OutputKind};
pub use naming::{identifier, joined_identifier};
pub use params::{Param, ParamGroup, ParamList};
pub use query::{AggKind, AggNode, BoolNode, Bound, Leaf, QueryBody, QueryRoot, SizeSpec, SortNode};
pub use synthesizer::Synthesizer;
pub use target::{Target, TargetChoice};
pub use variant::{AssignedOption, FamilyOutput, Variant};
