//! esforge combine: enumerates field combinations, filters them and expands
//! per-field options into concrete assignments.

pub mod cartesian;
pub mod combination;
pub mod filter;
pub mod options;

pub use cartesian::{assignments, cartesian};
pub use combination::{enumerate_custom_groups, enumerate_up_to, Combination};
pub use filter::{
    apply_merged_text_field, exclude_members, filter_by_category_caps, filter_requiring_all_paths,
    filter_requiring_any_of, CategoryCaps, MemberFilter,
};
pub use options::{OptionAssignment, OptionCandidate, OptionExpander, Usage};
