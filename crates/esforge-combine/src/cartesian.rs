//! Cartesian expansion of per-field candidate lists.

use crate::combination::Combination;
use crate::options::{OptionAssignment, OptionExpander, Usage};

/// Every tuple picking one element per list, first list varying slowest.
///
/// No lists yields a single empty tuple. Any empty list yields nothing.
pub fn cartesian<T: Clone>(lists: &[Vec<T>]) -> Vec<Vec<T>> {
    let mut out: Vec<Vec<T>> = vec![Vec::new()];
    for list in lists {
        let mut next = Vec::with_capacity(out.len() * list.len());
        for prefix in &out {
            for item in list {
                let mut tuple = prefix.clone();
                tuple.push(item.clone());
                next.push(tuple);
            }
        }
        out = next;
    }
    out
}

/// Option assignments for every member of `combination`, in member order.
pub fn assignments<'a>(
    combination: &Combination<'a>,
    expander: &OptionExpander,
    usage: Usage,
) -> Vec<Vec<OptionAssignment<'a>>> {
    let lists: Vec<Vec<OptionAssignment<'a>>> = combination
        .members()
        .iter()
        .map(|&field| {
            expander
                .expand(field, usage)
                .into_iter()
                .map(move |option| OptionAssignment { field, option })
                .collect()
        })
        .collect();
    cartesian(&lists)
}
