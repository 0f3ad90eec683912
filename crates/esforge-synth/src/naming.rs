//! PascalCase identifiers for generated functions.

use esforge_core::Category;
use esforge_combine::{OptionAssignment, OptionCandidate};

use crate::family::{Family, FilterMode, OutputKind};
use crate::target::Target;

/// Field name plus option suffix: `Price`, `PriceGteLte`, `PublishedNDay`.
pub fn field_token(assignment: &OptionAssignment<'_>) -> String {
    let name = &assignment.field.display_name;
    match &assignment.option {
        OptionCandidate::Compare(set) => {
            let ops: String = set.ops().iter().map(|op| op.token()).collect();
            format!("{}{}", name, ops)
        }
        OptionCandidate::Recent(window) => format!("{}N{}", name, window.token()),
        _ => name.clone(),
    }
}

fn tokens<'s, 'a: 's>(
    assignments: impl Iterator<Item = &'s OptionAssignment<'a>>,
    joiner: &str,
) -> String {
    assignments.map(field_token).collect::<Vec<_>>().join(joiner)
}

fn by_part(family: Family, assignments: &[OptionAssignment<'_>], joiner: &str) -> String {
    if family.kind == OutputKind::Filter {
        let (text, rest): (Vec<_>, Vec<_>) = assignments
            .iter()
            .partition(|a| a.field.category == Category::Text);
        return format!(
            "{}Filter{}",
            tokens(text.into_iter(), joiner),
            tokens(rest.into_iter(), joiner)
        );
    }
    tokens(assignments.iter(), joiner)
}

fn head(family: Family, target: &Target<'_>) -> String {
    match *target {
        Target::None => match (family.kind, family.mode) {
            (OutputKind::Term, _) => "Term".into(),
            (_, FilterMode::Match) => "Query".into(),
            (_, FilterMode::Range) => "Range".into(),
            (_, FilterMode::Recent) => "Recent".into(),
        },
        Target::TopN { field, direction } => format!("{}{}", direction.token(), field.display_name),
        Target::Knn { field } => format!("Knn{}", field.display_name),
        Target::Terms { field } => format!("Terms{}", field.display_name),
        Target::Stats { field, metric } => format!("{}{}", metric.token(), field.display_name),
        Target::Hist { field } => format!("Hist{}", field.display_name),
        Target::HistStats {
            bucket,
            field,
            metric,
        } => format!(
            "Hist{}{}{}",
            bucket.display_name,
            metric.token(),
            field.display_name
        ),
        Target::DateHist { field, unit } => format!("DateHist{}{}", unit.token(), field.display_name),
        Target::DateHistStats {
            date,
            unit,
            field,
            metric,
        } => format!(
            "DateHist{}{}{}{}",
            unit.token(),
            date.display_name,
            metric.token(),
            field.display_name
        ),
    }
}

/// `Query{Index}By{..}` without a target, `{Head}Of{Index}[By{..}]` with one.
pub fn identifier(
    family: Family,
    index_display: &str,
    assignments: &[OptionAssignment<'_>],
    target: &Target<'_>,
) -> String {
    spell(family, index_display, assignments, target, "")
}

/// Like [`identifier`] with `And` between filter tokens, so `{A, BC}` and
/// `{AB, C}` spell differently.
pub fn joined_identifier(
    family: Family,
    index_display: &str,
    assignments: &[OptionAssignment<'_>],
    target: &Target<'_>,
) -> String {
    spell(family, index_display, assignments, target, "And")
}

fn spell(
    family: Family,
    index_display: &str,
    assignments: &[OptionAssignment<'_>],
    target: &Target<'_>,
    joiner: &str,
) -> String {
    let head = head(family, target);
    let by = by_part(family, assignments, joiner);
    match (target, by.is_empty()) {
        (Target::None, _) => format!("{}{}By{}", head, index_display, by),
        (_, true) => format!("{}Of{}", head, index_display),
        (_, false) => format!("{}Of{}By{}", head, index_display, by),
    }
}
