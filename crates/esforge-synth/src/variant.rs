//! Variant records: one generated function with its four aligned artifacts.

use std::collections::BTreeSet;

use esforge_combine::{OptionAssignment, OptionCandidate};
use esforge_core::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::family::Family;
use crate::params::ParamList;
use crate::query::QueryBody;
use crate::target::TargetChoice;

static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z0-9]*$").unwrap());

/// A field path bound to the option it was expanded with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignedOption {
    pub path: String,
    pub option: OptionCandidate,
}

impl From<&OptionAssignment<'_>> for AssignedOption {
    fn from(assignment: &OptionAssignment<'_>) -> Self {
        Self {
            path: assignment.field.path.clone(),
            option: assignment.option.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub identifier: String,
    pub doc: String,
    pub params: ParamList,
    pub query: QueryBody,
    /// Member paths of the combination, in combination order.
    pub combination: Vec<String>,
    pub options: Vec<AssignedOption>,
    pub target: TargetChoice,
}

impl Variant {
    /// The identifier is a valid type-style name, the query references exactly
    /// the declared parameters, and the doc has one line per parameter.
    pub fn check_contract(&self) -> Result<()> {
        if !IDENTIFIER_RE.is_match(&self.identifier) {
            return Err(Error::Contract(format!(
                "`{}` is not a valid identifier",
                self.identifier
            )));
        }

        let declared: BTreeSet<&str> = self.params.names().into_iter().collect();
        let referenced: BTreeSet<&str> = self.query.param_refs().into_iter().collect();
        if declared != referenced {
            let undeclared: Vec<&str> = referenced.difference(&declared).copied().collect();
            let unused: Vec<&str> = declared.difference(&referenced).copied().collect();
            return Err(Error::Contract(format!(
                "{}: undeclared parameters {:?}, unused parameters {:?}",
                self.identifier, undeclared, unused
            )));
        }

        let lines = self.doc.lines().count();
        if lines != self.params.len() + 1 {
            return Err(Error::Contract(format!(
                "{}: documentation has {} lines for {} parameters",
                self.identifier,
                lines,
                self.params.len()
            )));
        }
        Ok(())
    }
}

/// Every variant of one family over one schema, in enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyOutput {
    pub family: Family,
    pub index: String,
    pub variants: Vec<Variant>,
}

impl FamilyOutput {
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.variants.iter().map(|v| v.identifier.as_str()).collect()
    }
}
