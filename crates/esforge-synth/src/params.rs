//! Parameter lists of generated functions.

use esforge_core::{Error, ParamType, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
    /// Purpose, shown in the documentation line for this parameter.
    pub purpose: String,
}

/// Adjacent parameters sharing one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamGroup {
    pub names: Vec<String>,
    #[serde(rename = "type")]
    pub ty: ParamType,
}

/// Ordered parameters. Names are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParamList(Vec<Param>);

impl ParamList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a parameter. A repeated name is a contract violation.
    pub fn push(&mut self, name: impl Into<String>, ty: ParamType, purpose: impl Into<String>) -> Result<()> {
        let name = name.into();
        if self.contains(&name) {
            return Err(Error::Contract(format!("duplicate parameter `{}`", name)));
        }
        self.0.push(Param {
            name,
            ty,
            purpose: purpose.into(),
        });
        Ok(())
    }

    /// `base`, or `base_` repeated until it no longer clashes with a field parameter.
    pub fn fresh_name(&self, base: &str) -> String {
        let mut name = base.to_string();
        while self.contains(&name) {
            name.push('_');
        }
        name
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|p| p.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|p| p.name.as_str()).collect()
    }

    /// Coalesce adjacent parameters of identical type.
    pub fn declarations(&self) -> Vec<ParamGroup> {
        let mut groups: Vec<ParamGroup> = Vec::new();
        for param in &self.0 {
            match groups.last_mut() {
                Some(last) if last.ty == param.ty => last.names.push(param.name.clone()),
                _ => groups.push(ParamGroup {
                    names: vec![param.name.clone()],
                    ty: param.ty,
                }),
            }
        }
        groups
    }
}
