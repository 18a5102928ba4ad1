//! Policy data
//!
//! The structs provided by this module represent a loaded set of
//! policy rules for consumption by the evaluator.  A `Store` is built
//! once from its source, immutable thereafter, and only ever replaced
//! wholesale.

use serde::{Deserialize, Serialize};

/// The outcome a rule asserts when it matches.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    #[default]
    Allow,
    Deny,
}

/// A single policy rule.
///
/// The values are ordered per the model's policy definition, with the
/// effect field (when the model declares one) split out.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Rule {
    pub fields: Vec<String>,
    #[serde(default)]
    pub effect: Effect,
}

/// One role-inheritance entry - the member holds every permit granted
/// to the group, directly or through further `Grouping` entries.
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct Grouping {
    pub member: String,
    pub group: String,
}

/// Ordered collection of rules and role groupings.
///
/// Iteration order is stable and equals source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Store {
    rules: Vec<Rule>,
    groupings: Vec<Grouping>,
}

mod impls;
