//! Policy model
//!
//! The model declares the shape of a request, the shape of a policy
//! rule, the matcher expression relating one to the other, and how the
//! effects of every firing rule combine into a single decision.  It is
//! compiled once from its text definition; evaluation against a
//! compiled model is a pure function with no side effects.

/// How the effects of all firing rules combine into one decision.
///
/// Selected per model by the `[policy_effect]` expression rather than
/// hard-coded, as different deployments inherit different defaults.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EffectPolicy {
    /// `some(where (p.eft == allow))`: at least one firing allow rule.
    AllowOverride,
    /// `!some(where (p.eft == deny))`: at least one firing rule and no
    /// firing deny rule.
    DenyOverride,
    /// `some(where (p.eft == allow)) && !some(where (p.eft == deny))`:
    /// at least one firing allow rule and no firing deny rule.
    AllowAndDeny,
}

/// One operand of a matcher term, resolved to its field index at
/// compile time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Operand {
    Request(usize),
    Policy(usize),
    Literal(String),
}

/// One conjunct of the matcher expression.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MatchTerm {
    /// Exact equality, with `*` in a policy field matching any value.
    Eq(Operand, Operand),
    /// Role membership through the `g` relation.
    Group(Operand, Operand),
}

/// A compiled policy model.
#[derive(Clone, Debug, PartialEq)]
pub struct Model {
    request: Vec<String>,
    policy: Vec<String>,
    eft_index: Option<usize>,
    role_definition: bool,
    matcher: Vec<MatchTerm>,
    effect: EffectPolicy,
}

mod impls;
