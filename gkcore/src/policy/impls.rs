use std::fmt;

use crate::error::PolicyParseError;
use crate::model::Model;
use super::{Effect, Grouping, Rule, Store};

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Effect::Allow => f.write_str("allow"),
            Effect::Deny => f.write_str("deny"),
        }
    }
}

impl Store {
    /// Load a store from line-oriented policy text.
    ///
    /// Lines are `p, <fields...>` or `g, <member>, <group>`; `#` starts
    /// a comment and blank lines are skipped.  Any line that does not
    /// match the model's declared policy shape fails the whole load.
    pub fn parse(source: &str, model: &Model) -> Result<Self, PolicyParseError> {
        let mut rules = Vec::new();
        let mut groupings = Vec::new();
        for (idx, raw) in source.lines().enumerate() {
            let line = idx + 1;
            let text = raw
                .split('#')
                .next()
                .expect("split must produce at least one token")
                .trim();
            if text.is_empty() {
                continue;
            }
            let mut tokens = text.split(',').map(str::trim);
            let kind = tokens
                .next()
                .expect("split must produce at least one token");
            let values = tokens.map(str::to_string).collect::<Vec<_>>();
            match kind {
                "p" => rules.push(Self::parse_rule(values, model, line)?),
                "g" => {
                    if values.len() != 2 {
                        return Err(PolicyParseError::FieldCount {
                            line,
                            expected: 2,
                            found: values.len(),
                        });
                    }
                    let mut values = values.into_iter();
                    groupings.push(Grouping {
                        member: values.next()
                            .expect("length checked above"),
                        group: values.next()
                            .expect("length checked above"),
                    });
                }
                kind => return Err(PolicyParseError::UnknownKind {
                    line,
                    kind: kind.to_string(),
                }),
            }
        }
        log::debug!(
            "loaded {} rules and {} groupings",
            rules.len(),
            groupings.len(),
        );
        Ok(Self { rules, groupings })
    }

    fn parse_rule(
        mut values: Vec<String>,
        model: &Model,
        line: usize,
    ) -> Result<Rule, PolicyParseError> {
        let expected = model.policy_fields().len() +
            model.eft_index().map_or(0, |_| 1);
        if values.len() != expected {
            return Err(PolicyParseError::FieldCount {
                line,
                expected,
                found: values.len(),
            });
        }
        let effect = match model.eft_index() {
            Some(idx) => {
                let keyword = values.remove(idx);
                match keyword.as_str() {
                    "allow" => Effect::Allow,
                    "deny" => Effect::Deny,
                    _ => return Err(PolicyParseError::UnknownEffect {
                        line,
                        keyword,
                    }),
                }
            }
            None => Effect::Allow,
        };
        Ok(Rule { fields: values, effect })
    }

    /// Build a store from already structured rules and groupings, e.g.
    /// deserialized policy data.  Rules are validated against the
    /// model's policy shape the same way text input is.
    pub fn from_parts(
        rules: Vec<Rule>,
        groupings: Vec<Grouping>,
        model: &Model,
    ) -> Result<Self, PolicyParseError> {
        let expected = model.policy_fields().len();
        for (idx, rule) in rules.iter().enumerate() {
            if rule.fields.len() != expected {
                return Err(PolicyParseError::FieldCount {
                    line: idx + 1,
                    expected,
                    found: rule.fields.len(),
                });
            }
        }
        Ok(Self { rules, groupings })
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The rules satisfying the predicate, in source order.
    pub fn rules_for<P>(&self, mut predicate: P) -> impl Iterator<Item = &Rule>
    where
        P: FnMut(&Rule) -> bool,
    {
        self.rules.iter().filter(move |rule| predicate(rule))
    }

    pub fn groupings(&self) -> &[Grouping] {
        &self.groupings
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether `member` resolves to `group` through the role
    /// inheritance relation.  The relation is reflexive and transitive.
    pub fn in_group(&self, member: &str, group: &str) -> bool {
        if member == group {
            return true;
        }
        let mut seen = vec![member];
        let mut queue = vec![member];
        while let Some(current) = queue.pop() {
            for entry in self.groupings.iter()
                .filter(|entry| entry.member == current)
            {
                if entry.group == group {
                    return true;
                }
                if !seen.contains(&entry.group.as_str()) {
                    seen.push(&entry.group);
                    queue.push(&entry.group);
                }
            }
        }
        false
    }
}
