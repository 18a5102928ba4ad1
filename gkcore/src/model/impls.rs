use crate::error::ModelParseError;
use super::{EffectPolicy, MatchTerm, Model, Operand};

impl Model {
    /// Compile a model from its INI-style text definition.
    ///
    /// The `[request_definition]`, `[policy_definition]`,
    /// `[policy_effect]` and `[matchers]` sections are required;
    /// `[role_definition]` is optional but must be present for the
    /// matcher to use the `g` relation.
    pub fn parse(definition: &str) -> Result<Self, ModelParseError> {
        let mut request: Option<Vec<String>> = None;
        let mut policy: Option<(Vec<String>, Option<usize>)> = None;
        let mut role_definition: Option<()> = None;
        let mut effect: Option<String> = None;
        let mut matcher: Option<String> = None;
        let mut section: Option<&'static str> = None;

        for (idx, raw) in definition.lines().enumerate() {
            let line = idx + 1;
            let text = raw
                .split('#')
                .next()
                .expect("split must produce at least one token")
                .trim();
            if text.is_empty() {
                continue;
            }
            if let Some(header) = text
                .strip_prefix('[')
                .and_then(|text| text.strip_suffix(']'))
            {
                section = Some(match header {
                    "request_definition" => "request_definition",
                    "policy_definition" => "policy_definition",
                    "role_definition" => "role_definition",
                    "policy_effect" => "policy_effect",
                    "matchers" => "matchers",
                    header => return Err(
                        ModelParseError::UnknownSection(header.to_string())
                    ),
                });
                continue;
            }
            let (key, value) = text.split_once('=')
                .ok_or(ModelParseError::MalformedLine { line })?;
            let (key, value) = (key.trim(), value.trim());
            match (section, key) {
                (Some("request_definition"), "r") => {
                    if request.replace(Self::parse_request(value)?).is_some() {
                        return Err(ModelParseError::DuplicateSection(
                            "request_definition"
                        ));
                    }
                }
                (Some("policy_definition"), "p") => {
                    if policy.replace(Self::parse_policy(value)?).is_some() {
                        return Err(ModelParseError::DuplicateSection(
                            "policy_definition"
                        ));
                    }
                }
                (Some("role_definition"), "g") => {
                    if !value.split(',')
                        .map(str::trim)
                        .eq(["_", "_"])
                    {
                        return Err(ModelParseError::BadDefinition {
                            section: "role_definition",
                            value: value.to_string(),
                        });
                    }
                    if role_definition.replace(()).is_some() {
                        return Err(ModelParseError::DuplicateSection(
                            "role_definition"
                        ));
                    }
                }
                (Some("policy_effect"), "e") => {
                    if effect.replace(value.to_string()).is_some() {
                        return Err(ModelParseError::DuplicateSection(
                            "policy_effect"
                        ));
                    }
                }
                (Some("matchers"), "m") => {
                    if matcher.replace(value.to_string()).is_some() {
                        return Err(ModelParseError::DuplicateSection(
                            "matchers"
                        ));
                    }
                }
                _ => return Err(ModelParseError::MalformedLine { line }),
            }
        }

        let request = request
            .ok_or(ModelParseError::MissingSection("request_definition"))?;
        let (policy, eft_index) = policy
            .ok_or(ModelParseError::MissingSection("policy_definition"))?;
        let effect = effect
            .ok_or(ModelParseError::MissingSection("policy_effect"))?;
        let matcher = matcher
            .ok_or(ModelParseError::MissingSection("matchers"))?;
        let role_definition = role_definition.is_some();
        let effect = Self::parse_effect(&effect)?;
        let matcher = Self::compile_matcher(
            &matcher,
            &request,
            &policy,
            role_definition,
        )?;
        Ok(Self {
            request,
            policy,
            eft_index,
            role_definition,
            matcher,
            effect,
        })
    }

    fn parse_request(value: &str) -> Result<Vec<String>, ModelParseError> {
        let fields = value.split(',')
            .map(str::trim)
            .map(str::to_string)
            .collect::<Vec<_>>();
        // requests are (subject, object, action) shaped; only the
        // field names are declarative
        if fields.len() != 3 || fields.iter().any(|field| field.is_empty()) {
            return Err(ModelParseError::BadDefinition {
                section: "request_definition",
                value: value.to_string(),
            });
        }
        Ok(fields)
    }

    fn parse_policy(
        value: &str,
    ) -> Result<(Vec<String>, Option<usize>), ModelParseError> {
        let mut fields = Vec::new();
        let mut eft_index = None;
        for (idx, field) in value.split(',').map(str::trim).enumerate() {
            if field == "eft" {
                if eft_index.replace(idx).is_some() {
                    return Err(ModelParseError::BadDefinition {
                        section: "policy_definition",
                        value: value.to_string(),
                    });
                }
            } else if field.is_empty() {
                return Err(ModelParseError::BadDefinition {
                    section: "policy_definition",
                    value: value.to_string(),
                });
            } else {
                fields.push(field.to_string());
            }
        }
        if fields.is_empty() {
            return Err(ModelParseError::BadDefinition {
                section: "policy_definition",
                value: value.to_string(),
            });
        }
        Ok((fields, eft_index))
    }

    fn parse_effect(value: &str) -> Result<EffectPolicy, ModelParseError> {
        match value {
            "some(where (p.eft == allow))" =>
                Ok(EffectPolicy::AllowOverride),
            "!some(where (p.eft == deny))" =>
                Ok(EffectPolicy::DenyOverride),
            "some(where (p.eft == allow)) && !some(where (p.eft == deny))" =>
                Ok(EffectPolicy::AllowAndDeny),
            value => Err(ModelParseError::UnsupportedEffect(value.to_string())),
        }
    }

    fn compile_matcher(
        src: &str,
        request: &[String],
        policy: &[String],
        role_definition: bool,
    ) -> Result<Vec<MatchTerm>, ModelParseError> {
        let mut terms = Vec::new();
        for term in src.split("&&").map(str::trim) {
            if let Some(args) = term
                .strip_prefix("g(")
                .and_then(|term| term.strip_suffix(')'))
            {
                if !role_definition {
                    return Err(ModelParseError::MissingRoleDefinition);
                }
                let (lhs, rhs) = args.split_once(',')
                    .ok_or_else(|| ModelParseError::UnsupportedMatcher(
                        term.to_string()
                    ))?;
                terms.push(MatchTerm::Group(
                    Self::parse_operand(lhs.trim(), request, policy)?,
                    Self::parse_operand(rhs.trim(), request, policy)?,
                ));
            } else if let Some((lhs, rhs)) = term.split_once("==") {
                terms.push(MatchTerm::Eq(
                    Self::parse_operand(lhs.trim(), request, policy)?,
                    Self::parse_operand(rhs.trim(), request, policy)?,
                ));
            } else {
                return Err(ModelParseError::UnsupportedMatcher(
                    term.to_string()
                ));
            }
        }
        Ok(terms)
    }

    fn parse_operand(
        token: &str,
        request: &[String],
        policy: &[String],
    ) -> Result<Operand, ModelParseError> {
        if let Some(name) = token.strip_prefix("r.") {
            return request.iter()
                .position(|field| field == name)
                .map(Operand::Request)
                .ok_or_else(|| ModelParseError::UnknownOperand(
                    token.to_string()
                ));
        }
        if let Some(name) = token.strip_prefix("p.") {
            return policy.iter()
                .position(|field| field == name)
                .map(Operand::Policy)
                .ok_or_else(|| ModelParseError::UnknownOperand(
                    token.to_string()
                ));
        }
        token
            .strip_prefix('"')
            .and_then(|token| token.strip_suffix('"'))
            .map(|literal| Operand::Literal(literal.to_string()))
            .ok_or_else(|| ModelParseError::UnknownOperand(token.to_string()))
    }

    pub fn request_fields(&self) -> &[String] {
        &self.request
    }

    /// The policy value fields, with the effect field (if any) split
    /// out; see [`eft_index`](Self::eft_index).
    pub fn policy_fields(&self) -> &[String] {
        &self.policy
    }

    /// Position of the `eft` field within a source policy line, when
    /// the policy definition declares one.
    pub fn eft_index(&self) -> Option<usize> {
        self.eft_index
    }

    pub fn has_role_definition(&self) -> bool {
        self.role_definition
    }

    pub fn matcher(&self) -> &[MatchTerm] {
        &self.matcher
    }

    pub fn effect_policy(&self) -> EffectPolicy {
        self.effect
    }
}
