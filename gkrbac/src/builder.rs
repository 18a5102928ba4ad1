use gkcore::{Model, Store};

use crate::{
    enforcer::Enforcer,
    error::Error,
};

/// The stock RBAC model.
///
/// Requests are (subject, object, action); a rule fires when the
/// subject holds the rule's role through the `g` relation and the
/// object and action match exactly, with `*` in a rule field matching
/// anything.  Any firing rule allows.
pub const DEFAULT_MODEL: &str = "\
[request_definition]
r = sub, obj, act

[policy_definition]
p = sub, obj, act

[role_definition]
g = _, _

[policy_effect]
e = some(where (p.eft == allow))

[matchers]
m = g(r.sub, p.sub) && r.obj == p.obj && r.act == p.act
";

/// Builds a role-based access control [`Enforcer`].
///
/// Methods can be chained in order to set the configuration values.
/// The `Enforcer` is constructed by calling [`build`](Self::build).
///
/// New instances of the builder can be obtained via `Builder::default`
/// or `Builder::new`.  The former provides nothing while the latter
/// provides the default model.
#[derive(Clone, Debug, Default)]
pub struct Builder {
    model: Box<str>,
    policy: Box<str>,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            .. Default::default()
        }
    }

    pub fn model(mut self, val: &str) -> Self {
        self.model = val.into();
        self
    }

    pub fn policy(mut self, val: &str) -> Self {
        self.policy = val.into();
        self
    }

    /// Compile the model, load the policy, and construct the enforcer.
    ///
    /// Malformed input fails here, at load time; no partially loaded
    /// enforcer is ever exposed.
    pub fn build(&self) -> Result<Enforcer, Error> {
        log::trace!("building an enforcer from {} bytes of policy", self.policy.len());
        let model = Model::parse(&self.model)?;
        let store = Store::parse(&self.policy, &model)?;
        Ok(Enforcer::new(model, store))
    }
}

#[cfg(test)]
mod test {
    use gkcore::error::{ModelParseError, PolicyParseError};
    use crate::error::Error;
    use super::*;

    #[test]
    fn empty() {
        // the default builder carries no model at all
        assert!(matches!(
            Builder::default().build(),
            Err(Error::Model(ModelParseError::MissingSection(_))),
        ));
    }

    #[test]
    fn default_model() -> anyhow::Result<()> {
        let enforcer = Builder::new()
            .policy("p, user, obj-content, read\n")
            .build()?;
        assert!(enforcer.enforce("user", "obj-content", "read"));
        assert!(!enforcer.enforce("user", "obj-content", "write"));
        Ok(())
    }

    #[test]
    fn malformed_policy() {
        assert!(matches!(
            Builder::new()
                .policy("p, user, obj-content\n")
                .build(),
            Err(Error::Policy(PolicyParseError::FieldCount {
                line: 1,
                expected: 3,
                found: 2,
            })),
        ));
    }
}
