use gkcore::{
    model::{EffectPolicy, MatchTerm, Model, Operand},
    policy::{Effect, Rule, Store},
};

/// Walk every rule in the store against the model's matcher and
/// combine the effects of the firing rules per the model's effect
/// policy.  A request no rule determines yields `false`.
pub(crate) fn evaluate(
    model: &Model,
    store: &Store,
    sub: &str,
    obj: &str,
    act: &str,
) -> bool {
    let request = [sub, obj, act];
    let mut fired = false;
    let mut allowed = false;
    let mut denied = false;
    for rule in store.rules_for(|rule| fires(model, store, &request, rule)) {
        fired = true;
        match rule.effect {
            Effect::Allow => allowed = true,
            Effect::Deny => denied = true,
        }
    }
    match model.effect_policy() {
        EffectPolicy::AllowOverride => allowed,
        // unlike the usual deny-override reading, zero firing rules
        // still denies: an enforcer that cannot determine permission
        // must fail closed
        EffectPolicy::DenyOverride => fired && !denied,
        EffectPolicy::AllowAndDeny => allowed && !denied,
    }
}

fn fires(model: &Model, store: &Store, request: &[&str; 3], rule: &Rule) -> bool {
    model.matcher().iter().all(|term| match term {
        MatchTerm::Eq(lhs, rhs) => {
            let left = resolve(lhs, request, rule);
            let right = resolve(rhs, request, rule);
            left == right || wildcard(lhs, left) || wildcard(rhs, right)
        }
        MatchTerm::Group(member, group) => {
            let member = resolve(member, request, rule);
            let target = resolve(group, request, rule);
            wildcard(group, target) || store.in_group(member, target)
        }
    })
}

// a policy-side `*` matches any value in that position
fn wildcard(operand: &Operand, value: &str) -> bool {
    matches!(operand, Operand::Policy(_)) && value == "*"
}

fn resolve<'a>(
    operand: &'a Operand,
    request: &'a [&'a str; 3],
    rule: &'a Rule,
) -> &'a str {
    match operand {
        Operand::Request(idx) => request[*idx],
        // a store is validated against its model's policy shape; the
        // fallback only fires on a mismatched (model, store) pairing,
        // which then fails closed
        Operand::Policy(idx) => rule.fields
            .get(*idx)
            .map(String::as_str)
            .unwrap_or_default(),
        Operand::Literal(literal) => literal.as_str(),
    }
}

#[cfg(test)]
mod test {
    use gkcore::{Model, Store};
    use super::evaluate;

    fn pair(model: &str, policy: &str) -> anyhow::Result<(Model, Store)> {
        let model = Model::parse(model)?;
        let store = Store::parse(policy, &model)?;
        Ok((model, store))
    }

    const EXACT_MODEL: &str = "\
[request_definition]
r = sub, obj, act

[policy_definition]
p = sub, obj, act

[policy_effect]
e = some(where (p.eft == allow))

[matchers]
m = r.sub == p.sub && r.obj == p.obj && r.act == p.act
";

    #[test]
    fn exact_match() -> anyhow::Result<()> {
        let (model, store) = pair(EXACT_MODEL, "\
p, user, obj-content, read
")?;
        assert!(evaluate(&model, &store, "user", "obj-content", "read"));
        assert!(!evaluate(&model, &store, "user", "obj-content", "write"));
        assert!(!evaluate(&model, &store, "user", "obj-account", "read"));
        assert!(!evaluate(&model, &store, "guest", "obj-content", "read"));
        Ok(())
    }

    #[test]
    fn empty_store_fails_closed() -> anyhow::Result<()> {
        let (model, store) = pair(EXACT_MODEL, "")?;
        assert!(!evaluate(&model, &store, "user", "obj-content", "read"));
        Ok(())
    }

    #[test]
    fn wildcard_fields() -> anyhow::Result<()> {
        let (model, store) = pair(EXACT_MODEL, "\
p, manager, *, *
")?;
        assert!(evaluate(&model, &store, "manager", "obj-content", "read"));
        assert!(evaluate(&model, &store, "manager", "obj-account", "close"));
        assert!(!evaluate(&model, &store, "user", "obj-content", "read"));
        // a request-side * is not a wildcard
        assert!(evaluate(&model, &store, "manager", "*", "read"));
        assert!(!evaluate(&model, &store, "*", "obj-content", "read"));
        Ok(())
    }

    #[test]
    fn group_membership() -> anyhow::Result<()> {
        let (model, store) = pair("\
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
", "\
p, staff, obj-account, read
g, clerk, staff
g, intern, clerk
")?;
        // direct, inherited, and transitively inherited
        assert!(evaluate(&model, &store, "staff", "obj-account", "read"));
        assert!(evaluate(&model, &store, "clerk", "obj-account", "read"));
        assert!(evaluate(&model, &store, "intern", "obj-account", "read"));
        assert!(!evaluate(&model, &store, "guest", "obj-account", "read"));
        // membership is directed
        assert!(!evaluate(&model, &store, "staff", "obj-account", "write"));
        Ok(())
    }

    #[test]
    fn deny_subtracts_from_wildcard_allow() -> anyhow::Result<()> {
        let (model, store) = pair("\
[request_definition]
r = sub, obj, act

[policy_definition]
p = sub, obj, act, eft

[policy_effect]
e = some(where (p.eft == allow)) && !some(where (p.eft == deny))

[matchers]
m = r.sub == p.sub && r.obj == p.obj && r.act == p.act
", "\
p, staff, obj-account, *, allow
p, staff, obj-account, close, deny
")?;
        assert!(evaluate(&model, &store, "staff", "obj-account", "read"));
        assert!(evaluate(&model, &store, "staff", "obj-account", "write"));
        assert!(!evaluate(&model, &store, "staff", "obj-account", "close"));
        // a lone deny with no allow also denies
        assert!(!evaluate(&model, &store, "guest", "obj-account", "read"));
        Ok(())
    }

    #[test]
    fn deny_override_fails_closed() -> anyhow::Result<()> {
        let (model, store) = pair("\
[request_definition]
r = sub, obj, act

[policy_definition]
p = sub, obj, act, eft

[policy_effect]
e = !some(where (p.eft == deny))

[matchers]
m = r.sub == p.sub && r.obj == p.obj && r.act == p.act
", "\
p, staff, obj-account, read, allow
p, staff, obj-account, close, deny
")?;
        assert!(evaluate(&model, &store, "staff", "obj-account", "read"));
        assert!(!evaluate(&model, &store, "staff", "obj-account", "close"));
        // nothing fired: denied, not vacuously allowed
        assert!(!evaluate(&model, &store, "guest", "obj-account", "read"));
        Ok(())
    }

    #[test]
    fn literal_operand() -> anyhow::Result<()> {
        let (model, store) = pair(r#"
[request_definition]
r = sub, obj, act

[policy_definition]
p = sub, obj, act

[policy_effect]
e = some(where (p.eft == allow))

[matchers]
m = r.sub == p.sub && r.obj == p.obj && r.act == "read"
"#, "\
p, user, obj-content, read
")?;
        assert!(evaluate(&model, &store, "user", "obj-content", "read"));
        assert!(!evaluate(&model, &store, "user", "obj-content", "write"));
        Ok(())
    }
}
