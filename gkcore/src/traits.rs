/// The decision seam consumed by calling code, e.g. an authorization
/// middleware that resolved the subject from a session and the object
/// and action from the requested route.
pub trait Enforce {
    /// Whether `sub` may perform `act` on `obj`.  Never errors at
    /// runtime: a request no rule determines is denied.
    fn enforce(&self, sub: &str, obj: &str, act: &str) -> bool;
}
