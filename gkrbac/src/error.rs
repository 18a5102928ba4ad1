use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Model(#[from] gkcore::error::ModelParseError),
    #[error(transparent)]
    Policy(#[from] gkcore::error::PolicyParseError),
}
