use thiserror::Error;

#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ModelParseError {
    #[error("missing section [{0}]")]
    MissingSection(&'static str),
    #[error("duplicate section [{0}]")]
    DuplicateSection(&'static str),
    #[error("unknown section [{0}]")]
    UnknownSection(String),
    #[error("malformed model line {line}")]
    MalformedLine { line: usize },
    #[error("bad [{section}] definition: {value}")]
    BadDefinition { section: &'static str, value: String },
    #[error("unknown matcher operand: {0}")]
    UnknownOperand(String),
    #[error("unsupported matcher term: {0}")]
    UnsupportedMatcher(String),
    #[error("unsupported effect expression: {0}")]
    UnsupportedEffect(String),
    #[error("matcher references g but no [role_definition] is declared")]
    MissingRoleDefinition,
}

#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PolicyParseError {
    #[error("policy line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("policy line {line}: unknown effect keyword: {keyword}")]
    UnknownEffect { line: usize, keyword: String },
    #[error("policy line {line}: unknown entry kind: {kind}")]
    UnknownKind { line: usize, kind: String },
}
