use loopir_core::IrError;
use loopir_parser::ParseError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error(transparent)]
    Syntax(#[from] ParseError),

    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("Empty expression after `;`")]
    EmptyExpression,

    #[error("Literal {0} does not fit in a 64-bit signed integer")]
    LiteralOutOfRange(u64),

    #[error("IR builder error: {0}")]
    Builder(String),

    #[error("Verification error: {0}")]
    Verification(String),
}

impl From<IrError> for TransformError {
    fn from(err: IrError) -> Self {
        match err {
            IrError::VerificationError { .. } => TransformError::Verification(err.to_string()),
            other => TransformError::Builder(other.to_string()),
        }
    }
}
