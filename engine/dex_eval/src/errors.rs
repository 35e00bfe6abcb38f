//! Error types for the evaluation layer.

use dex_ir::{OpKind, Span};
use dex_parse::ParseError;

/// Failure raised by a function body (builtin or registered).
///
/// Deliberately just a message: function authors report what went wrong,
/// the executor attaches the call's name and source position when it
/// wraps the failure into [`EvalError::Function`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct FunctionError {
    message: String,
}

impl FunctionError {
    pub fn new(message: impl Into<String>) -> Self {
        FunctionError {
            message: message.into(),
        }
    }
}

/// Failure while executing a compiled program.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum EvalError {
    /// An identifier with no value in the caller's bindings.
    #[error("no binding for identifier `{name}` at {span}")]
    UnboundIdentifier { name: String, span: Span },

    /// An instruction needed more stack values than were present. Cannot
    /// happen for parser-produced programs.
    #[error("value stack underflow at {span}")]
    StackUnderflow { span: Span },

    /// The program finished with a value count other than one. Cannot
    /// happen for parser-produced programs; hand-assembled ones must fail
    /// here instead of returning a silently wrong result.
    #[error("program left {leftover} values on the stack, expected exactly 1")]
    StackImbalance { leftover: usize },

    /// Division or modulo with an exactly-zero right operand.
    #[error("division by zero at {span}")]
    DivisionByZero { span: Span },

    /// Arithmetic result outside the decimal type's range.
    #[error("arithmetic overflow in `{op}` at {span}")]
    Overflow { op: OpKind, span: Span },

    /// A unary operator the executor does not implement. Only negation
    /// exists today; anything else is a malformed program.
    #[error("unsupported unary operator `{op}` at {span}")]
    UnsupportedUnary { op: OpKind, span: Span },

    /// A call instruction naming a function the registry does not hold.
    /// Cannot happen for programs compiled against the same registry.
    #[error("unknown function `{name}` at {span}")]
    UnknownFunction { name: String, span: Span },

    /// The function body reported a failure.
    #[error("function `{name}` failed at {span}")]
    Function {
        name: String,
        span: Span,
        #[source]
        source: FunctionError,
    },
}

/// Failure while registering a function.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum RegistrationError {
    #[error("function `{name}` is already registered")]
    AlreadyRegistered { name: String },
}

/// Top-level error returned by [`Evaluator`](crate::Evaluator) operations.
///
/// Compile and evaluation failures carry the original source text for
/// context; the underlying cause stays reachable through `source()`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to compile expression `{expression}`")]
    Compile {
        expression: String,
        #[source]
        source: ParseError,
    },

    #[error("failed to evaluate expression `{expression}`")]
    Eval {
        expression: String,
        #[source]
        source: EvalError,
    },

    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

impl Error {
    /// The compile-stage cause, if this is a compile failure.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Error::Compile { source, .. } => Some(source),
            Error::Eval { .. } | Error::Registration(_) => None,
        }
    }

    /// The evaluation-stage cause, if this is an evaluation failure.
    pub fn eval_error(&self) -> Option<&EvalError> {
        match self {
            Error::Eval { source, .. } => Some(source),
            Error::Compile { .. } | Error::Registration(_) => None,
        }
    }
}
