use thiserror::Error;

/// Everything that can go wrong in one solver invocation, split between
/// input validation and the two terminal states of the pivot loop.
#[derive(Debug, PartialEq, Error)]
pub enum Error {
    #[error("the problem has no constraints")]
    NoConstraints,
    #[error("constraint {index} has {found} coefficients but the objective has {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("{rows} constraint rows were given {rhs} right-hand sides")]
    RhsMismatch { rows: usize, rhs: usize },
    #[error("the problem has {constraints} constraints but only {variables} variables")]
    TooManyConstraints { constraints: usize, variables: usize },
    #[error("the initial solution has {found} entries but the problem has {expected} variables")]
    SeedDimensionMismatch { expected: usize, found: usize },
    #[error("{context} contains a non-finite value")]
    NonFinite { context: String },
    #[error("unknown relation {0:?}; expected one of <=, =, >=")]
    UnknownRelation(String),
    #[error("the objective is unbounded")]
    Unbounded,
    #[error("no optimum found within {0} iterations")]
    IterationLimit(usize),
}
