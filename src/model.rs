use crate::error::Error;
use crate::linalg::dot;
use std::fmt;
use std::str::FromStr;

/// Tolerance used when checking whether an assignment satisfies a constraint.
const TOLERANCE: f64 = 1e-9;

/// An ordered sequence of real coefficients; index `i` belongs to the
/// decision variable `x_i`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinExpr {
    coefs: Vec<f64>,
}

impl LinExpr {
    pub fn new(coefs: Vec<f64>) -> Self {
        Self { coefs }
    }

    pub fn len(&self) -> usize {
        self.coefs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefs.is_empty()
    }

    /// The value of this expression at the assignment `x`.
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        dot(&self.coefs, x)
    }

    pub(crate) fn coef(&self, i: usize) -> f64 {
        self.coefs[i]
    }

    pub(crate) fn coefs(&self) -> &[f64] {
        &self.coefs
    }
}

impl From<Vec<f64>> for LinExpr {
    fn from(coefs: Vec<f64>) -> Self {
        Self::new(coefs)
    }
}

/// Direction of a constraint row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relation {
    LessEq,
    Eq,
    GreaterEq,
}

impl Relation {
    fn holds(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Relation::LessEq => lhs <= rhs + TOLERANCE,
            Relation::Eq => (lhs - rhs).abs() <= TOLERANCE,
            Relation::GreaterEq => lhs >= rhs - TOLERANCE,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::LessEq => write!(f, "<="),
            Relation::Eq => write!(f, "="),
            Relation::GreaterEq => write!(f, ">="),
        }
    }
}

impl FromStr for Relation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<=" | "≤" => Ok(Relation::LessEq),
            "=" => Ok(Relation::Eq),
            ">=" | "≥" => Ok(Relation::GreaterEq),
            other => Err(Error::UnknownRelation(other.to_string())),
        }
    }
}

/// A single row `linexpr · x <relation> rhs`.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    pub(crate) linexpr: LinExpr,
    pub(crate) relation: Relation,
    pub(crate) rhs: f64,
}

impl Constraint {
    pub fn new(linexpr: impl Into<LinExpr>, relation: Relation, rhs: f64) -> Self {
        Self {
            linexpr: linexpr.into(),
            relation,
            rhs,
        }
    }

    pub fn less_than_eq(linexpr: impl Into<LinExpr>, rhs: f64) -> Self {
        Self::new(linexpr, Relation::LessEq, rhs)
    }

    pub fn equal_to(linexpr: impl Into<LinExpr>, rhs: f64) -> Self {
        Self::new(linexpr, Relation::Eq, rhs)
    }

    pub fn greater_than_eq(linexpr: impl Into<LinExpr>, rhs: f64) -> Self {
        Self::new(linexpr, Relation::GreaterEq, rhs)
    }

    pub fn coefficients(&self) -> &[f64] {
        self.linexpr.coefs()
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Whether the assignment `x` satisfies this row within tolerance.
    /// `x` must have one entry per decision variable.
    pub fn is_satisfied_by(&self, x: &[f64]) -> bool {
        self.relation.holds(self.linexpr.evaluate(x), self.rhs)
    }

    pub(crate) fn coef(&self, i: usize) -> f64 {
        self.linexpr.coef(i)
    }
}

/// A maximization problem: `maximize objective · x` subject to a non-empty
/// constraint set, with a hard cap on pivot iterations.
///
/// Construction is the validation boundary: a `Problem` that exists is
/// structurally sound, so the pivot loop never re-checks its shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Problem {
    objective: LinExpr,
    constraints: Vec<Constraint>,
    max_iterations: usize,
}

impl Problem {
    /// Build a problem from an objective and structured constraints.
    ///
    /// Fails fast on an empty constraint set, a constraint whose length does
    /// not match the objective, any non-finite coefficient or right-hand
    /// side, and on more constraints than variables (pricing reads the
    /// solution entry of each constraint row, so extra rows would have no
    /// entry to read).
    pub fn new(
        objective: impl Into<LinExpr>,
        constraints: Vec<Constraint>,
        max_iterations: usize,
    ) -> Result<Self, Error> {
        let objective = objective.into();

        if constraints.is_empty() {
            return Err(Error::NoConstraints);
        }
        ensure_finite(objective.coefs(), "the objective")?;

        let expected = objective.len();
        for (index, constraint) in constraints.iter().enumerate() {
            let found = constraint.linexpr.len();
            if found != expected {
                return Err(Error::DimensionMismatch {
                    index,
                    expected,
                    found,
                });
            }
            ensure_finite(constraint.linexpr.coefs(), &format!("constraint {index}"))?;
            if !constraint.rhs.is_finite() {
                return Err(Error::NonFinite {
                    context: format!("the right-hand side of constraint {index}"),
                });
            }
        }

        if constraints.len() > expected {
            return Err(Error::TooManyConstraints {
                constraints: constraints.len(),
                variables: expected,
            });
        }

        Ok(Self {
            objective,
            constraints,
            max_iterations,
        })
    }

    /// Build a problem from the parallel-array form: one coefficient row and
    /// one right-hand side per constraint, every row read as a `<=` row.
    pub fn from_rows(
        objective: Vec<f64>,
        rows: Vec<Vec<f64>>,
        rhs: Vec<f64>,
        max_iterations: usize,
    ) -> Result<Self, Error> {
        if rows.len() != rhs.len() {
            return Err(Error::RhsMismatch {
                rows: rows.len(),
                rhs: rhs.len(),
            });
        }
        let constraints = rows
            .into_iter()
            .zip(rhs)
            .map(|(row, b)| Constraint::less_than_eq(row, b))
            .collect();
        Self::new(objective, constraints, max_iterations)
    }

    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Whether `x` satisfies every constraint within tolerance. The solver
    /// never calls this on the caller's seed; it is offered so front-ends
    /// can enforce the feasible-seed precondition themselves.
    pub fn is_feasible(&self, x: &[f64]) -> bool {
        self.constraints.iter().all(|c| c.is_satisfied_by(x))
    }

    pub(crate) fn objective(&self) -> &LinExpr {
        &self.objective
    }

    pub(crate) fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub(crate) fn max_iterations(&self) -> usize {
        self.max_iterations
    }
}

pub(crate) fn ensure_finite(values: &[f64], context: &str) -> Result<(), Error> {
    match values.iter().all(|v| v.is_finite()) {
        true => Ok(()),
        false => Err(Error::NonFinite {
            context: context.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_parsing() {
        assert_eq!("<=".parse::<Relation>().unwrap(), Relation::LessEq);
        assert_eq!("≤".parse::<Relation>().unwrap(), Relation::LessEq);
        assert_eq!("=".parse::<Relation>().unwrap(), Relation::Eq);
        assert_eq!(">=".parse::<Relation>().unwrap(), Relation::GreaterEq);
        assert_eq!(" ≥ ".parse::<Relation>().unwrap(), Relation::GreaterEq);
        assert_eq!(
            "<".parse::<Relation>().unwrap_err(),
            Error::UnknownRelation("<".to_string())
        );
    }

    #[test]
    fn test_relation_display() {
        assert_eq!(Relation::LessEq.to_string(), "<=");
        assert_eq!(Relation::Eq.to_string(), "=");
        assert_eq!(Relation::GreaterEq.to_string(), ">=");
    }

    #[test]
    fn test_constraint_satisfaction() {
        let le = Constraint::less_than_eq(vec![1.0, 2.0], 6.0);
        assert!(le.is_satisfied_by(&[0.0, 3.0]));
        assert!(le.is_satisfied_by(&[6.0, -12.0]));
        assert!(!le.is_satisfied_by(&[7.0, 0.0]));

        let eq = Constraint::equal_to(vec![1.0, 2.0], 6.0);
        assert!(eq.is_satisfied_by(&[0.0, 3.0]));
        assert!(!eq.is_satisfied_by(&[0.0, 0.0]));

        let ge = Constraint::greater_than_eq(vec![1.0, 2.0], 6.0);
        assert!(ge.is_satisfied_by(&[7.0, 0.0]));
        assert!(!ge.is_satisfied_by(&[0.0, 0.0]));
    }

    #[test]
    fn test_empty_constraint_set_is_rejected() {
        let result = Problem::new(vec![1.0, 2.0], vec![], 10);
        assert_eq!(result.unwrap_err(), Error::NoConstraints);
        assert_eq!(
            Error::NoConstraints.to_string(),
            "the problem has no constraints"
        );
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let constraints = vec![
            Constraint::less_than_eq(vec![1.0, 2.0], 6.0),
            Constraint::less_than_eq(vec![1.0], 3.0),
        ];
        let result = Problem::new(vec![2.0, 3.0], constraints, 10);
        assert_eq!(
            result.unwrap_err(),
            Error::DimensionMismatch {
                index: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_non_finite_values_are_rejected() {
        let result = Problem::new(
            vec![f64::NAN, 3.0],
            vec![Constraint::less_than_eq(vec![1.0, 2.0], 6.0)],
            10,
        );
        assert_eq!(
            result.unwrap_err(),
            Error::NonFinite {
                context: "the objective".to_string()
            }
        );

        let result = Problem::new(
            vec![2.0, 3.0],
            vec![Constraint::less_than_eq(vec![1.0, f64::INFINITY], 6.0)],
            10,
        );
        assert_eq!(
            result.unwrap_err(),
            Error::NonFinite {
                context: "constraint 0".to_string()
            }
        );

        let result = Problem::new(
            vec![2.0, 3.0],
            vec![Constraint::less_than_eq(vec![1.0, 2.0], f64::NAN)],
            10,
        );
        assert_eq!(
            result.unwrap_err(),
            Error::NonFinite {
                context: "the right-hand side of constraint 0".to_string()
            }
        );
    }

    #[test]
    fn test_excess_constraints_are_rejected() {
        let constraints = vec![
            Constraint::less_than_eq(vec![1.0, 0.0], 1.0),
            Constraint::less_than_eq(vec![0.0, 1.0], 1.0),
            Constraint::less_than_eq(vec![1.0, 1.0], 1.0),
        ];
        let result = Problem::new(vec![1.0, 1.0], constraints, 10);
        assert_eq!(
            result.unwrap_err(),
            Error::TooManyConstraints {
                constraints: 3,
                variables: 2
            }
        );
    }

    #[test]
    fn test_from_rows() {
        let problem = Problem::from_rows(
            vec![2.0, 3.0],
            vec![vec![1.0, 2.0]],
            vec![6.0],
            10,
        )
        .unwrap();
        assert_eq!(problem.num_variables(), 2);
        assert_eq!(problem.num_constraints(), 1);
        assert_eq!(problem.constraints()[0].coefficients(), &[1.0, 2.0]);
        assert_eq!(problem.constraints()[0].relation(), Relation::LessEq);
        assert_eq!(problem.constraints()[0].rhs(), 6.0);
    }

    #[test]
    fn test_from_rows_rhs_mismatch() {
        let result = Problem::from_rows(vec![2.0, 3.0], vec![vec![1.0, 2.0]], vec![], 10);
        assert_eq!(result.unwrap_err(), Error::RhsMismatch { rows: 1, rhs: 0 });
    }

    #[test]
    fn test_feasibility_check() {
        let problem = Problem::from_rows(
            vec![1.0, 1.0],
            vec![vec![2.0, 1.0], vec![1.0, 3.0]],
            vec![4.0, 6.0],
            10,
        )
        .unwrap();
        assert!(problem.is_feasible(&[0.0, 0.0]));
        assert!(problem.is_feasible(&[1.0, 1.0]));
        assert!(!problem.is_feasible(&[3.0, 0.0]));
    }

    #[test]
    fn test_evaluate() {
        let objective = LinExpr::new(vec![2.0, 3.0]);
        assert_eq!(objective.evaluate(&[1.0, 2.0]), 8.0);
        assert_eq!(objective.evaluate(&[0.0, 0.0]), 0.0);
    }
}
