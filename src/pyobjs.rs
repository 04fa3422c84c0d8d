use crate::error::Error;
use crate::model::{Constraint, Problem, Relation};
use crate::simplex::{Simplex, Solution};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

pyo3::import_exception!(simplex.exceptions, UnboundedError);
pyo3::import_exception!(simplex.exceptions, IterationLimitError);

#[pyclass(module = "simplex.rust")]
#[derive(Clone)]
pub(crate) struct PyConstraint {
    pub(crate) constraint: Constraint,
}

#[pymethods]
impl PyConstraint {
    #[new]
    #[pyo3(signature = (*, coefficients, relation, rhs))]
    fn new(coefficients: Vec<f64>, relation: &str, rhs: f64) -> PyResult<Self> {
        let relation = relation
            .parse::<Relation>()
            .map_err(|err| PyValueError::new_err(err.to_string()))?;
        Ok(Self {
            constraint: Constraint::new(coefficients, relation, rhs),
        })
    }
}

#[pyclass(module = "simplex.rust")]
pub(crate) struct PySolution {
    #[pyo3(get)]
    objective_value: f64,
    #[pyo3(get)]
    solution: Vec<f64>,
}

impl From<Solution> for PySolution {
    fn from(solution: Solution) -> Self {
        Self {
            objective_value: solution.objective_value,
            solution: solution.x,
        }
    }
}

#[pyfunction]
pub(crate) fn solve(
    objective: Vec<f64>,
    constraints: Vec<PyConstraint>,
    initial_solution: Vec<f64>,
    max_iterations: usize,
) -> PyResult<PySolution> {
    let constraints = constraints.into_iter().map(|c| c.constraint).collect();
    let problem = Problem::new(objective, constraints, max_iterations)
        .map_err(|err| PyValueError::new_err(err.to_string()))?;
    Simplex::new(problem, &initial_solution)
        .map_err(|err| PyValueError::new_err(err.to_string()))?
        .solve()
        .map(PySolution::from)
        .map_err(|err| match err {
            Error::Unbounded => UnboundedError::new_err("the objective is unbounded"),
            Error::IterationLimit(limit) => {
                IterationLimitError::new_err(format!("no optimum found within {limit} iterations"))
            }
            other => PyValueError::new_err(other.to_string()),
        })
}
