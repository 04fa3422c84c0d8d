mod error;
mod linalg;
mod model;
#[cfg(feature = "python")]
mod pyobjs;
mod simplex;

pub use crate::error::Error;
pub use crate::model::{Constraint, LinExpr, Problem, Relation};
pub use crate::simplex::{solve, Iteration, Simplex, Solution};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn rust(_: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add_class::<pyobjs::PyConstraint>()?;
    m.add_class::<pyobjs::PySolution>()?;
    m.add_function(wrap_pyfunction!(pyobjs::solve, m)?)?;
    Ok(())
}
