use crate::error::Error;
use crate::model::{ensure_finite, Problem};
use log::debug;

/// Solver state. `Running` means a pivot was applied and another pass is
/// needed; the other three states are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Running,
    Optimal,
    Unbounded,
    IterationLimitExceeded,
}

/// Snapshot handed to the iteration observer once per pass, after the
/// reduced costs are recomputed and before the optimality check acts.
pub struct Iteration<'a> {
    pub index: usize,
    pub solution: &'a [f64],
    pub reduced_costs: &'a [f64],
}

type Observer = Box<dyn FnMut(Iteration<'_>)>;

/// Optimal value and the assignment that attains it.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub objective_value: f64,
    pub x: Vec<f64>,
}

/// Simplex iteration with reduction relative to the centre of the simplex.
///
/// Unlike a tableau method, a pivot here rewrites only the solution vector;
/// the constraint rows are never row-reduced. The caller must seed the
/// solver with a feasible point, and the iteration cap is the only guard
/// against cycling.
pub struct Simplex {
    problem: Problem,
    solution: Vec<f64>,
    iteration: usize,
    observer: Option<Observer>,
}

impl std::fmt::Debug for Simplex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simplex")
            .field("problem", &self.problem)
            .field("solution", &self.solution)
            .field("iteration", &self.iteration)
            .field("observer", &self.observer.as_ref().map(|_| "..."))
            .finish()
    }
}

impl Simplex {
    /// Clone the caller's seed and take ownership of the problem. The seed
    /// must have one entry per decision variable and be finite throughout;
    /// its feasibility is the caller's responsibility and is not checked.
    pub fn new(problem: Problem, initial_solution: &[f64]) -> Result<Self, Error> {
        let expected = problem.num_variables();
        if initial_solution.len() != expected {
            return Err(Error::SeedDimensionMismatch {
                expected,
                found: initial_solution.len(),
            });
        }
        ensure_finite(initial_solution, "the initial solution")?;

        Ok(Self {
            problem,
            solution: initial_solution.to_vec(),
            iteration: 0,
            observer: None,
        })
    }

    /// Register a callback invoked once per pass with the current state.
    pub fn with_observer(mut self, observer: impl FnMut(Iteration<'_>) + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Run the pivot loop to a terminal state.
    pub fn solve(mut self) -> Result<Solution, Error> {
        match self.run() {
            Status::Optimal => Ok(Solution {
                objective_value: self.problem.objective().evaluate(&self.solution),
                x: self.solution,
            }),
            Status::Unbounded => Err(Error::Unbounded),
            Status::IterationLimitExceeded => {
                Err(Error::IterationLimit(self.problem.max_iterations()))
            }
            Status::Running => unreachable!("run() only returns terminal states"),
        }
    }

    fn run(&mut self) -> Status {
        while self.iteration < self.problem.max_iterations() {
            match self.step() {
                Status::Running => self.iteration += 1,
                status => return status,
            }
        }
        Status::IterationLimitExceeded
    }

    /// One pass: price the variables, stop on optimality or unboundedness,
    /// otherwise pivot.
    fn step(&mut self) -> Status {
        let costs = self.reduced_costs();
        self.observe(&costs);

        let entering = match costs.iter().position(|&c| c < 0.0) {
            None => {
                debug!("iteration {}: all reduced costs non-negative", self.iteration);
                return Status::Optimal;
            }
            Some(i) => i,
        };

        match self.ratio_test(entering) {
            None => {
                debug!(
                    "iteration {}: no positive coefficient in column {entering}",
                    self.iteration
                );
                Status::Unbounded
            }
            Some((leaving, min_ratio)) => {
                debug!(
                    "iteration {}: entering x{entering}, leaving row {leaving}, ratio {min_ratio}",
                    self.iteration
                );
                self.pivot(entering, leaving, min_ratio);
                Status::Running
            }
        }
    }

    /// `c[i] = sum_j constraints[j].coefficients[i] * solution[j] - objective[i]`,
    /// rebuilt from the current solution each pass; nothing is carried over.
    fn reduced_costs(&self) -> Vec<f64> {
        let n = self.problem.num_variables();
        let mut costs = Vec::with_capacity(n);
        for i in 0..n {
            let activity = self
                .problem
                .constraints()
                .iter()
                .zip(&self.solution)
                .map(|(constraint, weight)| constraint.coef(i) * weight)
                .sum::<f64>();
            costs.push(activity - self.problem.objective().coef(i));
        }
        costs
    }

    /// Minimum-ratio test over rows with a positive coefficient in the
    /// entering column; strict `<` keeps the lowest row index on ties.
    fn ratio_test(&self, entering: usize) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (row, constraint) in self.problem.constraints().iter().enumerate() {
            let coefficient = constraint.coef(entering);
            if coefficient > 0.0 {
                let ratio = constraint.rhs() / coefficient;
                if best.map_or(true, |(_, min_ratio)| ratio < min_ratio) {
                    best = Some((row, ratio));
                }
            }
        }
        best
    }

    /// Reduce the whole solution vector along the leaving row, then fix the
    /// basis exchange: the leaving row's entry drops to zero and the
    /// entering variable takes the winning ratio. The entering assignment
    /// is applied last and wins when the two indices coincide.
    fn pivot(&mut self, entering: usize, leaving: usize, min_ratio: f64) {
        let pivot_element = self.problem.constraints()[leaving].coef(entering);
        for i in 0..self.solution.len() {
            let step = self.problem.constraints()[leaving].coef(i) / pivot_element * min_ratio;
            self.solution[i] -= step;
        }
        self.solution[leaving] = 0.0;
        self.solution[entering] = min_ratio;
    }

    fn observe(&mut self, costs: &[f64]) {
        if let Some(observer) = &mut self.observer {
            observer(Iteration {
                index: self.iteration,
                solution: &self.solution,
                reduced_costs: costs,
            });
        }
    }
}

/// Single-call entry point: validate the seed, run to a terminal state.
pub fn solve(problem: Problem, initial_solution: &[f64]) -> Result<Solution, Error> {
    Simplex::new(problem, initial_solution)?.solve()
}
