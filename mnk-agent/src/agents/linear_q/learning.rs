use ndarray::{Array1, Array2, Axis};
use thiserror::Error;
use tracing::trace;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LearnError {
    #[error("no evaluated action to learn from")]
    MissingComputedState,
    #[error("ridge system is singular (lambda = {lambda})")]
    SingularSystem { lambda: f64 },
}

/// Step sizes of one temporal-difference update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TdParams {
    pub alfa: f64,
    pub gamma: f64,
    pub lambda: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TdUpdate {
    pub current: f64,
    pub expected: f64,
}

impl TdUpdate {
    pub fn error(&self) -> f64 {
        self.expected - self.current
    }
}

/// Moves `theta` towards `reward + gamma * future` along the ridge direction
/// of the feature row `x`.
pub fn td_step(
    theta: &mut Array1<f64>,
    x: &Array1<f64>,
    reward: f64,
    future: f64,
    params: TdParams,
) -> Result<TdUpdate, LearnError> {
    let update = TdUpdate {
        current: theta.dot(x),
        expected: reward + params.gamma * future,
    };
    let direction = ridge_direction(x, params.lambda).ok_or(LearnError::SingularSystem {
        lambda: params.lambda,
    })?;

    theta.scaled_add(params.alfa * update.error(), &direction);

    trace!(
        reward,
        future,
        current = update.current,
        expected = update.expected,
        "td update"
    );

    Ok(update)
}

/// Solves `(x xᵀ + lambda I) d = x`.
pub fn ridge_direction(x: &Array1<f64>, lambda: f64) -> Option<Array1<f64>> {
    let column = x.view().insert_axis(Axis(1));
    let system = column.dot(&column.t()) + Array2::<f64>::eye(x.len()) * lambda;

    solve(system, x.clone())
}

/// Gaussian elimination with partial pivoting. `None` when a pivot vanishes
/// relative to the largest entry of `a`.
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Option<Array1<f64>> {
    let n = b.len();
    let scale = a.iter().fold(0.0f64, |max, value| max.max(value.abs()));
    let tolerance = scale * n as f64 * f64::EPSILON;

    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))?;

        if a[[pivot, col]].abs() <= tolerance {
            return None;
        }

        if pivot != col {
            for k in col..n {
                a.swap([col, k], [pivot, k]);
            }
            b.swap(col, pivot);
        }

        for row in col + 1..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }

            for k in col..n {
                let above = a[[col, k]];
                a[[row, k]] -= factor * above;
            }
            let above = b[col];
            b[row] -= factor * above;
        }
    }

    let mut solution = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let tail = (row + 1..n).map(|k| a[[row, k]] * solution[k]).sum::<f64>();
        solution[row] = (b[row] - tail) / a[[row, row]];
    }

    Some(solution)
}
