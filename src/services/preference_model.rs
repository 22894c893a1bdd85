use ndarray::{aview1, s, Array1, Array2, Axis};

use crate::{
    error::{AppError, AppResult},
    models::TrainingExample,
};

/// Optimizer settings for [`PreferenceModel::fit`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// L2 penalty on every parameter, intercept included, so single-class
    /// histories still converge to finite values
    pub l2_penalty: f64,
    pub max_iterations: usize,
    /// Stop once the largest parameter update falls below this
    pub tolerance: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            l2_penalty: 1.0,
            max_iterations: 100,
            tolerance: 1e-8,
        }
    }
}

/// Learned logistic parameters
#[derive(Debug, Clone, PartialEq)]
struct Parameters {
    intercept: f64,
    weights: Array1<f64>,
}

impl Parameters {
    fn decision(&self, features: &[f64]) -> f64 {
        self.intercept + self.weights.dot(&aview1(features))
    }
}

/// Binary logistic classifier predicting whether a restaurant will be liked
///
/// Fitted by Newton-Raphson (IRLS) on the L2-penalized log-likelihood, with rating and price
/// left unscaled. Each `fit` starts from zero and replaces all previous parameters, so results
/// only depend on the training set and the [`FitOptions`].
#[derive(Debug, Clone, Default)]
pub struct PreferenceModel {
    options: FitOptions,
    params: Option<Parameters>,
}

impl PreferenceModel {
    pub fn new(options: FitOptions) -> Self {
        Self {
            options,
            params: None,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.params.is_some()
    }

    /// Number of input features the fitted model expects
    pub fn n_features(&self) -> AppResult<usize> {
        self.fitted().map(|p| p.weights.len())
    }

    pub fn fit(&mut self, examples: &[TrainingExample]) -> AppResult<()> {
        let rows: Vec<Vec<f64>> = examples.iter().map(TrainingExample::features).collect();

        let Some(first) = rows.first() else {
            return Err(AppError::InvalidInput(
                "Cannot train on an empty history".to_string(),
            ));
        };
        let n_features = first.len();
        if rows.iter().any(|x| x.len() != n_features) {
            return Err(AppError::InvalidInput(
                "Training examples have inconsistent feature widths".to_string(),
            ));
        }

        // column 0 is the constant intercept input
        let dim = n_features + 1;
        let mut design = Array2::<f64>::ones((rows.len(), dim));
        for (i, x) in rows.iter().enumerate() {
            design.slice_mut(s![i, 1..]).assign(&aview1(x));
        }
        let labels: Array1<f64> = examples
            .iter()
            .map(|e| if e.liked { 1.0 } else { 0.0 })
            .collect();

        let penalty = self.options.l2_penalty;
        let mut theta = Array1::<f64>::zeros(dim);
        let mut iterations = 0;

        for _ in 0..self.options.max_iterations {
            iterations += 1;

            let p = design.dot(&theta).mapv_into(sigmoid);
            let weights = p.mapv(|p| p * (1.0 - p));

            let mut gradient = design.t().dot(&(&labels - &p));
            gradient.scaled_add(-penalty, &theta);

            let weighted = &design * &weights.insert_axis(Axis(1));
            let mut hessian = design.t().dot(&weighted);
            hessian.diag_mut().mapv_inplace(|h| h + penalty);

            let step = solve(hessian, gradient).ok_or_else(|| {
                AppError::Internal("Preference model Hessian is singular".to_string())
            })?;

            theta += &step;
            let largest = step.iter().fold(0.0_f64, |m, s| m.max(s.abs()));
            if largest < self.options.tolerance {
                break;
            }
        }

        tracing::debug!(
            examples = rows.len(),
            features = n_features,
            iterations,
            intercept = theta[0],
            "Preference model fitted"
        );

        self.params = Some(Parameters {
            intercept: theta[0],
            weights: theta.slice(s![1..]).to_owned(),
        });

        Ok(())
    }

    /// Raw linear score before the logistic link
    pub fn decision_function(&self, features: &[f64]) -> AppResult<f64> {
        let params = self.fitted()?;
        if features.len() != params.weights.len() {
            return Err(AppError::InvalidInput(format!(
                "Expected {} features, got {}",
                params.weights.len(),
                features.len()
            )));
        }
        Ok(params.decision(features))
    }

    /// Probability that the user likes a restaurant with these features
    pub fn predict_probability(&self, features: &[f64]) -> AppResult<f64> {
        self.decision_function(features).map(sigmoid)
    }

    pub fn predict_label(&self, features: &[f64]) -> AppResult<bool> {
        self.predict_probability(features).map(|p| p >= 0.5)
    }

    fn fitted(&self) -> AppResult<&Parameters> {
        self.params.as_ref().ok_or(AppError::ModelNotTrained)
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Solves `a * x = b` by Gaussian elimination with partial pivoting
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Option<Array1<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot = (col..n).max_by(|&r, &q| a[[r, col]].abs().total_cmp(&a[[q, col]].abs()))?;
        if a[[pivot, col]].abs() < 1e-12 {
            return None;
        }
        if pivot != col {
            for k in 0..n {
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
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let tail = a.slice(s![row, row + 1..]).dot(&x.slice(s![row + 1..]));
        x[row] = (b[row] - tail) / a[[row, row]];
    }
    Some(x)
}
