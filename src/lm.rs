use faer::{
    mat::AsMatRef,
    solvers::{SpSolver, Svd},
    Mat, MatRef, Side,
};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};
use tracing::warn;

use crate::FitError;

/// Confidence level for coefficient intervals.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

#[derive(Debug, Clone)]
pub struct Coef {
    label: String,
    coef: f64,
    std_err: f64,
    t: f64,
    p: f64,
    ci_lower: f64,
    ci_upper: f64,
}

impl Coef {
    fn new(
        label: impl ToString,
        coef: f64,
        std_err: f64,
        t: f64,
        p: f64,
        ci_lower: f64,
        ci_upper: f64,
    ) -> Self {
        Coef {
            label: label.to_string(),
            coef,
            std_err,
            t,
            p,
            ci_lower,
            ci_upper,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn coef(&self) -> f64 {
        self.coef
    }

    pub fn std_err(&self) -> f64 {
        self.std_err
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn ci_lower(&self) -> f64 {
        self.ci_lower
    }

    pub fn ci_upper(&self) -> f64 {
        self.ci_upper
    }
}

/// An ordinary least squares fit of `y` against one or more predictor
/// columns plus an intercept, with the usual summary statistics.
#[derive(Debug, Clone)]
pub struct Lm {
    // the last element is the intercept
    coefs: Vec<Coef>,
    r2: f64,
    adj_r2: f64,
    residual_std_err: f64,
    f_statistic: f64,
    f_pvalue: f64,
    n: u64,
    m: u64,
}

impl Lm {
    /// Fit `ys ~ xs` with an intercept term appended to the predictors.
    ///
    /// `colnames` labels the predictor columns in the summary output.
    /// All values must be finite; rows with missing data are rejected, not
    /// dropped.
    pub fn fit(
        xs: MatRef<'_, f64>,
        ys: &[f64],
        colnames: Option<&[&str]>,
    ) -> Result<Self, FitError> {
        let ncols = xs.ncols();
        if ys.is_empty() {
            return Err(FitError::EmptyInput { field: "y" });
        }
        if ncols == 0 || xs.nrows() == 0 {
            return Err(FitError::EmptyInput { field: "x" });
        }
        if xs.nrows() != ys.len() {
            return Err(FitError::DimensionMismatch {
                y_len: ys.len(),
                x_rows: xs.nrows(),
            });
        }
        if ys.len() <= ncols + 1 {
            return Err(FitError::InsufficientData {
                rows: ys.len(),
                cols: ncols,
            });
        }
        for (i, y) in ys.iter().enumerate() {
            if !y.is_finite() {
                return Err(FitError::NonFinite { field: "y", row: i });
            }
        }

        let mut x = xs.to_owned();
        x.resize_with(
            xs.nrows(),
            ncols + 1,
            #[inline(always)]
            |_, _| 1.0,
        );
        for j in 0..ncols {
            for i in 0..ys.len() {
                if !x[(i, j)].is_finite() {
                    return Err(FitError::NonFinite { field: "x", row: i });
                }
            }
        }

        let y: MatRef<'_, f64> = faer::mat::from_column_major_slice(ys, ys.len(), 1);
        let c_all = x.transpose() * y;
        let c_matrix = x.transpose() * &x;
        let (betas, xtx_inv) = match c_matrix.cholesky(Side::Lower) {
            Ok(chol) => (
                chol.solve(c_all),
                chol.solve(Mat::<f64>::identity(ncols + 1, ncols + 1)),
            ),
            Err(_) => {
                warn!("cross-product matrix is not positive definite, using pseudo inverse");
                let inv = Svd::new(c_matrix.as_mat_ref()).pseudoinverse();
                let betas = inv.as_mat_ref() * c_all.as_mat_ref();
                (betas, inv)
            },
        };
        let betas = betas.col(0).try_as_slice().unwrap();
        let intercept = betas[ncols];
        let predicted = (0..ys.len())
            .map(|i| intercept + (0..ncols).map(|j| betas[j] * x[(i, j)]).sum::<f64>())
            .collect::<Vec<_>>();

        let n = ys.len() as f64;
        let m = ncols as f64;
        let df = n - m - 1.0;
        let mean = ys.iter().sum::<f64>() / n;
        let mut rss = 0.0;
        let mut tss = 0.0;
        for (y, p) in ys.iter().zip(predicted.iter()) {
            rss += (y - p).powi(2);
            tss += (y - mean).powi(2);
        }
        let r2 = 1.0 - rss / tss;
        let adj_r2 = 1.0 - (1.0 - r2) * (n - 1.0) / (n - m - 1.0);
        let sigma2 = rss / df;

        let t_distr = StudentsT::new(0.0, 1.0, df).unwrap();
        let t_crit = t_distr.inverse_cdf(1.0 - (1.0 - CONFIDENCE_LEVEL) / 2.0);
        let coef_with_label = |label: String, coef: f64, j: usize| {
            let std_err = (xtx_inv[(j, j)] * sigma2).sqrt();
            let t = coef / std_err;
            let p = if t.is_finite() {
                2.0 * (1.0 - t_distr.cdf(t.abs()))
            } else {
                0.0
            };
            Coef::new(
                label,
                coef,
                std_err,
                t,
                p,
                coef - t_crit * std_err,
                coef + t_crit * std_err,
            )
        };
        let mut coefs = (0..ncols)
            .map(|j| {
                let label = if let Some(colname) = colnames.and_then(|cn| cn.get(j)) {
                    colname.to_string()
                } else {
                    format!("x[{}]", j)
                };
                coef_with_label(label, betas[j], j)
            })
            .collect::<Vec<_>>();
        coefs.push(coef_with_label("(Intercept)".to_string(), intercept, ncols));

        let f_statistic = (r2 / m) / ((1.0 - r2) / df);
        let f_pvalue = if f_statistic.is_finite() {
            1.0 - FisherSnedecor::new(m, df).unwrap().cdf(f_statistic)
        } else {
            0.0
        };

        Ok(Lm {
            coefs,
            r2,
            adj_r2,
            residual_std_err: sigma2.sqrt(),
            f_statistic,
            f_pvalue,
            n: ys.len() as u64,
            m: ncols as u64,
        })
    }

    pub fn slopes(&self) -> &[Coef] {
        &self.coefs[..self.coefs.len() - 1]
    }

    pub fn intercept(&self) -> &Coef {
        &self.coefs[self.coefs.len() - 1]
    }

    pub fn r2(&self) -> f64 {
        self.r2
    }

    pub fn adj_r2(&self) -> f64 {
        self.adj_r2
    }

    pub fn residual_std_err(&self) -> f64 {
        self.residual_std_err
    }

    pub fn f_statistic(&self) -> f64 {
        self.f_statistic
    }

    pub fn f_pvalue(&self) -> f64 {
        self.f_pvalue
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn m(&self) -> u64 {
        self.m
    }

    pub fn df_residual(&self) -> u64 {
        self.n - self.m - 1
    }
}

impl std::fmt::Display for Lm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self
            .coefs
            .iter()
            .map(|c| c.label().len())
            .max()
            .unwrap_or(0);
        let lower = (1.0 - CONFIDENCE_LEVEL) / 2.0;
        writeln!(f, "Coefficients:")?;
        writeln!(
            f,
            "{:<width$}  {:>12} {:>12} {:>9} {:>12} {:>12} {:>12}",
            "",
            "Estimate",
            "Std. Error",
            "t value",
            "Pr(>|t|)",
            format!("[{:.3}", lower),
            format!("{:.3}]", 1.0 - lower),
        )?;
        for coef in std::iter::once(self.intercept()).chain(self.slopes().iter()) {
            writeln!(
                f,
                "{:<width$}  {:>12.6} {:>12.6} {:>9.3} {:>12.4e} {:>12.6} {:>12.6}",
                coef.label(),
                coef.coef(),
                coef.std_err(),
                coef.t(),
                coef.p(),
                coef.ci_lower(),
                coef.ci_upper(),
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "Residual standard error: {:.6} on {} degrees of freedom",
            self.residual_std_err,
            self.df_residual(),
        )?;
        writeln!(
            f,
            "Multiple R-squared: {:.6}, Adjusted R-squared: {:.6}",
            self.r2, self.adj_r2,
        )?;
        writeln!(
            f,
            "F-statistic: {:.4} on {} and {} DF, p-value: {:.4e}",
            self.f_statistic,
            self.m,
            self.df_residual(),
            self.f_pvalue,
        )?;
        Ok(())
    }
}
