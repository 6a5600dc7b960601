//! Local weighted least squares
//!
//! For a query point x₀ the fit is linear in the training responses:
//!
//! ```text
//! ŷ(x₀) = Σᵢ lᵢ(x₀) · yᵢ
//! ```
//!
//! The operator row `l(x₀)` is what gets computed here. It gives the
//! prediction, the standard error (`s·‖l‖`) and, stacked over the training
//! points, the hat matrix used for the exact statistics.
//!
//! Per query:
//! 1. distances to every training point in scaled predictor space
//! 2. bandwidth `h` just past the q-th nearest distance
//! 3. tricube weights `(1 - (d/h)³)³` for `d < h`
//! 4. SVD of `√W·X` with X the local polynomial basis centred on x₀;
//!    `l = e₁ᵀ · V · Σ⁺ · Uᵀ · √W`
//!
//! Tight neighbourhoods often hold only one or two wind speed rows of the
//! grid. The basis terms such a neighbourhood cannot resolve (`a²` over two
//! rows, every `a` term over one) are dropped before the solve, lowest order
//! kept first, so the local fit loses curvature instead of shrinking its
//! intercept. The pseudo-inverse then drops singular values below
//! `1e-10 · σ_max`.

use nalgebra::{DMatrix, DVector};
use windguard_core::{AnalysisError, AnalysisResult};

use crate::config::Degree;

/// Relative singular-value cut-off for the pseudo-inverse
pub(crate) const SINGULAR_CUTOFF: f64 = 1e-10;

/// Relative residual below which a basis term is collinear with the terms
/// already selected
pub(crate) const TERM_CUTOFF: f64 = 1e-6;

/// Widening applied when no distance lies beyond the q-th
const BOUNDARY_WIDENING: f64 = 1.1;

/// Polynomial basis at local coordinates `(a, b)`
pub(crate) fn basis(degree: Degree, a: f64, b: f64, out: &mut [f64]) {
    out[0] = 1.0;
    out[1] = a;
    out[2] = b;
    if degree == Degree::Quadratic {
        out[3] = a * a;
        out[4] = a * b;
        out[5] = b * b;
    }
}

fn tricube(u: f64) -> f64 {
    let t = 1.0 - u * u * u;
    t * t * t
}

/// Neighbourhood bandwidth for `q` points at the given distances
pub(crate) fn bandwidth(distances: &[f64], q: usize, span: f64) -> f64 {
    let mut sorted = distances.to_vec();
    sorted.sort_by(f64::total_cmp);
    let dq = sorted[q - 1];
    match sorted[q..].iter().find(|&&d| d > dq) {
        Some(&next) => 0.5 * (dq + next),
        None => dq * BOUNDARY_WIDENING * span.max(1.0).sqrt(),
    }
}

/// Columns of `design` that add a direction to the lower-order columns
fn supported_terms(design: &DMatrix<f64>) -> Vec<usize> {
    let mut kept = Vec::with_capacity(design.ncols());
    let mut directions: Vec<DVector<f64>> = Vec::with_capacity(design.ncols());
    for c in 0..design.ncols() {
        let column = design.column(c).into_owned();
        let norm = column.norm();
        let mut residual = column;
        for q in &directions {
            let along = q.dot(&residual);
            residual.axpy(-along, q, 1.0);
        }
        let left = residual.norm();
        if norm > 0.0 && left > TERM_CUTOFF * norm {
            directions.push(residual / left);
            kept.push(c);
        }
    }
    kept
}

/// Operator row `l(x₀)` over `points`
pub(crate) fn operator_row(
    x0: [f64; 2],
    points: &[[f64; 2]],
    neighbourhood: usize,
    span: f64,
    degree: Degree,
) -> AnalysisResult<Vec<f64>> {
    let distances: Vec<f64> = points
        .iter()
        .map(|p| (p[0] - x0[0]).hypot(p[1] - x0[1]))
        .collect();

    let h = bandwidth(&distances, neighbourhood, span);
    if !(h.is_finite() && h > 0.0) {
        return Err(AnalysisError::NumericDegeneracy {
            reason: "zero neighbourhood bandwidth",
        });
    }

    let active: Vec<(usize, f64)> = distances
        .iter()
        .enumerate()
        .filter(|&(_, &d)| d < h)
        .map(|(i, &d)| (i, tricube(d / h).sqrt()))
        .collect();

    let terms = degree.terms();
    let mut design = DMatrix::<f64>::zeros(active.len(), terms);
    let mut row = [0.0; 6];
    for (r, &(i, sqrt_w)) in active.iter().enumerate() {
        let a = (points[i][0] - x0[0]) / h;
        let b = (points[i][1] - x0[1]) / h;
        basis(degree, a, b, &mut row);
        for c in 0..terms {
            design[(r, c)] = sqrt_w * row[c];
        }
    }

    let kept = supported_terms(&design);
    if kept.first() != Some(&0) {
        return Err(AnalysisError::NumericDegeneracy {
            reason: "empty local neighbourhood",
        });
    }
    if kept.len() < terms {
        log::trace!("local fit at {:?} keeps terms {:?}", x0, kept);
    }
    let design = design.select_columns(&kept);

    let svd = design
        .try_svd(true, true, f64::EPSILON, 0)
        .ok_or(AnalysisError::NumericDegeneracy {
            reason: "local SVD did not converge",
        })?;
    let (u, v_t) = match (svd.u, svd.v_t) {
        (Some(u), Some(v_t)) => (u, v_t),
        _ => {
            return Err(AnalysisError::NumericDegeneracy {
                reason: "local SVD did not converge",
            })
        }
    };
    let sigma = svd.singular_values;
    let cutoff = sigma.max() * SINGULAR_CUTOFF;

    // Intercept row of the pseudo-inverse: e₁ᵀ V Σ⁺
    let intercept: Vec<f64> = (0..sigma.len())
        .map(|k| {
            if sigma[k] > cutoff {
                v_t[(k, 0)] / sigma[k]
            } else {
                0.0
            }
        })
        .collect();

    let mut l = vec![0.0; points.len()];
    for (r, &(i, sqrt_w)) in active.iter().enumerate() {
        let acc: f64 = intercept
            .iter()
            .enumerate()
            .map(|(k, &c)| c * u[(r, k)])
            .sum();
        l[i] = acc * sqrt_w;
    }
    Ok(l)
}

/// Numerical rank of the global polynomial design over all training points
pub(crate) fn global_rank(points: &[[f64; 2]], degree: Degree) -> usize {
    let n = points.len() as f64;
    let centre = [
        points.iter().map(|p| p[0]).sum::<f64>() / n,
        points.iter().map(|p| p[1]).sum::<f64>() / n,
    ];
    let radius = points
        .iter()
        .map(|p| (p[0] - centre[0]).hypot(p[1] - centre[1]))
        .fold(0.0, f64::max);
    if radius == 0.0 {
        return 1;
    }

    let terms = degree.terms();
    let mut row = [0.0; 6];
    let design = DMatrix::<f64>::from_fn(points.len(), terms, |r, c| {
        basis(
            degree,
            (points[r][0] - centre[0]) / radius,
            (points[r][1] - centre[1]) / radius,
            &mut row,
        );
        row[c]
    });
    let sigma = design.singular_values();
    let cutoff = sigma.max() * SINGULAR_CUTOFF;
    sigma.iter().filter(|&&s| s > cutoff).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(xs: &[f64], ys: &[f64]) -> Vec<[f64; 2]> {
        ys.iter()
            .flat_map(|&y| xs.iter().map(move |&x| [x, y]))
            .collect()
    }

    #[test]
    fn tricube_shape() {
        assert_eq!(tricube(0.0), 1.0);
        assert!(tricube(0.5) > tricube(0.9));
        assert!(tricube(1.0).abs() < 1e-15);
    }

    #[test]
    fn bandwidth_is_midpoint_past_qth_distance() {
        let d = [0.0, 1.0, 2.0, 2.0, 4.0];
        assert_eq!(bandwidth(&d, 2, 0.5), 1.5);
        // Ties at the q-th distance are skipped
        assert_eq!(bandwidth(&d, 3, 0.5), 3.0);
        // Nothing beyond: widen
        assert!((bandwidth(&d, 5, 0.5) - 4.4).abs() < 1e-12);
        assert!((bandwidth(&d, 5, 4.0) - 8.8).abs() < 1e-12);
    }

    #[test]
    fn operator_row_sums_to_one() {
        let points = grid(&[0.0, 1.0, 2.0, 3.0, 4.0], &[0.0, 0.5, 1.0, 1.5]);
        let l = operator_row([1.7, 0.8], &points, 12, 0.6, Degree::Quadratic).unwrap();
        let total: f64 = l.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn reproduces_quadratics_exactly() {
        let points = grid(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], &[0.0, 1.0, 2.0, 3.0]);
        let f = |p: &[f64; 2]| 3.0 + 2.0 * p[0] - p[1] + 0.5 * p[0] * p[0] + p[0] * p[1];
        let y: Vec<f64> = points.iter().map(f).collect();
        let x0 = [2.3, 1.4];
        let l = operator_row(x0, &points, 10, 0.4, Degree::Quadratic).unwrap();
        let fitted: f64 = l.iter().zip(&y).map(|(a, b)| a * b).sum();
        assert!((fitted - f(&x0)).abs() < 1e-8);
    }

    #[test]
    fn collinear_neighbourhood_still_fits() {
        // All neighbours on one line: quadratic basis is locally rank deficient
        let points: Vec<[f64; 2]> = (0..8).map(|i| [i as f64, 2.0]).collect();
        let l = operator_row([3.0, 2.0], &points, 6, 0.75, Degree::Quadratic).unwrap();
        assert!(l.iter().all(|v| v.is_finite()));
        let fitted: f64 = l.iter().zip(&points).map(|(a, p)| a * p[0]).sum();
        assert!((fitted - 3.0).abs() < 1e-8);
    }

    #[test]
    fn query_between_two_rows_keeps_level() {
        // Two speed rows: a² is constant and gets dropped
        let points = grid(&[0.0, 1.0], &[0.0, 0.1, 0.2]);
        let f = |p: &[f64; 2]| 5.0 + 2.0 * p[0] + p[1];
        let y: Vec<f64> = points.iter().map(f).collect();
        let x0 = [0.5, 0.1];
        let l = operator_row(x0, &points, 6, 0.5, Degree::Quadratic).unwrap();
        let fitted: f64 = l.iter().zip(&y).map(|(a, b)| a * b).sum();
        assert!((fitted - 6.1).abs() < 1e-8, "{fitted}");
    }

    #[test]
    fn full_rank_neighbourhood_keeps_every_term() {
        let points = grid(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 2.0]);
        let mut design = DMatrix::<f64>::zeros(points.len(), 6);
        let mut row = [0.0; 6];
        for (r, p) in points.iter().enumerate() {
            basis(Degree::Quadratic, p[0] - 1.5, p[1] - 1.0, &mut row);
            for c in 0..6 {
                design[(r, c)] = row[c];
            }
        }
        assert_eq!(supported_terms(&design), vec![0, 1, 2, 3, 4, 5]);

        let line: Vec<[f64; 2]> = (0..5).map(|i| [i as f64, 0.0]).collect();
        let mut design = DMatrix::<f64>::zeros(line.len(), 6);
        for (r, p) in line.iter().enumerate() {
            basis(Degree::Quadratic, p[0] - 2.0, p[1], &mut row);
            for c in 0..6 {
                design[(r, c)] = row[c];
            }
        }
        assert_eq!(supported_terms(&design), vec![0, 1, 3]);
    }

    #[test]
    fn global_rank_detects_line() {
        let line: Vec<[f64; 2]> = (0..10).map(|i| [i as f64, 2.0 * i as f64]).collect();
        assert!(global_rank(&line, Degree::Quadratic) < 6);
        assert!(global_rank(&line, Degree::Linear) < 3);

        let plane = grid(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 2.0]);
        assert_eq!(global_rank(&plane, Degree::Quadratic), 6);
    }
}
