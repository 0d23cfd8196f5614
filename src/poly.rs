//! Polynomial evaluation and Lagrange coefficient recovery over `𝔽_p`.
//!
//! `eval_prefix` plays the role of the teacher's `Poly::eval` (Horner-style
//! accumulation), but evaluates a *prefix* of a shared coefficient vector —
//! `CommitEncrypter` owns one global `a`, and each level's polynomial
//! `f_i` is just `a[0..=i]`, so there is no separate `Poly` type to
//! construct per level.
//!
//! `interpolate_coeffs` expands Lagrange interpolation into explicit
//! coefficient form (rather than evaluating at a single point), building
//! each basis polynomial by successive multiplication the way the
//! reference implementation does.

use crate::field::FieldElement;

/// Evaluate `Σ_{j=0}^{level} coeffs[j] * x^j` at `x`.
pub fn eval_prefix(coeffs: &[FieldElement], level: usize, x: FieldElement) -> FieldElement {
    let mut acc = FieldElement::ZERO;
    let mut power = FieldElement::ONE;
    for coeff in &coeffs[..=level] {
        acc = acc.add(coeff.mul(power));
        power = power.mul(x);
    }
    acc
}

/// Recover `[a_0, ..., a_{k-1}]` such that the degree-`<k` polynomial they
/// define passes through every `(x_j, y_j)` in `points`. Returns `None` if
/// any two points share an x-coordinate (a zero Lagrange denominator).
pub fn interpolate_coeffs(points: &[(FieldElement, FieldElement)]) -> Option<Vec<FieldElement>> {
    let k = points.len();
    if k == 0 {
        return Some(Vec::new());
    }

    let mut final_coeffs = vec![FieldElement::ZERO; k];

    for j in 0..k {
        let (xj, yj) = points[j];

        let mut denom = FieldElement::ONE;
        for (i, &(xi, _)) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            let diff = xj.sub(xi);
            if diff.is_zero() {
                return None;
            }
            denom = denom.mul(diff);
        }
        let scaler = yj.mul(denom.inverse()?);

        // Numerator basis polynomial L_j(x) = Π_{i != j} (x - x_i), built
        // incrementally so each factor only touches the coefficients seen
        // so far — no recursion.
        let mut basis = vec![FieldElement::ONE];
        for (i, &(xi, _)) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            let mut next = vec![FieldElement::ZERO; basis.len() + 1];
            for (deg, &coeff) in basis.iter().enumerate() {
                next[deg + 1] = next[deg + 1].add(coeff);
                next[deg] = next[deg].sub(xi.mul(coeff));
            }
            basis = next;
        }

        for (deg, &coeff) in basis.iter().enumerate() {
            final_coeffs[deg] = final_coeffs[deg].add(coeff.mul(scaler));
        }
    }

    Some(final_coeffs)
}
