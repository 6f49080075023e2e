//! Yearly Fourier basis for seasonal regression.
//!
//! For a time `t` measured in years, the order-`k` pair is:
//!
//! - `s_k(t) = sin(2πk·t)`
//! - `c_k(t) = cos(2πk·t)`
//!
//! A handful of pairs is enough to describe a smooth annual cycle (summer and
//! winter peaks) without one dummy column per calendar month.

use std::f64::consts::PI;

/// Append `order` sine/cosine pairs for time `t` (years) to `out`.
pub fn push_yearly_terms(t: f64, order: usize, out: &mut Vec<f64>) {
    for k in 1..=order {
        let angle = 2.0 * PI * k as f64 * t;
        out.push(angle.sin());
        out.push(angle.cos());
    }
}

/// Number of design columns contributed by `order` pairs.
pub fn yearly_columns(order: usize) -> usize {
    2 * order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_are_periodic_in_one_year() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        push_yearly_terms(0.25, 3, &mut a);
        push_yearly_terms(1.25, 3, &mut b);
        assert_eq!(a.len(), yearly_columns(3));
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-9);
        }
        // First pair at a quarter year: sin = 1, cos = 0.
        assert!((a[0] - 1.0).abs() < 1e-12);
        assert!(a[1].abs() < 1e-12);
    }

    #[test]
    fn order_zero_adds_nothing() {
        let mut out = vec![1.0];
        push_yearly_terms(0.4, 0, &mut out);
        assert_eq!(out, vec![1.0]);
    }
}
