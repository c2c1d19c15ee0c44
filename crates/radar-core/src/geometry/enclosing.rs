//! Minimal enclosing circle.
//!
//! Incremental construction: each point that falls outside the running circle
//! must lie on the boundary of the circle enclosing the prefix, which gives the
//! classic three nested loops. Callers feeding long contours should reduce
//! them to their convex hull first; the result is identical and the loops stay
//! short.

use super::Circle;

pub(crate) const CONTAINMENT_EPS: f64 = 1e-7;

/// Smallest circle containing every point, or `None` for an empty input.
pub fn min_enclosing_circle(points: &[(f64, f64)]) -> Option<Circle> {
    let (&first, rest) = points.split_first()?;
    let mut circle = Circle::new(first.0, first.1, 0.0);

    for (i, &p) in rest.iter().enumerate() {
        if circle.contains(p) {
            continue;
        }
        // `p` is on the boundary of the circle enclosing points[..=i + 1].
        circle = Circle::new(p.0, p.1, 0.0);
        for j in 0..=i {
            let q = points[j];
            if circle.contains(q) {
                continue;
            }
            circle = diametral(p, q);
            for k in 0..j {
                let r = points[k];
                if !circle.contains(r) {
                    circle = circumscribed(p, q, r);
                }
            }
        }
    }

    Some(circle)
}

fn diametral(a: (f64, f64), b: (f64, f64)) -> Circle {
    let cx = (a.0 + b.0) / 2.0;
    let cy = (a.1 + b.1) / 2.0;
    let radius = ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt() / 2.0;
    Circle::new(cx, cy, radius)
}

fn circumscribed(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Circle {
    let d = 2.0 * (a.0 * (b.1 - c.1) + b.0 * (c.1 - a.1) + c.0 * (a.1 - b.1));
    if d.abs() < 1e-12 {
        // Collinear: the widest pair spans the other point.
        return [diametral(a, b), diametral(a, c), diametral(b, c)]
            .into_iter()
            .fold(Circle::new(0.0, 0.0, f64::NEG_INFINITY), |best, cand| {
                if cand.radius > best.radius { cand } else { best }
            });
    }

    let a2 = a.0 * a.0 + a.1 * a.1;
    let b2 = b.0 * b.0 + b.1 * b.1;
    let c2 = c.0 * c.0 + c.1 * c.1;
    let ux = (a2 * (b.1 - c.1) + b2 * (c.1 - a.1) + c2 * (a.1 - b.1)) / d;
    let uy = (a2 * (c.0 - b.0) + b2 * (a.0 - c.0) + c2 * (b.0 - a.0)) / d;
    let radius = ((a.0 - ux).powi(2) + (a.1 - uy).powi(2)).sqrt();
    Circle::new(ux, uy, radius)
}
