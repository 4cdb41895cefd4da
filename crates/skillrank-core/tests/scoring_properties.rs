//! Property tests for the score formulas.

use proptest::prelude::*;

use skillrank_core::model::Point;
use skillrank_core::results::{Rank, ResultSummary};
use skillrank_core::scoring::{
    evaluate_circle_accuracy, final_drawing_score, final_mash_score, is_shape_too_small,
};

/// A noisy circle: `noise[i]` perturbs the radius of the i-th sample.
fn noisy_circle(radius: f64, noise: &[f64]) -> Vec<Point> {
    let n = noise.len();
    noise
        .iter()
        .enumerate()
        .map(|(i, jitter)| {
            let a = std::f64::consts::TAU * i as f64 / n as f64;
            let r = radius * (1.0 + 0.2 * jitter);
            Point::new(r * a.cos(), r * a.sin())
        })
        .collect()
}

fn shape() -> impl Strategy<Value = Vec<Point>> {
    (
        0.6f64..50.0,
        prop::collection::vec(-1.0f64..1.0, 40..300),
    )
        .prop_map(|(radius, noise)| noisy_circle(radius, &noise))
}

fn rank_order(rank: Rank) -> usize {
    [Rank::X, Rank::S, Rank::A, Rank::B, Rank::C, Rank::D]
        .iter()
        .position(|r| *r == rank)
        .unwrap()
}

proptest! {
    #[test]
    fn accuracy_is_translation_invariant(
        points in shape(),
        dx in -500.0f64..500.0,
        dy in -500.0f64..500.0,
    ) {
        let moved: Vec<Point> = points.iter().map(|p| Point::new(p.x + dx, p.y + dy)).collect();
        let a = evaluate_circle_accuracy(&points);
        let b = evaluate_circle_accuracy(&moved);
        prop_assert!((a - b).abs() <= 1, "{a} vs {b}");
    }

    #[test]
    fn accuracy_is_rotation_invariant(points in shape(), angle in 0.0f64..std::f64::consts::TAU) {
        let (s, c) = angle.sin_cos();
        let turned: Vec<Point> = points
            .iter()
            .map(|p| Point::new(p.x * c - p.y * s, p.x * s + p.y * c))
            .collect();
        let a = evaluate_circle_accuracy(&points);
        let b = evaluate_circle_accuracy(&turned);
        prop_assert!((a - b).abs() <= 1, "{a} vs {b}");
    }

    #[test]
    fn accuracy_stays_in_range(
        raw in prop::collection::vec((-1e4f64..1e4, -1e4f64..1e4), 0..200),
    ) {
        let points: Vec<Point> = raw.into_iter().map(|(x, y)| Point::new(x, y)).collect();
        let score = evaluate_circle_accuracy(&points);
        prop_assert!((0..=100).contains(&score));
    }

    #[test]
    fn drawing_score_is_bounded_and_monotone_in_time(
        points in shape(),
        t1 in 0.0f64..30.0,
        t2 in 0.0f64..30.0,
    ) {
        let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
        let slow = final_drawing_score(&points, lo);
        let fast = final_drawing_score(&points, hi);
        prop_assert!((0..=100).contains(&slow));
        prop_assert!((0..=100).contains(&fast));
        prop_assert!(slow <= fast);
    }

    #[test]
    fn mash_score_strictly_increases_with_hits(
        h1 in 0u32..200,
        h2 in 0u32..200,
        light in 0.5f64..1.0,
    ) {
        prop_assume!(h1 != h2);
        let (lo, hi) = if h1 < h2 { (h1, h2) } else { (h2, h1) };
        // Every hit is worth at least 100 / 30 points in this light range.
        prop_assert!(final_mash_score(lo, light) < final_mash_score(hi, light));
        prop_assert!(final_mash_score(lo, light) >= 0);
    }

    #[test]
    fn tiny_shapes_are_always_too_small(
        raw in prop::collection::vec((-0.2f64..0.2, -0.2f64..0.2), 1..200),
    ) {
        let points: Vec<Point> = raw.into_iter().map(|(x, y)| Point::new(x, y)).collect();
        // RMS distance to the centroid is at most RMS distance to the origin,
        // which is under 0.29 here.
        prop_assert!(is_shape_too_small(&points));
    }

    #[test]
    fn higher_totals_never_rank_worse(
        a in (0i32..=100, 0i32..=100, 0i32..=100),
        b in (0i32..=100, 0i32..=100, 0i32..=100),
    ) {
        let sa = ResultSummary::compute(a.0, a.1, a.2);
        let sb = ResultSummary::compute(b.0, b.1, b.2);
        if sa.total >= sb.total {
            prop_assert!(rank_order(sa.rank) <= rank_order(sb.rank));
        }
    }

    #[test]
    fn rank_score_weights_game3_heaviest(g1 in 0i32..=100, g2 in 0i32..=100, g3 in 0i32..=100) {
        let s = ResultSummary::compute(g1, g2, g3);
        prop_assert_eq!(s.rank_score, g2 + g1 / 2 + g3 / 2 + g3);
        prop_assert_eq!(s.display, [g2, (g1 + g3) / 2, g3]);
    }
}
