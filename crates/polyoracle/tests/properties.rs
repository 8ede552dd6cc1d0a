//! Property tests for the oracle on random axis-aligned boxes.
//!
//! Every returned facet must be L1-normalized, separate the query from the
//! interior point, and support the box (touch it without cutting into it).

use polyoracle::prelude::*;
use proptest::prelude::*;

const TOL: f64 = 1e-7;

/// `[lo_i, hi_i]` boxes as VLP text; rows are the box constraints, objectives the identity.
fn box_vlp(lo: &[f64], hi: &[f64]) -> String {
    let d = lo.len();
    let mut s = format!("c random box\np vlp min {d} {d} 0 {d} 0\n");
    for i in 0..d {
        let k = i + 1;
        s += &format!("i {k} d {} {}\na {k} {k} 1\nj {k} f\no {k} {k} 1\n", lo[i], hi[i]);
        s += &format!("x {k} {}\n", 0.5 * (lo[i] + hi[i]));
    }
    s
}

fn boxes() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (2usize..=4).prop_flat_map(|d| {
        (
            prop::collection::vec(0.1f64..2.0, d),
            prop::collection::vec(0.5f64..3.0, d),
        )
            .prop_map(|(lo, width)| {
                let hi = lo.iter().zip(&width).map(|(l, w)| l + w).collect();
                (lo, hi)
            })
    })
}

fn oracle_for(lo: &[f64], hi: &[f64], seed: u64) -> Oracle {
    let cfg = OracleConfig {
        seed: Some(seed),
        ..OracleConfig::default()
    };
    let mut oracle = Oracle::from_reader(box_vlp(lo, hi).as_bytes(), "box.vlp", cfg).unwrap();
    assert_eq!(oracle.initialize(), Ok(Consistency::Ready));
    oracle
}

/// Minimum of the facet function over the box.
fn min_over_box(data: &OracleData, lo: &[f64], hi: &[f64]) -> f64 {
    let f = data.coefficients();
    let lin: f64 = (0..lo.len()).map(|i| (f[i] * lo[i]).min(f[i] * hi[i])).sum();
    lin + data.constant()
}

fn check(data: &OracleData, lo: &[f64], hi: &[f64]) -> Result<(), TestCaseError> {
    let l1: f64 = data.coefficients().iter().map(|v| v.abs()).sum();
    prop_assert!((l1 - 1.0).abs() < TOL, "L1 norm {}", l1);
    prop_assert!(data.vertex.dot(&data.facet) <= 0.0);
    let centre: f64 = (0..lo.len())
        .map(|i| data.coefficients()[i] * 0.5 * (lo[i] + hi[i]))
        .sum();
    prop_assert!(centre + data.constant() > 0.0);
    prop_assert!(min_over_box(data, lo, hi).abs() < 1e-6);
    Ok(())
}

/// Direction with sup-norm at least 0.1.
fn scaled_direction(raw: &[f64]) -> Option<Vec<f64>> {
    let m = raw.iter().fold(0.0f64, |a, v| a.max(v.abs()));
    (m >= 0.1).then(|| raw.iter().map(|v| v / m).collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn direction_queries_give_supporting_facets(
        (lo, hi) in boxes(),
        raw in prop::collection::vec(-1.0f64..1.0, 4),
        seed in any::<u64>(),
    ) {
        let d = lo.len();
        let dir = scaled_direction(&raw[..d]);
        prop_assume!(dir.is_some());
        let dir = dir.unwrap();
        let mut oracle = oracle_for(&lo, &hi, seed);
        let mut data = OracleData::direction(&dir);
        prop_assert_eq!(oracle.ask(&mut data), Ok(Answer::Facet));
        check(&data, &lo, &hi)?;
    }

    #[test]
    fn far_points_give_supporting_facets(
        (lo, hi) in boxes(),
        raw in prop::collection::vec(-1.0f64..1.0, 4),
        seed in any::<u64>(),
    ) {
        let d = lo.len();
        let dir = scaled_direction(&raw[..d]);
        prop_assume!(dir.is_some());
        let dir = dir.unwrap();
        // Some coordinate moves by 8, more than any box width.
        let point: Vec<f64> = (0..d).map(|i| 0.5 * (lo[i] + hi[i]) + 8.0 * dir[i]).collect();
        let mut oracle = oracle_for(&lo, &hi, seed);
        let mut data = OracleData::point(&point);
        prop_assert_eq!(oracle.ask(&mut data), Ok(Answer::Facet));
        check(&data, &lo, &hi)?;
    }

    #[test]
    fn points_inside_are_never_separated(
        (lo, hi) in boxes(),
        t in prop::collection::vec(0.0f64..1.0, 4),
    ) {
        let d = lo.len();
        // Push one coordinate onto the boundary so the walk ends exactly at the point.
        let mut point: Vec<f64> = (0..d).map(|i| lo[i] + t[i] * (hi[i] - lo[i])).collect();
        let centre: Vec<f64> = (0..d).map(|i| 0.5 * (lo[i] + hi[i])).collect();
        let (k, _) = (0..d)
            .map(|i| (i, ((point[i] - centre[i]) / (hi[i] - lo[i])).abs()))
            .fold((0, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
        // Scale the offset from the centre until coordinate k hits its bound.
        let half = 0.5 * (hi[k] - lo[k]);
        let off = point[k] - centre[k];
        prop_assume!(off.abs() > 1e-3);
        let s = half / off.abs();
        for i in 0..d {
            point[i] = centre[i] + s * (point[i] - centre[i]);
        }
        let mut oracle = oracle_for(&lo, &hi, 11);
        let mut data = OracleData::point(&point);
        prop_assert_eq!(
            oracle.ask(&mut data),
            Ok(Answer::Unbounded(Unbounded::PointInside))
        );
    }
}

#[test]
fn second_query_reuses_the_buffer() {
    let (lo, hi) = (vec![0.5, 0.5, 0.5], vec![1.5, 2.5, 3.5]);
    let mut oracle = oracle_for(&lo, &hi, 5);
    let mut data = oracle.data();
    data.set_direction(&[0.0, 0.0, 1.0]);
    assert_eq!(oracle.ask(&mut data), Ok(Answer::Facet));
    assert!((data.facet[2] + 1.0).abs() < TOL);
    assert!((data.facet[3] - 3.5).abs() < TOL);
    data.set_point(&[-4.0, 1.0, 1.0]);
    assert_eq!(oracle.ask(&mut data), Ok(Answer::Facet));
    assert!((data.facet[0] - 1.0).abs() < TOL);
    assert!((data.facet[3] + 0.5).abs() < TOL);
    assert_eq!(oracle.stats().calls, 3);
}
