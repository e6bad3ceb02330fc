//! End-to-end sweeps over the default study grids.

use proptest::prelude::*;
use ql_metrics::Metric;
use ql_sweep::{
    CapacityServiceGrid, ChannelSweep, Hole, PointOutcome, SingleServerGrid,
    sweep_capacity_service, sweep_channels, sweep_single_server,
};

#[test]
fn default_capacity_grid_shape_and_holes() {
    let grid = CapacityServiceGrid::default();
    let result = sweep_capacity_service(&grid).unwrap();
    assert_eq!(result.rows.len(), 99);
    assert_eq!(result.cols.len(), 100);
    assert_eq!(result.result.len(), 99 * 100);

    // Only service times below 15 s keep χ = t / 15 under one
    let stable_cols = result.cols.iter().filter(|&&t| t < 15.0).count();
    assert_eq!(result.result.num_successful(), 99 * stable_cols);

    for (i, point) in result.result.iter().enumerate() {
        let (m, t) = point.params;
        assert_eq!(m, result.rows[i / 100]);
        assert_eq!(t, result.cols[i % 100]);
        if t >= 15.0 {
            assert!(matches!(
                point.outcome,
                PointOutcome::Hole(Hole::Unstable { .. })
            ));
        }
    }
}

#[test]
fn capacity_grid_selection_uses_nearest_point() {
    let result = sweep_capacity_service(&CapacityServiceGrid::default()).unwrap();
    let point = result.select(10.4, 11.0).unwrap();
    // Nearest capacity is 10, nearest service time is the first column
    assert_eq!(point.params, (10.0, 10.0));
    let q = point.outcome.get(Metric::Q).unwrap();
    assert!(q > 0.99 && q <= 1.0);
}

#[test]
fn more_waiting_room_loses_fewer_customers() {
    let grid = CapacityServiceGrid {
        capacities: (2..=12).collect(),
        service_times_s: vec![12.0],
        ..CapacityServiceGrid::default()
    };
    let result = sweep_capacity_service(&grid).unwrap();
    let loss: Vec<f64> = result
        .result
        .series(Metric::LossProbability)
        .into_iter()
        .map(|v| v.unwrap())
        .collect();
    assert!(loss.windows(2).all(|w| w[1] < w[0]));
}

#[test]
fn default_single_server_grid() {
    let result = sweep_single_server(&SingleServerGrid::default()).unwrap();
    assert_eq!(result.result.len(), 2500);
    for point in result.result.iter() {
        let (arrival, service) = point.params;
        assert_eq!(point.outcome.is_hole(), arrival >= service);
    }
}

#[test]
fn channel_sweep_reduces_waiting() {
    let result = sweep_channels(&ChannelSweep {
        arrival: 6.0,
        service: 4.0,
        max_channels: 5,
    })
    .unwrap();
    // c = 1 is unstable, so the sweep ends immediately
    assert!(result.is_empty());

    let result = sweep_channels(&ChannelSweep::default()).unwrap();
    let l: Vec<f64> = result
        .series(Metric::LQueue)
        .into_iter()
        .map(|v| v.unwrap())
        .collect();
    assert!(l.windows(2).all(|w| w[1] < w[0]));
}

proptest! {
    #[test]
    fn grid_order_is_canonical(
        rows in prop::collection::vec(1.0_f64..10.0, 1..6),
        cols in prop::collection::vec(1.0_f64..10.0, 1..6),
    ) {
        let result = sweep_single_server(&SingleServerGrid {
            arrivals: rows.clone(),
            services: cols.clone(),
        })
        .unwrap();
        prop_assert_eq!(result.result.len(), rows.len() * cols.len());
        for (i, r) in rows.iter().enumerate() {
            for (j, c) in cols.iter().enumerate() {
                prop_assert_eq!(result.at(i, j).unwrap().params, (*r, *c));
            }
        }
    }
}
