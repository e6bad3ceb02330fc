//! Integration tests for metric derivation across chain forms.

use proptest::prelude::*;
use ql_chain::{BirthDeathSpec, ChainSpec, solve};
use ql_metrics::{LossRule, Metric, derive_metrics, derive_metrics_with};

#[test]
fn erlang_b_loss_is_top_state() {
    let spec = ChainSpec::BirthDeath(BirthDeathSpec::loss(2.0, 4.0, 3));
    let p = solve(&spec).unwrap();
    let m = derive_metrics(&p, &spec).unwrap();

    // Erlang-B with ρ = 0.5, c = 3
    let total = 1.0 + 0.5 + 0.125 + 0.125 / 6.0;
    let pi = (0.125 / 6.0) / total;
    assert!((m.get(Metric::LossProbability).unwrap() - pi).abs() < 1e-12);
    assert!((m.get(Metric::A).unwrap() - 2.0 * (1.0 - pi)).abs() < 1e-12);
    assert_eq!(m.get(Metric::LQueue), Some(0.0));
    // Nobody waits, so time in system is one service time
    assert!((m.get(Metric::WSystem).unwrap() - 0.25).abs() < 1e-12);
}

#[test]
fn multi_channel_axis_keeps_improving() {
    let q: Vec<f64> = (1..=4)
        .map(|c| {
            let spec = ChainSpec::MultiChannel {
                arrival: 2.0,
                service: 4.0,
                channels: c,
            };
            let p = solve(&spec).unwrap();
            derive_metrics(&p, &spec).unwrap().q.unwrap()
        })
        .collect();
    assert!(q.windows(2).all(|w| w[1] > w[0]));
}

proptest! {
    #[test]
    fn littles_law_holds_for_finite_queues(
        arrival in 0.05_f64..3.0,
        service in 0.5_f64..3.0,
        channels in 1_usize..4,
        waiting in 0_usize..20,
    ) {
        prop_assume!(arrival < channels as f64 * service);
        let spec = ChainSpec::BirthDeath(BirthDeathSpec::with_waiting(arrival, service, channels, waiting));
        let p = solve(&spec).unwrap();
        for rule in [LossRule::TopState, LossRule::ScaledTopState] {
            let m = derive_metrics_with(&p, &spec, rule).unwrap();
            let a = m.a.unwrap();
            let q = m.q.unwrap();
            prop_assert!((0.0..=1.0).contains(&q));
            prop_assert!((m.l_queue.unwrap() - a * m.w_queue.unwrap()).abs() < 1e-9);
            prop_assert!((m.l_system.unwrap() - a * m.w_system.unwrap()).abs() < 1e-9);
            prop_assert!(m.k_busy.unwrap() <= 1.0 + 1e-12);
        }
    }
}
