#[cfg(test)]
mod property_tests {
    use dueling_q::config::{CylinderNetConfig, LanderConfig};
    use dueling_q::dueling::combine;
    use dueling_q::models::{CylinderNet, LanderNet};
    use dueling_q::network::QNetwork;
    use dueling_q::observation::CylinderObservation;
    use ndarray::{Array2, Axis};
    use proptest::prelude::*;

    // Strategy for generating (batch, width) matrices of bounded values
    fn matrix_strategy(rows: usize, cols: usize) -> impl Strategy<Value = Array2<f32>> {
        prop::collection::vec(-10.0f32..10.0, rows * cols)
            .prop_map(move |v| Array2::from_shape_vec((rows, cols), v).unwrap())
    }

    fn head_strategy() -> impl Strategy<Value = (Array2<f32>, Array2<f32>)> {
        (1usize..8, 1usize..20)
            .prop_flat_map(|(batch, actions)| (matrix_strategy(batch, 1), matrix_strategy(batch, actions)))
    }

    proptest! {
        #[test]
        fn test_combined_advantages_average_to_value((value, advantage) in head_strategy()) {
            let q = combine(value.view(), advantage.view()).unwrap();
            prop_assert_eq!(q.dim(), advantage.dim());

            let mean_q = q.mean_axis(Axis(1)).unwrap();
            for (m, v) in mean_q.iter().zip(value.column(0).iter()) {
                prop_assert!((m - v).abs() < 1e-3);
            }
        }

        #[test]
        fn test_constant_advantage_shift_is_invisible(
            (value, advantage) in head_strategy(),
            shift in -50.0f32..50.0,
        ) {
            let q = combine(value.view(), advantage.view()).unwrap();
            let shifted = advantage.mapv(|a| a + shift);
            let q_shifted = combine(value.view(), shifted.view()).unwrap();
            for (a, b) in q.iter().zip(q_shifted.iter()) {
                prop_assert!((a - b).abs() < 1e-3);
            }
        }

        #[test]
        fn test_lander_output_width_is_fixed(batch in 1usize..16, seed in any::<u64>()) {
            let net = LanderNet::from_config(&LanderConfig { seed: Some(seed), ..LanderConfig::default() }).unwrap();
            let states = Array2::from_elem((batch, 8), 0.5);
            let q = net.q_values(&states).unwrap();
            prop_assert_eq!(q.dim(), (batch, 4));
            prop_assert!(q.iter().all(|v| v.is_finite()));
        }

        #[test]
        fn test_cylinder_any_depth(hidden_size in 1usize..64, n_hidden in 0usize..4, batch in 1usize..6) {
            let net = CylinderNet::new(hidden_size, n_hidden, false).unwrap();
            prop_assert_eq!(net.hidden.len(), n_hidden);
            let q = net.q_values(&CylinderObservation::zeros(batch, net.dims())).unwrap();
            prop_assert_eq!(q.dim(), (batch, 16));
        }

        #[test]
        fn test_cylinder_config_round_trip(hidden_size in 1usize..512, n_hidden in 0usize..8) {
            let config = CylinderNetConfig::new(hidden_size, n_hidden, false);
            let json = serde_json::to_string(&config).unwrap();
            let parsed: CylinderNetConfig = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(parsed, config);
        }
    }
}
