use dueling_q::{
    config::ModelConfig,
    device::ExecutionContext,
    error::DuelingError,
    models::{CylinderCoordConv, CylinderNet, LanderNet},
    network::QNetwork,
    observation::{CylinderImageObservation, CylinderObservation},
};
use ndarray::Array2;
use std::io::Write;
use tempfile::NamedTempFile;

fn greedy_is_argmax<N: QNetwork>(net: &N, obs: &N::Observation) {
    let q = net.q_values(obs).unwrap();
    let actions = net.greedy_actions(obs).unwrap();
    for (row, &action) in q.rows().into_iter().zip(actions.iter()) {
        let best = row.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(row[action], best);
    }
}

#[test]
fn test_networks_from_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "lander": {{ "seed": 1 }},
            "cylinder": {{ "hidden_size": 48, "n_hidden": 2, "seed": 2 }},
            "coord_conv": {{ "seed": 3 }}
        }}"#
    )
    .unwrap();

    let config = ModelConfig::from_json_file(file.path()).unwrap();

    let lander = LanderNet::from_config(&config.lander).unwrap();
    let states = Array2::from_elem((4, 8), 0.2);
    assert_eq!(lander.q_values(&states).unwrap().dim(), (4, 4));
    greedy_is_argmax(&lander, &states);

    let cylinder = CylinderNet::from_config(&config.cylinder).unwrap();
    assert_eq!(cylinder.hidden.len(), 2);
    let obs = CylinderObservation::zeros(3, cylinder.dims());
    assert_eq!(cylinder.q_values(&obs).unwrap().dim(), (3, 16));
    greedy_is_argmax(&cylinder, &obs);

    let coord_conv = CylinderCoordConv::from_config(&config.coord_conv).unwrap();
    let obs = CylinderImageObservation::zeros(2, coord_conv.dims(), coord_conv.image_dims());
    assert_eq!(coord_conv.q_values(&obs).unwrap().dim(), (2, 16));
    assert_eq!(coord_conv.state_values(&obs).unwrap().len(), 2);
}

#[test]
fn test_config_round_trips_through_json() {
    let config = ModelConfig::default();
    let json = config.to_json_string().unwrap();
    assert_eq!(ModelConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn test_missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ModelConfig::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, DuelingError::Io(_)));
}

#[cfg(not(feature = "gpu-mock"))]
#[test]
fn test_acceleration_without_device_fails() {
    let config = ModelConfig::default().with_acceleration(true);
    let err = CylinderNet::from_config(&config.cylinder).unwrap_err();
    assert!(matches!(err, DuelingError::DeviceUnavailable(_)));
    assert!(ExecutionContext::new(true).is_err());
}

#[cfg(feature = "gpu-mock")]
#[test]
fn test_accelerated_matches_host() {
    let config = ModelConfig::from_json_str(r#"{ "cylinder": { "seed": 5 }, "coord_conv": { "seed": 6 } }"#).unwrap();
    let accelerated = config.clone().with_acceleration(true);

    let host = CylinderNet::from_config(&config.cylinder).unwrap();
    let device = CylinderNet::from_config(&accelerated.cylinder).unwrap();
    assert!(device.context().is_accelerated());
    let mut obs = CylinderObservation::zeros(2, host.dims());
    obs.tscs.fill(0.7);
    assert_eq!(host.q_values(&obs).unwrap(), device.q_values(&obs).unwrap());

    let host = CylinderCoordConv::from_config(&config.coord_conv).unwrap();
    let device = CylinderCoordConv::from_config(&accelerated.coord_conv).unwrap();
    let mut obs = CylinderImageObservation::zeros(1, host.dims(), host.image_dims());
    obs.image.fill(-0.3);
    assert_eq!(host.q_values(&obs).unwrap(), device.q_values(&obs).unwrap());
}

#[test]
fn test_wrong_state_width_reports_both_widths() {
    let lander = LanderNet::new();
    let err = lander.q_values(&Array2::zeros((1, 6))).unwrap_err();
    let message = err.to_string();
    assert!(message.contains('8') && message.contains('6'), "{}", message);
}
