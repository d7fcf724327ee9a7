// End-to-end reconstruction tests
// Runs full tracks through every stage and checks the combined output

use approx::assert_abs_diff_eq;
use magellan_rust::assert_deviation;
use magellan_rust::events::{EventSources, Polarity};
use magellan_rust::magnetized_layer::{MagnetizedLayer, MagnetizedLayerSegment};
use magellan_rust::oblique::Obliquity;
use magellan_rust::talwani::compute_anomaly;
use magellan_rust::{BathymetryProfile, MagellanError, ModelParams, Reconstruction, Stage, Track};

fn timescale_sources() -> EventSources {
    let mut sources = EventSources::new();
    sources
        .add_full_spreading_rate(8.0, 40.0)
        .set_timescale(&[0.78, 0.99, 1.07, 1.77, 1.95, 2.58, 3.04, 3.11, 3.22, 3.33, 3.58, 4.18, 4.29, 4.48, 4.62, 4.80, 4.89, 4.98, 5.23, 8.0]);
    sources
}

fn ridge_track(half_width: i32) -> Track {
    let distance: Vec<f64> = (-half_width..=half_width).map(f64::from).collect();
    // shallow at the axis, deepening with distance
    let depth: Vec<f64> = distance.iter().map(|d| -2.6 - 0.35 * d.abs().sqrt()).collect();
    let observed = vec![0.0; distance.len()];
    Track::new(distance, depth, observed).unwrap()
}

#[test]
fn test_synthetic_ridge_end_to_end() {
    println!("🌋 Testing full reconstruction of a synthetic ridge");

    let mut reconstruction = Reconstruction::new(ModelParams::default());
    let track = ridge_track(60);
    let model = reconstruction.run(&timescale_sources(), &track).unwrap();

    println!("   layer blocks: {}", model.layer.len());
    println!("   anomaly points: {}", model.anomaly.len());

    // 20 km/Myr half rate over 8 Myr reaches well past the track
    assert_abs_diff_eq!(model.right.total_distance(), 160.0, epsilon = 1e-9);
    assert_abs_diff_eq!(model.left.total_distance(), -160.0, epsilon = 1e-9);

    assert_eq!(model.layer.extent(), Some((-60.0, 60.0)));
    // Brunhes chron: 0.78 Myr at 20 km/Myr on both sides of the axis
    let axis = model.layer.segment_at(0.0).unwrap();
    assert_eq!(axis.polarity, Polarity::Normal);
    assert_abs_diff_eq!(axis.start, -15.6, epsilon = 1e-9);
    assert_abs_diff_eq!(axis.end, 15.6, epsilon = 1e-9);

    assert_eq!(model.anomaly.len(), track.distance().len());
    assert!(model.anomaly.values().iter().all(|v| v.is_finite()));
    assert!(model.anomaly.skipped_blocks.is_empty());

    model.print_summary();
    reconstruction.print_timing_report();
    println!("   ✅ Pipeline produced a tiling layer and a finite anomaly");
}

#[test]
fn test_symmetric_spreading_gives_symmetric_anomaly() {
    println!("🪞 Testing symmetric spreading under a vertical field");

    let params = ModelParams {
        inclination_deg: 90.0,
        declination_deg: 0.0,
        azimuth_deg: 0.0,
        ..ModelParams::default()
    };
    let mut reconstruction = Reconstruction::new(params);
    let model = reconstruction.run(&timescale_sources(), &ridge_track(50)).unwrap();

    let values = model.anomaly.values();
    let n = values.len();
    for i in 0..n / 2 {
        assert_abs_diff_eq!(values[i], values[n - 1 - i], epsilon = 1e-6);
    }
    println!("   ✅ Anomaly is mirror-symmetric about the axis");
}

#[test]
fn test_flat_single_block_scenario() {
    println!("🧪 Testing a single normal block over flat seafloor");

    let distance: Vec<f64> = (-50..=50).map(f64::from).collect();
    let bathymetry = BathymetryProfile::new(distance.clone(), vec![-4.0; distance.len()]).unwrap();
    let layer = MagnetizedLayer {
        segments: vec![MagnetizedLayerSegment {
            start: -50.0,
            end: 50.0,
            polarity: Polarity::Normal,
            magnetization: 10.0,
        }],
    };
    let params = ModelParams {
        inclination_deg: 90.0,
        declination_deg: 20.0,
        azimuth_deg: 20.0,
        ..ModelParams::default()
    };

    let model = compute_anomaly(&bathymetry, &layer, &distance, &params, Obliquity::NONE);
    for point in &model.points {
        let mirror = model
            .points
            .iter()
            .find(|p| p.distance == -point.distance)
            .unwrap();
        assert_abs_diff_eq!(point.value, mirror.value, epsilon = 1e-6);
    }
    println!("   ✅ model[d] == model[-d] across the track");
}

#[test]
fn test_ridge_jump_is_reported() {
    println!("🦘 Testing a ridge jump leaves a pseudo-fault and failed rift");

    let mut sources = timescale_sources();
    sources.add_jump(2.0, 10.0);

    let mut reconstruction = Reconstruction::new(ModelParams::default());
    let model = reconstruction.run(&sources, &ridge_track(80)).unwrap();

    for event in &model.faults_and_rifts {
        println!("   {:>8.2} km pseudo_fault={} failed_rift={}", event.distance, event.pseudo_fault, event.failed_rift);
    }
    assert!(model.faults_and_rifts.iter().any(|e| e.failed_rift));
    assert!(model.faults_and_rifts.iter().any(|e| e.pseudo_fault));
    assert!(model.faults_and_rifts.windows(2).all(|w| w[0].distance <= w[1].distance));
    assert!(model.faults_and_rifts.iter().all(|e| (-80.0..=80.0).contains(&e.distance)));

    // the jump moves material but keeps the total
    assert_deviation!(
        model.right.total_magnitude() + model.left.total_magnitude(),
        320.0,
        1e-6,
        "total spread material after the jump"
    );
    assert_abs_diff_eq!(model.left.total_magnitude(), 170.0, epsilon = 1e-9);
    println!("   ✅ Jump boundary recorded inside the track");
}

#[test]
fn test_failures_name_their_stage() {
    println!("🧯 Testing fatal conditions report the failing stage");

    let mut sources = EventSources::new();
    sources.add_spreading_rate(1.0, 5.0).add_jump(0.5, 50.0);
    let mut reconstruction = Reconstruction::new(ModelParams::default());
    let error = reconstruction.run(&sources, &ridge_track(10)).unwrap_err();
    println!("   {}", error);
    assert!(matches!(error, MagellanError::JumpOutOfRange { .. }));
    assert_eq!(error.stage(), Some(Stage::JumpRepositioning));

    let params = ModelParams {
        obliquity_deg: 90.0,
        ..ModelParams::default()
    };
    let error = Reconstruction::new(params)
        .run(&timescale_sources(), &ridge_track(10))
        .unwrap_err();
    println!("   {}", error);
    assert_eq!(error.stage(), Some(Stage::ObliqueProjection));

    // past perpendicular the projection would reverse the track
    let params = ModelParams {
        obliquity_deg: 120.0,
        ..ModelParams::default()
    };
    let error = Reconstruction::new(params)
        .run(&timescale_sources(), &ridge_track(10))
        .unwrap_err();
    assert!(matches!(error, MagellanError::DegenerateObliquity(_)));

    println!("   ✅ Errors identify their stage");
}

#[test]
fn test_model_serializes_to_json() {
    println!("🗂️ Testing the track model serializes");

    let mut reconstruction = Reconstruction::new(ModelParams::default());
    let model = reconstruction.run(&timescale_sources(), &ridge_track(10)).unwrap();
    let json = model.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["anomaly"]["points"].as_array().unwrap().len(), 21);
    assert!(value["layer"]["segments"].as_array().unwrap().len() >= 1);
    println!("   ✅ JSON output carries the anomaly and layer");
}
