use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use beacon_calib::{
    calibrate_image, AngularCorrection, CameraModel, FrequencyParams, ImageFrame, PixelDetection,
    SceneConfig,
};

fn bench_calibrate_image(c: &mut Criterion) {
    let mut group = c.benchmark_group("CalibrateImage");

    let camera = CameraModel::new(5298.0).with_correction(
        "back",
        AngularCorrection {
            x: 0.0121,
            y: -0.0043,
        },
    );

    for num_beacons in [1, 8, 32].iter() {
        let scene = (0..*num_beacons).fold(SceneConfig::new([1.2, 0.4], "back"), |scene, i| {
            scene.with_beacon(format!("bulb{i}"), 1500 + 50 * i as u32, 2.65)
        });

        let frame = ImageFrame {
            width: 1456,
            height: 2592,
            detections: (0..*num_beacons)
                .map(|i| PixelDetection {
                    pixel_x: 100.0 + 40.0 * i as f64,
                    pixel_y: 2400.0 - 60.0 * i as f64,
                    radius: 12.0,
                    frequency_hz: 1500.0 + 50.0 * i as f64 + 7.0,
                })
                .collect(),
        };

        group.bench_with_input(
            BenchmarkId::new("calibrate_image", num_beacons),
            &frame,
            |b, frame| {
                b.iter(|| {
                    black_box(calibrate_image(
                        black_box(frame),
                        &scene,
                        &camera,
                        &FrequencyParams::default(),
                    ))
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_calibrate_image);
criterion_main!(benches);
