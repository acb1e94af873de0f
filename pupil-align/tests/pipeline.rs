//! End-to-end pipeline coverage: write pupil frames to disk, load them back
//! through glob enumeration, then detect, group and synthesize.

use approx::assert_relative_eq;
use ndarray::Array2;

use pupil_align::{
    io, ConfigTable, MetaKey, MetaValue, MetadataPatch, PupilMetadata, PupilRecord, PupilSet,
    Region, StationParams,
};

/// 32x32 frame with a bright rectangular pupil, its top-left pixel at
/// `(col0, row0)`.
fn pupil_frame(row0: usize, col0: usize, metadata: PupilMetadata) -> PupilRecord {
    let mut image = Array2::from_elem((32, 32), 200.0);
    for row in row0..row0 + 6 {
        for col in col0..col0 + 6 {
            image[[row, col]] = 4800.0;
        }
    }
    PupilRecord::new(image, metadata)
}

fn station_table() -> ConfigTable {
    let mut table = ConfigTable::new();
    table.insert(
        1,
        StationParams {
            threshold: 1500.0,
            region: Region::from_corners((-1.0, -1.0), (32.0, 32.0)),
        },
    );
    table
}

#[test]
fn test_glob_load_sort_and_group() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let table = station_table();

    let angles = [30.0_f64, 10.0, 20.0, 10.0];
    for (i, &angle) in angles.iter().enumerate() {
        let record = pupil_frame(
            8 + i,
            10,
            PupilMetadata {
                position_angle: angle,
                rotator_angle: 45.0,
                instrument_position: 1,
            },
        );
        io::write_pupil_frame(dir.path().join(format!("pupil_{i:02}.fits")), &record).unwrap();
    }
    // A file the pattern must not pick up.
    std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    let pattern = dir.path().join("pupil_*.fits");
    let defaults = MetadataPatch {
        instrument_position: Some(1),
        ..Default::default()
    };
    let set = PupilSet::from_pattern(pattern.to_str().unwrap(), &defaults).unwrap();
    assert_eq!(set.len(), 4);

    // Enumeration order is not guaranteed; sort before asserting sequence.
    let sorted = set.sorted_by(MetaKey::PositionAngle);
    let sorted_angles: Vec<f64> = sorted
        .iter()
        .map(|r| r.metadata().position_angle)
        .collect();
    assert_eq!(sorted_angles, vec![10.0, 10.0, 20.0, 30.0]);

    // Grouping with a minimum of 2 keeps only the repeated angle.
    let groups = set.group_by(MetaKey::PositionAngle, 2);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[&MetaValue::Float(10.0)].len(), 2);

    // Every loaded record detects a centroid under the station table.
    for result in set.centers(&table) {
        result.unwrap();
    }
}

#[test]
fn test_synthesis_relocates_every_frame_to_a_common_target() {
    let _ = env_logger::builder().is_test(true).try_init();
    let table = station_table();
    let metadata = PupilMetadata {
        position_angle: 0.0,
        rotator_angle: 0.0,
        instrument_position: 1,
    };

    // Pupils at different places in the frame.
    let set = PupilSet::from_records(vec![
        pupil_frame(5, 7, metadata),
        pupil_frame(12, 20, metadata),
        pupil_frame(20, 4, metadata),
    ]);

    let target = (16.0, 16.0);
    for record in &set {
        let synthesized = record
            .synthesize(&table, target, Some(0.0), None)
            .unwrap();
        let (x, y) = synthesized.centroid(&table).unwrap();
        assert_relative_eq!(x, target.0, epsilon = 1e-3);
        assert_relative_eq!(y, target.1, epsilon = 1e-3);
    }
}

#[test]
fn test_synthesized_frame_roundtrips_through_fits() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().unwrap();
    let table = station_table();
    let metadata = PupilMetadata {
        position_angle: 60.0,
        rotator_angle: -15.0,
        instrument_position: 1,
    };

    let record = pupil_frame(10, 10, metadata);
    let current = record.centroid(&table).unwrap();
    let synthesized = record.synthesize(&table, current, None, None).unwrap();

    let path = dir.path().join("synth.fits");
    io::write_pupil_frame(&path, &synthesized).unwrap();

    let reloaded = PupilRecord::from_file(&path, &MetadataPatch::default()).unwrap();
    assert_eq!(*reloaded.metadata(), metadata);

    let (x, y) = reloaded.centroid(&table).unwrap();
    assert_relative_eq!(x, current.0, epsilon = 1e-3);
    assert_relative_eq!(y, current.1, epsilon = 1e-3);
}
