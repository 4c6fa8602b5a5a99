use std::fs;
use std::path::PathBuf;

use pfield_core::{CheckpointSink, Grid, OutputFormat, SimError, SimulationConfig};
use pfield_output::csv::write_csv;
use pfield_output::{read_csv_field, OutputError, SnapshotWriter};
use proptest::prelude::*;

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("pfield-output-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn config(format: OutputFormat) -> SimulationConfig {
    SimulationConfig {
        size: 4,
        dx: 0.03,
        dt: 1e-4,
        iterations: 20,
        n_save: 2,
        output_format: format,
        work_group_size: 0,
        platform_id: 0,
        device_id: 0,
        seed: Some(7),
    }
}

fn ramp(size: usize) -> Grid {
    let data = (0..size * size).map(|i| i as f32 * 0.25 - 1.0).collect();
    Grid::from_vec(size, data).unwrap()
}

#[test]
fn csv_snapshot_reads_back() {
    let root = scratch("csv");
    let mut writer = SnapshotWriter::create(&root, "DIFFUSION", &config(OutputFormat::Csv)).unwrap();
    assert_eq!(writer.directory(), root.join("DIFFUSION_4S_20ITERS"));

    let grid = ramp(4);
    let path = writer.write_snapshot("PHASE", 10, &grid).unwrap();
    assert_eq!(path, root.join("DIFFUSION_4S_20ITERS/PHASE_10.csv"));

    let back = read_csv_field(&path).unwrap();
    assert_eq!(back, grid);
    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn vtk_snapshot_via_sink() {
    let root = scratch("vtk");
    let mut writer = SnapshotWriter::create(&root, "KOB_ISO", &config(OutputFormat::Vtk)).unwrap();
    let grid = Grid::uniform(4, 0.5);
    writer.write_field("TEMP", 0, &grid).unwrap();
    writer.write_field("TEMP", 20, &grid).unwrap();
    assert_eq!(writer.written().len(), 2);

    let text = fs::read_to_string(root.join("KOB_ISO_4S_20ITERS/TEMP_20.vtk")).unwrap();
    assert!(text.starts_with("# vtk DataFile Version 3.0\nTEMP_fields\n"));
    assert!(text.contains("SPACING 3.000000e-02 3.000000e-02 1.000000e+00\n"));
    assert_eq!(text.lines().filter(|l| *l == "5.000000e-01").count(), 16);
    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn truncated_csv_is_malformed() {
    let root = scratch("short");
    fs::create_dir_all(&root).unwrap();
    let path = root.join("PHASE_0.csv");
    fs::write(&path, "0.000000,0.000000\n1.000000,2.000000\n").unwrap();
    assert!(matches!(
        read_csv_field(&path),
        Err(OutputError::Malformed { .. })
    ));

    fs::write(&path, "0.000000,0.000000\n1.000000\n").unwrap();
    match read_csv_field(&path) {
        Err(OutputError::Malformed { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected malformed, got {other:?}"),
    }
    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn missing_file_maps_to_io_error() {
    let err = read_csv_field(&scratch("absent").join("nope.csv")).unwrap_err();
    assert!(matches!(err, OutputError::Io { .. }));
    assert!(matches!(SimError::from(err), SimError::Io { .. }));
}

fn grid_strategy() -> impl Strategy<Value = Grid> {
    (1usize..24).prop_flat_map(|size| {
        prop::collection::vec(-100.0f32..100.0, size * size)
            .prop_map(move |data| Grid::from_vec(size, data).unwrap())
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn csv_round_trip_agrees_to_six_decimals(grid in grid_strategy()) {
        let dir = scratch("csv-prop");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("PHASE_{}.csv", grid.size()));
        let mut file = fs::File::create(&path).unwrap();
        write_csv(&mut file, &grid).unwrap();
        drop(file);

        let back = read_csv_field(&path).unwrap();
        fs::remove_dir_all(&dir).unwrap();
        prop_assert_eq!(back.size(), grid.size());
        for (written, read) in grid.as_slice().iter().zip(back.as_slice()) {
            let rounded: f32 = format!("{written:.6}").parse().unwrap();
            prop_assert_eq!(*read, rounded);
            prop_assert!((read - written).abs() <= 2e-5, "{} vs {}", read, written);
        }
    }
}
