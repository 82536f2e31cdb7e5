use std::fs;
use std::io::Write;
use std::path::Path;

use irn_experiments::{read_class, read_network_file, write_survival_csv, ExperimentError};

fn path_gml(n: usize) -> String {
    let mut text = String::from("graph [\n");
    for id in 0..n {
        text.push_str(&format!("  node [\n    id {id}\n    label \"{id}\"\n  ]\n"));
    }
    for id in 1..n {
        text.push_str(&format!("  edge [\n    source {}\n    target {id}\n  ]\n", id - 1));
    }
    text.push_str("]\n");
    text
}

fn write_zip(path: &Path, files: &[(&str, String)]) {
    let file = fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    for (name, contents) in files {
        zip.start_file(*name, zip::write::FileOptions::default())
            .unwrap();
        zip.write_all(contents.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

fn write_tar_gz(path: &Path, files: &[(&str, String)]) {
    let file = fs::File::create(path).unwrap();
    let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, name, contents.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

#[test]
fn directory_class_is_ordered_by_numeric_id() {
    let dir = tempfile::tempdir().unwrap();
    let class_dir = dir.path().join("paths");
    fs::create_dir(&class_dir).unwrap();
    fs::write(class_dir.join("instance-10.txt"), path_gml(10)).unwrap();
    fs::write(class_dir.join("instance-2.txt"), path_gml(2)).unwrap();
    fs::write(class_dir.join("instance-7.txt"), path_gml(7)).unwrap();
    fs::write(class_dir.join("README.txt"), "not a network").unwrap();

    let class = read_class(&class_dir).unwrap();

    assert_eq!(class.name, "paths");
    let sizes: Vec<usize> = class.networks.iter().map(|n| n.agent_count()).collect();
    assert_eq!(sizes, vec![2, 7, 10]);
}

#[test]
fn zip_class_matches_directory_layout() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("paths.zip");
    write_zip(
        &archive,
        &[
            ("paths/instance-3.txt", path_gml(3)),
            ("paths/instance-1.txt", path_gml(5)),
            ("paths/notes.md", "ignored".to_string()),
        ],
    );

    let class = read_class(&archive).unwrap();

    assert_eq!(class.name, "paths");
    let sizes: Vec<usize> = class.networks.iter().map(|n| n.agent_count()).collect();
    assert_eq!(sizes, vec![5, 3]);
    assert_eq!(class.networks[0].edge_count(), 4);
}

#[test]
fn parse_errors_name_the_instance_file() {
    let dir = tempfile::tempdir().unwrap();
    let class_dir = dir.path().join("broken");
    fs::create_dir(&class_dir).unwrap();
    fs::write(class_dir.join("instance-0.txt"), path_gml(3)).unwrap();
    fs::write(class_dir.join("instance-1.txt"), "graph [\n node [ id zero ]\n]").unwrap();

    match read_class(&class_dir) {
        Err(ExperimentError::Parse { path, line, .. }) => {
            assert!(path.ends_with("instance-1.txt"));
            assert_eq!(line, 2);
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn tar_gz_class_is_ordered_by_numeric_id() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("pair.tar.gz");
    write_tar_gz(
        &archive,
        &[
            ("pair/instance-11.txt", path_gml(4)),
            ("pair/instance-0.txt", path_gml(2)),
            ("pair/README", "ignored".to_string()),
        ],
    );

    let class = read_class(&archive).unwrap();

    assert_eq!(class.name, "pair");
    let sizes: Vec<usize> = class.networks.iter().map(|n| n.agent_count()).collect();
    assert_eq!(sizes, vec![2, 4]);
    assert_eq!(class.networks[1].edge_count(), 3);
}

#[test]
fn corrupt_tar_gz_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("broken.tar.gz");
    fs::write(&archive, b"not gzip data").unwrap();
    assert!(matches!(read_class(&archive), Err(ExperimentError::Io { .. })));
}

#[test]
fn unsupported_class_path_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("class.rar");
    fs::write(&file, b"").unwrap();
    assert!(matches!(read_class(&file), Err(ExperimentError::Config(_))));
}

#[test]
fn missing_network_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = read_network_file(dir.path().join("absent.txt"));
    assert!(matches!(result, Err(ExperimentError::Io { .. })));
}

#[test]
fn survival_csv_round_trips_through_csv_reader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paths.csv");
    write_survival_csv(&path, "paths", &[1.0, 0.5, 0.125]).unwrap();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&path)
        .unwrap();
    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 2);
    assert_eq!(&records[0][0], "paths");
    let rates: Vec<f64> = records[1].iter().map(|v| v.parse().unwrap()).collect();
    assert_eq!(rates, vec![1.0, 0.5, 0.125]);
}
