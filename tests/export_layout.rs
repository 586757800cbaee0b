use std::collections::BTreeMap;
use std::fs;

use yoloprep::export::{export_dataset, ExportOptions};
use yoloprep::record::AnnotationRecord;
use yoloprep::split::{SplitName, SplitRatios};
use yoloprep::store::MemoryStore;

mod common;

#[test]
fn split_export_writes_three_way_layout() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let images = common::write_source_images(&temp.path().join("src"), 10);
    let records = common::make_records(&images, 1, "0");
    let mut store = MemoryStore::from_records(records);
    let out = temp.path().join("dataset");

    let opts = ExportOptions {
        seed: Some(1),
        ..ExportOptions::new(10)
    };
    let summary = export_dataset(&mut store, &out, &opts).expect("export");

    assert_eq!(summary.fetched, 10);
    let sizes = summary.sizes.expect("split sizes");
    assert_eq!((sizes.train, sizes.val, sizes.test), (8, 1, 1));

    for (split, expected) in [("train", 8), ("val", 1), ("test", 1)] {
        let images_dir = out.join(split).join("images");
        let labels_dir = out.join(split).join("labels");
        assert_eq!(common::count_files(&images_dir), expected, "{} images", split);
        assert_eq!(common::count_files(&labels_dir), expected, "{} labels", split);
    }
    assert!(out.join("data.yaml").is_file());
    assert!(!out.join("images").exists());
}

#[test]
fn every_record_lands_in_exactly_one_label_file_of_its_split() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let images = common::write_source_images(&temp.path().join("src"), 6);
    let records = common::make_records(&images, 3, "0");
    let mut store = MemoryStore::from_records(records.clone());
    let out = temp.path().join("dataset");

    let opts = ExportOptions {
        seed: Some(7),
        ..ExportOptions::new(100)
    };
    let summary = export_dataset(&mut store, &out, &opts).expect("export");
    assert_eq!(summary.total_records(), records.len());

    let expected_by_line: BTreeMap<String, &AnnotationRecord> =
        records.iter().map(|r| (r.to_label_line(), r)).collect();

    let mut seen = 0usize;
    for split in ["train", "val", "test"] {
        let labels = common::read_labels(&out.join(split).join("labels"));
        let summary_split = summary
            .splits
            .iter()
            .find(|s| s.name.as_str() == split)
            .expect("split summary");
        let lines_in_split: usize = labels.values().map(Vec::len).sum();
        assert_eq!(lines_in_split, summary_split.records);

        for (label_file, lines) in &labels {
            for line in lines {
                let record = expected_by_line.get(line).expect("line matches a record");
                assert_eq!(&record.label_file_name(), label_file);
                seen += 1;
            }
            let image_name = label_file.replace(".txt", ".bmp");
            assert!(out.join(split).join("images").join(image_name).is_file());
        }
    }
    assert_eq!(seen, records.len());
}

#[test]
fn flat_export_uses_single_images_labels_pair() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let images = common::write_source_images(&temp.path().join("src"), 4);
    let records = common::make_records(&images, 2, "0");
    let mut store = MemoryStore::from_records(records);
    let out = temp.path().join("flat");

    let opts = ExportOptions {
        split_data: false,
        ..ExportOptions::new(100)
    };
    let summary = export_dataset(&mut store, &out, &opts).expect("export");

    assert!(summary.sizes.is_none());
    assert_eq!(summary.splits.len(), 1);
    assert_eq!(summary.splits[0].name, SplitName::All);

    let dirs: Vec<String> = fs::read_dir(&out)
        .expect("read output")
        .filter_map(Result::ok)
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    let mut dirs = dirs;
    dirs.sort();
    assert_eq!(dirs, vec!["images".to_string(), "labels".to_string()]);

    let labels = common::read_labels(&out.join("labels"));
    assert_eq!(labels.len(), 4);
    assert!(labels.values().all(|lines| lines.len() == 2));
    assert_eq!(common::count_files(&out.join("images")), 4);
}

#[test]
fn class_filter_restricts_exported_lines() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let images = common::write_source_images(&temp.path().join("src"), 3);
    let mut records = common::make_records(&images, 1, "0");
    records.extend(common::make_records(&images, 1, "1"));
    records.extend(common::make_records(&images, 1, "2"));
    let mut store = MemoryStore::from_records(records);
    let out = temp.path().join("filtered");

    let opts = ExportOptions {
        split_data: false,
        classes: vec!["1".to_string(), "2".to_string()],
        ..ExportOptions::new(100)
    };
    let summary = export_dataset(&mut store, &out, &opts).expect("export");
    assert_eq!(summary.fetched, 6);

    for lines in common::read_labels(&out.join("labels")).values() {
        for line in lines {
            let class = line.split(' ').next().expect("class field");
            assert!(class == "1" || class == "2", "unexpected class in {:?}", line);
        }
    }
}

#[test]
fn default_filter_exports_only_class_zero() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let images = common::write_source_images(&temp.path().join("src"), 2);
    let mut records = common::make_records(&images, 1, "0");
    records.extend(common::make_records(&images, 1, "5"));
    let mut store = MemoryStore::from_records(records);

    let opts = ExportOptions {
        split_data: false,
        ..ExportOptions::new(100)
    };
    let summary =
        export_dataset(&mut store, &temp.path().join("out"), &opts).expect("export");
    assert_eq!(summary.classes, vec!["0".to_string()]);
    assert_eq!(summary.fetched, 2);
}

#[test]
fn limit_caps_fetched_annotation_rows() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let images = common::write_source_images(&temp.path().join("src"), 5);
    let records = common::make_records(&images, 4, "0");
    let mut store = MemoryStore::from_records(records);

    let summary = export_dataset(
        &mut store,
        &temp.path().join("out"),
        &ExportOptions::new(7),
    )
    .expect("export");
    assert_eq!(summary.fetched, 7);
    assert_eq!(summary.total_records(), 7);
}

#[test]
fn rerun_rewrites_labels_without_stale_lines() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let images = common::write_source_images(&temp.path().join("src"), 2);
    let out = temp.path().join("out");
    let opts = ExportOptions {
        split_data: false,
        ..ExportOptions::new(100)
    };

    let first_run = common::make_records(&images, 3, "0");
    let mut store = MemoryStore::from_records(first_run);
    export_dataset(&mut store, &out, &opts).expect("first export");

    let second_run = vec![
        AnnotationRecord::new(images[0].clone(), 0.9, 0.9, 0.05, 0.05, "0"),
        AnnotationRecord::new(images[1].clone(), 0.8, 0.8, 0.05, 0.05, "0"),
    ];
    let mut store = MemoryStore::from_records(second_run);
    export_dataset(&mut store, &out, &opts).expect("second export");

    let labels = common::read_labels(&out.join("labels"));
    assert_eq!(labels.len(), 2);
    assert_eq!(labels["img_000.txt"], vec!["0 0.9 0.9 0.05 0.05".to_string()]);
    assert_eq!(labels["img_001.txt"], vec!["0 0.8 0.8 0.05 0.05".to_string()]);
}

#[test]
fn uneven_ratios_give_remainder_to_test() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let images = common::write_source_images(&temp.path().join("src"), 7);
    let records = common::make_records(&images, 1, "0");
    let mut store = MemoryStore::from_records(records);

    let opts = ExportOptions {
        ratios: SplitRatios::new(0.5, 0.2, 0.0),
        write_data_yaml: false,
        ..ExportOptions::new(100)
    };
    let out = temp.path().join("out");
    let summary = export_dataset(&mut store, &out, &opts).expect("export");

    let sizes = summary.sizes.expect("sizes");
    assert_eq!((sizes.train, sizes.val, sizes.test), (3, 1, 3));
    assert!(!out.join("data.yaml").exists());
}
