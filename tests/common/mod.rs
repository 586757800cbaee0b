#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use yoloprep::record::AnnotationRecord;

pub fn bmp_bytes(width: u32, height: u32) -> Vec<u8> {
    let row_stride = (width * 3).div_ceil(4) * 4;
    let pixel_array_size = row_stride * height;
    let file_size = 54 + pixel_array_size;

    let mut bytes = Vec::with_capacity(file_size as usize);
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&file_size.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&54u32.to_le_bytes());

    bytes.extend_from_slice(&40u32.to_le_bytes());
    bytes.extend_from_slice(&(width as i32).to_le_bytes());
    bytes.extend_from_slice(&(height as i32).to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&24u16.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&pixel_array_size.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&2835u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());

    bytes.resize(file_size as usize, 0);
    bytes
}

pub fn write_bmp(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bmp_bytes(width, height)).expect("write bmp file");
}

/// Write `count` source images named `img_000.bmp`, … into `dir`.
pub fn write_source_images(dir: &Path, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("img_{:03}.bmp", i));
            write_bmp(&path, 8, 8);
            path.to_string_lossy().into_owned()
        })
        .collect()
}

/// Build `per_image` records for every image. Each record's x_center is
/// unique so exported lines can be traced back to their record.
pub fn make_records(images: &[String], per_image: usize, class_name: &str) -> Vec<AnnotationRecord> {
    let mut records = Vec::new();
    let mut serial = 0usize;
    for image in images {
        for _ in 0..per_image {
            serial += 1;
            let x_center = serial as f64 / 10_000.0;
            records.push(AnnotationRecord::new(
                image.clone(),
                x_center,
                0.5,
                0.1,
                0.2,
                class_name,
            ));
        }
    }
    records
}

/// Read every label file in `labels_dir` into `file name -> lines`.
pub fn read_labels(labels_dir: &Path) -> BTreeMap<String, Vec<String>> {
    let mut labels = BTreeMap::new();
    if !labels_dir.is_dir() {
        return labels;
    }

    for entry in fs::read_dir(labels_dir).expect("read labels dir") {
        let path = entry.expect("dir entry").path();
        let content = fs::read_to_string(&path).expect("read label file");
        let lines = content.split('\n').map(str::to_string).collect();
        labels.insert(
            path.file_name()
                .expect("file name")
                .to_string_lossy()
                .into_owned(),
            lines,
        );
    }
    labels
}

/// Count files directly inside `dir`.
pub fn count_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .map(|entries| entries.filter_map(Result::ok).count())
        .unwrap_or(0)
}
