#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Write a black RGB image; the encoder follows the file extension.
pub fn write_image(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    image::RgbImage::new(width, height)
        .save(path)
        .expect("write image file");
}

pub fn write_text(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, contents).expect("write text file");
}

/// A YOLO export on disk: `data.yaml` plus `<split>/images` and `<split>/labels`.
pub struct DatasetFixture {
    pub root: PathBuf,
    pub split: String,
}

impl DatasetFixture {
    pub fn new(root: &Path, names_yaml: &str) -> Self {
        let fixture = Self {
            root: root.to_path_buf(),
            split: "train".to_string(),
        };
        write_text(&root.join("data.yaml"), names_yaml);
        fs::create_dir_all(fixture.images_dir()).expect("create images dir");
        fs::create_dir_all(fixture.labels_dir()).expect("create labels dir");
        fixture
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.join(&self.split).join("images")
    }

    pub fn labels_dir(&self) -> PathBuf {
        self.root.join(&self.split).join("labels")
    }

    pub fn image(&self, file_name: &str, width: u32, height: u32) -> &Self {
        write_image(&self.images_dir().join(file_name), width, height);
        self
    }

    pub fn labels(&self, file_name: &str, contents: &str) -> &Self {
        write_text(&self.labels_dir().join(file_name), contents);
        self
    }
}

/// Two images, two label files, three objects over two named classes.
pub fn small_dataset(root: &Path) -> DatasetFixture {
    let fixture = DatasetFixture::new(root, "names: [cat, dog]\n");
    fixture
        .image("a.jpg", 100, 50)
        .image("b.png", 200, 150)
        .labels("a.txt", "0 0.5 0.5 0.2 0.4\n1 0.25 0.25 0.1 0.1\n")
        .labels("b.txt", "0 0.5 0.5 0.5 0.5\n");
    fixture
}
