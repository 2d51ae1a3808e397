//! End-to-end checks of the library entry points against datasets on disk.

use labelscope::dataset::{self, DatasetLayout};
use labelscope::distribution::{plot_box_distributions, PlotOutcome};
use labelscope::figure::{Measure, DEFAULT_BINS};
use labelscope::label::ClassId;
use labelscope::overlay::annotate_image;
use labelscope::summary::{summarize_dataset, summarize_split};
use labelscope::LabelscopeError;

mod common;

#[test]
fn summary_counts_images_labels_and_classes() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::small_dataset(temp.path());

    let summary = summarize_dataset(temp.path()).expect("summarize");
    assert_eq!(summary.images, 2);
    assert_eq!(summary.label_files, 2);
    assert_eq!(summary.total_objects(), 3);

    let counts: Vec<(u32, usize)> = summary
        .classes
        .iter()
        .map(|c| (c.class_id.as_u32(), c.count))
        .collect();
    assert_eq!(counts, vec![(0, 2), (1, 1)]);

    let width = summary.image_sizes.width.as_ref().expect("width stats");
    assert_eq!(width.count, 2);
    assert_eq!(width.min, 100.0);
    assert_eq!(width.max, 200.0);
    assert_eq!(width.mean, 150.0);

    let (images_dir, labels_dir, names) = summary.into_parts();
    assert!(images_dir.ends_with("train/images"));
    assert!(labels_dir.ends_with("train/labels"));
    assert_eq!(names.get(ClassId(1)), Some("dog"));
}

#[test]
fn summary_of_empty_split_has_no_statistics() {
    let temp = tempfile::tempdir().expect("create temp dir");
    common::DatasetFixture::new(temp.path(), "names: {0: cat}\n");

    let summary = summarize_dataset(temp.path()).expect("summarize");
    assert_eq!(summary.images, 0);
    assert!(summary.image_sizes.width.is_none());
    assert!(summary.classes.is_empty());
    assert_eq!(summary.class_names.len(), 1);
}

#[test]
fn summary_fails_on_non_integer_class_token() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let fixture = common::DatasetFixture::new(temp.path(), "names: [cat]\n");
    fixture.labels("a.txt", "0 0.5 0.5 0.1 0.1\ncat 0.5 0.5 0.1 0.1\n");

    let err = summarize_split(temp.path(), "train").unwrap_err();
    match err {
        LabelscopeError::LabelParse { line, .. } => assert_eq!(line, 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn summary_skips_non_image_files() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let fixture = common::small_dataset(temp.path());
    common::write_text(&fixture.images_dir().join("notes.md"), "not an image");

    let summary = summarize_dataset(temp.path()).expect("summarize");
    assert_eq!(summary.images, 2);
}

#[test]
fn overlay_resolves_pixel_boxes_for_second_image() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let fixture = common::small_dataset(temp.path());
    let layout = DatasetLayout::discover(temp.path(), dataset::DEFAULT_SPLIT).expect("layout");
    let names = dataset::read_data_yaml(&layout.data_yaml).expect("names");

    let annotated =
        annotate_image(&fixture.images_dir(), &fixture.labels_dir(), &names, 1).expect("annotate");
    assert_eq!(annotated.stem, "b");
    assert_eq!((annotated.width, annotated.height), (200, 150));
    assert_eq!(annotated.overlays.len(), 1);

    let overlay = &annotated.overlays[0];
    assert_eq!(overlay.label, "cat");
    assert!((overlay.rect.x0 - 50.0).abs() < 1e-9);
    assert!((overlay.rect.y0 - 37.5).abs() < 1e-9);
    assert!((overlay.rect.x1 - 150.0).abs() < 1e-9);
    assert!((overlay.rect.y1 - 112.5).abs() < 1e-9);
}

#[test]
fn overlay_labels_unknown_classes_by_id() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let fixture = common::DatasetFixture::new(temp.path(), "names: [cat]\n");
    fixture
        .image("x.png", 10, 10)
        .labels("x.txt", "7 0.5 0.5 0.5 0.5\n");
    let names = dataset::read_data_yaml(&temp.path().join("data.yaml")).expect("names");

    let annotated =
        annotate_image(&fixture.images_dir(), &fixture.labels_dir(), &names, 0).expect("annotate");
    assert_eq!(annotated.overlays[0].label, "7");
}

#[test]
fn box_distribution_figure_has_one_series_per_class() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let fixture = common::small_dataset(temp.path());
    common::write_text(
        &fixture.labels_dir().join("c.txt"),
        "garbage\n1 0.5 0.5 0.3 0.2\n",
    );

    let outcome = plot_box_distributions(&fixture.labels_dir(), DEFAULT_BINS).expect("plot");
    let PlotOutcome::Figure {
        distribution,
        figure,
    } = outcome
    else {
        panic!("expected a figure");
    };

    assert_eq!(distribution.total_boxes(), 4);
    let measures: Vec<Measure> = figure.panels.iter().map(|p| p.measure).collect();
    assert_eq!(measures, Measure::ALL.to_vec());
    for panel in &figure.panels {
        let labels: Vec<&str> = panel.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Class 0", "Class 1"]);
        for series in &panel.series {
            assert_eq!(series.bins.len(), DEFAULT_BINS);
        }
    }
}
