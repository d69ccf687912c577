mod common;

use common::synthetic::{
    blank_page, draw_blob, draw_horizontal_ruling, draw_vertical_ruling, fragmented_horizontal,
    fragmented_vertical, StubDetector,
};
use table_detector::merge::LineMergeOptions;
use table_detector::prelude::*;
use table_detector::{ElementParams, StructureParams, TableDetector, TableParams};

fn small_page_params() -> TableParams {
    TableParams {
        structure: StructureParams {
            horizontal: LineMergeOptions {
                min_segment_length: Some(20.0),
                max_off_axis: Some(0.1),
                extension_px: 80,
                min_span_px: 300,
                stroke_thickness: 5,
            },
            vertical: LineMergeOptions {
                min_segment_length: Some(20.0),
                max_off_axis: Some(0.1),
                extension_px: 80,
                min_span_px: 250,
                stroke_thickness: 5,
            },
        },
        elements: ElementParams::default(),
        lsd: Default::default(),
    }
}

/// Page with a 2x2-interior grid (rulings at y = 100, 300 and x = 150, 400)
/// and one content blob centered at (200, 150).
fn grid_page() -> image::GrayImage {
    let mut page = blank_page(600, 450);
    draw_horizontal_ruling(&mut page, 100, 20, 580, 3);
    draw_horizontal_ruling(&mut page, 300, 20, 580, 3);
    draw_vertical_ruling(&mut page, 150, 20, 430, 3);
    draw_vertical_ruling(&mut page, 400, 20, 430, 3);
    draw_blob(&mut page, 200, 150, 12);
    page
}

fn stub_for_grid_page() -> StubDetector {
    let mut segments = Vec::new();
    segments.extend(fragmented_horizontal(100.0, &[(20.0, 250.0), (290.0, 580.0)]));
    segments.extend(fragmented_horizontal(300.0, &[(20.0, 250.0), (290.0, 580.0)]));
    segments.extend(fragmented_vertical(150.0, &[(20.0, 200.0), (240.0, 430.0)]));
    segments.extend(fragmented_vertical(400.0, &[(20.0, 200.0), (240.0, 430.0)]));
    StubDetector { segments }
}

#[test]
fn full_pipeline_reconstructs_the_grid_and_bins_the_blob() {
    let page = grid_page();
    let detector =
        TableDetector::with_segment_detector(small_page_params(), Box::new(stub_for_grid_page()))
            .unwrap();
    let report = detector.process(&page).unwrap();
    let description = &report.description;

    assert_eq!(description.horizontal_lines.len(), 2);
    assert_eq!(description.vertical_lines.len(), 2);
    assert_eq!(description.all_lines.len(), 4);

    let mut ys: Vec<i32> = description
        .horizontal_lines
        .iter()
        .map(|l| l.mean_coordinate(LineOrientation::Horizontal))
        .collect();
    ys.sort_unstable();
    assert!((ys[0] - 100).abs() <= 1, "ys = {ys:?}");
    assert!((ys[1] - 300).abs() <= 1, "ys = {ys:?}");

    // the ruling ink is erased, leaving exactly the one blob
    assert_eq!(description.elements.len(), 1, "elements = {:?}", description.elements);
    let center = description.elements[0].center();
    assert!((center.x - 200).abs() <= 3 && (center.y - 150).abs() <= 3);

    let cells = CellMap::from_description(description);
    let rects = cells
        .get(CellIndex { row: 1, col: 1 })
        .expect("blob in cell (1, 1)");
    assert_eq!(rects.len(), 1);

    assert_eq!(report.horizontal.lines, 2);
    assert_eq!(report.vertical.lines, 2);
    assert_eq!(report.elements.elements, 1);
    assert!(report.latency_ms >= 0.0);
}

#[test]
fn structure_detection_alone_matches_the_composed_run() {
    let page = grid_page();
    let detector =
        TableDetector::with_segment_detector(small_page_params(), Box::new(stub_for_grid_page()))
            .unwrap();
    let structure = detector.detect_structure(&page).unwrap();
    let composed = detector.detect(&page).unwrap();
    assert_eq!(structure.horizontal_lines, composed.horizontal_lines);
    assert_eq!(structure.vertical_lines, composed.vertical_lines);
    assert!(structure.elements.is_empty());

    let elements = detector.detect_elements(&page, &structure.all_lines).unwrap();
    assert_eq!(elements, composed.elements);
}

#[test]
fn lineless_page_yields_sentinel_grids_and_the_origin_cell() {
    let mut page = blank_page(600, 450);
    draw_blob(&mut page, 200, 150, 12);
    draw_blob(&mut page, 450, 380, 10);

    let detector = TableDetector::with_segment_detector(
        small_page_params(),
        Box::new(StubDetector { segments: vec![] }),
    )
    .unwrap();
    let report = detector.process(&page).unwrap();

    assert!(report.description.horizontal_lines.is_empty());
    assert!(report.description.vertical_lines.is_empty());
    assert_eq!(report.description.elements.len(), 2);

    let rows = GridCoordinates::from_lines(
        &report.description.horizontal_lines,
        LineOrientation::Horizontal,
    );
    let cols = GridCoordinates::from_lines(
        &report.description.vertical_lines,
        LineOrientation::Vertical,
    );
    assert_eq!(rows.values(), &[0]);
    assert_eq!(cols.values(), &[0]);

    let cells = CellMap::from_description(&report.description);
    assert_eq!(cells.len(), 1);
    assert_eq!(
        cells.get(CellIndex { row: 0, col: 0 }).unwrap().len(),
        2
    );
}

#[test]
fn gradient_extractor_recovers_a_clean_ruling_end_to_end() {
    let mut page = blank_page(400, 200);
    draw_horizontal_ruling(&mut page, 100, 30, 370, 3);

    let detector = TableDetector::new(small_page_params()).unwrap();
    let structure = detector.detect_structure(&page).unwrap();

    assert_eq!(
        structure.horizontal_lines.len(),
        1,
        "lines = {:?}",
        structure.horizontal_lines
    );
    let y = structure.horizontal_lines[0].mean_coordinate(LineOrientation::Horizontal);
    assert!((y - 100).abs() <= 3, "y = {y}");
    assert!(structure.vertical_lines.is_empty());
}
