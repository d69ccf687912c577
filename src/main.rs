use table_detector::io;
use table_detector::prelude::*;

fn main() -> table_detector::Result<()> {
    env_logger::init();

    // Demo: process the page given as the first argument, or a blank buffer
    // when invoked without one. An optional second argument names a JSON
    // file for the full report.
    let mut args = std::env::args().skip(1);
    let page = match args.next() {
        Some(path) => io::load_grayscale(&path)?,
        None => image::GrayImage::new(640, 480),
    };

    let detector = TableDetector::new(TableParams::default())?;
    let report = detector.process(&page)?;
    let cells = CellMap::from_description(&report.description);

    println!(
        "horizontal={} vertical={} elements={} non_empty_cells={} latency_ms={:.3}",
        report.description.horizontal_lines.len(),
        report.description.vertical_lines.len(),
        report.description.elements.len(),
        cells.len(),
        report.latency_ms
    );

    if let Some(out) = args.next() {
        io::write_json_file(&out, &report)?;
        println!("report written to {out}");
    }
    Ok(())
}
