use eyre::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::warn;

use crate::record::PlotFrame;

/// Chart raster size, 16:9.
pub const WIDTH: u32 = 1280;
pub const HEIGHT: u32 = 720;

/// Height of the strip under the chart carrying the metadata title lines.
const TITLE_STRIP: u32 = 100;

/// Fraction of a column slot left blank on each side of its bar.
const BAR_INSET: f64 = 0.15;

macro_rules! hexcolour {
    ($colour:literal) => {
        RGBColor(
            (($colour & 0xFF0000) >> 16) as u8,
            (($colour & 0x00FF00) >> 8) as u8,
            ($colour & 0x0000FF) as u8,
        )
    };
}

pub const COLOURS: &[RGBColor] = &[
    hexcolour!(0xAA0000),
    hexcolour!(0x0000FF),
    hexcolour!(0x888888),
    hexcolour!(0xDDCC77),
    hexcolour!(0x999933),
    hexcolour!(0x332288),
    hexcolour!(0x117733),
    hexcolour!(0x88CCEE),
    hexcolour!(0x882255),
    hexcolour!(0x44AA99),
    hexcolour!(0xAA4499),
    hexcolour!(0xCC6677),
];

/// Draws one benchmark record as a bar chart: one bar per operation column in
/// record order, log-scaled y axis in nanoseconds, no x tick labels, and the
/// metadata title rendered in a strip under the plot. Operation names go into
/// the legend. An empty frame draws the bare axes.
pub fn draw(root: DrawingArea<BitMapBackend<'_>, Shift>, frame: &PlotFrame, title: &str) -> Result<()> {
    root.fill(&WHITE)?;
    let (chart_area, title_area) = root.split_vertically((HEIGHT - TITLE_STRIP) as i32);

    let (y_lo, y_hi) = y_bounds(frame);
    let slots = frame.columns.len().max(1) as f64;

    let mut chart = ChartBuilder::on(&chart_area)
        .margin(20)
        .y_label_area_size(90)
        .build_cartesian_2d(0f64..slots, (y_lo..y_hi).log_scale())?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .y_desc("Nanoseconds")
        .axis_desc_style(("sans-serif", 22))
        .label_style(("sans-serif", 16))
        .draw()?;

    for (idx, column) in frame.columns.iter().enumerate() {
        if column.nanos <= 0.0 {
            warn!(
                "omitting `{}`: {} ns has no place on a log scale",
                column.name, column.nanos
            );
            continue;
        }
        let colour = COLOURS[idx % COLOURS.len()];
        let left = idx as f64 + BAR_INSET;
        let right = (idx + 1) as f64 - BAR_INSET;
        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(left, y_lo), (right, column.nanos)],
                colour.filled(),
            )))?
            .label(column.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], colour.filled()));
    }

    if frame.columns.iter().any(|c| c.nanos > 0.0) {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", 16))
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }

    draw_title(&title_area, title)?;
    root.present()?;
    Ok(())
}

fn draw_title(area: &DrawingArea<BitMapBackend<'_>, Shift>, title: &str) -> Result<()> {
    let style = ("sans-serif", 22)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (idx, line) in title.lines().enumerate() {
        area.draw(&Text::new(
            line.to_owned(),
            (WIDTH as i32 / 2, 8 + idx as i32 * 28),
            style.clone(),
        ))?;
    }
    Ok(())
}

/// Y range rounded out to whole decades around the positive values; an
/// arbitrary non-degenerate range when nothing is plottable.
fn y_bounds(frame: &PlotFrame) -> (f64, f64) {
    let Some((min, max)) = frame.positive_range() else {
        return (1.0, 1_000_000.0);
    };
    let lo = 10f64.powi(min.log10().floor() as i32);
    let mut hi = 10f64.powi(max.log10().ceil() as i32);
    if hi <= lo {
        hi = lo * 10.0;
    }
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::BenchmarkRecord;

    fn render(frame: &PlotFrame, title: &str) -> Vec<u8> {
        let mut buffer = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
        let root = BitMapBackend::with_buffer(&mut buffer, (WIDTH, HEIGHT)).into_drawing_area();
        draw(root, frame, title).unwrap();
        buffer
    }

    fn contains_colour(buffer: &[u8], colour: RGBColor) -> bool {
        buffer
            .chunks_exact(3)
            .any(|px| px == [colour.0, colour.1, colour.2])
    }

    #[test]
    fn renders_bars_for_example_record() {
        let record = BenchmarkRecord::from_json(
            r#"{"already_in": 100, "read_percent": 50, "total_queries": 1000, "op_get": 120, "op_put": 340}"#,
        )
        .unwrap();
        let buffer = render(&record.frame().unwrap(), &record.title());
        assert!(contains_colour(&buffer, COLOURS[0]));
        assert!(contains_colour(&buffer, COLOURS[1]));
    }

    #[test]
    fn empty_frame_renders_without_error() {
        let frame = PlotFrame::default();
        let buffer = render(
            &frame,
            "already_in = 3 keys\nread_percent = 80%\ntotal_queries = 12",
        );
        // Axes still get drawn on the white fill.
        assert!(buffer.chunks_exact(3).any(|px| px != [255u8, 255, 255]));
    }

    #[test]
    fn non_positive_columns_are_omitted() {
        let record =
            BenchmarkRecord::from_json(r#"{"op_zero": 0, "op_real": 500}"#).unwrap();
        let buffer = render(&record.frame().unwrap(), &record.title());
        assert!(!contains_colour(&buffer, COLOURS[0]));
        assert!(contains_colour(&buffer, COLOURS[1]));
    }

    #[test]
    fn y_bounds_round_out_to_decades() {
        let frame = BenchmarkRecord::from_json(r#"{"op_a": 120, "op_b": 340}"#)
            .unwrap()
            .frame()
            .unwrap();
        assert_eq!(y_bounds(&frame), (100.0, 1000.0));

        let flat = BenchmarkRecord::from_json(r#"{"op_a": 100}"#)
            .unwrap()
            .frame()
            .unwrap();
        assert_eq!(y_bounds(&flat), (100.0, 1000.0));
    }
}
