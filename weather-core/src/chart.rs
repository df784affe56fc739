//! Line charts of a day's hourly temperatures, encoded as PNG.

use std::{io::Cursor, ops::Range, sync::OnceLock};

use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters::style::{FontStyle, register_font};

use crate::{
    error::{Result, WeatherError},
    model::HourlySample,
};

pub const CHART_WIDTH: u32 = 640;
pub const CHART_HEIGHT: u32 = 480;

static FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
static FONT_READY: OnceLock<bool> = OnceLock::new();

/// Hour index (0..N-1) against temperature, ready for [`render_line_chart`].
pub fn hourly_series(hourly: &[HourlySample]) -> (Vec<f64>, Vec<f64>) {
    hourly
        .iter()
        .enumerate()
        .map(|(i, s)| (i as f64, s.temperature))
        .unzip()
}

/// Draw `y` against `x` as a single line and return the PNG bytes.
pub fn render_line_chart(x: &[f64], y: &[f64], x_label: &str, y_label: &str) -> Result<Vec<u8>> {
    if x.is_empty() {
        return Err(WeatherError::Chart("nothing to plot".into()));
    }
    if x.len() != y.len() {
        return Err(WeatherError::Chart(format!(
            "series length mismatch: {} x values, {} y values",
            x.len(),
            y.len()
        )));
    }
    ensure_font()?;

    let mut pixels = vec![0u8; (CHART_WIDTH * CHART_HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (CHART_WIDTH, CHART_HEIGHT))
            .into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(55)
            .build_cartesian_2d(padded_range(x, 0.0), padded_range(y, 0.05))
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .x_desc(x_label)
            .y_desc(y_label)
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(LineSeries::new(
                x.iter().copied().zip(y.iter().copied()),
                BLUE.stroke_width(2),
            ))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }

    let img = RgbImage::from_raw(CHART_WIDTH, CHART_HEIGHT, pixels)
        .ok_or_else(|| WeatherError::Chart("pixel buffer has the wrong size".into()))?;

    let mut png = Cursor::new(Vec::new());
    img.write_to(&mut png, ImageFormat::Png).map_err(chart_err)?;
    Ok(png.into_inner())
}

fn ensure_font() -> Result<()> {
    let ready = *FONT_READY.get_or_init(|| register_font("sans-serif", FontStyle::Normal, FONT).is_ok());
    if ready {
        Ok(())
    } else {
        Err(WeatherError::Chart("could not load chart font".into()))
    }
}

/// Data bounds widened by `pad` of their span; a zero span is widened by 1.
fn padded_range(values: &[f64], pad: f64) -> Range<f64> {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;
    if span <= f64::EPSILON {
        return (lo - 1.0)..(hi + 1.0);
    }
    (lo - span * pad)..(hi + span * pad)
}

fn chart_err(e: impl std::fmt::Display) -> WeatherError {
    WeatherError::Chart(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn series_uses_hour_index() {
        let hourly = [12.0, 11.5, 13.25].map(|temperature| HourlySample { temperature });
        let (x, y) = hourly_series(&hourly);
        assert_eq!(x, vec![0.0, 1.0, 2.0]);
        assert_eq!(y, vec![12.0, 11.5, 13.25]);
    }

    #[test]
    fn renders_png() {
        let y: Vec<f64> = (0..24).map(|h| 15.0 + (h as f64 / 4.0).sin() * 6.0).collect();
        let x: Vec<f64> = (0..24).map(f64::from).collect();

        let png = render_line_chart(&x, &y, "Hour", "Temperature (C)").unwrap();
        assert!(png.starts_with(PNG_MAGIC));

        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        assert_eq!(decoded.width(), CHART_WIDTH);
        assert_eq!(decoded.height(), CHART_HEIGHT);
    }

    #[test]
    fn flat_series_still_renders() {
        let png = render_line_chart(&[0.0], &[20.0], "Hour", "Temperature (F)").unwrap();
        assert!(png.starts_with(PNG_MAGIC));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(render_line_chart(&[], &[], "x", "y"), Err(WeatherError::Chart(_))));
        assert!(matches!(
            render_line_chart(&[0.0, 1.0], &[3.0], "x", "y"),
            Err(WeatherError::Chart(_))
        ));
    }

    #[test]
    fn padded_range_widens_flat_data() {
        assert_eq!(padded_range(&[5.0, 5.0], 0.05), 4.0..6.0);
        assert_eq!(padded_range(&[0.0, 10.0], 0.1), -1.0..11.0);
    }
}
