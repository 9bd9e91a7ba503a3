//! PNG bar chart of the top export destinations, drawn with plotters.

use crate::domain::config::ChartSettings;
use crate::domain::error::TradeError;
use crate::domain::ranking::DestinationTotal;
use crate::ports::chart_port::ChartPort;
use plotters::prelude::*;
use plotters::style::{register_font, FontDesc, FontFamily, FontStyle, FontTransform};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const FONT_FAMILY: &str = "sans-serif";
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

/// Searched in order when no font is configured.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Path of the font currently registered under [`FONT_FAMILY`].
static FONT: Mutex<Option<PathBuf>> = Mutex::new(None);

pub struct BarChartAdapter {
    settings: ChartSettings,
}

fn font(size: f64) -> FontDesc<'static> {
    FontDesc::new(FontFamily::Name(FONT_FAMILY), size, FontStyle::Normal)
}

fn render_error(e: impl std::fmt::Display) -> TradeError {
    TradeError::reporting(e.to_string())
}

/// Register the label font with plotters. A configured font replaces
/// whatever was registered before; without one the first system font found
/// is kept for the rest of the process.
fn ensure_font(configured: Option<&Path>) -> Result<(), TradeError> {
    let mut current = FONT
        .lock()
        .map_err(|_| TradeError::reporting("font registry lock poisoned"))?;

    let path = match (configured, current.as_ref()) {
        (Some(path), Some(registered)) if path == registered.as_path() => return Ok(()),
        (Some(path), _) => path.to_path_buf(),
        (None, Some(_)) => return Ok(()),
        (None, None) => SYSTEM_FONTS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.is_file())
            .ok_or_else(|| {
                TradeError::reporting(
                    "no TrueType font found; set [report] font in the config file",
                )
            })?,
    };

    let bytes = fs::read(&path).map_err(|e| {
        TradeError::reporting(format!("failed to read font {}: {}", path.display(), e))
    })?;
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    register_font(FONT_FAMILY, FontStyle::Normal, bytes).map_err(|_| {
        TradeError::reporting(format!("invalid font {}", path.display()))
    })?;

    *current = Some(path);
    Ok(())
}

/// Y axis range that always contains zero and leaves headroom above the
/// tallest bar. Totals must be finite; the bounds stay finite too.
fn value_range(ranking: &[DestinationTotal]) -> (f64, f64) {
    let max = ranking.iter().map(|d| d.total).fold(0.0_f64, f64::max);
    let min = ranking.iter().map(|d| d.total).fold(0.0_f64, f64::min);
    let upper = if max > 0.0 { (max * 1.1).min(f64::MAX) } else { 1.0 };
    let lower = if min < 0.0 { (min * 1.1).max(f64::MIN) } else { 0.0 };
    (lower, upper)
}

impl BarChartAdapter {
    pub fn new(settings: ChartSettings) -> Self {
        Self { settings }
    }

    fn draw(&self, ranking: &[DestinationTotal], path: &Path) -> Result<(), TradeError> {
        let size = (self.settings.width, self.settings.height);
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let names: Vec<&str> = ranking.iter().map(|d| d.country.as_str()).collect();
        let (lower, upper) = value_range(ranking);

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Top {} Export Destinations", ranking.len()),
                font(28.0),
            )
            .margin(20)
            .x_label_area_size(140)
            .y_label_area_size(110)
            .build_cartesian_2d((0..ranking.len()).into_segmented(), lower..upper)
            .map_err(render_error)?;

        let label_formatter = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => names.get(*i).map(|s| s.to_string()).unwrap_or_default(),
            _ => String::new(),
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(BLACK.mix(0.3))
            .light_line_style(BLACK.mix(0.1))
            .x_labels(ranking.len())
            .x_label_formatter(&label_formatter)
            .x_label_style(font(14.0).transform(FontTransform::Rotate90))
            .y_label_style(font(14.0))
            .x_desc("Countries")
            .y_desc("Total Export Value (in billions)")
            .axis_desc_style(font(16.0))
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(SKY_BLUE.filled())
                    .margin(12)
                    .data(ranking.iter().enumerate().map(|(i, d)| (i, d.total))),
            )
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
        Ok(())
    }
}

impl ChartPort for BarChartAdapter {
    fn render(&self, ranking: &[DestinationTotal], path: &Path) -> Result<(), TradeError> {
        if ranking.is_empty() {
            return Err(TradeError::reporting("nothing to chart"));
        }
        // the axis layout needs finite bounds
        if let Some(d) = ranking.iter().find(|d| !d.total.is_finite()) {
            return Err(TradeError::reporting(format!(
                "non-finite total for {}",
                d.country
            )));
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                TradeError::reporting(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }
        ensure_font(self.settings.font_path.as_deref())?;
        self.draw(ranking, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    fn ranking(totals: &[(&str, f64)]) -> Vec<DestinationTotal> {
        totals
            .iter()
            .map(|(c, t)| DestinationTotal {
                country: c.to_string(),
                total: *t,
            })
            .collect()
    }

    #[test]
    fn value_range_includes_zero() {
        let (lower, upper) = value_range(&ranking(&[("A", 100.0), ("B", 50.0)]));
        assert_eq!(lower, 0.0);
        assert_relative_eq!(upper, 110.0);
        assert_eq!(value_range(&ranking(&[("A", 0.0)])), (0.0, 1.0));
        let (lower, upper) = value_range(&ranking(&[("A", -10.0), ("B", 5.0)]));
        assert!(lower < -10.0);
        assert!(upper > 5.0);
        let (lower, upper) = value_range(&ranking(&[("A", f64::MAX), ("B", f64::MIN)]));
        assert!(upper.is_finite());
        assert!(lower.is_finite());
    }

    #[test]
    fn renders_png_and_creates_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output").join("top_export_destinations.png");
        let adapter = BarChartAdapter::new(ChartSettings::default());
        adapter
            .render(&ranking(&[("Canada", 300.0), ("Spain", 120.5), ("Chile", 3.0)]), &path)
            .unwrap();

        let image = image::open(&path).unwrap();
        assert_eq!(image.width(), 1000);
        assert_eq!(image.height(), 600);
    }

    #[test]
    fn empty_ranking_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chart.png");
        let adapter = BarChartAdapter::new(ChartSettings::default());
        assert!(matches!(
            adapter.render(&[], &path),
            Err(TradeError::Reporting { .. })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn non_finite_totals_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chart.png");
        let adapter = BarChartAdapter::new(ChartSettings::default());
        for total in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let result = adapter.render(&ranking(&[("Canada", 10.0), ("Spain", total)]), &path);
            match result {
                Err(TradeError::Reporting { reason }) => {
                    assert_eq!(reason, "non-finite total for Spain")
                }
                other => panic!("expected Reporting, got {other:?}"),
            }
        }
        assert!(!path.exists());
    }

    #[test]
    fn unreadable_configured_font_is_a_reporting_error() {
        let dir = TempDir::new().unwrap();
        let settings = ChartSettings {
            font_path: Some(dir.path().join("missing.ttf")),
            ..ChartSettings::default()
        };
        let result = BarChartAdapter::new(settings)
            .render(&ranking(&[("Canada", 1.0)]), &dir.path().join("chart.png"));
        match result {
            Err(TradeError::Reporting { reason }) => assert!(reason.contains("missing.ttf")),
            other => panic!("expected Reporting, got {other:?}"),
        }
    }

    #[test]
    fn configured_font_replaces_registered_font() {
        let Some(system) = SYSTEM_FONTS.iter().map(PathBuf::from).find(|p| p.is_file()) else {
            return;
        };
        let dir = TempDir::new().unwrap();
        let copy = dir.path().join("labels.ttf");
        fs::copy(&system, &copy).unwrap();

        let settings = ChartSettings {
            font_path: Some(copy.clone()),
            ..ChartSettings::default()
        };
        BarChartAdapter::new(settings)
            .render(&ranking(&[("Canada", 1.0)]), &dir.path().join("chart.png"))
            .unwrap();
        assert_eq!(FONT.lock().unwrap().as_deref(), Some(copy.as_path()));
    }
}
