//! Terminal charts comparing a sample against the uniform distribution.
//!
//! Series builders are pure and return `(x, y)` points ready for textplots;
//! `plot_pvalues` and `plot_quantiles` render them to stdout.

use textplots::{Chart, Plot, Shape};

use crate::bounded::{BoundedKde, Strategy};
use crate::error::Result;
use crate::kde::Density;
use crate::uniform::Uniform;

/// Share of the support width added on each side of a density chart.
const DISPLAY_PADDING: f64 = 0.25;

/// Smallest chart textplots can draw without panicking.
pub const MIN_WIDTH: u32 = 32;
pub const MIN_HEIGHT: u32 = 3;

#[derive(Clone, Copy, Debug)]
pub struct PlotOptions {
    /// Chart width in braille dots
    pub width: u32,
    /// Chart height in braille dots
    pub height: u32,
    /// Grid size for density curves
    pub points: usize,
    /// Draw one mark per sample value
    pub show_data: bool,
}

impl PlotOptions {
    /// Width and height raised to the smallest drawable chart.
    pub fn chart_size(&self) -> (u32, u32) {
        (self.width.max(MIN_WIDTH), self.height.max(MIN_HEIGHT))
    }
}

impl Default for PlotOptions {
    fn default() -> Self {
        PlotOptions {
            width: 160,
            height: 40,
            points: 500,
            show_data: true,
        }
    }
}

/// `n` evenly spaced points from `lower` to `upper`, both included.
pub fn linspace(lower: f64, upper: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lower],
        _ => {
            let step = (upper - lower) / (n - 1) as f64;
            (0..n).map(|i| lower + step * i as f64).collect()
        }
    }
}

/// Midpoints of `n` equal cells over (lower, upper); never touches the ends.
pub fn open_linspace(lower: f64, upper: f64, n: usize) -> Vec<f64> {
    let step = (upper - lower) / n as f64;
    (0..n).map(|i| lower + step * (i as f64 + 0.5)).collect()
}

/// Support padded by a quarter of its width on each side.
pub fn display_range(support: (f64, f64)) -> (f64, f64) {
    let (lower, upper) = support;
    let padding = (upper - lower) * DISPLAY_PADDING;
    (lower - padding, upper + padding)
}

/// Estimator curve over the display range. The logit estimator is only
/// sampled strictly inside its support, where it is finite.
pub fn density_series(kde: &BoundedKde, range: (f64, f64), points: usize) -> Vec<(f32, f32)> {
    let xs = match kde.strategy() {
        Strategy::Reflect => linspace(range.0, range.1, points),
        Strategy::Logit => {
            let (lower, upper) = kde.support();
            open_linspace(lower.max(range.0), upper.min(range.1), points)
        }
    };
    to_series(&xs, &kde.pdf_many(&xs))
}

pub fn uniform_series(uniform: &Uniform, range: (f64, f64), points: usize) -> Vec<(f32, f32)> {
    let xs = linspace(range.0, range.1, points);
    to_series(&xs, &uniform.pdf_many(&xs))
}

/// A vertical line of `dots` points from 0 to `top` for each sample value
/// inside `range`.
pub fn rug_series(sample: &[f64], range: (f64, f64), top: f64, dots: usize) -> Vec<(f32, f32)> {
    let heights = linspace(0.0, top, dots);
    sample
        .iter()
        .filter(|&&x| x >= range.0 && x <= range.1)
        .flat_map(|&x| heights.iter().map(move |&y| (x as f32, y as f32)))
        .collect()
}

/// Largest finite y across the given series, 0 when there is none.
fn series_top(series: &[&[(f32, f32)]]) -> f64 {
    series
        .iter()
        .flat_map(|s| s.iter())
        .map(|&(_, y)| y as f64)
        .filter(|y| y.is_finite())
        .fold(0.0, f64::max)
}

pub fn qq_series(sample: &[f64]) -> Vec<(f32, f32)> {
    Uniform::standard()
        .qq_pairs(sample)
        .into_iter()
        .map(|(theoretical, observed)| (theoretical as f32, observed as f32))
        .collect()
}

fn to_series(xs: &[f64], ys: &[f64]) -> Vec<(f32, f32)> {
    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| (x as f32, y as f32))
        .collect()
}

/// Theoretical uniform density, estimated density and (optionally) the
/// sample itself on one chart.
pub fn plot_pvalues(sample: &[f64], kde: &BoundedKde, options: &PlotOptions) -> Result<()> {
    let (low, high) = kde.support();
    let range = display_range((low, high));

    let expected = uniform_series(&Uniform::new(low, high)?, range, options.points);
    let estimate = density_series(kde, range, options.points);
    let (width, height) = options.chart_size();
    let top = series_top(&[expected.as_slice(), estimate.as_slice()]);
    let rug = rug_series(sample, range, top, height as usize);

    let expected_shape = Shape::Lines(&expected);
    let estimate_shape = Shape::Lines(&estimate);
    let rug_shape = Shape::Points(&rug);

    println!("density: actual (uniform) vs kde ({:?})", kde.strategy());
    let mut chart = Chart::new(width, height, range.0 as f32, range.1 as f32);
    let chart = chart
        .lineplot(&expected_shape)
        .lineplot(&estimate_shape);
    if options.show_data {
        chart.lineplot(&rug_shape).nice();
    } else {
        chart.nice();
    }

    Ok(())
}

/// Sorted sample against quantiles of U(0, 1), with the y = x reference line.
pub fn plot_quantiles(sample: &[f64], options: &PlotOptions) {
    let points = qq_series(sample);
    let diagonal = [(0.0, 0.0), (1.0, 1.0)];

    let points_shape = Shape::Points(&points);
    let diagonal_shape = Shape::Lines(&diagonal);

    let (width, height) = options.chart_size();

    println!("quantiles of U(0, 1) (x) vs sample (y)");
    Chart::new(width, height, 0.0, 1.0)
        .lineplot(&diagonal_shape)
        .lineplot(&points_shape)
        .nice();
}
