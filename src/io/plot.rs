//! SVG figures of the parameter walk.

use std::path::Path;
use anyhow::{ensure, Result};
use plotters::prelude::*;
use plotters::style::HSLColor;
use crate::sampling::SearchRecord;

/// Padded [min, max] of `values`, widened when the values are all equal.
fn axis_range(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        return -1.0..1.0;
    }
    let pad = if hi > lo { 0.05 * (hi - lo) } else { 0.5 * lo.abs().max(1e-3) };
    (lo - pad)..(hi + pad)
}

/// Energy vs α and σ² vs α side by side.
pub fn plot_harmonic<P: AsRef<Path>>(path: P, records: &[SearchRecord]) -> Result<()> {
    ensure!(!records.is_empty(), "no records to plot");

    let energy: Vec<(f64, f64)> = records.iter().map(|r| (r.params[0], r.energy)).collect();
    let variance: Vec<(f64, f64)> = records.iter().map(|r| (r.params[0], r.variance)).collect();
    let alpha_range = axis_range(records.iter().map(|r| r.params[0]));

    let root = SVGBackend::new(path.as_ref(), (1400, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Energy and variance", ("sans-serif", 24))?;
    let panels = root.split_evenly((1, 2));

    let mut chart_e = ChartBuilder::on(&panels[0])
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(alpha_range.clone(), axis_range(energy.iter().map(|p| p.1)))?;
    chart_e
        .configure_mesh()
        .x_desc("alpha")
        .y_desc("Dimensionless energy")
        .draw()?;
    chart_e.draw_series(LineSeries::new(energy.iter().copied(), &BLUE))?;
    chart_e.draw_series(energy.iter().map(|&p| Circle::new(p, 3, BLUE.filled())))?;

    let mut chart_v = ChartBuilder::on(&panels[1])
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(alpha_range, axis_range(variance.iter().map(|p| p.1)))?;
    chart_v
        .configure_mesh()
        .x_desc("alpha")
        .y_desc("Variance**2")
        .draw()?;
    chart_v.draw_series(LineSeries::new(variance.iter().copied(), &RED))?;
    chart_v.draw_series(variance.iter().map(|&p| Circle::new(p, 3, RED.filled())))?;

    root.present()?;
    Ok(())
}

/// Cool colormap: cyan at `e_min` through magenta at `e_max`.
fn energy_color(e: f64, e_min: f64, e_max: f64) -> HSLColor {
    let t = ((e - e_min) / (e_max - e_min)).clamp(0.0, 1.0);
    HSLColor(0.5 + t / 3.0, 0.9, 0.5)
}

/// 3-D scatter of (γ, a, β) colored by energy on a [e_min, e_max] scale,
/// with a color bar on the right. Axes are x = γ, y = a, z = β.
pub fn plot_helium<P: AsRef<Path>>(path: P, records: &[SearchRecord], e_min: f64, e_max: f64) -> Result<()> {
    ensure!(!records.is_empty(), "no records to plot");
    ensure!(e_max > e_min, "empty energy color scale [{}, {}]", e_min, e_max);

    let root = SVGBackend::new(path.as_ref(), (1160, 1000)).into_drawing_area();
    root.fill(&WHITE)?;
    let (scatter, legend) = root.split_horizontally(1000);

    let mut chart = ChartBuilder::on(&scatter)
        .caption("Energy Minimum", ("sans-serif", 30))
        .margin(20)
        .build_cartesian_3d(
            axis_range(records.iter().map(|r| r.params[0])),
            axis_range(records.iter().map(|r| r.params[1])),
            axis_range(records.iter().map(|r| r.params[2])),
        )?;
    chart.with_projection(|mut pb| {
        pb.yaw = 0.6;
        pb.pitch = 0.4;
        pb.scale = 0.85;
        pb.into_matrix()
    });
    chart.configure_axes().draw()?;
    chart.draw_series(records.iter().map(|r| {
        Circle::new(
            (r.params[0], r.params[1], r.params[2]),
            4,
            energy_color(r.energy, e_min, e_max).filled(),
        )
    }))?;

    let mut bar = ChartBuilder::on(&legend)
        .margin_top(120)
        .margin_bottom(120)
        .margin_right(20)
        .y_label_area_size(90)
        .build_cartesian_2d(0.0..1.0, e_min..e_max)?;
    bar.configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .disable_x_axis()
        .y_desc("Energy (MeV)")
        .draw()?;
    let n_bands = 64;
    let band = (e_max - e_min) / n_bands as f64;
    bar.draw_series((0..n_bands).map(|k| {
        let lo = e_min + band * k as f64;
        Rectangle::new([(0.0, lo), (1.0, lo + band)], energy_color(lo + 0.5 * band, e_min, e_max).filled())
    }))?;

    root.present()?;
    Ok(())
}
