use plotters::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::ReportError;

/// Writes `epoch,mean_loss` rows, one per epoch.
pub fn write_loss_csv<W: Write>(writer: W, losses: &[f64]) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_writer(writer);

    writer.write_record(["epoch", "mean_loss"])?;
    for (epoch, loss) in losses.iter().enumerate() {
        writer.write_record([epoch.to_string(), loss.to_string()])?;
    }
    writer.flush()?;

    Ok(())
}

pub fn save_loss_csv(path: impl AsRef<Path>, losses: &[f64]) -> Result<(), ReportError> {
    write_loss_csv(File::create(path)?, losses)
}

fn plot_error<E: std::fmt::Display>(error: E) -> ReportError {
    ReportError::Plot(error.to_string())
}

/// Draws the per-epoch mean loss as an SVG polyline.
pub fn plot_loss_curve(path: impl AsRef<Path>, losses: &[f64]) -> Result<(), ReportError> {
    let path = path.as_ref();

    if losses.is_empty() {
        return Err(ReportError::Plot("no losses to plot".to_owned()));
    }

    let max_loss = losses.iter().copied().fold(0.0, f64::max);
    let y_max = if max_loss > 0.0 { max_loss * 1.1 } else { 1.0 };
    let x_max = losses.len().saturating_sub(1).max(1) as f64;

    let root = SVGBackend::new(path, (800, 480)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .map_err(plot_error)?;

    chart
        .draw_series(LineSeries::new(
            losses
                .iter()
                .enumerate()
                .map(|(epoch, &loss)| (epoch as f64, loss)),
            &BLUE,
        ))
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    log::debug!("wrote loss curve to {}", path.display());

    Ok(())
}
