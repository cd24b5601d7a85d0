//! Visualization of prediction results using Plotters

use crate::service::Prediction;
use plotters::prelude::*;

/// Color palette for different clusters
const CLUSTER_COLORS: [RGBColor; 5] = [
    RED,
    BLUE,
    GREEN,
    YELLOW,
    MAGENTA,
];

/// Draw a bar chart of the distances to every cluster center.
///
/// The assigned cluster keeps its full palette color; the other bars are
/// drawn muted.
pub fn create_distance_chart(prediction: &Prediction, output_path: &str) -> crate::Result<()> {
    let n_clusters = prediction.distances.len();
    let max_distance = prediction
        .distances
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1e-9);

    let root = BitMapBackend::new(output_path, (600, 400)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Distances to Cluster Centers", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..(n_clusters as f64), 0f64..(max_distance * 1.1))?;

    chart
        .configure_mesh()
        .x_desc("Cluster ID")
        .y_desc("Distance (scaled feature space)")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    // Draw one bar per cluster
    for (cluster_id, &distance) in prediction.distances.iter().enumerate() {
        let color = if cluster_id < CLUSTER_COLORS.len() {
            CLUSTER_COLORS[cluster_id]
        } else {
            BLACK // Fallback color
        };
        let style = if cluster_id == prediction.cluster {
            color.filled()
        } else {
            color.mix(0.4).filled()
        };

        chart.draw_series(std::iter::once(
            Rectangle::new([(cluster_id as f64 - 0.4, 0.0),
                           (cluster_id as f64 + 0.4, distance)],
                          style)
        ))?;
    }

    root.present()?;
    println!("Distance chart saved to: {}", output_path);

    Ok(())
}
