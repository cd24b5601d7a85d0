//! ClusterLens: customer segment prediction from a pre-trained model bundle
//!
//! This is the main entrypoint that loads the bundle once, scores the
//! customer profile given on the command line, and renders the result.

use anyhow::Result;
use clap::Parser;
use clusterlens::{predict, viz, Args, ModelStore};
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    if args.verbose {
        println!("ClusterLens - Customer Segment Prediction");
        println!("=========================================\n");
    }

    let start_time = Instant::now();

    if args.verbose {
        println!("Loading model bundle from: {}", args.model);
    }

    let store = ModelStore::new(&args.model);
    let bundle = store.load()?;

    if args.verbose {
        println!(
            "Bundle loaded: {} clusters, feature order {:?}\n",
            bundle.optimal_k, bundle.feature_names
        );
    }

    let customer = args.customer();
    println!("=== Customer Profile ===");
    println!("Gender: {}", customer.gender);
    println!("Age: {}", customer.age);
    println!("Annual income: ${}k", customer.annual_income);
    println!("Spending score: {}", customer.spending_score);

    let prediction = predict(bundle, &customer)?;
    let elapsed = start_time.elapsed();

    println!("\n✓ Predicted segment: Cluster {}", prediction.cluster);
    println!(
        "  Confidence level: {:.2}%",
        prediction.confidence * 100.0
    );

    println!("\nDistances to all cluster centers:");
    for (i, dist) in prediction.distances.iter().enumerate() {
        let marker = if i == prediction.cluster {
            " (assigned)"
        } else {
            ""
        };
        println!("  Cluster {}: {:.4}{}", i, dist, marker);
    }

    if let Some(ref chart_path) = args.chart {
        viz::create_distance_chart(&prediction, chart_path)?;
    }

    if args.verbose {
        let centroid = bundle.model.centroids().row(prediction.cluster);
        println!(
            "\nAssigned center (scaled): gender={:.2}, age={:.2}, income={:.2}, score={:.2}",
            centroid[0], centroid[1], centroid[2], centroid[3]
        );
        println!("Processing time: {:.2}s", elapsed.as_secs_f64());
    }

    Ok(())
}
