//! Basic example demonstrating kmeans-strategies usage
//!
//! Run with: cargo run --example basic --release

use kmeans_strategies::{ClusterConfig, KMeans, Point, UpdateRule};
use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

fn main() {
    println!("=== kmeans-strategies example ===\n");

    // Generate synthetic data: 3 clusters in 2D for easy visualization
    let n_samples = 300;
    let n_clusters = 3;

    // Cluster centers
    let centers = [[-5.0, -5.0], [0.0, 5.0], [5.0, -5.0]];
    let noise = Array2::random((n_samples, 2), Uniform::new(-1.0f64, 1.0));

    let points: Vec<Point> = (0..n_samples)
        .map(|i| {
            let center = centers[i % 3];
            Point::with_label(
                vec![center[0] + noise[[i, 0]], center[1] + noise[[i, 1]]],
                format!("blob-{}", i % 3),
            )
        })
        .collect();

    println!("True cluster centers:");
    for (i, center) in centers.iter().enumerate() {
        println!("  Cluster {}: ({:.2}, {:.2})", i, center[0], center[1]);
    }
    println!();

    for rule in [UpdateRule::Mean, UpdateRule::Median, UpdateRule::WeightedReseed] {
        let config = ClusterConfig::new(n_clusters)
            .with_max_iters(20)
            .with_num_threads(4)
            .with_update_rule(rule)
            .with_seed(42);

        let result = KMeans::with_config(config)
            .cluster(&points)
            .expect("Clustering failed");

        println!("Update rule: {}", rule);
        for (i, (centroid, size)) in result
            .centroids
            .iter()
            .zip(result.cluster_sizes())
            .enumerate()
        {
            println!(
                "  Centroid {}: ({:.4}, {:.4}) with {} points",
                i,
                centroid.coordinates()[0],
                centroid.coordinates()[1],
                size
            );
        }
        println!();
    }

    println!("=== Done! ===");
}
