// Trains a small map on two synthetic clusters and logs its progress.
use log::{error, info};
use ndarray::Array2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use somap::{L2Dist, Som, SomConfig};

fn two_clusters(per_cluster: usize, rng: &mut SmallRng) -> Array2<f64> {
    Array2::from_shape_fn((2 * per_cluster, 2), |(row, _)| {
        let center = if row < per_cluster { 0.1 } else { 0.9 };
        center + rng.random_range(-0.05..0.05)
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut rng = SmallRng::seed_from_u64(7);
    let data = two_clusters(50, &mut rng);

    let config = SomConfig::new(4, 0.5, 200)
        .with_dead_neurons(0.25)
        .with_random_seed(42)
        .with_frame_skip(25);

    let mut som = match Som::new(data.view(), config, L2Dist) {
        Ok(som) => som,
        Err(e) => {
            error!("could not build map: {}", e);
            std::process::exit(1);
        }
    };

    loop {
        match som.step() {
            Ok(Some(report)) if report.render => info!(
                "iteration {:>4}: error = {:.5}, radius = {:.4}, retired = {}",
                report.iteration, report.quantization_error, report.radius, report.retired
            ),
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(e) => {
                error!("training aborted: {}", e);
                std::process::exit(1);
            }
        }
    }

    for node in som.nodes() {
        info!("node {:>2}: {:.4}", node.id(), node.weights());
    }
    if let Some(best) = som.error_log().best() {
        info!("best error {:.5} at iteration {}", best.error, best.iteration);
    }
}
