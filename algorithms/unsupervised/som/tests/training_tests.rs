use ndarray::{array, Array1, Array2, ArrayView1};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use som::{fit, fit_with_rng, Som, SomConfig, SomError, TrainingPhase};
use somap_helpers::{Distance, L2Dist};

fn two_clusters() -> Array2<f64> {
    array![
        [0.00, 0.00],
        [0.02, 0.01],
        [0.01, 0.03],
        [0.03, 0.02],
        [0.00, 0.02],
        [1.00, 1.00],
        [0.98, 0.99],
        [0.99, 0.97],
        [0.97, 0.98],
        [1.00, 0.98],
    ]
}

fn centroids(data: &Array2<f64>) -> (Array1<f64>, Array1<f64>) {
    let a = data.slice(ndarray::s![..5, ..]).mean_axis(ndarray::Axis(0)).unwrap();
    let b = data.slice(ndarray::s![5.., ..]).mean_axis(ndarray::Axis(0)).unwrap();
    (a, b)
}

fn nearest(weights: &Array2<f64>, target: ArrayView1<f64>) -> f64 {
    weights
        .rows()
        .into_iter()
        .map(|w| L2Dist.distance(w, target))
        .fold(f64::INFINITY, f64::min)
}

#[test]
fn test_two_clusters_converge() {
    let data = two_clusters();
    let config = SomConfig::new(4, 0.5, 200).with_random_seed(42);
    let model = fit(data.view(), config, L2Dist).unwrap();

    let final_error = model.error_log.last().unwrap().error;
    assert!(final_error < 0.05, "final error too high: {}", final_error);
    assert_eq!(model.quantization_error(data.view()).unwrap(), final_error);

    let weights = model.weights();
    let (a, b) = centroids(&data);
    assert!(nearest(&weights, a.view()) < 0.1);
    assert!(nearest(&weights, b.view()) < 0.1);

    // Samples from different clusters map to different nodes.
    let node_a = model.predict(data.row(0)).unwrap();
    let node_b = model.predict(data.row(5)).unwrap();
    assert_ne!(node_a, node_b);
}

#[test]
fn test_two_clusters_with_dead_neurons_partition_all_nodes() {
    let data = two_clusters();
    let config = SomConfig::new(4, 0.5, 200)
        .with_dead_neurons(0.25)
        .with_random_seed(42);
    let model = fit(data.view(), config, L2Dist).unwrap();

    assert!(model.error_log.last().unwrap().error < 0.05);
    assert_eq!(model.nodes.len(), 4);

    let (a, b) = centroids(&data);
    for node in &model.nodes {
        let da = L2Dist.distance(node.weights(), a.view());
        let db = L2Dist.distance(node.weights(), b.view());
        assert!(
            da.min(db) < 0.1,
            "node {} stranded at {:?}",
            node.id(),
            node.weights()
        );
    }
}

#[test]
fn test_error_log_covers_every_iteration() {
    let data = two_clusters();
    let config = SomConfig::new(6, 0.4, 150).with_random_seed(1);
    let mut som = Som::new(data.view(), config, L2Dist).unwrap();
    let log = som.run().unwrap();

    assert_eq!(log.len(), 150);
    let (iterations, errors) = log.series();
    assert_eq!(iterations, (1..=150).collect::<Vec<_>>());
    assert!(errors.iter().all(|e| e.is_finite() && *e >= 0.0));
}

#[test]
fn test_same_seed_is_bit_identical() {
    let data = two_clusters();
    let config = SomConfig::new(5, 0.5, 120)
        .with_dead_neurons(0.2)
        .with_random_seed(2024);

    let mut first = Som::new(data.view(), config.clone(), L2Dist).unwrap();
    let mut second = Som::new(data.view(), config, L2Dist).unwrap();
    first.run().unwrap();
    second.run().unwrap();

    assert_eq!(first.weights(), second.weights());
    assert_eq!(first.error_log(), second.error_log());
    let first_ids: Vec<usize> = first.nodes().iter().map(|n| n.id()).collect();
    let second_ids: Vec<usize> = second.nodes().iter().map(|n| n.id()).collect();
    assert_eq!(first_ids, second_ids);
}

#[test]
fn test_injected_rng_matches_seeded_config() {
    let data = two_clusters();
    let config = SomConfig::new(4, 0.5, 80).with_random_seed(99);
    let seeded = fit(data.view(), config.clone(), L2Dist).unwrap();
    let injected = fit_with_rng(
        data.view(),
        config,
        L2Dist,
        Xoshiro256PlusPlus::seed_from_u64(99),
    )
    .unwrap();

    assert_eq!(seeded.weights(), injected.weights());
    assert_eq!(seeded.error_log, injected.error_log);
}

#[test]
fn test_different_seeds_produce_different_maps() {
    let data = two_clusters();
    let a = fit(
        data.view(),
        SomConfig::new(4, 0.5, 50).with_random_seed(1),
        L2Dist,
    )
    .unwrap();
    let b = fit(
        data.view(),
        SomConfig::new(4, 0.5, 50).with_random_seed(2),
        L2Dist,
    )
    .unwrap();
    assert_ne!(a.weights(), b.weights());
}

#[test]
fn test_without_dead_neuron_deletion_nodes_are_never_replaced() {
    let data = two_clusters();
    let config = SomConfig::new(6, 0.5, 200).with_random_seed(5);
    let mut som = Som::new(data.view(), config, L2Dist).unwrap();
    let original: Vec<usize> = som.nodes().iter().map(|n| n.id()).collect();
    let initial_weights = som.weights();

    while let Some(report) = som.step().unwrap() {
        assert_eq!(report.retired, 0);
        let ids: Vec<usize> = som.nodes().iter().map(|n| n.id()).collect();
        assert_eq!(ids, original);
    }

    assert_eq!(som.nodes().len(), 6);
    assert_ne!(som.weights(), initial_weights);
}

#[test]
fn test_dead_neuron_checks_preserve_node_count() {
    let data = two_clusters();
    let config = SomConfig::<f64>::default()
        .with_iterations(100)
        .with_dead_neurons(0.1)
        .with_random_seed(8);
    let mut som = Som::new(data.view(), config, L2Dist).unwrap();

    let mut checks = 0;
    while let Some(report) = som.step().unwrap() {
        assert_eq!(som.nodes().len(), 25);
        assert!(som.nodes().iter().all(|n| n.dimensions() == 2));
        if report.iteration % 10 == 0 {
            checks += 1;
            assert!(report.retired > 0);
        }
    }
    assert_eq!(checks, 10);
}

#[test]
fn test_single_point_dataset_settles_on_one_winner() {
    let data = array![[0.3, 0.7], [0.3, 0.7], [0.3, 0.7], [0.3, 0.7]];
    let config = SomConfig::new(5, 0.5, 50).with_random_seed(17);
    let mut som = Som::new(data.view(), config, L2Dist).unwrap();

    let mut reports = Vec::new();
    while let Some(report) = som.step().unwrap() {
        reports.push(report);
    }

    let settled = reports[5].winner_id;
    assert!(reports[5..].iter().all(|r| r.winner_id == settled));

    let errors: Vec<f64> = reports.iter().map(|r| r.quantization_error).collect();
    assert!(errors.windows(2).all(|w| w[1] < w[0]));
    assert!(*errors.last().unwrap() < 1e-3);

    let (_, d) = som.best_matching_unit(data.row(0)).unwrap();
    assert!(d < 1e-3);
}

#[test]
fn test_report_exposes_renderer_state() {
    let data = two_clusters();
    let config = SomConfig::new(4, 0.5, 10)
        .with_random_seed(3)
        .with_display_neighborhood(true)
        .with_frame_skip(4);
    let mut som = Som::new(data.view(), config, L2Dist).unwrap();

    let mut rendered = Vec::new();
    while let Some(report) = som.step().unwrap() {
        assert!(report.show_neighborhood);
        assert_eq!(report.radius, som.radius());
        assert_eq!(report.learning_rate, som.learning_rate());
        if report.render {
            rendered.push(report.iteration);
        }
    }
    assert_eq!(rendered, vec![4, 8, 10]);
    assert_eq!(som.phase(), TrainingPhase::Done);
}

#[test]
fn test_f32_training() {
    let data: Array2<f32> = two_clusters().mapv(|x| x as f32);
    let config = SomConfig::<f32>::new(4, 0.5, 100).with_random_seed(42);
    let model = fit(data.view(), config, L2Dist).unwrap();
    assert_eq!(model.error_log.len(), 100);
    assert!(model.nodes.iter().all(|n| n.dimensions() == 2));
}

#[test]
fn test_invalid_configuration_fails_before_training() {
    let data = two_clusters();
    let result = fit(
        data.view(),
        SomConfig::new(4, 0.5, 0).with_random_seed(1),
        L2Dist,
    );
    assert!(matches!(result, Err(SomError::Configuration(_))));

    let empty: Array2<f64> = Array2::zeros((0, 2));
    let result = fit(empty.view(), SomConfig::new(4, 0.5, 10), L2Dist);
    assert_eq!(result.err(), Some(SomError::EmptyDataSet));
}
