use approx::assert_relative_eq;
use partdup_analyze::{
    AnalyzeError, AnalyzerConfig, ComponentAnalyzer, DuplicateGrouper, SimilarityScorer,
};
use partdup_core::{BoundingBox, GeometryHash, Signature};
use proptest::prelude::*;
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::Path;
use tempfile::TempDir;

fn write_triangle(path: &Path, scale: f32) {
    let corners: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
    let triangle = stl_io::Triangle {
        normal: stl_io::Normal::new([0.0, 0.0, 1.0]),
        vertices: corners.map(|[x, y, z]| stl_io::Vertex::new([x * scale, y * scale, z * scale])),
    };
    let mut file = File::create(path).unwrap();
    stl_io::write_stl(&mut file, [triangle].iter()).unwrap();
}

fn analyzer_with_threshold(threshold: f64) -> ComponentAnalyzer {
    let config = AnalyzerConfig::builder().threshold(threshold).build().unwrap();
    ComponentAnalyzer::with_config(config)
}

#[test]
fn test_analyzer_initialization() {
    let analyzer = ComponentAnalyzer::new();
    assert!(analyzer.is_empty());
    assert_eq!(analyzer.config().threshold, 0.95);
    assert!(analyzer.report().groups.is_empty());
}

#[test]
fn test_process_file_adds_component() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("ProjectA");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("tri.stl");
    write_triangle(&path, 1.0);

    let mut analyzer = ComponentAnalyzer::new();
    let component = analyzer.process_file(&path, temp.path()).unwrap();

    assert_eq!(component.metadata.project_id, "ProjectA");
    assert_eq!(component.metadata.file_name, "tri.stl");
    assert_eq!(component.signature.volume, 0.0);
    assert_relative_eq!(component.signature.surface_area, 0.5, epsilon = 1e-9);
    assert_eq!(analyzer.len(), 1);
    assert!(analyzer.component(&path).is_some());
}

#[test]
fn test_process_multiple_files() {
    let temp = TempDir::new().unwrap();
    let mut analyzer = ComponentAnalyzer::new();

    for (i, scale) in [1.0, 2.0, 3.0].into_iter().enumerate() {
        let path = temp.path().join(format!("part{i}.stl"));
        write_triangle(&path, scale);
        analyzer.process_file(&path, temp.path()).unwrap();
    }

    assert_eq!(analyzer.len(), 3);
    assert!(analyzer.components().all(|c| c.metadata.has_unknown_project()));
}

#[test]
fn test_three_identical_files_form_one_group() {
    let temp = TempDir::new().unwrap();
    for project in ["ProjectA", "ProjectB", "ProjectC"] {
        let dir = temp.path().join(project);
        fs::create_dir_all(&dir).unwrap();
        write_triangle(&dir.join("bracket.stl"), 1.0);
    }

    let mut analyzer = ComponentAnalyzer::new();
    analyzer.scan_directory(temp.path()).unwrap();
    let report = analyzer.report();

    assert_eq!(report.group_count, 1);
    assert_eq!(report.groups[0].count(), 3);
    assert_eq!(report.groups[0].projects, vec!["ProjectA", "ProjectB", "ProjectC"]);
    assert!(report.groups[0].cross_project);
    assert!(report.failures.is_empty());
}

#[test]
fn test_corrupt_file_is_reported_not_fatal() {
    let temp = TempDir::new().unwrap();
    write_triangle(&temp.path().join("a.stl"), 1.0);
    write_triangle(&temp.path().join("b.stl"), 1.0);
    fs::write(temp.path().join("corrupt.stl"), b"definitely not a mesh").unwrap();

    let mut analyzer = ComponentAnalyzer::new();
    let inventory = analyzer.scan_directory(temp.path()).unwrap();
    assert_eq!(inventory.len(), 3);

    let report = analyzer.report();
    assert_eq!(report.components_analyzed, 2);
    assert_eq!(report.group_count, 1);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].path.ends_with("corrupt.stl"));
    assert!(!report.failures[0].message.is_empty());
}

#[test]
fn test_non_finite_mesh_is_a_failure() {
    let temp = TempDir::new().unwrap();
    write_triangle(&temp.path().join("a_good.stl"), 1.0);
    write_triangle(&temp.path().join("b_nan.stl"), f32::NAN);

    let mut analyzer = ComponentAnalyzer::new();
    analyzer.scan_directory(temp.path()).unwrap();

    assert_eq!(analyzer.len(), 1);
    assert_eq!(analyzer.failures().len(), 1);
    assert!(analyzer.failures()[0].path.ends_with("b_nan.stl"));
    assert!(analyzer.failures()[0].message.contains("non-finite"));
    assert!(!analyzer.report().has_duplicates());
}

#[test]
fn test_extra_extension_without_handler_is_unsupported() {
    let temp = TempDir::new().unwrap();
    write_triangle(&temp.path().join("a.stl"), 1.0);
    fs::write(temp.path().join("b.obj"), "v 0 0 0\n").unwrap();

    let config = AnalyzerConfig::builder()
        .extensions(vec!["stl".to_string(), "obj".to_string()])
        .build()
        .unwrap();
    let mut analyzer = ComponentAnalyzer::with_config(config);
    let inventory = analyzer.scan_directory(temp.path()).unwrap();

    assert_eq!(inventory.len(), 2);
    assert_eq!(analyzer.len(), 1);
    assert_eq!(analyzer.failures().len(), 1);
    assert!(analyzer.failures()[0].message.starts_with("Unsupported mesh format: obj"));
}

#[test]
fn test_threshold_monotonicity_on_scaled_triangles() {
    let temp = TempDir::new().unwrap();
    write_triangle(&temp.path().join("tri_100.stl"), 1.0);
    write_triangle(&temp.path().join("tri_102.stl"), 1.02);
    write_triangle(&temp.path().join("tri_105.stl"), 1.05);

    let grouped_at = |threshold: f64| {
        let mut analyzer = analyzer_with_threshold(threshold);
        analyzer.scan_directory(temp.path()).unwrap();
        analyzer.report().files_with_duplicates
    };

    let loose = grouped_at(0.90);
    let medium = grouped_at(0.97);
    let strict = grouped_at(0.99);

    assert_eq!(loose, 3);
    assert_eq!(medium, 2);
    assert_eq!(strict, 0);
}

#[test]
fn test_scan_missing_root() {
    let mut analyzer = ComponentAnalyzer::new();
    let err = analyzer
        .scan_directory("/definitely/not/a/real/library")
        .unwrap_err();
    assert!(matches!(err, AnalyzeError::Scan(_)));
}

#[test]
fn test_config_from_toml_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("partdup.toml");
    fs::write(
        &path,
        "threshold = 0.9\nmax_groups = 10\nignore_patterns = [\"archive\"]\n",
    )
    .unwrap();

    let config = AnalyzerConfig::from_toml_file(&path).unwrap();
    assert_eq!(config.threshold, 0.9);
    assert_eq!(config.max_groups, 10);
    assert_eq!(config.ignore_patterns, vec!["archive".to_string()]);
    assert!(!config.follow_symlinks);

    let missing = AnalyzerConfig::from_toml_file(temp.path().join("nope.toml")).unwrap_err();
    assert!(matches!(missing, AnalyzeError::ConfigRead { .. }));
}

#[test]
fn test_ignore_patterns_exclude_files() {
    let temp = TempDir::new().unwrap();
    write_triangle(&temp.path().join("a.stl"), 1.0);
    fs::create_dir_all(temp.path().join("archive")).unwrap();
    write_triangle(&temp.path().join("archive/a.stl"), 1.0);

    let config = AnalyzerConfig::builder()
        .ignore_patterns(vec!["archive".to_string()])
        .build()
        .unwrap();
    let mut analyzer = ComponentAnalyzer::with_config(config);
    analyzer.scan_directory(temp.path()).unwrap();

    assert_eq!(analyzer.len(), 1);
    assert!(!analyzer.report().has_duplicates());
}

// Property tests

fn signature_strategy() -> impl Strategy<Value = Signature> {
    let magnitude = prop_oneof![1 => Just(0.0), 9 => 0.001f64..1000.0];
    (
        prop::array::uniform3(-100.0f64..100.0),
        prop::array::uniform3(magnitude.clone()),
        magnitude.clone(),
        magnitude,
        0u8..4,
    )
        .prop_map(|(min, extents, volume, area, hash)| {
            let max = [min[0] + extents[0], min[1] + extents[1], min[2] + extents[2]];
            Signature::new(
                BoundingBox::new(min, max),
                volume,
                area,
                GeometryHash::from_label(&format!("h{hash}")),
            )
        })
}

fn items_strategy() -> impl Strategy<Value = Vec<(usize, Signature)>> {
    prop::collection::vec(signature_strategy(), 0..24)
        .prop_map(|sigs| sigs.into_iter().enumerate().collect())
}

proptest! {
    #[test]
    fn prop_score_is_symmetric(a in signature_strategy(), b in signature_strategy()) {
        let scorer = SimilarityScorer::new();
        prop_assert_eq!(scorer.score(&a, &b), scorer.score(&b, &a));
    }

    #[test]
    fn prop_score_is_bounded(a in signature_strategy(), b in signature_strategy()) {
        let score = SimilarityScorer::new().score(&a, &b);
        prop_assert!((0.0..=1.0).contains(&score), "score {}", score);
    }

    #[test]
    fn prop_equal_hashes_score_one(a in signature_strategy(), b in signature_strategy()) {
        let mut b = b;
        b.geometric_hash = a.geometric_hash;
        prop_assert_eq!(SimilarityScorer::new().score(&a, &b), 1.0);
        prop_assert_eq!(SimilarityScorer::new().score(&a, &a), 1.0);
    }

    #[test]
    fn prop_groups_are_exclusive_and_not_singletons(
        items in items_strategy(),
        threshold in 0.0f64..=1.0,
    ) {
        let groups = DuplicateGrouper::new().group(&items, threshold);
        let mut seen = HashSet::new();
        for group in &groups {
            prop_assert!(group.len() >= 2);
            for id in group {
                prop_assert!(seen.insert(*id), "id {} in two groups", id);
            }
        }
    }

    #[test]
    fn prop_members_meet_threshold_against_seed(
        items in items_strategy(),
        threshold in 0.0f64..=1.0,
    ) {
        let scorer = SimilarityScorer::new();
        let groups = DuplicateGrouper::new().group(&items, threshold);
        for group in &groups {
            let seed = &items[group[0]].1;
            for &id in &group[1..] {
                prop_assert!(scorer.score(seed, &items[id].1) >= threshold);
            }
        }
    }

    #[test]
    fn prop_grouping_is_deterministic(items in items_strategy(), threshold in 0.0f64..=1.0) {
        let grouper = DuplicateGrouper::new();
        prop_assert_eq!(grouper.group(&items, threshold), grouper.group(&items, threshold));
    }

    #[test]
    fn prop_threshold_zero_groups_everything(items in items_strategy()) {
        let groups = DuplicateGrouper::new().group(&items, 0.0);
        if items.len() >= 2 {
            let ids: Vec<usize> = items.iter().map(|(id, _)| *id).collect();
            prop_assert_eq!(groups, vec![ids]);
        } else {
            prop_assert!(groups.is_empty());
        }
    }
}
