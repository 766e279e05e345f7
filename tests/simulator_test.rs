//! Balance simulator integration tests

use bug_slayer::data::GameData;
use bug_slayer::simulator::{run_simulation, SimConfig};

fn two_class_config(num_battles: u32, seed: u64) -> SimConfig {
    SimConfig {
        classes: vec!["debugger".to_string(), "refactorer".to_string()],
        chapters: vec![1],
        ..SimConfig::deterministic(num_battles, seed)
    }
}

#[test]
fn test_ten_battle_report() {
    let data = GameData::builtin();
    let report = run_simulation(&data, &two_class_config(10, 42));

    assert_eq!(report.total_battles, 10);
    assert!(report.win_rate >= 0.0 && report.win_rate <= 100.0);
    assert!(report.class_summary.contains_key("debugger"));
    assert!(report.class_summary.contains_key("refactorer"));
    assert_eq!(report.chapter_summary.keys().copied().collect::<Vec<_>>(), vec![1]);

    let per_class: u32 = report.class_summary.values().map(|s| s.battles).sum();
    assert_eq!(per_class, 10);
}

#[test]
fn test_same_seed_same_report() {
    let data = GameData::builtin();
    let a = run_simulation(&data, &two_class_config(40, 7));
    let b = run_simulation(&data, &two_class_config(40, 7));
    assert_eq!(a.results, b.results);
    assert_eq!(a.to_json(), b.to_json());
}

#[test]
fn test_results_respect_turn_cap_and_subsets() {
    let data = GameData::builtin();
    let config = SimConfig {
        max_turns: 5,
        chapters: vec![2, 3],
        ..SimConfig::deterministic(30, 3)
    };
    let report = run_simulation(&data, &config);

    assert_eq!(report.total_battles, 30);
    for result in &report.results {
        assert!(result.turns <= 5);
        assert!([2, 3].contains(&result.chapter));
        if result.timed_out {
            assert!(!result.won);
        }
    }
    assert_eq!(report.class_summary.len(), data.classes.len());
}

#[test]
fn test_all_chapters_run_in_parallel() {
    let data = GameData::builtin();
    let config = SimConfig {
        num_battles: 200,
        seed: 1,
        verbosity: 0,
        ..SimConfig::default()
    };
    let report = run_simulation(&data, &config);

    assert_eq!(report.total_battles, 200);
    assert!(report.avg_turns >= 1.0);
    assert!(report.wins <= report.total_battles);
    assert!(report.to_text().contains("BALANCE ASSESSMENT"));
}
