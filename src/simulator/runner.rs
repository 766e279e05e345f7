//! Main simulation runner.
//!
//! Every battle gets its own `ChaCha8Rng` seeded from `seed + index`, so a
//! report depends only on the config, never on thread scheduling.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use super::battle_sim::{simulate_battle, BattleResult};
use super::config::SimConfig;
use super::report::SimReport;
use crate::data::{ChapterDefinition, ClassDefinition, GameData};

/// Run the full simulation and return a report.
pub fn run_simulation(data: &GameData, config: &SimConfig) -> SimReport {
    let classes = resolve_classes(data, config);
    let chapters = resolve_chapters(data, config);
    let class_ids: Vec<String> = classes.iter().map(|c| c.id.clone()).collect();

    tracing::info!(
        battles = config.num_battles,
        classes = class_ids.len(),
        chapters = chapters.len(),
        seed = config.seed,
        parallel = config.parallel,
        "starting simulation"
    );

    if classes.is_empty() || chapters.is_empty() {
        tracing::warn!("no classes or chapters to simulate");
        return SimReport::from_results(Vec::new(), &class_ids, &config.thresholds);
    }

    let run = |index: u32| run_single(data, config, &classes, &chapters, index);
    let results: Vec<BattleResult> = if config.parallel {
        (0..config.num_battles).into_par_iter().filter_map(run).collect()
    } else {
        (0..config.num_battles).filter_map(run).collect()
    };

    let report = SimReport::from_results(results, &class_ids, &config.thresholds);
    tracing::info!(
        battles = report.total_battles,
        win_rate = report.win_rate,
        imbalances = report.imbalances.len(),
        "simulation finished"
    );
    report
}

fn run_single(
    data: &GameData,
    config: &SimConfig,
    classes: &[&ClassDefinition],
    chapters: &[&ChapterDefinition],
    index: u32,
) -> Option<BattleResult> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(index as u64));

    let class = *classes.choose(&mut rng)?;
    let chapter = *chapters.choose(&mut rng)?;
    let pool: Vec<&str> = chapter.encounter_pool().collect();
    let monster_id = *pool.choose(&mut rng)?;
    let Some(monster) = data.monster(monster_id) else {
        tracing::warn!(chapter = chapter.id, monster = monster_id, "unknown monster in pool");
        return None;
    };

    let result = simulate_battle(data, class, chapter, monster, config.max_turns, &mut rng);
    if config.verbosity >= 2 {
        tracing::info!(
            battle = index + 1,
            class = %result.class,
            chapter = result.chapter,
            monster = %result.monster,
            won = result.won,
            turns = result.turns,
            "battle finished"
        );
    }
    Some(result)
}

fn resolve_classes<'d>(data: &'d GameData, config: &SimConfig) -> Vec<&'d ClassDefinition> {
    if config.classes.is_empty() {
        return data.classes.iter().collect();
    }
    config
        .classes
        .iter()
        .filter_map(|id| {
            let class = data.class(id);
            if class.is_none() {
                tracing::warn!(class = %id, "skipping unknown class");
            }
            class
        })
        .collect()
}

fn resolve_chapters<'d>(data: &'d GameData, config: &SimConfig) -> Vec<&'d ChapterDefinition> {
    if config.chapters.is_empty() {
        return data.chapters.iter().collect();
    }
    config
        .chapters
        .iter()
        .filter_map(|&id| {
            let chapter = data.chapter(id);
            if chapter.is_none() {
                tracing::warn!(chapter = id, "skipping unknown chapter");
            }
            chapter
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(num_battles: u32) -> SimConfig {
        SimConfig {
            classes: vec!["debugger".to_string(), "refactorer".to_string()],
            chapters: vec![1],
            ..SimConfig::deterministic(num_battles, 42)
        }
    }

    #[test]
    fn test_small_run() {
        let data = GameData::builtin();
        let report = run_simulation(&data, &config(10));
        assert_eq!(report.total_battles, 10);
        assert!((0.0..=100.0).contains(&report.win_rate));
        assert!(report.class_summary.contains_key("debugger"));
        assert!(report.class_summary.contains_key("refactorer"));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let data = GameData::builtin();
        let sequential = run_simulation(&data, &config(24));
        let parallel = run_simulation(
            &data,
            &SimConfig {
                parallel: true,
                ..config(24)
            },
        );
        assert_eq!(sequential.results, parallel.results);
    }

    #[test]
    fn test_unknown_ids_skipped() {
        let data = GameData::builtin();
        let config = SimConfig {
            classes: vec!["wizard".to_string()],
            ..SimConfig::deterministic(5, 1)
        };
        let report = run_simulation(&data, &config);
        assert_eq!(report.total_battles, 0);
        assert!(report.class_summary.is_empty());
    }
}
