//! Progression integration tests
//!
//! Walks the whole campaign through `ProgressionState`, checks the EXP
//! curve across many levels and round-trips snapshots.

use bug_slayer::character::Player;
use bug_slayer::combat::Battle;
use bug_slayer::core::balance::MAX_LEVEL;
use bug_slayer::data::GameData;
use bug_slayer::progression::save::{from_bytes, to_bytes, to_json};
use bug_slayer::progression::{
    exp_required_for_level, load_bytes, load_json, ProgressionState, StageRecord,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn record(turns: u32) -> StageRecord {
    StageRecord {
        turns,
        damage_taken: turns * 3,
        tech_debt: turns / 5,
    }
}

// ============================================================================
// Campaign walk
// ============================================================================

#[test]
fn test_full_campaign_unlocks_each_chapter_once() {
    let data = GameData::builtin();
    let mut state = ProgressionState::new();
    let mut unlocked = Vec::new();
    let mut stages_played = 0;

    loop {
        let (chapter, stage) = (state.current_chapter, state.current_stage);
        let completion = state.complete_stage(chapter, stage, record(6), &data.chapters);
        stages_played += 1;
        if let Some(next) = completion.unlocked_chapter {
            unlocked.push(next);
        }
        if state.advance(&data.chapters).is_none() {
            break;
        }
    }

    let total_stages: u32 = data.chapters.iter().map(|c| c.total_stages).sum();
    assert_eq!(stages_played, total_stages);
    assert_eq!(unlocked, vec![2, 3, 4]);
    for chapter in data.chapter_ids() {
        assert!(state.is_chapter_completed(chapter));
        assert!(state.chapter(chapter).unwrap().boss_defeated);
    }
    assert_eq!(state.totals.monsters_defeated, total_stages as u64);
}

#[test]
fn test_stage_monsters_come_from_their_chapter() {
    let data = GameData::builtin();
    for chapter in &data.chapters {
        for stage in 1..=chapter.total_stages {
            let id = chapter.monster_for_stage(stage).unwrap();
            let monster = data.monster(id).unwrap();
            assert_eq!(monster.chapter, chapter.id);
            assert_eq!(monster.is_boss(), chapter.is_boss_stage(stage));
        }
    }
}

// ============================================================================
// Experience
// ============================================================================

#[test]
fn test_exp_curve_grows() {
    for level in 1..MAX_LEVEL {
        assert!(exp_required_for_level(level + 1) > exp_required_for_level(level));
    }
}

#[test]
fn test_battle_rewards_level_up_player() {
    let data = GameData::builtin();
    let class = data.class("devops").unwrap();
    let boss = data.monster("stack-overflow").unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let mut battle = Battle::new(&data, Player::at_level("Ops", class, 12), boss);
    while !battle.is_over() && battle.round() <= 200 {
        battle.player_attack(&mut rng);
        if !battle.is_over() {
            battle.enemy_turn(&mut rng);
            battle.end_round();
        }
    }
    let rewards = battle.claim_rewards(&mut rng).unwrap();
    assert_eq!(rewards.exp, 120);
    assert_eq!(rewards.level_up.previous_level, 12);

    let player = battle.into_player();
    assert!(player.level() <= MAX_LEVEL);
    assert!(player.tech_debt <= 100);
}

#[test]
fn test_huge_award_stops_at_cap() {
    let data = GameData::builtin();
    let class = data.class("full-stack").unwrap();
    let mut player = Player::new("Grinder", class);

    let report = player.add_exp(10_000_000, class);
    assert_eq!(report.new_level, MAX_LEVEL);
    assert_eq!(report.levels_gained(), MAX_LEVEL - 1);
    assert_eq!(player.exp_to_next_level(), 0);
    assert_eq!(player.combatant.hp, player.combatant.max_hp);
}

// ============================================================================
// Snapshots
// ============================================================================

#[test]
fn test_snapshot_round_trip_after_play() {
    let data = GameData::builtin();
    let mut state = ProgressionState::new();
    for _ in 0..6 {
        let (chapter, stage) = (state.current_chapter, state.current_stage);
        state.complete_stage(chapter, stage, record(4 + stage), &data.chapters);
        state.advance(&data.chapters);
    }
    state.add_play_time(1234);

    let bytes = to_bytes(&state).unwrap();
    assert_eq!(from_bytes(&bytes).unwrap(), state);

    let mut restored = ProgressionState::new();
    assert!(load_bytes(&mut restored, &bytes));
    assert_eq!(
        (restored.current_chapter, restored.current_stage),
        (state.current_chapter, state.current_stage)
    );
    assert_eq!(restored.totals, state.totals);

    let mut from_web = ProgressionState::new();
    assert!(load_json(&mut from_web, &to_json(&state).unwrap()));
    assert_eq!(from_web, state);
}

#[test]
fn test_corrupt_snapshot_leaves_state_untouched() {
    let data = GameData::builtin();
    let mut original = ProgressionState::new();
    original.complete_stage(1, 1, record(5), &data.chapters);
    let before = original.clone();

    let mut bytes = to_bytes(&ProgressionState::new()).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0x55;
    assert!(!load_bytes(&mut original, &bytes));
    assert_eq!(original, before);
}
