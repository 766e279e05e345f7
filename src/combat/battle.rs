//! A single player-versus-monster battle.
//!
//! `Battle` owns both combatants, the effect ledger, both cooldown maps and
//! the boss phase for the length of one fight. Renderers and the simulator
//! drive it through the same calls:
//!
//! ```text
//! loop {
//!     player_attack / player_skill / player_focus
//!     enemy_turn          (skip if the monster died)
//!     end_round
//! }
//! ```
//!
//! Each side's turn starts with its DOT damage, then stun and confusion
//! checks, then the chosen action.

use std::collections::BTreeMap;

use rand::Rng;

use super::buffs::BuffLedger;
use super::passives::PassiveState;
use super::skills::{SkillContext, SkillFailure, SkillOutcome, SkillResolver};
use super::types::{Side, Stat, StatusKind};
use crate::character::{Combatant, Player};
use crate::core::balance::{percent_of, BASIC_ATTACK_MULTIPLIER, TURNS_PER_TECH_DEBT};
use crate::core::combat_math::{mitigated_damage, scaled_attack};
use crate::data::{GameData, MonsterDefinition, SkillDefinition};
use crate::enemy::{
    visual_intensity, BehaviorContext, BossPhaseTracker, EnemyAction, PhaseTransition,
    VisualIntensity,
};
use crate::events::types::PendingEffect;
use crate::progression::experience::LevelUpReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Ongoing,
    Victory,
    Defeat,
}

/// What happened during one side's turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub actor: Side,
    /// Skill id, `attack`, `focus`, or empty when the turn was lost.
    pub action: String,
    pub damage: u32,
    pub healed: u32,
    pub dot_damage: u32,
    pub evaded: bool,
    pub crit: bool,
    /// The actor lost its action to stun or confusion.
    pub skipped: bool,
    pub revived: bool,
    pub phase_transition: Option<PhaseTransition>,
    pub lines: Vec<String>,
}

impl TurnReport {
    fn new(actor: Side) -> Self {
        Self {
            actor,
            action: String::new(),
            damage: 0,
            healed: 0,
            dot_damage: 0,
            evaded: false,
            crit: false,
            skipped: false,
            revived: false,
            phase_transition: None,
            lines: Vec::new(),
        }
    }

    fn absorb(&mut self, outcome: SkillOutcome) {
        self.action = outcome.skill_id;
        self.damage += outcome.damage;
        self.healed += outcome.healed;
        self.evaded |= outcome.evaded;
        self.crit |= outcome.crit;
        self.lines.extend(outcome.lines);
    }
}

/// Running totals for one battle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BattleStats {
    pub damage_dealt: u32,
    pub damage_taken: u32,
    /// Player skill uses by skill id.
    pub skills_used: BTreeMap<String, u32>,
}

/// Rewards granted for a victory.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleRewards {
    pub exp: u64,
    pub gold: u64,
    pub loot: Vec<String>,
    pub tech_debt: i32,
    pub level_up: LevelUpReport,
}

pub struct Battle<'d> {
    data: &'d GameData,
    monster_def: &'d MonsterDefinition,
    player: Player,
    monster: Combatant,
    ledger: BuffLedger,
    player_skills: SkillResolver,
    monster_skills: SkillResolver,
    passive: PassiveState,
    boss: Option<BossPhaseTracker>,
    round: u32,
    stats: BattleStats,
    rewards_claimed: bool,
}

impl<'d> Battle<'d> {
    pub fn new(data: &'d GameData, player: Player, monster_def: &'d MonsterDefinition) -> Self {
        tracing::debug!(
            player = %player.combatant.name,
            class = %player.class_id,
            level = player.level(),
            monster = %monster_def.id,
            "battle start"
        );
        let passive = PassiveState::new(player.combatant.passive.clone());
        Self {
            data,
            monster_def,
            monster: monster_def.to_combatant(),
            player,
            ledger: BuffLedger::new(),
            player_skills: SkillResolver::new(),
            monster_skills: SkillResolver::new(),
            passive,
            boss: monster_def.boss.as_ref().map(|_| BossPhaseTracker::new()),
            round: 1,
            stats: BattleStats::default(),
            rewards_claimed: false,
        }
    }

    /// Install buffs and debuffs queued by events before this battle.
    pub fn install_pending(&mut self, effects: &[PendingEffect]) {
        for effect in effects {
            self.ledger
                .apply_buff(effect.stat, effect.value, effect.duration, Side::Player);
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn monster(&self) -> &Combatant {
        &self.monster
    }

    pub fn monster_def(&self) -> &'d MonsterDefinition {
        self.monster_def
    }

    pub fn ledger(&self) -> &BuffLedger {
        &self.ledger
    }

    pub fn stats(&self) -> &BattleStats {
        &self.stats
    }

    pub fn passive(&self) -> &PassiveState {
        &self.passive
    }

    /// Current round, starting at 1.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn rounds_completed(&self) -> u32 {
        self.round - 1
    }

    pub fn boss_phase(&self) -> Option<u8> {
        self.boss.as_ref().map(BossPhaseTracker::phase)
    }

    pub fn visual_intensity(&self) -> VisualIntensity {
        visual_intensity(self.boss_phase().unwrap_or(1))
    }

    pub fn cooldown_remaining(&self, skill_id: &str) -> u32 {
        self.player_skills.cooldown_remaining(skill_id)
    }

    pub fn focus_armed(&self) -> bool {
        self.player_skills.focus_armed()
    }

    /// Player skills, in the order the class lists them.
    pub fn player_skill_defs(&self) -> impl Iterator<Item = &'d SkillDefinition> + '_ {
        let data = self.data;
        self.player
            .combatant
            .skills
            .iter()
            .filter_map(move |id| data.skill(id))
    }

    pub fn can_use_skill(&self, skill: &SkillDefinition) -> bool {
        self.player_skills.can_use(skill, &self.player.combatant)
    }

    pub fn outcome(&self) -> BattleOutcome {
        if !self.monster.is_alive() {
            BattleOutcome::Victory
        } else if !self.player.combatant.is_alive() {
            BattleOutcome::Defeat
        } else {
            BattleOutcome::Ongoing
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome() != BattleOutcome::Ongoing
    }

    /// Tech debt earned from how long the fight has gone on.
    pub fn tech_debt_accrued(&self) -> u32 {
        self.rounds_completed() / TURNS_PER_TECH_DEBT
    }

    pub fn player_attack(&mut self, rng: &mut impl Rng) -> TurnReport {
        let (mut report, can_act) = self.begin_turn(Side::Player, rng);
        if !can_act {
            return report;
        }

        let modifier = self.passive.next_attack_modifier();
        let mut ctx = SkillContext {
            actor: &mut self.player.combatant,
            actor_side: Side::Player,
            target: &mut self.monster,
            ledger: &mut self.ledger,
            outgoing_modifier: modifier,
            incoming_modifier: 1.0,
        };
        let outcome = self.player_skills.basic_attack(&mut ctx, rng);
        self.finish_player_action(&mut report, outcome, rng);
        report
    }

    /// Use one of the player's skills. Fails without using the turn when
    /// the skill is unknown, unaffordable or cooling down.
    pub fn player_skill(
        &mut self,
        skill_id: &str,
        rng: &mut impl Rng,
    ) -> Result<TurnReport, SkillFailure> {
        let skill = self
            .player_skill_defs()
            .find(|s| s.id == skill_id)
            .ok_or_else(|| SkillFailure::UnknownSkill(skill_id.to_string()))?;
        self.player_skills.check(skill, &self.player.combatant)?;

        let (mut report, can_act) = self.begin_turn(Side::Player, rng);
        if !can_act {
            return Ok(report);
        }

        let modifier = if skill.deals_damage() {
            self.passive.next_attack_modifier()
        } else {
            1.0
        };
        let mut ctx = SkillContext {
            actor: &mut self.player.combatant,
            actor_side: Side::Player,
            target: &mut self.monster,
            ledger: &mut self.ledger,
            outgoing_modifier: modifier,
            incoming_modifier: 1.0,
        };
        let outcome = self.player_skills.use_skill(skill, &mut ctx, rng)?;

        *self.stats.skills_used.entry(skill.id.clone()).or_insert(0) += 1;
        let delta = self.player.add_tech_debt(outcome.tech_debt_delta);
        if delta != 0 {
            tracing::trace!(delta, tech_debt = self.player.tech_debt, "tech debt changed");
        }
        self.finish_player_action(&mut report, outcome, rng);
        Ok(report)
    }

    pub fn player_focus(&mut self, rng: &mut impl Rng) -> TurnReport {
        let (mut report, can_act) = self.begin_turn(Side::Player, rng);
        if !can_act {
            return report;
        }
        let restored = self.player_skills.use_focus(&mut self.player.combatant);
        report.action = "focus".to_string();
        report.lines.push(format!(
            "{} focuses, restoring {} MP. Next hit +20%!",
            self.player.combatant.name, restored
        ));
        report
    }

    pub fn enemy_turn(&mut self, rng: &mut impl Rng) -> TurnReport {
        let (mut report, can_act) = self.begin_turn(Side::Monster, rng);
        if !can_act {
            return report;
        }

        let ctx = BehaviorContext {
            hp_percent: self.monster.hp_percent(),
            phase: self.boss_phase().unwrap_or(1),
            turn: self.round,
        };
        let tree = &self.monster_def.behavior;
        let action = match &self.monster_def.boss {
            Some(profile) => profile.select_action(tree, &ctx, rng),
            None => tree.select_action(&ctx, rng),
        };

        match action {
            EnemyAction::Attack => {
                let outcome = self.monster_strike(None, rng);
                self.finish_enemy_action(&mut report, outcome);
            }
            EnemyAction::Skill { id } => {
                let data = self.data;
                let skill = data.skill(&id);
                if skill.is_none() {
                    tracing::warn!(monster = %self.monster.id, skill = %id, "unknown enemy skill");
                }
                let outcome = self.monster_strike(skill, rng);
                self.finish_enemy_action(&mut report, outcome);
            }
            EnemyAction::Buff {
                stat,
                value,
                duration,
            } => {
                self.ledger
                    .apply_buff(stat, value, duration, Side::Monster);
                report.action = "buff".to_string();
                report.lines.push(format!(
                    "{} {} {:+} for {} turns",
                    self.monster.name, stat, value, duration
                ));
            }
            EnemyAction::Heal { percent } => {
                let healed = self.monster.heal(percent_of(self.monster.max_hp, percent));
                report.action = "heal".to_string();
                report.healed = healed;
                report
                    .lines
                    .push(format!("{} recovers {} HP", self.monster.name, healed));
            }
        }
        report
    }

    /// Tick effects and cooldowns and regenerate MP. Returns the player's
    /// MP regenerated.
    pub fn end_round(&mut self) -> u32 {
        self.ledger.tick_buffs();
        self.player_skills.tick_cooldowns();
        self.monster_skills.tick_cooldowns();

        let extra = self.passive.extra_mp_regen_percent();
        let regen = self
            .player_skills
            .regenerate_mp(&mut self.player.combatant, extra);
        self.monster_skills.regenerate_mp(&mut self.monster, 0.0);

        self.round += 1;
        regen
    }

    /// Grant EXP, gold, loot and accrued tech debt. Only once, and only
    /// after a victory.
    pub fn claim_rewards(&mut self, rng: &mut impl Rng) -> Option<BattleRewards> {
        if self.rewards_claimed || self.outcome() != BattleOutcome::Victory {
            return None;
        }
        self.rewards_claimed = true;

        let def = self.monster_def;
        let level_up = match self.data.class(&self.player.class_id) {
            Some(class) => self.player.add_exp(def.exp_reward, class),
            None => {
                tracing::warn!(class = %self.player.class_id, "unknown class; EXP not applied");
                LevelUpReport::unchanged(self.player.level())
            }
        };
        let gold = self.player.award_gold(def.gold_reward);
        let loot = def.roll_loot(rng);
        self.player.inventory.extend(loot.iter().cloned());
        let tech_debt = self.player.add_tech_debt(self.tech_debt_accrued() as i32);
        self.ledger.clear();

        tracing::debug!(
            monster = %def.id,
            rounds = self.rounds_completed(),
            exp = def.exp_reward,
            gold,
            "battle won"
        );

        Some(BattleRewards {
            exp: def.exp_reward,
            gold,
            loot,
            tech_debt,
            level_up,
        })
    }

    /// End the battle and hand the player back.
    pub fn into_player(mut self) -> Player {
        self.ledger.clear();
        self.player
    }

    /// DOT, then stun and confusion. Returns whether the actor may act.
    fn begin_turn(&mut self, side: Side, rng: &mut impl Rng) -> (TurnReport, bool) {
        let mut report = TurnReport::new(side);
        if self.is_over() {
            return (report, false);
        }

        let actor = match side {
            Side::Player => &mut self.player.combatant,
            Side::Monster => &mut self.monster,
        };
        let dot = self.ledger.apply_dot_effects(actor, side);
        if dot > 0 {
            report.dot_damage = dot;
            report
                .lines
                .push(format!("{} takes {} damage over time", actor.name, dot));
            self.record_hit(side, dot, &mut report, rng);
            if self.is_over() {
                return (report, false);
            }
        }

        let stunned = self.ledger.has_status(StatusKind::Stun, side);
        let confused = self.ledger.has_status(StatusKind::Confusion, side);
        self.ledger.tick_status_effects(side);

        let actor = match side {
            Side::Player => &mut self.player.combatant,
            Side::Monster => &mut self.monster,
        };
        if stunned {
            report.skipped = true;
            report
                .lines
                .push(format!("{} is stunned and cannot act!", actor.name));
            return (report, false);
        }

        if confused && rng.gen_bool(0.5) {
            let atk = self.ledger.effective_stat(actor.stats.atk, Stat::Atk, side);
            let def = self.ledger.effective_stat(actor.stats.def, Stat::Def, side);
            let damage = mitigated_damage(scaled_attack(atk, BASIC_ATTACK_MULTIPLIER, false), def);
            let lost = actor.take_damage(damage);
            report.skipped = true;
            report.lines.push(format!(
                "{} is confused and hurts itself for {} damage!",
                actor.name, lost
            ));
            self.record_hit(side, lost, &mut report, rng);
            return (report, false);
        }

        (report, true)
    }

    /// Bookkeeping after `side` lost HP: totals, boss phase and revive.
    fn record_hit(&mut self, side: Side, amount: u32, report: &mut TurnReport, rng: &mut impl Rng) {
        match side {
            Side::Player => {
                self.stats.damage_taken += amount;
                self.check_revive(report);
            }
            Side::Monster => {
                self.stats.damage_dealt += amount;
                self.check_phase(report, rng);
            }
        }
    }

    fn check_phase(&mut self, report: &mut TurnReport, rng: &mut impl Rng) {
        let (Some(tracker), Some(profile)) = (self.boss.as_mut(), self.monster_def.boss.as_ref())
        else {
            return;
        };
        if !self.monster.is_alive() {
            return;
        }
        if let Some(transition) =
            tracker.check_boss_phase(self.monster.hp, self.monster.max_hp, profile, rng)
        {
            report
                .lines
                .push(format!("{} enters phase {}!", self.monster.name, transition.to));
            if let Some(line) = &transition.dialogue {
                report
                    .lines
                    .push(format!("{}: \"{}\"", self.monster.name, line));
            }
            report.phase_transition = Some(transition);
        }
    }

    fn check_revive(&mut self, report: &mut TurnReport) {
        if self.passive.try_revive(&mut self.player.combatant) {
            report.revived = true;
            report.lines.push(format!(
                "{} rolls back to a known-good state with {} HP!",
                self.player.combatant.name, self.player.combatant.hp
            ));
        }
    }

    fn finish_player_action(
        &mut self,
        report: &mut TurnReport,
        outcome: SkillOutcome,
        rng: &mut impl Rng,
    ) {
        let damage = outcome.damage;
        report.absorb(outcome);
        if damage > 0 {
            self.record_hit(Side::Monster, damage, report, rng);
        }
    }

    /// Monster attack or skill; an unusable skill falls back to an attack.
    fn monster_strike(
        &mut self,
        skill: Option<&'d SkillDefinition>,
        rng: &mut impl Rng,
    ) -> SkillOutcome {
        let incoming = self.passive.incoming_modifier(&self.player.combatant);
        let mut ctx = SkillContext {
            actor: &mut self.monster,
            actor_side: Side::Monster,
            target: &mut self.player.combatant,
            ledger: &mut self.ledger,
            outgoing_modifier: 1.0,
            incoming_modifier: incoming,
        };
        match skill {
            Some(skill) => match self.monster_skills.use_skill(skill, &mut ctx, rng) {
                Ok(outcome) => outcome,
                Err(reason) => {
                    tracing::debug!(%reason, "enemy skill unavailable; attacking instead");
                    self.monster_skills.basic_attack(&mut ctx, rng)
                }
            },
            None => self.monster_skills.basic_attack(&mut ctx, rng),
        }
    }

    fn finish_enemy_action(&mut self, report: &mut TurnReport, outcome: SkillOutcome) {
        let damage = outcome.damage;
        report.absorb(outcome);
        if damage > 0 {
            self.stats.damage_taken += damage;
            self.check_revive(report);
        }
    }
}
