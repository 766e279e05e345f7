//! Simulation report generation.

use std::collections::BTreeMap;

use serde::Serialize;

use super::battle_sim::BattleResult;
use super::config::ImbalanceThresholds;

/// Win rate and averages for one class or one chapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupSummary {
    pub battles: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub avg_turns: f64,
    pub avg_damage_dealt: f64,
    pub avg_damage_taken: f64,
}

impl GroupSummary {
    fn from_results<'a>(results: impl Iterator<Item = &'a BattleResult>) -> Self {
        let mut summary = GroupSummary::default();
        let (mut turns, mut dealt, mut taken) = (0u64, 0u64, 0u64);
        for r in results {
            summary.battles += 1;
            summary.wins += r.won as u32;
            turns += r.turns as u64;
            dealt += r.damage_dealt as u64;
            taken += r.damage_taken as u64;
        }
        if summary.battles > 0 {
            let n = summary.battles as f64;
            summary.win_rate = summary.wins as f64 / n * 100.0;
            summary.avg_turns = turns as f64 / n;
            summary.avg_damage_dealt = dealt as f64 / n;
            summary.avg_damage_taken = taken as f64 / n;
        }
        summary
    }
}

/// Aggregated results from a batch of simulated battles.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub total_battles: u32,
    pub wins: u32,
    pub timeouts: u32,
    /// Percent, 0-100.
    pub win_rate: f64,
    pub avg_turns: f64,
    pub avg_turns_to_win: f64,
    pub avg_damage_dealt: f64,
    pub avg_damage_taken: f64,

    /// One entry per requested class, even if it never got sampled.
    pub class_summary: BTreeMap<String, GroupSummary>,
    pub chapter_summary: BTreeMap<u32, GroupSummary>,
    /// Player skill uses across all battles.
    pub skill_usage: BTreeMap<String, u64>,
    pub imbalances: Vec<String>,

    // Individual battles for detailed analysis
    #[serde(skip)]
    pub results: Vec<BattleResult>,
}

impl SimReport {
    /// Aggregate `results`. `classes` seeds the class summary so every
    /// requested class appears.
    pub fn from_results(
        results: Vec<BattleResult>,
        classes: &[String],
        thresholds: &ImbalanceThresholds,
    ) -> Self {
        let overall = GroupSummary::from_results(results.iter());
        let timeouts = results.iter().filter(|r| r.timed_out).count() as u32;
        let avg_turns_to_win = results
            .iter()
            .filter(|r| r.won)
            .map(|r| r.turns as f64)
            .sum::<f64>()
            / overall.wins.max(1) as f64;

        let mut class_summary: BTreeMap<String, GroupSummary> = classes
            .iter()
            .map(|id| {
                let summary = GroupSummary::from_results(results.iter().filter(|r| &r.class == id));
                (id.clone(), summary)
            })
            .collect();
        for r in &results {
            if !class_summary.contains_key(&r.class) {
                let summary =
                    GroupSummary::from_results(results.iter().filter(|o| o.class == r.class));
                class_summary.insert(r.class.clone(), summary);
            }
        }

        let mut chapter_summary = BTreeMap::new();
        for r in &results {
            chapter_summary.entry(r.chapter).or_insert_with(|| {
                GroupSummary::from_results(results.iter().filter(|o| o.chapter == r.chapter))
            });
        }

        let mut skill_usage = BTreeMap::new();
        for r in &results {
            for (skill, count) in &r.skills_used {
                *skill_usage.entry(skill.clone()).or_insert(0) += *count as u64;
            }
        }

        let mut report = Self {
            total_battles: overall.battles,
            wins: overall.wins,
            timeouts,
            win_rate: overall.win_rate,
            avg_turns: overall.avg_turns,
            avg_turns_to_win,
            avg_damage_dealt: overall.avg_damage_dealt,
            avg_damage_taken: overall.avg_damage_taken,
            class_summary,
            chapter_summary,
            skill_usage,
            imbalances: Vec::new(),
            results,
        };
        report.imbalances = report.detect_imbalances(thresholds);
        report
    }

    /// Human-readable warnings for numbers outside `thresholds`.
    pub fn detect_imbalances(&self, thresholds: &ImbalanceThresholds) -> Vec<String> {
        let mut found = Vec::new();
        if self.total_battles == 0 {
            return found;
        }

        if self.win_rate < thresholds.min_win_rate || self.win_rate > thresholds.max_win_rate {
            found.push(format!(
                "Global win rate {:.1}% is outside {:.0}-{:.0}%",
                self.win_rate, thresholds.min_win_rate, thresholds.max_win_rate
            ));
        }

        let sampled: Vec<(&String, f64)> = self
            .class_summary
            .iter()
            .filter(|(_, s)| s.battles > 0)
            .map(|(id, s)| (id, s.win_rate))
            .collect();
        let best = sampled.iter().max_by(|a, b| a.1.total_cmp(&b.1));
        let worst = sampled.iter().min_by(|a, b| a.1.total_cmp(&b.1));
        if let (Some((best_id, best_rate)), Some((worst_id, worst_rate))) = (best, worst) {
            let spread = best_rate - worst_rate;
            if spread > thresholds.max_class_spread {
                found.push(format!(
                    "Class win rate spread {:.1} points ({} {:.1}% vs {} {:.1}%) exceeds {:.0}",
                    spread, best_id, best_rate, worst_id, worst_rate, thresholds.max_class_spread
                ));
            }
        }

        if self.avg_turns < thresholds.min_avg_turns || self.avg_turns > thresholds.max_avg_turns {
            found.push(format!(
                "Average battle length {:.1} turns is outside {:.0}-{:.0}",
                self.avg_turns, thresholds.min_avg_turns, thresholds.max_avg_turns
            ));
        }
        found
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                  BUG SLAYER BALANCE REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Battles: {} total, {} won, {} timed out\n\n",
            self.total_battles, self.wins, self.timeouts
        ));

        report.push_str("── OVERALL ──────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Win Rate:            {:.1}%\n", self.win_rate));
        report.push_str(&format!("  Avg Turns:           {:.1}\n", self.avg_turns));
        report.push_str(&format!(
            "  Avg Turns to Win:    {:.1}\n",
            self.avg_turns_to_win
        ));
        report.push_str(&format!(
            "  Avg Damage Dealt:    {:.0}\n",
            self.avg_damage_dealt
        ));
        report.push_str(&format!(
            "  Avg Damage Taken:    {:.0}\n\n",
            self.avg_damage_taken
        ));

        report.push_str("── BY CLASS ─────────────────────────────────────────────────────\n");
        report.push_str("  Class          Battles   Win%    Turns   Dealt   Taken\n");
        report.push_str("  ─────          ───────   ────    ─────   ─────   ─────\n");
        for (class, s) in &self.class_summary {
            report.push_str(&format_row(class, s));
        }
        report.push('\n');

        report.push_str("── BY CHAPTER ───────────────────────────────────────────────────\n");
        report.push_str("  Chapter        Battles   Win%    Turns   Dealt   Taken\n");
        report.push_str("  ───────        ───────   ────    ─────   ─────   ─────\n");
        for (chapter, s) in &self.chapter_summary {
            report.push_str(&format_row(&chapter.to_string(), s));
        }
        report.push('\n');

        if !self.skill_usage.is_empty() {
            report.push_str("── SKILL USAGE ──────────────────────────────────────────────────\n");
            let mut usage: Vec<_> = self.skill_usage.iter().collect();
            usage.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            for (skill, count) in usage {
                report.push_str(&format!("  {:<20} {:>8}\n", skill, count));
            }
            report.push('\n');
        }

        report.push_str("── BALANCE ASSESSMENT ───────────────────────────────────────────\n");
        if self.imbalances.is_empty() {
            report.push_str("  No imbalances detected\n");
        }
        for issue in &self.imbalances {
            report.push_str(&format!("  ⚠️  {}\n", issue));
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

fn format_row(label: &str, s: &GroupSummary) -> String {
    format!(
        "  {:<14} {:>7}   {:>5.1}   {:>5.1}   {:>5.0}   {:>5.0}\n",
        label, s.battles, s.win_rate, s.avg_turns, s.avg_damage_dealt, s.avg_damage_taken
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(class: &str, chapter: u32, won: bool, turns: u32) -> BattleResult {
        let mut skills_used = BTreeMap::new();
        skills_used.insert("breakpoint".to_string(), 2);
        BattleResult {
            class: class.to_string(),
            chapter,
            monster: "null-pointer".to_string(),
            won,
            turns,
            damage_dealt: 100,
            damage_taken: 40,
            skills_used,
            timed_out: false,
        }
    }

    fn classes(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_report_generation() {
        let results = vec![
            result("debugger", 1, true, 4),
            result("debugger", 1, true, 6),
            result("refactorer", 2, false, 8),
            result("refactorer", 2, true, 10),
        ];
        let report = SimReport::from_results(
            results,
            &classes(&["debugger", "refactorer", "devops"]),
            &ImbalanceThresholds::default(),
        );

        assert_eq!(report.total_battles, 4);
        assert_eq!(report.wins, 3);
        assert!((report.win_rate - 75.0).abs() < 1e-9);
        assert!((report.avg_turns - 7.0).abs() < 1e-9);
        assert!((report.avg_turns_to_win - 20.0 / 3.0).abs() < 1e-9);
        assert_eq!(report.class_summary.len(), 3);
        assert_eq!(report.class_summary["devops"].battles, 0);
        assert_eq!(report.chapter_summary[&2].wins, 1);
        assert_eq!(report.skill_usage["breakpoint"], 8);
        // debugger 100% vs refactorer 50%
        assert_eq!(report.imbalances.len(), 1);
        assert!(report.imbalances[0].contains("spread"));
    }

    #[test]
    fn test_global_and_length_imbalances() {
        let results = vec![
            result("debugger", 1, true, 1),
            result("debugger", 1, true, 2),
        ];
        let report = SimReport::from_results(
            results,
            &classes(&["debugger"]),
            &ImbalanceThresholds::default(),
        );
        assert_eq!(report.imbalances.len(), 2);
        assert!(report.imbalances.iter().any(|i| i.contains("win rate")));
        assert!(report.imbalances.iter().any(|i| i.contains("battle length")));
    }

    #[test]
    fn test_empty_report() {
        let report =
            SimReport::from_results(Vec::new(), &classes(&["debugger"]), &ImbalanceThresholds::default());
        assert_eq!(report.total_battles, 0);
        assert_eq!(report.win_rate, 0.0);
        assert!(report.imbalances.is_empty());
        assert!(report.to_text().contains("No imbalances detected"));
    }

    #[test]
    fn test_json_output() {
        let report = SimReport::from_results(
            vec![result("debugger", 1, true, 5)],
            &classes(&["debugger"]),
            &ImbalanceThresholds::default(),
        );
        let value: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(value["total_battles"], 1);
        assert!(value["class_summary"]["debugger"].is_object());
        assert!(value.get("results").is_none());
    }
}
