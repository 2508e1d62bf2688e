// Pure leveling math. No I/O, no storage, no Discord.
//
// Every function takes a snapshot and hands back a new one, so the service
// decides when (and whether) anything gets persisted.

use super::progression_models::{LevelUpNotice, ProgressionError, UserProgress, XpAward};

pub const DEFAULT_BASE_XP: u64 = 100;
pub const DEFAULT_MULTIPLIER: f64 = 1.5;

/// Hard ceiling on levels an admin may set directly. Steep curves hit the
/// lifetime XP ceiling well before this; see `ProgressionEngine::max_level`.
pub const MAX_LEVEL: u32 = 1_000;

/// Lifetime XP an admin-set level may imply. The other half of `u64` is
/// left for message awards so `total_xp` keeps growing by exact amounts.
const TOTAL_XP_CEILING: u64 = u64::MAX / 2;

pub const PROGRESS_BAR_WIDTH: usize = 20;
const PROGRESS_FILLED: &str = "█";
const PROGRESS_EMPTY: &str = "░";

/// The XP curve: `floor(base_xp * multiplier^level)`.
///
/// `base_xp >= 1` and `multiplier >= 1.0` keep every threshold positive and
/// the curve non-decreasing, which is what lets `award_xp` terminate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressionCurve {
    base_xp: u64,
    multiplier: f64,
}

impl ProgressionCurve {
    pub fn new(base_xp: u64, multiplier: f64) -> Result<Self, ProgressionError> {
        if base_xp == 0 {
            return Err(ProgressionError::InvalidCurve(
                "base XP must be at least 1".to_string(),
            ));
        }
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(ProgressionError::InvalidCurve(format!(
                "multiplier must be a finite number >= 1.0 (got {multiplier})"
            )));
        }
        Ok(Self {
            base_xp,
            multiplier,
        })
    }

}

impl Default for ProgressionCurve {
    fn default() -> Self {
        Self {
            base_xp: DEFAULT_BASE_XP,
            multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressionEngine {
    curve: ProgressionCurve,
}

impl ProgressionEngine {
    pub fn new(curve: ProgressionCurve) -> Self {
        Self { curve }
    }

    /// XP needed to finish `level`. Saturates at `u64::MAX` for absurd levels.
    pub fn xp_required_for(&self, level: u32) -> u64 {
        let raw = self.curve.base_xp as f64 * self.curve.multiplier.powf(f64::from(level));
        // `as` saturates on overflow and infinity
        (raw.floor() as u64).max(1)
    }

    /// Add `amount` to both `xp` and `total_xp`, then roll any overflow into
    /// as many level-ups as it pays for.
    pub fn award_xp(&self, state: UserProgress, amount: u64) -> XpAward {
        let mut progress = state;
        progress.xp = progress.xp.saturating_add(amount);
        progress.total_xp = progress.total_xp.saturating_add(amount);

        let mut levels_crossed = Vec::new();
        loop {
            let needed = self.xp_required_for(progress.level);
            if progress.xp < needed || progress.level == u32::MAX {
                break;
            }
            progress.xp -= needed;
            progress.level += 1;
            levels_crossed.push(progress.level);
        }

        XpAward {
            progress,
            amount,
            levels_crossed,
        }
    }

    /// Put the user at the start of `new_level` and rebuild `total_xp` as
    /// the XP it takes to get there from scratch.
    pub fn set_level(
        &self,
        state: UserProgress,
        new_level: i64,
    ) -> Result<UserProgress, ProgressionError> {
        let max = self.max_level();
        let level = u32::try_from(new_level)
            .ok()
            .filter(|level| *level <= max)
            .ok_or(ProgressionError::InvalidLevel {
                requested: new_level,
                max,
            })?;

        Ok(UserProgress {
            user_id: state.user_id,
            level,
            xp: 0,
            total_xp: self.total_xp_to_reach(level),
        })
    }

    /// `set_level(state, state.level + delta)`; nothing changes on rejection.
    pub fn adjust_level(
        &self,
        state: UserProgress,
        delta: i64,
    ) -> Result<UserProgress, ProgressionError> {
        let target = i64::from(state.level).saturating_add(delta);
        self.set_level(state, target)
    }

    /// Highest level `set_level` accepts: the last level that can be
    /// finished without lifetime XP passing `TOTAL_XP_CEILING`, capped at
    /// `MAX_LEVEL`. With the default curve this lands in the low 90s.
    pub fn max_level(&self) -> u32 {
        let mut total: u64 = 0;
        for level in 0..=MAX_LEVEL {
            match total.checked_add(self.xp_required_for(level)) {
                Some(next) if next <= TOTAL_XP_CEILING => total = next,
                _ => return level.saturating_sub(1),
            }
        }
        MAX_LEVEL
    }

    /// Sum of thresholds for levels `0..level`.
    pub fn total_xp_to_reach(&self, level: u32) -> u64 {
        let mut total: u64 = 0;
        for l in 0..level {
            total = total.saturating_add(self.xp_required_for(l));
            if total == u64::MAX {
                break;
            }
        }
        total
    }

    /// The announcement for reaching `level`. The bar is always empty since
    /// the notice describes the moment the level was entered.
    pub fn level_up_notice(&self, user_id: u64, level: u32) -> LevelUpNotice {
        let needed = self.xp_required_for(level);
        let bar = render_progress_bar(0, needed, PROGRESS_BAR_WIDTH);
        LevelUpNotice {
            user_id,
            level,
            title: "🎉 Level Up!".to_string(),
            body: format!(
                "<@{}> reached **Level {}**!\n`{}` 0 / {} XP",
                user_id, level, bar, needed
            ),
        }
    }
}

/// Fixed-width bar of filled/empty glyphs for `current / needed`.
/// A zero `needed` renders a full bar.
pub fn render_progress_bar(current: u64, needed: u64, width: usize) -> String {
    let ratio = if needed == 0 {
        1.0
    } else {
        (current as f64 / needed as f64).clamp(0.0, 1.0)
    };
    let filled = ((width as f64 * ratio).floor() as usize).min(width);
    PROGRESS_FILLED.repeat(filled) + &PROGRESS_EMPTY.repeat(width - filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ProgressionEngine {
        ProgressionEngine::default()
    }

    fn state(level: u32, xp: u64, total_xp: u64) -> UserProgress {
        UserProgress {
            user_id: 1,
            level,
            xp,
            total_xp,
        }
    }

    #[test]
    fn default_curve_thresholds() {
        let engine = engine();
        assert_eq!(engine.xp_required_for(0), 100);
        assert_eq!(engine.xp_required_for(1), 150);
        assert_eq!(engine.xp_required_for(2), 225);
        assert_eq!(engine.xp_required_for(3), 337);
    }

    #[test]
    fn thresholds_never_decrease() {
        let engine = engine();
        for level in 0..300 {
            assert!(engine.xp_required_for(level + 1) >= engine.xp_required_for(level));
        }
        assert_eq!(engine.xp_required_for(u32::MAX), u64::MAX);
    }

    #[test]
    fn curve_rejects_shrinking_multipliers() {
        assert!(ProgressionCurve::new(100, 0.9).is_err());
        assert!(ProgressionCurve::new(0, 1.5).is_err());
        assert!(ProgressionCurve::new(100, f64::NAN).is_err());
        assert!(ProgressionCurve::new(10, 1.0).is_ok());
    }

    #[test]
    fn award_crosses_single_level() {
        let award = engine().award_xp(state(0, 95, 95), 10);
        assert_eq!(award.progress, state(1, 5, 105));
        assert_eq!(award.levels_crossed, vec![1]);
    }

    #[test]
    fn award_crosses_several_levels_at_once() {
        let award = engine().award_xp(state(0, 0, 0), 500);
        assert_eq!(award.progress, state(3, 25, 500));
        assert_eq!(award.levels_crossed, vec![1, 2, 3]);
    }

    #[test]
    fn award_without_level_up() {
        let award = engine().award_xp(state(2, 10, 260), 5);
        assert_eq!(award.progress, state(2, 15, 265));
        assert!(award.levels_crossed.is_empty());
    }

    #[test]
    fn award_keeps_xp_below_threshold_and_adds_total_exactly() {
        let engine = engine();
        let mut current = state(0, 0, 0);
        for amount in [1u64, 3, 8, 99, 150, 1_000, 12_345, 7] {
            let before = current.total_xp;
            let award = engine.award_xp(current, amount);
            assert!(award.progress.xp < engine.xp_required_for(award.progress.level));
            assert_eq!(award.progress.total_xp, before + amount);
            current = award.progress;
        }
    }

    #[test]
    fn set_level_rebuilds_total_xp() {
        let result = engine().set_level(state(0, 40, 40), 3).unwrap();
        assert_eq!(result, state(3, 0, 100 + 150 + 225));
    }

    #[test]
    fn set_level_is_idempotent() {
        let engine = engine();
        let once = engine.set_level(state(5, 12, 2000), 2).unwrap();
        let twice = engine.set_level(once, 2).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn set_level_rejects_out_of_range() {
        let engine = engine();
        assert!(matches!(
            engine.set_level(state(1, 0, 100), -1),
            Err(ProgressionError::InvalidLevel { requested: -1, .. })
        ));
        assert!(engine
            .set_level(state(1, 0, 100), i64::from(MAX_LEVEL) + 1)
            .is_err());
    }

    #[test]
    fn admin_cap_follows_the_curve() {
        let engine = engine();
        let max = engine.max_level();
        assert!((80..100).contains(&max), "unexpected cap {max}");

        let at_cap = engine.set_level(UserProgress::new(1), i64::from(max)).unwrap();
        assert!(at_cap.total_xp < u64::MAX / 2);
        assert!(matches!(
            engine.set_level(UserProgress::new(1), i64::from(max) + 1),
            Err(ProgressionError::InvalidLevel { max: reported, .. }) if reported == max
        ));
        assert!(engine.set_level(UserProgress::new(1), 150).is_err());

        let flat = ProgressionEngine::new(ProgressionCurve::new(10, 1.0).unwrap());
        assert_eq!(flat.max_level(), MAX_LEVEL);
    }

    #[test]
    fn awards_after_granting_the_top_level_stay_exact() {
        let engine = engine();
        let granted = engine
            .set_level(UserProgress::new(1), i64::from(engine.max_level()))
            .unwrap();
        assert!(engine.xp_required_for(granted.level) < u64::MAX);

        let mut current = granted;
        for amount in [5u64, 8, 3] {
            let before = current.total_xp;
            let award = engine.award_xp(current, amount);
            assert_eq!(award.progress.total_xp, before + amount);
            assert!(award.progress.total_xp > before);
            current = award.progress;
        }
        assert_eq!(current.xp, 16);
    }

    #[test]
    fn adjust_level_past_the_cap_is_refused() {
        let engine = engine();
        let top = engine
            .set_level(UserProgress::new(1), i64::from(engine.max_level()))
            .unwrap();
        assert!(matches!(
            engine.adjust_level(top, 1),
            Err(ProgressionError::InvalidLevel { .. })
        ));
    }

    #[test]
    fn adjust_level_moves_both_ways() {
        let engine = engine();
        let up = engine.adjust_level(state(1, 20, 120), 2).unwrap();
        assert_eq!(up.level, 3);
        let down = engine.adjust_level(up, -3).unwrap();
        assert_eq!(down, state(0, 0, 0));
    }

    #[test]
    fn adjust_level_refuses_to_go_negative() {
        let result = engine().adjust_level(state(2, 0, 250), -3);
        assert!(matches!(
            result,
            Err(ProgressionError::InvalidLevel { requested: -1, .. })
        ));
    }

    #[test]
    fn progress_bar_half_full() {
        let bar = render_progress_bar(10, 20, 20);
        assert_eq!(bar, format!("{}{}", "█".repeat(10), "░".repeat(10)));
    }

    #[test]
    fn progress_bar_edges() {
        assert_eq!(render_progress_bar(0, 100, 5), "░░░░░");
        assert_eq!(render_progress_bar(500, 100, 5), "█████");
        assert_eq!(render_progress_bar(3, 0, 4), "████");
        assert_eq!(render_progress_bar(99, 100, 10), "█████████░");
    }

    #[test]
    fn level_up_notice_mentions_user_and_level() {
        let notice = engine().level_up_notice(77, 2);
        assert_eq!(notice.title, "🎉 Level Up!");
        assert!(notice.body.starts_with("<@77> reached **Level 2**!"));
        assert!(notice.body.ends_with("0 / 225 XP"));
    }
}
