pub const FIRST_TAP: &str = "first-tap";
pub const MERIT_100: &str = "merit-100";
pub const MERIT_1000: &str = "merit-1000";
pub const COMBO_10: &str = "combo-10";
pub const COMBO_50: &str = "combo-50";
pub const DAILY_100: &str = "daily-100";

#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

pub const CATALOG: &[AchievementDef] = &[
    AchievementDef {
        id: FIRST_TAP,
        name: "初心",
        description: "第一次敲击木鱼",
        icon: "🔰",
    },
    AchievementDef {
        id: MERIT_100,
        name: "功德百善",
        description: "累积100点功德",
        icon: "💯",
    },
    AchievementDef {
        id: MERIT_1000,
        name: "功德千里",
        description: "累积1000点功德",
        icon: "🏆",
    },
    AchievementDef {
        id: COMBO_10,
        name: "十连击",
        description: "连续敲击10次",
        icon: "🔥",
    },
    AchievementDef {
        id: COMBO_50,
        name: "五十连击",
        description: "连续敲击50次",
        icon: "⚡",
    },
    AchievementDef {
        id: DAILY_100,
        name: "日行百善",
        description: "单日敲击100次",
        icon: "🌟",
    },
];

/// Returns the badge ids newly crossed by the given counters: a badge is
/// emitted when its threshold is met and it is not already unlocked. Badges
/// are never revoked and never re-emitted, so evaluation is idempotent and
/// order-independent.
pub fn evaluate(merit: u64, combo: u32, today_taps: u64, unlocked: &[String]) -> Vec<&'static str> {
    let mut crossed = Vec::new();
    let mut check = |id: &'static str, hit: bool| {
        if hit && !unlocked.iter().any(|existing| existing == id) {
            crossed.push(id);
        }
    };

    check(FIRST_TAP, merit >= 1);
    check(MERIT_100, merit >= 100);
    check(MERIT_1000, merit >= 1000);
    check(COMBO_10, combo >= 10);
    check(COMBO_50, combo >= 50);
    check(DAILY_100, today_taps >= 100);

    crossed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn first_tap_unlocks_on_first_merit() {
        assert_eq!(evaluate(1, 1, 1, &[]), vec![FIRST_TAP]);
        assert!(evaluate(0, 0, 0, &[]).is_empty());
    }

    #[test]
    fn thresholds_unlock_together_when_crossed_at_once() {
        let unlocked = owned(&[FIRST_TAP]);
        let crossed = evaluate(100, 10, 100, &unlocked);
        assert_eq!(crossed, vec![MERIT_100, COMBO_10, DAILY_100]);
    }

    #[test]
    fn already_unlocked_badges_are_not_re_emitted() {
        let unlocked = owned(&[FIRST_TAP, MERIT_100, COMBO_10]);
        assert!(evaluate(150, 12, 50, &unlocked).is_empty());
    }

    #[test]
    fn evaluation_is_idempotent() {
        let mut unlocked: Vec<String> = Vec::new();
        let first = evaluate(1000, 50, 100, &unlocked);
        unlocked.extend(first.iter().map(|id| id.to_string()));
        assert!(evaluate(1000, 50, 100, &unlocked).is_empty());
    }

    #[test]
    fn catalog_covers_every_predicate() {
        let mut ids: Vec<_> = CATALOG.iter().map(|def| def.id).collect();
        ids.sort_unstable();
        let mut expected = vec![FIRST_TAP, MERIT_100, MERIT_1000, COMBO_10, COMBO_50, DAILY_100];
        expected.sort_unstable();
        assert_eq!(ids, expected);
    }
}
