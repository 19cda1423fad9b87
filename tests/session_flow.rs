use chrono::{Days, NaiveDate};
use tempfile::TempDir;

use codetype::engine::achievements::AchievementId;
use codetype::engine::progress::{UserProgress, apply_session};
use codetype::engine::scoring::{level_from_xp, session_xp, xp_for_level};
use codetype::session::input::TypingSession;
use codetype::session::result::{ScoreError, score};
use codetype::snippets::{Difficulty, SnippetLibrary, SnippetRotation};
use codetype::store::json_store::JsonStore;
use codetype::store::{ProgressRepository, UserKey, apply_and_save};

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
}

#[test]
fn typo_session_scores_partial_credit() {
    let result = score("abc", "abd", 60.0, 0, 60).unwrap();
    assert_eq!(result.correct_chars, 2);
    assert_eq!(result.incorrect_chars, 1);
    assert_eq!(result.total_chars, 3);
    assert_eq!(result.accuracy, 67);
    assert_eq!(result.wpm, 0);
    assert!(!result.completed);
}

#[test]
fn full_length_attempt_with_typo_earns_no_completion_bonus() {
    let result = score("abcde", "abcdx", 60.0, 0, 60).unwrap();
    assert_eq!(result.total_chars, 5);
    assert_eq!(result.accuracy, 80);
    assert_eq!(result.wpm, 1);
    assert!(!result.completed);
    // 10 participation + 1 wpm + 15 accuracy, no +25 for completion.
    assert_eq!(session_xp(&result), 26);
}

#[test]
fn slow_perfect_run_earns_ninety_five_xp() {
    let target = "fn add(a: i32) -> i32 { a";
    assert_eq!(target.chars().count(), 25);
    let result = score(target, target, 30.0, 30, 60).unwrap();
    assert_eq!(result.accuracy, 100);
    assert_eq!(result.wpm, 10);
    assert!(result.completed);
    assert_eq!(session_xp(&result), 95);
}

#[test]
fn tenth_session_grants_ten_races_bonus() {
    let mut progress = UserProgress::default();
    let mut today = start_date();
    let result = score("x = 1", "x = 2", 20.0, 40, 60).unwrap();

    for _ in 0..9 {
        progress = apply_session(&progress, &result, today).progress;
        today = today + Days::new(3);
    }
    assert_eq!(progress.stats.total_sessions, 9);
    assert!(!progress.has_achievement(AchievementId::TenRaces));

    let outcome = apply_session(&progress, &result, today);
    assert_eq!(outcome.progress.stats.total_sessions, 10);
    let ids: Vec<AchievementId> = outcome.newly_unlocked.iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![AchievementId::TenRaces]);
    assert_eq!(outcome.earned_xp, session_xp(&result) + 100);
}

#[test]
fn empty_input_scores_zero() {
    let result = score("print('hi')", "", 42.0, 18, 60).unwrap();
    assert_eq!(result.total_chars, 0);
    assert_eq!(result.accuracy, 0);
    assert_eq!(result.wpm, 0);
}

#[test]
fn oversized_input_is_a_contract_violation() {
    assert_eq!(
        score("ab", "abcd", 2.0, 58, 60),
        Err(ScoreError::InvalidInputLength { typed: 4, target: 2 })
    );
}

#[test]
fn level_thresholds_bracket_each_level() {
    for level in 1..=200 {
        assert_eq!(level_from_xp(xp_for_level(level - 1)), level);
        assert_eq!(level_from_xp(xp_for_level(level)), level + 1);
        assert_eq!(level_from_xp(xp_for_level(level) - 1), level);
    }
}

#[test]
fn week_of_daily_practice_unlocks_streak_once() {
    let mut progress = UserProgress::default();
    let result = score("let a = 1;", "let a = 1;", 5.0, 55, 60).unwrap();
    let mut streak_unlocks = 0;

    for day in 0..10 {
        let today = start_date() + Days::new(day);
        let before = progress.total_xp;
        let outcome = apply_session(&progress, &result, today);
        assert!(outcome.progress.total_xp >= before);
        streak_unlocks += outcome
            .newly_unlocked
            .iter()
            .filter(|d| d.id == AchievementId::WeekStreak)
            .count();
        progress = outcome.progress;
    }

    assert_eq!(progress.stats.streak_days, 10);
    assert_eq!(progress.stats.best_streak, 10);
    assert_eq!(streak_unlocks, 1);
}

#[test]
fn reapplying_same_state_never_regrants_achievements() {
    let result = score("ok", "ok", 1.0, 59, 60).unwrap();
    let first = apply_session(&UserProgress::default(), &result, start_date());
    assert!(first.progress.has_achievement(AchievementId::FirstRace));

    // Same stats evaluated again by mistake: ids already held, nothing new.
    let mut replay = first.progress.clone();
    replay.stats = UserProgress::default().stats;
    let second = apply_session(&replay, &result, start_date());
    assert!(second.newly_unlocked.is_empty());
    assert_eq!(second.earned_xp, session_xp(&result));
}

#[test]
fn typed_session_flows_into_json_store() {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let user = UserKey::User("grace".to_string());

    let library = SnippetLibrary::builtin().unwrap();
    let mut rotation = SnippetRotation::default();
    let snippet = rotation
        .pick(&library, "rust", Difficulty::Easy, &mut rand::thread_rng())
        .unwrap();

    let mut session = TypingSession::new(&snippet.code, 60);
    for ch in snippet.code.chars() {
        session.type_char(ch);
    }
    session.type_char('!');
    assert!(session.is_complete());

    let result = session.finish(20.0).unwrap();
    assert!(result.completed);
    assert_eq!(result.accuracy, 100);
    assert_eq!(result.time_left_secs, 40);

    let outcome = apply_and_save(&store, &user, &result, start_date()).unwrap();
    let stored = store.load_progress(&user).unwrap();
    assert_eq!(stored, outcome.progress);
    assert_eq!(stored.stats.total_sessions, 1);
    assert!(stored.has_achievement(AchievementId::Perfect));

    // Other users are untouched.
    assert_eq!(
        store.load_progress(&UserKey::Guest).unwrap(),
        UserProgress::default()
    );

    store.reset_progress(&user).unwrap();
    assert_eq!(store.load_progress(&user).unwrap().total_xp, 0);
}
