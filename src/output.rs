//! Pure-function report renderers (spec §6), unchanged from the original's
//! `generateOutput`/`logAction` line formats.

use crate::engine::{ActionToken, GameResult, StepLog, TerminationReason};
use crate::tournament::{ComparativeGroup, Standing};

fn winner_reason_line(result: &GameResult) -> String {
    match result.reason {
        TerminationReason::AllTanksDead if result.winner != 0 => {
            format!("Player {} wins ({}, round {})", result.winner, result.reason.label(), result.rounds)
        }
        _ => format!("Tie ({}, round {})", result.reason.label(), result.rounds),
    }
}

/// Comparative output: header, then one block per equivalence group.
pub fn render_comparative(game_map: &str, algorithm1: &str, algorithm2: &str, groups: &[ComparativeGroup]) -> String {
    let mut lines = Vec::new();
    lines.push(format!("game_map={}", game_map));
    lines.push(format!("algorithm1={}", algorithm1));
    lines.push(format!("algorithm2={}", algorithm2));
    lines.push(String::new());

    let mut blocks = Vec::new();
    for group in groups {
        let mut block = Vec::new();
        block.push(group.engine_names.join(","));
        block.push(winner_reason_line(&group.result));
        block.push(group.result.rounds.to_string());
        block.push(group.result.final_board_text.clone());
        blocks.push(block.join("\n"));
    }
    lines.push(blocks.join("\n\n"));
    lines.join("\n")
}

/// Competitive output: header, then one `<algorithm-name> <score>` line per
/// standing, already sorted descending by score.
pub fn render_competitive(game_maps_folder: &str, game_manager: &str, standings: &[Standing]) -> String {
    let mut lines = Vec::new();
    lines.push(format!("game_maps_folder={}", game_maps_folder));
    lines.push(format!("game_manager={}", game_manager));
    lines.push(String::new());
    for standing in standings {
        lines.push(format!("{} {}", standing.algorithm_name, standing.score));
    }
    lines.join("\n")
}

fn render_token(token: &ActionToken) -> String {
    if token.already_dead {
        return "Killed".to_string();
    }
    let mut s = token.action.name().to_string();
    if token.ignored {
        s.push_str(" (ignored)");
    }
    if token.killed {
        s.push_str(" (killed)");
    }
    s
}

/// Basic per-step log: one comma-joined line of per-tank tokens per step,
/// followed by the final step-count and result lines.
pub fn render_basic_log(logs: &[StepLog], result: &GameResult) -> String {
    let mut lines: Vec<String> = logs
        .iter()
        .map(|step| step.tokens.iter().map(render_token).collect::<Vec<_>>().join(", "))
        .collect();
    lines.push(format!("Game ended after {} steps", result.rounds));
    lines.push(format!("Result: {}", winner_reason_line(result)));
    lines.join("\n")
}

/// Replace characters illegal in filenames on common platforms, per the
/// verbose-mode log filename contract (`\/:*?"<>|` -> `_`).
pub fn sanitize_filename_component(s: &str) -> String {
    s.chars().map(|c| if "\\/:*?\"<>|".contains(c) { '_' } else { c }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ActionRequest, TerminationReason};

    fn sample_result() -> GameResult {
        GameResult {
            winner: 1,
            reason: TerminationReason::AllTanksDead,
            remaining_tanks: vec![1, 0],
            rounds: 5,
            final_board_text: "#####\n#1  #\n#####".to_string(),
        }
    }

    #[test]
    fn comparative_output_joins_engine_names_in_a_group() {
        let groups = vec![ComparativeGroup {
            engine_names: vec!["engine_a".to_string(), "engine_b".to_string()],
            result: sample_result(),
        }];
        let rendered = render_comparative("arena.txt", "defensive", "offensive", &groups);
        assert!(rendered.contains("engine_a,engine_b"));
        assert!(rendered.contains("game_map=arena.txt"));
    }

    #[test]
    fn competitive_output_lists_one_line_per_standing() {
        let standings = vec![
            Standing { algorithm_name: "offensive".to_string(), score: 9 },
            Standing { algorithm_name: "defensive".to_string(), score: 3 },
        ];
        let rendered = render_competitive("maps/", "engine.so", &standings);
        assert!(rendered.contains("offensive 9"));
        assert!(rendered.contains("defensive 3"));
    }

    #[test]
    fn basic_log_marks_ignored_and_killed_tokens() {
        let logs = vec![StepLog {
            tokens: vec![
                ActionToken { player_id: 1, action: ActionRequest::Shoot, ignored: true, killed: false, already_dead: false },
                ActionToken { player_id: 2, action: ActionRequest::DoNothing, ignored: false, killed: true, already_dead: false },
            ],
        }];
        let rendered = render_basic_log(&logs, &sample_result());
        assert!(rendered.contains("Shoot (ignored)"));
        assert!(rendered.contains("DoNothing (killed)"));
        assert!(rendered.contains("Game ended after 5 steps"));
    }

    #[test]
    fn already_dead_tank_logs_as_killed_literal() {
        let logs = vec![StepLog {
            tokens: vec![ActionToken { player_id: 2, action: ActionRequest::DoNothing, ignored: false, killed: false, already_dead: true }],
        }];
        let rendered = render_basic_log(&logs, &sample_result());
        assert!(rendered.lines().next().unwrap() == "Killed");
    }

    #[test]
    fn sanitizes_reserved_filename_characters() {
        assert_eq!(sanitize_filename_component("a/b:c*d"), "a_b_c_d");
    }
}
