//! The simulation engine: per-step sub-phase orchestration, termination
//! detection, and `GameResult` (C6).

use crate::algorithms::{ActionRequest, Player, TankAlgorithm};
use crate::board::Board;
use crate::collision;
use crate::config::NO_SHELLS_GRACE_STEPS;
use crate::entities::{Shell, Tank};
use crate::view::WorldView;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TerminationReason {
    AllTanksDead,
    MaxSteps,
    ZeroShells,
}

impl TerminationReason {
    pub fn label(self) -> &'static str {
        match self {
            TerminationReason::AllTanksDead => "AllTanksDead",
            TerminationReason::MaxSteps => "MaxSteps",
            TerminationReason::ZeroShells => "ZeroShells",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameResult {
    /// 0 = tie, otherwise the winning player id.
    pub winner: u32,
    pub reason: TerminationReason,
    /// Indexed by player id - 1.
    pub remaining_tanks: Vec<u32>,
    pub rounds: u32,
    pub final_board_text: String,
}

/// One tank's logged action token for the basic per-step log.
#[derive(Clone, Debug)]
pub struct ActionToken {
    pub player_id: u32,
    pub action: ActionRequest,
    pub ignored: bool,
    pub killed: bool,
    pub already_dead: bool,
}

#[derive(Clone, Debug, Default)]
pub struct StepLog {
    pub tokens: Vec<ActionToken>,
}

/// Capability the rest of the harness invokes: drive one match to
/// completion. Different engine plugins implement this identically in
/// contract but may vary internally; comparative mode runs several against
/// the same map and groups bit-identical outcomes.
pub trait Engine: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    fn run(
        &self,
        board: Board,
        tanks: Vec<Tank>,
        max_steps: u32,
        players: &[Box<dyn Player>],
        algorithms: Vec<Box<dyn TankAlgorithm>>,
    ) -> (GameResult, Vec<StepLog>);
}

/// Constructs an engine instance; `verbose` controls whether per-step logs
/// are retained in the returned `GameResult`'s companion log vector.
pub type EngineFactory = fn(verbose: bool) -> Box<dyn Engine>;

/// The harness's own reference engine, implementing the sub-phase
/// sequence from C6 directly.
pub struct StandardEngine {
    verbose: bool,
}

impl StandardEngine {
    pub fn new(verbose: bool) -> Self {
        StandardEngine { verbose }
    }

    pub fn factory(verbose: bool) -> Box<dyn Engine> {
        Box::new(StandardEngine::new(verbose))
    }
}

impl Engine for StandardEngine {
    fn run(
        &self,
        board: Board,
        tanks: Vec<Tank>,
        max_steps: u32,
        players: &[Box<dyn Player>],
        mut algorithms: Vec<Box<dyn TankAlgorithm>>,
    ) -> (GameResult, Vec<StepLog>) {
        let num_shells = tanks.first().map(|t| t.shells_left).unwrap_or(0);
        let state = EngineState::new(board, tanks, max_steps, num_shells);
        state.run(players, &mut algorithms, self.verbose)
    }
}

struct EngineState {
    board: Board,
    tanks: Vec<Tank>,
    shells: Vec<Shell>,
    max_steps: u32,
    num_shells_per_tank: u32,
    no_shells_countdown: u32,
    step: u32,
}

impl EngineState {
    fn new(board: Board, tanks: Vec<Tank>, max_steps: u32, num_shells_per_tank: u32) -> Self {
        EngineState {
            board,
            tanks,
            shells: Vec::new(),
            max_steps,
            num_shells_per_tank,
            no_shells_countdown: NO_SHELLS_GRACE_STEPS,
            step: 0,
        }
    }

    fn num_players(&self) -> u32 {
        self.tanks.iter().map(|t| t.player_id).max().unwrap_or(0)
    }

    /// Run the match to completion, driving algorithms through `players`
    /// (one per player id, 1-indexed) and `algorithms` (one per tank, same
    /// order as `self.tanks`). `verbose` controls whether per-step logs are
    /// retained.
    pub fn run(
        mut self,
        players: &[Box<dyn Player>],
        algorithms: &mut [Box<dyn TankAlgorithm>],
        verbose: bool,
    ) -> (GameResult, Vec<StepLog>) {
        let mut logs = Vec::new();
        loop {
            let log = self.step_once(players, algorithms);
            if verbose {
                logs.push(log);
            }
            self.step += 1;
            if let Some(reason) = self.check_termination() {
                let result = self.build_result(reason);
                return (result, logs);
            }
        }
    }

    fn check_termination(&mut self) -> Option<TerminationReason> {
        let mut alive_players: Vec<u32> = self
            .tanks
            .iter()
            .filter(|t| !t.destroyed)
            .map(|t| t.player_id)
            .collect();
        alive_players.sort_unstable();
        alive_players.dedup();

        if alive_players.len() == 1 {
            return Some(TerminationReason::AllTanksDead);
        }
        if alive_players.is_empty() {
            return Some(TerminationReason::AllTanksDead);
        }

        let all_out_of_shells = self.tanks.iter().filter(|t| !t.destroyed).all(|t| t.shells_left == 0);
        if all_out_of_shells {
            self.no_shells_countdown = self.no_shells_countdown.saturating_sub(1);
            if self.no_shells_countdown == 0 {
                return Some(TerminationReason::ZeroShells);
            }
        } else {
            self.no_shells_countdown = NO_SHELLS_GRACE_STEPS;
        }

        if self.step >= self.max_steps {
            return Some(TerminationReason::MaxSteps);
        }

        None
    }

    fn build_result(&self, reason: TerminationReason) -> GameResult {
        let num_players = self.num_players();
        let mut remaining = vec![0u32; num_players as usize];
        for t in &self.tanks {
            if !t.destroyed {
                remaining[(t.player_id - 1) as usize] += 1;
            }
        }
        let alive: Vec<u32> = (1..=num_players).filter(|&p| remaining[(p - 1) as usize] > 0).collect();
        let winner = if reason == TerminationReason::AllTanksDead && alive.len() == 1 {
            alive[0]
        } else {
            0
        };
        let final_view = WorldView::capture(&self.board, &self.tanks, &self.shells);
        GameResult {
            winner,
            reason,
            remaining_tanks: remaining,
            rounds: self.step,
            final_board_text: final_view.render(None),
        }
    }

    fn step_once(&mut self, players: &[Box<dyn Player>], algorithms: &mut [Box<dyn TankAlgorithm>]) -> StepLog {
        let w = self.board.width();
        let h = self.board.height();

        // 1. Gather actions for every live tank, in stable order.
        let pre_step_view = WorldView::capture(&self.board, &self.tanks, &self.shells);
        let mut requested: Vec<Option<ActionRequest>> = vec![None; self.tanks.len()];
        for i in 0..self.tanks.len() {
            if !self.tanks[i].destroyed {
                requested[i] = Some(algorithms[i].get_action());
            }
        }

        // 2. Shell half-advance 1.
        for s in self.shells.iter_mut().filter(|s| !s.destroyed) {
            s.advance(w, h);
        }
        // 3. Resolve.
        collision::resolve(&mut self.board, &mut self.tanks, &mut self.shells, None);

        // 4. Apply tank actions.
        let prev_positions: Vec<_> = self.tanks.iter().map(|t| t.position).collect();
        let mut tokens = Vec::with_capacity(self.tanks.len());
        for i in 0..self.tanks.len() {
            let action = match requested[i] {
                Some(a) => a,
                None => {
                    tokens.push(ActionToken {
                        player_id: self.tanks[i].player_id,
                        action: ActionRequest::DoNothing,
                        ignored: false,
                        killed: false,
                        already_dead: true,
                    });
                    continue;
                }
            };
            let ignored = self.apply_action(i, action, players, algorithms, &pre_step_view);
            tokens.push(ActionToken {
                player_id: self.tanks[i].player_id,
                action,
                ignored,
                killed: false,
                already_dead: false,
            });
        }

        // 5. Shell half-advance 2.
        for s in self.shells.iter_mut().filter(|s| !s.destroyed) {
            s.advance(w, h);
        }
        // 6. Resolve (swap-aware).
        collision::resolve(&mut self.board, &mut self.tanks, &mut self.shells, Some(&prev_positions));

        // 7. Cleanup.
        self.shells.retain(|s| !s.destroyed);
        for tank in self.tanks.iter_mut().filter(|t| !t.destroyed) {
            tank.tick_cooldown();
        }
        for (i, token) in tokens.iter_mut().enumerate() {
            if self.tanks[i].destroyed && self.tanks[i].killed_this_step {
                token.killed = true;
            }
        }
        for tank in self.tanks.iter_mut() {
            tank.killed_this_step = false;
        }

        StepLog { tokens }
    }

    /// Apply one tank's action. Returns whether it was ignored (blocked
    /// move, or `GetBattleInfo` swallowed during a ticking backward latch).
    fn apply_action(
        &mut self,
        i: usize,
        action: ActionRequest,
        players: &[Box<dyn Player>],
        algorithms: &mut [Box<dyn TankAlgorithm>],
        pre_step_view: &WorldView,
    ) -> bool {
        let w = self.board.width();
        let h = self.board.height();

        // A ticking backward latch takes priority over everything but a
        // cancelling MoveForward: the latch still advances even while
        // other requests are swallowed.
        if self.tanks[i].backward_latch > 0 {
            return match action {
                ActionRequest::MoveForward => {
                    // Cancellation is observed but produces no translation
                    // on this step; a plain MoveForward the *next* step
                    // moves the tank.
                    self.tanks[i].cancel_backward();
                    true
                }
                ActionRequest::MoveBackward => {
                    if self.tanks[i].tick_backward_latch() {
                        let next = self.tanks[i].next_backward(w, h);
                        if self.board.can_move_to(next) {
                            self.tanks[i].position = next;
                        }
                    }
                    false
                }
                _ => {
                    self.tanks[i].tick_backward_latch();
                    true
                }
            };
        }

        match action {
            ActionRequest::MoveForward => {
                let next = self.tanks[i].next_forward(w, h);
                if self.board.can_move_to(next) {
                    self.tanks[i].position = next;
                    false
                } else {
                    true
                }
            }
            ActionRequest::MoveBackward => {
                if self.tanks[i].request_backward() {
                    let next = self.tanks[i].next_backward(w, h);
                    if self.board.can_move_to(next) {
                        self.tanks[i].position = next;
                        false
                    } else {
                        true
                    }
                } else {
                    false
                }
            }
            ActionRequest::RotateLeft45 => {
                self.tanks[i].rotate(-1, false);
                false
            }
            ActionRequest::RotateRight45 => {
                self.tanks[i].rotate(1, false);
                false
            }
            ActionRequest::RotateLeft90 => {
                self.tanks[i].rotate(-1, true);
                false
            }
            ActionRequest::RotateRight90 => {
                self.tanks[i].rotate(1, true);
                false
            }
            ActionRequest::Shoot => {
                if self.tanks[i].can_shoot() {
                    let tank = &mut self.tanks[i];
                    tank.shoot();
                    self.shells.push(Shell::new(tank.player_id, tank.position, tank.heading));
                    false
                } else {
                    true
                }
            }
            ActionRequest::GetBattleInfo => {
                let player_idx = (self.tanks[i].player_id - 1) as usize;
                if let Some(player) = players.get(player_idx) {
                    player.update_tank_with_battle_info(
                        algorithms[i].as_mut(),
                        pre_step_view,
                        self.tanks[i].player_id,
                        self.tanks[i].position,
                    );
                }
                false
            }
            ActionRequest::DoNothing => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{DoNothingAlgorithm, StandardPlayer};
    use crate::geometry::{Direction, Point};

    fn engine_5x5(max_steps: u32, shells: u32) -> (EngineState, Vec<Box<dyn Player>>, Vec<Box<dyn TankAlgorithm>>) {
        let (board, spawns, _) = Board::from_char_grid(
            5,
            5,
            &[
                "#####".to_string(),
                "#   #".to_string(),
                "#   #".to_string(),
                "#   #".to_string(),
                "#####".to_string(),
            ],
        );
        let tanks: Vec<Tank> = spawns.iter().map(|s| Tank::new(s.player_id, s.position, Direction::Right, shells)).collect();
        let engine = EngineState::new(board, tanks, max_steps, shells);
        let players: Vec<Box<dyn Player>> = vec![Box::new(StandardPlayer), Box::new(StandardPlayer)];
        let algos: Vec<Box<dyn TankAlgorithm>> = vec![Box::new(DoNothingAlgorithm), Box::new(DoNothingAlgorithm)];
        (engine, players, algos)
    }

    #[test]
    fn do_nothing_vs_do_nothing_ties_at_max_steps() {
        let (board, spawns, _) = Board::from_char_grid(
            5,
            5,
            &[
                "#####".to_string(),
                "#1  #".to_string(),
                "#   #".to_string(),
                "#  2#".to_string(),
                "#####".to_string(),
            ],
        );
        let tanks: Vec<Tank> = spawns.iter().map(|s| Tank::new(s.player_id, s.position, Direction::Right, 10)).collect();
        let engine = EngineState::new(board, tanks, 5, 10);
        let players: Vec<Box<dyn Player>> = vec![Box::new(StandardPlayer), Box::new(StandardPlayer)];
        let mut algos: Vec<Box<dyn TankAlgorithm>> = vec![Box::new(DoNothingAlgorithm), Box::new(DoNothingAlgorithm)];
        let (result, _) = engine.run(&players, &mut algos, false);
        assert_eq!(result.winner, 0);
        assert_eq!(result.reason, TerminationReason::MaxSteps);
        assert_eq!(result.remaining_tanks, vec![1, 1]);
        assert_eq!(result.rounds, 5);
    }

    #[test]
    fn zero_shells_grace_period_ends_in_a_tie() {
        let (engine, players, mut algos) = engine_5x5(1000, 0);
        let (result, _) = engine.run(&players, &mut algos, false);
        assert_eq!(result.reason, TerminationReason::ZeroShells);
        assert_eq!(result.winner, 0);
    }

    /// Issues a scripted sequence of actions, one per call to `get_action`,
    /// repeating the last entry once the script is exhausted.
    struct ScriptedAlgorithm {
        actions: Vec<ActionRequest>,
        next: usize,
    }

    impl TankAlgorithm for ScriptedAlgorithm {
        fn get_action(&mut self) -> ActionRequest {
            let action = self.actions[self.next.min(self.actions.len() - 1)];
            self.next += 1;
            action
        }

        fn update_battle_info(&mut self, _info: &crate::algorithms::BattleInfo) {}
    }

    #[test]
    fn move_forward_cancelling_a_ticking_backward_latch_produces_no_translation() {
        let (board, spawns, _) = Board::from_char_grid(
            5,
            5,
            &["#####".to_string(), "#   #".to_string(), "#1  #".to_string(), "#   #".to_string(), "#####".to_string()],
        );
        let tanks: Vec<Tank> = spawns.iter().map(|s| Tank::new(s.player_id, s.position, Direction::Right, 10)).collect();
        let mut engine = EngineState::new(board, tanks, 1, 10);
        let players: Vec<Box<dyn Player>> = vec![Box::new(StandardPlayer)];
        let mut algos: Vec<Box<dyn TankAlgorithm>> = vec![Box::new(ScriptedAlgorithm {
            actions: vec![ActionRequest::MoveBackward, ActionRequest::MoveForward, ActionRequest::MoveForward],
            next: 0,
        })];

        let start = engine.tanks[0].position;
        engine.step_once(&players, &mut algos); // requests MoveBackward: latch starts ticking, no move yet
        assert_eq!(engine.tanks[0].position, start);

        engine.step_once(&players, &mut algos); // MoveForward cancels the latch: still no translation this step
        assert_eq!(engine.tanks[0].position, start);
        assert_eq!(engine.tanks[0].backward_latch, 0);

        let forward = start.add(1, 0).wrap(5, 5);
        engine.step_once(&players, &mut algos); // plain MoveForward now moves the tank
        assert_eq!(engine.tanks[0].position, forward);
    }

    #[test]
    fn standard_engine_trait_wrapper_matches_direct_state() {
        let (board, spawns, _) = Board::from_char_grid(
            5,
            5,
            &[
                "#####".to_string(),
                "#1  #".to_string(),
                "#   #".to_string(),
                "#  2#".to_string(),
                "#####".to_string(),
            ],
        );
        let tanks: Vec<Tank> = spawns.iter().map(|s| Tank::new(s.player_id, s.position, Direction::Right, 10)).collect();
        let players: Vec<Box<dyn Player>> = vec![Box::new(StandardPlayer), Box::new(StandardPlayer)];
        let algos: Vec<Box<dyn TankAlgorithm>> = vec![Box::new(DoNothingAlgorithm), Box::new(DoNothingAlgorithm)];
        let engine: Box<dyn Engine> = StandardEngine::factory(false);
        let (result, logs) = engine.run(board, tanks, 5, &players, algos);
        assert_eq!(result.reason, TerminationReason::MaxSteps);
        assert!(logs.is_empty());
    }
}
