//! Player and tank-algorithm capability contracts (C4), and the reference
//! algorithms.
//!
//! The original engine uses class inheritance for `BattleInfo`, `Player`,
//! and `TankAlgorithm`; here they are capability sets instead (design
//! notes): small traits the engine invokes, with no downcasting.

mod common;
pub mod defensive;
pub mod fixtures;
pub mod offensive;

use crate::board::CellKind;
use crate::geometry::Point;
use crate::view::WorldView;

pub use defensive::DefensiveAlgorithm;
pub use fixtures::{AlwaysMoveForwardAlgorithm, AlwaysShootAlgorithm, DoNothingAlgorithm};
pub use offensive::OffensiveAlgorithm;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ActionRequest {
    MoveForward,
    MoveBackward,
    RotateLeft45,
    RotateRight45,
    RotateLeft90,
    RotateRight90,
    Shoot,
    GetBattleInfo,
    DoNothing,
}

impl ActionRequest {
    /// Stable display name used by the basic per-step log.
    pub fn name(self) -> &'static str {
        match self {
            ActionRequest::MoveForward => "MoveForward",
            ActionRequest::MoveBackward => "MoveBackward",
            ActionRequest::RotateLeft45 => "RotateLeft45",
            ActionRequest::RotateRight45 => "RotateRight45",
            ActionRequest::RotateLeft90 => "RotateLeft90",
            ActionRequest::RotateRight90 => "RotateRight90",
            ActionRequest::Shoot => "Shoot",
            ActionRequest::GetBattleInfo => "GetBattleInfo",
            ActionRequest::DoNothing => "DoNothing",
        }
    }
}

/// Base battle-info record, populated by a `Player` from a `WorldView`.
/// The offensive variant rides along as an optional target rather than a
/// subclass.
#[derive(Clone, Debug)]
pub struct BattleInfo {
    pub board_width: i32,
    pub board_height: i32,
    cells: Vec<CellKind>,
    pub friendly_tanks: Vec<Point>,
    pub enemy_tanks: Vec<Point>,
    pub shells: Vec<Point>,
    pub own_position: Point,
    pub target: Option<Point>,
}

impl BattleInfo {
    pub fn cell_at(&self, p: Point) -> CellKind {
        let w = p.wrap(self.board_width, self.board_height);
        self.cells[(w.y * self.board_width + w.x) as usize]
    }

    pub fn is_tank_at(&self, p: Point) -> bool {
        self.friendly_tanks.contains(&p) || self.enemy_tanks.contains(&p)
    }

    pub fn step_distance(&self, a: Point, b: Point) -> i32 {
        a.step_distance(b, self.board_width, self.board_height)
    }
}

/// A tank's decision-making capability: produce one action per step, and
/// absorb a battle-info refresh when the player supplies one.
pub trait TankAlgorithm: Send {
    fn get_action(&mut self) -> ActionRequest;
    fn update_battle_info(&mut self, info: &BattleInfo);
}

/// The sole party that builds and populates a `BattleInfo` record for a
/// tank, from the pinned snapshot the engine hands it.
pub trait Player: Send + Sync {
    fn update_tank_with_battle_info(
        &self,
        algorithm: &mut dyn TankAlgorithm,
        view: &WorldView,
        player_id: u32,
        own_position: Point,
    );
}

fn build_base_info(view: &WorldView, player_id: u32, own_position: Point) -> BattleInfo {
    let mut cells = Vec::with_capacity((view.width() * view.height()) as usize);
    for y in 0..view.height() {
        for x in 0..view.width() {
            cells.push(view.cell_kind_at(Point::new(x, y)));
        }
    }
    let mut friendly = Vec::new();
    let mut enemy = Vec::new();
    for tank in view.tanks() {
        if tank.destroyed {
            continue;
        }
        if tank.player_id == player_id {
            friendly.push(tank.position);
        } else {
            enemy.push(tank.position);
        }
    }
    let shells = view
        .shells()
        .iter()
        .filter(|s| !s.destroyed)
        .map(|s| s.position)
        .collect();

    BattleInfo {
        board_width: view.width(),
        board_height: view.height(),
        cells,
        friendly_tanks: friendly,
        enemy_tanks: enemy,
        shells,
        own_position,
        target: None,
    }
}

/// Plain player: no designated target, used by the Defensive reference
/// algorithm and the trivial fixtures.
pub struct StandardPlayer;

impl Player for StandardPlayer {
    fn update_tank_with_battle_info(
        &self,
        algorithm: &mut dyn TankAlgorithm,
        view: &WorldView,
        player_id: u32,
        own_position: Point,
    ) {
        let info = build_base_info(view, player_id, own_position);
        algorithm.update_battle_info(&info);
    }
}

/// Designates the nearest enemy tank as the battle info's target, for the
/// Offensive reference algorithm.
pub struct TargetingPlayer;

impl Player for TargetingPlayer {
    fn update_tank_with_battle_info(
        &self,
        algorithm: &mut dyn TankAlgorithm,
        view: &WorldView,
        player_id: u32,
        own_position: Point,
    ) {
        let mut info = build_base_info(view, player_id, own_position);
        info.target = info
            .enemy_tanks
            .iter()
            .copied()
            .min_by_key(|p| info.step_distance(own_position, *p));
        algorithm.update_battle_info(&info);
    }
}

/// Constructs one tank's algorithm instance at match start.
pub type TankAlgorithmFactory =
    fn(player_id: u32, tank_index: usize, position: Point, heading: crate::geometry::Direction, shells: u32) -> Box<dyn TankAlgorithm>;

/// Constructs a player for one side at match start.
pub type PlayerFactory = fn() -> Box<dyn Player>;
