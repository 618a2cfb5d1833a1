//! Engine-wide constants.
//!
//! Mirrors the teacher's split between simulation-physics constants and
//! run/tournament constants, collapsed here into one small module since the
//! harness has no per-run tunable physics beyond what the map header
//! supplies.

/// Hit points a freshly built Wall cell starts with.
pub const WALL_STARTING_HEALTH: u32 = 2;

/// Steps a tank must wait after shooting before it can shoot again.
pub const SHOOT_COOLDOWN: u32 = 4;

/// Steps a `MoveBackward` request takes to execute once latched.
pub const BACKWARD_LATCH_TICKS: u32 = 3;

/// Steps a defensive/offensive algorithm will act on stale battle info
/// before requesting a refresh.
pub const BATTLE_INFO_STALE_AFTER: u32 = 3;

/// Countdown, in steps, once every live tank is out of shells.
pub const NO_SHELLS_GRACE_STEPS: u32 = 40;

/// Straight-line distance within which an oncoming shell is considered a
/// danger to a cell.
pub const SHELL_DANGER_RADIUS: u32 = 3;

/// Default worker-pool size when the CLI does not specify `num_threads`.
pub fn default_num_threads() -> usize {
    num_cpus::get().max(1)
}
