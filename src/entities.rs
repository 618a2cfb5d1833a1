//! Tank and Shell value records (C2).

use crate::config::SHOOT_COOLDOWN;
use crate::geometry::{Direction, Point};

#[derive(Copy, Clone, Debug)]
pub struct Tank {
    pub player_id: u32,
    pub position: Point,
    pub heading: Direction,
    pub shells_left: u32,
    pub shoot_cooldown: u32,
    /// 0 = no pending backward move. 1..=3 while a latch counts down.
    /// Once it has fired the first time this stays pinned at the fired
    /// value so subsequent `MoveBackward` requests execute immediately.
    pub backward_latch: u32,
    /// Set once the latch has fired at least once, so later
    /// `MoveBackward` requests skip the 3-tick wait.
    pub backward_primed: bool,
    pub destroyed: bool,
    /// Set by the engine the step this tank dies; used for log rendering.
    pub killed_this_step: bool,
}

impl Tank {
    pub fn new(player_id: u32, position: Point, heading: Direction, shells_left: u32) -> Self {
        Tank {
            player_id,
            position,
            heading,
            shells_left,
            shoot_cooldown: 0,
            backward_latch: 0,
            backward_primed: false,
            destroyed: false,
            killed_this_step: false,
        }
    }

    pub fn next_forward(&self, w: i32, h: i32) -> Point {
        let (dx, dy) = self.heading.delta();
        self.position.add(dx, dy).wrap(w, h)
    }

    pub fn next_backward(&self, w: i32, h: i32) -> Point {
        let (dx, dy) = self.heading.delta();
        self.position.add(-dx, -dy).wrap(w, h)
    }

    pub fn rotate(&mut self, sign: i32, ninety: bool) {
        let steps = if ninety { 2 * sign } else { sign };
        self.heading = self.heading.rotate_steps(steps);
    }

    pub fn can_shoot(&self) -> bool {
        self.shells_left > 0 && self.shoot_cooldown == 0
    }

    pub fn shoot(&mut self) {
        self.shells_left -= 1;
        self.shoot_cooldown = SHOOT_COOLDOWN;
    }

    /// Start (or re-fire) the backward latch. Returns `true` if the move
    /// should execute immediately this step (already primed).
    pub fn request_backward(&mut self) -> bool {
        if self.backward_primed {
            true
        } else {
            if self.backward_latch == 0 {
                self.backward_latch = crate::config::BACKWARD_LATCH_TICKS;
            }
            false
        }
    }

    /// Cancel a ticking latch. Produces no translation on the step of
    /// cancellation; clears the latch whether or not it had already fired.
    pub fn cancel_backward(&mut self) {
        self.backward_latch = 0;
        self.backward_primed = false;
    }

    /// Advance the latch by one tick. Returns `true` the step the backward
    /// move should actually execute.
    pub fn tick_backward_latch(&mut self) -> bool {
        if self.backward_latch == 0 {
            return false;
        }
        self.backward_latch -= 1;
        if self.backward_latch == 0 {
            self.backward_primed = true;
            true
        } else {
            false
        }
    }

    pub fn tick_cooldown(&mut self) {
        if self.shoot_cooldown > 0 {
            self.shoot_cooldown -= 1;
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Shell {
    pub player_id: u32,
    pub position: Point,
    pub heading: Direction,
    pub destroyed: bool,
}

impl Shell {
    pub fn new(player_id: u32, position: Point, heading: Direction) -> Self {
        Shell { player_id, position, heading, destroyed: false }
    }

    pub fn advance(&mut self, w: i32, h: i32) {
        let (dx, dy) = self.heading.delta();
        self.position = self.position.add(dx, dy).wrap(w, h);
    }
}
