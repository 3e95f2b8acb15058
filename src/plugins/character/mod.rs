//! Character plugin: the shared state machine and integrator behind the player
//! and every enemy.
//!
//! ---------------------------
//! ONE TICK OF A CHARACTER
//! ---------------------------
//! ```text
//!  health <= 0 ? ─▶ destroy
//!  inactive ? ─▶ stop
//!  invincibility_timer -= 1
//!  state machine ─▶ Brain (player input / charger / shooter) ─▶ intents, shots, sounds
//!  clamp velocity, friction, gravity
//!  velocity += accel * dt ; position += velocity * dt ; accel = 0
//!  facing, cycle counter, edge snapshots (colliding, state, health)
//! ```
//!
//! Behaviour differences between kinds are a [`Brain`] value matched inside the
//! state machine. Side effects that leave the character (new bullets, sounds)
//! are collected in [`Effects`] and turned into messages by the calling system,
//! so the tick itself stays a pure function over plain data.

pub mod animation;

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::common::body::{Body, HasBody, sign};
use crate::common::input::InputFrame;
use crate::plugins::SimSet;
use crate::plugins::enemies::{self, Enemy};
use crate::plugins::player::{self, Loadout};
use crate::plugins::presentation::{Flip, Sound};
use crate::plugins::projectiles::components::Bullet;

pub use animation::{Animation, Animator, Clip};

// -----------------------------------------------------------------------------
// Physics constants (pixels, milliseconds)
// -----------------------------------------------------------------------------

pub const BASE_SPEED: f32 = 0.35;
pub const BASE_ACCEL: f32 = 0.002;
pub const BASE_GRAVITY: f32 = 0.0025;
pub const BASE_JUMP: f32 = 0.95;
pub const SLAM_FACTOR: f32 = 5.0;
pub const PLAYER_IFRAMES: i32 = 100;
/// Horizontal speeds below this snap to zero.
pub const VELOCITY_DEAD_ZONE: f32 = 0.01;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CharacterState {
    #[default]
    Idle,
    Walk,
    Jump,
    Slam,
    Land,
    Damaged,
    Shoot,
    FallThrough,
}

/// Who decides this character's movement this tick.
pub enum Brain<'a> {
    Player {
        input: InputFrame<'a>,
        loadout: &'a mut Loadout,
    },
    Charger(&'a Enemy),
    Shooter(&'a Enemy, &'a mut Loadout),
    /// No decisions: physics and state bookkeeping only.
    Inert,
}

/// Outputs of a tick that other systems own.
#[derive(Debug, Default)]
pub struct Effects {
    pub bullets: Vec<Bullet>,
    pub sounds: Vec<Sound>,
}

#[derive(Component, Debug, Clone)]
pub struct Character {
    pub body: Body,
    pub health: i32,
    pub max_health: i32,
    pub prev_health: i32,
    pub state: CharacterState,
    pub prev_state: CharacterState,
    pub invincibility_timer: i32,
    pub invincibility_frames: i32,
    pub speed: f32,
    pub accel: f32,
    pub slam_speed: f32,
    pub gravity: f32,
    pub jump_strength: f32,
    pub friction: f32,
    /// Flight without gravity, damage or one-way collision.
    pub god_mode: bool,
    pub flip: Flip,
    pub animator: Animator,
}

impl HasBody for Character {
    fn body(&self) -> &Body {
        &self.body
    }
    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Character {
    pub fn new(body: Body, health: i32, animator: Animator) -> Self {
        Self {
            body,
            health,
            max_health: health,
            prev_health: health,
            state: CharacterState::Idle,
            prev_state: CharacterState::Idle,
            invincibility_timer: 0,
            invincibility_frames: PLAYER_IFRAMES,
            speed: BASE_SPEED,
            accel: BASE_ACCEL,
            slam_speed: BASE_SPEED * SLAM_FACTOR,
            gravity: BASE_GRAVITY,
            jump_strength: BASE_JUMP,
            friction: 0.0,
            god_mode: false,
            flip: Flip::None,
            animator,
        }
    }

    #[inline]
    pub fn invincible(&self) -> bool {
        self.god_mode || self.invincibility_timer > 0
    }

    /// Apply `damage` unless invincible. Every landed hit restarts the
    /// invincibility window.
    pub fn take_damage(&mut self, damage: i32) -> bool {
        if self.invincible() {
            return false;
        }
        self.health -= damage;
        self.invincibility_timer = self.invincibility_frames;
        self.state = CharacterState::Damaged;
        true
    }

    pub fn reset(&mut self) {
        self.body.reset();
        self.health = self.max_health;
        self.prev_health = self.max_health;
        self.state = CharacterState::Idle;
        self.prev_state = CharacterState::Idle;
        self.invincibility_timer = 0;
        self.flip = Flip::None;
        self.animator.reset();
    }

    /// Advance one tick of `dt` milliseconds.
    pub fn tick(&mut self, dt: f32, brain: Brain<'_>, fx: &mut Effects) {
        if self.god_mode {
            self.body.velocity = Vec2::ZERO;
            self.body.acceleration = Vec2::ZERO;
        }
        if self.health <= 0 {
            self.body.destroy();
        }
        if !self.body.active {
            return;
        }

        self.body.prev_position = self.body.position();
        if self.invincibility_timer > 0 {
            self.invincibility_timer -= 1;
        }

        self.run_state_machine(brain, fx);
        self.integrate(dt);
        self.update_facing();

        self.animator.cycle_count += 1;
        self.body.prev_colliding = self.body.colliding;
        self.body.colliding = false;
        self.prev_state = self.state;
        self.prev_health = self.health;
    }

    fn run_state_machine(&mut self, brain: Brain<'_>, fx: &mut Effects) {
        use CharacterState::*;

        if matches!(self.state, Walk | Land) {
            self.state = Idle;
        }

        let colliding = self.body.colliding;
        if !self.body.prev_colliding && colliding {
            self.state = Land;
        }

        let airborne = !colliding && !matches!(self.state, Slam | FallThrough);
        if airborne || (colliding && self.body.velocity.y != 0.0) {
            self.state = Jump;
            if self.body.velocity.y >= self.slam_speed {
                self.state = Slam;
            }
        }

        match brain {
            Brain::Player { input, loadout } => player::steer(self, input, loadout, fx),
            Brain::Charger(enemy) => enemies::charge(self, enemy, fx),
            Brain::Shooter(enemy, loadout) => enemies::keep_range(self, enemy, loadout, fx),
            Brain::Inert => {}
        }

        if self.prev_health > self.health {
            self.state = Damaged;
        }

        if !self.animator.is_interruptible() && self.animator.cycle_count != 0 {
            self.state = self.prev_state;
        }
    }

    fn integrate(&mut self, dt: f32) {
        let body = &mut self.body;

        if body.velocity.x.abs() > self.speed {
            body.velocity.x = self.speed * sign(body.velocity.x);
        }
        if body.velocity.y > self.slam_speed {
            body.velocity.y = self.slam_speed;
        }
        if body.velocity.x.abs() < VELOCITY_DEAD_ZONE {
            body.velocity.x = 0.0;
        }

        self.friction = body.velocity.x * self.accel * 2.0;
        if body.acceleration.x == 0.0 {
            body.acceleration.x = -self.friction;
        }
        if !self.god_mode {
            body.acceleration.y = self.gravity;
        }

        body.velocity += body.acceleration * dt;
        let next = body.position() + body.velocity * dt;
        body.set_position(next);
        body.acceleration = Vec2::ZERO;
    }

    fn update_facing(&mut self) {
        if self.state == CharacterState::Shoot {
            let r = self.body.rotation;
            self.flip = if !(-FRAC_PI_2..=FRAC_PI_2).contains(&r) {
                Flip::Vertical
            } else {
                Flip::None
            };
            return;
        }

        if self.prev_state == CharacterState::Shoot {
            self.flip = Flip::None;
        }
        if self.body.velocity.x > 0.0 {
            self.flip = Flip::None;
        } else if self.body.velocity.x < 0.0 {
            self.flip = Flip::Horizontal;
        }
    }

    // -------------------------------------------------------------------------
    // Movement primitives shared by every brain
    // -------------------------------------------------------------------------

    pub fn move_left(&mut self) {
        self.body.acceleration.x = -self.accel;
        if matches!(self.state, CharacterState::Idle | CharacterState::Walk) {
            self.state = CharacterState::Walk;
        }
    }

    pub fn move_right(&mut self) {
        self.body.acceleration.x = self.accel;
        if matches!(self.state, CharacterState::Idle | CharacterState::Walk) {
            self.state = CharacterState::Walk;
        }
    }

    /// Leave the ground unless already airborne.
    pub fn jump(&mut self, fx: &mut Effects) -> bool {
        if self.state == CharacterState::Jump {
            return false;
        }
        self.body.velocity.y = -self.jump_strength;
        self.state = CharacterState::Jump;
        fx.sounds.push(Sound::Jump);
        true
    }

    /// Pick and advance the clip for the current state. One-shot clips that
    /// run out hand the character back to `Idle`.
    ///
    /// `aim` is the equipped gun's direction, if the character holds one.
    pub fn animate(&mut self, aim: Option<Vec2>) {
        use CharacterState::*;

        if self.animator.cycle_count % self.animator.cycles_per_frame() != 0 {
            return;
        }

        let finished = match self.state {
            Idle => {
                self.animator.cycle(Clip::Idle);
                false
            }
            Walk => {
                self.animator.cycle(Clip::Walk);
                false
            }
            Jump => self.animator.play(Clip::Jump),
            Slam => self.animator.play(Clip::Slam),
            Land => self.animator.play(Clip::Land),
            Damaged => self.animator.play(Clip::Damage),
            Shoot => {
                let done = self.animator.play(Clip::Shoot);
                if let Some(aim) = aim {
                    self.body.rotation = aim.y.atan2(aim.x);
                }
                done
            }
            FallThrough => {
                self.animator.play(Clip::Jump);
                false
            }
        };
        if finished {
            self.state = Idle;
        }

        if self.state != Shoot {
            self.body.rotation = 0.0;
        }
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        animate_characters
            .in_set(SimSet::Act)
            .after(player::update_player)
            .after(enemies::update_enemies),
    );
}

/// Advance sprite cycles after every character has moved.
pub fn animate_characters(mut q: Query<(&mut Character, Option<&Loadout>)>) {
    for (mut character, loadout) in &mut q {
        if !character.body.active {
            continue;
        }
        let aim = loadout.map(|l| l.equipped().aim);
        character.animate(aim);
    }
}
