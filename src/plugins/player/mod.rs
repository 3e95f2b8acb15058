//! Player plugin.
//!
//! Pipeline:
//! - Update: `sample_input` copies Bevy's button state into [`InputSnapshot`]
//!   (skipped when the host feeds snapshots itself, e.g. in headless tests)
//! - FixedUpdate / Act: `update_player` diffs the snapshot against last tick's,
//!   picks a gun, runs the character tick with a player brain, clamps to the
//!   level and re-aims the gun at the pointer

use bevy::input::mouse::AccumulatedMouseScroll;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::common::body::Body;
use crate::common::input::{Control, InputFrame, InputSnapshot};
use crate::common::tunables::Tunables;
use crate::plugins::SimSet;
use crate::plugins::camera::Viewport;
use crate::plugins::character::{Animator, Brain, Character, CharacterState, Effects};
use crate::plugins::enemies;
use crate::plugins::presentation::{Sound, SoundCue};
use crate::plugins::projectiles::components::Faction;
use crate::plugins::projectiles::gun::{Gun, GunName};
use crate::plugins::projectiles::messages::SpawnBullet;
use crate::plugins::world::LevelEntity;

#[derive(Component)]
pub struct Player;

/// Edge-detection memory: the snapshot consumed by the previous tick.
#[derive(Component, Debug, Default)]
pub struct PlayerControl {
    pub previous: InputSnapshot,
}

/// Guns carried by a character plus the rounds left for each one.
#[derive(Component, Debug, Clone)]
pub struct Loadout {
    guns: Vec<Gun>,
    equipped: usize,
    ammo: HashMap<GunName, i32>,
}

impl Loadout {
    pub fn new(guns: Vec<Gun>) -> Self {
        assert!(!guns.is_empty(), "a loadout needs at least one gun");
        Self {
            guns,
            equipped: 0,
            ammo: HashMap::default(),
        }
    }

    /// Pistol, shotgun and rocket launcher, stocked.
    pub fn player(t: &Tunables) -> Self {
        let mut loadout = Self::new(vec![Gun::pistol(t), Gun::shotgun(t), Gun::rocket(t)]);
        loadout.set_ammo(GunName::Pistol, t.pistol_ammo);
        loadout.restock(t.starting_ammo);
        loadout
    }

    /// One gun, no magazine bookkeeping. Used by shooters.
    pub fn single(gun: Gun) -> Self {
        Self::new(vec![gun])
    }

    #[inline]
    pub fn equipped(&self) -> &Gun {
        &self.guns[self.equipped]
    }

    #[inline]
    pub fn equipped_mut(&mut self) -> &mut Gun {
        &mut self.guns[self.equipped]
    }

    #[inline]
    pub fn equipped_index(&self) -> usize {
        self.equipped
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.guns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.guns.is_empty()
    }

    pub fn select(&mut self, slot: usize) {
        if slot < self.guns.len() {
            self.equipped = slot;
        }
    }

    /// Step through the guns, wrapping at both ends.
    pub fn cycle(&mut self, step: i32) {
        let n = self.guns.len() as i32;
        self.equipped = (self.equipped as i32 + step).rem_euclid(n) as usize;
    }

    /// Rounds left for `name`.
    ///
    /// # Panics
    /// If `name` was never registered; every carried gun must have an entry.
    pub fn ammo(&self, name: GunName) -> i32 {
        match self.ammo.get(&name) {
            Some(rounds) => *rounds,
            None => panic!("no ammo registered for {name:?}"),
        }
    }

    /// # Panics
    /// If `name` was never registered.
    pub fn ammo_mut(&mut self, name: GunName) -> &mut i32 {
        match self.ammo.get_mut(&name) {
            Some(rounds) => rounds,
            None => panic!("no ammo registered for {name:?}"),
        }
    }

    pub fn set_ammo(&mut self, name: GunName, rounds: i32) {
        self.ammo.insert(name, rounds);
    }

    /// Back to the first gun with fresh shotgun and rocket rounds.
    pub fn restock(&mut self, rounds: i32) {
        self.equipped = 0;
        self.set_ammo(GunName::Shotgun, rounds);
        self.set_ammo(GunName::Rocket, rounds);
        for gun in &mut self.guns {
            gun.fire_timer = 0;
            gun.active = true;
        }
    }

    /// Right click steps forward; otherwise the wheel steps against its
    /// direction; otherwise a number key picks a slot.
    pub fn switch(&mut self, input: &InputFrame<'_>) {
        if input.pressed(Control::CycleGun) {
            self.cycle(1);
            return;
        }
        let scroll = input.scroll_delta();
        if scroll != 0.0 {
            self.cycle(if scroll > 0.0 { -1 } else { 1 });
            return;
        }
        for slot in 0..self.guns.len().min(9) {
            if input.pressed(Control::Slot(slot as u8)) {
                self.select(slot);
            }
        }
    }
}

/// Spawn-ready components for a player at `position`.
pub fn player_bundle(position: IVec2, t: &Tunables) -> impl Bundle {
    let body = Body::new(position, IVec2::splat(t.tile_size));
    (
        Name::new("Player"),
        Player,
        PlayerControl::default(),
        Character::new(body, t.player_health, Animator::player()),
        Loadout::player(t),
        LevelEntity,
    )
}

pub fn plugin(app: &mut App) {
    app.init_resource::<InputSnapshot>()
        .add_systems(Update, sample_input)
        .add_systems(
            FixedUpdate,
            update_player
                .in_set(SimSet::Act)
                .after(enemies::update_enemies),
        );
}

/// Copy device state into the snapshot. Devices that aren't installed leave the
/// snapshot untouched.
pub fn sample_input(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    scroll: Option<Res<AccumulatedMouseScroll>>,
    windows: Query<&Window>,
    viewport: Res<Viewport>,
    mut snapshot: ResMut<InputSnapshot>,
) {
    const BINDINGS: [(KeyCode, Control); 5] = [
        (KeyCode::KeyA, Control::Left),
        (KeyCode::KeyD, Control::Right),
        (KeyCode::KeyW, Control::Jump),
        (KeyCode::KeyS, Control::Down),
        (KeyCode::KeyG, Control::GodMode),
    ];
    const SLOTS: [KeyCode; 9] = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
        KeyCode::Digit6,
        KeyCode::Digit7,
        KeyCode::Digit8,
        KeyCode::Digit9,
    ];

    let (Some(keys), Some(buttons)) = (keys, buttons) else {
        return;
    };

    snapshot.held.clear();
    for (key, control) in BINDINGS {
        if keys.pressed(key) {
            snapshot.held.insert(control);
        }
    }
    for (slot, key) in SLOTS.into_iter().enumerate() {
        if keys.pressed(key) {
            snapshot.held.insert(Control::Slot(slot as u8));
        }
    }
    if buttons.pressed(MouseButton::Left) {
        snapshot.held.insert(Control::Shoot);
    }
    if buttons.pressed(MouseButton::Right) {
        snapshot.held.insert(Control::CycleGun);
    }

    if let Some(scroll) = scroll {
        snapshot.scroll += scroll.delta.y;
    }

    // Window pixels to logical viewport pixels.
    if let Ok(window) = windows.single()
        && let Some(cursor) = window.cursor_position()
    {
        let window_size = Vec2::new(window.width(), window.height()).max(Vec2::ONE);
        snapshot.pointer = cursor * viewport.size().as_vec2() / window_size;
    }
}

pub fn update_player(
    tunables: Res<Tunables>,
    viewport: Res<Viewport>,
    snapshot: Res<InputSnapshot>,
    mut spawns: MessageWriter<SpawnBullet>,
    mut sounds: MessageWriter<SoundCue>,
    mut q: Query<(&mut Character, &mut PlayerControl, &mut Loadout), With<Player>>,
) {
    let Ok((mut character, mut control, mut loadout)) = q.single_mut() else {
        return;
    };
    let input = InputFrame::new(&snapshot, &control.previous);
    let mut fx = Effects::default();

    if input.pressed(Control::GodMode) {
        character.god_mode = !character.god_mode;
        info!(god_mode = character.god_mode, "god mode toggled");
    }

    if character.body.active {
        loadout.switch(&input);
    }

    character.tick(
        tunables.frame_ms(),
        Brain::Player {
            input,
            loadout: &mut loadout,
        },
        &mut fx,
    );

    if character.body.active {
        keep_in_bounds(&mut character, viewport.level_bounds, &tunables);

        let center = character.body.center();
        let gun = loadout.equipped_mut();
        gun.position = center;
        gun.aim_at(viewport.to_world(snapshot.pointer));
        gun.tick();
    }

    control.previous = snapshot.clone();

    for bullet in fx.bullets {
        spawns.write(SpawnBullet {
            bullet,
            faction: Faction::Player,
        });
    }
    for sound in fx.sounds {
        sounds.write(SoundCue(sound));
    }
}

/// Player movement decisions for one tick.
pub fn steer(c: &mut Character, input: InputFrame<'_>, loadout: &mut Loadout, fx: &mut Effects) {
    if input.down(Control::Left) {
        if c.god_mode {
            c.body.velocity.x = -c.speed;
        } else {
            c.move_left();
        }
    }
    if input.down(Control::Right) {
        if c.god_mode {
            c.body.velocity.x = c.speed;
        } else {
            c.move_right();
        }
    }

    if input.down(Control::Jump) {
        if c.god_mode {
            c.body.velocity.y = -c.speed;
        } else if input.pressed(Control::Jump) {
            jump(c, fx);
        }
    }

    if input.pressed(Control::Shoot) {
        shoot(c, loadout, fx);
    }

    if input.down(Control::Down) {
        if c.god_mode {
            c.body.velocity.y = c.speed;
        } else if input.pressed(Control::Down) {
            slam(c, fx);
        } else if c.state != CharacterState::Slam {
            c.state = CharacterState::FallThrough;
        }
    } else if c.state == CharacterState::FallThrough && !c.body.colliding {
        c.state = CharacterState::Idle;
    }
}

/// Players can't jump out of a slam either.
fn jump(c: &mut Character, fx: &mut Effects) {
    if matches!(c.state, CharacterState::Jump | CharacterState::Slam) {
        return;
    }
    c.body.velocity.y = -c.jump_strength;
    c.state = CharacterState::Jump;
    fx.sounds.push(Sound::Jump);
}

fn slam(c: &mut Character, fx: &mut Effects) {
    if c.state != CharacterState::Jump {
        return;
    }
    c.body.velocity.y = c.slam_speed;
    c.state = CharacterState::Slam;
    fx.sounds.push(Sound::Slam);
}

/// Fire the equipped gun if it's off cooldown and loaded. God mode ignores ammo.
fn shoot(c: &mut Character, loadout: &mut Loadout, fx: &mut Effects) {
    let name = loadout.equipped().name;
    if !c.god_mode && loadout.ammo(name) <= 0 {
        return;
    }
    if !loadout.equipped().ready() {
        return;
    }

    if !c.god_mode && name != GunName::Pistol {
        *loadout.ammo_mut(name) -= 1;
    }
    fx.sounds.push(match name {
        GunName::Rocket => Sound::RocketShot,
        _ => Sound::Shot,
    });

    let gun = loadout.equipped_mut();
    fx.bullets.extend(gun.fire());
    c.state = CharacterState::Shoot;

    let recoil = gun.recoil();
    if recoil != Vec2::ZERO {
        c.body.velocity = recoil;
    }
}

/// Keep the player inside the level horizontally and under the ceiling. Below
/// the kill plane the player dies on its next tick.
pub fn keep_in_bounds(c: &mut Character, level: IRect, t: &Tunables) {
    if !level.is_empty() {
        let min_x = level.min.x as f32;
        let max_x = (level.max.x - c.body.width()) as f32;
        if c.body.x() < min_x {
            c.body.set_x(min_x);
        } else if c.body.x() > max_x {
            c.body.set_x(max_x);
        }
    }

    if c.body.y() < t.ceiling {
        c.body.set_y(t.ceiling);
        c.body.velocity.y = 0.0;
    }
    if c.body.y() > t.kill_plane {
        c.health = 0;
    }
}

#[cfg(test)]
mod tests;
