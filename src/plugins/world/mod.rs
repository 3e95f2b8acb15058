//! World plugin: level lifecycle, static level actors and the per-kind screen indexes.
//!
//! ```text
//! PreUpdate   load_level ─▶ reset_level
//! FixedUpdate Act:  fall_collectibles
//!             Cull: end_frame (enemies, platforms, collectibles) ─▶ place_player ─▶ check_outcome
//! ```
//!
//! Culling writes `body.active` directly: off-screen actors neither tick nor collide.

pub mod components;
pub mod level;
pub mod spatial;

use bevy::ecs::component::Mutable;
use bevy::prelude::*;

use crate::common::body::{Body, HasBody, xywh};
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::SimSet;
use crate::plugins::camera::{self, Viewport};
use crate::plugins::character::Character;
use crate::plugins::enemies::{self, Enemy, EnemyKind};
use crate::plugins::player::{self, Loadout, Player};
use crate::plugins::projectiles::components::Bullet;

pub use components::{
    Collectible, CollectibleKind, LevelEntity, Platform, PlatformKind, Segment, Surface, Tier,
    Trigger,
};
pub use level::{
    LevelError, LevelLayout, Placement, Tile, TriggerSpec, merge_platforms, tutorial_triggers,
};
pub use spatial::{ScreenIndex, screen_activity};

/// Replace the current level.
#[derive(Message, Clone, Debug)]
pub struct LoadLevel(pub LevelLayout);

/// Put every actor of the current level back at its spawn.
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct ResetLevel;

pub fn plugin(app: &mut App) {
    let viewport = app
        .world()
        .get_resource::<Tunables>()
        .cloned()
        .unwrap_or_default()
        .viewport;

    app.add_message::<LoadLevel>()
        .add_message::<ResetLevel>()
        .insert_resource(ScreenIndex::<Enemy>::new(viewport))
        .insert_resource(ScreenIndex::<Platform>::new(viewport))
        .insert_resource(ScreenIndex::<Collectible>::new(viewport))
        .add_systems(PreUpdate, (load_level, reset_level).chain())
        .add_systems(FixedUpdate, fall_collectibles.in_set(SimSet::Act))
        .add_systems(
            FixedUpdate,
            (
                end_frame::<Enemy, Character>,
                end_frame::<Platform, Platform>,
                end_frame::<Collectible, Collectible>,
                place_player,
                check_outcome,
            )
                .chain()
                .in_set(SimSet::Cull)
                .after(camera::follow_player),
        );
}

/// Apply the camera activity test to one body.
fn cull(camera: IRect, body: &mut Body) {
    if let Some(active) = screen_activity(camera, body.bounds()) {
        body.active = active;
    }
}

/// Frame the camera on a player standing at `body`.
fn frame_player(viewport: &mut Viewport, body: &Body) {
    let focus = Vec2::new(body.center().x, (viewport.size().y / 2) as f32);
    viewport.follow(focus);
}

#[allow(clippy::too_many_arguments)]
pub fn load_level(
    mut commands: Commands,
    mut requests: MessageReader<LoadLevel>,
    tunables: Res<Tunables>,
    mut viewport: ResMut<Viewport>,
    mut next_state: ResMut<NextState<GameState>>,
    existing: Query<Entity, With<LevelEntity>>,
    mut enemy_index: ResMut<ScreenIndex<Enemy>>,
    mut platform_index: ResMut<ScreenIndex<Platform>>,
    mut collectible_index: ResMut<ScreenIndex<Collectible>>,
) {
    let Some(LoadLevel(layout)) = requests.read().last() else {
        return;
    };
    let t = &*tunables;

    let placements = match layout.placements(t) {
        Ok(p) => p,
        Err(err) => {
            error!(%err, "rejected level; keeping the current one");
            return;
        }
    };

    for e in &existing {
        commands.entity(e).despawn();
    }
    enemy_index.clear();
    platform_index.clear();
    collectible_index.clear();

    let spawn = placements
        .iter()
        .rev()
        .find_map(|p| match p {
            Placement::Player(at) => Some(*at),
            _ => None,
        })
        .unwrap_or(level::DEFAULT_SPAWN);

    let player_body = Body::new(spawn, IVec2::splat(t.tile_size));
    viewport.level_bounds = xywh(0, 0, layout.width(t), viewport.size().y);
    frame_player(&mut viewport, &player_body);
    let camera = viewport.bounds();

    commands.spawn(player::player_bundle(spawn, t));

    let mut platforms = Vec::new();
    let (mut enemies, mut collectibles) = (0, 0);
    for placement in &placements {
        match *placement {
            Placement::Player(_) => {}
            Placement::Enemy(kind, at) => {
                let mut e = match kind {
                    EnemyKind::Charger => commands.spawn(enemies::charger_bundle(at, t)),
                    EnemyKind::Shooter => commands.spawn(enemies::shooter_bundle(at, t)),
                };
                let mut body = Body::new(at, IVec2::splat(t.tile_size));
                cull(camera, &mut body);
                if !body.active {
                    e.entry::<Character>()
                        .and_modify(|mut c| c.body.active = false);
                }
                enemy_index.insert(e.id(), body.active);
                enemies += 1;
            }
            Placement::Collectible(kind, at) => {
                let mut c = Collectible::new(at, kind, t);
                cull(camera, &mut c.body);
                let active = c.body.active;
                let id = commands.spawn((Name::new("Collectible"), c, LevelEntity)).id();
                collectible_index.insert(id, active);
                collectibles += 1;
            }
            Placement::Platform(kind, at) => platforms.push(Platform::new(at, kind, t)),
        }
    }

    merge_platforms(&mut platforms);
    let platform_count = platforms.len();
    for mut p in platforms {
        cull(camera, &mut p.body);
        let active = p.body.active;
        let id = commands.spawn((Name::new("Platform"), p, LevelEntity)).id();
        platform_index.insert(id, active);
    }

    for spec in &layout.triggers {
        commands.spawn((Name::new("Trigger"), spec.build(), LevelEntity));
    }

    info!(
        screens = layout.screens,
        platforms = platform_count,
        enemies,
        collectibles,
        triggers = layout.triggers.len(),
        "level loaded"
    );
    next_state.set(GameState::InGame);
}

#[allow(clippy::too_many_arguments)]
pub fn reset_level(
    mut commands: Commands,
    mut requests: MessageReader<ResetLevel>,
    tunables: Res<Tunables>,
    mut viewport: ResMut<Viewport>,
    mut next_state: ResMut<NextState<GameState>>,
    mut players: Query<(&mut Character, &mut Loadout), With<Player>>,
    mut enemies: Query<(&mut Character, &mut Enemy, Option<&mut Loadout>), Without<Player>>,
    mut platforms: Query<&mut Platform>,
    mut collectibles: Query<&mut Collectible>,
    mut triggers: Query<&mut Trigger>,
    bullets: Query<Entity, With<Bullet>>,
    mut enemy_index: ResMut<ScreenIndex<Enemy>>,
    mut platform_index: ResMut<ScreenIndex<Platform>>,
    mut collectible_index: ResMut<ScreenIndex<Collectible>>,
) {
    if requests.read().count() == 0 {
        return;
    }

    if let Ok((mut c, mut loadout)) = players.single_mut() {
        c.reset();
        loadout.restock(tunables.starting_ammo);
        frame_player(&mut viewport, &c.body);
    } else {
        warn!("level reset without a player");
    }
    let camera = viewport.bounds();

    for (mut c, mut enemy, loadout) in &mut enemies {
        c.reset();
        cull(camera, &mut c.body);
        enemy.in_sight = true;
        if let Some(mut loadout) = loadout {
            loadout.equipped_mut().fire_timer = 0;
        }
    }
    for mut p in &mut platforms {
        p.body.reset();
        cull(camera, &mut p.body);
    }
    for mut c in &mut collectibles {
        c.reset();
        cull(camera, &mut c.body);
    }
    for mut t in &mut triggers {
        t.body.colliding = false;
    }
    for e in &bullets {
        commands.entity(e).despawn();
    }

    enemy_index.resort(|e| enemies.get(e).is_ok_and(|(c, ..)| c.body.active));
    platform_index.resort(|e| platforms.get(e).is_ok_and(|p| p.body.active));
    collectible_index.resort(|e| collectibles.get(e).is_ok_and(|c| c.body.active));

    info!("level reset");
    next_state.set(GameState::InGame);
}

pub fn fall_collectibles(tunables: Res<Tunables>, mut q: Query<&mut Collectible>) {
    for mut c in &mut q {
        c.tick(&tunables);
    }
}

/// End-of-frame pass for the index of `M`-tagged actors whose body lives in `B`.
pub fn end_frame<M, B>(
    viewport: Res<Viewport>,
    mut index: ResMut<ScreenIndex<M>>,
    mut bodies: Query<&mut B, (With<M>, Without<Player>)>,
) where
    M: Component,
    B: Component<Mutability = Mutable> + HasBody,
{
    let camera = viewport.bounds();
    for &e in index.all() {
        if let Ok(mut b) = bodies.get_mut(e) {
            cull(camera, b.body_mut());
        }
    }

    index.reconcile(|e| bodies.get(e).is_ok_and(|b| b.body().active));
    index.rebuild_quadrants(|e| {
        bodies
            .get(e)
            .ok()
            .map(|b| viewport.to_local(b.body().position()))
    });
}

/// The player isn't culled; it is bucketed with the enemies by position alone.
pub fn place_player(
    viewport: Res<Viewport>,
    mut index: ResMut<ScreenIndex<Enemy>>,
    q: Query<(Entity, &Character), With<Player>>,
) {
    let Ok((e, c)) = q.single() else {
        return;
    };
    if c.body.active {
        index.place(e, viewport.to_local(c.body.position()));
    }
}

/// Clearing the stage beats dying on the same tick.
pub fn check_outcome(
    player: Query<&Character, With<Player>>,
    collectibles: Query<&Collectible>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let cleared = collectibles
        .iter()
        .any(|c| c.collected && c.kind == CollectibleKind::ClearDoor);
    if cleared {
        info!("stage clear");
        next_state.set(GameState::StageClear);
        return;
    }

    if let Ok(c) = player.single()
        && !c.body.active
    {
        info!("game over");
        next_state.set(GameState::GameOver);
    }
}
