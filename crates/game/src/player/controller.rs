use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use crate::geometry::direction;
use crate::map::WallMap;

use super::{Buttons, Player, PlayerConfig, TickInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Idle,
    Moved,
    /// The tentative position touched a wall and was discarded whole.
    /// Players stick on corners instead of sliding along walls.
    Blocked,
}

pub struct PlayerController {
    config: PlayerConfig,
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(PlayerConfig::default())
    }
}

impl PlayerController {
    pub fn new(config: PlayerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn process(&self, player: &mut Player, input: &TickInput, map: &WallMap, dt: f32) -> MoveOutcome {
        self.apply_look(player, input.mouse_delta);

        let outcome = self.apply_horizontal(player, input.buttons, map, dt);
        self.apply_vertical(player, input.buttons.contains(Buttons::JUMP), dt);

        outcome
    }

    fn apply_look(&self, player: &mut Player, mouse_delta: Vec2) {
        let rotation = player.rotation() - mouse_delta.x * self.config.look_sensitivity;
        player.set_rotation(rotation);
    }

    fn apply_horizontal(&self, player: &mut Player, buttons: Buttons, map: &WallMap, dt: f32) -> MoveOutcome {
        let move_dir = self.move_direction(player.rotation(), buttons);
        if move_dir == Vec2::ZERO {
            return MoveOutcome::Idle;
        }

        let tentative = player.position + move_dir * self.config.move_speed * dt;
        if map.collides(tentative, player.radius) {
            return MoveOutcome::Blocked;
        }

        player.position = tentative;
        MoveOutcome::Moved
    }

    fn move_direction(&self, rotation: f32, buttons: Buttons) -> Vec2 {
        let mut dir = Vec2::ZERO;

        if buttons.contains(Buttons::FORWARD) {
            dir += direction(rotation);
        }
        if buttons.contains(Buttons::BACK) {
            dir -= direction(rotation);
        }
        if buttons.contains(Buttons::STRAFE_LEFT) {
            dir += direction(rotation - FRAC_PI_2);
        }
        if buttons.contains(Buttons::STRAFE_RIGHT) {
            dir += direction(rotation + FRAC_PI_2);
        }

        if dir.length_squared() < 1e-6 {
            return Vec2::ZERO;
        }
        dir.normalize()
    }

    fn apply_vertical(&self, player: &mut Player, wants_jump: bool, dt: f32) {
        if wants_jump && player.on_ground {
            player.velocity_z = self.config.jump_speed;
            player.on_ground = false;
        }

        if player.on_ground {
            return;
        }

        player.velocity_z -= self.config.gravity * dt;
        player.z += player.velocity_z * dt;

        if player.z <= 0.0 {
            player.z = 0.0;
            player.velocity_z = 0.0;
            player.on_ground = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;
    use crate::map::Wall;

    const DT: f32 = 1.0 / 60.0;

    fn map_with(walls: Vec<Wall>) -> WallMap {
        WallMap::new(walls).unwrap()
    }

    fn far_wall() -> WallMap {
        map_with(vec![Wall::new(-50.0, -50.0, -49.0, -50.0)])
    }

    #[test]
    fn forward_moves_along_heading() {
        let controller = PlayerController::default();
        let mut player = Player::new("p1", Vec2::new(5.0, 5.0));

        let outcome = controller.process(&mut player, &TickInput::with_buttons(Buttons::FORWARD), &far_wall(), DT);

        assert_eq!(outcome, MoveOutcome::Moved);
        assert!((player.position.x - (5.0 + 5.0 * DT)).abs() < 1e-5);
        assert!((player.position.y - 5.0).abs() < 1e-5);
    }

    #[test]
    fn opposite_buttons_cancel() {
        let controller = PlayerController::default();
        let mut player = Player::new("p1", Vec2::new(5.0, 5.0));
        let input = TickInput::with_buttons(Buttons::FORWARD | Buttons::BACK);

        assert_eq!(controller.process(&mut player, &input, &far_wall(), DT), MoveOutcome::Idle);
        assert_eq!(player.position, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn diagonal_movement_is_normalized() {
        let controller = PlayerController::default();
        let mut player = Player::new("p1", Vec2::new(5.0, 5.0));
        let input = TickInput::with_buttons(Buttons::FORWARD | Buttons::STRAFE_RIGHT);

        controller.process(&mut player, &input, &far_wall(), DT);

        let travelled = (player.position - Vec2::new(5.0, 5.0)).length();
        assert!((travelled - 5.0 * DT).abs() < 1e-5);
        assert!(player.position.y > 5.0);
    }

    #[test]
    fn move_into_wall_keeps_old_position() {
        let controller = PlayerController::default();
        let map = map_with(vec![Wall::new(8.0, 5.0, 8.0, 8.0)]);
        let mut player = Player::new("p1", Vec2::new(7.45, 6.0));
        let before = player.position;

        let outcome = controller.process(&mut player, &TickInput::with_buttons(Buttons::FORWARD), &map, DT);

        assert_eq!(outcome, MoveOutcome::Blocked);
        assert_eq!(player.position, before);
    }

    #[test]
    fn blocked_for_every_wall_orientation() {
        let controller = PlayerController::default();
        let walls = [
            Wall::new(6.0, 0.0, 6.0, 10.0),
            Wall::new(0.0, 6.0, 10.0, 6.0),
            Wall::new(4.0, 0.0, 4.0, 10.0),
            Wall::new(5.6, 5.6, 9.0, 9.0),
        ];

        for wall in walls {
            let map = map_with(vec![wall]);
            for heading in [0.0, PI / 2.0, PI, 3.0 * PI / 2.0, PI / 4.0] {
                let mut player = Player::new("p1", Vec2::new(5.0, 5.0));
                player.set_rotation(heading);
                let input = TickInput::with_buttons(Buttons::FORWARD);
                let tentative = player.position + direction(player.rotation()) * 5.0 * DT;
                let before = player.position;

                controller.process(&mut player, &input, &map, DT);

                if map.collides(tentative, player.radius) {
                    assert_eq!(player.position, before);
                } else {
                    assert_ne!(player.position, before);
                }
            }
        }
    }

    #[test]
    fn mouse_turns_subtractively_and_wraps() {
        let controller = PlayerController::default();
        let mut player = Player::new("p1", Vec2::new(5.0, 5.0));
        let input = TickInput {
            mouse_delta: Vec2::new(100.0, 0.0),
            ..TickInput::default()
        };

        controller.process(&mut player, &input, &far_wall(), DT);

        let expected = 2.0 * PI - 0.2;
        assert!((player.rotation() - expected).abs() < 1e-4);
    }

    #[test]
    fn jump_rises_then_lands() {
        let controller = PlayerController::default();
        let mut player = Player::new("p1", Vec2::new(5.0, 5.0));
        let map = far_wall();

        controller.process(&mut player, &TickInput::with_buttons(Buttons::JUMP), &map, DT);
        assert!(!player.on_ground);
        assert!(player.z > 0.0);

        let mut ticks = 0;
        while !player.on_ground && ticks < 600 {
            controller.process(&mut player, &TickInput::idle(), &map, DT);
            ticks += 1;
        }

        assert!(player.on_ground);
        assert_eq!(player.z, 0.0);
        assert_eq!(player.velocity_z, 0.0);
        // 2 * 8 / 20 = 0.8s of airtime
        assert!((40..=55).contains(&ticks));
    }
}
