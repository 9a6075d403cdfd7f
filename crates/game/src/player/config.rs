#[derive(Debug, Clone)]
pub struct PlayerConfig {
    pub move_speed: f32,
    pub jump_speed: f32,
    pub gravity: f32,

    /// Radians of turn per mouse count.
    pub look_sensitivity: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            jump_speed: 8.0,
            gravity: 20.0,

            look_sensitivity: 0.002,
        }
    }
}

impl PlayerConfig {
    pub fn with_look_sensitivity(mut self, look_sensitivity: f32) -> Self {
        self.look_sensitivity = look_sensitivity;
        self
    }
}
