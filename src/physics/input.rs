//! Control plan read by the predictor.

/// One held control. `Forward` is relative to the agent's yaw.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Control {
    Forward,
    Back,
    Left,
    Right,
    Jump,
    Sprint,
    Sneak,
}

impl Control {
    pub(crate) const COUNT: usize = 7;

    const fn index(self) -> usize {
        match self {
            Control::Forward => 0,
            Control::Back => 1,
            Control::Left => 2,
            Control::Right => 3,
            Control::Jump => 4,
            Control::Sprint => 5,
            Control::Sneak => 6,
        }
    }
}

/// One tick's worth of held controls plus the yaw the agent steers toward.
/// The executor rewrites this buffer every tick; the predictor only reads it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputPlan {
    held: [bool; Control::COUNT],
    pub target_yaw: f64,
}

impl InputPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self, c: Control) -> bool {
        self.held[c.index()]
    }

    pub fn hold(&mut self, c: Control) {
        self.held[c.index()] = true;
    }

    pub fn release(&mut self, c: Control) {
        self.held[c.index()] = false;
    }

    pub fn set(&mut self, c: Control, held: bool) {
        self.held[c.index()] = held;
    }

    /// Drop all held controls, keep the yaw.
    pub fn release_all(&mut self) {
        self.held = [false; Control::COUNT];
    }

    /// Net forward input (+1 forward, -1 back, 0 both or neither).
    pub fn forward_amount(&self) -> f64 {
        (self.is_held(Control::Forward) as i32 - self.is_held(Control::Back) as i32) as f64
    }

    /// Net strafe input (+1 left, -1 right).
    pub fn strafe_amount(&self) -> f64 {
        (self.is_held(Control::Left) as i32 - self.is_held(Control::Right) as i32) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposing_inputs_cancel() {
        let mut plan = InputPlan::new();
        plan.hold(Control::Forward);
        plan.hold(Control::Back);
        assert_eq!(plan.forward_amount(), 0.0);
        plan.release(Control::Back);
        assert_eq!(plan.forward_amount(), 1.0);
    }

    #[test]
    fn release_all_keeps_yaw() {
        let mut plan = InputPlan::new();
        plan.target_yaw = 90.0;
        plan.hold(Control::Sprint);
        plan.release_all();
        assert!(!plan.is_held(Control::Sprint));
        assert_eq!(plan.target_yaw, 90.0);
    }
}
