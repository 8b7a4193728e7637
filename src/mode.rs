//! Operating mode state machine
//!
//! The requested [`OperatingMode`] is level-triggered: it is sampled every
//! cycle. Power-stage start/stop only fire on the edges, which the machine
//! finds by comparing the request against its own [`StageState`].

/// User-requested operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    #[default]
    Idle,
    Power,
}

/// Shadow of the physical power stage activation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StageState {
    #[default]
    Disabled,
    Enabled,
}

/// Power-stage command produced by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    None,
    Start,
    Stop,
}

/// Transition table
///
/// | stage    | desired | action | next     |
/// |----------|---------|--------|----------|
/// | Disabled | Idle    | None   | Disabled |
/// | Disabled | Power   | Start  | Enabled  |
/// | Enabled  | Power   | None   | Enabled  |
/// | Enabled  | Idle    | Stop   | Disabled |
pub const fn transition(stage: StageState, desired: OperatingMode) -> (StageState, Action) {
    match (stage, desired) {
        (StageState::Disabled, OperatingMode::Idle) => (StageState::Disabled, Action::None),
        (StageState::Disabled, OperatingMode::Power) => (StageState::Enabled, Action::Start),
        (StageState::Enabled, OperatingMode::Power) => (StageState::Enabled, Action::None),
        (StageState::Enabled, OperatingMode::Idle) => (StageState::Disabled, Action::Stop),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeMachine {
    stage: StageState,
}

impl ModeMachine {
    pub const fn new() -> Self {
        Self {
            stage: StageState::Disabled,
        }
    }

    pub fn stage(&self) -> StageState {
        self.stage
    }

    pub fn is_enabled(&self) -> bool {
        self.stage == StageState::Enabled
    }

    /// Sample the requested mode and return the edge action, if any
    pub fn step(&mut self, desired: OperatingMode) -> Action {
        let (next, action) = transition(self.stage, desired);
        self.stage = next;
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let machine = ModeMachine::new();
        assert_eq!(machine.stage(), StageState::Disabled);
        assert!(!machine.is_enabled());
        assert_eq!(OperatingMode::default(), OperatingMode::Idle);
    }

    #[test]
    fn test_edges_fire_once() {
        use OperatingMode::*;

        let mut machine = ModeMachine::new();
        let sequence = [Idle, Power, Power, Idle, Idle, Power];
        let actions: [Action; 6] = sequence.map(|mode| machine.step(mode));

        assert_eq!(
            actions,
            [
                Action::None,
                Action::Start,
                Action::None,
                Action::Stop,
                Action::None,
                Action::Start,
            ]
        );
        assert!(machine.is_enabled());
    }

    #[test]
    fn test_repeated_mode_is_quiet() {
        let mut machine = ModeMachine::new();
        assert_eq!(machine.step(OperatingMode::Power), Action::Start);
        for _ in 0..100 {
            assert_eq!(machine.step(OperatingMode::Power), Action::None);
        }
        assert_eq!(machine.step(OperatingMode::Idle), Action::Stop);
        for _ in 0..100 {
            assert_eq!(machine.step(OperatingMode::Idle), Action::None);
        }
    }
}
