//! Combat domain: the shared entity state machine.

/// Behavioral state of any combatant. Exactly one is current at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntityState {
    #[default]
    Idle,
    Patrol,
    Chase,
    Attack,
    Hurt,
    Dead,
}

impl EntityState {
    /// States in which the entity is actively pursuing a target
    pub fn is_pursuit(self) -> bool {
        matches!(self, EntityState::Chase | EntityState::Attack)
    }
}

/// Enter/exit callbacks layered on top of the transition contract.
pub trait StateHooks {
    fn on_state_exit(&mut self, _state: EntityState) {}
    fn on_state_enter(&mut self, _state: EntityState) {}
}

/// Hooks that do nothing, for owners without layered behavior.
pub struct NoHooks;

impl StateHooks for NoHooks {}

#[derive(Debug, Clone, Default)]
pub struct StateMachine {
    current: EntityState,
    previous: EntityState,
    time_in_state: f32,
}

impl StateMachine {
    pub fn new(initial: EntityState) -> Self {
        Self {
            current: initial,
            previous: initial,
            time_in_state: 0.0,
        }
    }

    pub fn current(&self) -> EntityState {
        self.current
    }

    pub fn previous(&self) -> EntityState {
        self.previous
    }

    pub fn time_in_state(&self) -> f32 {
        self.time_in_state
    }

    pub fn is(&self, state: EntityState) -> bool {
        self.current == state
    }

    pub fn is_dead(&self) -> bool {
        self.current == EntityState::Dead
    }

    /// Move to `next`, running exit then enter hooks.
    ///
    /// No-op when `next` is already current or the machine is `Dead`.
    /// Returns whether a transition happened.
    pub fn change_state<H: StateHooks + ?Sized>(&mut self, next: EntityState, hooks: &mut H) -> bool {
        if next == self.current || self.current == EntityState::Dead {
            return false;
        }
        let leaving = self.current;
        hooks.on_state_exit(leaving);
        self.previous = leaving;
        self.current = next;
        self.time_in_state = 0.0;
        hooks.on_state_enter(next);
        true
    }

    pub fn tick(&mut self, dt: f32) {
        self.time_in_state += dt.max(0.0);
    }
}
