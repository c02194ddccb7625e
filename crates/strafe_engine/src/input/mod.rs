//! Input management system
//!
//! Gameplay code never looks at keys. It asks an [`InputSource`] whether a
//! logical [`InputAction`] is pressed; the [`InputManager`] maps raw key
//! events from the windowing backend onto those actions.

use bitflags::bitflags;
use std::collections::HashMap;

/// Logical actions the character controller polls every physics tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Move along the facing direction
    MoveForward,
    /// Move against the facing direction
    MoveBack,
    /// Strafe to the left of the facing direction
    StrafeLeft,
    /// Strafe to the right of the facing direction
    StrafeRight,
    /// Jump when grounded
    Jump,
}

impl InputAction {
    /// Every action, in declaration order
    pub const ALL: [InputAction; 5] = [
        Self::MoveForward,
        Self::MoveBack,
        Self::StrafeLeft,
        Self::StrafeRight,
        Self::Jump,
    ];

    fn flag(self) -> ActionSet {
        match self {
            Self::MoveForward => ActionSet::MOVE_FORWARD,
            Self::MoveBack => ActionSet::MOVE_BACK,
            Self::StrafeLeft => ActionSet::STRAFE_LEFT,
            Self::StrafeRight => ActionSet::STRAFE_RIGHT,
            Self::Jump => ActionSet::JUMP,
        }
    }
}

bitflags! {
    /// Snapshot of pressed actions
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ActionSet: u8 {
        /// [`InputAction::MoveForward`]
        const MOVE_FORWARD = 1 << 0;
        /// [`InputAction::MoveBack`]
        const MOVE_BACK = 1 << 1;
        /// [`InputAction::StrafeLeft`]
        const STRAFE_LEFT = 1 << 2;
        /// [`InputAction::StrafeRight`]
        const STRAFE_RIGHT = 1 << 3;
        /// [`InputAction::Jump`]
        const JUMP = 1 << 4;
    }
}

impl ActionSet {
    /// Set with exactly the given actions pressed
    pub fn pressed(actions: &[InputAction]) -> Self {
        actions.iter().fold(Self::empty(), |set, action| set | action.flag())
    }

    /// Press or release one action
    pub fn set_action(&mut self, action: InputAction, pressed: bool) {
        self.set(action.flag(), pressed);
    }
}

/// Source of "is this logical action pressed" answers
pub trait InputSource {
    /// Whether `action` is currently held
    fn is_action_pressed(&self, action: InputAction) -> bool;
}

impl InputSource for ActionSet {
    fn is_action_pressed(&self, action: InputAction) -> bool {
        self.contains(action.flag())
    }
}

/// Input manager tracking key state and key-to-action bindings
pub struct InputManager {
    bindings: HashMap<KeyCode, InputAction>,
    pressed_keys: HashMap<KeyCode, bool>,
}

impl InputManager {
    /// Create an input manager with the default bindings
    ///
    /// Arrow keys and WASD move, space jumps.
    pub fn new() -> Self {
        let mut manager = Self::unbound();
        for (key, action) in [
            (KeyCode::Up, InputAction::MoveForward),
            (KeyCode::W, InputAction::MoveForward),
            (KeyCode::Down, InputAction::MoveBack),
            (KeyCode::S, InputAction::MoveBack),
            (KeyCode::Left, InputAction::StrafeLeft),
            (KeyCode::A, InputAction::StrafeLeft),
            (KeyCode::Right, InputAction::StrafeRight),
            (KeyCode::D, InputAction::StrafeRight),
            (KeyCode::Space, InputAction::Jump),
        ] {
            manager.bind(key, action);
        }
        manager
    }
    
    /// Create an input manager without any bindings
    pub fn unbound() -> Self {
        Self {
            bindings: HashMap::new(),
            pressed_keys: HashMap::new(),
        }
    }
    
    /// Bind a key to an action, replacing any previous binding for that key
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        self.bindings.insert(key, action);
    }
    
    /// Remove a key binding
    pub fn unbind(&mut self, key: KeyCode) {
        self.bindings.remove(&key);
    }
    
    /// Handle key input
    pub fn handle_key_input(&mut self, key: KeyCode, pressed: bool) {
        self.pressed_keys.insert(key, pressed);
    }
    
    /// Release every key (focus loss, scene reset)
    pub fn release_all(&mut self) {
        self.pressed_keys.clear();
    }
    
    /// Whether a raw key is held
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.get(&key).copied().unwrap_or(false)
    }
    
    /// Snapshot of every bound action currently held
    pub fn snapshot(&self) -> ActionSet {
        let mut set = ActionSet::empty();
        for action in InputAction::ALL {
            set.set_action(action, self.is_action_pressed(action));
        }
        set
    }
}

impl InputSource for InputManager {
    fn is_action_pressed(&self, action: InputAction) -> bool {
        self.bindings
            .iter()
            .any(|(key, bound)| *bound == action && self.is_key_pressed(*key))
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// W key
    W,
    /// A key
    A,
    /// S key
    S,
    /// D key
    D,
    /// P key
    P,
    /// R key
    R,
    /// Space key
    Space,
    /// Escape key
    Escape,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
}
