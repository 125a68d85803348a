//! Per-frame keyboard and mouse state.
//!
//! The platform writes raw "is it down right now" samples at any time during
//! a frame. Once per frame [`InputState::tick`] turns those samples into
//! edge-triggered [`HwButton`] state:
//!
//! - `pressed` is true for exactly one frame at the start of a hold
//! - `held` is true for every frame of the hold, including the pressed frame
//! - `released` is true for exactly one frame after the hold ends
//!
//! Mouse position and wheel delta follow the same discipline: the platform
//! writes into a cache, and `tick` copies the cache into the values the
//! application reads, so a whole frame observes one consistent value.

use crate::math::Vi2d;
use crate::viewport::Viewport;

pub const KEY_COUNT: usize = 256;
pub const MOUSE_BUTTONS: usize = 5;

/// Edge-triggered state of one hardware button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HwButton {
    /// Set once during the frame the button went down.
    pub pressed: bool,
    /// Set once during the frame the button came up.
    pub released: bool,
    /// Set for every frame between pressed and released.
    pub held: bool,
}

/// Raw samples and derived state for `N` buttons.
#[derive(Debug, Clone)]
pub struct ButtonBank<const N: usize> {
    new_state: [bool; N],
    old_state: [bool; N],
    states: [HwButton; N],
}

impl<const N: usize> Default for ButtonBank<N> {
    fn default() -> Self {
        Self {
            new_state: [false; N],
            old_state: [false; N],
            states: [HwButton::default(); N],
        }
    }
}

impl<const N: usize> ButtonBank<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a raw sample. Out-of-range indices are ignored.
    pub fn set_raw(&mut self, index: usize, down: bool) {
        if let Some(slot) = self.new_state.get_mut(index) {
            *slot = down;
        }
    }

    /// Derives this frame's edges from the raw samples.
    pub fn update(&mut self) {
        for i in 0..N {
            let state = &mut self.states[i];
            state.pressed = false;
            state.released = false;

            if self.new_state[i] != self.old_state[i] {
                if self.new_state[i] {
                    state.pressed = !state.held;
                    state.held = true;
                } else {
                    state.released = true;
                    state.held = false;
                }
            }

            self.old_state[i] = self.new_state[i];
        }
    }

    /// Current state of button `index`; all-false when out of range.
    pub fn get(&self, index: usize) -> HwButton {
        self.states.get(index).copied().unwrap_or_default()
    }

    /// Forces every button up, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.new_state = [false; N];
    }
}

/// Keyboard keys tracked by the engine. The discriminant is the key's slot
/// in the 256-entry key bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Key {
    None,
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
    K0, K1, K2, K3, K4, K5, K6, K7, K8, K9,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    Up, Down, Left, Right,
    Space, Tab, Shift, Ctrl, Ins, Del, Home, End, PgUp, PgDn,
    Back, Escape, Return, Enter, Pause, Scroll,
    Np0, Np1, Np2, Np3, Np4, Np5, Np6, Np7, Np8, Np9,
    NpMul, NpDiv, NpAdd, NpSub, NpDecimal, Period,
}

impl Key {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Mouse buttons, indexed in the 5-entry mouse bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left = 0,
    Right = 1,
    Middle = 2,
    X1 = 3,
    X2 = 4,
}

impl MouseButton {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// All input the engine tracks between frames.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: ButtonBank<KEY_COUNT>,
    mouse: ButtonBank<MOUSE_BUTTONS>,

    mouse_pos_cache: Vi2d,
    mouse_wheel_cache: i32,
    mouse_pos: Vi2d,
    mouse_wheel: i32,
    window_mouse: Vi2d,

    has_input_focus: bool,
    has_mouse_focus: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, key: usize, down: bool) {
        self.keys.set_raw(key, down);
    }

    pub fn set_mouse_button(&mut self, button: usize, down: bool) {
        self.mouse.set_raw(button, down);
    }

    /// Records a window-space mouse position into the cache, converted to
    /// logical pixel space and clamped to the screen.
    pub fn update_mouse(&mut self, window_pos: Vi2d, viewport: &Viewport, screen_size: Vi2d) {
        self.has_mouse_focus = true;
        self.window_mouse = window_pos;
        self.mouse_pos_cache = viewport.window_to_screen(window_pos, screen_size);
    }

    pub fn update_mouse_wheel(&mut self, delta: i32) {
        self.mouse_wheel_cache += delta;
    }

    pub fn set_mouse_focus(&mut self, focus: bool) {
        self.has_mouse_focus = focus;
    }

    pub fn set_key_focus(&mut self, focus: bool) {
        self.has_input_focus = focus;
        if !focus {
            self.keys.release_all();
        }
    }

    /// Runs edge detection for every key and mouse button, then snapshots
    /// the cached mouse position and wheel delta.
    pub fn tick(&mut self) {
        self.keys.update();
        self.mouse.update();

        self.mouse_pos = self.mouse_pos_cache;
        self.mouse_wheel = self.mouse_wheel_cache;
        self.mouse_wheel_cache = 0;
    }

    pub fn key(&self, key: Key) -> HwButton {
        self.keys.get(key.index())
    }

    pub fn key_at(&self, index: usize) -> HwButton {
        self.keys.get(index)
    }

    pub fn mouse(&self, button: usize) -> HwButton {
        self.mouse.get(button)
    }

    pub fn mouse_pos(&self) -> Vi2d {
        self.mouse_pos
    }

    pub fn mouse_wheel(&self) -> i32 {
        self.mouse_wheel
    }

    pub fn window_mouse(&self) -> Vi2d {
        self.window_mouse
    }

    pub fn has_input_focus(&self) -> bool {
        self.has_input_focus
    }

    pub fn has_mouse_focus(&self) -> bool {
        self.has_mouse_focus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(samples: &[bool]) -> Vec<HwButton> {
        let mut bank: ButtonBank<4> = ButtonBank::new();
        samples
            .iter()
            .map(|&down| {
                bank.set_raw(2, down);
                bank.update();
                bank.get(2)
            })
            .collect()
    }

    #[test]
    fn down_down_down_up_sequence() {
        let states = run(&[true, true, true, false]);
        let pressed: Vec<bool> = states.iter().map(|s| s.pressed).collect();
        let held: Vec<bool> = states.iter().map(|s| s.held).collect();
        let released: Vec<bool> = states.iter().map(|s| s.released).collect();

        assert_eq!(pressed, [true, false, false, false]);
        assert_eq!(held, [true, true, true, false]);
        assert_eq!(released, [false, false, false, true]);
    }

    #[test]
    fn released_clears_on_next_frame() {
        let states = run(&[true, false, false]);
        assert!(states[1].released);
        assert_eq!(states[2], HwButton::default());
    }

    #[test]
    fn idle_key_stays_idle() {
        let states = run(&[false, false]);
        assert!(states.iter().all(|s| *s == HwButton::default()));
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut bank: ButtonBank<2> = ButtonBank::new();
        bank.set_raw(7, true);
        bank.update();
        assert_eq!(bank.get(7), HwButton::default());
        assert_eq!(bank.get(0), HwButton::default());
    }

    #[test]
    fn keys_and_mouse_tick_together() {
        let mut input = InputState::new();
        input.set_key(Key::Space.index(), true);
        input.set_mouse_button(MouseButton::Left.index(), true);
        input.tick();

        assert!(input.key(Key::Space).pressed);
        assert!(input.mouse(0).pressed);
        assert!(!input.key(Key::A).held);
        assert_eq!(input.mouse(MOUSE_BUTTONS), HwButton::default());
    }

    #[test]
    fn wheel_accumulates_until_tick() {
        let mut input = InputState::new();
        input.update_mouse_wheel(120);
        input.update_mouse_wheel(-40);
        assert_eq!(input.mouse_wheel(), 0);

        input.tick();
        assert_eq!(input.mouse_wheel(), 80);

        input.tick();
        assert_eq!(input.mouse_wheel(), 0);
    }

    #[test]
    fn mouse_position_is_stable_within_frame() {
        let screen = Vi2d::new(160, 120);
        let vp = Viewport::fit(screen, Vi2d::new(4, 4), Vi2d::new(640, 480));
        let mut input = InputState::new();

        input.update_mouse(Vi2d::new(40, 80), &vp, screen);
        input.tick();
        assert_eq!(input.mouse_pos(), Vi2d::new(10, 20));

        input.update_mouse(Vi2d::new(400, 400), &vp, screen);
        assert_eq!(input.mouse_pos(), Vi2d::new(10, 20));
        assert_eq!(input.window_mouse(), Vi2d::new(400, 400));
        assert!(input.has_mouse_focus());

        input.tick();
        assert_eq!(input.mouse_pos(), Vi2d::new(100, 100));
    }

    #[test]
    fn losing_focus_releases_keys() {
        let mut input = InputState::new();
        input.set_key(Key::W.index(), true);
        input.tick();
        assert!(input.key(Key::W).held);

        input.set_key_focus(false);
        input.tick();
        assert!(input.key(Key::W).released);
        assert!(!input.key(Key::W).held);
    }
}
