//! Endpoint Input
//!
//! Per-frame button state for each tracked input endpoint (hand controller).
//! The XR input layer maps raw device controls onto these logical actions;
//! manipulation only ever reads the result.

/// A tracked input source capable of holding objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endpoint {
    Left,
    Right,
    /// Pointer not attached to a hand
    #[default]
    None,
}

impl Endpoint {
    /// Hands in processing order. Left always runs before Right.
    pub const HANDS: [Endpoint; 2] = [Endpoint::Left, Endpoint::Right];

    /// Slot in per-hand arrays, `None` for [`Endpoint::None`]
    pub fn index(self) -> Option<usize> {
        match self {
            Endpoint::Left => Some(0),
            Endpoint::Right => Some(1),
            Endpoint::None => None,
        }
    }

    /// The opposite hand
    pub fn other(self) -> Endpoint {
        match self {
            Endpoint::Left => Endpoint::Right,
            Endpoint::Right => Endpoint::Left,
            Endpoint::None => Endpoint::None,
        }
    }
}

/// Opaque handle to a pointer origin owned by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RayOrigin(pub u32);

/// Edge-aware state of one logical button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonState {
    pub just_pressed: bool,
    pub held: bool,
    pub just_released: bool,
}

impl ButtonState {
    pub const IDLE: Self = Self {
        just_pressed: false,
        held: false,
        just_released: false,
    };

    pub const PRESSED: Self = Self {
        just_pressed: true,
        held: true,
        just_released: false,
    };

    pub const HELD: Self = Self {
        just_pressed: false,
        held: true,
        just_released: false,
    };

    pub const RELEASED: Self = Self {
        just_pressed: false,
        held: false,
        just_released: true,
    };

    /// Next frame's state given whether the control is down now
    pub fn advance(self, down: bool) -> Self {
        Self {
            just_pressed: down && !self.held,
            held: down,
            just_released: !down && self.held,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EndpointInput {
    pub select: ButtonState,
    pub cancel: ButtonState,
}

impl EndpointInput {
    pub fn select(select: ButtonState) -> Self {
        Self {
            select,
            cancel: ButtonState::IDLE,
        }
    }

    /// Advance both buttons from raw samples
    pub fn advance(self, select_down: bool, cancel_down: bool) -> Self {
        Self {
            select: self.select.advance(select_down),
            cancel: self.cancel.advance(cancel_down),
        }
    }
}

/// Everything the manipulation engine reads from input in one frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Seconds since the previous frame
    pub delta_time: f32,
    hands: [EndpointInput; 2],
}

impl FrameInput {
    pub fn new(delta_time: f32) -> Self {
        Self {
            delta_time,
            hands: [EndpointInput::default(); 2],
        }
    }

    /// Input for `endpoint`; idle for [`Endpoint::None`]
    pub fn endpoint(&self, endpoint: Endpoint) -> EndpointInput {
        endpoint
            .index()
            .map(|i| self.hands[i])
            .unwrap_or_default()
    }

    pub fn set(&mut self, endpoint: Endpoint, input: EndpointInput) {
        if let Some(i) = endpoint.index() {
            self.hands[i] = input;
        }
    }

    pub fn with(mut self, endpoint: Endpoint, input: EndpointInput) -> Self {
        self.set(endpoint, input);
        self
    }
}
