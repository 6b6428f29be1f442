use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{Keystream, StreamError};

/// Register width in bits
pub const WIDTH: u8 = 8;

/// Taps of the polynomial x^8 + x^4 + x^3 + x^2 + 1
pub const DEFAULT_TAPS: [u8; 4] = [4, 3, 2, 0];

/// 8-bit Fibonacci LFSR. The feedback bit is the XOR of the tapped register
/// bits (0 is the least significant one). It is shifted in from the right and
/// is also the emitted keystream bit.
#[derive(Debug, Clone, Zeroize, ZeroizeOnDrop)]
pub struct Lfsr {
    state: u8,
    taps: Vec<u8>,
}

impl Lfsr {
    /// Creates the register. A zero `initial_state` is replaced with 1,
    /// because the all-zero register is a fixed point.
    pub fn new(initial_state: u8, taps: &[u8]) -> Result<Self, StreamError> {
        if taps.is_empty() {
            return Err(StreamError::NoTaps);
        }
        if let Some(&tap) = taps.iter().find(|&&tap| tap >= WIDTH) {
            return Err(StreamError::TapOutOfRange(tap));
        }
        let state = if initial_state == 0 {
            log::warn!("zero LFSR state replaced with 1");
            1
        } else {
            initial_state
        };
        Ok(Self {
            state,
            taps: taps.to_vec(),
        })
    }

    /// Register with [`DEFAULT_TAPS`]
    pub fn with_default_taps(initial_state: u8) -> Self {
        Self::new(initial_state, &DEFAULT_TAPS).expect("default taps are valid")
    }

    /// Current register value
    pub fn state(&self) -> u8 {
        self.state
    }

    pub fn taps(&self) -> &[u8] {
        &self.taps
    }

    /// True once the register has collapsed to zero. From then on it only
    /// emits zeros.
    pub fn is_stalled(&self) -> bool {
        self.state == 0
    }

    fn feedback(&self) -> u8 {
        self.taps
            .iter()
            .fold(0, |acc, &tap| acc ^ ((self.state >> tap) & 1))
    }
}

impl Keystream for Lfsr {
    fn next_bit(&mut self) -> u8 {
        let was_stalled = self.is_stalled();
        let bit = self.feedback();
        self.state = (self.state << 1) | bit;
        if !was_stalled && self.is_stalled() {
            log::warn!("LFSR register collapsed to zero");
        }
        bit
    }
}
