//! Run-scoped identifier generation.
//!
//! Element and class ids in the output schema are six lowercase base-36
//! characters. Every conversion owns one [`IdGenerator`], so concurrent
//! conversions never share state and identical inputs yield identical ids.

/// Number of characters in a generated id.
pub const ID_LENGTH: usize = 6;

const ALPHABET: &[u8; 36] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// 36^6, the size of the id space.
const ID_SPACE: u128 = 2_176_782_336;

/// Coprime with 36, so `n * MULTIPLIER mod ID_SPACE` is a bijection and
/// consecutive counters map to ids that do not look sequential.
const MULTIPLIER: u128 = 2_654_435_761;

const OFFSET: u128 = 1_052_943_827;

/// Monotonic, deterministic id source for one conversion run.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    /// Create a generator starting at the first id of the sequence.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.next
    }

    /// Produce the next id. Unique for the first 36^6 calls.
    pub fn next_id(&mut self) -> String {
        let counter = u128::from(self.next) % ID_SPACE;
        self.next += 1;

        let mut value = (counter * MULTIPLIER + OFFSET) % ID_SPACE;
        let mut out = [b'a'; ID_LENGTH];
        for slot in out.iter_mut().rev() {
            let digit = usize::try_from(value % 36).unwrap_or_default();
            *slot = ALPHABET[digit];
            value /= 36;
        }
        out.iter().map(|&b| char::from(b)).collect()
    }
}
