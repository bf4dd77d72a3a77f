//! Random hex code generation.

use offers_types::{CodeGenerator, ReferralCode};
use rand::RngCore;

/// Draws codes of `length` lowercase hex characters from the thread RNG.
///
/// Not cryptographically meaningful; codes only need to be hard to collide.
#[derive(Clone, Debug)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    /// `length` is clamped to at least one character.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(1),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(6)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> ReferralCode {
        let mut bytes = vec![0u8; self.length.div_ceil(2)];
        rand::thread_rng().fill_bytes(&mut bytes);
        let mut code = hex::encode(bytes);
        code.truncate(self.length);
        ReferralCode::new(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_codes_are_six_hex_chars() {
        let gen = RandomCodeGenerator::default();
        for _ in 0..100 {
            let code = gen.generate();
            assert_eq!(code.as_str().len(), 6);
            assert!(code
                .as_str()
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn odd_lengths_are_honoured() {
        assert_eq!(RandomCodeGenerator::new(7).generate().as_str().len(), 7);
        assert_eq!(RandomCodeGenerator::new(0).generate().as_str().len(), 1);
    }
}
