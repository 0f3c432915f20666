use crate::gf::GenericGf;
use crate::gfpoly::GenericGfPoly;
use crate::{CodecError, CodecResult};

/// Systematic Reed-Solomon encoder over the QR-code GF(256) field.
///
/// Generator polynomials are built on demand and cached, so repeated calls
/// with the same parity length reuse earlier work.
#[derive(Debug, Clone)]
pub struct ReedSolomonEncoder<'f> {
    field: &'f GenericGf,
    /// `cached_generators[d]` has degree `d`; index 0 is the constant 1.
    cached_generators: Vec<GenericGfPoly<'f>>,
}

impl<'f> ReedSolomonEncoder<'f> {
    /// Create an encoder for `field`, which must be the QR-code field.
    pub fn new(field: &'f GenericGf) -> CodecResult<Self> {
        if field != GenericGf::qr_code_field_256() {
            return Err(CodecError::UnsupportedField);
        }
        Ok(Self {
            field,
            cached_generators: vec![field.one()],
        })
    }

    /// Encoder over [`GenericGf::qr_code_field_256`].
    pub fn qr_code() -> ReedSolomonEncoder<'static> {
        let field = GenericGf::qr_code_field_256();
        ReedSolomonEncoder {
            field,
            cached_generators: vec![field.one()],
        }
    }

    /// The generator of degree `degree`: the product of `(x + a^(base+i))`
    /// for `i` in `0..degree`.
    fn build_generator(&mut self, degree: usize) -> CodecResult<&GenericGfPoly<'f>> {
        let base = self.field.generator_base() as usize;
        if degree >= self.cached_generators.len() {
            log::trace!(
                "extending generator cache from degree {} to {}",
                self.cached_generators.len() - 1,
                degree
            );
        }
        while self.cached_generators.len() <= degree {
            let d = self.cached_generators.len();
            let factor = GenericGfPoly::from_canonical(
                self.field,
                vec![1, self.field.exp(d - 1 + base)],
            );
            let next = self.cached_generators[d - 1].multiply(&factor)?;
            self.cached_generators.push(next);
        }
        Ok(&self.cached_generators[degree])
    }

    /// Fill the last `ec_bytes` of `block` with parity for the bytes before.
    ///
    /// The data region is left untouched. Fails if `ec_bytes` is zero or
    /// leaves no room for data.
    pub fn encode(&mut self, block: &mut [u8], ec_bytes: usize) -> CodecResult<()> {
        if ec_bytes == 0 || block.len() <= ec_bytes {
            return Err(CodecError::InvalidBlock);
        }
        let data_bytes = block.len() - ec_bytes;
        let field = self.field;
        let generator = self.build_generator(ec_bytes)?;

        let info = GenericGfPoly::new(field, &block[..data_bytes])?
            .multiply_by_monomial(ec_bytes, 1);
        let (_, remainder) = info.divide(generator)?;

        let coefficients = remainder.coefficients();
        let num_zero_coefficients = ec_bytes - coefficients.len();
        let parity = &mut block[data_bytes..];
        parity[..num_zero_coefficients].fill(0);
        parity[num_zero_coefficients..].copy_from_slice(coefficients);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> ReedSolomonEncoder<'static> {
        ReedSolomonEncoder::new(GenericGf::qr_code_field_256()).unwrap()
    }

    #[test]
    fn test_rejects_other_fields() {
        assert_eq!(
            ReedSolomonEncoder::new(GenericGf::data_matrix_field_256()).err(),
            Some(CodecError::UnsupportedField)
        );
    }

    #[test]
    fn test_generator_roots() {
        let mut enc = encoder();
        let field = GenericGf::qr_code_field_256();
        let g = enc.build_generator(6).unwrap().clone();
        assert_eq!(g.degree(), 6);
        assert_eq!(g.coefficient(6), 1);
        for i in 0..6 {
            assert_eq!(g.evaluate_at(field.exp(i)), 0, "a^{} is not a root", i);
        }
        assert_ne!(g.evaluate_at(field.exp(6)), 0);
    }

    #[test]
    fn test_generator_cache_grows_monotonically() {
        let mut enc = encoder();
        enc.build_generator(3).unwrap();
        assert_eq!(enc.cached_generators.len(), 4);
        enc.build_generator(2).unwrap();
        assert_eq!(enc.cached_generators.len(), 4);
        enc.build_generator(10).unwrap();
        assert_eq!(enc.cached_generators.len(), 11);
        for (d, g) in enc.cached_generators.iter().enumerate() {
            assert_eq!(g.degree(), d);
        }
    }

    #[test]
    fn test_known_qr_parity() {
        // Degree-2 generator: (x + 1)(x + a) = x^2 + 3x + 2.
        let mut enc = encoder();
        assert_eq!(enc.build_generator(2).unwrap().coefficients(), &[1, 3, 2]);
        // x^2 mod g(x) = 3x + 2, so the codeword of [1] is [1, 3, 2].
        let mut block = [1u8, 0, 0];
        enc.encode(&mut block, 2).unwrap();
        assert_eq!(block, [1, 3, 2]);
    }

    #[test]
    fn test_systematic_and_divisible() {
        let field = GenericGf::qr_code_field_256();
        let mut enc = encoder();
        let data: Vec<u8> = (1..=10).collect();
        let mut block = data.clone();
        block.extend_from_slice(&[0xEE; 4]);
        enc.encode(&mut block, 4).unwrap();
        assert_eq!(&block[..10], &data[..]);

        let codeword = GenericGfPoly::new(field, &block).unwrap();
        for i in 0..4 {
            assert_eq!(codeword.evaluate_at(field.exp(i)), 0);
        }
    }

    #[test]
    fn test_zero_data_gives_zero_parity() {
        let mut enc = encoder();
        let mut block = [0u8, 0, 0, 9, 9, 9];
        enc.encode(&mut block, 3).unwrap();
        assert_eq!(block, [0; 6]);
    }

    #[test]
    fn test_invalid_lengths() {
        let mut enc = encoder();
        let mut block = [1u8, 2, 3];
        assert_eq!(enc.encode(&mut block, 0), Err(CodecError::InvalidBlock));
        assert_eq!(enc.encode(&mut block, 3), Err(CodecError::InvalidBlock));
        assert_eq!(enc.encode(&mut block, 4), Err(CodecError::InvalidBlock));
    }
}
