//! Galois field arithmetic for GF(2^m), m <= 8.
//!
//! Elements are bytes. Addition and subtraction are both XOR
//! ([`add_or_subtract`]); multiplication and inversion go through
//! exponent/logarithm tables built from the field's primitive polynomial on
//! first use.
//!
//! Two GF(256) fields are predefined: the QR-code field (primitive `0x011D`,
//! generator base 0) used by the encoder, and the data-matrix field
//! (primitive `0x012D`, generator base 1) which the decoder also accepts.
use std::sync::OnceLock;

use crate::gfpoly::GenericGfPoly;
use crate::{CodecError, CodecResult, DATA_MATRIX_PRIMITIVE, QR_CODE_PRIMITIVE};

/// Add or subtract two field elements. In characteristic 2 both are XOR.
#[inline]
pub fn add_or_subtract(a: u8, b: u8) -> u8 {
    a ^ b
}

/// Exponent and logarithm tables.
struct GfTables {
    /// `exp[i] = generator^i` for `i` in `0..size`.
    exp: Vec<u8>,
    /// `log[exp[i]] = i`; `log[0]` is unused.
    log: Vec<u8>,
}

/// A field GF(2^m) described by its primitive polynomial.
pub struct GenericGf {
    primitive: u32,
    size: usize,
    generator_base: u32,
    tables: OnceLock<GfTables>,
}

impl GenericGf {
    /// Describe a field of `size` elements.
    ///
    /// `size` must be a power of two in `2..=256` and `primitive` must have
    /// degree `log2(size)`. `generator_base` is the first power of the
    /// generator used as a code root (0 for QR codes, 1 for data matrix).
    /// The primitive polynomial is trusted to be irreducible and primitive.
    pub fn new(primitive: u32, size: usize, generator_base: u32) -> CodecResult<Self> {
        if !size.is_power_of_two() || !(2..=256).contains(&size) {
            return Err(CodecError::InvalidField);
        }
        if (primitive as usize) < size || (primitive as usize) >= 2 * size {
            return Err(CodecError::InvalidField);
        }
        Ok(Self {
            primitive,
            size,
            generator_base,
            tables: OnceLock::new(),
        })
    }

    /// The QR-code GF(256) field, primitive `x^8 + x^4 + x^3 + x^2 + 1`.
    pub fn qr_code_field_256() -> &'static GenericGf {
        static FIELD: OnceLock<GenericGf> = OnceLock::new();
        FIELD.get_or_init(|| GenericGf {
            primitive: QR_CODE_PRIMITIVE,
            size: 256,
            generator_base: 0,
            tables: OnceLock::new(),
        })
    }

    /// The data-matrix GF(256) field, primitive `x^8 + x^5 + x^3 + x^2 + 1`.
    pub fn data_matrix_field_256() -> &'static GenericGf {
        static FIELD: OnceLock<GenericGf> = OnceLock::new();
        FIELD.get_or_init(|| GenericGf {
            primitive: DATA_MATRIX_PRIMITIVE,
            size: 256,
            generator_base: 1,
            tables: OnceLock::new(),
        })
    }

    fn tables(&self) -> &GfTables {
        self.tables.get_or_init(|| {
            let mut exp = vec![0u8; self.size];
            let mut log = vec![0u8; self.size];
            let mut x = 1usize;
            for slot in exp.iter_mut() {
                *slot = x as u8;
                x <<= 1;
                if x >= self.size {
                    x ^= self.primitive as usize;
                    x &= self.size - 1;
                }
            }
            for (i, &e) in exp.iter().enumerate().take(self.size - 1) {
                log[e as usize] = i as u8;
            }
            GfTables { exp, log }
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn primitive(&self) -> u32 {
        self.primitive
    }

    pub fn generator_base(&self) -> u32 {
        self.generator_base
    }

    /// `generator^a`. Exponents wrap modulo `size - 1`.
    pub fn exp(&self, a: usize) -> u8 {
        self.tables().exp[a % (self.size - 1)]
    }

    /// Discrete logarithm of `a` base the generator.
    pub fn log(&self, a: u8) -> CodecResult<u32> {
        if a == 0 {
            return Err(CodecError::LogOfZero);
        }
        Ok(self.tables().log[a as usize] as u32)
    }

    /// Multiplicative inverse of `a`.
    pub fn inverse(&self, a: u8) -> CodecResult<u8> {
        if a == 0 {
            return Err(CodecError::LogOfZero);
        }
        let t = self.tables();
        Ok(t.exp[self.size - t.log[a as usize] as usize - 1])
    }

    pub fn multiply(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let t = self.tables();
        let log_sum = t.log[a as usize] as usize + t.log[b as usize] as usize;
        t.exp[log_sum % (self.size - 1)]
    }

    /// The zero polynomial over this field.
    pub fn zero(&self) -> GenericGfPoly<'_> {
        GenericGfPoly::from_canonical(self, vec![0])
    }

    /// The constant polynomial 1.
    pub fn one(&self) -> GenericGfPoly<'_> {
        GenericGfPoly::from_canonical(self, vec![1])
    }

    /// `coefficient * x^degree`.
    pub fn build_monomial(&self, degree: usize, coefficient: u8) -> GenericGfPoly<'_> {
        if coefficient == 0 {
            return self.zero();
        }
        let mut coefficients = vec![0u8; degree + 1];
        coefficients[0] = coefficient;
        GenericGfPoly::from_canonical(self, coefficients)
    }
}

impl PartialEq for GenericGf {
    fn eq(&self, other: &Self) -> bool {
        self.primitive == other.primitive
            && self.size == other.size
            && self.generator_base == other.generator_base
    }
}

impl Eq for GenericGf {}

impl std::fmt::Debug for GenericGf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GF(0x{:x},{})", self.primitive, self.size)
    }
}
