//! Polynomials with coefficients in a [`GenericGf`].
//!
//! Coefficients are stored highest degree first and kept canonical: no
//! leading zeros, except the zero polynomial which is the single coefficient
//! `[0]`. Every operation returns a new polynomial.
use crate::gf::{add_or_subtract, GenericGf};
use crate::{CodecError, CodecResult};

/// A polynomial over one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericGfPoly<'f> {
    field: &'f GenericGf,
    coefficients: Vec<u8>,
}

impl<'f> GenericGfPoly<'f> {
    /// Build a polynomial from coefficients, highest degree first.
    ///
    /// Leading zeros are stripped. Fails on an empty slice or on an element
    /// outside the field.
    pub fn new(field: &'f GenericGf, coefficients: &[u8]) -> CodecResult<Self> {
        if coefficients.is_empty() {
            return Err(CodecError::EmptyPolynomial);
        }
        if coefficients.iter().any(|&c| c as usize >= field.size()) {
            return Err(CodecError::InvalidField);
        }
        Ok(Self::from_canonical(field, coefficients.to_vec()))
    }

    /// Build from coefficients already known to lie in the field.
    pub(crate) fn from_canonical(field: &'f GenericGf, mut coefficients: Vec<u8>) -> Self {
        match coefficients.iter().position(|&c| c != 0) {
            Some(0) => {}
            Some(first_non_zero) => {
                coefficients.drain(..first_non_zero);
            }
            None => {
                coefficients.clear();
                coefficients.push(0);
            }
        }
        Self {
            field,
            coefficients,
        }
    }

    pub fn field(&self) -> &'f GenericGf {
        self.field
    }

    /// Coefficients, highest degree first.
    pub fn coefficients(&self) -> &[u8] {
        &self.coefficients
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients[0] == 0
    }

    /// Coefficient of `x^degree`, or 0 above the polynomial's degree.
    pub fn coefficient(&self, degree: usize) -> u8 {
        if degree > self.degree() {
            return 0;
        }
        self.coefficients[self.coefficients.len() - 1 - degree]
    }

    /// Evaluate at `a` using Horner's rule.
    pub fn evaluate_at(&self, a: u8) -> u8 {
        match a {
            0 => self.coefficient(0),
            // Every power of 1 is 1, so just sum the coefficients.
            1 => self
                .coefficients
                .iter()
                .fold(0, |acc, &c| add_or_subtract(acc, c)),
            _ => self.coefficients[1..]
                .iter()
                .fold(self.coefficients[0], |acc, &c| {
                    add_or_subtract(self.field.multiply(a, acc), c)
                }),
        }
    }

    fn check_field(&self, other: &Self) -> CodecResult<()> {
        if self.field != other.field {
            return Err(CodecError::FieldMismatch);
        }
        Ok(())
    }

    pub fn add_or_subtract(&self, other: &Self) -> CodecResult<Self> {
        self.check_field(other)?;
        if self.is_zero() {
            return Ok(other.clone());
        }
        if other.is_zero() {
            return Ok(self.clone());
        }

        let (smaller, larger) = if self.coefficients.len() > other.coefficients.len() {
            (&other.coefficients, &self.coefficients)
        } else {
            (&self.coefficients, &other.coefficients)
        };
        let length_diff = larger.len() - smaller.len();

        // High-order terms only present in the larger polynomial are copied.
        let mut sum_diff = larger.clone();
        for (dst, &s) in sum_diff[length_diff..].iter_mut().zip(smaller.iter()) {
            *dst = add_or_subtract(*dst, s);
        }
        Ok(Self::from_canonical(self.field, sum_diff))
    }

    pub fn multiply(&self, other: &Self) -> CodecResult<Self> {
        self.check_field(other)?;
        if self.is_zero() || other.is_zero() {
            return Ok(self.field.zero());
        }
        let mut product = vec![0u8; self.coefficients.len() + other.coefficients.len() - 1];
        for (i, &a) in self.coefficients.iter().enumerate() {
            for (j, &b) in other.coefficients.iter().enumerate() {
                product[i + j] = add_or_subtract(product[i + j], self.field.multiply(a, b));
            }
        }
        Ok(Self::from_canonical(self.field, product))
    }

    pub fn multiply_scalar(&self, scalar: u8) -> Self {
        match scalar {
            0 => self.field.zero(),
            1 => self.clone(),
            _ => {
                let product = self
                    .coefficients
                    .iter()
                    .map(|&c| self.field.multiply(c, scalar))
                    .collect();
                Self::from_canonical(self.field, product)
            }
        }
    }

    /// Multiply by `coefficient * x^degree`.
    pub fn multiply_by_monomial(&self, degree: usize, coefficient: u8) -> Self {
        if coefficient == 0 {
            return self.field.zero();
        }
        let mut product = vec![0u8; self.coefficients.len() + degree];
        for (dst, &c) in product.iter_mut().zip(self.coefficients.iter()) {
            *dst = self.field.multiply(c, coefficient);
        }
        Self::from_canonical(self.field, product)
    }

    /// Long division, returning `(quotient, remainder)`.
    pub fn divide(&self, other: &Self) -> CodecResult<(Self, Self)> {
        self.check_field(other)?;
        if other.is_zero() {
            return Err(CodecError::DivideByZero);
        }

        let mut quotient = self.field.zero();
        let mut remainder = self.clone();
        let denominator_leading_term = other.coefficient(other.degree());
        let inverse_denominator_leading_term = self.field.inverse(denominator_leading_term)?;

        while remainder.degree() >= other.degree() && !remainder.is_zero() {
            let degree_difference = remainder.degree() - other.degree();
            let scale = self.field.multiply(
                remainder.coefficient(remainder.degree()),
                inverse_denominator_leading_term,
            );
            let term = other.multiply_by_monomial(degree_difference, scale);
            let iteration_quotient = self.field.build_monomial(degree_difference, scale);
            quotient = quotient.add_or_subtract(&iteration_quotient)?;
            remainder = remainder.add_or_subtract(&term)?;
        }

        Ok((quotient, remainder))
    }
}

/// Renders terms as `a^k x^d` with `a` the field generator, e.g.
/// `a^25x^2 + ax + 1`.
impl std::fmt::Display for GenericGfPoly<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        for degree in (0..=self.degree()).rev() {
            let coefficient = self.coefficient(degree);
            if coefficient == 0 {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            if degree == 0 || coefficient != 1 {
                match self.field.log(coefficient) {
                    Ok(0) => write!(f, "1")?,
                    Ok(1) => write!(f, "a")?,
                    Ok(power) => write!(f, "a^{power}")?,
                    Err(_) => write!(f, "0")?,
                }
            }
            match degree {
                0 => {}
                1 => write!(f, "x")?,
                _ => write!(f, "x^{degree}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qr() -> &'static GenericGf {
        GenericGf::qr_code_field_256()
    }

    fn poly(coefficients: &[u8]) -> GenericGfPoly<'static> {
        GenericGfPoly::new(qr(), coefficients).unwrap()
    }

    #[test]
    fn test_canonical_form() {
        assert_eq!(poly(&[0, 0, 3, 0]).coefficients(), &[3, 0]);
        assert_eq!(poly(&[0, 0, 0]).coefficients(), &[0]);
        assert!(poly(&[0, 0]).is_zero());
        assert_eq!(poly(&[5, 0, 1]).degree(), 2);
        assert_eq!(
            GenericGfPoly::new(qr(), &[]).err(),
            Some(CodecError::EmptyPolynomial)
        );
    }

    #[test]
    fn test_element_outside_small_field() {
        let gf16 = GenericGf::new(0x13, 16, 0).unwrap();
        assert_eq!(
            GenericGfPoly::new(&gf16, &[1, 16]).err(),
            Some(CodecError::InvalidField)
        );
    }

    #[test]
    fn test_coefficient_by_degree() {
        let p = poly(&[7, 0, 9]);
        assert_eq!(p.coefficient(0), 9);
        assert_eq!(p.coefficient(1), 0);
        assert_eq!(p.coefficient(2), 7);
        assert_eq!(p.coefficient(10), 0);
    }

    #[test]
    fn test_evaluate() {
        let p = poly(&[3, 5, 7]);
        assert_eq!(p.evaluate_at(0), 7);
        assert_eq!(p.evaluate_at(1), 3 ^ 5 ^ 7);
        let gf = qr();
        let x = 0x10;
        let expected = gf.multiply(3, gf.multiply(x, x)) ^ gf.multiply(5, x) ^ 7;
        assert_eq!(p.evaluate_at(x), expected);
    }

    #[test]
    fn test_add_aligns_by_degree() {
        let a = poly(&[1, 2, 3]);
        let b = poly(&[4, 5]);
        assert_eq!(a.add_or_subtract(&b).unwrap().coefficients(), &[1, 2 ^ 4, 3 ^ 5]);
        assert!(a.add_or_subtract(&a).unwrap().is_zero());
        assert_eq!(qr().zero().add_or_subtract(&b).unwrap(), b);
    }

    #[test]
    fn test_add_cancels_leading_terms() {
        let a = poly(&[9, 2, 3]);
        let b = poly(&[9, 2, 1]);
        assert_eq!(a.add_or_subtract(&b).unwrap().coefficients(), &[2]);
    }

    #[test]
    fn test_multiply() {
        // (x + 1)(x + 1) = x^2 + 1 in characteristic 2
        let p = poly(&[1, 1]);
        assert_eq!(p.multiply(&p).unwrap().coefficients(), &[1, 0, 1]);
        let q = poly(&[2, 0, 3]);
        assert_eq!(q.multiply(&qr().zero()).unwrap(), qr().zero());
        assert_eq!(q.multiply(&qr().one()).unwrap(), q);
        assert_eq!(q.multiply(&p).unwrap().degree(), 3);
    }

    #[test]
    fn test_scalar_and_monomial() {
        let p = poly(&[1, 2]);
        assert_eq!(p.multiply_scalar(0), qr().zero());
        assert_eq!(p.multiply_scalar(1), p);
        assert_eq!(p.multiply_scalar(3).coefficients(), &[3, qr().multiply(2, 3)]);
        assert_eq!(p.multiply_by_monomial(2, 1).coefficients(), &[1, 2, 0, 0]);
        assert!(p.multiply_by_monomial(2, 0).is_zero());
    }

    #[test]
    fn test_divide_reconstructs_dividend() {
        let dividend = poly(&[17, 200, 3, 99, 4, 250]);
        let divisor = poly(&[5, 1, 77]);
        let (q, r) = dividend.divide(&divisor).unwrap();
        assert!(r.degree() < divisor.degree() || r.is_zero());
        let back = q.multiply(&divisor).unwrap().add_or_subtract(&r).unwrap();
        assert_eq!(back, dividend);
    }

    #[test]
    fn test_divide_by_zero() {
        let p = poly(&[1, 2]);
        assert_eq!(p.divide(&qr().zero()).err(), Some(CodecError::DivideByZero));
    }

    #[test]
    fn test_divide_smaller_degree() {
        let p = poly(&[3]);
        let (q, r) = p.divide(&poly(&[1, 0, 1])).unwrap();
        assert!(q.is_zero());
        assert_eq!(r, p);
    }

    #[test]
    fn test_field_mismatch() {
        let dm = GenericGf::data_matrix_field_256();
        let a = poly(&[1, 2]);
        let b = GenericGfPoly::new(dm, &[1, 2]).unwrap();
        assert_eq!(a.add_or_subtract(&b).err(), Some(CodecError::FieldMismatch));
        assert_eq!(a.multiply(&b).err(), Some(CodecError::FieldMismatch));
        assert_eq!(a.divide(&b).err(), Some(CodecError::FieldMismatch));
    }

    #[test]
    fn test_display() {
        assert_eq!(qr().zero().to_string(), "0");
        assert_eq!(poly(&[1, 2, 1]).to_string(), "x^2 + ax + 1");
        assert_eq!(poly(&[4, 0, 0]).to_string(), "a^2x^2");
    }
}
