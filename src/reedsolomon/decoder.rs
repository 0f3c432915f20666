use crate::gf::{add_or_subtract, GenericGf};
use crate::gfpoly::GenericGfPoly;
use crate::{CodecError, CodecResult, RsFailure};

/// Syndrome-based Reed-Solomon decoder.
///
/// Uses the extended Euclidean algorithm for the error locator and
/// evaluator, a full scan of the field for the locator's roots, and Forney's
/// formula for the error magnitudes.
#[derive(Debug, Clone, Copy)]
pub struct ReedSolomonDecoder<'f> {
    field: &'f GenericGf,
}

impl<'f> ReedSolomonDecoder<'f> {
    pub fn new(field: &'f GenericGf) -> Self {
        Self { field }
    }

    /// Repair `received` in place, given that its last `two_s` bytes are
    /// parity.
    ///
    /// Returns the number of corrected bytes, 0 if the block was already
    /// consistent. Fails with `Uncorrectable` when the block holds more
    /// errors than `two_s / 2`, in which case `received` is left unchanged.
    pub fn decode(&self, received: &mut [u8], two_s: usize) -> CodecResult<usize> {
        let field = self.field;
        let poly = GenericGfPoly::new(field, received)?;
        let base = field.generator_base() as usize;

        let mut syndrome_coefficients = vec![0u8; two_s];
        let mut no_error = true;
        for i in 0..two_s {
            let eval = poly.evaluate_at(field.exp(i + base));
            syndrome_coefficients[two_s - 1 - i] = eval;
            if eval != 0 {
                no_error = false;
            }
        }
        if no_error {
            return Ok(0);
        }

        let syndrome = GenericGfPoly::from_canonical(field, syndrome_coefficients);
        let (sigma, omega) =
            self.run_euclidean_algorithm(field.build_monomial(two_s, 1), syndrome, two_s)?;
        let error_locations = self.find_error_locations(&sigma)?;
        let error_magnitudes = self.find_error_magnitudes(&omega, &error_locations)?;

        // Resolve every position before touching the block.
        let mut positions = Vec::with_capacity(error_locations.len());
        for &location in &error_locations {
            let log = field.log(location)? as usize;
            let position = received
                .len()
                .checked_sub(1 + log)
                .ok_or(CodecError::Uncorrectable(RsFailure::BadErrorLocation))?;
            positions.push(position);
        }
        for (&position, &magnitude) in positions.iter().zip(error_magnitudes.iter()) {
            received[position] = add_or_subtract(received[position], magnitude);
        }

        log::debug!(
            "corrected {} errors in {}-byte block",
            positions.len(),
            received.len()
        );
        Ok(positions.len())
    }

    /// Returns `(sigma, omega)`, the error locator and error evaluator.
    fn run_euclidean_algorithm(
        &self,
        a: GenericGfPoly<'f>,
        b: GenericGfPoly<'f>,
        big_r: usize,
    ) -> CodecResult<(GenericGfPoly<'f>, GenericGfPoly<'f>)> {
        let field = self.field;
        // Assume a's degree is >= b's
        let (a, b) = if a.degree() < b.degree() { (b, a) } else { (a, b) };

        let mut r_last = a;
        let mut r = b;
        let mut t_last = field.zero();
        let mut t = field.one();

        // Run Euclidean algorithm until r's degree is less than R/2
        while r.degree() >= big_r / 2 {
            let r_last_last = std::mem::replace(&mut r_last, r);
            let t_last_last = std::mem::replace(&mut t_last, t);

            // Divide r_last_last by r_last, with quotient in q and remainder in r
            if r_last.is_zero() {
                return Err(CodecError::Uncorrectable(RsFailure::RemainderZero));
            }
            r = r_last_last;
            let mut q = field.zero();
            let denominator_leading_term = r_last.coefficient(r_last.degree());
            let dlt_inverse = field.inverse(denominator_leading_term)?;
            while r.degree() >= r_last.degree() && !r.is_zero() {
                let degree_diff = r.degree() - r_last.degree();
                let scale = field.multiply(r.coefficient(r.degree()), dlt_inverse);
                q = q.add_or_subtract(&field.build_monomial(degree_diff, scale))?;
                r = r.add_or_subtract(&r_last.multiply_by_monomial(degree_diff, scale))?;
            }

            t = q.multiply(&t_last)?.add_or_subtract(&t_last_last)?;
        }

        let sigma_tilde_at_zero = t.coefficient(0);
        if sigma_tilde_at_zero == 0 {
            return Err(CodecError::Uncorrectable(RsFailure::SigmaTildeZero));
        }

        let inverse = field.inverse(sigma_tilde_at_zero)?;
        let sigma = t.multiply_scalar(inverse);
        let omega = r.multiply_scalar(inverse);
        Ok((sigma, omega))
    }

    /// Inverses of the roots of `error_locator`, found by trying every
    /// nonzero element.
    fn find_error_locations(&self, error_locator: &GenericGfPoly<'f>) -> CodecResult<Vec<u8>> {
        let num_errors = error_locator.degree();
        if num_errors == 0 {
            return Err(CodecError::Uncorrectable(RsFailure::LocatorDegreeMismatch));
        }
        if num_errors == 1 {
            return Ok(vec![error_locator.coefficient(1)]);
        }

        let mut result = Vec::with_capacity(num_errors);
        for i in 1..self.field.size() {
            if result.len() == num_errors {
                break;
            }
            let element = i as u8;
            if error_locator.evaluate_at(element) == 0 {
                result.push(self.field.inverse(element)?);
            }
        }
        if result.len() != num_errors {
            return Err(CodecError::Uncorrectable(RsFailure::LocatorDegreeMismatch));
        }
        Ok(result)
    }

    /// Forney's formula: `omega(X_i^-1) / prod_{j != i} (1 + X_j X_i^-1)`.
    fn find_error_magnitudes(
        &self,
        error_evaluator: &GenericGfPoly<'f>,
        error_locations: &[u8],
    ) -> CodecResult<Vec<u8>> {
        let field = self.field;
        let mut result = Vec::with_capacity(error_locations.len());
        for (i, &location) in error_locations.iter().enumerate() {
            let xi_inverse = field.inverse(location)?;
            let mut denominator = 1u8;
            for (j, &other) in error_locations.iter().enumerate() {
                if i != j {
                    let term = field.multiply(other, xi_inverse);
                    denominator = field.multiply(denominator, add_or_subtract(term, 1));
                }
            }
            let denominator_inverse = field
                .inverse(denominator)
                .map_err(|_| CodecError::Uncorrectable(RsFailure::LocatorDegreeMismatch))?;
            let mut magnitude =
                field.multiply(error_evaluator.evaluate_at(xi_inverse), denominator_inverse);
            // Codes whose roots start at a^1 carry an extra factor of X_i^-1.
            if field.generator_base() != 0 {
                magnitude = field.multiply(magnitude, xi_inverse);
            }
            result.push(magnitude);
        }
        Ok(result)
    }
}
