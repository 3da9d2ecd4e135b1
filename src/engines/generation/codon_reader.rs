use crate::engines::precision::lcm::validate_precision;
use crate::error::Result;

/// Sequentially consumes fixed-width codons from a gene's bits, most
/// significant bit first
pub struct CodonReader<'a> {
    bits: &'a [bool],
    precision: usize,
    position: usize,
}

impl<'a> CodonReader<'a> {
    /// Codons are read into a u64, so `precision` must lie in `1..=64`
    pub fn new(bits: &'a [bool], precision: u32) -> Result<Self> {
        validate_precision(precision)?;
        Ok(Self {
            bits,
            precision: precision as usize,
            position: 0,
        })
    }

    /// Consume the next codon. `None` once fewer than `precision` bits are left.
    pub fn next_codon(&mut self) -> Option<u64> {
        if self.remaining() == 0 {
            return None;
        }

        let start = self.position * self.precision;
        let codon = self.bits[start..start + self.precision]
            .iter()
            .fold(0u64, |acc, &bit| (acc << 1) | u64::from(bit));
        self.position += 1;
        Some(codon)
    }

    /// Whole codons not yet consumed
    pub fn remaining(&self) -> usize {
        self.bits.len() / self.precision - self.position
    }

    /// Codons consumed so far
    pub fn position(&self) -> usize {
        self.position
    }
}

impl Iterator for CodonReader<'_> {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        self.next_codon()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Gene;

    #[test]
    fn test_reads_msb_first() {
        let gene = Gene::from_bit_str("0001 1000 1111");
        let codons: Vec<u64> = CodonReader::new(gene.bits(), 4).unwrap().collect();
        assert_eq!(codons, vec![1, 8, 15]);
    }

    #[test]
    fn test_position_and_remaining() {
        let gene = Gene::from_bit_str("101010");
        let mut reader = CodonReader::new(gene.bits(), 2).unwrap();
        assert_eq!(reader.remaining(), 3);
        assert_eq!(reader.next_codon(), Some(2));
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.remaining(), 2);
    }

    #[test]
    fn test_trailing_bits_are_not_a_codon() {
        let gene = Gene::from_bit_str("11111");
        let codons: Vec<u64> = CodonReader::new(gene.bits(), 2).unwrap().collect();
        assert_eq!(codons, vec![3, 3]);
    }

    #[test]
    fn test_full_width_codon() {
        let gene = Gene::new(vec![true; 64]);
        let mut reader = CodonReader::new(gene.bits(), 64).unwrap();
        assert_eq!(reader.next_codon(), Some(u64::MAX));
        assert_eq!(reader.next_codon(), None);
    }

    #[test]
    fn test_rejects_widths_a_u64_cannot_hold() {
        let gene = Gene::new(vec![true; 130]);
        assert!(CodonReader::new(gene.bits(), 0).is_err());
        assert!(CodonReader::new(gene.bits(), 65).is_err());
        assert!(CodonReader::new(gene.bits(), 128).is_err());
    }
}
