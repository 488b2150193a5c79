use std::fmt::{Debug, Display};

/// A fixed-size set of bits. Each entry point owns one bit; a module's bitset tells which entries can reach it.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BitSet {
  entries: Vec<u8>,
}

impl BitSet {
  pub fn new(max_bit_count: u32) -> Self {
    Self { entries: vec![0; max_bit_count.div_ceil(8) as usize] }
  }

  pub fn has_bit(&self, bit: u32) -> bool {
    (self.entries[bit as usize / 8] & (1 << (bit & 7))) != 0
  }

  pub fn set_bit(&mut self, bit: u32) {
    self.entries[bit as usize / 8] |= 1 << (bit & 7);
  }

  pub fn union(&mut self, other: &Self) {
    for (a, b) in self.entries.iter_mut().zip(other.entries.iter()) {
      *a |= *b;
    }
  }

  pub fn is_empty(&self) -> bool {
    self.entries.iter().all(|byte| *byte == 0)
  }

  pub fn count_ones(&self) -> u32 {
    self.entries.iter().map(|byte| byte.count_ones()).sum()
  }

  pub fn iter_ones(&self) -> impl Iterator<Item = u32> + '_ {
    let max_bit = u32::try_from(self.entries.len() * 8).unwrap_or(u32::MAX);
    (0..max_bit).filter(|bit| self.has_bit(*bit))
  }
}

impl Display for BitSet {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let bits = self.entries.iter().rev().map(|byte| format!("{byte:08b}")).collect::<String>();
    f.write_str(&bits)
  }
}

impl Debug for BitSet {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_tuple("BitSet").field(&self.to_string()).finish()
  }
}

#[test]
fn basic() {
  let mut bs = BitSet::new(10);
  assert!(bs.is_empty());
  bs.set_bit(0);
  bs.set_bit(9);
  assert!(bs.has_bit(0));
  assert!(!bs.has_bit(1));
  assert!(bs.has_bit(9));
  assert_eq!(bs.count_ones(), 2);
  assert_eq!(bs.iter_ones().collect::<Vec<_>>(), vec![0, 9]);
  assert_eq!(bs.to_string(), "0000001000000001");

  let mut other = BitSet::new(10);
  other.set_bit(3);
  bs.union(&other);
  assert!(bs.has_bit(3));
  assert_eq!(bs.count_ones(), 3);
}
