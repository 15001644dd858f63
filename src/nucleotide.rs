/// One of the four DNA bases, in matrix column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nucleotide {
    A,
    C,
    G,
    T,
}

/// The alphabet in column order.
pub const ALPHABET: [Nucleotide; 4] = [Nucleotide::A, Nucleotide::C, Nucleotide::G, Nucleotide::T];

impl Nucleotide {
    /// Decode a sequence byte, ignoring case.
    ///
    /// Anything outside `ACGTacgt` (ambiguity codes, gaps, `N`) decodes to
    /// `None` and is skipped when counting sites and when scoring windows.
    pub fn from_byte(byte: u8) -> Option<Nucleotide> {
        match byte {
            b'A' | b'a' => Some(Nucleotide::A),
            b'C' | b'c' => Some(Nucleotide::C),
            b'G' | b'g' => Some(Nucleotide::G),
            b'T' | b't' => Some(Nucleotide::T),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Nucleotide::A => 0,
            Nucleotide::C => 1,
            Nucleotide::G => 2,
            Nucleotide::T => 3,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Nucleotide::A => 'A',
            Nucleotide::C => 'C',
            Nucleotide::G => 'G',
            Nucleotide::T => 'T',
        }
    }
}
