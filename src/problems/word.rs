use std::fmt;
use std::sync::Arc;

use crate::chromosome::Chromosome;
use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// A string over a fixed alphabet, scored by how many positions match a
/// target word.
///
/// Equality compares the letters only.
///
/// # Examples
///
/// ```
/// use lockstep_ga::chromosome::Chromosome;
/// use lockstep_ga::problems::Word;
///
/// let target = Word::new("abba");
/// assert_eq!(Word::new("abba").fitness(&target), 16.01);
/// assert_eq!(Word::new("aaaa").fitness(&target), 4.01);
/// ```
#[derive(Clone)]
pub struct Word {
    letters: Vec<char>,
    alphabet: Arc<[char]>,
}

impl Word {
    /// Creates a word whose alphabet is the distinct letters of `value`.
    pub fn new(value: &str) -> Self {
        let letters: Vec<char> = value.chars().collect();
        let alphabet = Self::alphabet_of(value);
        Self { letters, alphabet }
    }

    /// Creates a word over an explicit alphabet.
    ///
    /// # Errors
    ///
    /// Returns a [`GeneticError::Configuration`] if the alphabet is empty or
    /// does not contain every letter of `value`.
    pub fn with_alphabet(value: &str, alphabet: &[char]) -> Result<Self> {
        if alphabet.is_empty() {
            return Err(GeneticError::Configuration(
                "Alphabet cannot be empty".to_string(),
            ));
        }

        let letters: Vec<char> = value.chars().collect();
        if let Some(missing) = letters.iter().find(|letter| !alphabet.contains(letter)) {
            return Err(GeneticError::Configuration(format!(
                "Letter {:?} is not part of the alphabet",
                missing
            )));
        }

        Ok(Self {
            letters,
            alphabet: alphabet.into(),
        })
    }

    /// The distinct letters of `value` in order of first appearance.
    pub fn alphabet_of(value: &str) -> Arc<[char]> {
        let mut alphabet = Vec::new();
        for letter in value.chars() {
            if !alphabet.contains(&letter) {
                alphabet.push(letter);
            }
        }
        alphabet.into()
    }

    /// A random word of the same length and alphabet as `self`.
    pub fn random_sibling(&self, rng: &mut RandomNumberGenerator) -> Self {
        let letters = (0..self.letters.len())
            .map(|_| self.random_letter(rng))
            .collect();
        Self {
            letters,
            alphabet: Arc::clone(&self.alphabet),
        }
    }

    pub fn value(&self) -> String {
        self.letters.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// The number of positions where `self` and `other` agree.
    pub fn matches(&self, other: &Word) -> usize {
        self.letters
            .iter()
            .zip(other.letters.iter())
            .filter(|(a, b)| a == b)
            .count()
    }

    fn random_letter(&self, rng: &mut RandomNumberGenerator) -> char {
        self.alphabet[rng.index(self.alphabet.len())]
    }
}

impl Chromosome for Word {
    type Target = Word;
    type Scratch = ();

    fn fitness(&self, target: &Word) -> f64 {
        2f64.powi(self.matches(target) as i32) + 0.01
    }

    /// Single-point crossover: the prefix comes from `self`, the rest from `other`.
    fn crossover(
        &self,
        other: &Self,
        rng: &mut RandomNumberGenerator,
        _scratch: &mut (),
    ) -> Result<Self> {
        if self.letters.len() != other.letters.len() {
            return Err(GeneticError::IncompatibleCrossover(format!(
                "word lengths differ: {} and {}",
                self.letters.len(),
                other.letters.len()
            )));
        }
        if self.letters.is_empty() {
            return Ok(self.clone());
        }

        let split = rng.index(self.letters.len());
        let mut letters = Vec::with_capacity(self.letters.len());
        letters.extend_from_slice(&self.letters[..split]);
        letters.extend_from_slice(&other.letters[split..]);

        Ok(Self {
            letters,
            alphabet: Arc::clone(&self.alphabet),
        })
    }

    /// Replaces each letter independently with probability `mutation_rate`.
    fn mutate(&mut self, mutation_rate: f64, rng: &mut RandomNumberGenerator) {
        if self.alphabet.is_empty() {
            return;
        }
        for i in 0..self.letters.len() {
            if rng.probability() < mutation_rate {
                self.letters[i] = self.random_letter(rng);
            }
        }
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.letters == other.letters
    }
}

impl Eq for Word {}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({:?})", self.value())
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value())
    }
}
