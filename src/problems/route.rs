use rand::seq::SliceRandom;

use crate::chromosome::Chromosome;
use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

/// Pairwise travel costs between cities. Row `i`, column `j` is the cost of
/// travelling from city `i` to city `j`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostMatrix {
    costs: Vec<Vec<u32>>,
}

impl CostMatrix {
    /// # Errors
    ///
    /// Returns a [`GeneticError::Configuration`] if the matrix is empty or not
    /// square.
    pub fn new(costs: Vec<Vec<u32>>) -> Result<Self> {
        if costs.is_empty() {
            return Err(GeneticError::Configuration(
                "Cost matrix cannot be empty".to_string(),
            ));
        }
        let n = costs.len();
        if let Some(row) = costs.iter().position(|row| row.len() != n) {
            return Err(GeneticError::Configuration(format!(
                "Cost matrix must be square: row {} has {} entries, expected {}",
                row,
                costs[row].len(),
                n
            )));
        }
        Ok(Self { costs })
    }

    pub fn cities(&self) -> usize {
        self.costs.len()
    }

    pub fn cost(&self, from: usize, to: usize) -> u32 {
        self.costs[from][to]
    }
}

/// A closed tour visiting every city exactly once.
///
/// # Examples
///
/// ```
/// use lockstep_ga::chromosome::Chromosome;
/// use lockstep_ga::problems::{CostMatrix, Route};
///
/// let matrix = CostMatrix::new(vec![
///     vec![0, 1, 9],
///     vec![1, 0, 1],
///     vec![1, 9, 0],
/// ]).unwrap();
///
/// let route = Route::new(vec![0, 1, 2]);
/// assert_eq!(route.cost(&matrix), 3);
/// assert_eq!(route.fitness(&matrix), 0.25);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    cities: Vec<usize>,
}

impl Route {
    pub fn new(cities: Vec<usize>) -> Self {
        Self { cities }
    }

    /// A uniformly shuffled tour over `len` cities.
    pub fn random(len: usize, rng: &mut RandomNumberGenerator) -> Self {
        let mut cities: Vec<usize> = (0..len).collect();
        cities.shuffle(rng);
        Self { cities }
    }

    pub fn cities(&self) -> &[usize] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Total cost of the tour, including the leg back to the first city.
    pub fn cost(&self, matrix: &CostMatrix) -> u64 {
        if self.cities.len() < 2 {
            return 0;
        }
        let legs = self.cities.windows(2).map(|leg| (leg[0], leg[1]));
        let closing = (self.cities[self.cities.len() - 1], self.cities[0]);
        legs.chain(std::iter::once(closing))
            .map(|(from, to)| u64::from(matrix.cost(from, to)))
            .sum()
    }
}

impl Chromosome for Route {
    type Target = CostMatrix;
    /// Marks which cities the child already holds during order crossover.
    type Scratch = Vec<bool>;

    fn fitness(&self, matrix: &CostMatrix) -> f64 {
        1.0 / (1.0 + self.cost(matrix) as f64)
    }

    /// Order crossover: a random slice of `self` is kept in place, and the
    /// remaining positions are filled with the missing cities in the order
    /// they appear in `other`.
    fn crossover(
        &self,
        other: &Self,
        rng: &mut RandomNumberGenerator,
        used: &mut Vec<bool>,
    ) -> Result<Self> {
        let len = self.cities.len();
        if len != other.cities.len() {
            return Err(GeneticError::IncompatibleCrossover(format!(
                "route lengths differ: {} and {}",
                len,
                other.cities.len()
            )));
        }
        if len < 2 {
            return Ok(self.clone());
        }

        let mut start = rng.index(len);
        let mut end = rng.index(len);
        if start > end {
            std::mem::swap(&mut start, &mut end);
        }

        used.clear();
        used.resize(len, false);

        let mut child = vec![usize::MAX; len];
        for i in start..=end {
            let city = self.cities[i];
            if city >= len {
                return Err(GeneticError::IncompatibleCrossover(format!(
                    "city {} is out of range for a route of {} cities",
                    city, len
                )));
            }
            child[i] = city;
            used[city] = true;
        }

        let mut donor = other
            .cities
            .iter()
            .filter(|&&city| !used.get(city).copied().unwrap_or(true));
        for slot in child.iter_mut().filter(|slot| **slot == usize::MAX) {
            match donor.next() {
                Some(&city) => *slot = city,
                None => {
                    return Err(GeneticError::IncompatibleCrossover(
                        "routes do not visit the same cities".to_string(),
                    ))
                }
            }
        }

        Ok(Self { cities: child })
    }

    /// Swaps two distinct positions with probability `mutation_rate`.
    fn mutate(&mut self, mutation_rate: f64, rng: &mut RandomNumberGenerator) {
        let len = self.cities.len();
        if len < 2 || rng.probability() >= mutation_rate {
            return;
        }
        let i = rng.index(len);
        let j = (i + 1 + rng.index(len - 1)) % len;
        self.cities.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_permutation(route: &Route, len: usize) -> bool {
        let mut cities = route.cities().to_vec();
        cities.sort_unstable();
        cities == (0..len).collect::<Vec<_>>()
    }

    #[test]
    fn test_cost_matrix_validation() {
        assert!(CostMatrix::new(vec![vec![0]]).is_ok());
        assert!(matches!(
            CostMatrix::new(vec![]),
            Err(GeneticError::Configuration(_))
        ));
        assert!(matches!(
            CostMatrix::new(vec![vec![0, 1], vec![1]]),
            Err(GeneticError::Configuration(_))
        ));
    }

    #[test]
    fn test_cost_is_a_closed_tour() {
        let matrix = CostMatrix::new(vec![
            vec![0, 2, 9, 10],
            vec![1, 0, 6, 4],
            vec![15, 7, 0, 8],
            vec![6, 3, 12, 0],
        ])
        .unwrap();

        assert_eq!(Route::new(vec![0, 1, 3, 2]).cost(&matrix), 2 + 4 + 12 + 15);
        assert_eq!(Route::new(vec![2]).cost(&matrix), 0);
    }

    #[test]
    fn test_random_is_a_permutation() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        for _ in 0..10 {
            assert!(is_permutation(&Route::random(12, &mut rng), 12));
        }
    }

    #[test]
    fn test_order_crossover_keeps_a_permutation() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let mut used = Vec::new();

        for _ in 0..50 {
            let left = Route::random(10, &mut rng);
            let right = Route::random(10, &mut rng);
            let child = left.crossover(&right, &mut rng, &mut used).unwrap();
            assert!(is_permutation(&child, 10));
        }
    }

    #[test]
    fn test_order_crossover_of_identical_parents() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let parent = Route::new(vec![3, 1, 4, 0, 2]);
        let child = parent.crossover(&parent, &mut rng, &mut Vec::new()).unwrap();
        assert_eq!(child, parent);
    }

    #[test]
    fn test_crossover_rejects_mismatched_lengths() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let result = Route::new(vec![0, 1, 2]).crossover(
            &Route::new(vec![0, 1]),
            &mut rng,
            &mut Vec::new(),
        );
        assert!(matches!(result, Err(GeneticError::IncompatibleCrossover(_))));
    }

    #[test]
    fn test_mutate_swaps_two_cities() {
        let mut rng = RandomNumberGenerator::from_seed(5);
        let original = Route::new((0..8).collect());

        let mut route = original.clone();
        route.mutate(1.0, &mut rng);
        let moved = route
            .cities()
            .iter()
            .zip(original.cities())
            .filter(|(a, b)| a != b)
            .count();
        assert_eq!(moved, 2);
        assert!(is_permutation(&route, 8));

        let mut route = original.clone();
        route.mutate(0.0, &mut rng);
        assert_eq!(route, original);
    }
}
