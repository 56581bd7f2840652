//! Prime generation by trial division.

/// `true` if `n` is prime. Checks divisors up to `sqrt(n)`.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut divisor = 2_u64;
    while divisor.saturating_mul(divisor) <= n {
        if n % divisor == 0 {
            return false;
        }
        divisor += 1;
    }
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimeGenerator {
    pub limit: u64,
}

impl PrimeGenerator {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    pub fn is_prime(&self, n: u64) -> bool {
        is_prime(n)
    }

    /// All primes in `2..=limit`, ascending.
    pub fn generate_primes(&self) -> Vec<u64> {
        (2..=self.limit).filter(|&n| is_prime(n)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_numbers() {
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(is_prime(3));
        assert!(!is_prime(4));
        assert!(!is_prime(49));
        assert!(is_prime(97));
    }

    #[test]
    fn generates_primes_up_to_limit_inclusive() {
        assert_eq!(
            PrimeGenerator::new(30).generate_primes(),
            vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]
        );
        assert_eq!(PrimeGenerator::new(29).generate_primes().last(), Some(&29));
    }

    #[test]
    fn empty_below_two() {
        assert!(PrimeGenerator::new(0).generate_primes().is_empty());
        assert!(PrimeGenerator::new(1).generate_primes().is_empty());
    }
}
