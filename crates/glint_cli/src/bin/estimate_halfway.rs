//! Monte Carlo estimate of ∫₀^2π e^(-x/2π) sin²x dx, plus the x that splits
//! the sampled mass in half.

use rand::Rng;
use std::f64::consts::PI;

const N: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Sample {
    x: f64,
    p_x: f64,
}

#[derive(Debug)]
struct Estimate {
    average: f64,
    area: f64,
    halfway: f64,
}

fn integrand(x: f64) -> f64 {
    let sin_x = x.sin();
    (-x / (2.0 * PI)).exp() * sin_x * sin_x
}

fn estimate<R: Rng>(n: usize, rng: &mut R) -> Estimate {
    let mut samples: Vec<Sample> = (0..n)
        .map(|_| {
            let x = rng.gen_range(0.0..2.0 * PI);
            Sample { x, p_x: integrand(x) }
        })
        .collect();
    let sum: f64 = samples.iter().map(|s| s.p_x).sum();

    samples.sort_by(|a, b| a.x.total_cmp(&b.x));

    let half_sum = sum / 2.0;
    let mut accum = 0.0;
    let halfway = samples
        .iter()
        .find(|s| {
            accum += s.p_x;
            accum >= half_sum
        })
        .map_or(0.0, |s| s.x);

    let average = sum / n as f64;
    Estimate {
        average,
        area: 2.0 * PI * average,
        halfway,
    }
}

fn main() {
    let result = estimate(N, &mut rand::thread_rng());

    println!("Average = {:.12}", result.average);
    println!("Area under curve = {:.12}", result.area);
    println!("Halfway = {:.12}", result.halfway);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_area_matches_closed_form() {
        // ∫ e^(-ax) sin²x over [0, 2π] with a = 1/2π
        let a = 1.0 / (2.0 * PI);
        let exact = 0.5 * (1.0 - (-1.0f64).exp()) * (2.0 * PI - a / (a * a + 4.0));

        let result = estimate(N, &mut StdRng::seed_from_u64(7));
        assert!((result.area - exact).abs() < 0.1, "{} vs {}", result.area, exact);
    }

    #[test]
    fn test_halfway_splits_the_mass() {
        let mut rng = StdRng::seed_from_u64(11);
        let result = estimate(N, &mut rng);
        assert!(result.halfway > 0.0 && result.halfway < 2.0 * PI);

        // Decaying weight pulls the midpoint left of π
        assert!(result.halfway < PI);
    }
}
