// Deterministic random-source construction. Every stochastic stage takes
// an explicit `rand::Rng` handle owned by the caller, one per invocation;
// there is no global or shared generator. Seeding here is what makes
// transformations reproducible and lets independent invocations run
// concurrently without coordination.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Creates the crate's default random source (PCG32) from a seed.
pub fn create_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}
