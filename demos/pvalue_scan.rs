use occupancy::montecarlo::pvalue_scan;
use occupancy::Profile;

fn main() {
    // 200 draws observed from a station believed to rotate about 100 songs.
    let observed = Profile::from_multiplicity_counts(vec![27, 22, 25, 8, 2, 2]);
    println!(
        "observed: {} draws, {} distinct songs",
        observed.num_draws(),
        observed.num_distinct()
    );

    // Scan hypothesized playlist sizes; sizes with a non-negligible p-value are
    // compatible with the observation.
    let candidates = (90..=130).step_by(5);
    let scan = pvalue_scan(&observed, candidates, 1_000, 1).unwrap();

    println!("{:>6}  {:>8}", "M", "p-value");
    for (m, p) in scan {
        println!("{m:>6}  {p:>8.4}");
    }
}
