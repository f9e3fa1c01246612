use occupancy::mle::mle_num_items;
use occupancy::{estimate_pvalue, log_probability, Profile};

fn usage() -> ! {
    eprintln!(
        "Usage:\n  cargo run --example playlist_report -- <dd1> <dd2> ...\n\n\
Arguments are the multiplicity counts of the observed profile: dd1 songs heard\n\
once, dd2 heard twice, and so on. If none are given, a real radio-station\n\
sample is used."
    );
    std::process::exit(2);
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        usage();
    }

    let dd: Vec<usize> = if args.is_empty() {
        // 1974 songs heard once, 295 twice, 17 thrice, 2 four times.
        vec![1974, 295, 17, 2]
    } else {
        args.iter()
            .map(|a| a.parse().unwrap_or_else(|_| usage()))
            .collect()
    };

    let observed = Profile::from_multiplicity_counts(dd);
    let rendered: Vec<String> = observed.dd.iter().map(ToString::to_string).collect();
    println!(
        "profile [{}]: {} draws, {} distinct songs",
        rendered.join(", "),
        observed.num_draws(),
        observed.num_distinct()
    );

    let m_hat = match mle_num_items(&observed) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("no maximum-likelihood estimate: {e}");
            std::process::exit(1);
        }
    };
    println!("maximum-likelihood playlist size ≈ {m_hat:.1}");

    let m = m_hat.round() as usize;
    let log_p = log_probability(&observed, m).unwrap();
    let p = estimate_pvalue(&observed, m, 2_000, 0).unwrap();
    println!("at M = {m}: log-probability {log_p:.3}, Monte Carlo p-value ≈ {p:.3}");
}
