use codonbias::engines::precision::{
    codon_bias, codon_precision_with_threshold, enumerated_bias, lcm_codon_precision,
    lcm_of_choices, min_codon_precision, precision_profile, precision_profiles, BiasReport,
    MAX_TABLE_CHOICES,
};
use codonbias::types::ChoiceVector;
use codonbias::CodonBiasError;
use proptest::prelude::*;

fn choices(counts: &[u64]) -> ChoiceVector {
    ChoiceVector::from_counts(counts.iter().copied()).unwrap()
}

#[test]
fn test_profile_table_is_monotone_and_bounded() {
    let profiles = precision_profiles();
    assert_eq!(profiles.len(), 64);

    for (i, profile) in profiles.iter().enumerate() {
        assert_eq!(profile.precision as usize, i + 1);
        assert!(u128::from(profile.lcm) < 1u128 << profile.precision);
        assert!(profile.max_choices <= MAX_TABLE_CHOICES);
    }
    for pair in profiles.windows(2) {
        assert!(pair[0].max_choices <= pair[1].max_choices);
        assert!(pair[0].lcm <= pair[1].lcm);
    }
}

#[test]
fn test_profile_literals() {
    assert_eq!(precision_profile(8).unwrap().max_choices, 6);
    assert_eq!(precision_profile(16).unwrap().max_choices, 12);
    assert_eq!(precision_profile(64).unwrap().max_choices, 42);
}

#[test]
fn test_profile_rejects_out_of_range_widths() {
    for precision in [0, 65, 128] {
        assert!(matches!(
            precision_profile(precision),
            Err(CodonBiasError::Configuration(_))
        ));
    }
}

#[test]
fn test_threshold_ordering() {
    let v = choices(&[1, 2, 3, 5]);
    let loose = codon_precision_with_threshold(&v, 0.1).unwrap();
    let tight = codon_precision_with_threshold(&v, 0.01).unwrap();
    assert!(loose < tight, "loose = {}, tight = {}", loose, tight);
}

#[test]
fn test_threshold_precision_is_at_least_min_precision() {
    let v = choices(&[2, 3, 17]);
    let min = min_codon_precision(&v).unwrap();
    assert_eq!(min, 5);
    assert!(codon_precision_with_threshold(&v, 0.5).unwrap() >= min);
}

#[test]
fn test_infeasible_threshold_is_surfaced() {
    let v = choices(&[3, 4]);
    assert!(matches!(
        codon_precision_with_threshold(&v, 1e-25),
        Err(CodonBiasError::InfeasibleThreshold { choice: 3, .. })
    ));
}

#[test]
fn test_lcm_precision_of_known_grammar() {
    // LCM(3, 4, 5) = 60 needs 6 bits
    let v = choices(&[3, 4, 5]);
    assert_eq!(lcm_of_choices(&v).unwrap(), 60);
    assert_eq!(lcm_codon_precision(&v).unwrap(), 6);
}

#[test]
fn test_report_at_searched_width_meets_threshold() {
    let v = choices(&[2, 3, 5, 6, 7]);
    let precision = codon_precision_with_threshold(&v, 0.001).unwrap();
    let report = BiasReport::new(&v, precision).unwrap().with_threshold(0.001);
    assert_eq!(report.meets_threshold(), Some(true));
}

#[test]
fn test_entropy_gap_is_exact_at_wide_codons() {
    for choice in [3u64, 5, 7, 41, 1000] {
        let mut previous = f64::INFINITY;
        for precision in 30..=64 {
            let n = 1u128 << precision;
            let rem = (n % u128::from(choice)) as f64;
            let leading = rem * (choice as f64 - rem)
                / (2.0 * (n as f64) * (n as f64) * std::f64::consts::LN_2);

            let dh = codon_bias(choice, precision).unwrap().dh;
            assert!(
                ((dh - leading) / leading).abs() < 1e-6,
                "c={} k={}: {} vs {}",
                choice,
                precision,
                dh,
                leading
            );
            assert!(dh <= previous, "dH grew at c={} k={}", choice, precision);
            previous = dh;
        }
    }
}

proptest! {
    #[test]
    fn singleton_lcm_is_the_value(c in 1u64..1_000_000_000_000) {
        prop_assert_eq!(lcm_of_choices(&choices(&[c])).unwrap(), c);
    }

    #[test]
    fn lcm_never_exceeds_product(counts in proptest::collection::vec(1u64..=30, 1..6)) {
        let v = choices(&counts);
        let product: u128 = v.iter().map(u128::from).product();
        let lcm = lcm_of_choices(&v).unwrap();
        prop_assert!(u128::from(lcm) <= product);
        for c in v.iter() {
            prop_assert_eq!(lcm % c, 0);
        }
    }

    #[test]
    fn bias_shrinks_with_width(c in 1u64..5000, k in 1u32..64) {
        let narrow = codon_bias(c, k).unwrap();
        let wide = codon_bias(c, k + 1).unwrap();
        prop_assert!(wide.dp <= narrow.dp, "c={} k={}: {} > {}", c, k, wide.dp, narrow.dp);
        prop_assert!(wide.dh <= narrow.dh, "c={} k={}: {} > {}", c, k, wide.dh, narrow.dh);
    }

    #[test]
    fn power_of_two_choices_are_unbiased(j in 0u32..20, extra in 0u32..20) {
        let c = 1u64 << j;
        let k = (j + extra).max(1);
        prop_assert_eq!(codon_bias(c, k).unwrap().dp, 0.0);
    }

    #[test]
    fn closed_form_agrees_with_enumeration(c in 1u64..200, k in 1u32..=14) {
        let closed = codon_bias(c, k).unwrap();
        let naive = enumerated_bias(c, k).unwrap();
        prop_assert!((closed.dp - naive.dp).abs() < 1e-12);
        prop_assert!((closed.dh - naive.dh).abs() < 1e-9);
    }

    #[test]
    fn bias_is_deterministic(c in 1u64..100_000, k in 1u32..=64) {
        prop_assert_eq!(codon_bias(c, k).unwrap(), codon_bias(c, k).unwrap());
    }

    #[test]
    fn merged_width_keeps_every_choice_below_threshold(
        counts in proptest::collection::vec(1u64..=1000, 1..8),
        threshold in 1e-6f64..0.5,
    ) {
        let v = choices(&counts);
        let precision = codon_precision_with_threshold(&v, threshold).unwrap();
        for c in v.iter() {
            let record = codon_bias(c, precision).unwrap();
            prop_assert!(record.dp < threshold, "c={} dp={} at {} bits", c, record.dp, precision);
        }
    }
}
