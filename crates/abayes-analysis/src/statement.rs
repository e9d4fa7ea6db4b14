//! Human-readable summary sentences.

use abayes_stats::{
    credible::CredibleInterval,
    win_probability::{Variant, WinProbability},
};

/// Sentence naming the likely better variant.
///
/// Percentages are rounded to whole numbers and the variant with the larger
/// rounded percentage is named first; on a tie variant B is named.
///
/// # Examples
///
/// ```
/// use abayes_analysis::statement::win_statement;
/// use abayes_stats::{posterior::Posterior, win_probability::win_probability};
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let a = Posterior::from_shapes(301.0, 701.0).unwrap();
/// let b = Posterior::from_shapes(101.0, 901.0).unwrap();
/// let result = win_probability(&a, &b, 1_000, &mut Pcg32::seed_from_u64(0)).unwrap();
/// assert_eq!(
///     win_statement("Control", "Treatment", &result),
///     "There is a 100% chance that Control converts better than Treatment."
/// );
/// ```
#[must_use]
pub fn win_statement(label_a: &str, label_b: &str, result: &WinProbability) -> String {
    let (percent_a, percent_b) = result.rounded_percentages();
    let (percent, winner, loser) = match result.leader() {
        Variant::A => (percent_a, label_a, label_b),
        Variant::B => (percent_b, label_b, label_a),
    };
    format!("There is a {percent}% chance that {winner} converts better than {loser}.")
}

/// Sentence describing a variant's credible interval.
#[must_use]
pub fn interval_statement(percent: f64, label: &str, interval: &CredibleInterval) -> String {
    format!(
        "{percent}% probability '{label}' conversion is in range [{:.2}%, {:.2}%]",
        interval.lower, interval.upper
    )
}

#[cfg(test)]
mod tests {
    use abayes_stats::{posterior::Posterior, win_probability::win_probability};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn result(a: (f64, f64), b: (f64, f64), seed: u64) -> WinProbability {
        let a = Posterior::from_shapes(a.0, a.1).unwrap();
        let b = Posterior::from_shapes(b.0, b.1).unwrap();
        win_probability(&a, &b, 10_000, &mut Pcg32::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn test_names_b_when_b_leads() {
        let result = result((121.0, 1181.0), (126.0, 1151.0), 17);
        let (_, percent_b) = result.rounded_percentages();
        assert_eq!(
            win_statement("Variant A", "Variant B", &result),
            format!("There is a {percent_b}% chance that Variant B converts better than Variant A.")
        );
    }

    #[test]
    fn test_names_a_when_a_leads() {
        let result = result((126.0, 1151.0), (121.0, 1181.0), 17);
        let (percent_a, _) = result.rounded_percentages();
        assert!(percent_a > 50);
        assert!(
            win_statement("Variant A", "Variant B", &result)
                .starts_with(&format!("There is a {percent_a}% chance that Variant A"))
        );
    }

    #[test]
    fn test_interval_statement_format() {
        let interval = CredibleInterval {
            lower: 7.8,
            upper: 10.93,
        };
        assert_eq!(
            interval_statement(95.0, "Control", &interval),
            "95% probability 'Control' conversion is in range [7.80%, 10.93%]"
        );
        assert_eq!(
            interval_statement(99.5, "B", &interval),
            "99.5% probability 'B' conversion is in range [7.80%, 10.93%]"
        );
    }
}
