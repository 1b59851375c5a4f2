pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Seed for runs that did not pin one on the command line.
pub fn entropy_seed() -> u64 {
    rand::random::<u64>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_trims_and_filters() {
        let parts = split_csv(" herbs, ,night,  roots ");
        assert_eq!(parts, vec!["herbs", "night", "roots"]);
    }

    #[test]
    fn split_csv_handles_empty_input() {
        assert!(split_csv("").is_empty());
    }

    #[test]
    fn entropy_seeds_differ_between_calls() {
        let seeds: std::collections::HashSet<u64> = (0..8).map(|_| entropy_seed()).collect();
        assert!(seeds.len() > 1);
    }
}
