//! Static mapping from review status codes to the verdict shown to the user.

const VERDICTS: [(&str, &str); 3] = [
    ("approved", "Работа проверена: ревьюеру всё понравилось. Ура!"),
    ("reviewing", "Работа взята на проверку ревьюером."),
    ("rejected", "Работа проверена: у ревьюера есть замечания."),
];

/// Look up the verdict text for a status code.
pub fn verdict_for(code: &str) -> Option<&'static str> {
    VERDICTS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, verdict)| *verdict)
}

/// Every status code the catalog knows about.
pub fn known_statuses() -> impl Iterator<Item = &'static str> {
    VERDICTS.iter().map(|(code, _)| *code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(
            verdict_for("approved"),
            Some("Работа проверена: ревьюеру всё понравилось. Ура!")
        );
        assert_eq!(verdict_for("reviewing"), Some("Работа взята на проверку ревьюером."));
        assert_eq!(
            verdict_for("rejected"),
            Some("Работа проверена: у ревьюера есть замечания.")
        );
    }

    #[test]
    fn test_unknown_and_case_sensitive() {
        assert_eq!(verdict_for("archived"), None);
        assert_eq!(verdict_for("Approved"), None);
        assert_eq!(verdict_for(""), None);
    }

    #[test]
    fn test_known_statuses_listed() {
        let codes: Vec<_> = known_statuses().collect();
        assert_eq!(codes, vec!["approved", "reviewing", "rejected"]);
    }
}
