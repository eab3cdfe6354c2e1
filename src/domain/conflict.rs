/// Returns true if any existing `(id, email)` pair has exactly `email`.
///
/// `exclude` skips the record being replaced so an update may keep its own email.
pub fn has_email_conflict<'a, I>(existing: I, email: &str, exclude: Option<i64>) -> bool
where
    I: IntoIterator<Item = (i64, &'a str)>,
{
    existing.into_iter().any(|(id, existing_email)| Some(id) != exclude && existing_email == email)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXISTING: [(i64, &str); 2] = [(1, "a@b.com"), (2, "c@d.com")];

    #[test]
    fn test_detects_exact_match() {
        assert!(has_email_conflict(EXISTING, "c@d.com", None));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        assert!(!has_email_conflict(EXISTING, "A@B.com", None));
    }

    #[test]
    fn test_empty_collection_never_conflicts() {
        assert!(!has_email_conflict(std::iter::empty(), "a@b.com", None));
    }

    #[test]
    fn test_excluded_record_does_not_conflict_with_itself() {
        assert!(!has_email_conflict(EXISTING, "a@b.com", Some(1)));
        assert!(has_email_conflict(EXISTING, "a@b.com", Some(2)));
    }
}
