//! Event name normalization

/// Event method name for a host event name
///
/// Dots and hyphens are removed, everything else is kept as is:
/// `pimcore.dataobject.postUpdate` becomes `pimcoredataobjectpostUpdate`.
pub fn event_method_name(event: &str) -> String {
    event.chars().filter(|c| !matches!(c, '.' | '-')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_dots_and_hyphens() {
        assert_eq!(
            event_method_name("pimcore.dataobject.postUpdate"),
            "pimcoredataobjectpostUpdate"
        );
        assert_eq!(event_method_name("pimcore.asset.pre-delete"), "pimcoreassetpredelete");
    }

    #[test]
    fn test_keeps_other_characters() {
        assert_eq!(event_method_name("post_update"), "post_update");
        assert_eq!(event_method_name(".-"), "");
    }
}
