use crate::utils::validation::escape;

/// Name reported in every response envelope and to MongoDB as the app name.
pub fn service_name() -> String {
    service_name_or_default(std::env::var("SERVICE_NAME").ok())
}

fn service_name_or_default(value: Option<String>) -> String {
    value
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Lookup key for a post: spaces become hyphens, so "A B" and "A-B" share a key.
pub fn title_key(title: &str) -> String {
    title.replace(' ', "-")
}

/// Canonical key for a title-key path segment. The segment goes through the
/// same escaping as a stored title.
pub fn path_title_key(segment: &str) -> String {
    title_key(&escape(segment))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_or_empty_service_name_falls_back() {
        assert_eq!(service_name_or_default(None), "Unknown");
        assert_eq!(service_name_or_default(Some(String::new())), "Unknown");
        assert_eq!(service_name_or_default(Some("blog".into())), "blog");
    }

    #[test]
    fn spaces_become_hyphens() {
        assert_eq!(title_key("Hello World"), "Hello-World");
        assert_eq!(title_key("Hello-World"), "Hello-World");
    }

    #[test]
    fn hyphen_and_space_titles_collide() {
        assert_eq!(title_key("A-B"), title_key("A B"));
    }

    #[test]
    fn path_segment_matches_stored_key() {
        let stored = title_key(&escape("Tom & Jerry"));
        assert_eq!(path_title_key("Tom-&-Jerry"), stored);
        assert_eq!(path_title_key("Tom & Jerry"), stored);
    }
}
