use serde::{Deserialize, Serialize};

/// Group entity - an isolated namespace of players sharing one link
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub slug: String,
    pub name: String,
    pub created_at: i64,
}

impl Group {
    /// Create a new group with a freshly derived slug
    pub fn new(name: String) -> Self {
        Self {
            slug: generate_slug(&name),
            name,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

/// Derive a URL-friendly slug from a display name (e.g. "My Company" -> "my-company-412").
///
/// Runs of non-alphanumeric characters collapse to a single dash and a random
/// numeric suffix reduces collisions. Uniqueness is still enforced by the store.
pub fn generate_slug(name: &str) -> String {
    use rand::Rng;

    let mut slug = String::with_capacity(name.len() + 4);
    let mut last_dash = false;
    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    let suffix = rand::thread_rng().gen_range(0..1000);
    format!("{}-{}", slug, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_lowercases_and_dashes() {
        let slug = generate_slug("Accounts Payable");
        let (base, suffix) = slug.rsplit_once('-').unwrap();
        assert_eq!(base, "accounts-payable");
        let n: u32 = suffix.parse().unwrap();
        assert!(n < 1000);
    }

    #[test]
    fn slug_collapses_symbol_runs() {
        let slug = generate_slug("R&D / Platform");
        assert!(slug.starts_with("r-d-platform-"));
    }

    #[test]
    fn slugs_differ_across_calls() {
        // Suffixes are random; 32 draws over 1000 values should not all collide.
        let first = generate_slug("Sales");
        assert!((0..32).any(|_| generate_slug("Sales") != first));
    }
}
