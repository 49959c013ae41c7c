//! URL slugs and random tokens.
use deunicode::deunicode;
use rand::{distributions::Alphanumeric, Rng};

/// Length of the random suffix appended to product slugs
pub const SLUG_SUFFIX_LEN: usize = 6;

/// Transliterate to ASCII, keeping the original casing.
#[inline]
pub fn fold_ascii(value: &str) -> String {
    deunicode(value)
}

/// Lowercase, ASCII-only, hyphen-separated form of `value`.
///
/// ```
/// use glow_utils::slug::slugify;
///
/// assert_eq!(slugify("Corps & Bain"), "corps-bain");
/// assert_eq!(slugify("Crème Hydratante"), "creme-hydratante");
/// ```
pub fn slugify(value: &str) -> String {
    let folded = fold_ascii(&value.replace('@', " at ")).to_lowercase();

    let mut slug = String::with_capacity(folded.len());
    let mut pending_dash = false;
    for c in folded.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// `slugify(name)` followed by a random lowercase suffix. A name with no
/// sluggable characters yields the suffix alone.
pub fn product_slug(name: &str) -> String {
    let base = slugify(name);
    let suffix = random_token(SLUG_SUFFIX_LEN).to_lowercase();
    if base.is_empty() {
        suffix
    } else {
        format!("{base}-{suffix}")
    }
}

/// Random alphanumeric string of `len` characters.
pub fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Soins Visage"), "soins-visage");
        assert_eq!(slugify("  Parfums  "), "parfums");
        assert_eq!(slugify("Sérum Éclat Vitamine C"), "serum-eclat-vitamine-c");
        assert_eq!(slugify("Eau de Parfum \"Jardin Secret\""), "eau-de-parfum-jardin-secret");
        assert_eq!(slugify("hello@glow"), "hello-at-glow");
        assert_eq!(slugify("--a__b--"), "a-b");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_product_slug() {
        let slug = product_slug("Rouge à Lèvres Mat");
        let (base, suffix) = slug.rsplit_once('-').unwrap();
        assert_eq!(base, "rouge-a-levres-mat");
        assert_eq!(suffix.len(), SLUG_SUFFIX_LEN);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));

        let bare = product_slug("???");
        assert_eq!(bare.len(), SLUG_SUFFIX_LEN);
        assert!(!bare.contains('-'));
    }

    #[test]
    fn test_random_token() {
        let a = random_token(40);
        let b = random_token(40);
        assert_eq!(a.len(), 40);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
