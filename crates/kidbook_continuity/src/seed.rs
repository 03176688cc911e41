//! Deterministic image seeds.
//!
//! The same child and the same reference photo always produce the same base
//! seed, so re-running a book yields comparable illustrations.

use kidbook_core::Profile;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

/// Seeds are kept below this modulus so every image backend accepts them.
pub const SEED_MODULUS: u64 = 2_147_483_647;

/// How the base seed for a run is chosen.
///
/// Serialized as `"auto"`, `"disabled"` or `{ "locked": 42 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPolicy {
    /// Use this seed for every page, regardless of per-page variation
    Locked(u64),
    /// Derive the seed from the profile and reference image
    #[default]
    Auto,
    /// Send no seed at all
    Disabled,
}

/// Reduce into `1..SEED_MODULUS`.
fn reduce(value: u64) -> u64 {
    match value % SEED_MODULUS {
        0 => 1,
        seed => seed,
    }
}

fn normalized(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Derive a stable seed from the child's identity fields and reference image.
///
/// # Examples
///
/// ```
/// use kidbook_continuity::{SEED_MODULUS, derive_seed};
/// use kidbook_core::Profile;
/// use serde_json::json;
///
/// let profile = Profile::from_mapping(json!({"name": "Mia"}).as_object().unwrap()).unwrap();
/// let seed = derive_seed(&profile, "mia.jpg");
///
/// assert_eq!(seed, derive_seed(&profile, "mia.jpg"));
/// assert!(seed >= 1 && seed < SEED_MODULUS);
/// ```
#[instrument(skip(profile), fields(child = %profile.name()))]
pub fn derive_seed(profile: &Profile, reference_image: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(normalized(profile.name()).as_bytes());

    let optional_fields = [
        profile.nickname(),
        profile.gender(),
        profile.favorite_theme(),
        profile.desired_takeaway(),
        profile.personal_notes(),
    ];
    for value in optional_fields.into_iter().flatten() {
        hasher.update(normalized(value).as_bytes());
    }

    if let Some(age) = profile.age() {
        hasher.update(age.to_string().as_bytes());
    }

    if !profile.hobbies().is_empty() {
        let mut hobbies: Vec<String> = profile.hobbies().iter().map(|h| normalized(h)).collect();
        hobbies.sort();
        hasher.update(hobbies.join(",").as_bytes());
    }

    hasher.update(reference_image.trim().as_bytes());

    let digest = hasher.finalize();
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    let seed = reduce(u64::from_be_bytes(prefix));
    debug!(seed, "Derived base seed");
    seed
}

/// Base seed for a run under `policy`.
///
/// A locked seed is reduced into range, with zero mapped to one.
pub fn resolve_base_seed(policy: &SeedPolicy, profile: &Profile, reference_image: &str) -> Option<u64> {
    match policy {
        SeedPolicy::Locked(seed) => Some(reduce(*seed)),
        SeedPolicy::Auto => Some(derive_seed(profile, reference_image)),
        SeedPolicy::Disabled => None,
    }
}

/// Seed for one page.
///
/// Locked seeds never vary. Otherwise, when `vary_per_page` is set, page `k`
/// gets `(base + k - 1) % SEED_MODULUS`, falling back to `base` if that lands
/// on zero. Page numbers below one count as page one.
///
/// # Examples
///
/// ```
/// use kidbook_continuity::{SeedPolicy, seed_for_page};
///
/// assert_eq!(seed_for_page(Some(100), &SeedPolicy::Auto, true, 1), Some(100));
/// assert_eq!(seed_for_page(Some(100), &SeedPolicy::Auto, true, 4), Some(103));
/// assert_eq!(seed_for_page(Some(100), &SeedPolicy::Auto, false, 4), Some(100));
/// assert_eq!(seed_for_page(Some(7), &SeedPolicy::Locked(7), true, 4), Some(7));
/// assert_eq!(seed_for_page(None, &SeedPolicy::Disabled, true, 4), None);
/// ```
pub fn seed_for_page(
    base: Option<u64>,
    policy: &SeedPolicy,
    vary_per_page: bool,
    page_number: u32,
) -> Option<u64> {
    let base = base?;
    if matches!(policy, SeedPolicy::Locked(_)) || !vary_per_page {
        return Some(base);
    }

    let offset = u64::from(page_number.saturating_sub(1));
    match (base + offset) % SEED_MODULUS {
        0 => Some(base),
        seed => Some(seed),
    }
}
