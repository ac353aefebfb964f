//! Per-request browser User-Agent strings.
//!
//! A uniform draw over a small static table: browser family, platform and a
//! major version in a bounded modern range. Cosmetic only; it keeps thousands
//! of requests to one host from sharing a single UA.

use rand::seq::SliceRandom;
use rand::Rng;

const PLATFORMS: &[&str] = &[
    "Windows NT 10.0; Win64; x64",
    "Windows NT 6.1; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "Macintosh; Intel Mac OS X 10_14_6",
    "X11; Linux x86_64",
    "X11; Ubuntu; Linux x86_64",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Chrome,
    Firefox,
    Edge,
}

/// (family, lowest major, highest major)
const FAMILIES: &[(Family, u32, u32)] = &[
    (Family::Chrome, 88, 131),
    (Family::Firefox, 91, 132),
    (Family::Edge, 91, 131),
];

/// Draws a User-Agent using the thread-local RNG.
pub fn random_user_agent() -> String {
    random_user_agent_with(&mut rand::thread_rng())
}

/// Draws a User-Agent from `rng`.
pub fn random_user_agent_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let platform = PLATFORMS.choose(rng).copied().unwrap_or(PLATFORMS[0]);
    let (family, lo, hi) = FAMILIES.choose(rng).copied().unwrap_or(FAMILIES[0]);
    let major = rng.gen_range(lo..=hi);

    match family {
        Family::Chrome => format!(
            "Mozilla/5.0 ({platform}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{major}.0.0.0 Safari/537.36"
        ),
        Family::Edge => format!(
            "Mozilla/5.0 ({platform}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{major}.0.0.0 Safari/537.36 Edg/{major}.0.0.0"
        ),
        Family::Firefox => format!(
            "Mozilla/5.0 ({platform}; rv:{major}.0) Gecko/20100101 Firefox/{major}.0"
        ),
    }
}
