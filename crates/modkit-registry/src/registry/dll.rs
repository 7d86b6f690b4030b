//! Classification of on-disk plugin paths.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Anchored on the first `GameData/` segment: capture 1 is everything
    /// after it, capture 2 the file stem up to its first dot.
    static ref DLL_PATH_RE: Regex =
        Regex::new(r"(?i)^(?:.*?/)?GameData/((?:.*/)?([^./]+)[^/]*\.dll)$").unwrap();
}

/// Where a plugin file sits under the conventional game-data layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DllLocation {
    /// The mod name derived from the file stem
    pub mod_name: String,
    /// The path relative to (and excluding) the `GameData/` anchor
    pub relative_path: String,
}

/// Parse a scan path of the form `<anything>/GameData/<subpath>/<stem>.dll`.
///
/// `None` when the path has no `GameData/` segment, is not a `.dll`, or
/// its stem is empty (a file named `.dll`); callers treat that as "ignore
/// and warn".
pub fn classify_dll_path(path: &str) -> Option<DllLocation> {
    let captures = DLL_PATH_RE.captures(path)?;

    Some(DllLocation {
        mod_name: captures.get(2)?.as_str().to_string(),
        relative_path: captures.get(1)?.as_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conventional_layout() {
        let loc = classify_dll_path("/home/u/KSP/GameData/FooMod/Plugins/FooMod.dll").unwrap();
        assert_eq!(loc.mod_name, "FooMod");
        assert_eq!(loc.relative_path, "FooMod/Plugins/FooMod.dll");
    }

    #[test]
    fn test_dll_directly_under_gamedata() {
        let loc = classify_dll_path("GameData/FooMod.dll").unwrap();
        assert_eq!(loc.mod_name, "FooMod");
        assert_eq!(loc.relative_path, "FooMod.dll");
    }

    #[test]
    fn test_dotted_suffix_trimmed_from_mod_name() {
        let loc = classify_dll_path("GameData/FooMod/FooMod.v2.dll").unwrap();
        assert_eq!(loc.mod_name, "FooMod");
        assert_eq!(loc.relative_path, "FooMod/FooMod.v2.dll");
    }

    #[test]
    fn test_case_insensitive_anchor() {
        let loc = classify_dll_path("/ksp/gamedata/FooMod/FooMod.DLL").unwrap();
        assert_eq!(loc.mod_name, "FooMod");
    }

    #[test]
    fn test_no_gamedata_segment() {
        assert!(classify_dll_path("/home/u/KSP/Plugins/FooMod.dll").is_none());
        assert!(classify_dll_path("FooMod.dll").is_none());
    }

    #[test]
    fn test_empty_stem() {
        assert!(classify_dll_path("GameData/FooMod/.dll").is_none());
    }

    #[test]
    fn test_not_a_dll() {
        assert!(classify_dll_path("GameData/FooMod/readme.txt").is_none());
        assert!(classify_dll_path("GameData/FooMod/").is_none());
    }

    #[test]
    fn test_gamedata_must_be_a_whole_segment() {
        assert!(classify_dll_path("/ksp/MyGameData/FooMod/FooMod.dll").is_none());
    }

    #[test]
    fn test_first_gamedata_segment_anchors() {
        let loc = classify_dll_path("/ksp/GameData/Sub/GameData/FooMod.dll").unwrap();
        assert_eq!(loc.relative_path, "Sub/GameData/FooMod.dll");
        assert_eq!(loc.mod_name, "FooMod");
    }
}
