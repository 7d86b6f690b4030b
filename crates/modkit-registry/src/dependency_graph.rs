//! Removal-consequence analysis for installed modules.

use std::collections::BTreeSet;

use crate::module::ModuleManifest;
use crate::sanity::unmet_dependencies;

/// The transitive set of identifiers that must go when `seed` is removed.
///
/// Fixed point over the hypothetical post-removal set: drop everything in
/// the working set, ask what now has unmet dependencies, fold those
/// identifiers in, repeat until nothing new breaks. Runs as a loop rather
/// than recursion; each round strictly grows the working set, which is
/// bounded by the installed set, so it terminates.
///
/// The seed is always part of the result, even for identifiers that are
/// not installed at all. Auto-detected DLLs act purely as dependency
/// satisfiers; they are never candidates for removal. Conflicts do not
/// propagate removal, only unmet dependencies do.
pub fn find_reverse_dependencies(
    seed: &BTreeSet<String>,
    installed: &[&ModuleManifest],
    dlls: &BTreeSet<String>,
) -> BTreeSet<String> {
    let mut to_remove = seed.clone();

    loop {
        let hypothetical: Vec<&ModuleManifest> = installed
            .iter()
            .copied()
            .filter(|module| !to_remove.contains(&module.identifier))
            .collect();

        let broken: BTreeSet<String> = unmet_dependencies(&hypothetical, dlls)
            .into_values()
            .flatten()
            .collect();

        if broken.iter().all(|identifier| to_remove.contains(identifier)) {
            return to_remove;
        }

        to_remove.extend(broken);
    }
}
