//! Folding one catalog into groups of duplicate detections.
//!
//! The catalog is matched against itself, then indices are visited in ascending
//! order. Each index not yet claimed opens a class, becomes its canonical member,
//! and claims every still-unclaimed index in its match group.
//!
//! Membership follows chains of matches in claiming order, so a class is not a
//! clique: `a` may share a class with `c` through `b` even when `a` and `c` are
//! farther apart than the tolerance. The result also depends on input order.

use tracing::debug;

use super::{MatchConfig, MatchGroup, Neighbor, RaSortedIndex};
use crate::coordinate::CoordinateSet;
use crate::error::{MatchError, Result};

/// Whether a coordinate belongs to its own self-match group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelfMatchPolicy {
    /// Every index is in its own group at zero separation, even with a zero tolerance.
    #[default]
    IncludeSelf,
    /// Groups contain only other indices.
    ExcludeSelf,
}

/// A canonical index and every index folded into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivalenceClass {
    /// Lowest index in the class.
    pub canonical: usize,
    /// All member indices, canonical first, the rest ascending.
    pub members: Vec<usize>,
}

/// A partition of `0..n` into equivalence classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniqueCoordinates {
    classes: Vec<EquivalenceClass>,
}

impl UniqueCoordinates {
    pub fn classes(&self) -> &[EquivalenceClass] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Canonical index of every class, in discovery (ascending) order.
    pub fn iunique(&self) -> Vec<usize> {
        self.classes.iter().map(|c| c.canonical).collect()
    }

    /// Member indices of every class, parallel to [`iunique`](Self::iunique).
    pub fn iextras(&self) -> Vec<Vec<usize>> {
        self.classes.iter().map(|c| c.members.clone()).collect()
    }

    /// Class number of each input index.
    pub fn labels(&self) -> Vec<usize> {
        let n: usize = self.classes.iter().map(|c| c.members.len()).sum();
        let mut labels = vec![0; n];
        for (class_id, class) in self.classes.iter().enumerate() {
            for &i in &class.members {
                labels[i] = class_id;
            }
        }
        labels
    }
}

/// Match `set` against itself and apply `policy` to each index's own entry.
pub fn self_match_groups(
    set: &CoordinateSet,
    config: &MatchConfig,
    policy: SelfMatchPolicy,
) -> Result<Vec<MatchGroup>> {
    let mut groups = RaSortedIndex::new(set).all_matches(set, config)?;
    for (i, group) in groups.iter_mut().enumerate() {
        match policy {
            SelfMatchPolicy::IncludeSelf => {
                if !group.contains(i) {
                    group.neighbors.push(Neighbor {
                        index: i,
                        separation_arcsec: 0.0,
                    });
                    group.neighbors.sort_by(|a, b| {
                        a.separation_arcsec
                            .total_cmp(&b.separation_arcsec)
                            .then(a.index.cmp(&b.index))
                    });
                }
            }
            SelfMatchPolicy::ExcludeSelf => group.neighbors.retain(|n| n.index != i),
        }
    }
    Ok(groups)
}

/// Partition `set` into classes of coordinates linked by separations below
/// `tol_arcsec`, using the default RA window.
pub fn unique_coordinates(
    set: &CoordinateSet,
    tol_arcsec: f64,
    policy: SelfMatchPolicy,
) -> Result<UniqueCoordinates> {
    unique_coordinates_with(set, &MatchConfig::new(tol_arcsec), policy)
}

/// Like [`unique_coordinates`], with full control over the matching configuration.
pub fn unique_coordinates_with(
    set: &CoordinateSet,
    config: &MatchConfig,
    policy: SelfMatchPolicy,
) -> Result<UniqueCoordinates> {
    let groups = self_match_groups(set, config, policy)?;

    if policy == SelfMatchPolicy::IncludeSelf {
        if let Some(i) = (0..groups.len()).find(|&i| !groups[i].contains(i)) {
            return Err(MatchError::internal(format!(
                "index {i} is missing from its own match group"
            )));
        }
    }

    let classes = claim_classes(&groups);
    verify_partition(set.len(), &classes)?;

    debug!(
        "Resolved {} coordinates into {} unique classes",
        set.len(),
        classes.len()
    );
    Ok(UniqueCoordinates { classes })
}

fn claim_classes(groups: &[MatchGroup]) -> Vec<EquivalenceClass> {
    let mut claimed = vec![false; groups.len()];
    let mut classes = Vec::new();

    for (i, group) in groups.iter().enumerate() {
        if claimed[i] {
            continue;
        }
        claimed[i] = true;
        let mut members = vec![i];

        let mut others: Vec<usize> = group.indices().filter(|&j| j != i).collect();
        others.sort_unstable();
        for j in others {
            if !claimed[j] {
                claimed[j] = true;
                members.push(j);
            }
        }
        classes.push(EquivalenceClass {
            canonical: i,
            members,
        });
    }
    classes
}

/// Every index in `0..n` must appear in exactly one class, and each canonical
/// index must be its class's lowest member.
fn verify_partition(n: usize, classes: &[EquivalenceClass]) -> Result<()> {
    let mut seen = vec![false; n];
    for class in classes {
        if class.members.first() != Some(&class.canonical)
            || class.members.iter().any(|&i| i < class.canonical)
        {
            return Err(MatchError::internal(format!(
                "class {} is not led by its lowest member",
                class.canonical
            )));
        }
        for &i in &class.members {
            let Some(slot) = seen.get_mut(i) else {
                return Err(MatchError::internal(format!(
                    "index {i} is outside the input range 0..{n}"
                )));
            };
            if *slot {
                return Err(MatchError::internal(format!(
                    "index {i} assigned to more than one class"
                )));
            }
            *slot = true;
        }
    }
    match seen.iter().position(|&s| !s) {
        Some(i) => Err(MatchError::internal(format!(
            "index {i} was not assigned to any class"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::DEG_PER_ASEC;

    fn set(ra: &[f64], dec: &[f64]) -> CoordinateSet {
        CoordinateSet::from_radec(ra, dec).unwrap()
    }

    /// A triple, a pair and a single, interleaved along the equator.
    fn clustered() -> CoordinateSet {
        set(
            &[
                10.0,
                50.0,
                10.0 + 0.3 * DEG_PER_ASEC,
                80.0,
                50.0 + 0.4 * DEG_PER_ASEC,
                10.0 - 0.2 * DEG_PER_ASEC,
            ],
            &[0.0; 6],
        )
    }

    #[test]
    fn groups_duplicates_with_lowest_canonical() {
        let unique = unique_coordinates(&clustered(), 1.0, SelfMatchPolicy::IncludeSelf).unwrap();
        assert_eq!(unique.iunique(), vec![0, 1, 3]);
        assert_eq!(unique.iextras(), vec![vec![0, 2, 5], vec![1, 4], vec![3]]);
        assert_eq!(unique.labels(), vec![0, 1, 0, 2, 1, 0]);
    }

    #[test]
    fn exclude_self_gives_same_partition() {
        let include = unique_coordinates(&clustered(), 1.0, SelfMatchPolicy::IncludeSelf).unwrap();
        let exclude = unique_coordinates(&clustered(), 1.0, SelfMatchPolicy::ExcludeSelf).unwrap();
        assert_eq!(include, exclude);
    }

    #[test]
    fn self_policy_controls_group_contents() {
        let config = MatchConfig::new(1.0);
        let with_self =
            self_match_groups(&clustered(), &config, SelfMatchPolicy::IncludeSelf).unwrap();
        let without_self =
            self_match_groups(&clustered(), &config, SelfMatchPolicy::ExcludeSelf).unwrap();
        for i in 0..6 {
            assert!(with_self[i].contains(i));
            assert_eq!(with_self[i].neighbors[0].index, i);
            assert!(!without_self[i].contains(i));
            assert_eq!(with_self[i].len(), without_self[i].len() + 1);
        }
        assert!(without_self[3].is_empty());
    }

    #[test]
    fn zero_tolerance_still_includes_self() {
        let config = MatchConfig::new(0.0);
        let groups =
            self_match_groups(&clustered(), &config, SelfMatchPolicy::IncludeSelf).unwrap();
        assert!(groups.iter().enumerate().all(|(i, g)| g.len() == 1 && g.contains(i)));

        let unique = unique_coordinates(&clustered(), 0.0, SelfMatchPolicy::IncludeSelf).unwrap();
        assert_eq!(unique.len(), 6);
    }

    #[test]
    fn chains_are_claimed_in_order() {
        // a-b and b-c are within 1", a-c is not
        let step = 0.8 * DEG_PER_ASEC;
        let chain = set(&[20.0, 20.0 + step, 20.0 + 2.0 * step], &[0.0; 3]);
        let unique = unique_coordinates(&chain, 1.0, SelfMatchPolicy::IncludeSelf).unwrap();
        // 0 claims 1; 2 is only reachable through 1 and opens its own class
        assert_eq!(unique.iextras(), vec![vec![0, 1], vec![2]]);

        // the middle element first: it claims both neighbours
        let reordered = set(&[20.0 + step, 20.0, 20.0 + 2.0 * step], &[0.0; 3]);
        let unique = unique_coordinates(&reordered, 1.0, SelfMatchPolicy::IncludeSelf).unwrap();
        assert_eq!(unique.iextras(), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn empty_input_gives_no_classes() {
        let unique =
            unique_coordinates(&CoordinateSet::default(), 1.0, SelfMatchPolicy::IncludeSelf)
                .unwrap();
        assert!(unique.is_empty());
        assert!(unique.labels().is_empty());
    }

    #[test]
    fn verify_partition_detects_defects() {
        let dup = vec![
            EquivalenceClass {
                canonical: 0,
                members: vec![0, 1],
            },
            EquivalenceClass {
                canonical: 1,
                members: vec![1],
            },
        ];
        assert!(matches!(
            verify_partition(2, &dup),
            Err(MatchError::InternalConsistencyViolation { .. })
        ));

        let missing = vec![EquivalenceClass {
            canonical: 0,
            members: vec![0],
        }];
        assert!(verify_partition(2, &missing).is_err());

        let bad_canonical = vec![EquivalenceClass {
            canonical: 1,
            members: vec![1, 0],
        }];
        assert!(verify_partition(2, &bad_canonical).is_err());

        let ok = vec![
            EquivalenceClass {
                canonical: 0,
                members: vec![0, 2],
            },
            EquivalenceClass {
                canonical: 1,
                members: vec![1],
            },
        ];
        assert!(verify_partition(3, &ok).is_ok());
    }
}
