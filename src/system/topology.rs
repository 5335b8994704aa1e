//! CPU topology parsing
//!
//! Reads the parseable CPU listing (`lscpu -p`) and decides whether
//! simultaneous multithreading is active on the host.

use serde::{Deserialize, Serialize};

/// One row of the parseable CPU listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorePair {
    /// Id in the first column (`CPU`)
    pub physical: u32,
    /// Id in the second column (`Core`)
    pub logical: u32,
}

impl CorePair {
    /// True when the two ids disagree, i.e. a sibling thread shares the core
    pub fn is_sibling(&self) -> bool {
        self.physical != self.logical
    }
}

/// Parsed CPU topology table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuTopology {
    /// Well-formed rows, in listing order
    pub pairs: Vec<CorePair>,
    /// Number of lines that were skipped
    pub skipped: usize,
}

impl CpuTopology {
    /// Parse the listing; malformed lines are skipped, never reported
    pub fn parse(listing: &str) -> Self {
        let mut topology = CpuTopology::default();

        for line in listing.lines() {
            match parse_pair(line) {
                Some(pair) => topology.pairs.push(pair),
                None => {
                    tracing::debug!("Skipping topology line: {:?}", line);
                    topology.skipped += 1;
                }
            }
        }

        topology
    }

    /// Hyperthreading is on if any row has differing ids
    pub fn hyperthreading_enabled(&self) -> bool {
        self.pairs.iter().any(CorePair::is_sibling)
    }
}

fn parse_pair(line: &str) -> Option<CorePair> {
    let mut fields = line.split(',');
    let physical = fields.next()?.trim().parse::<u32>().ok()?;
    let logical = fields.next()?.trim().parse::<u32>().ok()?;
    Some(CorePair { physical, logical })
}

/// Shorthand for `CpuTopology::parse(listing).hyperthreading_enabled()`
pub fn hyperthreading_enabled(listing: &str) -> bool {
    CpuTopology::parse(listing).hyperthreading_enabled()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LSCPU_HT: &str = "\
# The following is the parsable format, which can be fed to other
# programs. Each different item in every column has an unique ID
# starting from zero.
# CPU,Core,Socket,Node,,L1d,L1i,L2,L3
0,0,0,0,,0,0,0,0
1,1,0,0,,1,1,1,0
2,0,0,0,,0,0,0,0
3,1,0,0,,1,1,1,0
";

    const LSCPU_NO_HT: &str = "\
# CPU,Core,Socket,Node,,L1d,L1i,L2,L3
0,0,0,0,,0,0,0,0
1,1,0,0,,1,1,1,0
2,2,0,0,,2,2,2,0
3,3,0,0,,3,3,3,0
";

    #[test]
    fn test_detects_sibling_threads() {
        let topology = CpuTopology::parse(LSCPU_HT);
        assert_eq!(topology.pairs.len(), 4);
        assert_eq!(topology.skipped, 4);
        assert!(topology.hyperthreading_enabled());
    }

    #[test]
    fn test_no_siblings() {
        assert!(!hyperthreading_enabled(LSCPU_NO_HT));
    }

    #[test]
    fn test_empty_listing() {
        let topology = CpuTopology::parse("");
        assert!(topology.pairs.is_empty());
        assert!(!topology.hyperthreading_enabled());
    }

    #[test]
    fn test_garbage_lines_skipped() {
        let listing = "garbage\n0,x\n,\n5\n2,2\n";
        let topology = CpuTopology::parse(listing);
        assert_eq!(topology.pairs, vec![CorePair { physical: 2, logical: 2 }]);
        assert_eq!(topology.skipped, 4);
    }

    fn render(pairs: &[(u32, u32)], noise: &[String]) -> String {
        let mut out = String::new();
        for (i, (p, l)) in pairs.iter().enumerate() {
            if let Some(n) = noise.get(i) {
                out.push_str(n);
                out.push('\n');
            }
            out.push_str(&format!("{},{},0,0,,0,0,0,0\n", p, l));
        }
        out
    }

    proptest! {
        #[test]
        fn prop_equal_ids_never_hyperthreaded(
            ids in proptest::collection::vec(0u32..512, 0..64),
            noise in proptest::collection::vec("#[a-z ,]{0,20}", 0..64),
        ) {
            let pairs: Vec<(u32, u32)> = ids.iter().map(|&i| (i, i)).collect();
            prop_assert!(!hyperthreading_enabled(&render(&pairs, &noise)));
        }

        #[test]
        fn prop_one_differing_pair_is_hyperthreaded(
            ids in proptest::collection::vec(0u32..512, 0..64),
            noise in proptest::collection::vec("[a-z#]{1,20}", 0..64),
            position in 0usize..64,
            phys in 0u32..512,
            offset in 1u32..512,
        ) {
            let mut pairs: Vec<(u32, u32)> = ids.iter().map(|&i| (i, i)).collect();
            let at = position.min(pairs.len());
            pairs.insert(at, (phys, phys + offset));
            prop_assert!(hyperthreading_enabled(&render(&pairs, &noise)));
        }
    }
}
