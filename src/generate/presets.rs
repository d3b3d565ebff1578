//! Fixed key sets checked by the `targeted` and `two-letter` commands

use std::collections::BTreeSet;

use super::filter::LETTERS;
use crate::domain::qualify;

/// Meaningful short `.ai` names worth a look for a homelab
pub const TARGETED: &[&str] = &[
    // jax variations
    "jax.ai", "jxl.ai", "jxb.ai", "jxk.ai", "jxn.ai", "jxs.ai",
    // lab variations
    "lab.ai", "jab.ai", "jal.ai", "jlb.ai",
    // short tech terms
    "dev.ai", "ops.ai", "net.ai", "hub.ai", "sys.ai", "kod.ai",
    "box.ai", "pod.ai", "node.ai", "core.ai", "edge.ai",
    // pronounceable
    "jak.ai", "jex.ai", "zax.ai", "pax.ai", "kex.ai", "vex.ai",
    "nyx.ai", "lux.ai", "rax.ai", "dax.ai", "kax.ai", "wax.ai",
    // fun
    "zap.ai", "zip.ai", "zen.ai", "yak.ai", "fox.ai", "hex.ai",
    "max.ai", "rex.ai", "neo.ai", "ace.ai", "sky.ai", "bay.ai",
    // tech-adjacent
    "bit.ai", "cpu.ai", "ram.ai", "tcp.ai", "udp.ai", "dns.ai",
    "lan.ai", "wan.ai", "api.ai", "cli.ai", "git.ai", "ssh.ai",
];

/// The curated list, de-duplicated and sorted
pub fn targeted() -> Vec<String> {
    TARGETED
        .iter()
        .map(|d| d.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Every two-letter label `aa..zz` under `tld`
pub fn two_letter(tld: &str) -> Vec<String> {
    LETTERS
        .iter()
        .flat_map(|&a| LETTERS.iter().map(move |&b| qualify(&format!("{a}{b}"), tld)))
        .collect()
}
