//! Rules command

use hibp_guard_core::RuleRegistry;

/// Print registered rule names, one per line.
pub fn execute() {
    for name in RuleRegistry::with_defaults().names() {
        println!("{name}");
    }
}
