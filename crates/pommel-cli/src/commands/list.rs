//! `pommel list`: print scenario names and tags.

use crate::scenarios;

pub fn execute() -> anyhow::Result<i32> {
    for scenario in scenarios::suite().scenarios() {
        println!("{}  [{}]", scenario.name, scenario.tags.join(", "));
    }
    Ok(0)
}
