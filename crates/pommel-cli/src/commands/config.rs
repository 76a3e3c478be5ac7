//! `pommel config`: print the resolved configuration, password masked.

use pommel_core::config::RunConfig;

pub fn execute(config: &RunConfig) -> anyhow::Result<i32> {
    println!("{}", serde_json::to_string_pretty(&config.summary())?);
    Ok(0)
}
