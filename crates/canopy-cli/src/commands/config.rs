//! Config command implementation

use crate::output::OutputWriter;
use crate::output_types::ConfigRow;
use anyhow::Result;
use canopy_core::config::LayeredConfig;

pub fn execute(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut entries: Vec<_> = config.to_inspection_map().into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let rows: Vec<ConfigRow> = entries
        .into_iter()
        .map(|(key, (value, source))| ConfigRow::new(key, value, source))
        .collect();

    if !output.is_json() {
        output.section("Configuration");
    }
    output.table(&rows)
}
