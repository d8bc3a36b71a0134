//! Help and usage text rendering.

use super::registry::{CommandSpec, Registry};

/// Text shown for `hk` with no command and by `hk help`.
pub fn top_level(registry: &Registry) -> String {
    let listed: Vec<&CommandSpec> = registry.iter().filter(|c| c.is_listed()).collect();
    format!(
        "Usage: hk <command> [-a <app>] [options] [arguments]\n\n\
         Commands:\n\n{}\n\
         Run 'hk help [command]' for details.\n\
         Run 'hk help more' for additional commands.\n",
        command_list(&listed)
    )
}

/// Text shown by `hk help more`.
pub fn more(registry: &Registry) -> String {
    let extras: Vec<&CommandSpec> = registry.iter().filter(|c| c.is_extra()).collect();
    let width = extras.iter().map(|c| c.full_usage().len()).max().unwrap_or(0);
    let lines: String = extras
        .iter()
        .map(|c| format!("    hk {:<width$}  # {}\n", c.full_usage(), c.short_help()))
        .collect();
    format!("Additional commands, full usage:\n\n{lines}")
}

fn command_list(specs: &[&CommandSpec]) -> String {
    let width = specs.iter().map(|c| c.name().len()).max().unwrap_or(0);
    specs
        .iter()
        .map(|c| format!("    {:<width$}  {}\n", c.name(), c.short_help()))
        .collect()
}
