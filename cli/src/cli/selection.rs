use crate::{
    catalog::{self, Catalog},
    cli::{DeselectArgs, PresetArgs, SelectArgs},
    prelude::*,
    state::State,
    tables,
};

pub fn devices(catalog: &Catalog) {
    println!("{}", tables::catalog_table(catalog));
}

pub fn select(catalog: &Catalog, state: &mut State, args: &SelectArgs) -> Result {
    for name in &args.names {
        ensure!(catalog.get(name).is_some(), "unknown appliance `{name}`, see `devices`");
        state.select(name, args.quantity);
    }
    info!(n_selected = state.selection.len(), "selection updated");
    Ok(())
}

pub fn deselect(state: &mut State, args: &DeselectArgs) -> Result {
    for name in &args.names {
        ensure!(state.deselect(name), "`{name}` is not selected");
    }
    info!(n_selected = state.selection.len(), "selection updated");
    Ok(())
}

/// Replaces the whole selection, presets do not merge with prior picks.
pub fn preset(catalog: &Catalog, state: &mut State, args: &PresetArgs) -> Result {
    let entries = catalog::preset(&args.id).with_context(|| {
        format!("unknown preset `{}`, available: {}", args.id, catalog::preset_ids().join(", "))
    })?;
    state.selection.clear();
    for (name, quantity) in entries {
        ensure!(
            catalog.get(name).is_some(),
            "the `{}` preset refers to an unknown appliance `{name}`",
            args.id,
        );
        state.select(name, quantity);
    }
    info!(preset = args.id, n_selected = state.selection.len(), "selection replaced");
    Ok(())
}
