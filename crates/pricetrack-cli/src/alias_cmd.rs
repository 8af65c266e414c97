//! Alias-engine subcommands: proposal generation and reviewed-file summary.

use anyhow::Context;
use pricetrack_alias::{
    build_proposals, load_alias_settings, load_approved, load_canonical_products,
    write_proposals, MatchType,
};
use pricetrack_core::{load_catalog, AppConfig};

/// Generates the proposal table for human review and prints a summary.
pub fn generate(config: &AppConfig) -> anyhow::Result<()> {
    let catalog = load_catalog(&config.catalog_path).context("loading catalog")?;
    let canonical = load_canonical_products(&config.canonical_products_path)
        .context("loading canonical product list")?;
    let settings =
        load_alias_settings(&config.alias_config_path).context("loading alias settings")?;

    let rows = build_proposals(&catalog.products, &canonical, &settings);
    write_proposals(&config.alias_proposal_path, &rows).context("writing proposal table")?;

    let manual = rows
        .iter()
        .filter(|r| r.match_type == MatchType::Manual)
        .count();
    let fuzzy = rows
        .iter()
        .filter(|r| {
            matches!(
                r.match_type,
                MatchType::Exact | MatchType::Partial | MatchType::Keyword
            )
        })
        .count();
    let none = rows
        .iter()
        .filter(|r| r.match_type == MatchType::None)
        .count();

    println!(
        "Generated mapping: {}",
        config.alias_proposal_path.display()
    );
    println!("  Total:  {} products", rows.len());
    println!("  Manual: {manual}");
    println!("  Fuzzy:  {fuzzy}");
    println!("  None:   {none}");
    Ok(())
}

/// Lists the approved aliases a warehouse upload would consume.
pub fn approved(config: &AppConfig) -> anyhow::Result<()> {
    let result =
        load_approved(&config.alias_proposal_path).context("reading reviewed proposal table")?;

    for alias in &result.aliases {
        println!(
            "{} -> product_id={} (unit_id={}, {})",
            alias.source_product_key, alias.canonical_product_id, alias.unit_id, alias.match_type
        );
    }
    println!(
        "{} approved, {} unresolved",
        result.aliases.len(),
        result.unresolved
    );
    Ok(())
}
