//! Proposal-table generation and reviewed-file ingestion.

use std::path::Path;
use std::str::FromStr;

use pricetrack_core::{CatalogProduct, Store};
use tracing::warn;

use crate::csv::{escape, parse_rows};
use crate::matcher::{best_match, MatchType};
use crate::reference::{AliasSettings, CanonicalProduct};
use crate::AliasError;

const PROPOSAL_HEADER: &str =
    "catalog_id,catalog_name,store,source_id,active,canonical_id,canonical_name,unit_id,match_type,approved";

/// Review disposition of a proposal row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approval {
    Yes,
    No,
    Review,
}

impl std::fmt::Display for Approval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Approval::Yes => write!(f, "Y"),
            Approval::No => write!(f, "N"),
            Approval::Review => write!(f, "?"),
        }
    }
}

/// One row of the proposal table handed to a human reviewer.
#[derive(Debug, Clone)]
pub struct AliasProposal {
    pub catalog_id: String,
    pub catalog_name: String,
    pub store: Store,
    pub source_id: i64,
    pub active: bool,
    pub canonical_id: Option<i64>,
    pub canonical_name: String,
    pub unit_id: Option<i64>,
    pub match_type: MatchType,
    pub approved: Approval,
}

/// An approved alias as re-read from the reviewed proposal file, in the
/// shape the warehouse-upload collaborator consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductAlias {
    pub source_id: i64,
    pub source_product_key: String,
    pub source_product_name: String,
    pub canonical_product_id: i64,
    pub unit_id: i64,
    pub match_type: MatchType,
    pub approved: bool,
}

/// Result of ingesting a reviewed proposal file: the approved aliases plus
/// the count of rows that stayed unresolved (skipped, not failed).
#[derive(Debug)]
pub struct ApprovedAliases {
    pub aliases: Vec<ProductAlias>,
    pub unresolved: usize,
}

/// Builds one proposal row per catalog entry.
///
/// Manual overrides win outright and come back auto-approved; otherwise the
/// fuzzy matcher picks the best canonical candidate (only `EXACT` is
/// auto-approved); entries with no candidate are emitted as `NONE` so the
/// reviewer sees the full catalog, not just the matches.
#[must_use]
pub fn build_proposals(
    catalog: &[CatalogProduct],
    canonical: &[CanonicalProduct],
    settings: &AliasSettings,
) -> Vec<AliasProposal> {
    let mut rows = Vec::with_capacity(catalog.len());

    for entry in catalog {
        let source_id = settings.source_id(entry.store);

        if let Some(&canonical_id) = settings.overrides.get(&entry.id) {
            if let Some(product) = canonical.iter().find(|c| c.product_id == canonical_id) {
                rows.push(AliasProposal {
                    catalog_id: entry.id.clone(),
                    catalog_name: entry.name.clone(),
                    store: entry.store,
                    source_id,
                    active: entry.active,
                    canonical_id: Some(product.product_id),
                    canonical_name: product.product_name.clone(),
                    unit_id: Some(product.unit_id),
                    match_type: MatchType::Manual,
                    approved: Approval::Yes,
                });
                continue;
            }
            warn!(
                catalog_id = %entry.id,
                canonical_id,
                "manual override points at unknown canonical id; falling back to fuzzy match"
            );
        }

        match best_match(&entry.name, canonical) {
            Some(found) => rows.push(AliasProposal {
                catalog_id: entry.id.clone(),
                catalog_name: entry.name.clone(),
                store: entry.store,
                source_id,
                active: entry.active,
                canonical_id: Some(found.product.product_id),
                canonical_name: found.product.product_name.clone(),
                unit_id: Some(found.product.unit_id),
                match_type: found.match_type,
                approved: if found.match_type == MatchType::Exact {
                    Approval::Yes
                } else {
                    Approval::Review
                },
            }),
            None => rows.push(AliasProposal {
                catalog_id: entry.id.clone(),
                catalog_name: entry.name.clone(),
                store: entry.store,
                source_id,
                active: entry.active,
                canonical_id: None,
                canonical_name: "NO MATCH".to_string(),
                unit_id: None,
                match_type: MatchType::None,
                approved: Approval::No,
            }),
        }
    }

    rows
}

/// Renders the proposal table as CSV, header included.
#[must_use]
pub fn render_proposals(rows: &[AliasProposal]) -> String {
    let mut out = String::from(PROPOSAL_HEADER);
    out.push('\n');
    for row in rows {
        let canonical_id = row.canonical_id.map(|v| v.to_string()).unwrap_or_default();
        let unit_id = row.unit_id.map(|v| v.to_string()).unwrap_or_default();
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            escape(&row.catalog_id),
            escape(&row.catalog_name),
            row.store,
            row.source_id,
            row.active,
            canonical_id,
            escape(&row.canonical_name),
            unit_id,
            row.match_type,
            row.approved,
        ));
    }
    out
}

/// Writes the proposal table to `path`.
///
/// # Errors
///
/// Returns [`AliasError::Io`] on filesystem failure.
pub fn write_proposals(path: &Path, rows: &[AliasProposal]) -> Result<(), AliasError> {
    std::fs::write(path, render_proposals(rows)).map_err(|source| AliasError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Reads a reviewed proposal file back, keeping only rows the reviewer
/// approved (`Y`) that carry a resolvable canonical id and unit id.
///
/// Unapproved or unresolvable rows are counted as `unresolved` and skipped;
/// they are not errors.
///
/// # Errors
///
/// Returns [`AliasError`] when the file is unreadable or the header is
/// missing a required column.
pub fn load_approved(path: &Path) -> Result<ApprovedAliases, AliasError> {
    let content = std::fs::read_to_string(path).map_err(|source| AliasError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_approved(&content)
}

fn parse_approved(content: &str) -> Result<ApprovedAliases, AliasError> {
    let rows = parse_rows(content.trim_start_matches('\u{feff}'));
    let Some((header, data)) = rows.split_first() else {
        return Ok(ApprovedAliases {
            aliases: Vec::new(),
            unresolved: 0,
        });
    };

    let column = |name: &str| -> Result<usize, AliasError> {
        header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| AliasError::Parse {
                line: 1,
                reason: format!("missing column \"{name}\""),
            })
    };

    let catalog_id_col = column("catalog_id")?;
    let catalog_name_col = column("catalog_name")?;
    let source_id_col = column("source_id")?;
    let canonical_id_col = column("canonical_id")?;
    let unit_id_col = column("unit_id")?;
    let match_type_col = column("match_type")?;
    let approved_col = column("approved")?;

    let mut aliases = Vec::new();
    let mut unresolved = 0usize;

    for row in data {
        let cell = |col: usize| row.get(col).map(String::as_str).unwrap_or_default();

        if !cell(approved_col).trim().eq_ignore_ascii_case("y") {
            unresolved += 1;
            continue;
        }

        let canonical_id = cell(canonical_id_col).trim().parse::<i64>();
        let unit_id = cell(unit_id_col).trim().parse::<i64>();
        let (Ok(canonical_product_id), Ok(unit_id)) = (canonical_id, unit_id) else {
            warn!(
                catalog_id = cell(catalog_id_col),
                "approved row has no resolvable canonical mapping; skipping"
            );
            unresolved += 1;
            continue;
        };

        aliases.push(ProductAlias {
            source_id: cell(source_id_col).trim().parse::<i64>().unwrap_or(0),
            source_product_key: cell(catalog_id_col).trim().to_string(),
            source_product_name: cell(catalog_name_col).trim().to_string(),
            canonical_product_id,
            unit_id,
            match_type: MatchType::from_str(cell(match_type_col).trim())
                .unwrap_or(MatchType::None),
            approved: true,
        });
    }

    Ok(ApprovedAliases {
        aliases,
        unresolved,
    })
}
