//! Employee number allocation.
//!
//! Two steps, strictly ordered: the scan derives the next free number from
//! everything the directory already holds, then the assignment walks the
//! eligible entries and hands out consecutive numbers starting there.
//!
//! Running two instances concurrently is unsafe: both would compute the same
//! starting counter. The job assumes external mutual exclusion (a singleton
//! scheduler), it does not lock anything itself.

use tracing::debug;

use crate::config::JobConfig;
use crate::directory::Directory;
use crate::error::{AllocError, AllocResult};

/// Naming attribute fetched for eligible entries; its value becomes the `uid`
/// component of the entry DN.
const NAMING_ATTR: &str = "cn";

/// Outcome of one reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// First free number computed by the scan.
    pub next_before: i64,
    /// First free number after assignment (`next_before + assigned`).
    pub next_after: i64,
    /// Entries that received a number this run.
    pub assigned: u64,
}

/// Scan the user subtree for existing attribute values and return the
/// smallest integer guaranteed to be unused.
///
/// The running maximum is seeded at the configured floor, so an empty
/// directory yields `floor + 1`. A value that does not parse as an integer
/// fails the run: silently skipping a malformed maximum risks handing out a
/// colliding number later.
pub async fn next_free_number(dir: &mut dyn Directory, cfg: &JobConfig) -> AllocResult<i64> {
    let base = cfg.user_base();
    let filter = cfg.scan_filter();
    let attrs = [cfg.attribute.as_str()];
    let mut pages = dir
        .paged_scan(&base, &filter, &attrs, cfg.page_size)
        .await?;

    let mut max = cfg.floor;
    while let Some(page) = pages.next_page().await? {
        for entry in page {
            let raw = entry.first(&cfg.attribute).unwrap_or("");
            let value: i64 = raw.trim().parse().map_err(|_| AllocError::MalformedNumber {
                dn: entry.dn.clone(),
                attribute: cfg.attribute.clone(),
                value: raw.to_string(),
            })?;
            max = max.max(value);
        }
    }
    Ok(max + 1)
}

/// Assign consecutive numbers, starting at `start`, to every role member
/// that does not yet carry the attribute. Returns the next unused number.
///
/// Entries are processed in the order the directory returns them; that order
/// is an external contract the job does not control. Each write is an
/// independent replace: a failure aborts the loop and prior writes stand,
/// which is safe because the next run re-selects only entries still lacking
/// the attribute.
pub async fn assign_numbers(
    dir: &mut dyn Directory,
    cfg: &JobConfig,
    start: i64,
) -> AllocResult<i64> {
    let base = cfg.user_base();
    let filter = cfg.eligible_filter();
    let entries = dir.search(&base, &filter, &[NAMING_ATTR]).await?;

    let mut next = start;
    for entry in &entries {
        let Some(cn) = entry.first(NAMING_ATTR) else {
            return Err(AllocError::MissingAttribute {
                dn: entry.dn.clone(),
                attribute: NAMING_ATTR.to_string(),
            });
        };
        let dn = cfg.entry_dn(cn);
        debug!(%dn, number = next, "assigning employee number");
        dir.replace_attribute(&dn, &cfg.attribute, &next.to_string())
            .await?;
        next += 1;
    }
    Ok(next)
}

/// One full reconciliation: scan, then assign.
pub async fn run_allocation(dir: &mut dyn Directory, cfg: &JobConfig) -> AllocResult<RunReport> {
    let next_before = next_free_number(dir, cfg).await?;
    debug!(next = next_before, "next available employee number");

    let next_after = assign_numbers(dir, cfg, next_before).await?;
    Ok(RunReport {
        next_before,
        next_after,
        assigned: (next_after - next_before) as u64,
    })
}
