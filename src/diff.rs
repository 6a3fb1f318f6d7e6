use log::info;
use strum_macros::Display;
use url::Url;

use crate::error::WatchError;
use crate::notify::Notifier;
use crate::scraper::{PageSource, extract_snapshot};
use crate::snapshot::Snapshot;
use crate::storage::SnapshotStore;

pub const CHANGE_SUBJECT: &str = "Hermès bags page changed!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Outcome {
    #[strum(to_string = "initialized")]
    Initialized,
    #[strum(to_string = "unchanged")]
    Unchanged,
    #[strum(to_string = "changed")]
    Changed,
}

/// What one check saw and decided.
#[derive(Debug)]
pub struct RunResult {
    pub previous: Option<Snapshot>,
    pub current: Snapshot,
    pub outcome: Outcome,
}

impl RunResult {
    pub fn changed(&self) -> bool {
        self.outcome == Outcome::Changed
    }
}

/// Names that appeared or disappeared between two snapshots.
#[derive(Debug, PartialEq, Eq)]
pub struct NameDiff<'a> {
    pub added: Vec<&'a str>,
    pub removed: Vec<&'a str>,
}

impl NameDiff<'_> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

pub fn compute_diff<'a>(previous: &'a Snapshot, current: &'a Snapshot) -> NameDiff<'a> {
    let old_names = previous.names();
    let new_names = current.names();

    NameDiff {
        added: new_names.difference(&old_names).copied().collect(),
        removed: old_names.difference(&new_names).copied().collect(),
    }
}

fn render_list(heading: &str, marker: char, names: &[&str]) -> String {
    if names.is_empty() {
        return String::new();
    }
    let lines: String = names
        .iter()
        .map(|name| format!("  {marker} {name}\n"))
        .collect();
    format!("{heading}:\n{lines}\n")
}

pub fn render_change_body(url: &Url, previous: &Snapshot, current: &Snapshot) -> String {
    let diff = compute_diff(previous, current);
    let summary = if diff.is_empty() {
        String::new()
    } else {
        format!(
            "{}{}",
            render_list("Added", '+', &diff.added),
            render_list("Removed", '-', &diff.removed)
        )
    };

    format!(
        "Hermès bags page has changed.\n\nURL: {url}\n\n{summary}\
         Previous product list:\n{previous}\n\n\
         New product list:\n{current}\n"
    )
}

/// Runs one check of `url` against the stored snapshot.
///
/// The first check only records a baseline. A changed page is persisted
/// before the notifier runs, so a lost email never causes the same change
/// to be reported twice. Only fetch and storage failures are errors.
pub fn run_check<P, S, N>(
    url: &Url,
    source: &P,
    store: &S,
    notifier: &N,
) -> Result<RunResult, WatchError>
where
    P: PageSource,
    S: SnapshotStore,
    N: Notifier,
{
    info!("Checking Hermès page: {url}");

    let previous = store.load()?;
    let current = extract_snapshot(&source.fetch(url)?);

    let Some(previous_snapshot) = &previous else {
        info!("No previous snapshot found. Saving current snapshot and exiting.");
        store.save(&current)?;
        return Ok(RunResult {
            previous,
            current,
            outcome: Outcome::Initialized,
        });
    };

    if *previous_snapshot == current {
        info!("No change in product list.");
        return Ok(RunResult {
            previous,
            current,
            outcome: Outcome::Unchanged,
        });
    }

    info!("CHANGE DETECTED in Hermès product list.");
    info!("Saving new snapshot and sending email...");
    store.save(&current)?;
    notifier.notify(
        CHANGE_SUBJECT,
        &render_change_body(url, previous_snapshot, &current),
    );

    Ok(RunResult {
        previous,
        current,
        outcome: Outcome::Changed,
    })
}
