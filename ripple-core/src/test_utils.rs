//! Shared test utilities for `ripple-core`.

use std::{cell::RefCell, rc::Rc};

use proptest::test_runner::Config as ProptestConfig;
use ripple_test_support::ci::property_test_profile::PropertyRunProfile;

use crate::{Graph, Progress, ProgressObserver};

const COVERAGE_CASE_CAP: u32 = 16;

/// Builds a proptest configuration from the shared run profile so every
/// property suite honours the same `RIPPLE_PBT_CASES` override.
///
/// Instrumented coverage builds run at most [`COVERAGE_CASE_CAP`] cases.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = PropertyRunProfile::from_env(default_cases);
    let cases = if cfg!(coverage) {
        profile.cases().min(COVERAGE_CASE_CAP)
    } else {
        profile.cases()
    };
    ProptestConfig {
        cases,
        max_shrink_iters: profile.max_shrink_iters(),
        ..ProptestConfig::default()
    }
}

/// Four-node fixture: `0 - {1, 2}` and `1 - 3`.
#[must_use]
pub(crate) fn diamond_tail() -> Graph {
    match Graph::from_links(4, &[(0, 1), (0, 2), (1, 3)]) {
        Ok(graph) => graph,
        Err(err) => panic!("fixture links are valid: {err}"),
    }
}

/// Snapshots captured by a [`recording_observer`].
pub(crate) type Recorded = Rc<RefCell<Vec<Progress>>>;

/// Returns an observer that appends every snapshot to the shared buffer.
pub(crate) fn recording_observer() -> (impl ProgressObserver + 'static, Recorded) {
    let recorded: Recorded = Rc::default();
    let sink = Rc::clone(&recorded);
    let observer = move |progress: &Progress| sink.borrow_mut().push(progress.clone());
    (observer, recorded)
}
