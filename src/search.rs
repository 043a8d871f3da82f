//! Size search engine.
//!
//! Finds the largest width whose encoded size fits a byte budget by binary
//! search over pixel widths. Encoded size is treated as a black box
//! `Size -> bytes`: the engine knows nothing about images, only about the
//! cost function it is handed.
//!
//! ## Algorithm
//!
//! ```text
//! min = budget / (4 * height)        assumed feasible, never measured
//! max = width
//! try = original size                first trial is always unscaled
//! loop:
//!     bytes = cost(try)
//!     bytes > budget  →  max = try.width - 1
//!     otherwise       →  min = try.width
//!     stop when max <= min + 1
//!     try = (min + max) / 2, height from the aspect ratio
//! result = min
//! ```
//!
//! The result is the lower bound `min`, not the widest trial that was
//! measured to fit. The two can differ, for example when the loop stops with
//! `max == min + 1` and `max` was never tried. [`SearchOutcome::last_feasible`]
//! exposes the widest measured fit alongside it.
//!
//! Each iteration costs one full resize + encode, so the search performs
//! O(log width) expensive calls. [`SearchOptions::max_trials`] bounds that
//! count when set; unset, the search runs until the bounds converge.

use crate::imaging::{Size, heuristic_lower_bound};
use crate::resize::ResizeEvent;
use std::sync::mpsc::Sender;

/// Tunables for a single search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Stop after this many cost evaluations and return the current lower
    /// bound. `None` searches until the bounds converge.
    pub max_trials: Option<u32>,
}

/// Width bounds narrowed by the search.
///
/// `min_width` is the widest width currently believed to fit; `max_width` is
/// the widest width not yet ruled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBounds {
    pub min_width: u32,
    pub max_width: u32,
}

impl SearchBounds {
    pub fn new(original: Size, budget: u64) -> Self {
        Self {
            min_width: heuristic_lower_bound(original, budget),
            max_width: original.width,
        }
    }

    /// Next width to try.
    pub fn midpoint(&self) -> u32 {
        ((u64::from(self.min_width) + u64::from(self.max_width)) / 2) as u32
    }

    /// Fold one trial result into the bounds.
    pub fn record(&mut self, width: u32, fits: bool) {
        if fits {
            self.min_width = width;
        } else {
            self.max_width = width.saturating_sub(1);
        }
    }

    pub fn converged(&self) -> bool {
        self.max_width <= self.min_width.saturating_add(1)
    }
}

/// Result of a completed search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Winning size: the final lower bound, with height from the aspect ratio.
    pub size: Size,
    /// Number of cost evaluations performed.
    pub trials: u32,
    /// Widest trial width that was measured to fit, if any.
    pub last_feasible: Option<u32>,
    /// True when [`SearchOptions::max_trials`] ended the search early.
    pub capped: bool,
}

impl SearchOutcome {
    fn degenerate() -> Self {
        Self {
            size: Size::default(),
            trials: 0,
            last_feasible: None,
            capped: false,
        }
    }
}

/// Find the largest width of `original` whose `cost` fits within `budget`.
///
/// `cost` is called once per trial with the candidate size and must return
/// the encoded byte length. Its first error aborts the search. A degenerate
/// `original` (zero width or height) returns a 0×0 outcome without calling
/// `cost`.
pub fn find_optimal_width<F, E>(
    original: Size,
    budget: u64,
    options: &SearchOptions,
    mut cost: F,
    events: Option<&Sender<ResizeEvent>>,
) -> Result<SearchOutcome, E>
where
    F: FnMut(Size) -> Result<u64, E>,
{
    if original.is_degenerate() {
        return Ok(SearchOutcome::degenerate());
    }

    let mut bounds = SearchBounds::new(original, budget);
    let mut try_size = original;
    let mut trials = 0u32;
    let mut last_feasible: Option<u32> = None;
    let mut capped = false;

    loop {
        let bytes = cost(try_size)?;
        trials += 1;
        let fits = bytes <= budget;
        if fits {
            last_feasible = last_feasible.max(Some(try_size.width));
        }
        bounds.record(try_size.width, fits);

        if let Some(tx) = events {
            tx.send(ResizeEvent::Trial {
                index: trials,
                size: try_size,
                bytes,
                fits,
            })
            .ok();
        }

        if bounds.converged() {
            break;
        }
        if options.max_trials.is_some_and(|cap| trials >= cap) {
            capped = true;
            break;
        }
        try_size = original.with_width(bounds.midpoint());
    }

    Ok(SearchOutcome {
        size: original.with_width(bounds.min_width),
        trials,
        last_feasible,
        capped,
    })
}
