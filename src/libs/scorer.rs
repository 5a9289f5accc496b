use crate::libs::blast::Hsp;
use crate::libs::settings::Thresholds;

/// Identity and coverage of one HSP.
///
/// Counts are kept as integers; cutoffs are compared by cross-multiplying,
/// so an exact integer percentage always meets its own cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitScore {
    pub identities: usize,
    pub align_len: usize,
    pub ref_len: usize,
}

impl HitScore {
    /// ```
    /// use orthocat::libs::scorer::HitScore;
    /// let s = HitScore::compute(90, 100, 125);
    /// assert_eq!(s.identity(), 90.0);
    /// assert_eq!(s.coverage(), 80.0);
    /// ```
    pub fn compute(identities: usize, align_len: usize, ref_len: usize) -> Self {
        Self {
            identities,
            align_len,
            ref_len,
        }
    }

    pub fn of(hsp: &Hsp, ref_len: usize) -> Self {
        Self::compute(hsp.identities, hsp.align_len, ref_len)
    }

    /// identities / alignment length * 100
    pub fn identity(&self) -> f64 {
        percent(self.identities, self.align_len)
    }

    /// alignment length / reference length * 100
    pub fn coverage(&self) -> f64 {
        percent(self.align_len, self.ref_len)
    }

    /// Both values reach their cutoffs.
    pub fn passes(&self, thresholds: &Thresholds) -> bool {
        reaches(self.identities, self.align_len, thresholds.identity)
            && reaches(self.align_len, self.ref_len, thresholds.coverage)
    }

    /// Integer identity as written to the audit table
    pub fn identity_int(&self) -> u64 {
        percent_int(self.identities, self.align_len)
    }

    pub fn coverage_int(&self) -> u64 {
        percent_int(self.align_len, self.ref_len)
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

fn percent_int(part: usize, whole: usize) -> u64 {
    if whole == 0 {
        0
    } else {
        part as u64 * 100 / whole as u64
    }
}

// part / whole * 100 >= cutoff; an empty whole counts as 0%
fn reaches(part: usize, whole: usize, cutoff: u32) -> bool {
    if whole == 0 {
        cutoff == 0
    } else {
        part as u64 * 100 >= cutoff as u64 * whole as u64
    }
}
