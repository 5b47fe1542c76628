/// Ordered record of a GPU resource teardown.
///
/// Teardown is best-effort: a failed step is noted and the remaining groups
/// are still released.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    released: Vec<&'static str>,
    failures: Vec<(&'static str, String)>,
}

impl TeardownReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, group: &'static str) {
        log::debug!("released {group}");
        self.released.push(group);
    }

    pub fn fail(&mut self, step: &'static str, err: impl std::fmt::Display) {
        let message = err.to_string();
        log::warn!("teardown step `{step}` failed: {message}");
        self.failures.push((step, message));
    }

    /// Released resource groups, in release order.
    pub fn released(&self) -> &[&'static str] {
        &self.released
    }

    pub fn failures(&self) -> &[(&'static str, String)] {
        &self.failures
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Position of `group` in the release order.
    pub fn position(&self, group: &str) -> Option<usize> {
        self.released.iter().position(|g| *g == group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_do_not_stop_later_records() {
        let mut report = TeardownReport::new();
        report.record("queue flush");
        report.fail("queue flush", "device lost");
        report.record("device");

        assert!(!report.is_clean());
        assert_eq!(report.released(), &["queue flush", "device"]);
        assert_eq!(report.failures()[0].1, "device lost");
        assert_eq!(report.position("device"), Some(1));
        assert_eq!(report.position("swapchain"), None);
    }
}
