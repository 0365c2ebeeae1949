/// An advisory sink for conversion progress.
///
/// Implementations receive a fraction in `[0, 1]` zero or more times
/// while merging, encoding, or decoding. Calls may come from a worker
/// thread, so sinks must be [`Sync`]; there is no backpressure and no
/// ordering guarantee beyond what the caller observes in practice.
pub trait ProgressSink: Sync {
    /// Report the fraction of work completed so far.
    fn report(&self, fraction: f64);
}

/// A sink that discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _fraction: f64) {}
}

/// Adapt a closure into a [`ProgressSink`].
pub fn from_fn<F>(f: F) -> impl ProgressSink
where
    F: Fn(f64) + Sync,
{
    FnSink(f)
}

struct FnSink<F>(F);

impl<F> ProgressSink for FnSink<F>
where
    F: Fn(f64) + Sync,
{
    fn report(&self, fraction: f64) {
        (self.0)(fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn closures_adapt_into_sinks() {
        let seen = Mutex::new(Vec::new());
        let sink = from_fn(|fraction| seen.lock().unwrap().push(fraction));
        sink.report(0.5);
        sink.report(1.0);
        assert_eq!(*seen.lock().unwrap(), vec![0.5, 1.0]);
    }
}
