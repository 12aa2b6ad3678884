//! Process-wide memo of whole-tree compile results.
//!
//! Results are keyed by the root bundle's [`Fingerprint`]. Each key owns a
//! [`OnceCell`]: the first caller runs the compile while concurrent callers
//! for the same key block on the cell and then share its value. A failed
//! compile leaves the cell empty, so the next caller retries.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use sheaf_graph::Fingerprint;
use tracing::trace;

use crate::Result;
use crate::compiler::CompileOutput;

type Slot = Arc<OnceCell<Arc<CompileOutput>>>;

#[derive(Debug, Default)]
pub struct CompileMemo {
    slots: DashMap<Fingerprint, Slot>,
}

impl CompileMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached output for `fingerprint`, running `compile` if there is
    /// none yet.
    ///
    /// At most one `compile` runs per fingerprint at a time.
    pub fn get_or_try_compile<F>(&self, fingerprint: &Fingerprint, compile: F) -> Result<Arc<CompileOutput>>
    where
        F: FnOnce() -> Result<CompileOutput>,
    {
        // Clone the slot out so the shard lock is released before blocking.
        let slot = Arc::clone(&self.slots.entry(fingerprint.clone()).or_default());

        if let Some(output) = slot.get() {
            trace!(%fingerprint, "compile memo hit");
            return Ok(Arc::clone(output));
        }

        match slot.get_or_try_init(|| compile().map(Arc::new)) {
            Ok(output) => Ok(Arc::clone(output)),
            Err(e) => {
                self.slots
                    .remove_if(fingerprint, |_, slot| slot.get().is_none());
                Err(e)
            }
        }
    }

    /// The cached output for `fingerprint`, if any.
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<Arc<CompileOutput>> {
        self.slots
            .get(fingerprint)
            .and_then(|slot| slot.get().cloned())
    }

    /// Drop the entry for `fingerprint`. Returns whether one was cached.
    pub fn invalidate(&self, fingerprint: &Fingerprint) -> bool {
        self.slots
            .remove(fingerprint)
            .is_some_and(|(_, slot)| slot.get().is_some())
    }

    pub fn clear(&self) {
        self.slots.clear();
    }

    /// Number of completed entries.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|e| e.value().get().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use sheaf_graph::{MimeKind, Resource};
    use std::sync::Barrier;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    fn output(name: &str) -> CompileOutput {
        CompileOutput::new(vec![Resource::new(
            MimeKind::Script,
            format!("/out/{name}.js"),
            format!("/{name}.js"),
        )])
    }

    fn key(hex: &str) -> Fingerprint {
        Fingerprint::from_hex(hex)
    }

    #[test]
    fn test_second_call_is_a_hit() {
        let memo = CompileMemo::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let out = memo
                .get_or_try_compile(&key("a"), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(output("a"))
                })
                .unwrap();
            assert_eq!(out.len(), 1);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(memo.len(), 1);
        assert!(memo.get(&key("a")).is_some());
    }

    #[test]
    fn test_failure_is_not_cached() {
        let memo = CompileMemo::new();

        let err = memo
            .get_or_try_compile(&key("a"), || Err(Error::InvalidConfig("broken".to_string())))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(memo.is_empty());
        assert!(memo.get(&key("a")).is_none());

        let out = memo.get_or_try_compile(&key("a"), || Ok(output("a"))).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn test_invalidate_and_clear() {
        let memo = CompileMemo::new();
        memo.get_or_try_compile(&key("a"), || Ok(output("a"))).unwrap();
        memo.get_or_try_compile(&key("b"), || Ok(output("b"))).unwrap();

        assert!(memo.invalidate(&key("a")));
        assert!(!memo.invalidate(&key("a")));
        assert_eq!(memo.len(), 1);

        memo.clear();
        assert!(memo.is_empty());
    }

    #[test]
    fn test_concurrent_callers_compile_once() {
        let memo = Arc::new(CompileMemo::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let memo = Arc::clone(&memo);
                let calls = Arc::clone(&calls);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    memo.get_or_try_compile(&key("shared"), || {
                        calls.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(20));
                        Ok(output("shared"))
                    })
                    .unwrap()
                })
            })
            .collect();

        let outputs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(outputs.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }
}
