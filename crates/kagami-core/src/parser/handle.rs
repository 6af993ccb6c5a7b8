//! Shared, reconfigurable access to a [`ReleaseParser`].

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::release::{ParserConfig, ReleaseParser};
use crate::error::Result;

/// A parser that many threads read while one occasionally swaps it.
///
/// Readers get an `Arc` to a complete parser; `reconfigure` builds the new
/// parser first and replaces the whole value, so a reader never observes a
/// partially updated noise table.
#[derive(Debug)]
pub struct ParserHandle {
    current: RwLock<Arc<ReleaseParser>>,
}

impl ParserHandle {
    pub fn new(parser: ReleaseParser) -> Self {
        Self {
            current: RwLock::new(Arc::new(parser)),
        }
    }

    /// Create a handle around a parser built from `config`.
    pub fn with_config(config: ParserConfig) -> Result<Self> {
        Ok(Self::new(ReleaseParser::with_config(config)?))
    }

    /// The parser currently in effect.
    pub fn load(&self) -> Arc<ReleaseParser> {
        Arc::clone(&self.current.read())
    }

    /// Replaces the parser with one built from `config`.
    ///
    /// On error the current parser stays in place.
    pub fn reconfigure(&self, config: ParserConfig) -> Result<()> {
        let parser = Arc::new(ReleaseParser::with_config(config)?);
        *self.current.write() = parser;
        debug!("release parser reconfigured");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn reconfigure_swaps_the_parser() {
        let handle = ParserHandle::with_config(ParserConfig::default()).unwrap();
        let before = handle.load();
        assert!(!before.normalizer().is_release_group("killers"));

        handle
            .reconfigure(ParserConfig::new().with_release_groups(["killers"]))
            .unwrap();
        assert!(handle.load().normalizer().is_release_group("killers"));
        // Readers holding the old parser keep a consistent view.
        assert!(!before.normalizer().is_release_group("killers"));
    }

    #[test]
    fn failed_reconfigure_keeps_current_parser() {
        let handle = ParserHandle::with_config(ParserConfig::new().with_release_groups(["killers"]))
            .unwrap();
        assert!(handle
            .reconfigure(ParserConfig::new().with_site_tags([" "]))
            .is_err());
        assert!(handle.load().normalizer().is_release_group("killers"));
    }

    #[test]
    fn panicking_writer_does_not_poison_the_handle() {
        let handle = Arc::new(ParserHandle::new(ReleaseParser::new().unwrap()));
        let writer = Arc::clone(&handle);
        let crashed = thread::spawn(move || {
            let _guard = writer.current.write();
            panic!("writer crashed while holding the lock");
        })
        .join();
        assert!(crashed.is_err());

        assert!(handle.load().parse_file("House.S07E13.720p.HDTV").success);
        handle.reconfigure(ParserConfig::default()).unwrap();
    }

    #[test]
    fn concurrent_readers() {
        let handle = Arc::new(ParserHandle::new(ReleaseParser::new().unwrap()));
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let handle = Arc::clone(&handle);
                thread::spawn(move || {
                    let release = handle.load().parse_file("House.S07E13.720p.HDTV.X264-DIMENSION");
                    assert!(release.success);
                })
            })
            .collect();
        handle.reconfigure(ParserConfig::default()).unwrap();
        for worker in workers {
            worker.join().unwrap();
        }
    }
}
