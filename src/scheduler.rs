use std::collections::HashMap;
use std::path::PathBuf;
use std::time::SystemTime;

/// Watches the tracer's shader sources for edits and tells the render loop when to rebuild
/// the compute pipelines, the pull-based counterpart to the original engine's
/// `Scheduler::update()` push interface (listeners there call into the scheduler when a
/// pipeline changes; here the render loop asks the scheduler once per frame instead).
pub struct Scheduler {
    watched: HashMap<PathBuf, SystemTime>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            watched: HashMap::new(),
        }
    }

    /// Starts tracking `path`'s mtime. Missing files are silently skipped; they start being
    /// tracked once `poll` notices they exist.
    pub fn watch(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        let modified = std::fs::metadata(&path).and_then(|meta| meta.modified()).ok();
        if let Some(modified) = modified {
            self.watched.insert(path, modified);
        }
    }

    /// Returns true if any watched file's mtime advanced since the last call.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        for (path, last_modified) in self.watched.iter_mut() {
            if let Ok(modified) = std::fs::metadata(path).and_then(|meta| meta.modified()) {
                if modified > *last_modified {
                    *last_modified = modified;
                    changed = true;
                }
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn poll_detects_a_rewritten_watched_file() {
        let mut path = std::env::temp_dir();
        path.push(format!("scheduler_test_{:?}.glsl", std::thread::current().id()));
        std::fs::write(&path, "void main() {}").unwrap();

        let mut scheduler = Scheduler::new();
        scheduler.watch(&path);
        assert!(!scheduler.poll());

        std::thread::sleep(std::time::Duration::from_millis(10));
        let mut file = std::fs::OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "// touched").unwrap();

        assert!(scheduler.poll());
        assert!(!scheduler.poll());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn watching_a_missing_file_is_not_fatal() {
        let mut scheduler = Scheduler::new();
        scheduler.watch("/nonexistent/shader.comp");
        assert!(!scheduler.poll());
    }
}
