//! File system watcher for watch mode

use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::time::Duration;
use tracing::warn;

const DEBOUNCE_MS: u64 = 300;

/// Directories whose contents are never drafts
const SKIPPED_DIRS: [&str; 3] = ["node_modules", "target", ".git"];

/// How long `next_changes` blocks before returning an empty batch
const IDLE_WAIT: Duration = Duration::from_secs(3600);

/// Watches a file or directory for draft changes
pub struct DraftWatcher {
    _watcher: RecommendedWatcher,
    receiver: Receiver<notify::Result<notify::Event>>,
    filter: ChangeFilter,
}

/// Decides which event paths are reported.
///
/// A directory watch reports drafts matching the suffixes. A single-file
/// watch reports only that file, whatever its name.
struct ChangeFilter {
    suffixes: Vec<String>,
    target: Option<PathBuf>,
}

impl ChangeFilter {
    fn matches(&self, p: &Path) -> bool {
        match &self.target {
            Some(target) => canonical(p) == *target,
            None => is_draft_file(p, self.suffixes.as_slice()),
        }
    }

    fn paths(&self, event: &notify::Event) -> Vec<PathBuf> {
        if !is_create_or_modify(&event.kind) {
            return vec![];
        }
        event
            .paths
            .iter()
            .filter(|p| self.matches(p))
            .cloned()
            .collect()
    }
}

fn canonical(p: &Path) -> PathBuf {
    p.canonicalize().unwrap_or_else(|_| p.to_path_buf())
}

fn is_create_or_modify(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
}

/// Whether `p` looks like a draft given the configured suffixes
pub fn is_draft_file<S: AsRef<str>>(p: &Path, suffixes: &[S]) -> bool {
    let name = match p.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return false,
    };
    if name.starts_with('.') {
        return false;
    }
    if p
        .components()
        .any(|c| SKIPPED_DIRS.iter().any(|d| c.as_os_str() == *d))
    {
        return false;
    }
    suffixes.iter().any(|s| name.ends_with(s.as_ref()))
}

impl DraftWatcher {
    /// Start watching `path`. A single file is watched through its parent directory
    /// and reported on every change, ignoring `suffixes`.
    pub fn watch<S: AsRef<str>>(path: &Path, suffixes: &[S]) -> notify::Result<Self> {
        let (tx, rx) = channel();
        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.send(res);
            },
            Config::default().with_poll_interval(Duration::from_millis(DEBOUNCE_MS)),
        )?;

        let target = if path.is_dir() {
            watcher.watch(path, RecursiveMode::Recursive)?;
            None
        } else {
            match path.parent().filter(|p| !p.as_os_str().is_empty()) {
                Some(parent) => watcher.watch(parent, RecursiveMode::NonRecursive)?,
                None => watcher.watch(Path::new("."), RecursiveMode::NonRecursive)?,
            }
            Some(canonical(path))
        };

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            filter: ChangeFilter {
                suffixes: suffixes.iter().map(|s| s.as_ref().to_string()).collect(),
                target,
            },
        })
    }

    /// Block until at least one event arrives, then drain for DEBOUNCE_MS.
    ///
    /// Returns `None` once the watcher channel has closed. The batch may be
    /// empty when the events concerned no draft.
    pub fn next_changes(&self) -> Option<Vec<PathBuf>> {
        next_batch(&self.receiver, &self.filter, IDLE_WAIT)
    }
}

fn next_batch(
    receiver: &Receiver<notify::Result<notify::Event>>,
    filter: &ChangeFilter,
    wait: Duration,
) -> Option<Vec<PathBuf>> {
    let mut all = HashSet::new();

    match receiver.recv_timeout(wait) {
        Ok(Ok(event)) => all.extend(filter.paths(&event)),
        Ok(Err(e)) => {
            warn!(error = %e, "watch error");
            return Some(vec![]);
        }
        Err(RecvTimeoutError::Timeout) => return Some(vec![]),
        Err(RecvTimeoutError::Disconnected) => return None,
    }

    std::thread::sleep(Duration::from_millis(DEBOUNCE_MS));
    while let Ok(ev) = receiver.try_recv() {
        if let Ok(event) = ev {
            all.extend(filter.paths(&event));
        }
    }

    let mut paths: Vec<PathBuf> = all.into_iter().collect();
    paths.sort();
    Some(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUFFIXES: [&str; 3] = [".md", ".txt", ".markdown"];

    #[test]
    fn draft_suffixes() {
        assert!(is_draft_file(Path::new("paper.md"), &SUFFIXES));
        assert!(is_draft_file(Path::new("drafts/abstract.txt"), &SUFFIXES));
        assert!(is_draft_file(Path::new("notes.markdown"), &SUFFIXES));
        assert!(!is_draft_file(Path::new("paper.tex"), &SUFFIXES));
        assert!(!is_draft_file(Path::new("data.csv"), &SUFFIXES));
    }

    #[test]
    fn custom_suffixes() {
        assert!(is_draft_file(Path::new("paper.tex"), &[".tex"]));
        assert!(!is_draft_file(Path::new("paper.md"), &[".tex"]));
    }

    #[test]
    fn skips_hidden_and_vendored() {
        assert!(!is_draft_file(Path::new(".econwriterc.json.md"), &SUFFIXES));
        assert!(!is_draft_file(
            Path::new("project/node_modules/pkg/README.md"),
            &SUFFIXES
        ));
        assert!(!is_draft_file(Path::new("target/doc/notes.md"), &SUFFIXES));
        assert!(!is_draft_file(Path::new(""), &SUFFIXES));
    }

    #[test]
    fn create_or_modify_only() {
        use notify::event::{CreateKind, ModifyKind, RemoveKind};
        assert!(is_create_or_modify(&EventKind::Create(CreateKind::File)));
        assert!(is_create_or_modify(&EventKind::Modify(ModifyKind::Data(
            notify::event::DataChange::Content
        ))));
        assert!(!is_create_or_modify(&EventKind::Remove(RemoveKind::File)));
    }

    fn dir_filter() -> ChangeFilter {
        ChangeFilter {
            suffixes: SUFFIXES.iter().map(|s| s.to_string()).collect(),
            target: None,
        }
    }

    fn modified(paths: &[&Path]) -> notify::Event {
        notify::Event {
            kind: EventKind::Modify(notify::event::ModifyKind::Data(
                notify::event::DataChange::Content,
            )),
            paths: paths.iter().map(|p| p.to_path_buf()).collect(),
            attrs: Default::default(),
        }
    }

    #[test]
    fn event_paths_are_filtered() {
        use notify::event::{CreateKind, RemoveKind};
        let filter = dir_filter();

        let event = notify::Event {
            kind: EventKind::Create(CreateKind::File),
            paths: vec![
                PathBuf::from("drafts/paper.md"),
                PathBuf::from("drafts/figure.png"),
                PathBuf::from("drafts/abstract.txt"),
            ],
            attrs: Default::default(),
        };
        assert_eq!(
            filter.paths(&event),
            vec![
                PathBuf::from("drafts/paper.md"),
                PathBuf::from("drafts/abstract.txt")
            ]
        );

        let removed = notify::Event {
            kind: EventKind::Remove(RemoveKind::File),
            paths: vec![PathBuf::from("drafts/paper.md")],
            attrs: Default::default(),
        };
        assert!(filter.paths(&removed).is_empty());
    }

    #[test]
    fn single_file_target_ignores_suffixes() {
        let dir = tempfile::TempDir::new().unwrap();
        let paper = dir.path().join("paper.tex");
        let sibling = dir.path().join("notes.md");
        std::fs::write(&paper, "Title: A\n").unwrap();
        std::fs::write(&sibling, "Title: B\n").unwrap();

        let filter = ChangeFilter {
            suffixes: SUFFIXES.iter().map(|s| s.to_string()).collect(),
            target: Some(canonical(&paper)),
        };
        let event = modified(&[paper.as_path(), sibling.as_path()]);
        assert_eq!(filter.paths(&event), vec![paper.clone()]);

        // A directory watch still applies the suffix filter
        assert_eq!(dir_filter().paths(&event), vec![sibling]);
    }

    #[test]
    fn batch_is_none_after_disconnect() {
        let (tx, rx) = channel::<notify::Result<notify::Event>>();
        let filter = dir_filter();

        tx.send(Ok(modified(&[Path::new("drafts/paper.md")]))).unwrap();
        assert_eq!(
            next_batch(&rx, &filter, Duration::from_secs(5)),
            Some(vec![PathBuf::from("drafts/paper.md")])
        );
        assert_eq!(
            next_batch(&rx, &filter, Duration::from_millis(10)),
            Some(vec![])
        );

        drop(tx);
        assert_eq!(next_batch(&rx, &filter, Duration::from_secs(5)), None);
    }

    #[test]
    fn watch_directory_and_single_file() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(DraftWatcher::watch(dir.path(), &SUFFIXES).is_ok());

        let file = dir.path().join("paper.md");
        std::fs::write(&file, "Title: A\n").unwrap();
        assert!(DraftWatcher::watch(&file, &SUFFIXES).is_ok());
    }

    #[test]
    fn edited_single_file_is_reported_without_draft_suffix() {
        let dir = tempfile::TempDir::new().unwrap();
        let paper = dir.path().join("paper.tex");
        std::fs::write(&paper, "Title: A\n").unwrap();
        let watcher = DraftWatcher::watch(&paper, &SUFFIXES).unwrap();

        let writer = {
            let paper = paper.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(500));
                std::fs::write(&paper, "Title: Trade Shocks\n").unwrap();
            })
        };

        let deadline = std::time::Instant::now() + Duration::from_secs(10);
        let mut changed = vec![];
        while changed.is_empty() && std::time::Instant::now() < deadline {
            changed = next_batch(&watcher.receiver, &watcher.filter, Duration::from_secs(2))
                .expect("watcher channel open");
        }
        writer.join().unwrap();

        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].file_name(), paper.file_name());
    }
}
