//! Managed loading of third-party `<script>` tags.
//!
//! Scripts are keyed by element id. Acquiring an already known script reuses
//! the existing tag and only registers another waiter; the tag is removed
//! when the last [`ScriptLease`] is released or dropped.
//!
//! ```ignore
//! let lease = page_loader().acquire(&resource, |status| log::info!("{:?}", status))?;
//! // ...
//! lease.release();
//! ```

mod dom;

pub use dom::DomScriptHost;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// Script identified by the id of its element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptResource {
    pub id: String,
    pub src: String,
}

impl ScriptResource {
    pub fn new(id: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            src: src.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptStatus {
    Pending,
    Loaded,
    Failed,
}

pub type SettleCallback = Box<dyn FnOnce(ScriptStatus)>;

/// Page the scripts are injected into
pub trait ScriptHost {
    /// Attach the script tag. `on_settled` must be called at most once, with
    /// `Loaded` or `Failed`.
    fn append(&self, resource: &ScriptResource, on_settled: SettleCallback) -> Result<(), String>;

    /// Detach the tag if it is still attached
    fn remove(&self, id: &str) -> bool;
}

struct ScriptEntry {
    refs: usize,
    generation: u64,
    status: ScriptStatus,
    waiters: Vec<SettleCallback>,
}

struct LoaderInner<H> {
    host: H,
    entries: RefCell<HashMap<String, ScriptEntry>>,
    next_generation: RefCell<u64>,
}

trait LeaseOwner {
    fn release(&self, id: &str);
}

impl<H: ScriptHost> LoaderInner<H> {
    fn settle(&self, id: &str, generation: u64, status: ScriptStatus) {
        let waiters = {
            let mut entries = self.entries.borrow_mut();
            match entries.get_mut(id) {
                // A stale event from a tag that was already unloaded
                Some(entry) if entry.generation != generation => return,
                Some(entry) if entry.status == ScriptStatus::Pending => {
                    entry.status = status;
                    std::mem::take(&mut entry.waiters)
                }
                _ => return,
            }
        };
        for waiter in waiters {
            waiter(status);
        }
    }
}

impl<H: ScriptHost> LeaseOwner for LoaderInner<H> {
    fn release(&self, id: &str) {
        let removed = {
            let mut entries = self.entries.borrow_mut();
            let last = match entries.get_mut(id) {
                Some(entry) => {
                    entry.refs = entry.refs.saturating_sub(1);
                    entry.refs == 0
                }
                None => false,
            };
            if last {
                entries.remove(id)
            } else {
                None
            }
        };

        if let Some(entry) = removed {
            if !self.host.remove(id) {
                log::debug!("script #{} was already detached", id);
            }
            if entry.status == ScriptStatus::Pending {
                log::debug!("script #{} unloaded before it finished loading", id);
            }
        }
    }
}

thread_local! {
    static PAGE_LOADER: ExternalScriptLoader<DomScriptHost> = ExternalScriptLoader::new(DomScriptHost);
}

/// Loader shared by every component on the page
pub fn page_loader() -> ExternalScriptLoader<DomScriptHost> {
    PAGE_LOADER.with(|loader| loader.clone())
}

/// Reference-counted loader for external scripts
pub struct ExternalScriptLoader<H> {
    inner: Rc<LoaderInner<H>>,
}

impl<H> Clone for ExternalScriptLoader<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<H: ScriptHost + 'static> ExternalScriptLoader<H> {
    pub fn new(host: H) -> Self {
        Self {
            inner: Rc::new(LoaderInner {
                host,
                entries: RefCell::new(HashMap::new()),
                next_generation: RefCell::new(0),
            }),
        }
    }

    /// Load the script (once) and get notified when it settles.
    ///
    /// If the script already settled, `on_settled` runs immediately.
    pub fn acquire<F>(&self, resource: &ScriptResource, on_settled: F) -> Result<ScriptLease, String>
    where
        F: FnOnce(ScriptStatus) + 'static,
    {
        let owner: Rc<dyn LeaseOwner> = self.inner.clone();
        let lease = ScriptLease {
            id: resource.id.clone(),
            owner: Rc::downgrade(&owner),
            released: false,
        };

        let settled = {
            let mut entries = self.inner.entries.borrow_mut();
            match entries.get_mut(&resource.id) {
                Some(entry) => {
                    entry.refs += 1;
                    if entry.status == ScriptStatus::Pending {
                        entry.waiters.push(Box::new(on_settled));
                        None
                    } else {
                        Some((entry.status, on_settled))
                    }
                }
                None => {
                    let generation = {
                        let mut next = self.inner.next_generation.borrow_mut();
                        *next += 1;
                        *next
                    };
                    entries.insert(
                        resource.id.clone(),
                        ScriptEntry {
                            refs: 1,
                            generation,
                            status: ScriptStatus::Pending,
                            waiters: vec![Box::new(on_settled)],
                        },
                    );
                    drop(entries);
                    self.inject(resource, generation)?;
                    return Ok(lease);
                }
            }
        };

        if let Some((status, on_settled)) = settled {
            on_settled(status);
        }
        Ok(lease)
    }

    fn inject(&self, resource: &ScriptResource, generation: u64) -> Result<(), String> {
        let weak = Rc::downgrade(&self.inner);
        let id = resource.id.clone();
        let callback: SettleCallback = Box::new(move |status| {
            if let Some(inner) = weak.upgrade() {
                inner.settle(&id, generation, status);
            }
        });

        if let Err(e) = self.inner.host.append(resource, callback) {
            self.inner.entries.borrow_mut().remove(&resource.id);
            return Err(e);
        }
        log::info!("injected script #{} from {}", resource.id, resource.src);
        Ok(())
    }

    pub fn status(&self, id: &str) -> Option<ScriptStatus> {
        self.inner.entries.borrow().get(id).map(|e| e.status)
    }

    pub fn ref_count(&self, id: &str) -> usize {
        self.inner.entries.borrow().get(id).map_or(0, |e| e.refs)
    }
}

/// Keeps a script loaded; releasing the last lease removes the tag
pub struct ScriptLease {
    id: String,
    owner: Weak<dyn LeaseOwner>,
    released: bool,
}

impl ScriptLease {
    pub fn release(mut self) {
        self.release_once();
    }

    fn release_once(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Some(owner) = self.owner.upgrade() {
            owner.release(&self.id);
        }
    }
}

impl Drop for ScriptLease {
    fn drop(&mut self) {
        self.release_once();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// In-memory page: keeps attached ids and their pending callbacks
    #[derive(Clone, Default)]
    struct FakeHost {
        attached: Rc<RefCell<Vec<String>>>,
        pending: Rc<RefCell<Vec<(String, SettleCallback)>>>,
        appends: Rc<Cell<usize>>,
        refuse: bool,
    }

    impl FakeHost {
        fn fire(&self, id: &str, status: ScriptStatus) {
            let pos = self.pending.borrow().iter().position(|(p, _)| p == id);
            if let Some(pos) = pos {
                let (_, cb) = self.pending.borrow_mut().remove(pos);
                cb(status);
            }
        }

        fn is_attached(&self, id: &str) -> bool {
            self.attached.borrow().iter().any(|a| a == id)
        }
    }

    impl ScriptHost for FakeHost {
        fn append(&self, resource: &ScriptResource, on_settled: SettleCallback) -> Result<(), String> {
            if self.refuse {
                return Err("no document".to_string());
            }
            self.appends.set(self.appends.get() + 1);
            self.attached.borrow_mut().push(resource.id.clone());
            self.pending.borrow_mut().push((resource.id.clone(), on_settled));
            Ok(())
        }

        fn remove(&self, id: &str) -> bool {
            let mut attached = self.attached.borrow_mut();
            let before = attached.len();
            attached.retain(|a| a != id);
            before != attached.len()
        }
    }

    fn resource() -> ScriptResource {
        ScriptResource::new("vendor-script", "https://cdn.example.com/vendor.js")
    }

    fn recorder() -> (Rc<RefCell<Vec<ScriptStatus>>>, impl Fn() -> Box<dyn FnOnce(ScriptStatus)>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_outer = seen.clone();
        let make = move || {
            let seen = seen.clone();
            Box::new(move |s| seen.borrow_mut().push(s)) as Box<dyn FnOnce(ScriptStatus)>
        };
        (seen_outer, make)
    }

    #[test]
    fn test_load_notifies_waiter() {
        let host = FakeHost::default();
        let loader = ExternalScriptLoader::new(host.clone());
        let (seen, make) = recorder();

        let _lease = loader.acquire(&resource(), make()).unwrap();
        assert_eq!(loader.status("vendor-script"), Some(ScriptStatus::Pending));
        assert!(seen.borrow().is_empty());

        host.fire("vendor-script", ScriptStatus::Loaded);
        assert_eq!(*seen.borrow(), vec![ScriptStatus::Loaded]);
        assert_eq!(loader.status("vendor-script"), Some(ScriptStatus::Loaded));
    }

    #[test]
    fn test_second_acquire_reuses_tag() {
        let host = FakeHost::default();
        let loader = ExternalScriptLoader::new(host.clone());
        let (seen, make) = recorder();

        let first = loader.acquire(&resource(), make()).unwrap();
        let second = loader.acquire(&resource(), make()).unwrap();
        assert_eq!(host.appends.get(), 1);
        assert_eq!(loader.ref_count("vendor-script"), 2);

        host.fire("vendor-script", ScriptStatus::Loaded);
        assert_eq!(seen.borrow().len(), 2);

        drop(first);
        assert!(host.is_attached("vendor-script"));
        second.release();
        assert!(!host.is_attached("vendor-script"));
        assert_eq!(loader.status("vendor-script"), None);
    }

    #[test]
    fn test_acquire_after_settle_runs_immediately() {
        let host = FakeHost::default();
        let loader = ExternalScriptLoader::new(host.clone());
        let (seen, make) = recorder();

        let _first = loader.acquire(&resource(), |_| {}).unwrap();
        host.fire("vendor-script", ScriptStatus::Failed);

        let _second = loader.acquire(&resource(), make()).unwrap();
        assert_eq!(*seen.borrow(), vec![ScriptStatus::Failed]);
    }

    #[test]
    fn test_release_before_load_removes_tag() {
        let host = FakeHost::default();
        let loader = ExternalScriptLoader::new(host.clone());
        let (seen, make) = recorder();

        let lease = loader.acquire(&resource(), make()).unwrap();
        assert!(host.is_attached("vendor-script"));
        drop(lease);
        assert!(!host.is_attached("vendor-script"));

        // late load event from the detached tag is ignored
        host.fire("vendor-script", ScriptStatus::Loaded);
        assert!(seen.borrow().is_empty());
        assert_eq!(loader.status("vendor-script"), None);
    }

    #[test]
    fn test_stale_event_does_not_settle_reloaded_script() {
        let host = FakeHost::default();
        let loader = ExternalScriptLoader::new(host.clone());

        let lease = loader.acquire(&resource(), |_| {}).unwrap();
        let (_, stale) = host.pending.borrow_mut().remove(0);
        drop(lease);

        let _lease = loader.acquire(&resource(), |_| {}).unwrap();
        stale(ScriptStatus::Loaded);
        assert_eq!(loader.status("vendor-script"), Some(ScriptStatus::Pending));
    }

    #[test]
    fn test_host_failure_is_reported() {
        let host = FakeHost {
            refuse: true,
            ..FakeHost::default()
        };
        let loader = ExternalScriptLoader::new(host);
        assert!(loader.acquire(&resource(), |_| {}).is_err());
        assert_eq!(loader.ref_count("vendor-script"), 0);
    }

    #[test]
    fn test_lease_outliving_loader_is_harmless() {
        let host = FakeHost::default();
        let loader = ExternalScriptLoader::new(host);
        let lease = loader.acquire(&resource(), |_| {}).unwrap();
        drop(loader);
        drop(lease);
    }
}
